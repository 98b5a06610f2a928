//! Services that own mutable state and process requests one at a time.

mod order_service;
mod store_service;

pub use order_service::*;
pub use store_service::*;
