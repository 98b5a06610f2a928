pub mod order;
pub mod product;
pub mod promotion;
pub mod store;

pub use order::*;
pub use product::*;
pub use promotion::*;
pub use store::*;
