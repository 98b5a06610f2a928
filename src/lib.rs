//! Best Buy store: a product catalog with stock tracking, promotions applied
//! at purchase time, and multi-line orders.
//!
//! The [`domain`] types are plain synchronous structs. The [`actors`] own a
//! [`domain::Store`] behind a channel so concurrent callers get exclusive
//! access for the duration of each order; [`app_system::StoreSystem`] starts
//! and stops them.

pub mod actors;
pub mod app_system;
pub mod catalog;
pub mod clients;
pub mod config;
pub mod domain;
pub mod error;
pub mod messages;

#[cfg(test)]
mod mock_framework;
