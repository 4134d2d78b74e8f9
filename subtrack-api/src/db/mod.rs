//! Storage layer for subtrack-api
//!
//! [`SubscriptionStore`] is the contract the service depends on;
//! [`SqliteSubscriptionStore`] implements it over a sqlx pool.

mod sqlite;
mod store;

pub use sqlite::SqliteSubscriptionStore;
pub use store::SubscriptionStore;
