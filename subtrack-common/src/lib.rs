//! # subtrack Common Library
//!
//! Shared code for the subtrack services including:
//! - Calendar month value type ("MM-YYYY" tokens)
//! - Subscription data model and request types
//! - Configuration loading
//! - Database initialization
//! - Error types

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod month;
pub mod time;

pub use error::{Error, Result};
pub use month::Month;
