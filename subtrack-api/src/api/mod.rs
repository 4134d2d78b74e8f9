//! HTTP API handlers for subtrack-api

pub mod health;
pub mod subscriptions;

pub use health::health_routes;
pub use subscriptions::{
    create_subscription, delete_subscription, get_subscription, get_total_price,
    list_subscriptions, update_subscription,
};
