//! subtrack-api library - subscription tracking service
//!
//! CRUD over user subscriptions plus a total-price aggregate, served as a
//! JSON HTTP API on top of SQLite.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod patch;
pub mod service;
pub mod validation;

use db::SubscriptionStore;
use service::SubscriptionService;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SubscriptionService>,
}

impl AppState {
    pub fn new(service: SubscriptionService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Build state directly from a store
    pub fn from_store(store: Arc<dyn SubscriptionStore>) -> Self {
        Self::new(SubscriptionService::new(store))
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let subscriptions = Router::new()
        .route(
            "/",
            get(api::list_subscriptions).post(api::create_subscription),
        )
        .route("/total", get(api::get_total_price))
        .route(
            "/:id",
            get(api::get_subscription)
                .put(api::update_subscription)
                .delete(api::delete_subscription),
        );

    Router::new()
        .nest("/api/v1/subscriptions", subscriptions)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
