//! Subscription CRUD and aggregate endpoints
//!
//! Handlers only deal with transport concerns (path id format, body and
//! query extraction, status codes); validation and normalization live in
//! the service.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use subtrack_common::models::{
    CreateSubscriptionRequest, Subscription, SubscriptionFilter, UpdateSubscriptionRequest,
    DEFAULT_LIMIT,
};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::pagination::parse_or_default;
use crate::AppState;

/// Query parameters shared by the list and total endpoints
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub user_id: Option<String>,
    pub service_name: Option<String>,
    pub month: Option<String>,
    pub start_month: Option<String>,
    pub end_month: Option<String>,
    /// Kept as text so a non-numeric value falls back to the default
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl FilterQuery {
    fn into_filter(self) -> SubscriptionFilter {
        SubscriptionFilter {
            limit: parse_or_default(self.limit.as_deref(), DEFAULT_LIMIT),
            offset: parse_or_default(self.offset.as_deref(), 0),
            user_id: self.user_id.unwrap_or_default(),
            service_name: self.service_name.unwrap_or_default(),
            month: self.month.unwrap_or_default(),
            start_month: self.start_month.unwrap_or_default(),
            end_month: self.end_month.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub data: Vec<Subscription>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Serialize)]
pub struct TotalPriceResponse {
    pub total_price: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn parse_path_id(id: &str) -> ApiResult<()> {
    Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| ApiError::BadRequest("invalid UUID format".to_string()))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// POST /api/v1/subscriptions
pub async fn create_subscription(
    State(state): State<AppState>,
    payload: Result<Json<CreateSubscriptionRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Subscription>)> {
    let req = body(payload)?;
    let created = state.service.create(&req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/subscriptions/:id
pub async fn get_subscription(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Subscription>> {
    parse_path_id(&id)?;
    state
        .service
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("subscription not found".to_string()))
}

/// PUT /api/v1/subscriptions/:id
pub async fn update_subscription(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateSubscriptionRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    parse_path_id(&id)?;
    let req = body(payload)?;
    state.service.update(&id, &req).await?;
    Ok(Json(MessageResponse {
        message: "subscription updated successfully".to_string(),
    }))
}

/// DELETE /api/v1/subscriptions/:id
pub async fn delete_subscription(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    parse_path_id(&id)?;
    state.service.delete(&id).await?;
    Ok(Json(MessageResponse {
        message: "subscription deleted successfully".to_string(),
    }))
}

/// GET /api/v1/subscriptions
pub async fn list_subscriptions(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> ApiResult<Json<ListResponse>> {
    let page = state.service.list(&query.into_filter()).await?;
    Ok(Json(ListResponse {
        data: page.records,
        total: page.total,
        limit: page.limit,
        offset: page.offset,
    }))
}

/// GET /api/v1/subscriptions/total
pub async fn get_total_price(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> ApiResult<Json<TotalPriceResponse>> {
    let filter = query.into_filter();
    if filter.month.is_empty() && (filter.start_month.is_empty() || filter.end_month.is_empty()) {
        return Err(ApiError::BadRequest(
            "either 'month' or both 'start_month' and 'end_month' must be provided".to_string(),
        ));
    }

    let total_price = state.service.total_price(&filter).await?;
    Ok(Json(TotalPriceResponse { total_price }))
}
