//! Subscription data model and request shapes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::Month;

/// A stored subscription record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    pub start_date: Month,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Month>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker; never exposed to clients
    #[serde(skip)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Validated record shape handed to the store for insertion.
/// Identity and timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscription {
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    pub start_date: Month,
    pub end_date: Option<Month>,
}

/// Body of a create request. Month fields stay raw so validation can
/// report which field is malformed. Missing keys take zero values and are
/// rejected by validation rather than by the decoder.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateSubscriptionRequest {
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    pub start_date: String,
    pub end_date: Option<String>,
}

/// Body of a partial update request
///
/// `end_date` distinguishes an absent key (`None`) from an explicit
/// `null` (`Some(None)`, which clears the end month).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSubscriptionRequest {
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub end_date: Option<Option<String>>,
}

fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Raw list/total filter parameters as received from a client.
///
/// Empty strings mean "no filter". `limit`/`offset` are normalized by the
/// service before reaching the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionFilter {
    pub user_id: String,
    pub service_name: String,
    pub month: String,
    pub start_month: String,
    pub end_month: String,
    pub limit: i64,
    pub offset: i64,
}

/// Default page size for list queries
pub const DEFAULT_LIMIT: i64 = 10;

/// Largest accepted price, the range of a 32-bit SQL INTEGER. Keeps
/// `SUM(price)` well inside `i64`.
pub const MAX_PRICE: i64 = i32::MAX as i64;

impl Default for SubscriptionFilter {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            service_name: String::new(),
            month: String::new(),
            start_month: String::new(),
            end_month: String::new(),
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Subscription {
        let now = Utc::now();
        Subscription {
            id: "7d2b4a4e-9a52-4d7e-8d1e-0c5f3c1f2a10".to_string(),
            service_name: "Yandex Plus".to_string(),
            price: 400,
            user_id: "60601fee-2bf1-4721-ae6f-7636e79a0cba".to_string(),
            start_date: Month::parse("07-2025").unwrap(),
            end_date: None,
            created_at: now,
            updated_at: now,
            deleted_at: Some(now),
        }
    }

    #[test]
    fn test_subscription_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["start_date"], "07-2025");
        assert_eq!(json["price"], 400);
        assert!(json.get("end_date").is_none(), "open-ended records omit end_date");
        assert!(json.get("deleted_at").is_none(), "soft-delete marker is private");
    }

    #[test]
    fn test_update_request_distinguishes_null_from_absent() {
        let absent: UpdateSubscriptionRequest = serde_json::from_str(r#"{"price": 500}"#).unwrap();
        assert_eq!(absent.price, Some(500));
        assert_eq!(absent.end_date, None);

        let cleared: UpdateSubscriptionRequest =
            serde_json::from_str(r#"{"end_date": null}"#).unwrap();
        assert_eq!(cleared.end_date, Some(None));

        let set: UpdateSubscriptionRequest =
            serde_json::from_str(r#"{"end_date": "12-2025"}"#).unwrap();
        assert_eq!(set.end_date, Some(Some("12-2025".to_string())));
    }

    #[test]
    fn test_create_request_end_date_optional() {
        let req: CreateSubscriptionRequest = serde_json::from_str(
            r#"{"service_name":"Netflix","price":1000,
                "user_id":"123e4567-e89b-12d3-a456-426614174000","start_date":"01-2024"}"#,
        )
        .unwrap();
        assert_eq!(req.end_date, None);
        assert_eq!(req.start_date, "01-2024");
    }

    #[test]
    fn test_filter_defaults() {
        let f = SubscriptionFilter::default();
        assert_eq!(f.limit, DEFAULT_LIMIT);
        assert_eq!(f.offset, 0);
        assert!(f.month.is_empty());
    }
}
