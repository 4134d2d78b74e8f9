//! Subscription service
//!
//! Validates and normalizes requests, then hands them to the store. Store
//! results are returned unchanged.

use std::sync::Arc;

use subtrack_common::models::{
    CreateSubscriptionRequest, Subscription, SubscriptionFilter, UpdateSubscriptionRequest,
};
use subtrack_common::Result;
use tracing::info;

use crate::db::SubscriptionStore;
use crate::filter::{ListFilter, PriceRange};
use crate::patch::SubscriptionPatch;
use crate::validation::{require_id, validate_create};

/// One page of list results
#[derive(Debug, Clone)]
pub struct ListPage {
    pub records: Vec<Subscription>,
    /// Match count ignoring limit/offset
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

pub struct SubscriptionService {
    store: Arc<dyn SubscriptionStore>,
}

impl SubscriptionService {
    pub fn new(store: Arc<dyn SubscriptionStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, req: &CreateSubscriptionRequest) -> Result<Subscription> {
        let new = validate_create(req)?;
        let created = self.store.insert(&new).await?;
        info!(
            "Created subscription {} ({}) for user {}",
            created.id, created.service_name, created.user_id
        );
        Ok(created)
    }

    /// `Ok(None)` when no live record has this id
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Subscription>> {
        require_id(id)?;
        self.store.get_by_id(id).await
    }

    pub async fn update(&self, id: &str, req: &UpdateSubscriptionRequest) -> Result<()> {
        require_id(id)?;
        let patch = SubscriptionPatch::from_request(req)?;
        if patch.is_empty() {
            return Ok(());
        }
        self.store.apply_patch(id, &patch).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        require_id(id)?;
        self.store.soft_delete(id).await
    }

    pub async fn list(&self, filter: &SubscriptionFilter) -> Result<ListPage> {
        let filter = ListFilter::from_filter(filter)?;
        let (records, total) = self.store.list_filtered(&filter).await?;
        Ok(ListPage {
            records,
            total,
            limit: filter.page.limit,
            offset: filter.page.offset,
        })
    }

    pub async fn total_price(&self, filter: &SubscriptionFilter) -> Result<i64> {
        let range = PriceRange::from_filter(filter)?;
        self.store.sum_filtered(&range).await
    }
}
