//! Storage contract

use async_trait::async_trait;
use subtrack_common::models::{NewSubscription, Subscription};
use subtrack_common::Result;

use crate::filter::{ListFilter, PriceRange};
use crate::patch::SubscriptionPatch;

/// Operations the subscription service needs from a backing store.
///
/// Every operation ignores soft-deleted records. Writes that match no live
/// record succeed silently.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Insert a record; the store assigns id and timestamps
    async fn insert(&self, new: &NewSubscription) -> Result<Subscription>;

    /// Live record by id, `None` when absent or deleted
    async fn get_by_id(&self, id: &str) -> Result<Option<Subscription>>;

    /// Write the patched columns and refresh `updated_at`. Empty patches are a no-op.
    async fn apply_patch(&self, id: &str, patch: &SubscriptionPatch) -> Result<()>;

    /// Set the soft-delete marker
    async fn soft_delete(&self, id: &str) -> Result<()>;

    /// One page of matching records plus the unpaginated match count
    async fn list_filtered(&self, filter: &ListFilter) -> Result<(Vec<Subscription>, i64)>;

    /// Sum of `price` over matching records, 0 when nothing matches
    async fn sum_filtered(&self, range: &PriceRange) -> Result<i64>;
}
