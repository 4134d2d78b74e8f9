//! SQLite implementation of [`SubscriptionStore`]
//!
//! Dynamic statements are assembled with `sqlx::QueryBuilder`; every value
//! is a bound parameter and column names come from [`Column`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use subtrack_common::models::{NewSubscription, Subscription};
use subtrack_common::{time, Month, Result};
use tracing::debug;
use uuid::Uuid;

use super::store::SubscriptionStore;
use crate::filter::{ListFilter, MonthSelector, PriceRange};
use crate::patch::{PatchValue, SubscriptionPatch};

const SELECT_COLUMNS: &str = "SELECT id, service_name, price, user_id, start_month, end_month, \
                              created_at, updated_at, deleted_at FROM subscriptions";

/// Raw row as stored; months are ordinals
#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: String,
    service_name: String,
    price: i64,
    user_id: String,
    start_month: i64,
    end_month: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = subtrack_common::Error;

    fn try_from(row: SubscriptionRow) -> Result<Self> {
        Ok(Subscription {
            id: row.id,
            service_name: row.service_name,
            price: row.price,
            user_id: row.user_id,
            start_date: Month::from_ordinal(row.start_month)?,
            end_date: row.end_month.map(Month::from_ordinal).transpose()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
    }
}

/// Subscription store backed by a SQLite pool
#[derive(Clone)]
pub struct SqliteSubscriptionStore {
    pool: SqlitePool,
}

impl SqliteSubscriptionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Append the list predicates shared by the count and page queries
fn push_list_predicates(qb: &mut QueryBuilder<'_, Sqlite>, filter: &ListFilter) {
    qb.push(" WHERE deleted_at IS NULL");

    if let Some(user_id) = &filter.user_id {
        qb.push(" AND user_id = ").push_bind(user_id.clone());
    }
    if let Some(service_name) = &filter.service_name {
        qb.push(" AND service_name = ").push_bind(service_name.clone());
    }

    match filter.months {
        MonthSelector::Any => {}
        MonthSelector::Containing(month) => {
            qb.push(" AND start_month <= ")
                .push_bind(month.ordinal())
                .push(" AND (end_month IS NULL OR end_month >= ")
                .push_bind(month.ordinal())
                .push(")");
        }
        MonthSelector::Overlapping { start, end } => {
            if let Some(start) = start {
                qb.push(" AND (end_month IS NULL OR end_month >= ")
                    .push_bind(start.ordinal())
                    .push(")");
            }
            if let Some(end) = end {
                qb.push(" AND start_month <= ").push_bind(end.ordinal());
            }
        }
    }
}

#[async_trait]
impl SubscriptionStore for SqliteSubscriptionStore {
    async fn insert(&self, new: &NewSubscription) -> Result<Subscription> {
        let id = Uuid::new_v4().to_string();
        let now = time::now();

        sqlx::query(
            r#"
            INSERT INTO subscriptions
                (id, service_name, price, user_id, start_month, end_month, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&new.service_name)
        .bind(new.price)
        .bind(&new.user_id)
        .bind(new.start_date.ordinal())
        .bind(new.end_date.map(|m| m.ordinal()))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!("Inserted subscription {}", id);

        Ok(Subscription {
            id,
            service_name: new.service_name.clone(),
            price: new.price,
            user_id: new.user_id.clone(),
            start_date: new.start_date,
            end_date: new.end_date,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Subscription>> {
        let sql = format!("{} WHERE id = ? AND deleted_at IS NULL", SELECT_COLUMNS);
        let row = sqlx::query_as::<_, SubscriptionRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Subscription::try_from).transpose()
    }

    async fn apply_patch(&self, id: &str, patch: &SubscriptionPatch) -> Result<()> {
        let assignments = patch.assignments();
        if assignments.is_empty() {
            return Ok(());
        }

        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE subscriptions SET ");
        {
            let mut set = qb.separated(", ");
            for (column, value) in assignments {
                set.push(format!("{} = ", column.as_str()));
                match value {
                    PatchValue::Text(text) => set.push_bind_unseparated(text),
                    PatchValue::Integer(n) => set.push_bind_unseparated(n),
                    PatchValue::NullableInteger(n) => set.push_bind_unseparated(n),
                };
            }
            set.push("updated_at = ").push_bind_unseparated(time::now());
        }
        qb.push(" WHERE id = ")
            .push_bind(id.to_string())
            .push(" AND deleted_at IS NULL");

        let result = qb.build().execute(&self.pool).await?;
        debug!(
            "Patched subscription {} columns={:?} rows_affected={}",
            id,
            patch.columns(),
            result.rows_affected()
        );
        Ok(())
    }

    async fn soft_delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query(
            "UPDATE subscriptions SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(time::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        debug!(
            "Soft-deleted subscription {} rows_affected={}",
            id,
            result.rows_affected()
        );
        Ok(())
    }

    async fn list_filtered(&self, filter: &ListFilter) -> Result<(Vec<Subscription>, i64)> {
        let mut count_qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM subscriptions");
        push_list_predicates(&mut count_qb, filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut page_qb = QueryBuilder::<Sqlite>::new(SELECT_COLUMNS);
        push_list_predicates(&mut page_qb, filter);
        page_qb
            .push(" ORDER BY start_month DESC, created_at DESC, id ASC LIMIT ")
            .push_bind(filter.page.limit)
            .push(" OFFSET ")
            .push_bind(filter.page.offset);

        let rows: Vec<SubscriptionRow> = page_qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;

        let records = rows
            .into_iter()
            .map(Subscription::try_from)
            .collect::<Result<Vec<_>>>()?;

        debug!("Listed {} of {} subscriptions", records.len(), total);
        Ok((records, total))
    }

    async fn sum_filtered(&self, range: &PriceRange) -> Result<i64> {
        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT COALESCE(SUM(price), 0) FROM subscriptions WHERE deleted_at IS NULL",
        );
        if let Some(user_id) = &range.user_id {
            qb.push(" AND user_id = ").push_bind(user_id.clone());
        }
        if let Some(service_name) = &range.service_name {
            qb.push(" AND service_name = ").push_bind(service_name.clone());
        }
        qb.push(" AND start_month >= ")
            .push_bind(range.start.ordinal())
            .push(" AND (end_month IS NULL OR end_month <= ")
            .push_bind(range.end.ordinal())
            .push(")");

        let total: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(total)
    }
}
