//! SQLite store semantics: soft delete, sparse patches, pagination counts
//! and the list/total month predicates.

use subtrack_api::db::{SqliteSubscriptionStore, SubscriptionStore};
use subtrack_api::filter::{ListFilter, MonthSelector, PriceRange};
use subtrack_api::pagination::Page;
use subtrack_api::patch::SubscriptionPatch;
use subtrack_common::db::init_memory_database;
use subtrack_common::models::NewSubscription;
use subtrack_common::Month;

const USER: &str = "60601fee-2bf1-4721-ae6f-7636e79a0cba";

async fn setup_store() -> SqliteSubscriptionStore {
    let pool = init_memory_database()
        .await
        .expect("Should open in-memory database");
    SqliteSubscriptionStore::new(pool)
}

fn month(s: &str) -> Month {
    Month::parse(s).unwrap()
}

fn new_sub(name: &str, price: i64, start: &str, end: Option<&str>) -> NewSubscription {
    NewSubscription {
        service_name: name.to_string(),
        price,
        user_id: USER.to_string(),
        start_date: month(start),
        end_date: end.map(month),
    }
}

fn list_all(months: MonthSelector, limit: i64, offset: i64) -> ListFilter {
    ListFilter {
        user_id: None,
        service_name: None,
        months,
        page: Page { limit, offset },
    }
}

#[tokio::test]
async fn test_insert_then_get() {
    let store = setup_store().await;
    let created = store
        .insert(&new_sub("Netflix", 1000, "01-2024", Some("12-2024")))
        .await
        .unwrap();

    let fetched = store.get_by_id(&created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.start_date, month("01-2024"));
    assert_eq!(fetched.end_date, Some(month("12-2024")));
}

#[tokio::test]
async fn test_soft_deleted_records_are_invisible() {
    let store = setup_store().await;
    let created = store
        .insert(&new_sub("Netflix", 1000, "01-2024", None))
        .await
        .unwrap();

    store.soft_delete(&created.id).await.unwrap();

    assert!(store.get_by_id(&created.id).await.unwrap().is_none());

    let (records, total) = store
        .list_filtered(&list_all(MonthSelector::Any, 10, 0))
        .await
        .unwrap();
    assert!(records.is_empty());
    assert_eq!(total, 0);

    let sum = store
        .sum_filtered(&PriceRange {
            user_id: None,
            service_name: None,
            start: month("01-2000"),
            end: month("12-2100"),
        })
        .await
        .unwrap();
    assert_eq!(sum, 0);

    // patches no longer reach the row
    store
        .apply_patch(
            &created.id,
            &SubscriptionPatch {
                price: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(store.get_by_id(&created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_patch_touches_only_named_columns() {
    let store = setup_store().await;
    let created = store
        .insert(&new_sub("Netflix", 1000, "01-2024", Some("12-2024")))
        .await
        .unwrap();

    // timestamps have microsecond resolution
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    store
        .apply_patch(
            &created.id,
            &SubscriptionPatch {
                price: Some(500),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let after = store.get_by_id(&created.id).await.unwrap().unwrap();
    assert_eq!(after.price, 500);
    assert_eq!(after.service_name, created.service_name);
    assert_eq!(after.user_id, created.user_id);
    assert_eq!(after.start_date, created.start_date);
    assert_eq!(after.end_date, created.end_date);
    assert_eq!(after.created_at, created.created_at);
    assert!(after.updated_at > created.updated_at);
}

#[tokio::test]
async fn test_patch_clears_end_month() {
    let store = setup_store().await;
    let created = store
        .insert(&new_sub("Netflix", 1000, "01-2024", Some("12-2024")))
        .await
        .unwrap();

    store
        .apply_patch(
            &created.id,
            &SubscriptionPatch {
                end_date: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let after = store.get_by_id(&created.id).await.unwrap().unwrap();
    assert_eq!(after.end_date, None);
}

#[tokio::test]
async fn test_empty_patch_is_noop() {
    let store = setup_store().await;
    let created = store
        .insert(&new_sub("Netflix", 1000, "01-2024", None))
        .await
        .unwrap();

    store
        .apply_patch(&created.id, &SubscriptionPatch::default())
        .await
        .unwrap();

    let after = store.get_by_id(&created.id).await.unwrap().unwrap();
    assert_eq!(after, created);
}

#[tokio::test]
async fn test_writes_to_missing_id_succeed() {
    let store = setup_store().await;
    let missing = "123e4567-e89b-12d3-a456-426614174000";

    store
        .apply_patch(
            missing,
            &SubscriptionPatch {
                price: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    store.soft_delete(missing).await.unwrap();
}

#[tokio::test]
async fn test_total_count_ignores_page() {
    let store = setup_store().await;
    for i in 1..=7 {
        store
            .insert(&new_sub("Netflix", 100 * i, &format!("{:02}-2024", i), None))
            .await
            .unwrap();
    }

    for (limit, offset, expected_len) in [(10, 0, 7), (3, 0, 3), (3, 6, 1), (5, 20, 0)] {
        let (records, total) = store
            .list_filtered(&list_all(MonthSelector::Any, limit, offset))
            .await
            .unwrap();
        assert_eq!(total, 7);
        assert_eq!(records.len(), expected_len);
    }

    // newest start month first
    let (records, _) = store
        .list_filtered(&list_all(MonthSelector::Any, 2, 0))
        .await
        .unwrap();
    assert_eq!(records[0].start_date, month("07-2024"));
    assert_eq!(records[1].start_date, month("06-2024"));
}

#[tokio::test]
async fn test_months_compare_chronologically_across_years() {
    let store = setup_store().await;
    // lexically "02-2023" > "01-2024"; chronologically it is earlier
    store
        .insert(&new_sub("Old", 100, "02-2023", Some("03-2023")))
        .await
        .unwrap();
    store
        .insert(&new_sub("New", 200, "01-2024", None))
        .await
        .unwrap();

    let (records, total) = store
        .list_filtered(&list_all(MonthSelector::Containing(month("06-2024")), 10, 0))
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(records[0].service_name, "New");
}

#[tokio::test]
async fn test_list_containment_vs_total_range() {
    let store = setup_store().await;
    // spans the whole year
    store
        .insert(&new_sub("Year", 1200, "01-2024", Some("12-2024")))
        .await
        .unwrap();
    // open-ended, started mid-year
    store
        .insert(&new_sub("Open", 300, "06-2024", None))
        .await
        .unwrap();

    let (_, total) = store
        .list_filtered(&list_all(MonthSelector::Containing(month("07-2024")), 10, 0))
        .await
        .unwrap();
    assert_eq!(total, 2);

    // the same single month as an aggregate requires start >= 07-2024
    let sum = store
        .sum_filtered(&PriceRange {
            user_id: None,
            service_name: None,
            start: month("07-2024"),
            end: month("07-2024"),
        })
        .await
        .unwrap();
    assert_eq!(sum, 0);

    let sum = store
        .sum_filtered(&PriceRange {
            user_id: None,
            service_name: None,
            start: month("01-2024"),
            end: month("12-2024"),
        })
        .await
        .unwrap();
    assert_eq!(sum, 1500);
}

#[tokio::test]
async fn test_list_overlapping_half_open() {
    let store = setup_store().await;
    store
        .insert(&new_sub("Early", 100, "01-2023", Some("06-2023")))
        .await
        .unwrap();
    store
        .insert(&new_sub("Late", 200, "01-2025", None))
        .await
        .unwrap();

    let (records, total) = store
        .list_filtered(&list_all(
            MonthSelector::Overlapping {
                start: Some(month("01-2024")),
                end: None,
            },
            10,
            0,
        ))
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(records[0].service_name, "Late");

    let (records, _) = store
        .list_filtered(&list_all(
            MonthSelector::Overlapping {
                start: None,
                end: Some(month("12-2023")),
            },
            10,
            0,
        ))
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].service_name, "Early");
}
