//! Tests for the [`CachingClient`] decorator, moved out of
//! `src/caching.rs`: the mock in `twinlens-test-utils` implements
//! `TwinClient` from the library build of this crate, which unit tests
//! (a separate test build) cannot name.

use std::sync::Arc;
use std::time::Duration;
use twinlens_client::{CachingClient, TwinClient};
use twinlens_core::TwinQuery;
use twinlens_test_utils::{entity_page, MockTwinClient};

fn lookup_query(external_id: &str) -> TwinQuery {
    let mut q = TwinQuery::new("factory");
    q.entity_filter = vec![twinlens_core::EntityFilter::external_id(external_id)];
    q
}

#[tokio::test]
async fn test_repeated_listing_is_served_from_cache() {
    let mock = Arc::new(MockTwinClient::new());
    mock.insert_entity_lookup("ext-1", entity_page(&[("mixer-1", "Mixer One")]));
    let cached = CachingClient::new(mock.clone(), Duration::from_secs(60));

    let q = lookup_query("ext-1");
    let first = cached.list_entities(&q).await.unwrap();
    let second = cached.list_entities(&q).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(mock.call_count("ListEntities"), 1);
}

#[tokio::test]
async fn test_distinct_queries_do_not_share_entries() {
    let mock = Arc::new(MockTwinClient::new());
    mock.insert_entity_lookup("ext-1", entity_page(&[("mixer-1", "Mixer One")]));
    mock.insert_entity_lookup("ext-2", entity_page(&[("mixer-2", "Mixer Two")]));
    let cached = CachingClient::new(mock.clone(), Duration::from_secs(60));

    let a = cached.list_entities(&lookup_query("ext-1")).await.unwrap();
    let b = cached.list_entities(&lookup_query("ext-2")).await.unwrap();

    assert_ne!(a, b);
    assert_eq!(mock.call_count("ListEntities"), 2);
}

#[tokio::test]
async fn test_continuation_pages_bypass_the_cache() {
    let mock = Arc::new(MockTwinClient::new());
    let cached = CachingClient::new(mock.clone(), Duration::from_secs(60));

    let mut q = TwinQuery::new("factory");
    q.next_token = Some("page-2".to_string());
    cached.list_entities(&q).await.unwrap();
    cached.list_entities(&q).await.unwrap();

    assert_eq!(mock.call_count("ListEntities"), 2);
}

#[tokio::test]
async fn test_history_reads_always_go_upstream() {
    let mock = Arc::new(MockTwinClient::new());
    let cached = CachingClient::new(mock.clone(), Duration::from_secs(60));

    let q = TwinQuery::new("factory");
    cached.get_property_value_history(&q).await.unwrap();
    cached.get_property_value_history(&q).await.unwrap();
    cached.get_property_value(&q).await.unwrap();
    cached.get_property_value(&q).await.unwrap();

    assert_eq!(mock.call_count("GetPropertyValueHistory"), 2);
    assert_eq!(mock.call_count("GetPropertyValue"), 2);
}
