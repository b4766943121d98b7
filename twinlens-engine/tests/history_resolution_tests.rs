//! End-to-end history resolution through the engine, including one
//! run through the caching client layer.

use std::sync::Arc;
use twinlens_client::CachingClient;
use twinlens_core::{TwinError, TwinQuery};
use twinlens_engine::HistoryEngine;
use twinlens_test_utils::{
    alarm_component_type, component_type_page, entity_page, entity_with_component, external_row,
    history_page, sample, MockTwinClient,
};

const TYPE_ID: &str = "alarm.mixer";

fn component_query() -> TwinQuery {
    let mut q = TwinQuery::new("factory");
    q.component_type_id = Some(TYPE_ID.to_string());
    q
}

fn script_mixer(mock: &MockTwinClient) {
    mock.insert_component_type(alarm_component_type(TYPE_ID, "alarm_key", "alarm_status"));
    mock.insert_entity_lookup("mixer-7", entity_page(&[("mixer-7-entity", "Mixer Seven")]));
    mock.insert_entity_detail(entity_with_component(
        "mixer-7-entity",
        "Mixer Seven",
        "MixerAlarm",
        TYPE_ID,
        "alarm_key",
        "mixer-7",
    ));
}

#[tokio::test]
async fn component_history_merges_pages_and_resolves_identity() {
    let mock = Arc::new(MockTwinClient::new());
    script_mixer(&mock);
    mock.push_history_page(history_page(
        vec![external_row(
            "alarm_key",
            "mixer-7",
            "alarm_status",
            vec![sample("2022-04-27T17:50:00Z", "ACTIVE")],
        )],
        Some("page-2"),
    ));
    mock.push_history_page(history_page(
        vec![external_row(
            "alarm_key",
            "mixer-7",
            "alarm_status",
            vec![sample("2022-04-27T17:40:00Z", "NORMAL")],
        )],
        None,
    ));

    let engine = HistoryEngine::new(mock.clone());
    let result = engine
        .component_history(&component_query())
        .await
        .expect("component history");

    assert!(result.warnings.is_empty());
    assert_eq!(result.rows.len(), 1);
    let row = &result.rows[0];
    assert_eq!(row.entity_id, "mixer-7-entity");
    assert_eq!(row.entity_name.as_deref(), Some("Mixer Seven"));
    assert_eq!(row.component_name, "MixerAlarm");
    assert_eq!(row.values.len(), 2);
    assert_eq!(mock.call_count("GetPropertyValueHistory"), 2);
}

#[tokio::test]
async fn component_history_without_type_is_rejected() {
    let engine = HistoryEngine::new(Arc::new(MockTwinClient::new()));
    let result = engine.component_history(&TwinQuery::new("factory")).await;
    assert!(matches!(result, Err(TwinError::Query(_))));
}

#[tokio::test]
async fn latest_component_history_keeps_one_value_per_series() {
    let mock = Arc::new(MockTwinClient::new());
    script_mixer(&mock);
    mock.push_history_page(history_page(
        vec![external_row(
            "alarm_key",
            "mixer-7",
            "alarm_status",
            vec![
                sample("2022-04-27T18:00:00Z", "ACTIVE"),
                sample("2022-04-27T17:00:00Z", "NORMAL"),
            ],
        )],
        None,
    ));

    let engine = HistoryEngine::new(mock);
    let result = engine
        .latest_component_history(&component_query())
        .await
        .expect("latest history");

    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0].values.len(), 1);
    assert_eq!(result.rows[0].values[0].value.as_str(), Some("ACTIVE"));
}

#[tokio::test]
async fn alarm_collection_spans_derived_types() {
    let mock = Arc::new(MockTwinClient::new());
    mock.push_component_type_page(component_type_page(&[TYPE_ID], None));
    mock.push_component_type_page(component_type_page(&[], None));
    script_mixer(&mock);
    mock.push_history_page(history_page(
        vec![external_row(
            "alarm_key",
            "mixer-7",
            "alarm_status",
            vec![sample("2022-04-27T18:00:00Z", "ACTIVE")],
        )],
        None,
    ));

    let engine = HistoryEngine::new(mock);
    let result = engine
        .alarms(&TwinQuery::new("factory"))
        .await
        .expect("alarm collection");

    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0].entity_name.as_deref(), Some("Mixer Seven"));
    assert_eq!(result.rows[0].property_name.as_deref(), Some("alarm_status"));
}

#[tokio::test]
async fn caching_layer_reuses_metadata_but_never_history() {
    let mock = Arc::new(MockTwinClient::new());
    script_mixer(&mock);
    mock.push_history_page(history_page(
        vec![external_row(
            "alarm_key",
            "mixer-7",
            "alarm_status",
            vec![sample("2022-04-27T17:50:00Z", "ACTIVE")],
        )],
        None,
    ));
    mock.push_history_page(history_page(
        vec![external_row(
            "alarm_key",
            "mixer-7",
            "alarm_status",
            vec![sample("2022-04-27T17:55:00Z", "NORMAL")],
        )],
        None,
    ));

    let cached = CachingClient::new(mock.clone(), std::time::Duration::from_secs(60));
    let engine = HistoryEngine::new(Arc::new(cached));

    let first = engine
        .component_history(&component_query())
        .await
        .expect("first run");
    let second = engine
        .component_history(&component_query())
        .await
        .expect("second run");

    // Metadata reads hit the cache on the second run; every history
    // read goes upstream.
    assert_eq!(mock.call_count("GetComponentType"), 1);
    assert_eq!(mock.call_count("GetEntity"), 1);
    assert_eq!(mock.call_count("GetPropertyValueHistory"), 2);
    assert_eq!(first.rows[0].values[0].value.as_str(), Some("ACTIVE"));
    assert_eq!(second.rows[0].values[0].value.as_str(), Some("NORMAL"));
}
