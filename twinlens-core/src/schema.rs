//! Remote schema and page output types
//!
//! Shapes returned by the list/get endpoints of the twin API. All
//! paginated outputs carry an explicit `next_token`; absence means the
//! result set is exhausted.

use crate::reference::PropertyValueHistory;
use crate::value::DataValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Schema of one property on a component type.
///
/// The resolver and the identity key builder rely on `is_external_id`
/// being populated correctly by the remote schema.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyDefinition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    pub is_external_id: bool,
    pub is_time_series: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Map of property name to definition, as returned for a component type.
pub type PropertyDefinitions = BTreeMap<String, PropertyDefinition>;

/// Full component-type detail.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentTypeDetail {
    pub component_type_id: String,
    pub property_definitions: PropertyDefinitions,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extends_from: Vec<String>,
    pub is_abstract: bool,
}

/// One property instance on an entity's component: its definition plus
/// the current (non-timeseries) value, if any.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyEntry {
    pub definition: PropertyDefinition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<DataValue>,
}

/// One component attached to an entity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentDetail {
    pub component_type_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub properties: BTreeMap<String, PropertyEntry>,
}

/// Full entity detail, keyed by component name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntityDetail {
    pub entity_id: String,
    pub entity_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub components: BTreeMap<String, ComponentDetail>,
}

// ============================================================================
// LIST SUMMARIES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntitySummary {
    pub entity_id: String,
    pub entity_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentTypeSummary {
    pub component_type_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkspaceSummary {
    pub workspace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneSummary {
    pub scene_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
}

// ============================================================================
// PAGE OUTPUTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkspacePage {
    pub workspace_summaries: Vec<WorkspaceSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScenePage {
    pub scene_summaries: Vec<SceneSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntityPage {
    pub entity_summaries: Vec<EntitySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentTypePage {
    pub component_type_summaries: Vec<ComponentTypeSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// One page of property value history.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryPage {
    pub property_values: Vec<PropertyValueHistory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// Latest (non-timeseries) value of one property.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LatestPropertyValue {
    pub property_reference: crate::reference::EntityPropertyReference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_value: Option<DataValue>,
}

/// Output of the non-timeseries property read, keyed by property name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyValueOutput {
    pub property_values: BTreeMap<String, LatestPropertyValue>,
}

/// Acknowledgement of a batch write. Failed entries are reported per
/// entry, not as a transport error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchPutOutput {
    pub error_entries: Vec<BatchPutError>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchPutError {
    pub error_code: String,
    pub error_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definitions_deserialize_with_defaults() {
        let defs: PropertyDefinitions = serde_json::from_str(
            r#"{
                "alarm_key": {"dataType": "STRING", "isExternalId": true},
                "alarm_status": {"dataType": "STRING", "isTimeSeries": true}
            }"#,
        )
        .unwrap();

        assert!(defs["alarm_key"].is_external_id);
        assert!(!defs["alarm_key"].is_time_series);
        assert!(defs["alarm_status"].is_time_series);
    }

    #[test]
    fn test_history_page_next_token_absent_means_exhausted() {
        let page: HistoryPage = serde_json::from_str(r#"{"propertyValues": []}"#).unwrap();
        assert!(page.next_token.is_none());
    }
}
