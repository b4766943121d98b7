//! History rows and property references

use crate::value::DataValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifies one property series on the remote side.
///
/// Either the direct form (`entity_id` + `component_name`) or the
/// indirect form, where only `external_id_property` is populated and
/// the internal identity has to be recovered by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntityPropertyReference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub external_id_property: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,
}

impl EntityPropertyReference {
    /// True when the row is only identified by its external id.
    pub fn is_external_only(&self) -> bool {
        self.entity_id.is_none() || self.component_name.is_none()
    }
}

/// One timestamped value. The time stays in its wire form; parsing is
/// deferred to [`crate::time::parse_history_time`] so a malformed
/// timestamp surfaces where the value is actually consumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyValueSample {
    pub time: String,
    pub value: DataValue,
}

/// One row of a history page: a reference plus its ordered samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyValueHistory {
    pub entity_property_reference: EntityPropertyReference,
    pub values: Vec<PropertyValueSample>,
}

/// A history row whose identity has been reconciled by the resolver.
///
/// Owned exclusively by the resolver's caller; nothing here is shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPropertyValue {
    pub entity_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,
    /// Empty when no component of the looked-up entity matched the
    /// external id; that is not an error.
    pub component_name: String,
    pub external_id_property: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,
    pub values: Vec<PropertyValueSample>,
}

/// An entry for the batch write endpoint. Writes are forwarded, never
/// buffered locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyValueEntry {
    pub entity_property_reference: EntityPropertyReference,
    pub property_values: Vec<PropertyValueSample>,
}
