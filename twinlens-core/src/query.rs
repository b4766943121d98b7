//! Query model
//!
//! A [`TwinQuery`] is an immutable value object describing one read
//! against the remote twin API. Stages that need a different scope
//! (for example the alarm collector re-pointing the query at each
//! derived component type) clone the query and mutate their own copy;
//! the caller's original is never aliased.

use crate::value::DataValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sort order for time-series results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResultOrder {
    #[default]
    #[serde(rename = "ASCENDING")]
    Ascending,
    #[serde(rename = "DESCENDING")]
    Descending,
}

/// Comparison operator for server-side property filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
}

impl FilterOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "=",
            FilterOperator::Ne => "!=",
            FilterOperator::Lt => "<",
            FilterOperator::Lte => "<=",
            FilterOperator::Gt => ">",
            FilterOperator::Gte => ">=",
        }
    }
}

/// A server-side value filter forwarded to the history endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyFilter {
    pub name: String,
    pub op: FilterOperator,
    pub value: DataValue,
}

impl PropertyFilter {
    pub fn eq(name: impl Into<String>, value: impl Into<DataValue>) -> Self {
        Self {
            name: name.into(),
            op: FilterOperator::Eq,
            value: value.into(),
        }
    }
}

/// Filter for the entity-listing endpoint.
///
/// Exactly one field is normally set per entry; the external-id form is
/// what the identity resolver uses for its lookup-join.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_type_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_entity_id: Option<String>,
}

impl EntityFilter {
    pub fn external_id(id: impl Into<String>) -> Self {
        Self {
            external_id: Some(id.into()),
            ..Default::default()
        }
    }
}

/// A selected property, with an optional display-name override applied
/// by the frame layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySelection {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl PropertySelection {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
        }
    }
}

/// Query time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// One read against the remote twin API.
///
/// Scope is either `entity_id` + `component_name` (a known entity) or
/// `component_type_id` (an abstract type spanning unknown entities).
/// `max_results == 0` means unlimited.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TwinQuery {
    pub workspace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_type_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertySelection>,
    #[serde(rename = "filter", skip_serializing_if = "Vec::is_empty")]
    pub property_filter: Vec<PropertyFilter>,
    #[serde(rename = "listEntitiesFilter", skip_serializing_if = "Vec::is_empty")]
    pub entity_filter: Vec<EntityFilter>,
    pub order: ResultOrder,
    pub max_results: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    pub time_range: TimeRange,
}

impl TwinQuery {
    pub fn new(workspace_id: impl Into<String>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            ..Default::default()
        }
    }

    /// Look up the display-name override for a property, if any.
    pub fn display_name_for(&self, property: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == property)
            .and_then(|p| p.display_name.as_deref())
    }

    /// Cache key for an idempotent read, or `None` when the query is
    /// not cacheable.
    ///
    /// A query carrying a continuation token is never cacheable: page
    /// continuations are request-specific and must not be served
    /// stale. The key covers every field that changes the upstream
    /// response - scope, selected properties, filters and ordering.
    pub fn cache_key(&self, operation: &str) -> Option<String> {
        if self.next_token.as_deref().is_some_and(|t| !t.is_empty()) {
            return None;
        }

        let mut key = format!(
            "{}~{}/{}/{}/{}",
            operation,
            self.workspace_id,
            self.entity_id.as_deref().unwrap_or(""),
            self.component_name.as_deref().unwrap_or(""),
            self.component_type_id.as_deref().unwrap_or(""),
        );

        for p in &self.properties {
            key.push('#');
            key.push_str(&p.name);
        }
        for f in &self.property_filter {
            key.push('!');
            key.push_str(&f.name);
            key.push_str(f.op.as_str());
            key.push_str(&f.value.display_string());
        }
        for ef in &self.entity_filter {
            key.push('&');
            key.push_str(ef.external_id.as_deref().unwrap_or(""));
        }
        key.push('@');
        key.push_str(match self.order {
            ResultOrder::Ascending => "ASCENDING",
            ResultOrder::Descending => "DESCENDING",
        });

        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_query() -> TwinQuery {
        let mut q = TwinQuery::new("factory");
        q.entity_id = Some("mixer-1".to_string());
        q.component_name = Some("AlarmComponent".to_string());
        q.properties = vec![PropertySelection::named("alarm_status")];
        q
    }

    #[test]
    fn test_cache_key_is_deterministic() {
        assert_eq!(
            base_query().cache_key("GetEntity"),
            base_query().cache_key("GetEntity")
        );
    }

    #[test]
    fn test_cache_key_varies_with_scope_and_operation() {
        let a = base_query().cache_key("GetEntity").unwrap();
        let b = base_query().cache_key("ListEntities").unwrap();
        assert_ne!(a, b);

        let mut other = base_query();
        other.entity_id = Some("mixer-2".to_string());
        assert_ne!(a, other.cache_key("GetEntity").unwrap());
    }

    #[test]
    fn test_cache_key_covers_filters_and_order() {
        let plain = base_query().cache_key("History").unwrap();

        let mut filtered = base_query();
        filtered.property_filter = vec![PropertyFilter::eq("alarm_status", "ACTIVE")];
        assert_ne!(plain, filtered.cache_key("History").unwrap());

        let mut descending = base_query();
        descending.order = ResultOrder::Descending;
        assert_ne!(plain, descending.cache_key("History").unwrap());
    }

    #[test]
    fn test_continuation_token_disables_caching() {
        let mut q = base_query();
        q.next_token = Some("page-2".to_string());
        assert_eq!(q.cache_key("ListEntities"), None);
    }

    #[test]
    fn test_clone_does_not_alias_caller_query() {
        let original = base_query();
        let mut effective = original.clone();
        effective.entity_id = None;
        effective.component_type_id = Some("alarm.basic".to_string());
        assert_eq!(original.entity_id.as_deref(), Some("mixer-1"));
    }

    #[test]
    fn test_display_name_override_lookup() {
        let mut q = base_query();
        q.properties = vec![PropertySelection {
            name: "alarm_status".to_string(),
            display_name: Some("Status".to_string()),
        }];
        assert_eq!(q.display_name_for("alarm_status"), Some("Status"));
        assert_eq!(q.display_name_for("temperature"), None);
    }
}
