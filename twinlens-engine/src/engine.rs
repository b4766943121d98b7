//! Query entry points
//!
//! [`HistoryEngine`] owns the remote client seam and exposes the
//! resolved-history operations consumed by the frame-building layer.
//! Every operation works on its own clone of the caller's query; no
//! state is shared between concurrent queries beyond whatever cache
//! the supplied client carries.

use crate::history::AggregationMode;
use std::sync::Arc;
use twinlens_client::TwinClient;
use twinlens_core::{
    AlarmConfig, HistoryPage, Notice, PropertyValueOutput, QueryError, ResolvedPropertyValue,
    TwinQuery, TwinResult,
};

/// Output shape handed to the frame layer: resolved rows plus the
/// partial-failure side channel.
#[derive(Debug, Clone, Default)]
pub struct ResolvedHistory {
    pub rows: Vec<ResolvedPropertyValue>,
    pub warnings: Vec<Notice>,
    pub next_token: Option<String>,
}

pub struct HistoryEngine {
    pub(crate) client: Arc<dyn TwinClient>,
    pub(crate) alarms: AlarmConfig,
}

impl HistoryEngine {
    pub fn new(client: Arc<dyn TwinClient>) -> Self {
        Self::with_alarm_config(client, AlarmConfig::default())
    }

    pub fn with_alarm_config(client: Arc<dyn TwinClient>, alarms: AlarmConfig) -> Self {
        Self { client, alarms }
    }

    /// History for a known entity. One remote call; pagination is
    /// driven by the caller through the returned token.
    pub async fn entity_history(&self, query: &TwinQuery) -> TwinResult<HistoryPage> {
        if query.entity_id.as_deref().unwrap_or("").is_empty() {
            return Err(QueryError::MissingEntityId.into());
        }
        self.client.get_property_value_history(query).await
    }

    /// Full history for every entity carrying a component of the
    /// query's component type, with identities reconciled.
    pub async fn component_history(&self, query: &TwinQuery) -> TwinResult<ResolvedHistory> {
        self.component_history_with_lookup(query, AggregationMode::Full)
            .await
    }

    /// Latest value per series for the query's component type, with
    /// identities reconciled. Honors `max_results` without walking
    /// more pages than needed.
    pub async fn latest_component_history(&self, query: &TwinQuery) -> TwinResult<ResolvedHistory> {
        self.component_history_with_lookup(query, AggregationMode::LatestOnly)
            .await
    }

    /// Current value of a non-timeseries property. Never cached.
    pub async fn property_value(&self, query: &TwinQuery) -> TwinResult<PropertyValueOutput> {
        self.client.get_property_value(query).await
    }

    pub(crate) async fn component_history_with_lookup(
        &self,
        query: &TwinQuery,
        mode: AggregationMode,
    ) -> TwinResult<ResolvedHistory> {
        let component_type_id = match query.component_type_id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => return Err(QueryError::MissingComponentTypeId.into()),
        };

        let component_type = self.client.get_component_type(query).await?;
        let definitions = component_type.property_definitions;

        let page = self
            .aggregate_history(query, mode, Some(&definitions))
            .await?;
        let (rows, warnings) = self
            .resolve_rows(query, page.property_values, &component_type_id, &definitions)
            .await?;

        Ok(ResolvedHistory {
            rows,
            warnings,
            next_token: page.next_token,
        })
    }
}
