//! Identity resolution (lookup-join)
//!
//! History rows scoped by component type come back identified only by
//! an opaque external id. Recovering the internal identity takes a
//! two-hop join: find the entity by external id, fetch its detail,
//! then match the component whose external-id property equals the
//! row's external id.

use crate::engine::HistoryEngine;
use tracing::warn;
use twinlens_core::{
    DataValue, EntityDetail, EntityFilter, Notice, PropertyDefinitions, PropertyValueHistory,
    ResolutionError, ResolvedPropertyValue, TwinQuery, TwinResult,
};

impl HistoryEngine {
    /// Reconcile externally-keyed history rows to internal identities.
    ///
    /// Fetches the property definitions for `component_type_id` and
    /// joins each row. See [`HistoryEngine::resolve_rows`] for the
    /// per-row error semantics.
    pub async fn resolve_history(
        &self,
        query: &TwinQuery,
        rows: Vec<PropertyValueHistory>,
        component_type_id: &str,
    ) -> TwinResult<(Vec<ResolvedPropertyValue>, Vec<Notice>)> {
        let mut type_query = query.clone();
        type_query.component_type_id = Some(component_type_id.to_string());
        let component_type = self.client.get_component_type(&type_query).await?;
        self.resolve_rows(query, rows, component_type_id, &component_type.property_definitions)
            .await
    }

    /// Join each row against the entity endpoints.
    ///
    /// Error semantics, per row:
    /// - zero entities match the external id: hard error for the whole
    ///   resolution (the entity must exist);
    /// - the entity-listing or entity-detail call itself fails: a
    ///   warning notice is recorded, the row is dropped, and the rest
    ///   of the batch continues;
    /// - no component of the entity matches the external id: the
    ///   resolved `component_name` stays empty, which is not an error.
    ///
    /// When several entities share one external id the first returned
    /// entity wins; this mirrors the upstream behavior and is a known
    /// open question, not a guarantee.
    pub(crate) async fn resolve_rows(
        &self,
        query: &TwinQuery,
        rows: Vec<PropertyValueHistory>,
        component_type_id: &str,
        definitions: &PropertyDefinitions,
    ) -> TwinResult<(Vec<ResolvedPropertyValue>, Vec<Notice>)> {
        let mut resolved = Vec::with_capacity(rows.len());
        let mut warnings = Vec::new();

        for row in rows {
            let reference = &row.entity_property_reference;

            // Directly-referenced rows need no join.
            if !reference.is_external_only() {
                resolved.push(ResolvedPropertyValue {
                    entity_id: reference.entity_id.clone().unwrap_or_default(),
                    entity_name: None,
                    component_name: reference.component_name.clone().unwrap_or_default(),
                    external_id_property: reference.external_id_property.clone(),
                    property_name: reference.property_name.clone(),
                    values: row.values,
                });
                continue;
            }

            let external_id = reference
                .external_id_property
                .iter()
                .find(|(name, _)| definitions.get(*name).is_some_and(|d| d.is_external_id))
                .map(|(_, value)| value.clone())
                .unwrap_or_default();

            // Look the entity up by external id alone, dropping every
            // other filter the caller supplied.
            let mut lookup = query.clone();
            lookup.entity_id = None;
            lookup.component_type_id = None;
            lookup.properties.clear();
            lookup.property_filter.clear();
            lookup.next_token = None;
            lookup.entity_filter = vec![EntityFilter::external_id(&external_id)];

            let page = match self.client.list_entities(&lookup).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(external_id = %external_id, error = %e, "entity lookup failed");
                    warnings.push(Notice::warning(e.to_string()));
                    continue;
                }
            };

            let Some(summary) = page.entity_summaries.first() else {
                return Err(ResolutionError::NoEntityForExternalId { external_id }.into());
            };

            let mut detail_query = query.clone();
            detail_query.entity_id = Some(summary.entity_id.clone());
            let entity = match self.client.get_entity(&detail_query).await {
                Ok(entity) => entity,
                Err(e) => {
                    warn!(entity_id = %summary.entity_id, error = %e, "entity detail fetch failed");
                    warnings.push(Notice::warning(e.to_string()));
                    continue;
                }
            };

            let component_name = match_component(&entity, component_type_id, &external_id);

            resolved.push(ResolvedPropertyValue {
                entity_id: summary.entity_id.clone(),
                entity_name: Some(summary.entity_name.clone()),
                component_name,
                external_id_property: reference.external_id_property.clone(),
                property_name: reference.property_name.clone(),
                values: row.values,
            });
        }

        Ok((resolved, warnings))
    }
}

/// Name of the component whose type matches and whose
/// external-id-flagged property value equals `external_id`, or empty.
fn match_component(entity: &EntityDetail, component_type_id: &str, external_id: &str) -> String {
    for (name, component) in &entity.components {
        if component.component_type_id != component_type_id {
            continue;
        }
        let matches = component.properties.values().any(|property| {
            property.definition.is_external_id
                && property.value.as_ref().and_then(DataValue::as_str) == Some(external_id)
        });
        if matches {
            return name.clone();
        }
    }
    String::new()
}
