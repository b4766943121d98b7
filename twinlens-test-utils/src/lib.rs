//! twinlens test utilities
//!
//! A scripted [`MockTwinClient`] plus fixture builders, shared by the
//! client and engine test suites. The mock serves queued pages per
//! operation, supports per-key error injection for the lookup-join
//! endpoints, and records every query it receives so tests can assert
//! on forwarded scope and filters.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Mutex;
use twinlens_client::TwinClient;
use twinlens_core::{
    BatchPutOutput, ClientError, ComponentTypeDetail, ComponentTypePage, ComponentTypeSummary,
    DataValue, EntityDetail, EntityPage, EntityPropertyReference, EntitySummary, HistoryPage,
    PropertyDefinition, PropertyValueEntry, PropertyValueHistory, PropertyValueOutput,
    PropertyValueSample, ScenePage, TwinError, TwinQuery, TwinResult, WorkspacePage,
    WorkspaceSummary,
};

// ============================================================================
// MOCK CLIENT
// ============================================================================

#[derive(Default)]
struct MockState {
    history_pages: VecDeque<TwinResult<HistoryPage>>,
    component_type_pages: VecDeque<TwinResult<ComponentTypePage>>,
    component_types: HashMap<String, TwinResult<ComponentTypeDetail>>,
    entity_pages_by_external_id: HashMap<String, TwinResult<EntityPage>>,
    entity_details: HashMap<String, TwinResult<EntityDetail>>,
    workspace_pages: VecDeque<TwinResult<WorkspacePage>>,
    scene_pages: VecDeque<TwinResult<ScenePage>>,
    property_values: VecDeque<TwinResult<PropertyValueOutput>>,
    batch_puts: Vec<Vec<PropertyValueEntry>>,
    log: Vec<(String, TwinQuery)>,
}

/// Scripted in-memory [`TwinClient`].
#[derive(Default)]
pub struct MockTwinClient {
    state: Mutex<MockState>,
}

impl MockTwinClient {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Scripting
    // ------------------------------------------------------------------

    /// Queue a history page; pages are served in queue order.
    pub fn push_history_page(&self, page: HistoryPage) {
        self.lock().history_pages.push_back(Ok(page));
    }

    pub fn push_history_error(&self, error: TwinError) {
        self.lock().history_pages.push_back(Err(error));
    }

    pub fn push_component_type_page(&self, page: ComponentTypePage) {
        self.lock().component_type_pages.push_back(Ok(page));
    }

    pub fn push_component_type_page_error(&self, error: TwinError) {
        self.lock().component_type_pages.push_back(Err(error));
    }

    pub fn insert_component_type(&self, detail: ComponentTypeDetail) {
        let id = detail.component_type_id.clone();
        self.lock().component_types.insert(id, Ok(detail));
    }

    /// Script the entity listing served for an external-id filter.
    pub fn insert_entity_lookup(&self, external_id: impl Into<String>, page: EntityPage) {
        self.lock()
            .entity_pages_by_external_id
            .insert(external_id.into(), Ok(page));
    }

    pub fn fail_entity_lookup(&self, external_id: impl Into<String>, error: TwinError) {
        self.lock()
            .entity_pages_by_external_id
            .insert(external_id.into(), Err(error));
    }

    pub fn insert_entity_detail(&self, detail: EntityDetail) {
        let id = detail.entity_id.clone();
        self.lock().entity_details.insert(id, Ok(detail));
    }

    pub fn fail_entity_detail(&self, entity_id: impl Into<String>, error: TwinError) {
        self.lock().entity_details.insert(entity_id.into(), Err(error));
    }

    pub fn push_workspace_page(&self, page: WorkspacePage) {
        self.lock().workspace_pages.push_back(Ok(page));
    }

    pub fn push_scene_page(&self, page: ScenePage) {
        self.lock().scene_pages.push_back(Ok(page));
    }

    pub fn push_property_value(&self, output: PropertyValueOutput) {
        self.lock().property_values.push_back(Ok(output));
    }

    // ------------------------------------------------------------------
    // Assertions
    // ------------------------------------------------------------------

    /// Number of calls recorded for one operation name.
    pub fn call_count(&self, operation: &str) -> usize {
        self.lock().log.iter().filter(|(op, _)| op == operation).count()
    }

    /// Queries recorded for one operation, in call order.
    pub fn queries_for(&self, operation: &str) -> Vec<TwinQuery> {
        self.lock()
            .log
            .iter()
            .filter(|(op, _)| op == operation)
            .map(|(_, q)| q.clone())
            .collect()
    }

    /// Entries forwarded to the batch write endpoint.
    pub fn batch_put_entries(&self) -> Vec<Vec<PropertyValueEntry>> {
        self.lock().batch_puts.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    fn record(&self, operation: &str, query: &TwinQuery) {
        self.lock().log.push((operation.to_string(), query.clone()));
    }

    fn unscripted(operation: &str) -> TwinError {
        ClientError::InvalidResponse {
            operation: operation.to_string(),
            reason: "no scripted response".to_string(),
        }
        .into()
    }
}

#[async_trait]
impl TwinClient for MockTwinClient {
    async fn list_workspaces(&self, query: &TwinQuery) -> TwinResult<WorkspacePage> {
        self.record("ListWorkspaces", query);
        self.lock()
            .workspace_pages
            .pop_front()
            .unwrap_or_else(|| Ok(WorkspacePage::default()))
    }

    async fn get_workspace(&self, query: &TwinQuery) -> TwinResult<WorkspaceSummary> {
        self.record("GetWorkspace", query);
        Ok(WorkspaceSummary {
            workspace_id: query.workspace_id.clone(),
            ..Default::default()
        })
    }

    async fn list_scenes(&self, query: &TwinQuery) -> TwinResult<ScenePage> {
        self.record("ListScenes", query);
        self.lock()
            .scene_pages
            .pop_front()
            .unwrap_or_else(|| Ok(ScenePage::default()))
    }

    async fn list_entities(&self, query: &TwinQuery) -> TwinResult<EntityPage> {
        self.record("ListEntities", query);
        let external_id = query
            .entity_filter
            .iter()
            .find_map(|f| f.external_id.clone())
            .unwrap_or_default();
        self.lock()
            .entity_pages_by_external_id
            .get(&external_id)
            .cloned()
            .unwrap_or_else(|| Ok(EntityPage::default()))
    }

    async fn list_component_types(&self, query: &TwinQuery) -> TwinResult<ComponentTypePage> {
        self.record("ListComponentTypes", query);
        self.lock()
            .component_type_pages
            .pop_front()
            .unwrap_or_else(|| Ok(ComponentTypePage::default()))
    }

    async fn get_component_type(&self, query: &TwinQuery) -> TwinResult<ComponentTypeDetail> {
        self.record("GetComponentType", query);
        let id = query.component_type_id.clone().unwrap_or_default();
        self.lock()
            .component_types
            .get(&id)
            .cloned()
            .unwrap_or_else(|| Err(Self::unscripted("GetComponentType")))
    }

    async fn get_entity(&self, query: &TwinQuery) -> TwinResult<EntityDetail> {
        self.record("GetEntity", query);
        let id = query.entity_id.clone().unwrap_or_default();
        self.lock()
            .entity_details
            .get(&id)
            .cloned()
            .unwrap_or_else(|| Err(Self::unscripted("GetEntity")))
    }

    async fn get_property_value(&self, query: &TwinQuery) -> TwinResult<PropertyValueOutput> {
        self.record("GetPropertyValue", query);
        self.lock()
            .property_values
            .pop_front()
            .unwrap_or_else(|| Ok(PropertyValueOutput::default()))
    }

    async fn get_property_value_history(&self, query: &TwinQuery) -> TwinResult<HistoryPage> {
        self.record("GetPropertyValueHistory", query);
        self.lock()
            .history_pages
            .pop_front()
            .unwrap_or_else(|| Ok(HistoryPage::default()))
    }

    async fn batch_put_property_values(
        &self,
        _workspace_id: &str,
        entries: &[PropertyValueEntry],
    ) -> TwinResult<BatchPutOutput> {
        self.lock().batch_puts.push(entries.to_vec());
        Ok(BatchPutOutput::default())
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub fn sample(time: &str, value: impl Into<DataValue>) -> PropertyValueSample {
    PropertyValueSample {
        time: time.to_string(),
        value: value.into(),
    }
}

/// A history row with a direct entity/component reference.
pub fn direct_row(
    entity_id: &str,
    component_name: &str,
    property_name: &str,
    values: Vec<PropertyValueSample>,
) -> PropertyValueHistory {
    PropertyValueHistory {
        entity_property_reference: EntityPropertyReference {
            entity_id: Some(entity_id.to_string()),
            component_name: Some(component_name.to_string()),
            property_name: Some(property_name.to_string()),
            ..Default::default()
        },
        values,
    }
}

/// A history row identified only by an external id.
pub fn external_row(
    external_id_key: &str,
    external_id: &str,
    property_name: &str,
    values: Vec<PropertyValueSample>,
) -> PropertyValueHistory {
    let mut external_id_property = BTreeMap::new();
    external_id_property.insert(external_id_key.to_string(), external_id.to_string());
    PropertyValueHistory {
        entity_property_reference: EntityPropertyReference {
            external_id_property,
            property_name: Some(property_name.to_string()),
            ..Default::default()
        },
        values,
    }
}

pub fn history_page(
    rows: Vec<PropertyValueHistory>,
    next_token: Option<&str>,
) -> HistoryPage {
    HistoryPage {
        property_values: rows,
        next_token: next_token.map(str::to_string),
    }
}

/// A component type whose schema matches the alarm shape: an
/// external-id key property and a time-series status property.
pub fn alarm_component_type(
    component_type_id: &str,
    external_id_key: &str,
    alarm_property: &str,
) -> ComponentTypeDetail {
    let mut property_definitions = BTreeMap::new();
    property_definitions.insert(
        external_id_key.to_string(),
        PropertyDefinition {
            data_type: Some("STRING".to_string()),
            is_external_id: true,
            ..Default::default()
        },
    );
    property_definitions.insert(
        alarm_property.to_string(),
        PropertyDefinition {
            data_type: Some("STRING".to_string()),
            is_time_series: true,
            ..Default::default()
        },
    );
    ComponentTypeDetail {
        component_type_id: component_type_id.to_string(),
        property_definitions,
        ..Default::default()
    }
}

pub fn component_type_page(ids: &[&str], next_token: Option<&str>) -> ComponentTypePage {
    ComponentTypePage {
        component_type_summaries: ids
            .iter()
            .map(|id| ComponentTypeSummary {
                component_type_id: id.to_string(),
                ..Default::default()
            })
            .collect(),
        next_token: next_token.map(str::to_string),
    }
}

pub fn entity_page(entries: &[(&str, &str)]) -> EntityPage {
    EntityPage {
        entity_summaries: entries
            .iter()
            .map(|(id, name)| EntitySummary {
                entity_id: id.to_string(),
                entity_name: name.to_string(),
                ..Default::default()
            })
            .collect(),
        next_token: None,
    }
}

/// An entity carrying one component of `component_type_id` whose
/// external-id property equals `external_id`.
pub fn entity_with_component(
    entity_id: &str,
    entity_name: &str,
    component_name: &str,
    component_type_id: &str,
    external_id_key: &str,
    external_id: &str,
) -> EntityDetail {
    use twinlens_core::{ComponentDetail, PropertyEntry};

    let mut properties = BTreeMap::new();
    properties.insert(
        external_id_key.to_string(),
        PropertyEntry {
            definition: PropertyDefinition {
                data_type: Some("STRING".to_string()),
                is_external_id: true,
                ..Default::default()
            },
            value: Some(DataValue::Str(external_id.to_string())),
        },
    );

    let mut components = BTreeMap::new();
    components.insert(
        component_name.to_string(),
        ComponentDetail {
            component_type_id: component_type_id.to_string(),
            description: None,
            properties,
        },
    );

    EntityDetail {
        entity_id: entity_id.to_string(),
        entity_name: entity_name.to_string(),
        description: None,
        components,
    }
}
