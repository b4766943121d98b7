//! The remote twin API seam
//!
//! [`TwinClient`] is the boundary between the resolution engine and
//! the remote graph/time-series service. Implementations return raw
//! typed pages and never retry; retry policy belongs to the caller.
//! Paginated calls surface an explicit continuation token.

use async_trait::async_trait;
use twinlens_core::{
    BatchPutOutput, ComponentTypeDetail, ComponentTypePage, EntityDetail, EntityPage, HistoryPage,
    PropertyValueEntry, PropertyValueOutput, ScenePage, TwinQuery, TwinResult, WorkspacePage,
    WorkspaceSummary,
};

#[async_trait]
pub trait TwinClient: Send + Sync {
    async fn list_workspaces(&self, query: &TwinQuery) -> TwinResult<WorkspacePage>;

    async fn get_workspace(&self, query: &TwinQuery) -> TwinResult<WorkspaceSummary>;

    async fn list_scenes(&self, query: &TwinQuery) -> TwinResult<ScenePage>;

    async fn list_entities(&self, query: &TwinQuery) -> TwinResult<EntityPage>;

    async fn list_component_types(&self, query: &TwinQuery) -> TwinResult<ComponentTypePage>;

    async fn get_component_type(&self, query: &TwinQuery) -> TwinResult<ComponentTypeDetail>;

    async fn get_entity(&self, query: &TwinQuery) -> TwinResult<EntityDetail>;

    /// NOTE: only works with non-timeseries data.
    async fn get_property_value(&self, query: &TwinQuery) -> TwinResult<PropertyValueOutput>;

    /// NOTE: only works with timeseries data.
    async fn get_property_value_history(&self, query: &TwinQuery) -> TwinResult<HistoryPage>;

    async fn batch_put_property_values(
        &self,
        workspace_id: &str,
        entries: &[PropertyValueEntry],
    ) -> TwinResult<BatchPutOutput>;
}

#[async_trait]
impl<T: TwinClient + ?Sized> TwinClient for std::sync::Arc<T> {
    async fn list_workspaces(&self, query: &TwinQuery) -> TwinResult<WorkspacePage> {
        (**self).list_workspaces(query).await
    }

    async fn get_workspace(&self, query: &TwinQuery) -> TwinResult<WorkspaceSummary> {
        (**self).get_workspace(query).await
    }

    async fn list_scenes(&self, query: &TwinQuery) -> TwinResult<ScenePage> {
        (**self).list_scenes(query).await
    }

    async fn list_entities(&self, query: &TwinQuery) -> TwinResult<EntityPage> {
        (**self).list_entities(query).await
    }

    async fn list_component_types(&self, query: &TwinQuery) -> TwinResult<ComponentTypePage> {
        (**self).list_component_types(query).await
    }

    async fn get_component_type(&self, query: &TwinQuery) -> TwinResult<ComponentTypeDetail> {
        (**self).get_component_type(query).await
    }

    async fn get_entity(&self, query: &TwinQuery) -> TwinResult<EntityDetail> {
        (**self).get_entity(query).await
    }

    async fn get_property_value(&self, query: &TwinQuery) -> TwinResult<PropertyValueOutput> {
        (**self).get_property_value(query).await
    }

    async fn get_property_value_history(&self, query: &TwinQuery) -> TwinResult<HistoryPage> {
        (**self).get_property_value_history(query).await
    }

    async fn batch_put_property_values(
        &self,
        workspace_id: &str,
        entries: &[PropertyValueEntry],
    ) -> TwinResult<BatchPutOutput> {
        (**self).batch_put_property_values(workspace_id, entries).await
    }
}
