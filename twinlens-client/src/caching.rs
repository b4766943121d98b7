//! Caching decorator for a [`TwinClient`]
//!
//! Wraps the read surface with per-operation TTL caches keyed by
//! [`TwinQuery::cache_key`]. History and property-value reads and all
//! writes pass straight through: time-series data and writes are never
//! safe to serve stale.

use crate::api::TwinClient;
use crate::cache::TtlCache;
use async_trait::async_trait;
use std::time::Duration;
use twinlens_core::{
    BatchPutOutput, ComponentTypeDetail, ComponentTypePage, EntityDetail, EntityPage, HistoryPage,
    PropertyValueEntry, PropertyValueOutput, ScenePage, TwinQuery, TwinResult, WorkspacePage,
    WorkspaceSummary,
};

pub struct CachingClient<C> {
    inner: C,
    workspaces: TtlCache<WorkspacePage>,
    workspace: TtlCache<WorkspaceSummary>,
    scenes: TtlCache<ScenePage>,
    entities: TtlCache<EntityPage>,
    component_types: TtlCache<ComponentTypePage>,
    component_type: TtlCache<ComponentTypeDetail>,
    entity: TtlCache<EntityDetail>,
}

impl<C: TwinClient> CachingClient<C> {
    pub fn new(inner: C, ttl: Duration) -> Self {
        Self {
            inner,
            workspaces: TtlCache::new(ttl),
            workspace: TtlCache::new(ttl),
            scenes: TtlCache::new(ttl),
            entities: TtlCache::new(ttl),
            component_types: TtlCache::new(ttl),
            component_type: TtlCache::new(ttl),
            entity: TtlCache::new(ttl),
        }
    }

    /// The wrapped client.
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: TwinClient> TwinClient for CachingClient<C> {
    async fn list_workspaces(&self, query: &TwinQuery) -> TwinResult<WorkspacePage> {
        self.workspaces
            .get_or_fetch(query.cache_key("ListWorkspaces"), || {
                self.inner.list_workspaces(query)
            })
            .await
    }

    async fn get_workspace(&self, query: &TwinQuery) -> TwinResult<WorkspaceSummary> {
        self.workspace
            .get_or_fetch(query.cache_key("GetWorkspace"), || {
                self.inner.get_workspace(query)
            })
            .await
    }

    async fn list_scenes(&self, query: &TwinQuery) -> TwinResult<ScenePage> {
        self.scenes
            .get_or_fetch(query.cache_key("ListScenes"), || self.inner.list_scenes(query))
            .await
    }

    async fn list_entities(&self, query: &TwinQuery) -> TwinResult<EntityPage> {
        self.entities
            .get_or_fetch(query.cache_key("ListEntities"), || {
                self.inner.list_entities(query)
            })
            .await
    }

    async fn list_component_types(&self, query: &TwinQuery) -> TwinResult<ComponentTypePage> {
        self.component_types
            .get_or_fetch(query.cache_key("ListComponentTypes"), || {
                self.inner.list_component_types(query)
            })
            .await
    }

    async fn get_component_type(&self, query: &TwinQuery) -> TwinResult<ComponentTypeDetail> {
        self.component_type
            .get_or_fetch(query.cache_key("GetComponentType"), || {
                self.inner.get_component_type(query)
            })
            .await
    }

    async fn get_entity(&self, query: &TwinQuery) -> TwinResult<EntityDetail> {
        self.entity
            .get_or_fetch(query.cache_key("GetEntity"), || self.inner.get_entity(query))
            .await
    }

    async fn get_property_value(&self, query: &TwinQuery) -> TwinResult<PropertyValueOutput> {
        // not cached
        self.inner.get_property_value(query).await
    }

    async fn get_property_value_history(&self, query: &TwinQuery) -> TwinResult<HistoryPage> {
        // not cached
        self.inner.get_property_value_history(query).await
    }

    async fn batch_put_property_values(
        &self,
        workspace_id: &str,
        entries: &[PropertyValueEntry],
    ) -> TwinResult<BatchPutOutput> {
        // not cached
        self.inner.batch_put_property_values(workspace_id, entries).await
    }
}

// Tests for this module live in `tests/caching_tests.rs`: the mock in
// `twinlens-test-utils` implements `TwinClient` from the library build
// of this crate, which unit tests (a separate test build) cannot name.
