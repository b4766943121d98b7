//! HTTP implementation of [`TwinClient`]
//!
//! Each operation is a JSON POST against the configured endpoint. No
//! retries: a transport or non-2xx response surfaces as a
//! [`ClientError`] and the caller owns retry policy. Cancellation is
//! cooperative - dropping the future aborts the in-flight request.

use crate::api::TwinClient;
use crate::settings::TwinSettings;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use twinlens_core::{
    BatchPutOutput, ClientError, ComponentTypeDetail, ComponentTypePage, EntityDetail, EntityPage,
    HistoryPage, PropertyValueEntry, PropertyValueOutput, ScenePage, TwinQuery, TwinResult,
    WorkspacePage, WorkspaceSummary,
};

pub struct HttpTwinClient {
    client: Client,
    settings: TwinSettings,
}

impl HttpTwinClient {
    pub fn new(settings: TwinSettings) -> TwinResult<Self> {
        settings.validate()?;
        Ok(Self {
            client: Client::new(),
            settings,
        })
    }

    async fn post_json<Req: Serialize, Res: DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
        body: &Req,
    ) -> TwinResult<Res> {
        let url = format!("{}/{}", self.settings.endpoint.trim_end_matches('/'), path);
        debug!(operation, %url, "twin api request");

        let mut request = self.client.post(&url).json(body);
        if let Some(token) = &self.settings.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            ClientError::transport(operation, e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::RequestFailed {
                operation: operation.to_string(),
                status: status.as_u16(),
                message,
            }
            .into());
        }

        response.json().await.map_err(|e| {
            ClientError::InvalidResponse {
                operation: operation.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

#[async_trait]
impl TwinClient for HttpTwinClient {
    async fn list_workspaces(&self, query: &TwinQuery) -> TwinResult<WorkspacePage> {
        self.post_json("ListWorkspaces", "workspaces/list", query).await
    }

    async fn get_workspace(&self, query: &TwinQuery) -> TwinResult<WorkspaceSummary> {
        self.post_json("GetWorkspace", "workspaces/get", query).await
    }

    async fn list_scenes(&self, query: &TwinQuery) -> TwinResult<ScenePage> {
        self.post_json("ListScenes", "scenes/list", query).await
    }

    async fn list_entities(&self, query: &TwinQuery) -> TwinResult<EntityPage> {
        self.post_json("ListEntities", "entities/list", query).await
    }

    async fn list_component_types(&self, query: &TwinQuery) -> TwinResult<ComponentTypePage> {
        self.post_json("ListComponentTypes", "component-types/list", query)
            .await
    }

    async fn get_component_type(&self, query: &TwinQuery) -> TwinResult<ComponentTypeDetail> {
        self.post_json("GetComponentType", "component-types/get", query)
            .await
    }

    async fn get_entity(&self, query: &TwinQuery) -> TwinResult<EntityDetail> {
        self.post_json("GetEntity", "entities/get", query).await
    }

    async fn get_property_value(&self, query: &TwinQuery) -> TwinResult<PropertyValueOutput> {
        self.post_json("GetPropertyValue", "properties/value", query)
            .await
    }

    async fn get_property_value_history(&self, query: &TwinQuery) -> TwinResult<HistoryPage> {
        self.post_json("GetPropertyValueHistory", "properties/history", query)
            .await
    }

    async fn batch_put_property_values(
        &self,
        workspace_id: &str,
        entries: &[PropertyValueEntry],
    ) -> TwinResult<BatchPutOutput> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct BatchPutRequest<'a> {
            workspace_id: &'a str,
            entries: &'a [PropertyValueEntry],
        }

        self.post_json(
            "BatchPutPropertyValues",
            "properties/batch-put",
            &BatchPutRequest {
                workspace_id,
                entries,
            },
        )
        .await
    }
}

impl std::fmt::Debug for HttpTwinClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTwinClient")
            .field("endpoint", &self.settings.endpoint)
            .field("workspace_id", &self.settings.workspace_id)
            .field("auth_token", &"[REDACTED]")
            .finish()
    }
}
