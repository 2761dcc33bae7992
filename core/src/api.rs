//! Async facade: one call per scripts operation.
//!
//! Each method builds the request with `ScriptsClient`, runs it through
//! `HttpTransport`, and parses the response. `query_by_name` is the one
//! operation that never fails: any error is traced and becomes `None`.

use serde::Serialize;

use crate::client::ScriptsClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::transport::HttpTransport;
use crate::types::{Script, ScriptBrief};

#[derive(Debug, Clone)]
pub struct ScriptsApi {
    client: ScriptsClient,
    transport: HttpTransport,
}

impl ScriptsApi {
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(ScriptsClient::new(base_url), HttpTransport::new())
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url)
    }

    pub fn with_transport(client: ScriptsClient, transport: HttpTransport) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &ScriptsClient {
        &self.client
    }

    /// Scripts whose name starts with `name`. Resolves to `None` on any
    /// failure, so `None` is ambiguous between "request failed" and
    /// nothing usable coming back.
    pub async fn query_by_name(&self, token: &str, name: &str) -> Option<Vec<ScriptBrief>> {
        match self.try_query_by_name(token, name).await {
            Ok(scripts) => Some(scripts),
            Err(err) => {
                tracing::debug!(name, error = %err, "name query failed; returning none");
                None
            }
        }
    }

    pub async fn try_query_by_name(
        &self,
        token: &str,
        name: &str,
    ) -> Result<Vec<ScriptBrief>, ApiError> {
        let req = self.client.build_query_by_name(token, name);
        let response = self.transport.execute(req).await?;
        self.client.parse_query_by_name(response)
    }

    /// Like `query_by_name`, but the items come back exactly as sent.
    pub async fn query_by_name_json(
        &self,
        token: &str,
        name: &str,
    ) -> Option<Vec<serde_json::Value>> {
        let req = self.client.build_query_by_name(token, name);
        let response = match self.transport.execute(req).await {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(name, error = %err, "name query failed; returning none");
                return None;
            }
        };
        self.client.parse_query_by_name_json(response).ok()
    }

    pub async fn create<S>(&self, token: &str, script: &S) -> Result<Script, ApiError>
    where
        S: Serialize + ?Sized,
    {
        let req = self.client.build_create(token, script)?;
        let response = self.transport.execute(req).await?;
        self.client.parse_create(response)
    }

    pub async fn list(&self, token: &str) -> Result<Vec<ScriptBrief>, ApiError> {
        let req = self.client.build_list(token);
        let response = self.transport.execute(req).await?;
        self.client.parse_list(response)
    }

    pub async fn list_json(&self, token: &str) -> Result<Vec<serde_json::Value>, ApiError> {
        let req = self.client.build_list(token);
        let response = self.transport.execute(req).await?;
        self.client.parse_list_json(response)
    }

    pub async fn get_by_id(&self, token: &str, id: &str) -> Result<Script, ApiError> {
        let req = self.client.build_get_by_id(token, id);
        let response = self.transport.execute(req).await?;
        self.client.parse_get_by_id(response)
    }

    pub async fn update_by_id<S>(&self, token: &str, id: &str, script: &S) -> Result<Script, ApiError>
    where
        S: Serialize + ?Sized,
    {
        let req = self.client.build_update_by_id(token, id, script)?;
        let response = self.transport.execute(req).await?;
        self.client.parse_update_by_id(response)
    }

    pub async fn delete_by_id(&self, token: &str, id: &str) -> Result<serde_json::Value, ApiError> {
        let req = self.client.build_delete_by_id(token, id);
        let response = self.transport.execute(req).await?;
        self.client.parse_delete_by_id(response)
    }
}
