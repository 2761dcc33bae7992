//! Stateless HTTP request builder and response parser for the scripts API.
//!
//! # Design
//! `ScriptsClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The bearer token is an argument of every `build_*` call,
//! never stored on the client.
//!
//! Every `parse_*` method treats any 2xx as success and turns anything else
//! into an `ApiError` built from the JSON error payload. Failures are traced
//! before they are returned.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Script, ScriptBrief};

/// Synchronous, stateless client for the scripts API.
#[derive(Debug, Clone)]
pub struct ScriptsClient {
    base_url: String,
}

impl ScriptsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_query_by_name(&self, token: &str, name: &str) -> HttpRequest {
        let name: String = url::form_urlencoded::byte_serialize(name.as_bytes()).collect();
        self.request(
            HttpMethod::Get,
            format!("{}/scripts/?name_like={name}", self.base_url),
            token,
            None,
        )
    }

    /// Serializes `script` as-is; the body carries exactly its fields.
    pub fn build_create<S>(&self, token: &str, script: &S) -> Result<HttpRequest, ApiError>
    where
        S: Serialize + ?Sized,
    {
        let body = to_body(script)?;
        Ok(self.request(
            HttpMethod::Post,
            format!("{}/scripts/", self.base_url),
            token,
            Some(body),
        ))
    }

    pub fn build_list(&self, token: &str) -> HttpRequest {
        self.request(
            HttpMethod::Get,
            format!("{}/scripts/", self.base_url),
            token,
            None,
        )
    }

    pub fn build_get_by_id(&self, token: &str, id: &str) -> HttpRequest {
        self.request(
            HttpMethod::Get,
            format!("{}/scripts/{id}", self.base_url),
            token,
            None,
        )
    }

    pub fn build_update_by_id<S>(
        &self,
        token: &str,
        id: &str,
        script: &S,
    ) -> Result<HttpRequest, ApiError>
    where
        S: Serialize + ?Sized,
    {
        let body = to_body(script)?;
        Ok(self.request(
            HttpMethod::Post,
            format!("{}/scripts/{id}", self.base_url),
            token,
            Some(body),
        ))
    }

    pub fn build_delete_by_id(&self, token: &str, id: &str) -> HttpRequest {
        self.request(
            HttpMethod::Delete,
            format!("{}/scripts/{id}", self.base_url),
            token,
            None,
        )
    }

    /// Raising form of the name query.
    pub fn parse_query_by_name(&self, response: HttpResponse) -> Result<Vec<ScriptBrief>, ApiError> {
        parse_json("query_by_name", response)
    }

    /// Swallowing form of the name query: any failure resolves to `None`.
    /// `None` does not tell "request failed" apart from anything else; use
    /// `parse_query_by_name` when that matters.
    pub fn parse_query_by_name_lenient(&self, response: HttpResponse) -> Option<Vec<ScriptBrief>> {
        self.parse_query_by_name(response).ok()
    }

    /// Name query results exactly as the backend sent them, for items that
    /// may not carry every `ScriptBrief` field.
    pub fn parse_query_by_name_json(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<serde_json::Value>, ApiError> {
        parse_json("query_by_name", response)
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<Script, ApiError> {
        parse_json("create", response)
    }

    pub fn parse_list(&self, response: HttpResponse) -> Result<Vec<ScriptBrief>, ApiError> {
        parse_json("list", response)
    }

    /// The list exactly as the backend sent it.
    pub fn parse_list_json(&self, response: HttpResponse) -> Result<Vec<serde_json::Value>, ApiError> {
        parse_json("list", response)
    }

    pub fn parse_get_by_id(&self, response: HttpResponse) -> Result<Script, ApiError> {
        parse_json("get_by_id", response)
    }

    pub fn parse_update_by_id(&self, response: HttpResponse) -> Result<Script, ApiError> {
        parse_json("update_by_id", response)
    }

    /// The backend's deletion result has no fixed shape (an object or a
    /// boolean), so it is returned as raw JSON.
    pub fn parse_delete_by_id(&self, response: HttpResponse) -> Result<serde_json::Value, ApiError> {
        parse_json("delete_by_id", response)
    }

    fn request(
        &self,
        method: HttpMethod,
        url: String,
        token: &str,
        body: Option<String>,
    ) -> HttpRequest {
        HttpRequest {
            method,
            url,
            headers: vec![
                ("accept".to_string(), "application/json".to_string()),
                ("content-type".to_string(), "application/json".to_string()),
                ("authorization".to_string(), format!("Bearer {token}")),
            ],
            body,
        }
    }
}

fn to_body<S: Serialize + ?Sized>(script: &S) -> Result<String, ApiError> {
    serde_json::to_string(script).map_err(|e| {
        tracing::warn!(error = %e, "failed to serialize script payload");
        ApiError::Serialization(e.to_string())
    })
}

/// Map non-success statuses to an `ApiError`, then decode the body as `T`.
fn parse_json<T: DeserializeOwned>(operation: &str, response: HttpResponse) -> Result<T, ApiError> {
    if !response.is_success() {
        let err = ApiError::from_error_body(response.status, &response.body);
        tracing::warn!(operation, status = response.status, error = ?err, "scripts request failed");
        return Err(err);
    }
    serde_json::from_str(&response.body).map_err(|e| {
        tracing::warn!(operation, status = response.status, error = %e, "unexpected response body");
        ApiError::Deserialization(e.to_string())
    })
}
