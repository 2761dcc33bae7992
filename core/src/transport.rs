//! Executes `HttpRequest` values over the network with `reqwest`.
//!
//! # Design
//! The transport only moves bytes. It never interprets the status code, so a
//! 404 comes back as an ordinary `HttpResponse` and the `ScriptsClient`
//! parse methods decide what it means. Only failures that produce no
//! response at all become `ApiError::Transport`.

use reqwest::Method;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an existing `reqwest::Client`, e.g. one with custom TLS roots.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    pub async fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = req.method.as_str(), url = %req.url, "sending scripts request");

        let mut builder = self.http.request(method(req.method), &req.url);
        for (key, value) in &req.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(url = %req.url, error = %e, "scripts request did not complete");
            ApiError::from(e)
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response.text().await.map_err(|e| {
            tracing::warn!(url = %req.url, status, error = %e, "failed to read response body");
            ApiError::from(e)
        })?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn method(m: HttpMethod) -> Method {
    match m {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Delete => Method::DELETE,
    }
}
