//! Error types for the scripts API client.
//!
//! # Design
//! The backend reports failures as a JSON object whose optional `detail`
//! field is the human-readable message. `Api` keeps both the extracted
//! `detail` and the raw payload, so callers can show the message and still
//! inspect anything else the backend sent. A non-JSON error body lands in
//! `MalformedErrorBody` with the raw text.

use thiserror::Error;

/// Errors returned by `ScriptsClient` parse methods and by `ScriptsApi`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned a non-2xx status with a JSON error payload.
    /// Displays as the `detail` field, or nothing when it is absent.
    #[error("{}", .detail.as_deref().unwrap_or_default())]
    Api {
        status: u16,
        detail: Option<String>,
        payload: serde_json::Value,
    },

    /// The server returned a non-2xx status and the body was not JSON.
    #[error("HTTP {status}: {body}")]
    MalformedErrorBody { status: u16, body: String },

    /// The request never produced a response, or its body could not be
    /// read. The `reqwest` error is kept as the source.
    #[error("transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 2xx body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Build the error for a non-2xx response from its status and raw body.
    pub fn from_error_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(payload) => {
                let detail = payload
                    .get("detail")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string);
                ApiError::Api {
                    status,
                    detail,
                    payload,
                }
            }
            Err(_) => ApiError::MalformedErrorBody {
                status,
                body: body.to_string(),
            },
        }
    }

    /// The message a caller would surface to a user.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status, when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } | ApiError::MalformedErrorBody { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}
