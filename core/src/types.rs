//! Domain records shared with the web UI backend.
//!
//! # Design
//! These types mirror the backend's schema but are defined independently of
//! the mock-server crate. Integration tests catch any drift between the two.
//! Fields whose shape the backend does not pin down (`User::info`) stay as
//! `serde_json::Value` rather than guessing a structure. Fields the backend
//! sends that these records do not name are kept in `extra` and written back
//! out unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Free-form metadata attached to a script.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScriptMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<BTreeMap<String, String>>,
}

/// A full script record, including its content.
///
/// `id`, `owner_id` and both timestamps are assigned by the backend. The
/// owner travels as `user_id` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Script {
    pub id: String,
    pub name: String,
    pub content: String,
    #[serde(rename = "user_id", alias = "owner_id")]
    pub owner_id: String,
    /// Unix seconds.
    pub created_at: i64,
    /// Unix seconds.
    pub updated_at: i64,
    #[serde(default)]
    pub meta: ScriptMeta,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The list representation of a script: everything except `content`. A
/// backend that sends `content` in lists anyway has it kept in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScriptBrief {
    pub id: String,
    pub name: String,
    #[serde(rename = "user_id", alias = "owner_id")]
    pub owner_id: String,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default)]
    pub meta: ScriptMeta,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl From<Script> for ScriptBrief {
    fn from(script: Script) -> Self {
        Self {
            id: script.id,
            name: script.name,
            owner_id: script.owner_id,
            created_at: script.created_at,
            updated_at: script.updated_at,
            meta: script.meta,
            extra: script.extra,
        }
    }
}

/// Request payload for creating or updating a script.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScriptForm {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub meta: ScriptMeta,
}

/// A UI banner. Display-only; the client has no operations on banners.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Banner {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dismissible: Option<bool>,
    pub timestamp: i64,
}

/// A user account as seen by the client. Read-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: String,
    pub email: String,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default)]
    pub info: serde_json::Value,
}
