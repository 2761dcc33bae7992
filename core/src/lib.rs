//! Client for the web UI's scripts API.
//!
//! # Overview
//! `ScriptsClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network (host-does-IO pattern).
//! `ScriptsApi` pairs it with a `reqwest`-backed `HttpTransport` for callers
//! that just want one async call per operation.
//!
//! # Design
//! - `ScriptsClient` is stateless: it holds only `base_url`. The bearer token
//!   is passed to every call and sent even when empty.
//! - Any 2xx is success. Anything else becomes an `ApiError` whose message is
//!   the backend's `detail` field.
//! - `query_by_name` resolves to `None` on failure instead of returning an
//!   error; `try_query_by_name` is the raising form.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use api::ScriptsApi;
pub use client::ScriptsClient;
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::HttpTransport;
pub use types::{Banner, Script, ScriptBrief, ScriptForm, ScriptMeta, User};
