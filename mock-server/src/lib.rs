use std::{
    collections::HashMap,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Seeded credentials. Each token maps to one user.
pub const USER_TOKEN: &str = "user-token";
pub const OTHER_USER_TOKEN: &str = "other-user-token";
pub const ADMIN_TOKEN: &str = "admin-token";

pub const USER_ID: &str = "user-1";
pub const OTHER_USER_ID: &str = "user-2";
pub const ADMIN_ID: &str = "admin-1";

pub const NOT_FOUND: &str = "Script not found";
pub const NAME_TAKEN: &str = "A script with this name already exists";
pub const UNAUTHORIZED: &str = "Not authenticated";
pub const UPDATE_FAILED: &str = "Error updating script";
pub const DELETED: &str = "Script deleted successfully";

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<HashMap<String, String>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Script {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub content: String,
    pub meta: Meta,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScriptBrief {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub meta: Meta,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<&Script> for ScriptBrief {
    fn from(script: &Script) -> Self {
        Self {
            id: script.id.clone(),
            user_id: script.user_id.clone(),
            name: script.name.clone(),
            meta: script.meta.clone(),
            created_at: script.created_at,
            updated_at: script.updated_at,
        }
    }
}

#[derive(Deserialize)]
pub struct ScriptForm {
    pub name: String,
    pub content: String,
    pub meta: Meta,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub name_like: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

#[derive(Clone, Debug)]
pub struct MockUser {
    pub id: String,
    pub role: Role,
}

impl MockUser {
    fn can_touch(&self, script: &Script) -> bool {
        self.role == Role::Admin || script.user_id == self.id
    }
}

/// Scripts in insertion order, plus the token table.
#[derive(Clone)]
pub struct AppState {
    scripts: Arc<RwLock<Vec<Script>>>,
    users: Arc<HashMap<String, MockUser>>,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn error(status: StatusCode, detail: &str) -> ApiError {
    (
        status,
        Json(ErrorBody {
            detail: detail.to_string(),
        }),
    )
}

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

fn seeded_users() -> HashMap<String, MockUser> {
    [
        (USER_TOKEN, USER_ID, Role::User),
        (OTHER_USER_TOKEN, OTHER_USER_ID, Role::User),
        (ADMIN_TOKEN, ADMIN_ID, Role::Admin),
    ]
    .into_iter()
    .map(|(token, id, role)| {
        (
            token.to_string(),
            MockUser {
                id: id.to_string(),
                role,
            },
        )
    })
    .collect()
}

/// The scripts router nested under `/api/v1`, with an empty store.
pub fn app() -> Router {
    let state = AppState {
        scripts: Arc::new(RwLock::new(Vec::new())),
        users: Arc::new(seeded_users()),
    };
    let scripts = Router::new()
        .route("/scripts/", get(list_scripts).post(create_script))
        .route(
            "/scripts/{id}",
            get(get_script).post(update_script).delete(delete_script),
        )
        .with_state(state);
    Router::new().nest("/api/v1", scripts)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<MockUser, ApiError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default();
    state.users.get(token).cloned().ok_or_else(|| {
        tracing::debug!("rejected request with unknown bearer token");
        error(StatusCode::UNAUTHORIZED, UNAUTHORIZED)
    })
}

async fn list_scripts(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ScriptBrief>>, ApiError> {
    let user = authenticate(&state, &headers)?;
    let scripts = state.scripts.read().await;
    let briefs = scripts
        .iter()
        .filter(|s| user.can_touch(s))
        .filter(|s| match &params.name_like {
            Some(prefix) => s.name.starts_with(prefix.as_str()),
            None => true,
        })
        .skip(params.offset.unwrap_or(0))
        .take(params.limit.unwrap_or(usize::MAX))
        .map(ScriptBrief::from)
        .collect();
    Ok(Json(briefs))
}

async fn create_script(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(form): Json<ScriptForm>,
) -> Result<Json<Script>, ApiError> {
    let user = authenticate(&state, &headers)?;
    let mut scripts = state.scripts.write().await;
    if scripts
        .iter()
        .any(|s| s.user_id == user.id && s.name == form.name)
    {
        return Err(error(StatusCode::BAD_REQUEST, NAME_TAKEN));
    }
    let ts = now();
    let script = Script {
        id: Uuid::new_v4().to_string(),
        user_id: user.id,
        name: form.name,
        content: form.content,
        meta: form.meta,
        created_at: ts,
        updated_at: ts,
    };
    tracing::info!(id = %script.id, name = %script.name, "script created");
    scripts.push(script.clone());
    Ok(Json(script))
}

async fn get_script(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Script>, ApiError> {
    let user = authenticate(&state, &headers)?;
    let scripts = state.scripts.read().await;
    scripts
        .iter()
        .find(|s| s.id == id && user.can_touch(s))
        .cloned()
        .map(Json)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, NOT_FOUND))
}

async fn update_script(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(form): Json<ScriptForm>,
) -> Result<Json<Script>, ApiError> {
    let user = authenticate(&state, &headers)?;
    let mut scripts = state.scripts.write().await;
    let script = scripts
        .iter_mut()
        .find(|s| s.id == id && user.can_touch(s))
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, UPDATE_FAILED))?;
    script.name = form.name;
    script.content = form.content;
    script.meta = form.meta;
    script.updated_at = now();
    tracing::info!(id = %script.id, "script updated");
    Ok(Json(script.clone()))
}

async fn delete_script(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = authenticate(&state, &headers)?;
    let mut scripts = state.scripts.write().await;
    let index = scripts
        .iter()
        .position(|s| s.id == id && user.can_touch(s))
        .ok_or_else(|| error(StatusCode::NOT_FOUND, NOT_FOUND))?;
    scripts.remove(index);
    tracing::info!(%id, "script deleted");
    Ok(Json(serde_json::json!({ "message": DELETED })))
}
