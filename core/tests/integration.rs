//! Full scripts lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every
//! `ScriptsApi` operation over real HTTP. Validates that request building,
//! the reqwest transport and response parsing work end-to-end.

use mock_server::{ADMIN_TOKEN, NOT_FOUND, OTHER_USER_TOKEN, UNAUTHORIZED, USER_ID, USER_TOKEN};
use scripts_core::{ApiError, ScriptForm, ScriptMeta, ScriptsApi};
use serde_json::json;

async fn spawn_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    format!("http://{addr}/api/v1")
}

fn form(name: &str, content: &str) -> ScriptForm {
    ScriptForm {
        name: name.to_string(),
        content: content.to_string(),
        meta: ScriptMeta {
            description: Some(format!("{name} script")),
            manifest: Some([("requirements".to_string(), "numpy".to_string())].into()),
        },
    }
}

#[tokio::test]
async fn crud_lifecycle() {
    let api = ScriptsApi::new(&spawn_server().await);

    // Step 1: list is empty.
    let scripts = api.list(USER_TOKEN).await.unwrap();
    assert!(scripts.is_empty(), "expected empty list");

    // Step 2: create.
    let input = form("demo", "print(1)");
    let created = api.create(USER_TOKEN, &input).await.unwrap();
    assert_eq!(created.name, input.name);
    assert_eq!(created.content, input.content);
    assert_eq!(created.meta, input.meta);
    assert_eq!(created.owner_id, USER_ID);
    let id = created.id.clone();

    // Step 3: get returns the client-supplied fields unchanged.
    let fetched = api.get_by_id(USER_TOKEN, &id).await.unwrap();
    assert_eq!(fetched, created);

    // Step 4: update.
    let update = form("demo-v2", "print(2)");
    let updated = api.update_by_id(USER_TOKEN, &id, &update).await.unwrap();
    assert_eq!(updated.id, id);
    assert_eq!(updated.name, "demo-v2");
    assert_eq!(updated.content, "print(2)");
    assert_eq!(updated.created_at, created.created_at);

    // Step 5: list and query both see it.
    let scripts = api.list(USER_TOKEN).await.unwrap();
    assert_eq!(scripts.len(), 1);
    assert_eq!(scripts[0].id, id);
    let found = api.query_by_name(USER_TOKEN, "demo").await.unwrap();
    assert_eq!(found, scripts);

    // Step 6: delete.
    let result = api.delete_by_id(USER_TOKEN, &id).await.unwrap();
    assert_eq!(result["message"], "Script deleted successfully");

    // Step 7: get after delete carries the backend's detail.
    let err = api.get_by_id(USER_TOKEN, &id).await.unwrap_err();
    assert!(matches!(err, ApiError::Api { status: 404, .. }));
    assert_eq!(err.message(), NOT_FOUND);

    // Step 8: delete again.
    let err = api.delete_by_id(USER_TOKEN, &id).await.unwrap_err();
    assert_eq!(err.message(), NOT_FOUND);

    // Step 9: list is empty again.
    assert!(api.list(USER_TOKEN).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_missing_id_raises_script_not_found() {
    let api = ScriptsApi::new(&spawn_server().await);
    let err = api.delete_by_id(USER_TOKEN, "missing-id").await.unwrap_err();
    assert_eq!(err.message(), "Script not found");
}

#[tokio::test]
async fn list_preserves_creation_order() {
    let api = ScriptsApi::new(&spawn_server().await);
    for name in ["gamma", "alpha", "beta"] {
        api.create(USER_TOKEN, &form(name, "")).await.unwrap();
    }
    let names: Vec<String> = api
        .list(USER_TOKEN)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, ["gamma", "alpha", "beta"]);
}

#[tokio::test]
async fn query_by_name_matches_prefix() {
    let api = ScriptsApi::new(&spawn_server().await);
    api.create(USER_TOKEN, &form("plot", "")).await.unwrap();
    api.create(USER_TOKEN, &form("plot helpers", "")).await.unwrap();
    api.create(USER_TOKEN, &form("clean", "")).await.unwrap();

    let found = api.query_by_name(USER_TOKEN, "plot").await.unwrap();
    let names: Vec<&str> = found.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["plot", "plot helpers"]);

    let found = api.query_by_name(USER_TOKEN, "plot h").await.unwrap();
    assert_eq!(found.len(), 1);

    assert!(api.query_by_name(USER_TOKEN, "zzz").await.unwrap().is_empty());
}

#[tokio::test]
async fn every_raising_operation_surfaces_detail_on_bad_token() {
    let api = ScriptsApi::new(&spawn_server().await);
    let body = json!({"name": "x", "content": "", "meta": {}});

    let errors = vec![
        api.create("", &body).await.unwrap_err(),
        api.list("").await.unwrap_err(),
        api.get_by_id("", "abc123").await.unwrap_err(),
        api.update_by_id("", "abc123", &body).await.unwrap_err(),
        api.delete_by_id("", "abc123").await.unwrap_err(),
        api.try_query_by_name("", "x").await.unwrap_err(),
    ];
    for err in errors {
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.message(), UNAUTHORIZED);
    }
}

#[tokio::test]
async fn query_by_name_swallows_http_errors() {
    let api = ScriptsApi::new(&spawn_server().await);
    assert!(api.query_by_name("", "x").await.is_none());
    assert!(api.query_by_name("not-a-token", "x").await.is_none());
}

#[tokio::test]
async fn transport_failure_raises_or_swallows() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let api = ScriptsApi::new(&format!("http://{addr}/api/v1"));

    let err = api.list(USER_TOKEN).await.unwrap_err();
    match &err {
        ApiError::Transport(source) => assert!(source.is_connect(), "{source:?}"),
        other => panic!("expected a transport error, got {other:?}"),
    }
    assert!(std::error::Error::source(&err).is_some());
    assert!(api.query_by_name(USER_TOKEN, "x").await.is_none());
}

#[tokio::test]
async fn duplicate_name_is_rejected_with_detail() {
    let api = ScriptsApi::new(&spawn_server().await);
    api.create(USER_TOKEN, &form("dup", "")).await.unwrap();
    let err = api.create(USER_TOKEN, &form("dup", "")).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.message(), mock_server::NAME_TAKEN);
}

#[tokio::test]
async fn scripts_are_scoped_to_their_owner() {
    let api = ScriptsApi::new(&spawn_server().await);
    let mine = api.create(USER_TOKEN, &form("mine", "")).await.unwrap();

    let err = api.get_by_id(OTHER_USER_TOKEN, &mine.id).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(api.list(OTHER_USER_TOKEN).await.unwrap().is_empty());

    let seen = api.get_by_id(ADMIN_TOKEN, &mine.id).await.unwrap();
    assert_eq!(seen, mine);
}

#[tokio::test]
async fn create_sends_arbitrary_json_as_is() {
    let api = ScriptsApi::new(&spawn_server().await);
    let body = json!({"name": "raw", "content": "x = 1", "meta": {"description": "raw"}});
    let created = api.create(USER_TOKEN, &body).await.unwrap();
    assert_eq!(created.name, "raw");
    assert_eq!(created.meta.description.as_deref(), Some("raw"));
    assert_eq!(body["name"], "raw");
}

#[tokio::test]
async fn json_forms_return_items_as_sent() {
    let api = ScriptsApi::new(&spawn_server().await);
    api.create(USER_TOKEN, &form("plot", "")).await.unwrap();

    let typed = api.list(USER_TOKEN).await.unwrap();
    let raw = api.list_json(USER_TOKEN).await.unwrap();
    assert_eq!(raw, [serde_json::to_value(&typed[0]).unwrap()]);
    assert_eq!(raw[0]["user_id"], USER_ID);
    assert!(raw[0].get("content").is_none());

    let found = api.query_by_name_json(USER_TOKEN, "plo").await.unwrap();
    assert_eq!(found, raw);
    assert!(api.query_by_name_json("", "plo").await.is_none());
}
