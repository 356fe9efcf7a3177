#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use todo_api::app::{build_router, build_rpc_router, build_state};
use todo_api::config::{AppEnv, Config, StorageBackend};
use todo_api::models::{
    NewTodo, NewUser, TodoFilter, TodoItem, TodoPatch, User, UserFilter, UserPatch,
};
use todo_api::repos::{InMemoryStorage, RepoResult, Storage};
use todo_api::services::policy::UserScope;

pub fn test_config(user_scope: UserScope) -> Config {
    Config {
        addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        rpc_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        app_env: AppEnv::Development,
        cors_allowed_origins: Vec::new(),
        request_timeout_seconds: 30,
        storage_backend: StorageBackend::Memory,
        database_url: None,
        database_max_connections: 1,
        jwt_secret: "integration-test-secret".to_string(),
        access_token_ttl_seconds: 3600,
        access_token_leeway_seconds: 0,
        user_scope,
    }
}

/// Counts every storage call and forwards to an in-memory store.
#[derive(Default)]
pub struct SpyStorage {
    inner: InMemoryStorage,
    calls: AtomicUsize,
}

impl SpyStorage {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Storage for SpyStorage {
    async fn add_item(&self, item: NewTodo) -> RepoResult<Uuid> {
        self.hit();
        self.inner.add_item(item).await
    }
    async fn get_item(&self, id: Uuid) -> RepoResult<Option<TodoItem>> {
        self.hit();
        self.inner.get_item(id).await
    }
    async fn update_item(&self, id: Uuid, patch: TodoPatch) -> RepoResult<Option<TodoItem>> {
        self.hit();
        self.inner.update_item(id, patch).await
    }
    async fn delete_item(&self, id: Uuid) -> RepoResult<bool> {
        self.hit();
        self.inner.delete_item(id).await
    }
    async fn get_all_items(&self, filter: &TodoFilter) -> RepoResult<Vec<TodoItem>> {
        self.hit();
        self.inner.get_all_items(filter).await
    }
    async fn add_user(&self, user: NewUser) -> RepoResult<Uuid> {
        self.hit();
        self.inner.add_user(user).await
    }
    async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>> {
        self.hit();
        self.inner.get_user(id).await
    }
    async fn update_user(&self, id: Uuid, patch: UserPatch) -> RepoResult<Option<User>> {
        self.hit();
        self.inner.update_user(id, patch).await
    }
    async fn delete_user(&self, id: Uuid) -> RepoResult<bool> {
        self.hit();
        self.inner.delete_user(id).await
    }
    async fn get_all_users(&self, filter: &UserFilter) -> RepoResult<Vec<User>> {
        self.hit();
        self.inner.get_all_users(filter).await
    }
}

pub struct TestApp {
    pub http: Router,
    pub rpc: Router,
    pub spy: Arc<SpyStorage>,
}

pub fn test_app(user_scope: UserScope) -> TestApp {
    let config = test_config(user_scope);
    let spy = Arc::new(SpyStorage::default());
    let state = build_state(&config, spy.clone()).unwrap();

    TestApp {
        http: build_router(state.clone(), &config),
        rpc: build_rpc_router(state, &config),
        spy,
    }
}

pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Raw text body plus content type, for non-JSON endpoints.
pub async fn send_text(app: &Router, req: Request<Body>) -> (StatusCode, String, String) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let content_type = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap(), content_type)
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
