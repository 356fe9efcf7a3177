/*
 * Responsibility
 * - PostgreSQL 版 Storage 実装 (user_repo / todo_repo への委譲のみ)
 * - pool の生成と migration の適用
 */
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::models::{
    NewTodo, NewUser, TodoFilter, TodoItem, TodoPatch, User, UserFilter, UserPatch,
};
use crate::repos::storage::{RepoResult, Storage};
use crate::repos::{todo_repo, user_repo};

#[derive(Debug, Clone)]
pub struct PgStorage {
    db: PgPool,
}

impl PgStorage {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Connect, then bring the schema up to date.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&db).await?;
        tracing::info!("database migrations applied");

        Ok(Self::new(db))
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn add_item(&self, item: NewTodo) -> RepoResult<Uuid> {
        todo_repo::create(&self.db, &item).await
    }

    async fn get_item(&self, id: Uuid) -> RepoResult<Option<TodoItem>> {
        todo_repo::get(&self.db, id).await
    }

    async fn update_item(&self, id: Uuid, patch: TodoPatch) -> RepoResult<Option<TodoItem>> {
        todo_repo::update(&self.db, id, &patch).await
    }

    async fn delete_item(&self, id: Uuid) -> RepoResult<bool> {
        todo_repo::delete(&self.db, id).await
    }

    async fn get_all_items(&self, filter: &TodoFilter) -> RepoResult<Vec<TodoItem>> {
        todo_repo::list(&self.db, filter).await
    }

    async fn add_user(&self, user: NewUser) -> RepoResult<Uuid> {
        user_repo::create(&self.db, &user).await
    }

    async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>> {
        user_repo::get(&self.db, id).await
    }

    async fn update_user(&self, id: Uuid, patch: UserPatch) -> RepoResult<Option<User>> {
        user_repo::update(&self.db, id, &patch).await
    }

    async fn delete_user(&self, id: Uuid) -> RepoResult<bool> {
        user_repo::delete(&self.db, id).await
    }

    async fn get_all_users(&self, filter: &UserFilter) -> RepoResult<Vec<User>> {
        user_repo::list(&self.db, filter).await
    }
}
