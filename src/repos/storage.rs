/*
 * Responsibility
 * - service 層が依存する永続化の契約 (Storage trait)
 * - 存在しない id の読み出しは None (エラーにしない)
 * - delete は「消えたかどうか」を返す。存在しない id の削除も Ok(false)
 */
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    NewTodo, NewUser, TodoFilter, TodoItem, TodoPatch, User, UserFilter, UserPatch,
};
use crate::repos::error::RepoError;

pub type RepoResult<T> = Result<T, RepoError>;

#[async_trait]
pub trait Storage: Send + Sync {
    async fn add_item(&self, item: NewTodo) -> RepoResult<Uuid>;
    async fn get_item(&self, id: Uuid) -> RepoResult<Option<TodoItem>>;
    async fn update_item(&self, id: Uuid, patch: TodoPatch) -> RepoResult<Option<TodoItem>>;
    async fn delete_item(&self, id: Uuid) -> RepoResult<bool>;
    async fn get_all_items(&self, filter: &TodoFilter) -> RepoResult<Vec<TodoItem>>;

    async fn add_user(&self, user: NewUser) -> RepoResult<Uuid>;
    async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>>;
    async fn update_user(&self, id: Uuid, patch: UserPatch) -> RepoResult<Option<User>>;
    /// Also removes every todo owned by the user.
    async fn delete_user(&self, id: Uuid) -> RepoResult<bool>;
    async fn get_all_users(&self, filter: &UserFilter) -> RepoResult<Vec<User>>;
}
