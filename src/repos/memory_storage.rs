//! In-memory [`Storage`] used for local runs and tests.
//!
//! Users and todos live behind a single `RwLock` so a user delete and its
//! todo cascade happen atomically.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    NewTodo, NewUser, TodoFilter, TodoItem, TodoPatch, User, UserFilter, UserPatch,
};
use crate::repos::error::RepoError;
use crate::repos::storage::{RepoResult, Storage};

#[derive(Debug, Clone)]
struct StoredTodo {
    id: Uuid,
    name: String,
    date: DateTime<Utc>,
    status: String,
    owner_user_id: Uuid,
    seq: u64,
}

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    seq: u64,
}

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<Uuid, StoredUser>,
    todos: HashMap<Uuid, StoredTodo>,
    next_seq: u64,
}

impl Inner {
    fn bump(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn location_of(&self, user_id: Uuid) -> Tz {
        self.users
            .get(&user_id)
            .map(|u| u.user.location)
            .unwrap_or(Tz::UTC)
    }

    fn render(&self, todo: &StoredTodo) -> TodoItem {
        TodoItem {
            id: todo.id,
            name: todo.name.clone(),
            date: TodoItem::localize(todo.date, &self.location_of(todo.owner_user_id)),
            status: todo.status.clone(),
            owner_user_id: todo.owner_user_id,
        }
    }

    fn user_name_taken(&self, name: &str, except: Option<Uuid>) -> bool {
        self.users
            .values()
            .any(|u| u.user.user_name == name && Some(u.user.id) != except)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStorage {
    inner: RwLock<Inner>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn add_item(&self, item: NewTodo) -> RepoResult<Uuid> {
        let mut inner = self.inner.write().await;
        if !inner.users.contains_key(&item.owner_user_id) {
            return Err(RepoError::InvalidData(format!(
                "owner {} does not exist",
                item.owner_user_id
            )));
        }

        let id = Uuid::new_v4();
        let seq = inner.bump();
        inner.todos.insert(
            id,
            StoredTodo {
                id,
                name: item.name,
                date: item.date,
                status: item.status,
                owner_user_id: item.owner_user_id,
                seq,
            },
        );
        Ok(id)
    }

    async fn get_item(&self, id: Uuid) -> RepoResult<Option<TodoItem>> {
        let inner = self.inner.read().await;
        Ok(inner.todos.get(&id).map(|t| inner.render(t)))
    }

    async fn update_item(&self, id: Uuid, patch: TodoPatch) -> RepoResult<Option<TodoItem>> {
        let mut inner = self.inner.write().await;
        let Some(todo) = inner.todos.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            todo.name = name;
        }
        if let Some(date) = patch.date {
            todo.date = date;
        }
        if let Some(status) = patch.status {
            todo.status = status;
        }

        let updated = todo.clone();
        Ok(Some(inner.render(&updated)))
    }

    async fn delete_item(&self, id: Uuid) -> RepoResult<bool> {
        Ok(self.inner.write().await.todos.remove(&id).is_some())
    }

    async fn get_all_items(&self, filter: &TodoFilter) -> RepoResult<Vec<TodoItem>> {
        let inner = self.inner.read().await;
        let mut matched: Vec<&StoredTodo> = inner
            .todos
            .values()
            .filter(|t| filter.matches(t.owner_user_id, t.date, &t.status))
            .collect();
        matched.sort_by_key(|t| (t.date, t.seq));

        Ok(matched.into_iter().map(|t| inner.render(t)).collect())
    }

    async fn add_user(&self, user: NewUser) -> RepoResult<Uuid> {
        let mut inner = self.inner.write().await;
        if inner.user_name_taken(&user.user_name, None) {
            return Err(RepoError::Conflict);
        }

        let id = Uuid::new_v4();
        let seq = inner.bump();
        inner.users.insert(
            id,
            StoredUser {
                user: User {
                    id,
                    user_name: user.user_name,
                    first_name: user.first_name,
                    last_name: user.last_name,
                    password_hash: user.password_hash,
                    location: user.location,
                },
                seq,
            },
        );
        Ok(id)
    }

    async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .get(&id)
            .map(|u| u.user.clone()))
    }

    async fn update_user(&self, id: Uuid, patch: UserPatch) -> RepoResult<Option<User>> {
        let mut inner = self.inner.write().await;
        if !inner.users.contains_key(&id) {
            return Ok(None);
        }
        if let Some(name) = patch.user_name.as_deref()
            && inner.user_name_taken(name, Some(id))
        {
            return Err(RepoError::Conflict);
        }

        let Some(stored) = inner.users.get_mut(&id) else {
            return Ok(None);
        };
        let user = &mut stored.user;
        if let Some(v) = patch.user_name {
            user.user_name = v;
        }
        if let Some(v) = patch.first_name {
            user.first_name = v;
        }
        if let Some(v) = patch.last_name {
            user.last_name = v;
        }
        if let Some(v) = patch.password_hash {
            user.password_hash = v;
        }
        if let Some(v) = patch.location {
            user.location = v;
        }

        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: Uuid) -> RepoResult<bool> {
        let mut inner = self.inner.write().await;
        if inner.users.remove(&id).is_none() {
            return Ok(false);
        }
        inner.todos.retain(|_, t| t.owner_user_id != id);
        Ok(true)
    }

    async fn get_all_users(&self, filter: &UserFilter) -> RepoResult<Vec<User>> {
        let inner = self.inner.read().await;
        let mut matched: Vec<&StoredUser> = inner
            .users
            .values()
            .filter(|u| filter.matches(&u.user))
            .collect();
        matched.sort_by_key(|u| u.seq);

        Ok(matched.into_iter().map(|u| u.user.clone()).collect())
    }
}
