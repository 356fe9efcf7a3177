//! The business-logic surface shared by every transport.
//!
//! Adapters parse their wire format, resolve an [`AuthCtx`] for protected
//! operations, and call into [`Handlers`]. Nothing below this trait knows
//! which transport a request came from.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    Credentials, NewUser, TodoDraft, TodoFilter, TodoItem, TodoUpdate, User, UserFilter,
    UserPatch, UserRegistration, UserUpdate,
};
use crate::repos::Storage;
use crate::services::auth::{AuthCtx, Claims, CredentialHasher, IssuedToken, TokenCodec};
use crate::services::policy::{self, UserOp, UserScope};

#[async_trait]
pub trait Handlers: Send + Sync {
    async fn add_user(&self, registration: UserRegistration) -> AppResult<Uuid>;
    async fn get_user(&self, ctx: &AuthCtx, id: Uuid) -> AppResult<User>;
    async fn get_users(&self, ctx: &AuthCtx, filter: UserFilter) -> AppResult<Vec<User>>;
    async fn update_user(&self, ctx: &AuthCtx, id: Uuid, update: UserUpdate) -> AppResult<User>;
    async fn delete_user(&self, ctx: &AuthCtx, id: Uuid) -> AppResult<()>;
    async fn login_user(&self, credentials: Credentials) -> AppResult<IssuedToken>;
    fn validate_token(&self, token: &str) -> AppResult<Claims>;

    async fn add_todo(&self, ctx: &AuthCtx, draft: TodoDraft) -> AppResult<Uuid>;
    async fn get_todo(&self, ctx: &AuthCtx, id: Uuid) -> AppResult<TodoItem>;
    async fn get_todos(&self, ctx: &AuthCtx, filter: TodoFilter) -> AppResult<Vec<TodoItem>>;
    async fn update_todo(
        &self,
        ctx: &AuthCtx,
        id: Uuid,
        update: TodoUpdate,
    ) -> AppResult<TodoItem>;
    async fn delete_todo(&self, ctx: &AuthCtx, id: Uuid) -> AppResult<()>;
}

pub struct TodoService {
    storage: Arc<dyn Storage>,
    hasher: CredentialHasher,
    tokens: TokenCodec,
    user_scope: UserScope,
}

impl TodoService {
    pub fn new(
        storage: Arc<dyn Storage>,
        hasher: CredentialHasher,
        tokens: TokenCodec,
        user_scope: UserScope,
    ) -> Self {
        Self {
            storage,
            hasher,
            tokens,
            user_scope,
        }
    }

    /// A valid token for a user that has since been deleted is not enough.
    async fn caller(&self, ctx: &AuthCtx) -> AppResult<Uuid> {
        let user = self
            .storage
            .get_user(ctx.user_id)
            .await
            .map_err(|e| AppError::from_repo(e, "resolve caller"))?;

        match user {
            Some(user) => Ok(user.id),
            None => Err(AppError::unauthorized("caller no longer exists")),
        }
    }

    async fn find_user_by_name(&self, user_name: &str) -> AppResult<Option<User>> {
        let filter = UserFilter::new(Some(user_name.to_string()));
        if filter.user_name.is_none() {
            return Ok(None);
        }
        let users = self
            .storage
            .get_all_users(&filter)
            .await
            .map_err(|e| AppError::from_repo(e, "find user"))?;
        Ok(users.into_iter().next())
    }
}

#[async_trait]
impl Handlers for TodoService {
    async fn add_user(&self, registration: UserRegistration) -> AppResult<Uuid> {
        let location = registration.validate()?;
        let password_hash = self.hasher.hash(registration.password).await?;

        let id = self
            .storage
            .add_user(NewUser {
                user_name: registration.user_name,
                first_name: registration.first_name,
                last_name: registration.last_name,
                password_hash,
                location,
            })
            .await
            .map_err(|e| AppError::from_repo(e, "add user"))?;

        tracing::info!(user_id = %id, "user registered");
        Ok(id)
    }

    async fn get_user(&self, ctx: &AuthCtx, id: Uuid) -> AppResult<User> {
        let caller = self.caller(ctx).await?;
        policy::check_user_access(self.user_scope, caller, id, UserOp::Read)?;

        self.storage
            .get_user(id)
            .await
            .map_err(|e| AppError::from_repo(e, "get user"))?
            .ok_or_else(|| AppError::not_found("user"))
    }

    async fn get_users(&self, ctx: &AuthCtx, filter: UserFilter) -> AppResult<Vec<User>> {
        self.caller(ctx).await?;

        self.storage
            .get_all_users(&filter)
            .await
            .map_err(|e| AppError::from_repo(e, "list users"))
    }

    async fn update_user(&self, ctx: &AuthCtx, id: Uuid, update: UserUpdate) -> AppResult<User> {
        let caller = self.caller(ctx).await?;
        let location = update.validate()?;
        policy::check_user_access(self.user_scope, caller, id, UserOp::Update)?;

        let password_hash = match update.password {
            Some(plaintext) => Some(self.hasher.hash(plaintext).await?),
            None => None,
        };
        let patch = UserPatch {
            user_name: update.user_name,
            first_name: update.first_name,
            last_name: update.last_name,
            password_hash,
            location,
        };

        self.storage
            .update_user(id, patch)
            .await
            .map_err(|e| AppError::from_repo(e, "update user"))?
            .ok_or_else(|| AppError::not_found("user"))
    }

    async fn delete_user(&self, ctx: &AuthCtx, id: Uuid) -> AppResult<()> {
        let caller = self.caller(ctx).await?;
        policy::check_user_access(self.user_scope, caller, id, UserOp::Delete)?;

        let deleted = self
            .storage
            .delete_user(id)
            .await
            .map_err(|e| AppError::from_repo(e, "delete user"))?;
        if !deleted {
            return Err(AppError::not_found("user"));
        }

        tracing::info!(user_id = %id, deleted_by = %caller, "user deleted");
        Ok(())
    }

    async fn login_user(&self, credentials: Credentials) -> AppResult<IssuedToken> {
        let invalid = || AppError::unauthorized("invalid username or password");

        let user = self
            .find_user_by_name(&credentials.user_name)
            .await?
            .ok_or_else(invalid)?;

        if !self
            .hasher
            .verify(credentials.password, user.password_hash.clone())
            .await
        {
            return Err(invalid());
        }

        self.tokens.issue(user.id)
    }

    fn validate_token(&self, token: &str) -> AppResult<Claims> {
        self.tokens.verify(token)
    }

    async fn add_todo(&self, ctx: &AuthCtx, draft: TodoDraft) -> AppResult<Uuid> {
        let caller = self.caller(ctx).await?;
        draft.validate()?;

        let new = policy::stamp_owner(caller, draft, Utc::now());
        self.storage
            .add_item(new)
            .await
            .map_err(|e| AppError::from_repo(e, "add todo"))
    }

    async fn get_todo(&self, ctx: &AuthCtx, id: Uuid) -> AppResult<TodoItem> {
        let caller = self.caller(ctx).await?;

        let item = self
            .storage
            .get_item(id)
            .await
            .map_err(|e| AppError::from_repo(e, "get todo"))?;
        policy::owned_todo(caller, item)
    }

    async fn get_todos(&self, ctx: &AuthCtx, filter: TodoFilter) -> AppResult<Vec<TodoItem>> {
        let caller = self.caller(ctx).await?;

        let filter = policy::scope_todo_filter(caller, filter);
        self.storage
            .get_all_items(&filter)
            .await
            .map_err(|e| AppError::from_repo(e, "list todos"))
    }

    async fn update_todo(
        &self,
        ctx: &AuthCtx,
        id: Uuid,
        update: TodoUpdate,
    ) -> AppResult<TodoItem> {
        let caller = self.caller(ctx).await?;
        update.validate()?;

        let item = self
            .storage
            .get_item(id)
            .await
            .map_err(|e| AppError::from_repo(e, "get todo"))?;
        policy::owned_todo(caller, item)?;

        self.storage
            .update_item(id, update.into_patch())
            .await
            .map_err(|e| AppError::from_repo(e, "update todo"))?
            .ok_or_else(|| AppError::not_found("todo"))
    }

    async fn delete_todo(&self, ctx: &AuthCtx, id: Uuid) -> AppResult<()> {
        self.get_todo(ctx, id).await?;

        let deleted = self
            .storage
            .delete_item(id)
            .await
            .map_err(|e| AppError::from_repo(e, "delete todo"))?;
        if !deleted {
            return Err(AppError::not_found("todo"));
        }
        Ok(())
    }
}
