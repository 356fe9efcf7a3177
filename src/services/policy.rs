//! Ownership-scoped authorization rules.
//!
//! Every rule is a pure function of the caller id and the target. Denials are
//! reported as `NotFound` so a caller can't tell "absent" from "not yours".

use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::todo::DEFAULT_STATUS;
use crate::models::{NewTodo, TodoDraft, TodoFilter, TodoItem, non_blank};

/// Who may mutate user records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserScope {
    /// Any authenticated caller may act on any user.
    #[default]
    Open,
    /// Updates and deletes are limited to the caller's own record.
    SelfOnly,
}

impl FromStr for UserScope {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "self" | "self_only" => Ok(Self::SelfOnly),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserOp {
    Read,
    Update,
    Delete,
}

/// Pass the item through only if it exists and belongs to the caller.
pub fn owned_todo(caller: Uuid, item: Option<TodoItem>) -> AppResult<TodoItem> {
    match item {
        Some(item) if item.owner_user_id == caller => Ok(item),
        _ => Err(AppError::not_found("todo")),
    }
}

/// The caller id always wins over any owner the client asked for.
pub fn scope_todo_filter(caller: Uuid, filter: TodoFilter) -> TodoFilter {
    TodoFilter {
        owner_user_id: Some(caller),
        ..filter
    }
}

/// Build the insert for a new todo, owned by the caller, with defaults applied.
pub fn stamp_owner(caller: Uuid, draft: TodoDraft, now: DateTime<Utc>) -> NewTodo {
    NewTodo {
        name: draft.name,
        date: draft.date.map(|d| d.with_timezone(&Utc)).unwrap_or(now),
        status: non_blank(draft.status).unwrap_or_else(|| DEFAULT_STATUS.to_string()),
        owner_user_id: caller,
    }
}

pub fn check_user_access(
    scope: UserScope,
    caller: Uuid,
    target: Uuid,
    op: UserOp,
) -> AppResult<()> {
    match (scope, op) {
        (UserScope::SelfOnly, UserOp::Update | UserOp::Delete) if caller != target => {
            Err(AppError::not_found("user"))
        }
        _ => Ok(()),
    }
}
