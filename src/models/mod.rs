/*
 * Responsibility
 * - transport に依存しないドメイン型 (User / TodoItem / Filter)
 * - 入力型の validate() (両 transport で共有)
 */
pub mod todo;
pub mod user;

pub use todo::{NewTodo, TodoDraft, TodoFilter, TodoItem, TodoPatch, TodoUpdate};
pub use user::{Credentials, NewUser, User, UserFilter, UserPatch, UserRegistration, UserUpdate};

use crate::error::{AppError, AppResult};

/// Empty or whitespace-only strings carry no filter/update meaning.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

pub(crate) fn require(value: &str, code: &'static str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::bad_request(code, format!("{field} is required")));
    }
    Ok(())
}

pub(crate) fn reject_blank(
    value: Option<&str>,
    code: &'static str,
    field: &str,
) -> AppResult<()> {
    if let Some(v) = value
        && v.trim().is_empty()
    {
        return Err(AppError::bad_request(
            code,
            format!("{field} cannot be empty"),
        ));
    }
    Ok(())
}
