/*
 * Responsibility
 * - TodoItem と、その作成/更新入力・一覧フィルタ
 * - date は UTC で保存し、読み出し時に owner の location の offset で表現する
 */
use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{non_blank, reject_blank, require};
use crate::error::AppResult;

pub const DEFAULT_STATUS: &str = "new";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodoItem {
    pub id: Uuid,
    pub name: String,
    pub date: DateTime<FixedOffset>,
    pub status: String,
    #[serde(rename = "userid")]
    pub owner_user_id: Uuid,
}

impl TodoItem {
    /// Render a stored UTC instant in the owner's timezone.
    pub fn localize(date: DateTime<Utc>, location: &Tz) -> DateTime<FixedOffset> {
        date.with_timezone(location).fixed_offset()
    }
}

/// Client input for a new todo. Any owner field sent by the client is
/// accepted on the wire and then replaced by the caller's id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoDraft {
    pub name: String,
    #[serde(default)]
    pub date: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "userid", default)]
    pub owner_user_id: Option<Uuid>,
}

impl TodoDraft {
    pub fn validate(&self) -> AppResult<()> {
        require(&self.name, "INVALID_TODO", "name")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub status: Option<String>,
}

impl TodoUpdate {
    pub fn validate(&self) -> AppResult<()> {
        reject_blank(self.name.as_deref(), "INVALID_TODO", "name")?;
        reject_blank(self.status.as_deref(), "INVALID_TODO", "status")
    }

    pub fn into_patch(self) -> TodoPatch {
        TodoPatch {
            name: self.name,
            date: self.date.map(|d| d.with_timezone(&Utc)),
            status: self.status,
        }
    }
}

/// Storage-facing insert with owner and defaults already applied.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub name: String,
    pub date: DateTime<Utc>,
    pub status: String,
    pub owner_user_id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct TodoPatch {
    pub name: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

/// Conjunctive filter. Every `None` field matches everything; date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFilter {
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub owner_user_id: Option<Uuid>,
}

impl TodoFilter {
    pub fn with_status(mut self, status: Option<String>) -> Self {
        self.status = non_blank(status);
        self
    }

    pub fn matches(&self, owner_user_id: Uuid, date: DateTime<Utc>, status: &str) -> bool {
        self.owner_user_id.is_none_or(|id| id == owner_user_id)
            && self.from_date.is_none_or(|from| date >= from)
            && self.to_date.is_none_or(|to| date <= to)
            && self.status.as_deref().is_none_or(|s| s == status)
    }
}
