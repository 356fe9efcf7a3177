/*
 * Responsibility
 * - GET /todos の query string (status, fromdate, todate, owner)
 * - RFC 3339 の日時をパースして TodoFilter にする
 * - owner は受け取るだけで使わない (呼び出し元で必ず上書きされる)
 */
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::models::TodoFilter;

#[derive(Debug, Default, Deserialize)]
pub struct TodoQuery {
    pub status: Option<String>,
    pub fromdate: Option<String>,
    pub todate: Option<String>,
    pub owner: Option<String>,
}

fn parse_date(raw: Option<&str>, field: &str) -> AppResult<Option<DateTime<Utc>>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|d| Some(d.with_timezone(&Utc)))
            .map_err(|_| {
                AppError::bad_request("INVALID_DATE", format!("{field} must be RFC 3339"))
            }),
    }
}

impl TodoQuery {
    pub fn into_filter(self) -> AppResult<TodoFilter> {
        Ok(TodoFilter {
            from_date: parse_date(self.fromdate.as_deref(), "fromdate")?,
            to_date: parse_date(self.todate.as_deref(), "todate")?,
            status: None,
            owner_user_id: None,
        }
        .with_status(self.status))
    }
}
