/*
 * Responsibility
 * - User と、その登録/更新/ログイン入力
 * - パスワードは平文で受け取り、hash 後は passwordHash としてのみ保持 (外部には出さない)
 */
use std::fmt;
use std::str::FromStr;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{non_blank, reject_blank, require};
use crate::error::{AppError, AppResult};

#[derive(Clone, PartialEq, Serialize)]
pub struct User {
    pub id: Uuid,
    #[serde(rename = "username")]
    pub user_name: String,
    #[serde(rename = "firstname")]
    pub first_name: String,
    #[serde(rename = "lastname")]
    pub last_name: String,
    #[serde(skip)]
    pub password_hash: String,
    pub location: Tz,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("user_name", &self.user_name)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

/// Resolve an IANA timezone name. Absent or empty means UTC.
pub fn parse_location(raw: Option<&str>) -> AppResult<Tz> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(Tz::UTC),
        Some(name) => Tz::from_str(name).map_err(|_| {
            AppError::bad_request("INVALID_LOCATION", format!("unknown location: {name}"))
        }),
    }
}

#[derive(Clone, Deserialize)]
pub struct UserRegistration {
    #[serde(rename = "username")]
    pub user_name: String,
    #[serde(rename = "firstname", default)]
    pub first_name: String,
    #[serde(rename = "lastname", default)]
    pub last_name: String,
    pub password: String,
    #[serde(default)]
    pub location: Option<String>,
}

impl UserRegistration {
    /// Returns the resolved location so callers don't parse it twice.
    pub fn validate(&self) -> AppResult<Tz> {
        require(&self.user_name, "INVALID_USER", "username")?;
        require(&self.password, "INVALID_USER", "password")?;
        parse_location(self.location.as_deref())
    }
}

impl fmt::Debug for UserRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRegistration")
            .field("user_name", &self.user_name)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Default, Deserialize)]
pub struct UserUpdate {
    #[serde(rename = "username", default)]
    pub user_name: Option<String>,
    #[serde(rename = "firstname", default)]
    pub first_name: Option<String>,
    #[serde(rename = "lastname", default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl UserUpdate {
    pub fn validate(&self) -> AppResult<Option<Tz>> {
        reject_blank(self.user_name.as_deref(), "INVALID_USER", "username")?;
        reject_blank(self.password.as_deref(), "INVALID_USER", "password")?;
        match self.location.as_deref() {
            None => Ok(None),
            Some(raw) => parse_location(Some(raw)).map(Some),
        }
    }
}

impl fmt::Debug for UserUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserUpdate")
            .field("user_name", &self.user_name)
            .field("location", &self.location)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Deserialize)]
pub struct Credentials {
    #[serde(rename = "username")]
    pub user_name: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_name", &self.user_name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Storage-facing insert: the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub location: Tz,
}

/// Storage-facing partial update. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub user_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password_hash: Option<String>,
    pub location: Option<Tz>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub user_name: Option<String>,
}

impl UserFilter {
    pub fn new(user_name: Option<String>) -> Self {
        Self {
            user_name: non_blank(user_name),
        }
    }

    pub fn matches(&self, user: &User) -> bool {
        self.user_name
            .as_deref()
            .is_none_or(|name| user.user_name == name)
    }
}
