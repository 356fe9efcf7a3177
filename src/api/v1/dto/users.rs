/*
 * Responsibility
 * - Users / login の HTTP 固有 DTO
 * - request body はドメイン入力型 (UserRegistration 等) をそのまま使う
 */
use serde::{Deserialize, Serialize};

use crate::models::UserFilter;
use crate::services::auth::IssuedToken;

#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    pub username: Option<String>,
}

impl From<UserQuery> for UserFilter {
    fn from(q: UserQuery) -> Self {
        UserFilter::new(q.username)
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

impl From<IssuedToken> for TokenResponse {
    fn from(t: IssuedToken) -> Self {
        Self {
            token: t.token,
            token_type: t.token_type,
            expires_in: t.expires_in,
        }
    }
}
