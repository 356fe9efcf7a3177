/*
 * Responsibility
 * - 認証済みの呼び出し元を表す型 (AuthCtx)
 * - transport ごとの credential から bearer token を取り出す
 *   - HTTP: `Authorization: Bearer <token>`
 *   - RPC: metadata `authorization` (`Bearer <token>` または token そのもの)
 *
 * Notes
 * - token の署名/期限の検証は Handlers::validate_token の責務
 */
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::auth::jwt::Claims;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `user_id` は token の subject (内部ユーザーID)
/// - `jti` は監査/相関用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: Uuid,
    pub jti: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<Claims> for AuthCtx {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            jti: Some(claims.token_id),
            expires_at: Some(claims.expires_at),
        }
    }
}

fn strip_bearer(value: &str) -> Option<&str> {
    let (scheme, rest) = value.trim().split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then(|| rest.trim())
}

fn missing() -> AppError {
    AppError::unauthorized("no credential supplied")
}

/// Token from an HTTP `Authorization` header value. Only the Bearer scheme is accepted.
pub fn bearer_token(header: Option<&str>) -> AppResult<&str> {
    let header = header.ok_or_else(missing)?;
    match strip_bearer(header) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AppError::unauthorized("malformed authorization header")),
    }
}

/// Token from RPC metadata. A bare token is accepted as well as `Bearer <token>`.
pub fn metadata_token(value: Option<&str>) -> AppResult<&str> {
    let value = value.map(str::trim).ok_or_else(missing)?;
    let token = strip_bearer(value).unwrap_or(value);
    if token.is_empty() {
        return Err(missing());
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header_is_parsed() {
        assert_eq!(bearer_token(Some("Bearer abc.def")).unwrap(), "abc.def");
        assert_eq!(bearer_token(Some("bearer  abc ")).unwrap(), "abc");
    }

    #[test]
    fn bearer_header_rejects_other_shapes() {
        for value in [None, Some(""), Some("abc"), Some("Basic abc"), Some("Bearer ")] {
            let err = bearer_token(value).unwrap_err();
            assert!(matches!(err, AppError::Unauthorized { .. }), "{value:?}");
        }
    }

    #[test]
    fn metadata_accepts_bare_or_bearer() {
        assert_eq!(metadata_token(Some("abc")).unwrap(), "abc");
        assert_eq!(metadata_token(Some("Bearer abc")).unwrap(), "abc");
        assert!(metadata_token(None).is_err());
        assert!(metadata_token(Some("  ")).is_err());
    }
}
