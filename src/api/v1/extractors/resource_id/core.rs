/*
 * Responsibility
 * - Path の String を受け、UUID としてパースしてリソースごとの ID 型にする
 * - 失敗時は AppError::bad_request (400) に変換
 * - todos/users で共通利用
 */
use std::marker::PhantomData;

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Clone, Copy)]
pub struct ResourceId<T> {
    pub id: Uuid,
    _marker: PhantomData<T>,
}

impl<T> ResourceId<T> {
    fn new(id: Uuid) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }
}

fn parse_or_bad_request(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::bad_request("INVALID_ID", "invalid id"))
}

impl<T> FromRequestParts<AppState> for ResourceId<T>
where
    T: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::bad_request("INVALID_ID", "invalid id"))?;
        Ok(Self::new(parse_or_bad_request(&raw)?))
    }
}

impl<T> std::fmt::Debug for ResourceId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceId").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_uuid_or_rejects() {
        let id = Uuid::new_v4();
        assert_eq!(parse_or_bad_request(&id.to_string()).unwrap(), id);
        assert!(matches!(
            parse_or_bad_request("42"),
            Err(AppError::BadRequest { code: "INVALID_ID", .. })
        ));
    }
}
