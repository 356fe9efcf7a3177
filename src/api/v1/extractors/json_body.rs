/*
 * Responsibility
 * - axum::Json の rejection を AppError (400 / 共通 error body) に揃える
 */
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};

use crate::error::AppError;

pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request("INVALID_BODY", e.body_text()))?;
        Ok(Self(value))
    }
}
