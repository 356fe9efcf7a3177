/*
 * Responsibility
 * - POST /user/login (公開) と POST /user/validate (要認証)
 */
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header},
};

use crate::{
    api::v1::{dto::users::TokenResponse, extractors::JsonBody},
    error::AppError,
    models::Credentials,
    services::auth::{Claims, identity},
    state::AppState,
};

pub async fn login(
    State(state): State<AppState>,
    JsonBody(credentials): JsonBody<Credentials>,
) -> Result<Json<TokenResponse>, AppError> {
    let issued = state.service.login_user(credentials).await?;
    Ok(Json(issued.into()))
}

// Runs behind the access middleware, so the token here already verified once.
pub async fn validate(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Claims>, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let token = identity::bearer_token(value)?;
    Ok(Json(state.service.validate_token(token)?))
}
