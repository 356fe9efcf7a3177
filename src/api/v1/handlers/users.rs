/*
 * Responsibility
 * - /users 系 CRUD handler
 * - POST /users (登録) のみ公開、それ以外は AuthCtx 必須
 * - 業務ロジックは Handlers に委譲し、ここは HTTP の入出力だけを扱う
 */
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::{IdResponse, users::UserQuery},
        extractors::{AuthCtxExtractor, JsonBody, UserId},
    },
    error::AppError,
    models::{User, UserRegistration, UserUpdate},
    state::AppState,
};

pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UserRegistration>,
) -> Result<(StatusCode, Json<IdResponse>), AppError> {
    let id = state.service.add_user(req).await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

pub async fn list_users(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = state.service.get_users(&ctx, query.into()).await?;
    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    user_id: UserId,
) -> Result<Json<User>, AppError> {
    Ok(Json(state.service.get_user(&ctx, user_id.id).await?))
}

pub async fn update_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    user_id: UserId,
    JsonBody(req): JsonBody<UserUpdate>,
) -> Result<Json<User>, AppError> {
    Ok(Json(state.service.update_user(&ctx, user_id.id, req).await?))
}

pub async fn delete_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    user_id: UserId,
) -> Result<StatusCode, AppError> {
    state.service.delete_user(&ctx, user_id.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
