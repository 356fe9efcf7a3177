/*
 * Responsibility
 * - /todos 系 CRUD handler (全て AuthCtx 必須)
 * - owner は常に AuthCtx から決まる。所有者チェックは Handlers/policy 側
 */
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::{IdResponse, todos::TodoQuery},
        extractors::{AuthCtxExtractor, JsonBody, TodoId},
    },
    error::AppError,
    models::{TodoDraft, TodoItem, TodoUpdate},
    state::AppState,
};

pub async fn list_todos(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Query(query): Query<TodoQuery>,
) -> Result<Json<Vec<TodoItem>>, AppError> {
    let filter = query.into_filter()?;
    Ok(Json(state.service.get_todos(&ctx, filter).await?))
}

pub async fn create_todo(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    JsonBody(req): JsonBody<TodoDraft>,
) -> Result<(StatusCode, Json<IdResponse>), AppError> {
    let id = state.service.add_todo(&ctx, req).await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

pub async fn get_todo(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    todo_id: TodoId,
) -> Result<Json<TodoItem>, AppError> {
    Ok(Json(state.service.get_todo(&ctx, todo_id.id).await?))
}

pub async fn update_todo(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    todo_id: TodoId,
    JsonBody(req): JsonBody<TodoUpdate>,
) -> Result<Json<TodoItem>, AppError> {
    Ok(Json(state.service.update_todo(&ctx, todo_id.id, req).await?))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    todo_id: TodoId,
) -> Result<StatusCode, AppError> {
    state.service.delete_todo(&ctx, todo_id.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
