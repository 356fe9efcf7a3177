/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 公開 route (health / 登録 / login) と、access middleware を掛ける保護 route を merge する
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware;
use crate::state::AppState;

use crate::api::v1::handlers::{
    auth::{login, validate},
    health::health,
    todos::{create_todo, delete_todo, get_todo, list_todos, update_todo},
    users::{create_user, delete_user, get_user, list_users, update_user},
};

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/health", get(health))
        .route("/users", post(create_user))
        .route("/user/login", post(login));

    let protected = Router::new()
        .route("/user/validate", post(validate))
        .route("/users", get(list_users))
        .route(
            "/users/{user_id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{todo_id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        );

    public.merge(middleware::auth::access::apply(protected, state))
}
