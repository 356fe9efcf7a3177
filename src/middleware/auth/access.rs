//! access token 検証 → AuthCtx を extensions に入れる
//!
//! - `Authorization: Bearer <jwt>` を取り出し、Handlers::validate_token で検証する
//! - 失敗時は handler / storage に到達する前に 401 を返す

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::{AuthCtx, identity};
use crate::state::AppState;

/// 保護対象の Router に認証を掛ける。
///
/// 例：
/// ```ignore
/// let protected = middleware::auth::access::apply(protected, state.clone());
/// let v1 = public.merge(protected);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .map(|v| {
            v.to_str()
                .map_err(|_| AppError::unauthorized("malformed authorization header"))
        })
        .transpose()?;

    let token = identity::bearer_token(value)?;
    let claims = state.service.validate_token(token)?;

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(AuthCtx::from(claims));

    Ok(next.run(req).await)
}
