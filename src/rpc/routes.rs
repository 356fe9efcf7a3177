/*
 * Responsibility
 * - RPC listener の Router (POST /rpc)
 * - envelope が parse できれば HTTP status は常に 200
 */
use axum::{Json, Router, body::Bytes, extract::State, http::StatusCode, routing::post};

use crate::rpc::dispatch::dispatch;
use crate::rpc::envelope::{RpcError, RpcRequest, RpcResponse};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/rpc", post(rpc))
        .with_state(state)
}

async fn rpc(State(state): State<AppState>, body: Bytes) -> (StatusCode, Json<RpcResponse>) {
    let req: RpcRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(e) => {
            tracing::debug!(error = %e, "malformed rpc envelope");
            let error = RpcError::invalid_argument(format!("malformed request: {e}"));
            return (
                StatusCode::BAD_REQUEST,
                Json(RpcResponse::err(serde_json::Value::Null, error)),
            );
        }
    };

    (StatusCode::OK, Json(dispatch(state.service.as_ref(), req).await))
}
