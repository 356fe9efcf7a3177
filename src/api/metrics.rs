/*
 * Responsibility
 * - GET /metrics (Prometheus text format, 認証なし)
 */
use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::state::AppState;

pub async fn scrape(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok((body, content_type)) => {
            let mut headers = HeaderMap::new();
            if let Ok(value) = HeaderValue::from_str(&content_type) {
                headers.insert(header::CONTENT_TYPE, value);
            }
            (headers, body).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
