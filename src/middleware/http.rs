//! Transport layers shared by the REST and RPC listeners.
//!
//! Outermost first: error mapping, `x-request-id` assignment and echo,
//! 1 MiB body cap, per-request deadline (`REQUEST_TIMEOUT_SECONDS`), trace span.

use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::http::{StatusCode, header::HeaderName};
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

const BODY_LIMIT_BYTES: usize = 1024 * 1024;
const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn apply(router: Router, timeout: Duration) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let layers = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(|err: BoxError| async move {
            if err.is::<tower::timeout::error::Elapsed>() {
                tracing::warn!("request timed out");
                StatusCode::REQUEST_TIMEOUT
            } else {
                tracing::error!(error = %err, "unhandled middleware error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }))
        .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
        .layer(PropagateRequestIdLayer::new(request_id))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        // a timed-out request drops its pending storage call with it
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http());

    router.layer(layers)
}
