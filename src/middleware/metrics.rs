//! Request counting for the Prometheus endpoint.
//!
//! The route label is the matched route template (`/api/v1/todos/{todo_id}`),
//! never the raw path, so ids do not explode label cardinality.

use std::time::Instant;

use axum::{
    Router,
    body::Body,
    extract::{MatchedPath, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::metrics::RequestMetrics;

const UNMATCHED_ROUTE: &str = "unmatched";

pub fn apply(router: Router, metrics: RequestMetrics, transport: &'static str) -> Router {
    router.layer(middleware::from_fn_with_state(
        (metrics, transport),
        track_request,
    ))
}

async fn track_request(
    State((metrics, transport)): State<(RequestMetrics, &'static str)>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());

    let started = Instant::now();
    let res = next.run(req).await;

    metrics.observe(
        transport,
        method.as_str(),
        &route,
        res.status().as_u16(),
        started.elapsed(),
    );
    res
}
