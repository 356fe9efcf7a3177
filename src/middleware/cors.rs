//! Browser CORS for the REST listener. Credentials are never allowed.
//!
//! Development answers every origin with `*`; production only echoes origins
//! listed in `CORS_ALLOWED_ORIGINS`.

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::AppEnv;

pub fn apply(router: Router, app_env: AppEnv, allowed_origins: &[String]) -> Router {
    router.layer(layer(app_env, allowed_origins))
}

fn layer(app_env: AppEnv, allowed_origins: &[String]) -> CorsLayer {
    let origin = if app_env.is_production() {
        // empty list: no origin matches
        let allowed: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();
        AllowOrigin::predicate(move |origin: &HeaderValue, _| allowed.contains(origin))
    } else {
        AllowOrigin::from(Any)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-request-id"),
        ])
        .max_age(Duration::from_secs(10 * 60))
}
