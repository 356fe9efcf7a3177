//! Prometheus request metrics shared by the REST and RPC listeners.
//!
//! Each app instance owns its own [`Registry`], so separate routers (and
//! tests) never see each other's counts.

use std::time::Duration;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct RequestMetrics {
    registry: Registry,
    requests: IntCounterVec,
    duration: HistogramVec,
}

impl std::fmt::Debug for RequestMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestMetrics").finish_non_exhaustive()
    }
}

impl RequestMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("todo".to_string()), None)?;

        let requests = IntCounterVec::new(
            Opts::new("requests_total", "Requests served, by transport, route and status."),
            &["transport", "method", "route", "status"],
        )?;
        let duration = HistogramVec::new(
            HistogramOpts::new("request_duration_seconds", "Request latency in seconds."),
            &["transport", "route"],
        )?;

        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(duration.clone()))?;

        Ok(Self {
            registry,
            requests,
            duration,
        })
    }

    pub fn observe(
        &self,
        transport: &str,
        method: &str,
        route: &str,
        status: u16,
        elapsed: Duration,
    ) {
        let status = status.to_string();
        self.requests
            .with_label_values(&[transport, method, route, status.as_str()])
            .inc();
        self.duration
            .with_label_values(&[transport, route])
            .observe(elapsed.as_secs_f64());
    }

    /// Text exposition body plus its content type.
    pub fn render(&self) -> Result<(String, String), prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buf = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buf)?;
        let body = String::from_utf8(buf)
            .map_err(|e| prometheus::Error::Msg(format!("metrics are not utf-8: {e}")))?;
        Ok((body, encoder.format_type().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observed_requests_show_up_in_render() {
        let metrics = RequestMetrics::new().unwrap();
        metrics.observe("http", "GET", "/api/v1/todos", 200, Duration::from_millis(3));
        metrics.observe("http", "GET", "/api/v1/todos", 200, Duration::from_millis(5));
        metrics.observe("rpc", "POST", "/rpc", 200, Duration::from_millis(1));

        let (body, content_type) = metrics.render().unwrap();
        assert!(content_type.starts_with("text/plain"));
        assert!(body.contains(
            r#"todo_requests_total{method="GET",route="/api/v1/todos",status="200",transport="http"} 2"#
        ));
        assert!(body.contains(r#"transport="rpc""#));
        assert!(body.contains("todo_request_duration_seconds_bucket"));
    }

    #[test]
    fn registries_are_independent() {
        let a = RequestMetrics::new().unwrap();
        let b = RequestMetrics::new().unwrap();
        a.observe("http", "GET", "/x", 200, Duration::ZERO);

        let (body, _) = b.render().unwrap();
        assert!(!body.contains(r#"route="/x""#));
    }
}
