/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - HTTP / RPC の両方が同じ Handlers 実装と RequestMetrics を共有する
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::metrics::RequestMetrics;
use crate::services::Handlers;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn Handlers>,
    pub metrics: RequestMetrics,
}

impl AppState {
    pub fn new(service: Arc<dyn Handlers>, metrics: RequestMetrics) -> Self {
        Self { service, metrics }
    }
}
