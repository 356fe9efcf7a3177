/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth (Bearer 検証) / cors / http (request id, trace, timeout, body limit) / metrics
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod metrics;
