//! Multi-tenant todo backend.
//!
//! Users register, log in for a bearer token, and manage their own todo
//! items over a REST API (`/api/v1`) or an RPC endpoint (`/rpc`). Both
//! transports share one [`services::Handlers`] implementation and one
//! ownership policy.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod repos;
pub mod rpc;
pub mod services;
pub mod state;
