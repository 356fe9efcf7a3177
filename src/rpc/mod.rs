//! RPC transport.
//!
//! JSON-framed calls on their own listener (`POST /rpc`), carrying
//! gRPC-style metadata and status codes. Every method maps one-to-one onto a
//! [`Handlers`](crate::services::Handlers) operation.

pub mod dispatch;
pub mod envelope;
mod routes;

pub use dispatch::{RpcMethod, dispatch};
pub use envelope::{RpcError, RpcRequest, RpcResponse, RpcStatus};
pub use routes::routes;
