//! HTTP transport — axum server over TCP plus a typed client.
//!
//! The server exposes the request/response surface (`/search`, `/health`,
//! `/tools`) and mounts the shared JSON-RPC handler behind `POST /rpc`. The
//! client is used by the CLI's `--server` mode and by integration tests.

pub mod client;
pub mod server;
pub mod types;

pub use client::ContentClient;
pub use server::ServerState;
pub use types::*;
