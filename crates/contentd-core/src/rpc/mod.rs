//! JSON-RPC call dispatch — protocol types, method handler, stdio transport.
//!
//! Both RPC surfaces share one handler: the HTTP server mounts it behind
//! `POST /rpc`, and the stdio transport runs it over line-delimited JSON on
//! stdin/stdout. The handler itself only parses the envelope and forwards
//! tool calls to the [`ToolRegistry`](crate::tools::ToolRegistry).
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   line-delimited JSON    ┌──────────────┐
//! │  stdio peer  │─────────────────────────▶│   handler    │
//! └──────────────┘                          │              │──▶ ToolRegistry
//! ┌──────────────┐   POST /rpc              │              │
//! │  HTTP peer   │─────────────────────────▶│              │
//! └──────────────┘                          └──────────────┘
//! ```

pub mod handler;
pub mod protocol;
pub mod stdio;

pub use handler::handle_request;
pub use protocol::{JsonRpcError, JsonRpcId, JsonRpcRequest, JsonRpcResponse};
