#![deny(unsafe_code)]

//! contentd core — record store, filter engine, tool registry, transports.
//!
//! The heart of the crate is a small pure filter engine ([`search::search`])
//! over an immutable in-memory [`record::RecordStore`], plus a
//! [`tools::ToolRegistry`] that exposes it as a named operation to both
//! transport surfaces (HTTP request/response and JSON-RPC over stdio) from a
//! single dispatch point.
//!
//! All shared state is constructed once at startup and then only read, so
//! request handlers share it behind `Arc` without any locking.

/// HTTP transport: axum server, typed client, wire types.
pub mod http;
/// Record model and in-memory store.
pub mod record;
/// JSON-RPC protocol, shared method handler, stdio transport.
pub mod rpc;
/// The attribute filter engine.
pub mod search;
/// Named-tool dispatch registry.
pub mod tools;

pub use record::{AttrValue, ContentRecord, RecordStore, StoreError};
pub use search::{SearchFilter, search};
pub use tools::{SearchArgs, ToolError, ToolRegistry, ToolSpec};
