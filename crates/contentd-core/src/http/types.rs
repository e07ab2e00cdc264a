//! Shared request/response types for the HTTP surface.
//!
//! These types are serialized as JSON. Both the server and the typed
//! client use them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Search request body for `POST /search`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Class labels to include; empty means all classes.
    #[serde(default)]
    pub classes: Vec<String>,

    /// Attribute constraints (AND across attributes, OR within one list).
    #[serde(default)]
    pub filters: BTreeMap<String, Vec<String>>,

    /// Result limit; absent falls back to the configured default,
    /// zero means unbounded.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub records: usize,
}

/// One tool in the discovery listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
}

/// Tool listing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsResponse {
    pub tools: Vec<ToolInfo>,
}

/// Generic error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
