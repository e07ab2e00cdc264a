//! Tool registry — named operations shared by every transport surface.
//!
//! The HTTP server and the stdio JSON-RPC transport both resolve tool calls
//! through this registry, so argument binding and the filter engine live in
//! exactly one place. Dispatch is a closed set of [`ToolKind`] variants with
//! one typed argument struct per variant; the caller's JSON argument bag is
//! decoded with `serde` rather than bound reflectively.
//!
//! The registry is populated once at startup and read-only afterwards
//! (single writer, then many concurrent readers behind an `Arc`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::record::RecordStore;
use crate::search::{SearchFilter, search};

/// The closed set of operations the registry can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    /// Attribute-filtered record search.
    SearchContent,
}

/// A registered tool: name, description, and parameter schema for discovery.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON Schema for the tool's arguments.
    pub parameters: Value,
    pub kind: ToolKind,
}

/// Arguments for the `search_content` tool.
///
/// Candidate values are always strings; a leading `>` or `<` requests numeric
/// comparison. `limit` of zero (or absent, when no default applies) means
/// unbounded.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SearchArgs {
    #[serde(default)]
    pub classes: Vec<String>,

    #[serde(default)]
    pub filters: std::collections::BTreeMap<String, Vec<String>>,

    #[serde(default)]
    pub limit: Option<usize>,
}

impl From<SearchArgs> for SearchFilter {
    fn from(args: SearchArgs) -> Self {
        SearchFilter {
            classes: args.classes,
            filters: args.filters,
            limit: args.limit,
        }
    }
}

/// Errors from tool dispatch.
///
/// Soft filter mismatches are not errors — a search over bad filter values
/// returns fewer (or zero) records instead of failing.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("tool not found: {0}")]
    NotFound(String),

    #[error("invalid arguments: {0}")]
    InvalidArgs(serde_json::Error),

    #[error("failed to encode result: {0}")]
    Encode(serde_json::Error),
}

/// Registry of named tools.
pub struct ToolRegistry {
    /// Enumeration order: first registration wins the slot.
    order: Vec<String>,
    tools: HashMap<String, ToolSpec>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            tools: HashMap::new(),
        }
    }

    /// Create a registry with the built-in tools.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(search_content_spec());
        registry
    }

    /// Register a tool. Re-registering a name overwrites the earlier binding
    /// (last registration wins) while keeping its enumeration position.
    pub fn register(&mut self, spec: ToolSpec) {
        if !self.tools.contains_key(&spec.name) {
            self.order.push(spec.name.clone());
        }
        self.tools.insert(spec.name.clone(), spec);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.get(name)
    }

    /// All registered tools in registration order, for capability discovery.
    pub fn list(&self) -> Vec<&ToolSpec> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .collect()
    }

    /// Invoke a tool by name with a JSON argument bag.
    ///
    /// Unknown names fail with [`ToolError::NotFound`]; argument decode
    /// failures propagate as [`ToolError::InvalidArgs`] for the transport to
    /// translate. Async so that future tools performing I/O can be awaited
    /// through the same dispatch point.
    pub async fn invoke(
        &self,
        store: &RecordStore,
        name: &str,
        args: Value,
    ) -> Result<Value, ToolError> {
        let spec = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        debug!(tool = name, "invoking tool");

        match spec.kind {
            ToolKind::SearchContent => {
                let args: SearchArgs =
                    serde_json::from_value(args).map_err(ToolError::InvalidArgs)?;
                let results = search(store, &args.into());
                serde_json::to_value(results).map_err(ToolError::Encode)
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Spec for the built-in `search_content` tool.
pub fn search_content_spec() -> ToolSpec {
    ToolSpec {
        name: "search_content".to_string(),
        description: "Search indexed content records by class and attribute filters."
            .to_string(),
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "classes": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Class labels to include; empty means all classes"
                },
                "filters": {
                    "type": "object",
                    "additionalProperties": {
                        "type": "array",
                        "items": { "type": "string" }
                    },
                    "description": "Attribute constraints; prefix a value with '>' or '<' for numeric comparison"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of records to return; 0 means unbounded"
                }
            },
            "required": []
        }),
        kind: ToolKind::SearchContent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn result_ids(value: &Value) -> Vec<String> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_empty_registry() {
        let registry = ToolRegistry::new();
        assert!(registry.list().is_empty());
        assert!(registry.get("search_content").is_none());
    }

    #[test]
    fn test_defaults_registered() {
        let registry = ToolRegistry::with_defaults();
        let spec = registry.get("search_content").unwrap();
        assert_eq!(spec.kind, ToolKind::SearchContent);
        assert!(spec.parameters["properties"]["filters"].is_object());
    }

    #[test]
    fn test_list_in_registration_order() {
        let mut registry = ToolRegistry::new();
        let mut second = search_content_spec();
        second.name = "search_archive".to_string();
        registry.register(search_content_spec());
        registry.register(second);

        let names: Vec<&str> = registry.list().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["search_content", "search_archive"]);
    }

    #[test]
    fn test_reregistration_overwrites_but_keeps_position() {
        let mut registry = ToolRegistry::with_defaults();
        let mut replacement = search_content_spec();
        replacement.description = "replacement".to_string();
        registry.register(replacement);

        let listed = registry.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].description, "replacement");
    }

    #[tokio::test]
    async fn test_invoke_search_content_on_sample_set() {
        let registry = ToolRegistry::with_defaults();
        let store = RecordStore::sample();

        let args = serde_json::json!({
            "classes": ["autopayment"],
            "filters": { "status": ["active"] }
        });
        let result = registry.invoke(&store, "search_content", args).await.unwrap();
        assert_eq!(result_ids(&result), vec!["ap-042", "ap-260"]);
    }

    #[tokio::test]
    async fn test_invoke_unknown_tool_is_not_found() {
        let registry = ToolRegistry::with_defaults();
        let store = RecordStore::sample();

        let err = registry
            .invoke(&store, "nonexistent_tool", serde_json::json!({}))
            .await
            .unwrap_err();
        match err {
            ToolError::NotFound(name) => assert_eq!(name, "nonexistent_tool"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invoke_rejects_malformed_arguments() {
        let registry = ToolRegistry::with_defaults();
        let store = RecordStore::sample();

        let args = serde_json::json!({ "classes": "not-an-array" });
        let err = registry
            .invoke(&store, "search_content", args)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgs(_)));
    }

    #[tokio::test]
    async fn test_invoke_with_empty_arguments_returns_everything() {
        let registry = ToolRegistry::with_defaults();
        let store = RecordStore::sample();

        let result = registry
            .invoke(&store, "search_content", serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(result.as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_invoke_with_numeric_operand() {
        // Use the externally linked `contentd_core` here so the registry's
        // type matches the `RecordStore` produced by `contentd_test_utils`.
        let registry = contentd_core::ToolRegistry::with_defaults();
        let store = contentd_test_utils::store::numeric_store();

        let args = serde_json::json!({ "filters": { "balance": [">2000"] } });
        let result = registry.invoke(&store, "search_content", args).await.unwrap();
        assert_eq!(result_ids(&result), vec!["acct-mid", "acct-high"]);
    }

    #[tokio::test]
    async fn test_invoke_serializes_full_records() {
        let registry = ToolRegistry::with_defaults();
        let store = RecordStore::sample();

        let args = serde_json::json!({ "filters": { "customer_id": ["C456"] } });
        let result = registry.invoke(&store, "search_content", args).await.unwrap();
        let record = &result.as_array().unwrap()[0];
        assert_eq!(record["id"], "sl-456");
        assert_eq!(record["class"], "service_link");
        assert_eq!(record["attributes"]["status"], "closed");
        assert!(record["text"].as_str().unwrap().contains("Roth IRA"));
    }
}
