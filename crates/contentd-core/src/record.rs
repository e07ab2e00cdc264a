//! Record model and the in-memory record store.
//!
//! A [`ContentRecord`] is one searchable item: a class label from an open
//! vocabulary, a sparse attribute map, an identifier, and a free-form text
//! payload that is carried through but never matched against. The
//! [`RecordStore`] is a flat collection preserving insertion order — that
//! order is the scan order the filter engine and its limit semantics rely on.
//!
//! The store is loaded once at startup and is immutable afterwards, so it can
//! be shared across request tasks behind an `Arc` without locking.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// A scalar attribute value: string or number.
///
/// Serialized untagged, so `"active"` deserializes as text and `5000`
/// as a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Number(f64),
    Text(String),
}

impl AttrValue {
    /// The value as text, formatting numbers via their display form.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            AttrValue::Text(s) => Cow::Borrowed(s),
            AttrValue::Number(n) => Cow::Owned(n.to_string()),
        }
    }

    /// The numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            AttrValue::Text(_) => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        AttrValue::Number(n)
    }
}

/// One searchable content item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Unique record identifier.
    pub id: String,

    /// Class label (e.g. "standing_instruction", "autopayment").
    pub class: String,

    /// Free-form text payload. Never matched against.
    pub text: String,

    /// Indexed attributes. Key sets may differ record to record.
    #[serde(default)]
    pub attributes: BTreeMap<String, AttrValue>,
}

impl ContentRecord {
    /// Create a record with no attributes.
    pub fn new(id: impl Into<String>, class: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            class: class.into(),
            text: text.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Add an indexed attribute (builder style).
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// Errors from loading a record store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read records file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse records JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// In-memory record collection with stable insertion order.
#[derive(Debug, Default, Clone)]
pub struct RecordStore {
    records: Vec<ContentRecord>,
}

impl RecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a record. Scan order is insertion order.
    pub fn insert(&mut self, record: ContentRecord) {
        self.records.push(record);
    }

    /// Parse a store from a JSON array of records.
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        let records: Vec<ContentRecord> = serde_json::from_str(json)?;
        Ok(Self { records })
    }

    /// Load a store from a JSON file using async I/O.
    pub async fn load(path: &Path) -> Result<Self, StoreError> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_json_str(&content)
    }

    /// The built-in sample record set used for demos and tests.
    pub fn sample() -> Self {
        let mut store = Self::new();
        store.insert(
            ContentRecord::new(
                "si-001",
                "standing_instruction",
                "Transfer $500 monthly from Checking ****1234 to Mortgage ****5678.",
            )
            .with_attr("status", "active")
            .with_attr("customer_id", "C123"),
        );
        store.insert(
            ContentRecord::new(
                "ap-042",
                "autopayment",
                "$79.99 to Verizon on the 15th monthly from Credit ****4242.",
            )
            .with_attr("status", "active")
            .with_attr("customer_id", "C123"),
        );
        store.insert(
            ContentRecord::new(
                "sl-310",
                "service_link",
                "Linked insurance: Homeowners policy ABC-987 with Acme Insurance.",
            )
            .with_attr("status", "active")
            .with_attr("customer_id", "C123"),
        );
        store.insert(
            ContentRecord::new(
                "sl-456",
                "service_link",
                "Closed Roth IRA at Delta Funds (transferred out 2024-12-31).",
            )
            .with_attr("status", "closed")
            .with_attr("customer_id", "C456"),
        );
        store.insert(
            ContentRecord::new(
                "ap-260",
                "autopayment",
                "$55.00 to GymPro on the 1st monthly from Credit ****7676.",
            )
            .with_attr("status", "active")
            .with_attr("customer_id", "C789"),
        );
        store
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[ContentRecord] {
        &self.records
    }

    /// Iterate records in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, ContentRecord> {
        self.records.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Is the store empty?
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
