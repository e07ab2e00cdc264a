//! Filter engine — attribute matching over the record store.
//!
//! A [`SearchFilter`] combines a class filter, a constraint set, and a result
//! limit. Constraints are conjunctive across attributes and disjunctive within
//! one attribute's candidate list. Candidate values are always strings; a
//! leading `>` or `<` signals numeric comparison against numeric record
//! values.
//!
//! The engine is deliberately lenient on data: a malformed numeric operand, a
//! missing attribute, or a type mismatch resolves to "no match", never to an
//! error, so one bad filter value cannot abort a whole query over a sparse,
//! heterogeneous record set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::{AttrValue, ContentRecord, RecordStore};

/// A search request against the record store.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SearchFilter {
    /// Class labels to include. Empty means no class restriction.
    #[serde(default)]
    pub classes: Vec<String>,

    /// Attribute constraints: attribute name → allowed values
    /// (AND across attributes, OR within one attribute's list).
    #[serde(default)]
    pub filters: BTreeMap<String, Vec<String>>,

    /// Maximum number of records to return.
    ///
    /// `None` and `Some(0)` both mean unbounded.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl SearchFilter {
    /// A filter that matches every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to the given class labels (builder style).
    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes = classes.into_iter().map(Into::into).collect();
        self
    }

    /// Add one attribute constraint (builder style).
    pub fn with_filter<I, S>(mut self, attribute: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters
            .insert(attribute.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Bound the number of results (builder style). Zero means unbounded.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Select records matching the filter, in store scan order.
///
/// Single pass, no backtracking. The scan stops as soon as a bounded limit
/// is reached, so with ties in scan order the earliest records win. Pure and
/// idempotent: identical inputs always yield identical outputs.
pub fn search<'a>(store: &'a RecordStore, filter: &SearchFilter) -> Vec<&'a ContentRecord> {
    let bound = match filter.limit {
        None | Some(0) => None,
        Some(n) => Some(n),
    };

    let mut results = Vec::new();
    for record in store.iter() {
        if !filter.classes.is_empty() && !filter.classes.contains(&record.class) {
            continue;
        }
        if record_matches(record, &filter.filters) {
            results.push(record);
        }
        if let Some(n) = bound
            && results.len() >= n
        {
            break;
        }
    }
    results
}

/// Does the record satisfy every attribute constraint?
fn record_matches(record: &ContentRecord, filters: &BTreeMap<String, Vec<String>>) -> bool {
    filters.iter().all(|(attribute, candidates)| {
        record
            .attributes
            .get(attribute)
            .is_some_and(|value| candidates.iter().any(|c| value_matches(value, c)))
    })
}

/// Match one record value against one candidate value.
///
/// Numeric record values compared against a `>`/`<`-prefixed candidate use
/// strict inequality; an unparsable operand is no match. Everything else is
/// case-insensitive string equality.
fn value_matches(value: &AttrValue, candidate: &str) -> bool {
    if let Some(n) = value.as_number() {
        if let Some(rest) = candidate.strip_prefix('>') {
            return rest.trim().parse::<f64>().is_ok_and(|threshold| n > threshold);
        }
        if let Some(rest) = candidate.strip_prefix('<') {
            return rest.trim().parse::<f64>().is_ok_and(|threshold| n < threshold);
        }
    }
    value.as_text().eq_ignore_ascii_case(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ContentRecord;
    use pretty_assertions::assert_eq;

    fn ids<'a>(results: &[&'a ContentRecord]) -> Vec<&'a str> {
        results.iter().map(|r| r.id.as_str()).collect()
    }

    // ── Match rule ────────────────────────────────────────────────────

    #[test]
    fn test_string_equality_case_insensitive() {
        let value = AttrValue::from("Active");
        assert!(value_matches(&value, "active"));
        assert!(value_matches(&value, "ACTIVE"));
        assert!(!value_matches(&value, "activated"));
    }

    #[test]
    fn test_numeric_greater_than() {
        let value = AttrValue::from(5000.0);
        assert!(value_matches(&value, ">4999"));
        assert!(!value_matches(&value, ">5000"));
        assert!(!value_matches(&value, ">5001"));
    }

    #[test]
    fn test_numeric_less_than() {
        let value = AttrValue::from(5000.0);
        assert!(!value_matches(&value, "<4999"));
        assert!(!value_matches(&value, "<5000"));
        assert!(value_matches(&value, "<5001"));
    }

    #[test]
    fn test_malformed_numeric_operand_is_no_match() {
        let value = AttrValue::from(5000.0);
        assert!(!value_matches(&value, ">abc"));
        assert!(!value_matches(&value, "<"));
    }

    #[test]
    fn test_operator_prefix_on_text_value_falls_back_to_equality() {
        // Text record values never use numeric comparison; the candidate is
        // compared literally, prefix included.
        let value = AttrValue::from(">4999");
        assert!(value_matches(&value, ">4999"));

        let status = AttrValue::from("active");
        assert!(!value_matches(&status, ">100"));
    }

    #[test]
    fn test_number_matches_its_display_form() {
        let value = AttrValue::from(5000.0);
        assert!(value_matches(&value, "5000"));
    }

    // ── Engine semantics ──────────────────────────────────────────────

    fn numeric_store() -> RecordStore {
        let mut store = RecordStore::new();
        store.insert(
            ContentRecord::new("low", "account", "")
                .with_attr("balance", 100.0)
                .with_attr("status", "active"),
        );
        store.insert(
            ContentRecord::new("high", "account", "")
                .with_attr("balance", 5000.0)
                .with_attr("status", "active"),
        );
        store
    }

    #[test]
    fn test_empty_filter_returns_all_in_order() {
        let store = RecordStore::sample();
        let results = search(&store, &SearchFilter::all());
        assert_eq!(ids(&results), vec!["si-001", "ap-042", "sl-310", "sl-456", "ap-260"]);
    }

    #[test]
    fn test_class_filter() {
        let store = RecordStore::sample();
        let filter = SearchFilter::all().with_classes(["autopayment"]);
        let results = search(&store, &filter);
        assert_eq!(ids(&results), vec!["ap-042", "ap-260"]);
    }

    #[test]
    fn test_and_semantics_across_attributes() {
        let store = RecordStore::sample();
        let filter = SearchFilter::all()
            .with_filter("status", ["active"])
            .with_filter("customer_id", ["C123"]);
        let results = search(&store, &filter);
        assert_eq!(ids(&results), vec!["si-001", "ap-042", "sl-310"]);
    }

    #[test]
    fn test_missing_attribute_excludes_record() {
        let mut store = RecordStore::sample();
        store.insert(ContentRecord::new("bare", "note", "no attributes at all"));

        let filter = SearchFilter::all().with_filter("status", ["active"]);
        let results = search(&store, &filter);
        assert!(!ids(&results).contains(&"bare"));
    }

    #[test]
    fn test_or_semantics_within_one_attribute() {
        let store = RecordStore::sample();
        let filter = SearchFilter::all().with_filter("customer_id", ["C456", "C789"]);
        let results = search(&store, &filter);
        assert_eq!(ids(&results), vec!["sl-456", "ap-260"]);
    }

    #[test]
    fn test_numeric_constraint_selects_by_threshold() {
        let store = numeric_store();
        let over = search(&store, &SearchFilter::all().with_filter("balance", [">4999"]));
        assert_eq!(ids(&over), vec!["high"]);

        let under = search(&store, &SearchFilter::all().with_filter("balance", ["<4999"]));
        assert_eq!(ids(&under), vec!["low"]);
    }

    #[test]
    fn test_bad_numeric_operand_degrades_to_empty_not_error() {
        let store = numeric_store();
        let results = search(&store, &SearchFilter::all().with_filter("balance", [">abc"]));
        assert!(results.is_empty());
    }

    #[test]
    fn test_limit_stops_scan_early() {
        let store = RecordStore::sample();
        let filter = SearchFilter::all()
            .with_filter("status", ["active"])
            .with_limit(2);
        let results = search(&store, &filter);
        // first two matches in scan order, not an arbitrary pair
        assert_eq!(ids(&results), vec!["si-001", "ap-042"]);
    }

    #[test]
    fn test_zero_and_absent_limit_are_unbounded() {
        let store = RecordStore::sample();
        let unlimited = search(&store, &SearchFilter::all());
        let zero = search(&store, &SearchFilter::all().with_limit(0));
        assert_eq!(ids(&unlimited), ids(&zero));
        assert_eq!(unlimited.len(), 5);
    }

    #[test]
    fn test_limit_larger_than_matches() {
        let store = RecordStore::sample();
        let results = search(&store, &SearchFilter::all().with_limit(100));
        assert_eq!(results.len(), 5);
    }

    #[test]
    fn test_search_is_idempotent() {
        let store = RecordStore::sample();
        let filter = SearchFilter::all()
            .with_classes(["autopayment", "service_link"])
            .with_filter("status", ["active"]);
        let first = ids(&search(&store, &filter));
        let second = ids(&search(&store, &filter));
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_candidate_list_never_matches() {
        let store = RecordStore::sample();
        let filter = SearchFilter::all().with_filter("status", Vec::<String>::new());
        let results = search(&store, &filter);
        assert!(results.is_empty());
    }
}
