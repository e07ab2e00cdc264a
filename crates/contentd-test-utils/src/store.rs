//! Record store fixtures for tests.

use contentd_core::record::{ContentRecord, RecordStore};

/// The five-record sample set shared across the workspace.
pub fn sample_store() -> RecordStore {
    RecordStore::sample()
}

/// A store with numeric attributes for inequality-matching tests.
pub fn numeric_store() -> RecordStore {
    let mut store = RecordStore::new();
    store.insert(
        ContentRecord::new("acct-low", "account", "Low-balance account.")
            .with_attr("balance", 100.0)
            .with_attr("status", "active"),
    );
    store.insert(
        ContentRecord::new("acct-mid", "account", "Mid-balance account.")
            .with_attr("balance", 2500.0)
            .with_attr("status", "active"),
    );
    store.insert(
        ContentRecord::new("acct-high", "account", "High-balance account.")
            .with_attr("balance", 5000.0)
            .with_attr("status", "closed"),
    );
    store
}

/// Write a records JSON file into `dir` and return its path.
pub fn write_records_file(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("records.json");
    std::fs::write(&path, records_json()).expect("write records fixture");
    path
}

/// Write a records JSON file into a fresh temp dir.
///
/// Returns the guard together with the file path; the file disappears when
/// the guard is dropped.
pub fn temp_records_file() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::TempDir::new().expect("create temp dir");
    let path = write_records_file(dir.path());
    (dir, path)
}

fn records_json() -> &'static str {
    r#"[
  {"id": "n-1", "class": "note", "text": "first note", "attributes": {"status": "active"}},
  {"id": "n-2", "class": "note", "text": "second note", "attributes": {"status": "archived"}}
]"#
}
