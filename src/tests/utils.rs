use crate::config::Settings;
use crate::db::{init_db, Database, RecordStore};
use crate::state::AppState;
use std::ops::Deref;
use tempfile::TempDir;

/// A fresh database file inside its own temp dir. The dir, and the file with
/// it, is removed when the returned guard drops.
pub fn temp_db(name: &str) -> (TempDir, Database) {
    let dir = tempfile::Builder::new()
        .prefix(&format!("listing_ledger_{name}_"))
        .tempdir()
        .unwrap_or_else(|e| panic!("could not create temp dir: {e}"));
    let db = Database::new(dir.path().join("ledger.sqlite3"));
    (dir, db)
}

/// Application state over an empty, schema-initialized database that lives
/// as long as this value.
pub struct TestState {
    state: AppState,
    _dir: TempDir,
}

impl Deref for TestState {
    type Target = AppState;

    fn deref(&self) -> &AppState {
        &self.state
    }
}

pub fn test_state(name: &str) -> TestState {
    let settings = Settings::load().expect("default settings");
    let (dir, db) = temp_db(name);
    init_db(&db, &settings.database.schema_path)
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    let store = RecordStore::new(db, settings.storage.key.clone());
    TestState {
        state: AppState::open(settings, store).expect("open state"),
        _dir: dir,
    }
}

#[test]
fn temp_db_file_is_removed_on_drop() {
    let (dir, db) = temp_db("cleanup");
    init_db(&db, "sql/schema.sql").expect("schema");
    let path = dir.path().join("ledger.sqlite3");
    assert!(path.exists());
    drop(dir);
    assert!(!path.exists());
}
