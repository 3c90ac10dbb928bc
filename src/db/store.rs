use crate::db::connection::Database;
use crate::domain::record::{rekey_duplicates, IdAllocator, Record};
use crate::domain::resolver::record_from_value;
use crate::errors::ServerError;
use chrono::{Local, Utc};
use rusqlite::{params, OptionalExtension};
use serde_json::Value;
use tracing::{error, info, warn};

/// The record list persisted as one JSON value under a single key.
#[derive(Clone, Debug)]
pub struct RecordStore {
    db: Database,
    key: String,
}

impl RecordStore {
    pub fn new(db: Database, key: impl Into<String>) -> Self {
        Self { db, key: key.into() }
    }

    /// Loads the stored list. Entries are passed through the category resolver
    /// and their derived numbers are recomputed. A missing entry is an empty
    /// list; so is a stored value that is not a JSON array.
    pub fn load(&self, ids: &mut IdAllocator) -> Result<Vec<Record>, ServerError> {
        let raw: Option<String> = self.db.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![&self.key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| ServerError::DbError(e.to_string()))
        })?;

        let Some(raw) = raw else {
            return Ok(Vec::new());
        };

        let entries = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(entries)) => entries,
            Ok(_) => {
                error!(key = %self.key, "stored records are not a list, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                error!(key = %self.key, error = %e, "stored records are not valid JSON, starting empty");
                return Ok(Vec::new());
            }
        };

        let now = Local::now();
        let mut records = Vec::with_capacity(entries.len());
        for entry in &entries {
            match record_from_value(entry, ids, now) {
                Some(mut record) => {
                    record.recompute_derived();
                    records.push(record);
                }
                None => warn!("dropping stored entry that is not a record"),
            }
        }

        let rekeyed = rekey_duplicates(&mut records, ids);
        info!(records = records.len(), rekeyed, "loaded records");
        Ok(records)
    }

    /// Overwrites the stored list. Last write wins.
    pub fn save(&self, records: &[Record]) -> Result<(), ServerError> {
        let json = serde_json::to_string(records)
            .map_err(|e| ServerError::DbError(format!("Failed to serialize records: {e}")))?;
        let updated_at = Utc::now().to_rfc3339();

        self.db.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
                "#,
                params![&self.key, json, updated_at],
            )
            .map_err(|e| ServerError::DbError(format!("Failed to save records: {e}")))
        })?;

        info!(records = records.len(), "saved records");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::init_db;
    use crate::domain::record::{Category, FormData, GeneralProperty};
    use crate::tests::utils::temp_db;
    use tempfile::TempDir;

    fn store() -> (TempDir, RecordStore) {
        let (dir, db) = temp_db("store");
        init_db(&db, "sql/schema.sql").expect("schema");
        (dir, RecordStore::new(db, "savedRecords"))
    }

    #[test]
    fn missing_key_loads_empty() {
        let mut ids = IdAllocator::new();
        let (_dir, store) = store();
        assert!(store.load(&mut ids).unwrap().is_empty());
    }

    #[test]
    fn save_then_load_recomputes() {
        let (_dir, store) = store();
        let record = Record {
            id: 5,
            timestamp: "2025/01/01 00:00:00".into(),
            form: FormData::General(GeneralProperty {
                total_amount: "1000".into(),
                total_ping: "50".into(),
                unit_price: Some(1.0),
                ..Default::default()
            }),
        };
        store.save(&[record]).unwrap();

        let mut ids = IdAllocator::new();
        let loaded = store.load(&mut ids).unwrap();
        let FormData::General(g) = &loaded[0].form else {
            panic!("expected general record");
        };
        assert_eq!(g.unit_price, Some(20.0));
        assert!(ids.next() > 5);
    }

    #[test]
    fn shared_ids_are_split_on_load() {
        let (_dir, store) = store();
        let record = |name: &str| Record {
            id: 12,
            timestamp: "t".into(),
            form: FormData::Community(crate::domain::record::CommunityListing {
                community_name: name.into(),
                ..Default::default()
            }),
        };
        store.save(&[record("A"), record("B")]).unwrap();

        let mut ids = IdAllocator::new();
        let loaded = store.load(&mut ids).unwrap();
        assert_eq!(loaded[0].id, 12);
        assert_ne!(loaded[1].id, 12);
        assert_eq!(loaded[1].title(), "B");
    }

    #[test]
    fn legacy_entries_are_resolved_on_load() {
        let (_dir, store) = store();
        let legacy = r#"[{"id":"17","timestamp":"t","formData":{"communityName":"Oak"}}, "junk"]"#;
        store
            .db
            .with_conn(|conn| {
                conn.execute(
                    "INSERT INTO kv_store (key, value, updated_at) VALUES ('savedRecords', ?1, 'now')",
                    params![legacy],
                )
                .map_err(|e| ServerError::DbError(e.to_string()))
            })
            .unwrap();

        let mut ids = IdAllocator::new();
        let loaded = store.load(&mut ids).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, 17);
        assert_eq!(loaded[0].category(), Category::Community);
    }
}
