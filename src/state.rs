// src/state.rs

use crate::config::Settings;
use crate::db::RecordStore;
use crate::domain::record::{display_timestamp, rekey_duplicates, FormData, IdAllocator, Record};
use crate::errors::ServerError;
use chrono::Local;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

/// Everything a request handler needs. Built once in `main` and shared with
/// the server loop.
pub struct AppState {
    pub settings: Settings,
    pub store: RecordStore,
    ledger: Mutex<Ledger>,
}

impl AppState {
    /// Loads the persisted records into memory.
    pub fn open(settings: Settings, store: RecordStore) -> Result<Self, ServerError> {
        let mut ids = IdAllocator::new();
        let records = store.load(&mut ids)?;
        Ok(Self {
            settings,
            store,
            ledger: Mutex::new(Ledger { records, ids }),
        })
    }

    pub fn ledger(&self) -> Result<MutexGuard<'_, Ledger>, ServerError> {
        self.ledger.lock().map_err(|_| ServerError::InternalError)
    }

    /// Applies `change` to the ledger and persists the resulting list.
    ///
    /// A failed write is returned to the caller, but the in-memory change is
    /// kept; the next successful write brings storage back in line.
    pub fn mutate<T>(
        &self,
        change: impl FnOnce(&mut Ledger) -> Result<T, ServerError>,
    ) -> Result<T, ServerError> {
        let mut ledger = self.ledger()?;
        let out = change(&mut ledger)?;
        self.store.save(ledger.records())?;
        Ok(out)
    }
}

/// The in-memory record list and the id source for new records.
#[derive(Debug, Default)]
pub struct Ledger {
    records: Vec<Record>,
    ids: IdAllocator,
}

impl Ledger {
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn ids(&mut self) -> &mut IdAllocator {
        &mut self.ids
    }

    pub fn get(&self, id: i64) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Saves a newly submitted form under a fresh id.
    pub fn create(&mut self, form: FormData) -> &Record {
        let mut record = Record {
            id: self.ids.next(),
            timestamp: display_timestamp(Local::now()),
            form,
        };
        record.recompute_derived();
        info!(id = record.id, category = record.category().as_str(), "created record");
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// Replaces a record's form, keeping its id and category.
    pub fn replace(&mut self, id: i64, form: FormData) -> Result<&Record, ServerError> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(ServerError::NotFound)?;

        if record.category() != form.category() {
            return Err(ServerError::BadRequest(format!(
                "record {id} is a {} record and cannot become {}",
                record.category().label(),
                form.category().label()
            )));
        }

        record.form = form;
        record.timestamp = display_timestamp(Local::now());
        record.recompute_derived();
        info!(id, "updated record");
        Ok(record)
    }

    pub fn delete(&mut self, id: i64) -> Result<Record, ServerError> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(ServerError::NotFound)?;
        info!(id, "deleted record");
        Ok(self.records.remove(index))
    }

    /// Appends imported records. An id already in use (by an existing record
    /// or an earlier record of the same batch) is replaced by a fresh one.
    /// Returns how many ids were re-keyed.
    pub fn append_imported(&mut self, imported: Vec<Record>) -> usize {
        let mut taken: HashSet<i64> = self.records.iter().map(|r| r.id).collect();
        let mut rekeyed = 0;

        for mut record in imported {
            self.ids.observe(record.id);
            if !taken.insert(record.id) {
                let fresh = self.ids.next();
                warn!(old = record.id, new = fresh, "imported id already in use, re-keyed");
                record.id = fresh;
                taken.insert(fresh);
                rekeyed += 1;
            }
            record.recompute_derived();
            self.records.push(record);
        }
        rekeyed
    }

    /// Swaps in a whole new record list (backup restore). Repeated ids in
    /// the incoming list are re-keyed; returns how many.
    pub fn replace_all(&mut self, mut records: Vec<Record>) -> usize {
        let rekeyed = rekey_duplicates(&mut records, &mut self.ids);
        for r in &mut records {
            r.recompute_derived();
        }
        info!(records = records.len(), rekeyed, "replaced all records");
        self.records = records;
        rekeyed
    }
}
