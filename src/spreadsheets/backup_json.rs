use crate::domain::record::{IdAllocator, Record};
use crate::domain::resolver::record_from_value;
use crate::spreadsheets::{filename_stamp, ExportError, ExportFile, ImportError};
use chrono::{DateTime, Local, SecondsFormat};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

/// A parsed backup file. Importing it replaces the whole record list.
#[derive(Debug)]
pub struct Backup {
    pub exported_at: Option<String>,
    pub records: Vec<Record>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BackupFile<'a> {
    exported_at: String,
    records: &'a [Record],
}

/// `{ "exportedAt": ..., "records": [...] }`, pretty printed.
pub fn export_backup(records: &[Record], now: DateTime<Local>) -> Result<ExportFile, ExportError> {
    if records.is_empty() {
        return Err(ExportError::NoRecords);
    }

    let file = BackupFile {
        exported_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        records,
    };
    let json = serde_json::to_string_pretty(&file)?;

    info!(records = records.len(), "exported JSON backup");

    Ok(ExportFile {
        filename: format!("property_backup_{}.json", filename_stamp(now)),
        content_type: mime::APPLICATION_JSON.to_string(),
        bytes: json.into_bytes(),
    })
}

/// Reads a backup file. Entries that are not objects are dropped with a
/// warning; everything else goes through the category resolver.
pub fn parse_backup(
    text: &str,
    ids: &mut IdAllocator,
    now: DateTime<Local>,
) -> Result<Backup, ImportError> {
    let value: Value = serde_json::from_str(text)?;
    let entries = value
        .get("records")
        .and_then(Value::as_array)
        .ok_or(ImportError::MissingRecords)?;

    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        match record_from_value(entry, ids, now) {
            Some(record) => records.push(record),
            None => warn!(index, "skipping backup entry that is not a record"),
        }
    }

    Ok(Backup {
        exported_at: value
            .get("exportedAt")
            .and_then(Value::as_str)
            .map(str::to_string),
        records,
    })
}
