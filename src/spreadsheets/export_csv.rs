use crate::codec::{encode_table, BOM};
use crate::domain::fields;
use crate::domain::record::Record;
use crate::spreadsheets::{filename_stamp, ExportError, ExportFile};
use chrono::{DateTime, Local};
use tracing::info;

/// Cell text for every record in dictionary column order. Derived numbers are
/// recomputed first so the file never carries stale values.
pub fn record_rows(records: &[Record]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|record| {
            let mut record = record.clone();
            record.recompute_derived();
            record
                .field_texts()
                .into_iter()
                .map(|(_, text)| text)
                .collect()
        })
        .collect()
}

/// CSV text without the byte-order mark.
pub fn csv_text(records: &[Record]) -> String {
    encode_table(fields::ordered_labels(), record_rows(records))
}

/// Builds the downloadable CSV. Fails with [`ExportError::NoRecords`] when
/// there is nothing to write.
pub fn export_csv(records: &[Record], now: DateTime<Local>) -> Result<ExportFile, ExportError> {
    if records.is_empty() {
        return Err(ExportError::NoRecords);
    }

    let mut content = String::new();
    content.push(BOM);
    content.push_str(&csv_text(records));

    info!(records = records.len(), "exported CSV");

    Ok(ExportFile {
        filename: format!("property_records_{}.csv", filename_stamp(now)),
        content_type: mime::TEXT_CSV_UTF_8.to_string(),
        bytes: content.into_bytes(),
    })
}
