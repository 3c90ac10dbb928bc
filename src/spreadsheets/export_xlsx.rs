use crate::domain::fields;
use crate::domain::record::Record;
use crate::spreadsheets::export_csv::record_rows;
use crate::spreadsheets::{filename_stamp, ExportError, ExportFile};
use chrono::{DateTime, Local};
use rust_xlsxwriter::Workbook;
use tracing::info;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Same columns and cell text as the CSV export, as a workbook.
pub fn export_xlsx(records: &[Record], now: DateTime<Local>) -> Result<ExportFile, ExportError> {
    if records.is_empty() {
        return Err(ExportError::NoRecords);
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    // Headers
    for (col, header) in fields::ordered_labels().enumerate() {
        worksheet
            .write_string(0, col as u16, header)
            .map_err(|e| ExportError::Xlsx(format!("Failed to write header '{header}': {e}")))?;
    }

    // Rows
    for (i, row) in record_rows(records).iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, text) in row.iter().enumerate() {
            if text.is_empty() {
                continue;
            }
            worksheet
                .write_string(r, col as u16, text)
                .map_err(|e| ExportError::Xlsx(format!("Failed to write row {r}: {e}")))?;
        }
    }

    let buffer = workbook
        .save_to_buffer()
        .map_err(|e| ExportError::Xlsx(format!("Failed to save workbook: {e}")))?;

    info!(records = records.len(), "exported XLSX");

    Ok(ExportFile {
        filename: format!("property_records_{}.xlsx", filename_stamp(now)),
        content_type: XLSX_CONTENT_TYPE.to_string(),
        bytes: buffer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::{CommunityListing, FormData};

    #[test]
    fn refuses_empty_and_builds_zip_container() {
        assert!(matches!(
            export_xlsx(&[], Local::now()),
            Err(ExportError::NoRecords)
        ));

        let record = Record {
            id: 1,
            timestamp: "2025/01/01 00:00:00".into(),
            form: FormData::Community(CommunityListing {
                community_name: "Oak Gardens".into(),
                ..Default::default()
            }),
        };
        let file = export_xlsx(&[record], Local::now()).unwrap();
        assert!(file.filename.ends_with(".xlsx"));
        // xlsx files are zip archives
        assert_eq!(&file.bytes[..2], b"PK");
    }
}
