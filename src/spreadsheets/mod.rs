pub mod backup_json;
pub mod error;
pub mod export_csv;
pub mod export_xlsx;
pub mod import_csv;

pub use backup_json::{export_backup, parse_backup};
pub use error::{ExportError, ImportError};
pub use export_csv::export_csv;
pub use export_xlsx::export_xlsx;
pub use import_csv::{import_csv, SkippedRow};

/// A generated download.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// `YYYYMMDD_HHMMSS`, so repeated exports in one session do not overwrite
/// each other.
pub fn filename_stamp(now: chrono::DateTime<chrono::Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}
