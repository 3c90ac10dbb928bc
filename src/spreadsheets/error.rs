use crate::codec::CodecError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing to export; no file is produced.
    #[error("沒有記錄可以匯出！")]
    NoRecords,

    #[error("failed to build spreadsheet: {0}")]
    Xlsx(String),

    #[error("failed to serialize backup: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ImportError {
    /// The upload is not text (e.g. not valid UTF-8).
    #[error("無法讀取檔案: {0}")]
    Unparseable(String),

    #[error("CSV 檔案內容為空: {0}")]
    Codec(#[from] CodecError),

    #[error("檔案格式不正確: {0}")]
    Json(#[from] serde_json::Error),

    /// Backup file parsed but has no `records` list.
    #[error("檔案格式不正確，無法識別為房產記錄。")]
    MissingRecords,
}
