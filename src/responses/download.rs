// responses/download.rs
use crate::errors::{ResultResp, ServerError};
use crate::spreadsheets::ExportFile;
use astra::{Body, ResponseBuilder};

/// Return a generated file as an attachment.
pub fn download_response(file: ExportFile) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", file.content_type)
        .header(
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", file.filename),
        )
        .body(Body::from(file.bytes))
        .map_err(|_| ServerError::InternalError)
}
