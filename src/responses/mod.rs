pub mod download;
pub mod errors;
pub mod html;

pub use download::download_response;
pub use errors::error_to_response;
pub use html::{html_response, redirect};
