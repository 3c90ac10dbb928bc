pub mod error;
pub mod home;
pub mod import_result;
pub mod record_detail;
pub mod record_form;

pub use error::error_page;
pub use home::home_page;
pub use import_result::{import_result_page, ImportSummary};
pub use record_detail::record_detail_page;
pub use record_form::record_form_page;
