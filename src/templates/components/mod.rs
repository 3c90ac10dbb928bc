pub mod card;
pub mod form_fields;
pub mod record_summary;

pub use card::card;
pub use record_summary::{number_or_dash, record_summary};
