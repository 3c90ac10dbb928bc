pub mod calculator;
pub mod catalog;
pub mod fields;
pub mod record;
pub mod resolver;
