pub mod delimited;

pub use delimited::{decode, encode_table, CodecError, DecodedRow, BOM};
