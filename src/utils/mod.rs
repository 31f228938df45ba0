//! Helpers for values found in document metadata

pub mod datetime;

pub use datetime::{parse_date, parse_xmp_date, PdfDate};
