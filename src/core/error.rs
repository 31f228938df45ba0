//! Error types for XMP operations
//!
//! Parsing a packet can only fail on malformed XML, and parsing a date stamp
//! can only fail on a malformed or impossible date.

use thiserror::Error;

/// Error types for XMP operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum XmpError {
    /// The XMP payload is not well-formed XML
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A date stamp does not match the expected layout or is not a real date
    #[error("Format error: {0}")]
    FormatError(String),
}

/// Result type alias for XMP operations
pub type XmpResult<T> = Result<T, XmpError>;

impl From<quick_xml::Error> for XmpError {
    fn from(err: quick_xml::Error) -> Self {
        XmpError::ParseError(format!("XML parsing error: {}", err))
    }
}

impl From<quick_xml::events::attributes::AttrError> for XmpError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        XmpError::ParseError(format!("Invalid attribute: {}", err))
    }
}

impl From<quick_xml::escape::EscapeError> for XmpError {
    fn from(err: quick_xml::escape::EscapeError) -> Self {
        XmpError::ParseError(format!("Invalid escape sequence: {}", err))
    }
}
