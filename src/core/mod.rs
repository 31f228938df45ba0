//! XMP Core module
//!
//! This module contains the packet-to-map parser together with its error,
//! namespace, option and output types.

pub mod error;
pub mod metadata;
pub mod namespace;
pub mod options;
pub mod parser;

pub use error::{XmpError, XmpResult};
pub use metadata::XmpMetadata;
pub use namespace::{ns, PrefixTable};
pub use options::{KeyPolicy, MergePolicy, ParseOptions};
pub use parser::{xmp_to_map, XmpParser};
