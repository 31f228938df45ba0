//! # xmpdict
//!
//! Flatten XMP (RDF/XML) metadata packets, such as the `/Metadata` stream of a
//! PDF, into a key/value map, and parse PDF date stamps.
//!
//! ```rust
//! use xmpdict::{parse_date, xmp_to_map};
//!
//! let xmp = r#"<x:xmpmeta xmlns:x="adobe:ns:meta/">
//!  <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
//!   <rdf:Description xmlns:pdf="http://ns.adobe.com/pdf/1.3/"
//!                    pdf:Producer="Ghostscript"
//!                    pdf:CreationDate="D:19861200000000"/>
//!  </rdf:RDF>
//! </x:xmpmeta>"#;
//!
//! let map = xmp_to_map(xmp)?;
//! assert_eq!(map.get("producer"), Some("Ghostscript"));
//!
//! let created = parse_date(map.get("creationdate").unwrap())?;
//! assert_eq!(created.to_string(), "1986-12-01 00:00:00");
//! # Ok::<(), xmpdict::XmpError>(())
//! ```
//!
//! Keys default to lower-cased local names with every distinct value kept;
//! see [`ParseOptions`] for namespace-qualified keys and last-write-wins
//! values.

pub mod core;
pub mod utils;

pub use crate::core::{
    ns, xmp_to_map, KeyPolicy, MergePolicy, ParseOptions, PrefixTable, XmpError, XmpMetadata,
    XmpParser, XmpResult,
};
pub use crate::utils::datetime::{parse_date, parse_xmp_date, PdfDate};
