//! Namespace handling for XMP packets
//!
//! XMP properties are qualified by namespace URI. Within a packet each URI is
//! bound to a short prefix through `xmlns:prefix="uri"` declarations, which may
//! appear on the Description itself or on any enclosing element.

use std::collections::{HashMap, HashSet};

/// Well-known XMP namespaces
pub mod ns {
    /// RDF namespace
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// XML namespace (for xml:lang, etc.)
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
    /// XMP Basic namespace
    pub const XMP: &str = "http://ns.adobe.com/xap/1.0/";
    /// Dublin Core namespace
    pub const DC: &str = "http://purl.org/dc/elements/1.1/";
    /// PDF namespace
    pub const PDF: &str = "http://ns.adobe.com/pdf/1.3/";
    /// XML prefix
    pub const XML_PREFIX: &str = "xml";
}

/// Map of namespace URI to the display prefix used within one Description
///
/// The first non-empty prefix seen for a URI wins; later declarations binding
/// another prefix to the same URI are ignored, and the default namespace
/// (empty prefix) is never recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixTable {
    uri_to_prefix: HashMap<String, String>,
}

impl PrefixTable {
    /// Create an empty prefix table
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `prefix` for `uri` unless the URI already has a prefix or the
    /// prefix is empty.
    ///
    /// Returns `true` if the declaration was recorded.
    pub fn declare(&mut self, uri: &str, prefix: &str) -> bool {
        if prefix.is_empty() || uri.is_empty() || self.uri_to_prefix.contains_key(uri) {
            return false;
        }
        self.uri_to_prefix
            .insert(uri.to_string(), prefix.to_string());
        true
    }

    /// Get the prefix for a namespace URI
    pub fn get_prefix(&self, uri: &str) -> Option<&str> {
        self.uri_to_prefix.get(uri).map(|s| s.as_str())
    }

    /// Check if a namespace URI has a prefix
    pub fn has_uri(&self, uri: &str) -> bool {
        self.uri_to_prefix.contains_key(uri)
    }

    /// Number of URIs with a recorded prefix
    pub fn len(&self) -> usize {
        self.uri_to_prefix.len()
    }

    /// Whether no URI has a recorded prefix
    pub fn is_empty(&self) -> bool {
        self.uri_to_prefix.is_empty()
    }
}

/// Stack of namespace declarations, one frame per open element.
///
/// Used while walking the event stream to resolve element and attribute
/// prefixes and to derive the in-scope [`PrefixTable`] of a Description.
#[derive(Debug, Clone, Default)]
pub(crate) struct NamespaceScopes {
    // (prefix, uri) in declaration order; "" is the default namespace
    frames: Vec<Vec<(String, String)>>,
}

impl NamespaceScopes {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, declarations: Vec<(String, String)>) {
        self.frames.push(declarations);
    }

    pub(crate) fn pop(&mut self) {
        self.frames.pop();
    }

    /// Resolve a prefix ("" for unprefixed element names) to its URI.
    ///
    /// An empty URI (`xmlns=""`) undeclares the default namespace.
    pub(crate) fn resolve(&self, prefix: &str) -> Option<&str> {
        if prefix == ns::XML_PREFIX {
            return Some(ns::XML);
        }
        self.frames
            .iter()
            .rev()
            .flat_map(|frame| frame.iter())
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
            .filter(|uri| !uri.is_empty())
    }

    /// Build the prefix table for the innermost element.
    ///
    /// Frames are visited innermost first; a prefix shadowed by an inner
    /// declaration does not contribute its outer binding.
    pub(crate) fn prefix_table(&self) -> PrefixTable {
        let mut table = PrefixTable::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for frame in self.frames.iter().rev() {
            for (prefix, uri) in frame {
                if !seen.insert(prefix.as_str()) {
                    continue;
                }
                table.declare(uri, prefix);
            }
        }
        table
    }
}

/// Split a raw qualified name into `(prefix, local)`; the prefix is empty when
/// the name has none.
pub(crate) fn split_qname(name: &str) -> (&str, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (prefix, local),
        None => ("", name),
    }
}
