//! Flattened XMP metadata map
//!
//! [`XmpMetadata`] is the result of parsing a packet: lower-cased property
//! keys mapped to the trimmed, non-empty values found for them.

use crate::core::error::{XmpError, XmpResult};
use crate::core::options::MergePolicy;
use crate::core::parser::XmpParser;
use crate::utils::datetime::parse_xmp_date;
use chrono::NaiveDateTime;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Key/value view of an XMP packet
///
/// Every key maps to at least one value. Under [`MergePolicy::Overwrite`]
/// every key maps to exactly one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct XmpMetadata {
    entries: BTreeMap<String, Vec<String>>,
}

impl XmpMetadata {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a packet with default options
    ///
    /// # Example
    ///
    /// ```rust
    /// use xmpdict::XmpMetadata;
    ///
    /// let map = XmpMetadata::parse(r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
    ///     xmlns:xmp="http://ns.adobe.com/xap/1.0/">
    ///   <rdf:Description xmp:CreatorTool="Writer"/>
    /// </rdf:RDF>"#)?;
    /// assert_eq!(map.get("creatortool"), Some("Writer"));
    /// # Ok::<(), xmpdict::XmpError>(())
    /// ```
    pub fn parse(xmp: impl AsRef<[u8]>) -> XmpResult<Self> {
        XmpParser::default().parse(xmp)
    }

    /// Store a value under `key` according to `policy`.
    ///
    /// Returns `true` if the map changed.
    pub(crate) fn record(&mut self, key: String, value: String, policy: MergePolicy) -> bool {
        let values = self.entries.entry(key).or_default();
        match policy {
            MergePolicy::Overwrite => {
                if values.len() == 1 && values[0] == value {
                    return false;
                }
                values.clear();
                values.push(value);
                true
            }
            MergePolicy::Accumulate => {
                if values.contains(&value) {
                    return false;
                }
                values.push(value);
                true
            }
        }
    }

    /// Latest value stored for a key
    ///
    /// The lookup is case-insensitive since all keys are stored lower-cased.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key)
            .and_then(|values| values.last())
            .map(|s| s.as_str())
    }

    /// All values stored for a key, in order of first occurrence
    pub fn get_all(&self, key: &str) -> Option<&[String]> {
        self.entries
            .get(key.to_lowercase().as_str())
            .map(|values| values.as_slice())
    }

    /// Check if a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key.to_lowercase().as_str())
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    /// `(key, values)` pairs in key order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Group `prefix:local` keys by prefix.
    ///
    /// Meant for maps parsed with [`KeyPolicy::Qualified`](crate::KeyPolicy::Qualified);
    /// keys without a prefix are grouped under `""`.
    pub fn grouped_by_prefix(&self) -> BTreeMap<&str, BTreeMap<&str, &[String]>> {
        let mut groups: BTreeMap<&str, BTreeMap<&str, &[String]>> = BTreeMap::new();
        for (key, values) in &self.entries {
            let (prefix, local) = key.split_once(':').unwrap_or(("", key.as_str()));
            groups
                .entry(prefix)
                .or_default()
                .insert(local, values.as_slice());
        }
        groups
    }

    /// Parse the latest value of a date-valued property such as `createdate`.
    ///
    /// Accepts PDF date stamps (`D:20240115103000`) and XMP ISO 8601 dates.
    /// Returns `None` if the key is absent.
    pub fn date(&self, key: &str) -> Option<XmpResult<NaiveDateTime>> {
        self.get(key).map(parse_xmp_date)
    }

    /// Consume the map and return the underlying entries
    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.entries
    }

    /// Render the map as a JSON object of key to value arrays
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.entries)
    }
}

impl FromStr for XmpMetadata {
    type Err = XmpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Iterator over the entries of an [`XmpMetadata`]
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, String, Vec<String>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a [String]);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a XmpMetadata {
    type Item = (&'a str, &'a [String]);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
