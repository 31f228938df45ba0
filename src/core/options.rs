//! Parse options
//!
//! Controls how property names become map keys and how repeated values for
//! the same key are merged.

/// How a property name is turned into a map key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum KeyPolicy {
    /// Lower-cased local name only (`xmp:CreateDate` -> `createdate`).
    ///
    /// Properties with the same local name in different namespaces share a key.
    #[default]
    Unqualified,
    /// Lower-cased `prefix:local` (`xmp:CreateDate` -> `xmp:createdate`).
    ///
    /// The prefix comes from the Description's in-scope declarations.
    /// Properties whose namespace has no prefix there are skipped.
    Qualified,
}

/// How repeated values for one key are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MergePolicy {
    /// Keep every distinct value in order of first occurrence.
    #[default]
    Accumulate,
    /// Keep only the last value written.
    Overwrite,
}

/// Options for parsing an XMP packet into a map.
///
/// Use the builder pattern to configure options.
///
/// # Example
///
/// ```rust
/// use xmpdict::{ParseOptions, XmpParser};
///
/// let parser = XmpParser::new(ParseOptions::default().qualified().overwrite());
/// let map = parser.parse(r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
///     xmlns:pdf="http://ns.adobe.com/pdf/1.3/">
///   <rdf:Description pdf:Producer="Ghostscript"/>
/// </rdf:RDF>"#)?;
/// assert_eq!(map.get("pdf:producer"), Some("Ghostscript"));
/// # Ok::<(), xmpdict::XmpError>(())
/// ```
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParseOptions {
    /// Key naming policy (default: unqualified)
    pub key_policy: KeyPolicy,
    /// Value merge policy (default: accumulate)
    pub merge_policy: MergePolicy,
    /// Record `rdf:li` items of `rdf:Seq`/`rdf:Bag`/`rdf:Alt` containers
    /// under the enclosing property (default: false)
    pub collect_list_items: bool,
}

impl ParseOptions {
    /// Key properties by `prefix:local`.
    pub fn qualified(mut self) -> Self {
        self.key_policy = KeyPolicy::Qualified;
        self
    }

    /// Key properties by local name only.
    pub fn unqualified(mut self) -> Self {
        self.key_policy = KeyPolicy::Unqualified;
        self
    }

    /// Keep only the last value written for each key.
    pub fn overwrite(mut self) -> Self {
        self.merge_policy = MergePolicy::Overwrite;
        self
    }

    /// Keep every distinct value for each key.
    pub fn accumulate(mut self) -> Self {
        self.merge_policy = MergePolicy::Accumulate;
        self
    }

    /// Also record list items of RDF containers.
    ///
    /// Without this, a property such as `dc:creator` whose value is an
    /// `rdf:Seq` has no direct text and is not recorded.
    pub fn collect_list_items(mut self) -> Self {
        self.collect_list_items = true;
        self
    }
}
