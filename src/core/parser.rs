//! XMP XML/RDF parser
//!
//! This module flattens the `rdf:Description` blocks of an XMP packet into an
//! [`XmpMetadata`] map. Only Descriptions that are direct children of
//! `rdf:RDF` or of the root element are visited; property values are the attributes of a Description
//! and the direct text of its child elements.

use crate::core::error::{XmpError, XmpResult};
use crate::core::metadata::XmpMetadata;
use crate::core::namespace::{ns, split_qname, NamespaceScopes, PrefixTable};
use crate::core::options::{KeyPolicy, ParseOptions};
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, trace};

/// UTF-8 byte order mark, emitted by some writers ahead of the packet
const UTF8_BOM: &str = "\u{feff}";

/// Characters stripped from both ends of every value
const VALUE_TRIM: &[char] = &[' ', '\n', '\t', '\r'];

/// Parser turning XMP packets into [`XmpMetadata`] maps
///
/// The parser holds only its options, so one instance can be shared freely
/// between threads.
///
/// # Example
///
/// ```rust
/// use xmpdict::XmpParser;
///
/// let xmp = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
///     xmlns:dc="http://purl.org/dc/elements/1.1/">
///   <rdf:Description>
///     <dc:format>application/pdf</dc:format>
///   </rdf:Description>
/// </rdf:RDF>"#;
///
/// let map = XmpParser::default().parse(xmp)?;
/// assert_eq!(map.get("format"), Some("application/pdf"));
/// # Ok::<(), xmpdict::XmpError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct XmpParser {
    options: ParseOptions,
}

impl XmpParser {
    /// Create a new XMP parser
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Options this parser was built with
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse an XMP packet into a map
    ///
    /// Accepts raw bytes (as read from a metadata stream) or text. Fails with
    /// [`XmpError::ParseError`] if the payload is not well-formed XML; no
    /// partial map is returned in that case.
    pub fn parse(&self, xmp: impl AsRef<[u8]>) -> XmpResult<XmpMetadata> {
        let xml = decode_packet(xmp.as_ref())?;
        let mut walker = Walker::new(self.options);
        walker.run(xml)?;
        debug!(
            descriptions = walker.descriptions,
            keys = walker.metadata.len(),
            "parsed XMP packet"
        );
        Ok(walker.metadata)
    }
}

/// Parse an XMP packet with default options
///
/// Keys are lower-cased local names and every distinct value is kept.
pub fn xmp_to_map(xmp: impl AsRef<[u8]>) -> XmpResult<XmpMetadata> {
    XmpParser::default().parse(xmp)
}

/// Validate the payload as UTF-8 and drop a leading byte order mark
fn decode_packet(bytes: &[u8]) -> XmpResult<&str> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| XmpError::ParseError(format!("XMP packet is not valid UTF-8: {}", e)))?;
    Ok(text.strip_prefix(UTF8_BOM).unwrap_or(text))
}

/// Trim a raw value, returning `None` if nothing is left
fn trim_value(raw: &str) -> Option<&str> {
    let trimmed = raw.trim_matches(VALUE_TRIM);
    (!trimmed.is_empty()).then_some(trimmed)
}

/// What an open element means to the walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    /// Outside any `rdf:RDF` (e.g. `x:xmpmeta`)
    Outer,
    /// `rdf:RDF`
    Rdf,
    /// `rdf:Description` directly under `rdf:RDF` or directly under the
    /// root element
    Description,
    /// Direct child of a Description
    Property,
    /// `rdf:Seq`/`rdf:Bag`/`rdf:Alt` directly under a property
    Container,
    /// `rdf:li` directly under a container
    ListItem,
    /// Anything deeper, ignored
    Nested,
}

#[derive(Debug)]
struct Frame {
    name: String,
    role: Role,
}

/// Property currently being read
#[derive(Debug)]
struct OpenProperty {
    key: Option<String>,
    text: String,
    // Text after the first child node (element, comment or PI) is not part
    // of the value
    text_closed: bool,
}

/// Description currently being read
#[derive(Debug)]
struct OpenDescription {
    table: PrefixTable,
    index: usize,
    recorded: usize,
}

/// Event-driven walk over one packet
struct Walker {
    options: ParseOptions,
    scopes: NamespaceScopes,
    stack: Vec<Frame>,
    description: Option<OpenDescription>,
    property: Option<OpenProperty>,
    list_item: Option<String>,
    root_seen: bool,
    root_closed: bool,
    descriptions: usize,
    metadata: XmpMetadata,
}

impl Walker {
    fn new(options: ParseOptions) -> Self {
        Self {
            options,
            scopes: NamespaceScopes::new(),
            stack: Vec::new(),
            description: None,
            property: None,
            list_item: None,
            root_seen: false,
            root_closed: false,
            descriptions: 0,
            metadata: XmpMetadata::new(),
        }
    }

    fn run(&mut self, xml: &str) -> XmpResult<()> {
        let mut reader = Reader::from_str(xml);

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => self.open_element(&e)?,
                Ok(Event::Empty(e)) => {
                    self.open_element(&e)?;
                    self.close_element()?;
                }
                Ok(Event::End(_)) => self.close_element()?,
                Ok(Event::Text(e)) => {
                    let text = e.xml_content().map_err(|err| {
                        XmpError::ParseError(format!("Invalid text content: {}", err))
                    })?;
                    self.push_text(&text)?;
                }
                Ok(Event::CData(e)) => {
                    let text = e.xml_content().map_err(|err| {
                        XmpError::ParseError(format!("Invalid CDATA content: {}", err))
                    })?;
                    self.push_text(&text)?;
                }
                Ok(Event::Comment(_)) | Ok(Event::PI(_)) => self.close_property_text(),
                Ok(Event::GeneralRef(e)) => {
                    let text = resolve_reference(&e)?;
                    self.push_text(&text)?;
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(XmpError::ParseError(format!(
                        "XML parsing error at position {}: {}",
                        reader.error_position(),
                        e
                    )));
                }
            }
        }

        if let Some(frame) = self.stack.last() {
            return Err(XmpError::ParseError(format!(
                "Unexpected end of document, <{}> is not closed",
                frame.name
            )));
        }
        if !self.root_seen {
            return Err(XmpError::ParseError("Document has no root element".to_string()));
        }
        Ok(())
    }

    fn open_element(&mut self, e: &BytesStart<'_>) -> XmpResult<()> {
        let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
        if self.root_closed {
            return Err(XmpError::ParseError(format!(
                "Unexpected element <{}> after the root element",
                name
            )));
        }
        self.root_seen = true;

        let (declarations, attrs) = Self::collect_attributes(e)?;
        self.scopes.push(declarations);

        let (prefix, local) = split_qname(&name);
        if !prefix.is_empty() && self.scopes.resolve(prefix).is_none() {
            return Err(XmpError::ParseError(format!(
                "Namespace prefix '{}' on <{}> is not defined",
                prefix, name
            )));
        }
        for (attr_name, _) in &attrs {
            let (attr_prefix, _) = split_qname(attr_name);
            if !attr_prefix.is_empty() && self.scopes.resolve(attr_prefix).is_none() {
                return Err(XmpError::ParseError(format!(
                    "Namespace prefix '{}' on attribute '{}' of <{}> is not defined",
                    attr_prefix, attr_name, name
                )));
            }
        }

        let is_rdf = self.scopes.resolve(prefix) == Some(ns::RDF);
        let parent = self.stack.last().map(|frame| frame.role);

        let role = match parent {
            None | Some(Role::Outer) if is_rdf && local == "RDF" => Role::Rdf,
            Some(Role::Outer) if self.stack.len() == 1 && is_rdf && local == "Description" => {
                Role::Description
            }
            None | Some(Role::Outer) => Role::Outer,
            Some(Role::Rdf) if is_rdf && local == "Description" => Role::Description,
            Some(Role::Rdf) => Role::Nested,
            Some(Role::Description) => Role::Property,
            Some(Role::Property)
                if self.options.collect_list_items
                    && is_rdf
                    && matches!(local, "Seq" | "Bag" | "Alt") =>
            {
                Role::Container
            }
            Some(Role::Container) if is_rdf && local == "li" => Role::ListItem,
            Some(_) => Role::Nested,
        };

        if parent == Some(Role::Property) {
            self.close_property_text();
        }

        match role {
            Role::Description => self.open_description(&attrs),
            Role::Property => {
                let uri = self.scopes.resolve(prefix).map(str::to_string);
                let key = self.property_key(uri.as_deref(), local);
                self.property = Some(OpenProperty {
                    key,
                    text: String::new(),
                    text_closed: false,
                });
            }
            Role::ListItem => self.list_item = Some(String::new()),
            _ => {}
        }

        self.stack.push(Frame { name, role });
        Ok(())
    }

    fn close_element(&mut self) -> XmpResult<()> {
        let Some(frame) = self.stack.pop() else {
            return Err(XmpError::ParseError("Unexpected closing tag".to_string()));
        };

        match frame.role {
            Role::Description => {
                if let Some(description) = self.description.take() {
                    debug!(
                        index = description.index,
                        recorded = description.recorded,
                        "processed rdf:Description"
                    );
                }
            }
            Role::Property => {
                if let Some(property) = self.property.take() {
                    if let (Some(key), Some(value)) = (property.key, trim_value(&property.text)) {
                        self.record(key, value.to_string());
                    }
                }
            }
            Role::ListItem => {
                let item = self.list_item.take();
                let key = self.property.as_ref().and_then(|p| p.key.clone());
                if let (Some(key), Some(item)) = (key, item) {
                    if let Some(value) = trim_value(&item) {
                        self.record(key, value.to_string());
                    }
                }
            }
            _ => {}
        }

        self.scopes.pop();
        if self.stack.is_empty() {
            self.root_closed = true;
        }
        Ok(())
    }

    /// Any node other than text ends the direct text of the open property
    fn close_property_text(&mut self) {
        let in_property = self.stack.last().map(|frame| frame.role) == Some(Role::Property);
        if let (true, Some(property)) = (in_property, self.property.as_mut()) {
            property.text_closed = true;
        }
    }

    fn push_text(&mut self, text: &str) -> XmpResult<()> {
        let Some(frame) = self.stack.last() else {
            if text.trim().is_empty() {
                return Ok(());
            }
            return Err(XmpError::ParseError(
                "Text content outside the root element".to_string(),
            ));
        };

        match frame.role {
            Role::Property => {
                if let Some(property) = self.property.as_mut() {
                    if !property.text_closed {
                        property.text.push_str(text);
                    }
                }
            }
            Role::ListItem => {
                if let Some(item) = self.list_item.as_mut() {
                    item.push_str(text);
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Start a Description: derive its prefix table and record its attributes
    fn open_description(&mut self, attrs: &[(String, String)]) {
        let index = self.descriptions;
        self.descriptions += 1;
        self.description = Some(OpenDescription {
            table: self.scopes.prefix_table(),
            index,
            recorded: 0,
        });

        for (attr_name, attr_value) in attrs {
            let Some(value) = trim_value(attr_value) else {
                continue;
            };
            // Unprefixed attributes are in no namespace
            let (prefix, local) = split_qname(attr_name);
            let uri = if prefix.is_empty() {
                None
            } else {
                self.scopes.resolve(prefix).map(str::to_string)
            };
            if let Some(key) = self.property_key(uri.as_deref(), local) {
                self.record(key, value.to_string());
            }
        }
    }

    /// Build the map key for a property per the key policy
    fn property_key(&self, uri: Option<&str>, local: &str) -> Option<String> {
        match self.options.key_policy {
            KeyPolicy::Unqualified => Some(local.to_lowercase()),
            KeyPolicy::Qualified => {
                let prefix = uri.and_then(|uri| {
                    self.description
                        .as_ref()
                        .and_then(|d| d.table.get_prefix(uri))
                });
                match prefix {
                    Some(prefix) => Some(format!(
                        "{}:{}",
                        prefix.to_lowercase(),
                        local.to_lowercase()
                    )),
                    None => {
                        debug!(
                            property = local,
                            namespace = uri.unwrap_or_default(),
                            "skipping property without a namespace prefix"
                        );
                        None
                    }
                }
            }
        }
    }

    fn record(&mut self, key: String, value: String) {
        trace!(key = %key, value = %value, "recording XMP value");
        if self.metadata.record(key, value, self.options.merge_policy) {
            if let Some(description) = self.description.as_mut() {
                description.recorded += 1;
            }
        }
    }

    /// Split an element's attributes into namespace declarations
    /// (`(prefix, uri)`, default namespace as `""`) and plain attributes.
    #[allow(clippy::type_complexity)]
    fn collect_attributes(
        e: &BytesStart<'_>,
    ) -> XmpResult<(Vec<(String, String)>, Vec<(String, String)>)> {
        let mut declarations = Vec::new();
        let mut attrs = Vec::new();

        for attr in e.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            // Literal whitespace is normalized before entities are decoded so
            // that `&#10;` still yields a newline
            let raw_value = normalize_attribute_literal(&String::from_utf8_lossy(
                attr.value.as_ref(),
            ));
            let value = unescape(&raw_value)?.into_owned();

            if key == "xmlns" {
                declarations.push((String::new(), value));
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                declarations.push((prefix.to_string(), value));
            } else {
                attrs.push((key, value));
            }
        }

        Ok((declarations, attrs))
    }
}

/// Attribute-value normalization of a raw literal: line ends, tabs and
/// newlines become single spaces (a CRLF pair counts as one line end)
fn normalize_attribute_literal(raw: &str) -> String {
    raw.replace("\r\n", " ").replace(['\r', '\n', '\t'], " ")
}

/// Resolve a character or predefined entity reference (`&#169;`, `&amp;`)
fn resolve_reference(e: &BytesRef<'_>) -> XmpResult<String> {
    let resolved = e
        .resolve_char_ref()
        .map_err(|err| XmpError::ParseError(format!("Invalid character reference: {}", err)))?;
    if let Some(ch) = resolved {
        return Ok(ch.to_string());
    }

    let name = String::from_utf8_lossy(e.as_ref());
    resolve_predefined_entity(&name)
        .map(str::to_string)
        .ok_or_else(|| XmpError::ParseError(format!("Undefined entity reference: &{};", name)))
}
