//! Placeholder marker extraction.
//!
//! Templates embed markers of the form
//! `<marker:include type="head" name="main" title="x" />`. Extraction turns
//! every occurrence into a [`Marker`] carrying the exact raw token, the
//! marker type, the optional `name` attribute and the full attribute list.
//!
//! Attribute values are double-quoted and may not contain a double quote;
//! escaped quotes such as `name="a\"b"` are not supported and cut the value
//! short at the backslash.

use regex::Regex;
use serde::Serialize;

use crate::error::DocumentResult;
use crate::renderer::escape_html;

/// Default namespace prefix of the marker tag.
pub const DEFAULT_MARKER_TAG: &str = "marker";

/// Ordered string attributes of a marker.
///
/// Insertion order is kept. Inserting an existing key replaces the value
/// in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    /// Create an empty attribute list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace an attribute.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Get an attribute value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Check if an attribute is present.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as `key="value"` pairs separated by spaces. Values are escaped.
    pub fn to_html(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", k, escape_html(v)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut attributes = Attributes::new();
        for (k, v) in iter {
            attributes.insert(k, v);
        }
        attributes
    }
}

/// A single placeholder occurrence in a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Marker {
    /// Exact substring matched in the template.
    pub raw: String,
    /// Marker type, e.g. `head` or `content`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Value of the `name` attribute, if any.
    pub name: Option<String>,
    /// All attributes except `type`, including `name`.
    pub attributes: Attributes,
}

impl Marker {
    /// The `title` attribute, used as buffer variant.
    pub fn variant(&self) -> Option<&str> {
        self.attributes.get("title")
    }
}

/// Scans template text for markers.
#[derive(Debug, Clone)]
pub struct MarkerExtractor {
    marker_pattern: Regex,
    attribute_pattern: Regex,
}

impl MarkerExtractor {
    /// Create an extractor for `<marker:include ... />` tags.
    pub fn new() -> DocumentResult<Self> {
        Self::with_tag(DEFAULT_MARKER_TAG)
    }

    /// Create an extractor for `<{tag}:include ... />` tags.
    pub fn with_tag(tag: &str) -> DocumentResult<Self> {
        let marker_pattern = Regex::new(&format!(
            r#"(?i)<{}:include\s+type="([^"]+)"(.*?)/>"#,
            regex::escape(tag)
        ))?;
        let attribute_pattern = Regex::new(r#"([\w:-]+)\s?=\s?"([^"]*)""#)?;

        Ok(Self {
            marker_pattern,
            attribute_pattern,
        })
    }

    /// Pattern matching a whole marker token.
    pub(crate) fn pattern(&self) -> &Regex {
        &self.marker_pattern
    }

    /// Extract all markers in document order. Repeated tokens yield
    /// repeated entries.
    pub fn extract(&self, text: &str) -> Vec<Marker> {
        self.marker_pattern
            .captures_iter(text)
            .map(|caps| {
                let attributes = caps
                    .get(2)
                    .map(|m| self.parse_attributes(m.as_str()))
                    .unwrap_or_default();
                let name = attributes.get("name").map(String::from);

                Marker {
                    raw: caps[0].to_string(),
                    kind: caps[1].to_string(),
                    name,
                    attributes,
                }
            })
            .collect()
    }

    /// Parse `key="value"` pairs.
    pub fn parse_attributes(&self, text: &str) -> Attributes {
        self.attribute_pattern
            .captures_iter(text)
            .map(|caps| (caps[1].to_string(), caps[2].to_string()))
            .collect()
    }
}
