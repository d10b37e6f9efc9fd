//! Document metadata visible to renderers.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::head::HeadData;

/// Text direction of the document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    /// Parse a direction, case-insensitively. Anything but `rtl` is `ltr`.
    pub fn from_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "rtl" => Self::Rtl,
            _ => Self::Ltr,
        }
    }

    /// The `dir` attribute value.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mutable document state handed to every renderer.
///
/// Holds the document-level metadata plus the [`HeadData`] that content
/// renderers append to and head renderers read from.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentState {
    doc_type: String,
    character_set: String,
    direction: Direction,
    language: String,
    mime_type: String,
    modified_date: Option<DateTime<Utc>>,
    title: String,
    description: String,
    generator: String,
    base_href: String,
    base_url: String,
    html5: bool,
    template_params: HashMap<String, String>,
    /// Resources registered while rendering.
    pub head: HeadData,
}

impl DocumentState {
    /// Create state for a document of the given type.
    pub fn new(doc_type: impl Into<String>) -> Self {
        Self {
            doc_type: doc_type.into(),
            character_set: "utf-8".to_string(),
            direction: Direction::Ltr,
            language: "en-gb".to_string(),
            mime_type: String::new(),
            modified_date: None,
            title: String::new(),
            description: String::new(),
            generator: String::new(),
            base_href: String::new(),
            base_url: String::new(),
            html5: true,
            template_params: HashMap::new(),
            head: HeadData::new(),
        }
    }

    /// Document type, e.g. `html`.
    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    /// Set the document type.
    pub fn set_doc_type(&mut self, doc_type: impl Into<String>) -> &mut Self {
        self.doc_type = doc_type.into();
        self
    }

    /// Character set, `utf-8` by default.
    pub fn character_set(&self) -> &str {
        &self.character_set
    }

    /// Set the character set.
    pub fn set_character_set(&mut self, charset: impl Into<String>) -> &mut Self {
        self.character_set = charset.into();
        self
    }

    /// Text direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Set the text direction.
    pub fn set_direction(&mut self, direction: Direction) -> &mut Self {
        self.direction = direction;
        self
    }

    /// Language tag, lowercase.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Set the language tag. Stored lowercase.
    pub fn set_language(&mut self, language: &str) -> &mut Self {
        self.language = language.to_lowercase();
        self
    }

    /// MIME type, lowercase.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Set the MIME type. Stored lowercase.
    pub fn set_mime_type(&mut self, mime: &str) -> &mut Self {
        self.mime_type = mime.to_lowercase();
        self
    }

    /// Last modification date, if set.
    pub fn modified_date(&self) -> Option<DateTime<Utc>> {
        self.modified_date
    }

    /// Set the last modification date.
    pub fn set_modified_date(&mut self, date: DateTime<Utc>) -> &mut Self {
        self.modified_date = Some(date);
        self
    }

    /// Document title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Set the document title.
    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = title.into();
        self
    }

    /// Meta description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Set the meta description.
    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    /// Generator meta value.
    pub fn generator(&self) -> &str {
        &self.generator
    }

    /// Set the generator meta value.
    pub fn set_generator(&mut self, generator: impl Into<String>) -> &mut Self {
        self.generator = generator.into();
        self
    }

    /// Value of the `<base href>` tag; empty means no tag.
    pub fn base_href(&self) -> &str {
        &self.base_href
    }

    /// Set the `<base>` href.
    pub fn set_base_href(&mut self, base: impl Into<String>) -> &mut Self {
        self.base_href = base.into();
        self
    }

    /// Site base URL used to build resource links.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set the base URL prefixed to resource links.
    pub fn set_base_url(&mut self, base_url: impl Into<String>) -> &mut Self {
        self.base_url = base_url.into();
        self
    }

    /// Whether HTML5 output is enabled.
    pub fn is_html5(&self) -> bool {
        self.html5
    }

    /// Enable or disable HTML5 output.
    pub fn set_html5(&mut self, html5: bool) -> &mut Self {
        self.html5 = html5;
        self
    }

    /// Parameters of the loaded template.
    pub fn template_params(&self) -> &HashMap<String, String> {
        &self.template_params
    }

    /// Get one template parameter.
    pub fn template_param(&self, key: &str) -> Option<&str> {
        self.template_params.get(key).map(|s| s.as_str())
    }

    /// Replace the template parameters.
    pub fn set_template_params(&mut self, params: HashMap<String, String>) -> &mut Self {
        self.template_params = params;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = DocumentState::new("html");
        assert_eq!(state.doc_type(), "html");
        assert_eq!(state.character_set(), "utf-8");
        assert_eq!(state.direction(), Direction::Ltr);
        assert_eq!(state.language(), "en-gb");
        assert!(state.modified_date().is_none());
        assert!(state.is_html5());
    }

    #[test]
    fn test_normalized_setters() {
        let mut state = DocumentState::new("html");
        state.set_language("EN-US").set_mime_type("Text/HTML");
        assert_eq!(state.language(), "en-us");
        assert_eq!(state.mime_type(), "text/html");
    }

    #[test]
    fn test_direction_from_name() {
        assert_eq!(Direction::from_name("RTL"), Direction::Rtl);
        assert_eq!(Direction::from_name("ltr"), Direction::Ltr);
        assert_eq!(Direction::from_name("sideways"), Direction::Ltr);
    }
}
