//! Document configuration.
//!
//! Loaded from YAML, e.g.:
//!
//! ```yaml
//! template_directory: templates
//! template: protostar
//! file: index.html
//! namespace: My.Site
//! language: en-GB
//! direction: rtl
//! render_first: [content, modules]
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::composer::DEFAULT_RENDER_FIRST;
use crate::error::DocumentResult;
use crate::marker::DEFAULT_MARKER_TAG;
use crate::state::Direction;
use crate::template::{TemplateParams, SYSTEM_TEMPLATE};

/// Settings applied to documents created by the
/// [`DocumentFactory`](crate::factory::DocumentFactory).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DocumentConfig {
    /// Directory holding all templates.
    pub template_directory: PathBuf,
    /// Active template name.
    pub template: String,
    /// Template file to render.
    pub file: String,
    /// Root that relative paths and favicon URLs are computed from.
    pub application_root: PathBuf,
    /// Base URL prefixed to resource links.
    pub base_url: String,
    /// Custom namespace searched for renderers and document types first.
    pub namespace: Option<String>,
    pub character_set: String,
    pub language: String,
    pub direction: Direction,
    pub html5: bool,
    /// Marker types resolved before all others.
    pub render_first: Vec<String>,
    /// Namespace prefix of the marker tag (`marker` in `<marker:include>`).
    pub marker_tag: String,
    /// Free-form template parameters.
    pub params: HashMap<String, String>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            template_directory: PathBuf::from("templates"),
            template: SYSTEM_TEMPLATE.to_string(),
            file: "index.html".to_string(),
            application_root: PathBuf::from("."),
            base_url: String::new(),
            namespace: None,
            character_set: "utf-8".to_string(),
            language: "en-gb".to_string(),
            direction: Direction::Ltr,
            html5: true,
            render_first: DEFAULT_RENDER_FIRST.iter().map(|s| s.to_string()).collect(),
            marker_tag: DEFAULT_MARKER_TAG.to_string(),
            params: HashMap::new(),
        }
    }
}

impl DocumentConfig {
    /// Parse a config from YAML text. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> DocumentResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a config from a YAML file.
    pub fn from_yaml_file(path: &Path) -> DocumentResult<Self> {
        debug!("Loading document config from {:?}", path);
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parameters selecting the configured template file.
    pub fn template_params(&self) -> TemplateParams {
        TemplateParams {
            directory: self.template_directory.clone(),
            template: self.template.clone(),
            file: self.file.clone(),
            params: self.params.clone(),
        }
    }
}
