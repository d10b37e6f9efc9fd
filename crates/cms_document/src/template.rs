//! Template file selection and loading.
//!
//! A template file lives at `{directory}/{template}/{file}`. When that file
//! does not exist, the `system` template's file of the same name is used.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{DocumentError, DocumentResult};
use crate::state::DocumentState;

/// Template used when the requested one has no matching file.
pub const SYSTEM_TEMPLATE: &str = "system";

const FAVICON: &str = "favicon.ico";

/// Parameters selecting a template file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateParams {
    /// Directory holding all templates. Relative paths are resolved
    /// against the application root.
    pub directory: PathBuf,
    /// Template name.
    pub template: String,
    /// File inside the template directory.
    pub file: String,
    /// Free-form template parameters.
    pub params: HashMap<String, String>,
}

impl Default for TemplateParams {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("templates"),
            template: SYSTEM_TEMPLATE.to_string(),
            file: "index.html".to_string(),
            params: HashMap::new(),
        }
    }
}

impl TemplateParams {
    /// Select `file` of `template` in the default directory.
    pub fn new(template: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            file: file.into(),
            ..Self::default()
        }
    }

    /// Use another templates directory.
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Add a template parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// A loaded template.
#[derive(Debug, Clone)]
pub struct Template {
    /// Name of the template that was actually used.
    pub name: String,
    /// Directory of that template.
    pub directory: PathBuf,
    /// Full path of the loaded file.
    pub path: PathBuf,
    /// Raw template text.
    pub text: String,
    /// Parameters the template was loaded with. The document copies them
    /// onto its state so renderers can read them.
    pub params: HashMap<String, String>,
}

impl Template {
    /// Whether the system fallback was used.
    pub fn is_system(&self) -> bool {
        self.name == SYSTEM_TEMPLATE
    }
}

/// Loads template files relative to an application root.
#[derive(Debug, Clone)]
pub struct TemplateLoader {
    application_root: PathBuf,
}

impl TemplateLoader {
    /// Create a loader for the given application root.
    pub fn new(application_root: impl Into<PathBuf>) -> Self {
        Self {
            application_root: application_root.into(),
        }
    }

    /// Root that relative paths are resolved against.
    pub fn application_root(&self) -> &Path {
        &self.application_root
    }

    /// Select and read a template file, registering a favicon on `state`
    /// if one is found next to the template or at the application root.
    pub fn load(
        &self,
        params: &TemplateParams,
        state: &mut DocumentState,
    ) -> DocumentResult<Template> {
        let directory = if params.directory.is_absolute() {
            params.directory.clone()
        } else {
            self.application_root.join(&params.directory)
        };
        let mut name = clean_cmd(&params.template);
        let file = clean_cmd(&params.file);

        if file.is_empty() {
            return Err(DocumentError::TemplateNotFound {
                template: name,
                file: params.file.clone(),
            });
        }

        if !directory.join(&name).join(&file).is_file() {
            if name != SYSTEM_TEMPLATE {
                warn!(
                    "Template {} has no file {}, falling back to {}",
                    name, file, SYSTEM_TEMPLATE
                );
            }
            name = SYSTEM_TEMPLATE.to_string();
        }

        let template_dir = directory.join(&name);
        let path = template_dir.join(&file);
        if !path.is_file() {
            return Err(DocumentError::TemplateNotFound {
                template: clean_cmd(&params.template),
                file,
            });
        }

        debug!("Loading template from {:?}", path);
        let text = fs::read_to_string(&path)?;
        info!("Loaded template {} ({})", name, file);

        self.discover_favicon(&template_dir, state);

        Ok(Template {
            name,
            directory: template_dir,
            path,
            text,
            params: params.params.clone(),
        })
    }

    /// Register the first `favicon.ico` found in the template directory or
    /// the application root.
    fn discover_favicon(&self, template_dir: &Path, state: &mut DocumentState) {
        for dir in [template_dir, self.application_root.as_path()] {
            if dir.join(FAVICON).is_file() {
                let href = format!(
                    "{}{}/{}",
                    state.base_url(),
                    self.relative_url_path(dir),
                    FAVICON
                );
                debug!("Using favicon {}", href);
                state.head.add_favicon(href);
                break;
            }
        }
    }

    /// Path of `dir` below the application root as a URL path, `""` for the
    /// root itself.
    fn relative_url_path(&self, dir: &Path) -> String {
        let relative = dir.strip_prefix(&self.application_root).unwrap_or(dir);
        let segments: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().replace('\\', "/"))
            .collect();
        if segments.is_empty() {
            String::new()
        } else {
            format!("/{}", segments.join("/"))
        }
    }
}

/// Keep only `[A-Za-z0-9._-]` and strip leading dots.
pub fn clean_cmd(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    cleaned.trim_start_matches('.').to_string()
}
