//! Error types for document rendering.

use thiserror::Error;

/// Result type alias for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Broad classification of a [`DocumentError`].
///
/// The rendering core never recovers locally; callers at the application
/// boundary use the kind to decide how the failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required collaborator or binding is missing.
    Configuration,
    /// A requested renderer, document type or template does not exist.
    NotFound,
    /// The caller violated an API contract.
    Validation,
    /// Reading from disk failed.
    Io,
}

/// Errors that can occur while parsing or rendering a document.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Unable to load renderer of type {renderer}")]
    RendererNotFound {
        renderer: String,
        candidates: Vec<String>,
    },

    #[error("Unable to load document of type {0}")]
    DocumentTypeNotFound(String),

    #[error("Template file not found: {file} (template {template}, system fallback included)")]
    TemplateNotFound { template: String, file: String },

    #[error("The buffer type must be specified")]
    MissingBufferType,

    #[error("Invalid document state: {0}")]
    InvalidState(String),

    #[error("Not yet supported: {0}")]
    Unsupported(String),

    #[error("Renderer {renderer} failed: {message}")]
    RenderFailed { renderer: String, message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid marker pattern: {0}")]
    Regex(#[from] regex::Error),
}

impl DocumentError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RendererNotFound { .. }
            | Self::DocumentTypeNotFound(_)
            | Self::TemplateNotFound { .. } => ErrorKind::NotFound,
            Self::MissingBufferType | Self::InvalidState(_) => ErrorKind::Validation,
            Self::Unsupported(_)
            | Self::RenderFailed { .. }
            | Self::Configuration(_)
            | Self::Yaml(_)
            | Self::Regex(_) => ErrorKind::Configuration,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Shorthand for a renderer that could not produce its output.
    pub fn render_failed(renderer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RenderFailed {
            renderer: renderer.into(),
            message: message.into(),
        }
    }
}
