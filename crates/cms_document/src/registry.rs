//! Renderer registry for resolving marker types to renderers.
//!
//! Renderers are registered under a dotted path built from a namespace, an
//! optional document type and the renderer name, e.g.
//! `Cms.Document.Html.Renderer.Head`. Every path segment is normalized so
//! that its first letter is uppercase, and the document type is lowercased
//! before that, so `html`/`HTML` and `head`/`Head` resolve alike.
//!
//! # Lookup order
//!
//! For a renderer `foo`, document type `html` and custom namespace `My.Site`:
//!
//! 1. `My.Site.Html.Renderer.Foo`
//! 2. `My.Site.Renderer.Foo`
//! 3. `Cms.Document.Html.Renderer.Foo`
//! 4. `Cms.Document.Renderer.Foo`
//!
//! The first registered path wins.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{DocumentError, DocumentResult};
use crate::renderer::{DocumentRenderer, RendererFactory};

/// Namespace that built-in renderers live in.
pub const DEFAULT_NAMESPACE: &str = "Cms.Document";

/// A registry of renderer factories keyed by normalized path.
///
/// Build it once at startup and share it between documents behind an
/// `Arc`; resolution only reads from it.
pub struct RendererRegistry {
    default_namespace: String,
    factories: HashMap<String, RendererFactory>,
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RendererRegistry {
    /// Create an empty registry using [`DEFAULT_NAMESPACE`].
    pub fn new() -> Self {
        Self::with_default_namespace(DEFAULT_NAMESPACE)
    }

    /// Create an empty registry with a different default namespace.
    pub fn with_default_namespace(namespace: impl Into<String>) -> Self {
        Self {
            default_namespace: namespace.into(),
            factories: HashMap::new(),
        }
    }

    /// Namespace searched after any custom one.
    pub fn default_namespace(&self) -> &str {
        &self.default_namespace
    }

    /// Register a factory. `doc_type` of `None` registers the generic
    /// variant that serves every document type.
    ///
    /// An existing registration under the same path is replaced.
    pub fn register(
        &mut self,
        namespace: &str,
        doc_type: Option<&str>,
        renderer: &str,
        factory: RendererFactory,
    ) {
        let path = renderer_path(namespace, doc_type, renderer);
        debug!("Registering renderer: {}", path);
        self.factories.insert(path, factory);
    }

    /// Register a closure building a concrete renderer.
    pub fn register_fn<F, R>(
        &mut self,
        namespace: &str,
        doc_type: Option<&str>,
        renderer: &str,
        build: F,
    ) where
        F: Fn() -> R + Send + Sync + 'static,
        R: DocumentRenderer + 'static,
    {
        let factory: RendererFactory = Arc::new(move || Box::new(build()));
        self.register(namespace, doc_type, renderer, factory);
    }

    /// Register under the default namespace.
    pub fn register_default<F, R>(&mut self, doc_type: Option<&str>, renderer: &str, build: F)
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: DocumentRenderer + 'static,
    {
        let namespace = self.default_namespace.clone();
        self.register_fn(&namespace, doc_type, renderer, build);
    }

    /// Build the ordered candidate paths for a renderer.
    pub fn candidates(
        &self,
        renderer: &str,
        doc_type: &str,
        custom_namespace: Option<&str>,
    ) -> Vec<String> {
        let mut candidates = Vec::with_capacity(4);

        if let Some(namespace) = custom_namespace {
            candidates.push(renderer_path(namespace, Some(doc_type), renderer));
            candidates.push(renderer_path(namespace, None, renderer));
        }
        candidates.push(renderer_path(&self.default_namespace, Some(doc_type), renderer));
        candidates.push(renderer_path(&self.default_namespace, None, renderer));

        // A custom namespace equal to the default one repeats paths
        let mut seen = Vec::with_capacity(candidates.len());
        candidates.retain(|c| {
            if seen.contains(c) {
                false
            } else {
                seen.push(c.clone());
                true
            }
        });
        candidates
    }

    /// Resolve and construct the renderer for a marker type.
    ///
    /// Fails with [`DocumentError::RendererNotFound`] when no candidate is
    /// registered.
    pub fn resolve(
        &self,
        renderer: &str,
        doc_type: &str,
        custom_namespace: Option<&str>,
    ) -> DocumentResult<Box<dyn DocumentRenderer>> {
        let candidates = self.candidates(renderer, doc_type, custom_namespace);

        for candidate in &candidates {
            if let Some(factory) = self.factories.get(candidate) {
                debug!("Resolved renderer {} to {}", renderer, candidate);
                return Ok(factory());
            }
        }

        Err(DocumentError::RendererNotFound {
            renderer: renderer.to_string(),
            candidates,
        })
    }

    /// Check if a normalized path is registered.
    pub fn contains(&self, path: &str) -> bool {
        self.factories.contains_key(path)
    }

    /// Get all registered paths.
    pub fn paths(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }

    /// Get the number of registered renderers.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Check if no renderers are registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Remove a registration.
    pub fn unregister(
        &mut self,
        namespace: &str,
        doc_type: Option<&str>,
        renderer: &str,
    ) -> Option<RendererFactory> {
        let path = renderer_path(namespace, doc_type, renderer);
        debug!("Unregistering renderer: {}", path);
        self.factories.remove(&path)
    }
}

impl std::fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RendererRegistry")
            .field("default_namespace", &self.default_namespace)
            .field("renderers", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Build the normalized lookup path for a renderer.
pub fn renderer_path(namespace: &str, doc_type: Option<&str>, renderer: &str) -> String {
    let mut segments = namespace_segments(namespace);
    if let Some(doc_type) = doc_type {
        segments.push(ucfirst(&doc_type.to_lowercase()));
    }
    segments.push("Renderer".to_string());
    segments.push(ucfirst(renderer));
    segments.join(".")
}

/// Split a `.` or `\` separated namespace into normalized segments.
pub(crate) fn namespace_segments(namespace: &str) -> Vec<String> {
    namespace
        .split(['.', '\\'])
        .filter(|s| !s.is_empty())
        .map(ucfirst)
        .collect()
}

/// Uppercase the first character.
pub(crate) fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
