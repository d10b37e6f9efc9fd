//! The document object and its parse/render lifecycle.
//!
//! # Lifecycle
//!
//! 1. **Unparsed**: constructed, no template loaded.
//! 2. **Parsed**: [`Document::parse`] loaded a template and extracted its
//!    markers. Parsing again discards both and starts over.
//! 3. **Rendered**: [`Document::render`] resolved every marker and returned
//!    the final text. Rendering again requires a new parse.
//!
//! The render buffer outlives re-parsing, so content seeded with
//! [`Document::set_buffer`] before the first parse is still used.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::buffer::{BufferOptions, RenderBuffer, RenderContext};
use crate::composer::TemplateComposer;
use crate::error::{DocumentError, DocumentResult};
use crate::marker::{Attributes, Marker};
use crate::registry::RendererRegistry;
use crate::state::DocumentState;
use crate::template::{Template, TemplateLoader, TemplateParams};

/// Lifecycle state of a [`Document`].
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    #[default]
    Unparsed,
    Parsed,
    Rendered,
}

/// Receives document metadata once rendering succeeds, typically the HTTP
/// response being built.
#[cfg_attr(test, mockall::automock)]
pub trait ResponseWriter {
    fn set_mime_type(&mut self, mime: &str);
    fn set_charset(&mut self, charset: &str);
    fn set_modified_date(&mut self, date: DateTime<Utc>);
}

/// A request-scoped document.
pub struct Document {
    state: DocumentState,
    buffer: RenderBuffer,
    registry: Arc<RendererRegistry>,
    composer: TemplateComposer,
    loader: TemplateLoader,
    namespace: Option<String>,
    template: Option<Template>,
    markers: Vec<Marker>,
    lifecycle: Lifecycle,
    caching: bool,
    response: Option<Box<dyn ResponseWriter>>,
}

impl Document {
    /// Create a document of the given type using `registry` for renderer
    /// lookup.
    pub fn new(
        doc_type: impl Into<String>,
        registry: Arc<RendererRegistry>,
    ) -> DocumentResult<Self> {
        Ok(Self {
            state: DocumentState::new(doc_type),
            buffer: RenderBuffer::new(),
            registry,
            composer: TemplateComposer::new()?,
            loader: TemplateLoader::new("."),
            namespace: None,
            template: None,
            markers: Vec::new(),
            lifecycle: Lifecycle::Unparsed,
            caching: false,
            response: None,
        })
    }

    /// Use a different template loader.
    pub fn with_loader(mut self, loader: TemplateLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Use a different composer.
    pub fn with_composer(mut self, composer: TemplateComposer) -> Self {
        self.composer = composer;
        self
    }

    /// Search renderers in `namespace` before the default namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Attach the collaborator that receives metadata after rendering.
    pub fn with_response(mut self, response: Box<dyn ResponseWriter>) -> Self {
        self.response = Some(response);
        self
    }

    /// Document metadata and head resources.
    pub fn state(&self) -> &DocumentState {
        &self.state
    }

    /// Mutable access to the document state.
    pub fn state_mut(&mut self) -> &mut DocumentState {
        &mut self.state
    }

    /// Document type, e.g. `html`.
    pub fn doc_type(&self) -> &str {
        self.state.doc_type()
    }

    /// Custom renderer namespace, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// The loaded template, if parsed.
    pub fn template(&self) -> Option<&Template> {
        self.template.as_ref()
    }

    /// Markers of the loaded template in document order.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Whether the last render requested module caching.
    pub fn is_caching(&self) -> bool {
        self.caching
    }

    /// Load the template selected by `params` and extract its markers.
    ///
    /// Any previously loaded template and markers are discarded first.
    pub fn parse(&mut self, params: &TemplateParams) -> DocumentResult<&mut Self> {
        self.template = None;
        self.markers.clear();
        self.state.set_template_params(HashMap::new());
        self.lifecycle = Lifecycle::Unparsed;

        let template = self.loader.load(params, &mut self.state)?;
        self.markers = self.composer.extractor().extract(&template.text);
        debug!(
            "Parsed template {} with {} markers",
            template.name,
            self.markers.len()
        );

        self.state.set_template_params(template.params.clone());
        self.template = Some(template);
        self.lifecycle = Lifecycle::Parsed;
        Ok(self)
    }

    /// Render the document, parsing it first if needed.
    ///
    /// Any marker failure aborts the render and leaves the document parsed.
    pub fn render(&mut self, caching: bool, params: &TemplateParams) -> DocumentResult<String> {
        match self.lifecycle {
            Lifecycle::Rendered => {
                return Err(DocumentError::InvalidState(
                    "document already rendered; parse it again first".to_string(),
                ));
            }
            Lifecycle::Unparsed => {
                self.parse(params)?;
            }
            Lifecycle::Parsed => {}
        }

        self.caching = caching;
        let template = self
            .template
            .as_ref()
            .ok_or_else(|| DocumentError::InvalidState("no template loaded".to_string()))?;
        let ctx = RenderContext {
            registry: &self.registry,
            namespace: self.namespace.as_deref(),
            caching,
        };

        let output = self.composer.render_markers(
            &template.text,
            &self.markers,
            &mut self.buffer,
            &ctx,
            &mut self.state,
        )?;

        info!(
            "Rendered {} document from template {}",
            self.state.doc_type(),
            template.name
        );
        self.lifecycle = Lifecycle::Rendered;
        self.finalize();

        Ok(output)
    }

    /// Return the content for a marker, rendering it on first use.
    pub fn get_buffer(
        &mut self,
        kind: &str,
        name: Option<&str>,
        attributes: &Attributes,
    ) -> DocumentResult<String> {
        let ctx = RenderContext {
            registry: &self.registry,
            namespace: self.namespace.as_deref(),
            caching: self.caching,
        };
        self.buffer
            .get_or_render(&ctx, &mut self.state, kind, name, attributes)
    }

    /// The whole render buffer.
    pub fn buffer(&self) -> &RenderBuffer {
        &self.buffer
    }

    /// Seed buffer content. `options.kind` is mandatory.
    pub fn set_buffer(
        &mut self,
        content: impl Into<String>,
        options: BufferOptions,
    ) -> DocumentResult<&mut Self> {
        self.buffer.set(content, options)?;
        Ok(self)
    }

    /// Push document metadata to the response, if one is attached.
    fn finalize(&mut self) {
        let Some(response) = self.response.as_mut() else {
            debug!("No response attached, skipping metadata finalization");
            return;
        };

        if let Some(date) = self.state.modified_date() {
            response.set_modified_date(date);
        }
        response.set_mime_type(self.state.mime_type());
        response.set_charset(self.state.character_set());
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("doc_type", &self.state.doc_type())
            .field("lifecycle", &self.lifecycle)
            .field("namespace", &self.namespace)
            .field("template", &self.template.as_ref().map(|t| &t.path))
            .field("markers", &self.markers.len())
            .field("buffer", &self.buffer.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use chrono::TimeZone;
    use tempfile::tempdir;

    use super::*;
    use crate::buffer::BufferKey;
    use crate::html::register_html_renderers;
    use crate::renderer::DocumentRenderer;

    struct Paragraph;

    impl DocumentRenderer for Paragraph {
        fn render(
            &self,
            _state: &mut DocumentState,
            _name: Option<&str>,
            _attributes: &Attributes,
            _content: Option<&str>,
        ) -> DocumentResult<String> {
            Ok("<p>hi</p>".to_string())
        }
    }

    fn registry() -> Arc<RendererRegistry> {
        let mut registry = RendererRegistry::new();
        register_html_renderers(&mut registry);
        registry.register_default(None, "content", || Paragraph);
        Arc::new(registry)
    }

    fn site(template: &str) -> tempfile::TempDir {
        let root = tempdir().unwrap();
        let path = root.path().join("templates/system/index.html");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, template).unwrap();
        root
    }

    fn document(root: &Path) -> Document {
        let mut doc = Document::new("html", registry())
            .unwrap()
            .with_loader(TemplateLoader::new(root));
        doc.state_mut().set_mime_type("text/html");
        doc
    }

    #[test]
    fn test_render_parses_implicitly() {
        let root = site(r#"<div><marker:include type="content" name="main"/></div>"#);
        let mut doc = document(root.path());
        assert_eq!(doc.lifecycle(), Lifecycle::Unparsed);

        let output = doc.render(false, &TemplateParams::default()).unwrap();

        assert_eq!(output, "<div><p>hi</p></div>");
        assert_eq!(doc.lifecycle(), Lifecycle::Rendered);
    }

    #[test]
    fn test_render_twice_requires_parse() {
        let root = site("plain");
        let mut doc = document(root.path());
        let params = TemplateParams::default();

        doc.render(false, &params).unwrap();
        let err = doc.render(false, &params).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidState(_)));

        doc.parse(&params).unwrap();
        assert_eq!(doc.lifecycle(), Lifecycle::Parsed);
        assert_eq!(doc.render(false, &params).unwrap(), "plain");
    }

    #[test]
    fn test_failed_render_stays_parsed() {
        let root = site(r#"<marker:include type="missing"/>"#);
        let mut doc = document(root.path());

        let err = doc.render(false, &TemplateParams::default()).unwrap_err();
        assert!(matches!(err, DocumentError::RendererNotFound { .. }));
        assert_eq!(doc.lifecycle(), Lifecycle::Parsed);
    }

    #[test]
    fn test_reparse_replaces_template_and_markers() {
        let root = site("system");
        let a = root.path().join("templates/a/index.html");
        let b = root.path().join("templates/b/index.html");
        fs::create_dir_all(a.parent().unwrap()).unwrap();
        fs::create_dir_all(b.parent().unwrap()).unwrap();
        fs::write(&a, r#"<marker:include type="content" name="main"/>"#).unwrap();
        fs::write(&b, r#"<b><marker:include type="component"/></b>"#).unwrap();
        let mut doc = document(root.path());

        doc.parse(&TemplateParams::new("a", "index.html")).unwrap();
        assert_eq!(doc.markers()[0].kind, "content");

        let params = TemplateParams::new("b", "index.html");
        doc.parse(&params).unwrap();
        let kinds: Vec<&str> = doc.markers().iter().map(|m| m.kind.as_str()).collect();
        assert_eq!(kinds, vec!["component"]);
        assert_eq!(doc.template().unwrap().path, b);

        assert_eq!(doc.render(false, &params).unwrap(), "<b></b>");
        let keys: Vec<&BufferKey> = doc.buffer().iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![&BufferKey::new("component", None, None)]);
    }

    #[test]
    fn test_renderers_see_template_params() {
        struct Color;

        impl DocumentRenderer for Color {
            fn render(
                &self,
                state: &mut DocumentState,
                _name: Option<&str>,
                _attributes: &Attributes,
                _content: Option<&str>,
            ) -> DocumentResult<String> {
                Ok(state.template_param("color").unwrap_or("none").to_string())
            }
        }

        let root = site(r#"<marker:include type="color"/>"#);
        let mut registry = RendererRegistry::new();
        registry.register_default(None, "color", || Color);
        let mut doc = Document::new("html", Arc::new(registry))
            .unwrap()
            .with_loader(TemplateLoader::new(root.path()));

        let params = TemplateParams::default().with_param("color", "blue");
        assert_eq!(doc.render(false, &params).unwrap(), "blue");
        assert_eq!(doc.template().unwrap().params.get("color").unwrap(), "blue");

        doc.parse(&TemplateParams::default()).unwrap();
        assert!(doc.state().template_params().is_empty());
    }

    #[test]
    fn test_failed_reparse_leaves_unparsed() {
        let root = site(r#"<marker:include type="content"/>"#);
        let mut doc = document(root.path());
        doc.parse(&TemplateParams::default()).unwrap();
        assert_eq!(doc.markers().len(), 1);

        let err = doc
            .parse(&TemplateParams::new("gone", "gone.html"))
            .unwrap_err();

        assert!(matches!(err, DocumentError::TemplateNotFound { .. }));
        assert_eq!(doc.lifecycle(), Lifecycle::Unparsed);
        assert!(doc.template().is_none());
        assert!(doc.markers().is_empty());
    }

    #[test]
    fn test_seeded_component_survives_parse() {
        let root = site(r#"<body><marker:include type="component"/></body>"#);
        let mut doc = document(root.path());

        doc.set_buffer("<form/>", BufferOptions::of_type("component"))
            .unwrap();
        doc.parse(&TemplateParams::default()).unwrap();

        assert_eq!(
            doc.render(false, &TemplateParams::default()).unwrap(),
            "<body><form/></body>"
        );
    }

    #[test]
    fn test_finalize_writes_metadata() {
        let root = site("x");
        let date = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        let mut response = MockResponseWriter::new();
        response
            .expect_set_mime_type()
            .withf(|mime: &str| mime == "text/html")
            .times(1)
            .return_const(());
        response
            .expect_set_charset()
            .withf(|charset: &str| charset == "utf-8")
            .times(1)
            .return_const(());
        response
            .expect_set_modified_date()
            .withf(move |d: &DateTime<Utc>| *d == date)
            .times(1)
            .return_const(());

        let mut doc = document(root.path()).with_response(Box::new(response));
        doc.state_mut().set_modified_date(date);
        doc.render(false, &TemplateParams::default()).unwrap();
    }

    #[test]
    fn test_finalize_skips_unset_modified_date() {
        let root = site("x");

        let mut response = MockResponseWriter::new();
        response.expect_set_mime_type().times(1).return_const(());
        response.expect_set_charset().times(1).return_const(());
        response.expect_set_modified_date().never();

        let mut doc = document(root.path()).with_response(Box::new(response));
        doc.render(false, &TemplateParams::default()).unwrap();
    }

    #[test]
    fn test_get_buffer_without_template() {
        let mut doc = Document::new("html", registry()).unwrap();
        let content = doc
            .get_buffer("content", Some("main"), &Attributes::new())
            .unwrap();
        assert_eq!(content, "<p>hi</p>");
        assert_eq!(doc.buffer().len(), 1);
    }
}
