//! Document factory.
//!
//! Document types are registered under `{Namespace}.{Type}Document`. A
//! lookup tries the configured custom namespace first and then the
//! registry's default namespace.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::composer::TemplateComposer;
use crate::config::DocumentConfig;
use crate::document::Document;
use crate::error::{DocumentError, DocumentResult};
use crate::html::{register_html_renderers, HTML_DOCUMENT_TYPE};
use crate::marker::MarkerExtractor;
use crate::registry::{namespace_segments, ucfirst, RendererRegistry};
use crate::template::TemplateLoader;

/// Defaults applied to every document of one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTypeSpec {
    pub mime_type: String,
}

/// Creates configured documents sharing one renderer registry.
#[derive(Debug)]
pub struct DocumentFactory {
    registry: Arc<RendererRegistry>,
    document_types: HashMap<String, DocumentTypeSpec>,
}

impl DocumentFactory {
    /// Create a factory knowing the `html` document type.
    pub fn new(registry: Arc<RendererRegistry>) -> Self {
        let mut factory = Self {
            registry,
            document_types: HashMap::new(),
        };
        let namespace = factory.registry.default_namespace().to_string();
        factory.register_document_type(&namespace, HTML_DOCUMENT_TYPE, "text/html");
        factory
    }

    /// Create a factory whose registry holds the built-in HTML renderers.
    pub fn standard() -> Self {
        let mut registry = RendererRegistry::new();
        register_html_renderers(&mut registry);
        Self::new(Arc::new(registry))
    }

    /// The shared renderer registry.
    pub fn registry(&self) -> &Arc<RendererRegistry> {
        &self.registry
    }

    /// Register a document type under `namespace`.
    pub fn register_document_type(&mut self, namespace: &str, doc_type: &str, mime_type: &str) {
        let path = document_path(namespace, doc_type);
        debug!("Registering document type: {}", path);
        self.document_types.insert(
            path,
            DocumentTypeSpec {
                mime_type: mime_type.to_lowercase(),
            },
        );
    }

    /// Look up a document type, custom namespace first.
    pub fn document_type(
        &self,
        doc_type: &str,
        namespace: Option<&str>,
    ) -> DocumentResult<&DocumentTypeSpec> {
        let mut candidates = Vec::with_capacity(2);
        if let Some(namespace) = namespace {
            candidates.push(document_path(namespace, doc_type));
        }
        candidates.push(document_path(self.registry.default_namespace(), doc_type));

        candidates
            .iter()
            .find_map(|c| self.document_types.get(c))
            .ok_or_else(|| DocumentError::DocumentTypeNotFound(doc_type.to_string()))
    }

    /// Create a document of `doc_type` configured from `config`.
    pub fn create(&self, doc_type: &str, config: &DocumentConfig) -> DocumentResult<Document> {
        let spec = self.document_type(doc_type, config.namespace.as_deref())?;

        let extractor = MarkerExtractor::with_tag(&config.marker_tag)?;
        let composer = TemplateComposer::with_extractor(extractor)
            .with_render_first(config.render_first.iter().cloned());
        let mut document = Document::new(doc_type.to_lowercase(), Arc::clone(&self.registry))?
            .with_composer(composer)
            .with_loader(TemplateLoader::new(config.application_root.clone()));
        if let Some(namespace) = &config.namespace {
            document = document.with_namespace(namespace.clone());
        }

        document
            .state_mut()
            .set_mime_type(&spec.mime_type)
            .set_character_set(config.character_set.clone())
            .set_language(&config.language)
            .set_direction(config.direction)
            .set_html5(config.html5)
            .set_base_url(config.base_url.clone());

        debug!("Created {} document", doc_type);
        Ok(document)
    }
}

fn document_path(namespace: &str, doc_type: &str) -> String {
    let mut segments = namespace_segments(namespace);
    segments.push(format!("{}Document", ucfirst(&doc_type.to_lowercase())));
    segments.join(".")
}
