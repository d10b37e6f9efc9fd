//! Per-document cache of rendered marker content.
//!
//! Content is keyed by `(type, name, variant)`, where the variant is the
//! marker's optional `title` attribute. Within one document a key is
//! rendered at most once; later lookups are served from the buffer.

use std::collections::HashMap;

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::error::{DocumentError, DocumentResult};
use crate::marker::Attributes;
use crate::registry::RendererRegistry;
use crate::state::DocumentState;

/// Composite buffer key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BufferKey {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: Option<String>,
    pub variant: Option<String>,
}

impl BufferKey {
    /// Create a key from its parts.
    pub fn new(kind: impl Into<String>, name: Option<&str>, variant: Option<&str>) -> Self {
        Self {
            kind: kind.into(),
            name: name.map(String::from),
            variant: variant.map(String::from),
        }
    }

    /// Key for a marker, taking the variant from its `title` attribute.
    pub fn for_marker(kind: &str, name: Option<&str>, attributes: &Attributes) -> Self {
        Self::new(kind, name, attributes.get("title"))
    }
}

/// Where and how renderers are looked up on a cache miss.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub registry: &'a RendererRegistry,
    /// Custom namespace searched before the default one.
    pub namespace: Option<&'a str>,
    /// Whether cross-request module caching was requested.
    pub caching: bool,
}

/// Options for seeding the buffer directly.
#[derive(Debug, Clone, Default)]
pub struct BufferOptions {
    pub kind: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
}

impl BufferOptions {
    /// Empty options; set a type before use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for the given marker type.
    pub fn of_type(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Self::default()
        }
    }

    /// Set the element name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the title variant.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Rendered content keyed by [`BufferKey`].
#[derive(Debug, Clone, Default)]
pub struct RenderBuffer {
    entries: HashMap<BufferKey, String>,
}

impl RenderBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get cached content for a key.
    pub fn get(&self, key: &BufferKey) -> Option<&str> {
        self.entries.get(key).map(|s| s.as_str())
    }

    /// Check if content is cached for a key.
    pub fn contains(&self, key: &BufferKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Store content, replacing what was there.
    pub fn insert(&mut self, key: BufferKey, content: impl Into<String>) {
        self.entries.insert(key, content.into());
    }

    /// Store content described by `options`. The type is mandatory.
    pub fn set(
        &mut self,
        content: impl Into<String>,
        options: BufferOptions,
    ) -> DocumentResult<()> {
        let kind = options.kind.ok_or(DocumentError::MissingBufferType)?;
        self.insert(
            BufferKey {
                kind,
                name: options.name,
                variant: options.title,
            },
            content,
        );
        Ok(())
    }

    /// Return cached content for the marker, rendering it on a miss.
    pub fn get_or_render(
        &mut self,
        ctx: &RenderContext<'_>,
        state: &mut DocumentState,
        kind: &str,
        name: Option<&str>,
        attributes: &Attributes,
    ) -> DocumentResult<String> {
        let key = BufferKey::for_marker(kind, name, attributes);

        if let Some(content) = self.entries.get(&key) {
            debug!("Buffer hit for {}/{:?}/{:?}", key.kind, key.name, key.variant);
            return Ok(content.clone());
        }

        if ctx.caching && kind == "modules" {
            return Err(DocumentError::Unsupported(
                "cached rendering of modules".to_string(),
            ));
        }

        let renderer = ctx.registry.resolve(kind, state.doc_type(), ctx.namespace)?;
        debug!("Rendering {}/{:?}/{:?}", key.kind, key.name, key.variant);
        let content = renderer.render(state, name, attributes, None)?;

        self.entries.insert(key, content.clone());
        Ok(content)
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&BufferKey, &str)> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all cached content.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[derive(Serialize)]
struct BufferEntry<'a> {
    #[serde(flatten)]
    key: &'a BufferKey,
    content: &'a str,
}

impl Serialize for RenderBuffer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|(key, content)| BufferEntry { key, content }))
    }
}
