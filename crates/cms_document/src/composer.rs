//! Template composition: resolve every marker and splice content back in.
//!
//! Markers are processed in two groups. Content-bearing markers (the
//! render-first types) are resolved before everything else, so resources
//! they register on the document are visible when head and script markers
//! render. Each group keeps document order.
//!
//! Substitution is a single pass over the template: every occurrence of a
//! raw marker token is replaced by its content, and inserted content is
//! never scanned for markers again.

use std::collections::HashMap;

use tracing::debug;

use crate::buffer::{RenderBuffer, RenderContext};
use crate::error::DocumentResult;
use crate::marker::{Marker, MarkerExtractor};
use crate::state::DocumentState;

/// Marker types rendered before all others by default.
pub const DEFAULT_RENDER_FIRST: &[&str] = &["content", "module", "modules"];

/// Resolves markers and produces the final document text.
#[derive(Debug, Clone)]
pub struct TemplateComposer {
    extractor: MarkerExtractor,
    render_first: Vec<String>,
}

impl TemplateComposer {
    /// Create a composer for `<marker:include />` tags.
    pub fn new() -> DocumentResult<Self> {
        Ok(Self::with_extractor(MarkerExtractor::new()?))
    }

    /// Create a composer around a custom extractor.
    pub fn with_extractor(extractor: MarkerExtractor) -> Self {
        Self {
            extractor,
            render_first: DEFAULT_RENDER_FIRST.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the set of render-first marker types.
    pub fn with_render_first<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.render_first = types.into_iter().map(Into::into).collect();
        self
    }

    /// The extractor used to find marker tokens.
    pub fn extractor(&self) -> &MarkerExtractor {
        &self.extractor
    }

    /// Whether `kind` belongs to the render-first group, ignoring case.
    pub fn is_render_first(&self, kind: &str) -> bool {
        self.render_first.iter().any(|t| t.eq_ignore_ascii_case(kind))
    }

    /// Order markers for resolution: render-first markers, then the rest.
    ///
    /// Repeated raw tokens are folded into their first occurrence.
    pub fn processing_order<'a>(&self, markers: &'a [Marker]) -> Vec<&'a Marker> {
        let mut seen: Vec<&str> = Vec::new();
        let mut first = Vec::new();
        let mut last = Vec::new();

        for marker in markers {
            if seen.contains(&marker.raw.as_str()) {
                continue;
            }
            seen.push(&marker.raw);

            if self.is_render_first(&marker.kind) {
                first.push(marker);
            } else {
                last.push(marker);
            }
        }

        debug!(
            "Marker groups: {} render-first, {} deferred",
            first.len(),
            last.len()
        );
        first.extend(last);
        first
    }

    /// Extract, resolve and substitute all markers in `text`.
    pub fn compose(
        &self,
        text: &str,
        buffer: &mut RenderBuffer,
        ctx: &RenderContext<'_>,
        state: &mut DocumentState,
    ) -> DocumentResult<String> {
        let markers = self.extractor.extract(text);
        self.render_markers(text, &markers, buffer, ctx, state)
    }

    /// Resolve already extracted markers and substitute them into `text`.
    ///
    /// The first renderer failure aborts the whole composition.
    pub fn render_markers(
        &self,
        text: &str,
        markers: &[Marker],
        buffer: &mut RenderBuffer,
        ctx: &RenderContext<'_>,
        state: &mut DocumentState,
    ) -> DocumentResult<String> {
        let mut resolved: HashMap<&str, String> = HashMap::with_capacity(markers.len());

        for marker in self.processing_order(markers) {
            let content = buffer.get_or_render(
                ctx,
                state,
                &marker.kind,
                marker.name.as_deref(),
                &marker.attributes,
            )?;
            resolved.insert(&marker.raw, content);
        }

        Ok(self.substitute(text, &resolved))
    }

    /// Replace every marker token found in `text` by its resolved content.
    fn substitute(&self, text: &str, resolved: &HashMap<&str, String>) -> String {
        self.extractor
            .pattern()
            .replace_all(text, |caps: &regex::Captures| {
                let raw = &caps[0];
                resolved
                    .get(raw)
                    .cloned()
                    .unwrap_or_else(|| raw.to_string())
            })
            .into_owned()
    }
}
