use crate::error::DocumentResult;
use crate::marker::Attributes;
use crate::renderer::DocumentRenderer;
use crate::state::DocumentState;

use super::{MetaRenderer, ScriptsRenderer, StylesheetsRenderer};

/// Renders the complete `<head>` contents.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadRenderer;

impl DocumentRenderer for HeadRenderer {
    fn render(
        &self,
        state: &mut DocumentState,
        _name: Option<&str>,
        _attributes: &Attributes,
        _content: Option<&str>,
    ) -> DocumentResult<String> {
        let mut buffer = MetaRenderer::fetch(state);
        buffer.push_str(&StylesheetsRenderer::fetch(state));
        buffer.push_str(&ScriptsRenderer::fetch(state));
        Ok(buffer)
    }
}
