use std::fmt::Write;

use crate::error::DocumentResult;
use crate::marker::Attributes;
use crate::renderer::{escape_html, DocumentRenderer};
use crate::state::DocumentState;

use super::needs_cdata;

/// Renders linked stylesheets and inline style blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct StylesheetsRenderer;

impl StylesheetsRenderer {
    pub(crate) fn fetch(state: &DocumentState) -> String {
        let mut buffer = String::new();

        for sheet in state.head.stylesheets() {
            let _ = write!(
                buffer,
                "\t<link rel=\"stylesheet\" href=\"{}\"",
                escape_html(&sheet.url)
            );

            if !sheet.mime.is_empty() && (!state.is_html5() || sheet.mime != "text/css") {
                let _ = write!(buffer, " type=\"{}\"", escape_html(&sheet.mime));
            }

            if let Some(media) = &sheet.media {
                let _ = write!(buffer, " media=\"{}\"", escape_html(media));
            }

            if !sheet.attributes.is_empty() {
                let _ = write!(buffer, " {}", sheet.attributes.to_html());
            }

            buffer.push_str(" />\n");
        }

        for (mime, content) in state.head.style_declarations() {
            let _ = writeln!(buffer, "\t<style type=\"{}\">", escape_html(mime));
            if needs_cdata(state) {
                buffer.push_str("\t\t/*<![CDATA[*/\n");
            }
            let _ = writeln!(buffer, "{}", content);
            if needs_cdata(state) {
                buffer.push_str("\t\t/*]]>*/\n");
            }
            buffer.push_str("\t</style>\n");
        }

        buffer
    }
}

impl DocumentRenderer for StylesheetsRenderer {
    fn render(
        &self,
        state: &mut DocumentState,
        _name: Option<&str>,
        _attributes: &Attributes,
        _content: Option<&str>,
    ) -> DocumentResult<String> {
        Ok(Self::fetch(state))
    }
}
