use std::fmt::Write;

use crate::error::DocumentResult;
use crate::head::MetaKind;
use crate::marker::Attributes;
use crate::renderer::{escape_html, DocumentRenderer};
use crate::state::DocumentState;

/// Renders charset, base, meta tags, the title and head links.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetaRenderer;

impl MetaRenderer {
    pub(crate) fn fetch(state: &DocumentState) -> String {
        let mut buffer = String::new();

        // Charset must come first
        if state.is_html5() {
            let _ = writeln!(
                buffer,
                "\t<meta charset=\"{}\" />",
                escape_html(state.character_set())
            );
        }

        if !state.base_href().is_empty() {
            let _ = writeln!(
                buffer,
                "\t<base href=\"{}\" />",
                escape_html(state.base_href())
            );
        }

        for tag in state.head.meta_tags() {
            match tag.kind {
                MetaKind::HttpEquiv => {
                    if state.is_html5() && tag.name == "content-type" {
                        continue;
                    }
                    let _ = writeln!(
                        buffer,
                        "\t<meta http-equiv=\"{}\" content=\"{}\" />",
                        escape_html(&tag.name),
                        escape_html(&tag.content)
                    );
                }
                MetaKind::Standard => {
                    if tag.content.is_empty() {
                        continue;
                    }
                    let _ = writeln!(
                        buffer,
                        "\t<meta name=\"{}\" content=\"{}\" />",
                        escape_html(&tag.name),
                        escape_html(&tag.content)
                    );
                }
            }
        }

        if !state.description().is_empty() {
            let _ = writeln!(
                buffer,
                "\t<meta name=\"description\" content=\"{}\" />",
                escape_html(state.description())
            );
        }

        if !state.generator().is_empty() {
            let _ = writeln!(
                buffer,
                "\t<meta name=\"generator\" content=\"{}\" />",
                escape_html(state.generator())
            );
        }

        let _ = writeln!(buffer, "\t<title>{}</title>", escape_html(state.title()));

        for link in state.head.links() {
            let _ = write!(
                buffer,
                "\t<link href=\"{}\" {}=\"{}\"",
                escape_html(&link.href),
                link.rel_type,
                escape_html(&link.relation)
            );
            if !link.attributes.is_empty() {
                let _ = write!(buffer, " {}", link.attributes.to_html());
            }
            buffer.push_str(" />\n");
        }

        buffer
    }
}

impl DocumentRenderer for MetaRenderer {
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
