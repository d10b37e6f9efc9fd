use std::fmt::Write;

use crate::error::DocumentResult;
use crate::marker::Attributes;
use crate::renderer::{escape_html, DocumentRenderer};
use crate::state::DocumentState;

use super::needs_cdata;

const DEFAULT_SCRIPT_MIMES: &[&str] = &[
    "text/javascript",
    "application/javascript",
    "text/x-javascript",
    "application/x-javascript",
];

/// Renders linked scripts, inline scripts and custom head tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptsRenderer;

impl ScriptsRenderer {
    pub(crate) fn fetch(state: &DocumentState) -> String {
        let mut buffer = String::new();

        for script in state.head.scripts() {
            let _ = write!(buffer, "\t<script src=\"{}\"", escape_html(&script.url));

            if !script.mime.is_empty()
                && (!state.is_html5() || !DEFAULT_SCRIPT_MIMES.contains(&script.mime.as_str()))
            {
                let _ = write!(buffer, " type=\"{}\"", escape_html(&script.mime));
            }
            if script.defer {
                buffer.push_str(" defer=\"defer\"");
            }
            if script.is_async {
                buffer.push_str(" async=\"async\"");
            }

            buffer.push_str("></script>\n");
        }

        for (mime, content) in state.head.script_declarations() {
            let _ = writeln!(buffer, "\t<script type=\"{}\">", escape_html(mime));
            if needs_cdata(state) {
                buffer.push_str("\t\t//<![CDATA[\n");
            }
            let _ = writeln!(buffer, "{}", content);
            if needs_cdata(state) {
                buffer.push_str("\t\t//]]>\n");
            }
            buffer.push_str("\t</script>\n");
        }

        for custom in state.head.custom_tags() {
            let _ = writeln!(buffer, "\t{}", custom);
        }

        buffer
    }
}

impl DocumentRenderer for ScriptsRenderer {
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
