//! Built-in renderers for HTML documents.
//!
//! All of them are registered under the default namespace for the `html`
//! document type:
//!
//! | Marker type   | Output                                             |
//! |---------------|----------------------------------------------------|
//! | `component`   | Pre-seeded component output (or the override)      |
//! | `meta`        | Charset, base, meta tags, title and head links     |
//! | `stylesheets` | Linked stylesheets and inline style blocks         |
//! | `scripts`     | Linked scripts, inline scripts and custom tags     |
//! | `head`        | `meta` + `stylesheets` + `scripts`                 |

mod component;
mod head;
mod meta;
mod scripts;
mod stylesheets;

pub use component::ComponentRenderer;
pub use head::HeadRenderer;
pub use meta::MetaRenderer;
pub use scripts::ScriptsRenderer;
pub use stylesheets::StylesheetsRenderer;

use crate::registry::RendererRegistry;

/// Document type the built-in renderers are registered for.
pub const HTML_DOCUMENT_TYPE: &str = "html";

/// Register all built-in HTML renderers on `registry`.
pub fn register_html_renderers(registry: &mut RendererRegistry) {
    let doc_type = Some(HTML_DOCUMENT_TYPE);
    registry.register_default(doc_type, "component", || ComponentRenderer);
    registry.register_default(doc_type, "head", || HeadRenderer);
    registry.register_default(doc_type, "meta", || MetaRenderer);
    registry.register_default(doc_type, "scripts", || ScriptsRenderer);
    registry.register_default(doc_type, "stylesheets", || StylesheetsRenderer);
}

/// Whether declarations need CDATA wrapping for this document.
fn needs_cdata(state: &crate::state::DocumentState) -> bool {
    state.mime_type() != "text/html"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_html_renderers() {
        let mut registry = RendererRegistry::new();
        register_html_renderers(&mut registry);

        assert_eq!(registry.len(), 5);
        assert!(registry.contains("Cms.Document.Html.Renderer.Head"));
        assert!(registry.resolve("scripts", "HTML", None).is_ok());
        assert!(registry.resolve("scripts", "feed", None).is_err());
    }
}
