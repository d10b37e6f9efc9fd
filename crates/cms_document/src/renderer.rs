//! Renderer contract.
//!
//! A renderer produces the content for one marker type. It receives the
//! owning document's [`DocumentState`] on every call and may register
//! resources on it; later markers see those registrations.
//!
//! # Example
//!
//! ```rust
//! use cms_document::{Attributes, DocumentRenderer, DocumentResult, DocumentState};
//!
//! struct Greeting;
//!
//! impl DocumentRenderer for Greeting {
//!     fn render(
//!         &self,
//!         state: &mut DocumentState,
//!         name: Option<&str>,
//!         _attributes: &Attributes,
//!         _content: Option<&str>,
//!     ) -> DocumentResult<String> {
//!         state.head.add_stylesheet("greeting.css", "text/css", None, Attributes::new());
//!         Ok(format!("<p>Hello {}</p>", name.unwrap_or("world")))
//!     }
//! }
//! ```

use std::sync::Arc;

use crate::error::DocumentResult;
use crate::marker::Attributes;
use crate::state::DocumentState;

/// Produces content for a marker.
pub trait DocumentRenderer {
    /// Render the element `name` with its marker attributes.
    ///
    /// `content` overrides the renderer's own output where the renderer
    /// supports it.
    fn render(
        &self,
        state: &mut DocumentState,
        name: Option<&str>,
        attributes: &Attributes,
        content: Option<&str>,
    ) -> DocumentResult<String>;
}

/// Builds a fresh renderer instance.
pub type RendererFactory = Arc<dyn Fn() -> Box<dyn DocumentRenderer> + Send + Sync>;

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#039;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#039;Jerry&#039;&lt;/a&gt;"
        );
    }
}
