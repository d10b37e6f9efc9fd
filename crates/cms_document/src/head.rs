//! Page-level resources collected while a document renders.
//!
//! Content renderers register scripts, stylesheets and links here; the
//! head-level renderers read them back out. Entries keyed by URL keep the
//! position of their first registration.

use serde::Serialize;

use crate::marker::Attributes;

/// A linked script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptLink {
    pub url: String,
    pub mime: String,
    pub defer: bool,
    pub is_async: bool,
}

/// A linked stylesheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StylesheetLink {
    pub url: String,
    pub mime: String,
    pub media: Option<String>,
    pub attributes: Attributes,
}

/// A `<link>` element such as the favicon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadLink {
    pub href: String,
    pub relation: String,
    /// Either `rel` or `rev`.
    pub rel_type: String,
    pub attributes: Attributes,
}

/// Kind of a `<meta>` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetaKind {
    HttpEquiv,
    Standard,
}

/// A `<meta>` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaTag {
    pub kind: MetaKind,
    pub name: String,
    pub content: String,
}

/// Resources registered for the document head and body end.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HeadData {
    scripts: Vec<ScriptLink>,
    script_declarations: Vec<(String, String)>,
    stylesheets: Vec<StylesheetLink>,
    style_declarations: Vec<(String, String)>,
    custom_tags: Vec<String>,
    links: Vec<HeadLink>,
    meta_tags: Vec<MetaTag>,
}

impl HeadData {
    /// Create empty head data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a linked script. Re-adding a URL overwrites its options.
    pub fn add_script(
        &mut self,
        url: impl Into<String>,
        mime: impl Into<String>,
        defer: bool,
        is_async: bool,
    ) -> &mut Self {
        let script = ScriptLink {
            url: url.into(),
            mime: mime.into(),
            defer,
            is_async,
        };
        match self.scripts.iter_mut().find(|s| s.url == script.url) {
            Some(existing) => *existing = script,
            None => self.scripts.push(script),
        }
        self
    }

    /// Add an inline script. Declarations of the same type are joined.
    pub fn add_script_declaration(
        &mut self,
        content: impl Into<String>,
        mime: impl Into<String>,
    ) -> &mut Self {
        append_declaration(&mut self.script_declarations, content.into(), mime.into());
        self
    }

    /// Add a linked stylesheet. Re-adding a URL overwrites its options.
    pub fn add_stylesheet(
        &mut self,
        url: impl Into<String>,
        mime: impl Into<String>,
        media: Option<String>,
        attributes: Attributes,
    ) -> &mut Self {
        let sheet = StylesheetLink {
            url: url.into(),
            mime: mime.into(),
            media,
            attributes,
        };
        match self.stylesheets.iter_mut().find(|s| s.url == sheet.url) {
            Some(existing) => *existing = sheet,
            None => self.stylesheets.push(sheet),
        }
        self
    }

    /// Add an inline style block. Declarations of the same type are joined.
    pub fn add_style_declaration(
        &mut self,
        content: impl Into<String>,
        mime: impl Into<String>,
    ) -> &mut Self {
        append_declaration(&mut self.style_declarations, content.into(), mime.into());
        self
    }

    /// Add raw HTML to the head.
    pub fn add_custom_tag(&mut self, html: &str) -> &mut Self {
        self.custom_tags.push(html.trim().to_string());
        self
    }

    /// Add a `<link>` element. Re-adding an href overwrites it.
    pub fn add_head_link(
        &mut self,
        href: impl Into<String>,
        relation: impl Into<String>,
        rel_type: impl Into<String>,
        attributes: Attributes,
    ) -> &mut Self {
        let link = HeadLink {
            href: href.into(),
            relation: relation.into(),
            rel_type: rel_type.into(),
            attributes,
        };
        match self.links.iter_mut().find(|l| l.href == link.href) {
            Some(existing) => *existing = link,
            None => self.links.push(link),
        }
        self
    }

    /// Add a favicon link.
    pub fn add_favicon(&mut self, href: impl Into<String>) -> &mut Self {
        self.add_head_link(
            href,
            "shortcut icon",
            "rel",
            Attributes::new().with("type", "image/vnd.microsoft.icon"),
        )
    }

    /// Set a meta tag, replacing any earlier value for the same name.
    pub fn set_meta_data(
        &mut self,
        name: impl Into<String>,
        content: impl Into<String>,
        kind: MetaKind,
    ) -> &mut Self {
        let name = name.into().to_lowercase();
        let content = content.into();
        match self
            .meta_tags
            .iter_mut()
            .find(|m| m.kind == kind && m.name == name)
        {
            Some(existing) => existing.content = content,
            None => self.meta_tags.push(MetaTag {
                kind,
                name,
                content,
            }),
        }
        self
    }

    /// Linked scripts in registration order.
    pub fn scripts(&self) -> &[ScriptLink] {
        &self.scripts
    }

    /// Inline scripts as `(mime, content)` pairs.
    pub fn script_declarations(&self) -> &[(String, String)] {
        &self.script_declarations
    }

    /// Linked stylesheets in registration order.
    pub fn stylesheets(&self) -> &[StylesheetLink] {
        &self.stylesheets
    }

    /// Inline styles as `(mime, content)` pairs.
    pub fn style_declarations(&self) -> &[(String, String)] {
        &self.style_declarations
    }

    /// Raw head tags.
    pub fn custom_tags(&self) -> &[String] {
        &self.custom_tags
    }

    /// `<link>` elements such as the favicon.
    pub fn links(&self) -> &[HeadLink] {
        &self.links
    }

    /// Meta tags in registration order.
    pub fn meta_tags(&self) -> &[MetaTag] {
        &self.meta_tags
    }
}

fn append_declaration(declarations: &mut Vec<(String, String)>, content: String, mime: String) {
    let mime = mime.to_lowercase();
    match declarations.iter_mut().find(|(m, _)| *m == mime) {
        Some((_, existing)) => {
            existing.push('\r');
            existing.push_str(&content);
        }
        None => declarations.push((mime, content)),
    }
}
