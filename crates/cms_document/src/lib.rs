//! # cms_document
//!
//! Document template rendering for the CMS framework.
//!
//! A template is plain text containing placeholder markers such as
//! `<marker:include type="modules" name="left" />`. Rendering a document:
//!
//! - loads the template file, falling back to the `system` template
//! - extracts every marker with its type, name and attributes
//! - resolves each marker type to a renderer through the [`RendererRegistry`]
//! - caches rendered content per `(type, name, title)` in the [`RenderBuffer`]
//! - splices the content back into the template text
//!
//! Content markers (`content`, `module`, `modules` by default) are resolved
//! before head and script markers, so resources they register on the
//! document end up in the head.
//!
//! ## Example
//!
//! ```rust,no_run
//! use cms_document::{BufferOptions, DocumentConfig, DocumentFactory};
//!
//! let config = DocumentConfig::from_yaml_file("config/document.yaml".as_ref()).unwrap();
//! let factory = DocumentFactory::standard();
//!
//! let mut document = factory.create("html", &config).unwrap();
//! document
//!     .set_buffer("<h1>Welcome</h1>", BufferOptions::of_type("component"))
//!     .unwrap();
//!
//! let html = document.render(false, &config.template_params()).unwrap();
//! ```

pub mod buffer;
pub mod composer;
pub mod config;
pub mod document;
pub mod error;
pub mod factory;
pub mod head;
pub mod html;
pub mod marker;
pub mod registry;
pub mod renderer;
pub mod state;
pub mod template;

pub use buffer::{BufferKey, BufferOptions, RenderBuffer, RenderContext};
pub use composer::{TemplateComposer, DEFAULT_RENDER_FIRST};
pub use config::DocumentConfig;
pub use document::{Document, Lifecycle, ResponseWriter};
pub use error::{DocumentError, DocumentResult, ErrorKind};
pub use factory::{DocumentFactory, DocumentTypeSpec};
pub use head::{HeadData, HeadLink, MetaKind, MetaTag, ScriptLink, StylesheetLink};
pub use html::register_html_renderers;
pub use marker::{Attributes, Marker, MarkerExtractor};
pub use registry::{RendererRegistry, DEFAULT_NAMESPACE};
pub use renderer::{escape_html, DocumentRenderer, RendererFactory};
pub use state::{Direction, DocumentState};
pub use template::{Template, TemplateLoader, TemplateParams, SYSTEM_TEMPLATE};
