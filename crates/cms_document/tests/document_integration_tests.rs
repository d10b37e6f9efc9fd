//! Integration tests for document parsing and rendering.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cms_document::{
    Attributes, BufferOptions, Document, DocumentConfig, DocumentError, DocumentFactory,
    DocumentRenderer, DocumentResult, DocumentState, ErrorKind, Lifecycle, RendererRegistry,
    TemplateLoader, TemplateParams,
};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn site(files: &[(&str, &str)]) -> TempDir {
    let root = tempfile::tempdir().unwrap();
    for (relative, content) in files {
        write(root.path(), relative, content);
    }
    root
}

fn html_document(root: &Path, registry: RendererRegistry) -> Document {
    let mut document = Document::new("html", Arc::new(registry))
        .unwrap()
        .with_loader(TemplateLoader::new(root));
    document.state_mut().set_mime_type("text/html");
    document
}

fn html_registry() -> RendererRegistry {
    let mut registry = RendererRegistry::new();
    cms_document::register_html_renderers(&mut registry);
    registry
}

/// Article body that pulls in its own stylesheet.
struct Article;

impl DocumentRenderer for Article {
    fn render(
        &self,
        state: &mut DocumentState,
        name: Option<&str>,
        _attributes: &Attributes,
        _content: Option<&str>,
    ) -> DocumentResult<String> {
        state
            .head
            .add_stylesheet("/media/article.css", "text/css", None, Attributes::new());
        Ok(format!("<article>{}</article>", name.unwrap_or("")))
    }
}

struct Fixed(&'static str);

impl DocumentRenderer for Fixed {
    fn render(
        &self,
        _state: &mut DocumentState,
        _name: Option<&str>,
        _attributes: &Attributes,
        _content: Option<&str>,
    ) -> DocumentResult<String> {
        Ok(self.0.to_string())
    }
}

struct Counting(Arc<AtomicUsize>);

impl DocumentRenderer for Counting {
    fn render(
        &self,
        _state: &mut DocumentState,
        name: Option<&str>,
        _attributes: &Attributes,
        _content: Option<&str>,
    ) -> DocumentResult<String> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(format!("<nav>{}</nav>", name.unwrap_or("")))
    }
}

#[test]
fn test_single_content_marker() {
    let root = site(&[(
        "templates/system/index.html",
        r#"<div><marker:include type="content" name="main"/></div>"#,
    )]);
    let mut registry = html_registry();
    registry.register_default(None, "content", || Fixed("<p>hi</p>"));

    let mut document = html_document(root.path(), registry);
    let output = document.render(false, &TemplateParams::default()).unwrap();

    assert_eq!(output, "<div><p>hi</p></div>");
    assert_eq!(document.lifecycle(), Lifecycle::Rendered);
}

#[test]
fn test_head_sees_resources_registered_by_content() {
    let template = concat!(
        "<html><head>\n",
        r#"<marker:include type="stylesheets" />"#,
        "</head><body>",
        r#"<marker:include type="content" name="news" />"#,
        "</body></html>",
    );
    let root = site(&[("templates/system/index.html", template)]);
    let mut registry = html_registry();
    registry.register_default(None, "content", || Article);

    let mut document = html_document(root.path(), registry);
    let output = document.render(false, &TemplateParams::default()).unwrap();

    assert!(output.contains(r#"<link rel="stylesheet" href="/media/article.css" />"#));
    assert!(output.contains("<body><article>news</article></body>"));
    let head_end = output.find("</head>").unwrap();
    assert!(output.find("article.css").unwrap() < head_end);
}

#[test]
fn test_repeated_marker_rendered_once_and_replaced_everywhere() {
    let calls = Arc::new(AtomicUsize::new(0));
    let template = concat!(
        r#"<marker:include type="modules" name="menu" />"#,
        "<hr/>",
        r#"<marker:include type="modules" name="menu" />"#,
    );
    let root = site(&[("templates/system/index.html", template)]);
    let mut registry = html_registry();
    let counter = Arc::clone(&calls);
    registry.register_default(None, "modules", move || Counting(Arc::clone(&counter)));

    let mut document = html_document(root.path(), registry);
    let output = document.render(false, &TemplateParams::default()).unwrap();

    assert_eq!(output, "<nav>menu</nav><hr/><nav>menu</nav>");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_get_buffer_renders_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = RendererRegistry::new();
    let counter = Arc::clone(&calls);
    registry.register_default(None, "modules", move || Counting(Arc::clone(&counter)));
    let mut document = Document::new("html", Arc::new(registry)).unwrap();

    let attrs = Attributes::new().with("name", "left");
    let first = document.get_buffer("modules", Some("left"), &attrs).unwrap();
    let second = document.get_buffer("modules", Some("left"), &attrs).unwrap();

    assert_eq!(first, second);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_fallback_to_system_template() {
    let root = site(&[(
        "templates/system/index.php",
        r#"<main><marker:include type="component" /></main>"#,
    )]);
    let mut document = html_document(root.path(), html_registry());
    document
        .set_buffer("<form/>", BufferOptions::of_type("component"))
        .unwrap();

    let params = TemplateParams::new("custom", "index.php");
    let output = document.render(false, &params).unwrap();

    assert_eq!(output, "<main><form/></main>");
    let template = document.template().unwrap();
    assert!(template.is_system());
    assert_eq!(template.path, root.path().join("templates/system/index.php"));
}

#[test]
fn test_custom_namespace_renderer_preferred() {
    let root = site(&[(
        "templates/system/index.html",
        r#"<marker:include type="foo" />"#,
    )]);
    let mut registry = html_registry();
    registry.register_default(None, "foo", || Fixed("default"));
    registry.register_fn("My.Site", Some("html"), "foo", || Fixed("custom"));
    let registry = Arc::new(registry);

    let mut plain = Document::new("html", Arc::clone(&registry))
        .unwrap()
        .with_loader(TemplateLoader::new(root.path()));
    assert_eq!(
        plain.render(false, &TemplateParams::default()).unwrap(),
        "default"
    );

    let mut custom = Document::new("html", registry)
        .unwrap()
        .with_loader(TemplateLoader::new(root.path()))
        .with_namespace("My.Site");
    assert_eq!(
        custom.render(false, &TemplateParams::default()).unwrap(),
        "custom"
    );
}

#[test]
fn test_missing_renderer_fails_whole_render() {
    let root = site(&[(
        "templates/system/index.html",
        r#"<marker:include type="component" /><marker:include type="foo" />"#,
    )]);
    let mut document = html_document(root.path(), html_registry());

    let err = document
        .render(false, &TemplateParams::default())
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_string().contains("foo"));
    assert_eq!(document.lifecycle(), Lifecycle::Parsed);
}

#[test]
fn test_set_buffer_requires_type() {
    let mut document = Document::new("html", Arc::new(RendererRegistry::new())).unwrap();
    let err = document
        .set_buffer("x", BufferOptions::new().name("main"))
        .unwrap_err();

    assert!(matches!(err, DocumentError::MissingBufferType));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(document.buffer().is_empty());
}

#[test]
fn test_caching_rejects_modules() {
    let root = site(&[(
        "templates/system/index.html",
        r#"<marker:include type="modules" name="left" />"#,
    )]);
    let mut registry = html_registry();
    registry.register_default(None, "modules", || Fixed("menu"));
    let mut document = html_document(root.path(), registry);

    let err = document.render(true, &TemplateParams::default()).unwrap_err();
    assert!(matches!(err, DocumentError::Unsupported(_)));
}

#[test]
fn test_factory_renders_from_yaml_config() {
    let template = concat!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head>\n",
        r#"<marker:include type="head" />"#,
        "</head><body>\n",
        r#"<jdoc:include type="component" />"#,
        "\n</body></html>",
    );
    let root = site(&[
        ("themes/protostar/index.html", template),
        ("themes/protostar/favicon.ico", ""),
    ]);

    let yaml = format!(
        "template_directory: themes\ntemplate: protostar\napplication_root: {}\nbase_url: /site\nmarker_tag: jdoc\n",
        root.path().display()
    );
    let config = DocumentConfig::from_yaml_str(&yaml).unwrap();

    let factory = DocumentFactory::standard();
    let mut document = factory.create("html", &config).unwrap();
    document
        .set_buffer("<h1>Welcome</h1>", BufferOptions::of_type("component"))
        .unwrap();

    let output = document.render(false, &config.template_params()).unwrap();

    // The head marker uses the default tag and is left untouched.
    assert!(output.contains(r#"<marker:include type="head" />"#));
    assert!(output.contains("<body>\n<h1>Welcome</h1>\n</body>"));
    assert_eq!(document.template().unwrap().name, "protostar");
    assert_eq!(
        document.state().head.links()[0].href,
        "/site/themes/protostar/favicon.ico"
    );
}

#[test]
fn test_factory_head_output() {
    let template = concat!(
        "<head>",
        r#"<marker:include type="head" />"#,
        "</head><body>",
        r#"<marker:include type="component" />"#,
        "</body>",
    );
    let root = site(&[("templates/system/index.html", template)]);
    let config = DocumentConfig {
        application_root: root.path().to_path_buf(),
        ..DocumentConfig::default()
    };

    let mut document = DocumentFactory::standard().create("html", &config).unwrap();
    document.state_mut().set_title("Home & Away");
    document
        .state_mut()
        .head
        .add_script("/media/app.js", "text/javascript", true, false);

    let output = document.render(false, &config.template_params()).unwrap();

    assert!(output.contains("<title>Home &amp; Away</title>"));
    assert!(output.contains(r#"<script src="/media/app.js" defer="defer"></script>"#));
}
