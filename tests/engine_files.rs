//! Engine tests against templates and data on disk

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use stencil::data::{self, DataError};
use stencil::{Engine, EngineError, FileSource};

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn site_engine() -> Engine<FileSource> {
    let source = FileSource::new(fixtures(), "html").expect("Should open fixtures");
    let globals = data::load_file(&fixtures().join("site.toml")).expect("Should load site data");
    Engine::new(source).with_globals(globals)
}

#[test]
fn test_render_site_index() {
    let html = site_engine().load("index").expect("Should render index");
    insta::assert_snapshot!(html, @r"
    <header>
    <h1>Notes &amp; Sketches</h1>
    </header>
    <ul>
    <li>1. First &lt;steps&gt;</li><li>2. Second &#039;take&#039;<em>latest</em></li>
    </ul>
    <p>Notes &amp; Sketches has posts</p>
    <footer>&copy; 2024</footer>
    ");
}

#[test]
fn test_assigned_values_override_data() {
    let mut engine = site_engine();
    engine.assign("posts", Vec::<String>::new());
    let html = engine.load("index").expect("Should render index");
    assert!(html.contains("<ul>\n</ul>"), "got:\n{}", html);
    assert!(html.contains("<p>Nothing yet</p>"));
}

#[test]
fn test_include_sees_current_environment() {
    let engine = site_engine();
    let env = data::load_str("[site]\ntitle = \"Other\"\n").expect("Should parse");
    assert_eq!(
        engine.render_with("{{ inc('footer') }}", &env),
        "<footer>draft</footer>"
    );
}

#[test]
fn test_load_missing_template() {
    let err = site_engine().load("missing").unwrap_err();
    match err {
        EngineError::TemplateNotFound { name, location } => {
            assert_eq!(name, "missing");
            assert!(location.ends_with("missing.html"), "location: {}", location);
        }
        other => panic!("Expected TemplateNotFound, got {:?}", other),
    }
}

#[test]
fn test_file_source_requires_directory() {
    assert!(matches!(
        FileSource::new("", "html"),
        Err(EngineError::MissingDirectory)
    ));
    assert!(matches!(
        FileSource::new(fixtures().join("nope"), "html"),
        Err(EngineError::DirectoryNotFound { .. })
    ));
}

#[test]
fn test_missing_data_file() {
    let result = data::load_file(&fixtures().join("nope.toml"));
    assert!(matches!(result, Err(DataError::IoError(_))));
}
