//! End-to-end tests: full build cycles from template sources on disk to
//! files in the output directory.

use std::fs;
use std::path::Path;

use stencil_core::Config;
use stencil_generator::Builder;

fn test_config(templates: &Path, output: &Path) -> Config {
    let mut config = Config::default();
    config.build.templates_dir = templates.to_path_buf();
    config.build.output_dir = output.to_path_buf();
    config
}

fn write_site(dir: &Path) {
    fs::write(
        dir.join("site.toml"),
        r#"
[[pages]]
output = "index.html"
source = "index.md"
title = "Home"

[[stylesheets]]
output = "site.css"
source = "site.css"
"#,
    )
    .expect("write manifest");
    fs::write(dir.join("index.md"), "# Hello\n\nWelcome.\n").expect("write page");
    fs::write(dir.join("site.css"), "body { margin: 0; }\n").expect("write css");
}

#[tokio::test]
async fn test_build_writes_pages_and_css() {
    let templates = tempfile::tempdir().expect("templates dir");
    let output = tempfile::tempdir().expect("output dir");
    write_site(templates.path());

    let mut builder = Builder::new(test_config(templates.path(), output.path()));
    let stats = builder.build().await.expect("build");

    assert_eq!(stats.pages, 1);
    assert_eq!(stats.stylesheets, 1);

    let html = fs::read_to_string(output.path().join("index.html")).expect("read page");
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Home</title>"));
    assert!(html.contains("<h1>Hello</h1>"));

    let css = fs::read_to_string(output.path().join("css/site.css")).expect("read css");
    assert!(css.contains("margin: 0;"));
}

#[tokio::test]
async fn test_build_without_stylesheets_leaves_css_dir_empty() {
    let templates = tempfile::tempdir().expect("templates dir");
    let output = tempfile::tempdir().expect("output dir");
    fs::write(
        templates.path().join("site.toml"),
        "[[pages]]\noutput = \"index.html\"\nsource = \"index.md\"\n",
    )
    .expect("write manifest");
    fs::write(templates.path().join("index.md"), "hi\n").expect("write page");

    let mut builder = Builder::new(test_config(templates.path(), output.path()));
    let stats = builder.build().await.expect("build");

    assert_eq!(stats.pages, 1);
    assert_eq!(stats.stylesheets, 0);

    let css_dir = output.path().join("css");
    assert!(css_dir.is_dir());
    assert_eq!(fs::read_dir(&css_dir).expect("read css dir").count(), 0);
}

#[tokio::test]
async fn test_build_removes_stale_html_even_with_no_pages() {
    let templates = tempfile::tempdir().expect("templates dir");
    let output = tempfile::tempdir().expect("output dir");
    // Empty manifest: no pages, no stylesheets.
    fs::write(templates.path().join("site.toml"), "").expect("write manifest");
    fs::write(output.path().join("stale.html"), "old").expect("write stale");

    let mut builder = Builder::new(test_config(templates.path(), output.path()));
    let stats = builder.build().await.expect("build");

    assert_eq!(stats.pages, 0);
    assert!(!output.path().join("stale.html").exists());
    assert!(output.path().join("css").is_dir());
}

#[tokio::test]
async fn test_rebuild_is_idempotent() {
    let templates = tempfile::tempdir().expect("templates dir");
    let output = tempfile::tempdir().expect("output dir");
    write_site(templates.path());

    let mut builder = Builder::new(test_config(templates.path(), output.path()));
    builder.build().await.expect("first build");
    let first_html = fs::read(output.path().join("index.html")).expect("read page");
    let first_css = fs::read(output.path().join("css/site.css")).expect("read css");

    builder.build().await.expect("second build");
    let second_html = fs::read(output.path().join("index.html")).expect("read page");
    let second_css = fs::read(output.path().join("css/site.css")).expect("read css");

    assert_eq!(first_html, second_html);
    assert_eq!(first_css, second_css);
}

#[tokio::test]
async fn test_load_failure_leaves_previous_output_untouched() {
    let templates = tempfile::tempdir().expect("templates dir");
    let output = tempfile::tempdir().expect("output dir");
    write_site(templates.path());

    let mut builder = Builder::new(test_config(templates.path(), output.path()));
    builder.build().await.expect("first build");

    // Corrupt the entry point: loading fails before any cleanup runs.
    fs::write(templates.path().join("site.toml"), "[[pages\noutput").expect("corrupt manifest");

    let result = builder.build().await;
    assert!(result.is_err());

    assert!(output.path().join("index.html").exists());
    assert!(output.path().join("css/site.css").exists());
}

#[tokio::test]
async fn test_edit_then_rebuild_updates_output() {
    let templates = tempfile::tempdir().expect("templates dir");
    let output = tempfile::tempdir().expect("output dir");
    write_site(templates.path());

    let mut builder = Builder::new(test_config(templates.path(), output.path()));
    builder.build().await.expect("first build");

    fs::write(templates.path().join("index.md"), "# Goodbye\n").expect("edit page");

    builder.build().await.expect("second build");
    let html = fs::read_to_string(output.path().join("index.html")).expect("read page");
    assert!(html.contains("<h1>Goodbye</h1>"));
    assert!(!html.contains("Hello"));
}
