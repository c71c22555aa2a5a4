//! Integration tests for the composable binary

use assert_cmd::Command;
use assert_cmd::cargo_bin;
use composable_testkit::fixtures::{CATALOG_CSS, CATALOG_PAGE, FRAMESET_PAGE, page_with_body};
use composable_testkit::{temp_dir_in_workspace, write_fixture};
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;

const URL: &str = "http://localhost:5173/packages/bali";

fn composable(cwd: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin!(env!("CARGO_PKG_NAME")));
    cmd.current_dir(cwd).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help_flag() {
    let temp = temp_dir_in_workspace();
    composable(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("convert"))
        .stdout(predicate::str::contains("bridge"));
}

#[test]
fn test_convert_prints_tree() {
    let temp = temp_dir_in_workspace();
    let html = write_fixture(temp.path(), "page.html", &page_with_body("<h1>Hello</h1>"));

    let output = composable(temp.path())
        .args(["convert", "--url", URL])
        .arg(&html)
        .output()
        .unwrap();

    assert!(output.status.success());
    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["type"], "box");
    assert_eq!(result["metadata"]["title"], "Page Root with Styles");
}

#[test]
fn test_convert_writes_out_file() {
    let temp = temp_dir_in_workspace();
    let html = write_fixture(temp.path(), "page.html", &page_with_body("<p>Hi</p>"));
    let out = temp.path().join("tree.json");

    composable(temp.path())
        .args(["convert", "--pretty", "--url", URL, "--out"])
        .arg(&out)
        .arg(&html)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.contains("\n  \"metadata\""));
}

#[test]
fn test_convert_missing_file_fails() {
    let temp = temp_dir_in_workspace();
    composable(temp.path())
        .args(["convert", "missing.html"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_convert_page_without_body_fails() {
    let temp = temp_dir_in_workspace();
    let html = write_fixture(temp.path(), "frames.html", FRAMESET_PAGE);

    composable(temp.path())
        .args(["convert", "--url", URL])
        .arg(&html)
        .assert()
        .failure()
        .stderr(predicate::str::contains("MISSING_ROOT"));
}

#[test]
fn test_css_reads_same_origin_sheets() {
    let temp = temp_dir_in_workspace();
    let site = temp.path().join("site");
    std::fs::create_dir_all(site.join("assets")).unwrap();
    write_fixture(&site.join("assets"), "app.css", CATALOG_CSS);
    let html = write_fixture(temp.path(), "catalog.html", CATALOG_PAGE);

    composable(temp.path())
        .args(["css", "--url", URL, "--site-root"])
        .arg(&site)
        .arg(&html)
        .assert()
        .success()
        .stdout(predicate::str::contains(".trip-list"))
        .stdout(predicate::str::contains(".hero { padding: 24px }"))
        .stdout(predicate::str::contains("fonts.example.net").not());
}

#[test]
fn test_export_names_file_after_route() {
    let temp = temp_dir_in_workspace();
    let html = write_fixture(temp.path(), "page.html", &page_with_body("<p>Hi</p>"));
    let exports = temp.path().join("exports");

    let output = composable(temp.path())
        .args(["export", "--url", URL, "--dir"])
        .arg(&exports)
        .arg(&html)
        .output()
        .unwrap();

    assert!(output.status.success());
    let printed = String::from_utf8(output.stdout).unwrap();
    let path = Path::new(printed.trim());
    let name = path.file_name().unwrap().to_string_lossy();
    assert!(name.starts_with("localhost_5173_packagesbali-"));
    assert!(name.ends_with("-with-stylesheet.json"));
    assert!(path.starts_with(&exports));
    assert!(path.exists());
}

#[test]
fn test_config_file_is_validated() {
    let temp = temp_dir_in_workspace();
    write_fixture(temp.path(), "composable.toml", "[converter]\nmax_depth = 0\n");
    let html = write_fixture(temp.path(), "page.html", &page_with_body("<p>Hi</p>"));

    composable(temp.path())
        .args(["convert", "--url", URL])
        .arg(&html)
        .assert()
        .failure()
        .stderr(predicate::str::contains("converter.max_depth"));
}

#[test]
fn test_bridge_answers_trusted_requests() {
    let temp = temp_dir_in_workspace();
    let html = write_fixture(temp.path(), "page.html", &page_with_body("<p>Hi</p>"));
    let stdin = [
        r#"{"origin": "https://evil.test", "data": {"type": "request-html-to-json"}}"#,
        "not json",
        r#"{"origin": "http://localhost:5173", "data": {"type": "request-html-to-json"}}"#,
        r#"{"origin": "http://localhost:5174", "data": {"type": "request-html-to-json"}}"#,
    ]
    .join("\n");

    let output = composable(temp.path())
        .args(["bridge", "--url", URL])
        .arg(&html)
        .write_stdin(stdin)
        .output()
        .unwrap();

    assert!(output.status.success());
    let replies: Vec<Value> = String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0]["targetOrigin"], "http://localhost:5173");
    assert_eq!(replies[1]["targetOrigin"], "http://localhost:5174");
    assert_eq!(replies[0]["message"]["type"], "html-to-json-response");
    // second reply comes from the session cache
    assert_eq!(replies[0]["message"]["data"], replies[1]["message"]["data"]);
}
