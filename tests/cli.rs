use predicates::prelude::*;
use serde_json::Value;
use std::process::Command;
use tempfile::TempDir;

// Each test runs in its own directory so no stray reply-doc.toml is picked up.
fn cmd(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_reply-doc")));
    cmd.current_dir(dir.path());
    cmd
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn json_output(assert: assert_cmd::assert::Assert) -> Value {
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    serde_json::from_str(&stdout).unwrap()
}

// -- formats --

#[test]
fn stdin_plain_reply_renders_html() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .write_stdin("Just a short answer.")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<!DOCTYPE html>"))
        .stdout(predicate::str::contains("<p>Just a short answer.</p>"));
}

#[test]
fn fixture_sections_as_json() {
    let dir = TempDir::new().unwrap();
    let assert = cmd(&dir)
        .args(["-f", "json"])
        .arg(fixture_path("reply.md"))
        .assert()
        .success();

    let doc = json_output(assert);
    assert_eq!(doc["kind"], "structured");

    let sections = doc["sections"].as_array().unwrap();
    let kinds: Vec<&str> = sections.iter().map(|s| s["kind"].as_str().unwrap()).collect();
    assert_eq!(kinds, ["major", "sub", "code"]);
    assert_eq!(sections[0]["title"], "Solving the Equation");
    assert_eq!(sections[0]["has_math"], true);
    // numbered list stays inside the Statement section
    assert_eq!(sections[1]["title"], "Statement");
    assert_eq!(sections[2]["title"], "Worked Example");
}

#[test]
fn fixture_html_has_math_and_code() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .arg(fixture_path("reply.md"))
        .assert()
        .success()
        .stdout(predicate::str::contains("<span class=\"katex-inline\">x^2 - 4 = 0</span>"))
        .stdout(predicate::str::contains("<em>nicely</em>"))
        .stdout(predicate::str::contains("<pre><code class=\"language-python\">"));
}

#[test]
fn typst_to_output_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("reply.typ");

    cmd(&dir)
        .args(["-f", "typst", "-o", out.to_str().unwrap()])
        .arg(fixture_path("reply.md"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let typst = std::fs::read_to_string(out).unwrap();
    assert!(typst.starts_with("#set par(linebreaks: \"optimized\")"));
    assert!(typst.contains("= Solving the Equation"));
    assert!(typst.contains("#raw(\"x^2 - 4 = 0\");"));
}

#[test]
fn pdf_output() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("reply.pdf");

    cmd(&dir)
        .args(["-f", "pdf", "-o", out.to_str().unwrap()])
        .arg(fixture_path("reply.md"))
        .assert()
        .success()
        .stderr(predicate::str::contains("Created"));

    let bytes = std::fs::read(out).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

// -- errors --

#[test]
fn pdf_requires_output() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["-f", "pdf"])
        .write_stdin("# T\nx")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output is required"));
}

#[test]
fn unknown_format_fails() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["-f", "docx"])
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format: docx"));
}

#[test]
fn missing_input_fails() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .arg("does-not-exist.md")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read does-not-exist.md"));
}

// -- config --

#[test]
fn config_thresholds_change_segmentation() {
    let input = "## Notes\nOne\nTwo\n\n1. foo";
    let dir = TempDir::new().unwrap();

    let doc = json_output(cmd(&dir).args(["-f", "json"]).write_stdin(input).assert().success());
    assert_eq!(doc["sections"].as_array().unwrap().len(), 1);

    std::fs::write(
        dir.path().join("reply-doc.toml"),
        "[segment]\nlist_min_lines = 2\n",
    )
    .unwrap();
    let doc = json_output(cmd(&dir).args(["-f", "json"]).write_stdin(input).assert().success());
    let sections = doc["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[1]["kind"], "list");
    assert_eq!(sections[1]["title"], "Key Points");
}

#[test]
fn invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "[segment\n").unwrap();

    cmd(&dir)
        .args(["-c", config.to_str().unwrap()])
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config"));
}

#[test]
fn html_fragment_via_config() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("reply-doc.toml"), "[html]\nstandalone = false\n").unwrap();

    cmd(&dir)
        .write_stdin("# Title\nbody")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<section class=\"section major\">"));
}
