use std::fs;
use std::process::Command;

use pretty_assertions::assert_eq;

const REPLY: &str = "**Diagnosis:** full table scan.\n```sql\nCREATE INDEX idx_orders_customer ON orders(customer_id);\n```\nRe-run the query.";

fn segmark() -> Command {
    Command::new(env!("CARGO_BIN_EXE_segmark"))
}

#[test]
fn reply_renders_to_pdf() {
    let pdf = segmark::response_to_pdf(REPLY).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
}

#[test]
fn cli_prints_segments_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("reply.txt");
    fs::write(&input, REPLY).unwrap();

    let out = segmark()
        .arg(&input)
        .args(["--format", "segments", "--config"])
        .arg(dir.path().join("none.toml"))
        .output()
        .unwrap();
    assert!(out.status.success());

    let segments: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(
        segments,
        serde_json::json!([
            {"kind": "emphasis", "content": "Diagnosis:"},
            {"kind": "text", "content": " full table scan.\n"},
            {"kind": "code_block", "content": "CREATE INDEX idx_orders_customer ON orders(customer_id);"},
            {"kind": "text", "content": "\nRe-run the query."},
        ])
    );
}

#[test]
fn cli_reads_json_replies() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("reply.json");
    fs::write(&input, r#"{"type": "general_question", "response": "Use **EXPLAIN**."}"#).unwrap();
    let output = dir.path().join("reply.typ");

    let status = segmark()
        .arg(&input)
        .arg("--json")
        .args(["--format", "typst", "--output"])
        .arg(&output)
        .args(["--config"])
        .arg(dir.path().join("none.toml"))
        .status()
        .unwrap();
    assert!(status.success());

    let markup = fs::read_to_string(&output).unwrap();
    assert!(markup.ends_with("Use #strong[EXPLAIN];.\n"));
}

#[test]
fn cli_uses_config_language() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("reply.txt");
    fs::write(&input, "```mysql\nSELECT 1;\n```").unwrap();
    let config = dir.path().join("segmark.toml");
    fs::write(&config, "[segmenter]\nfence_language = \"mysql\"\n").unwrap();

    let out = segmark()
        .arg(&input)
        .args(["--format", "segments", "--config"])
        .arg(&config)
        .output()
        .unwrap();
    assert!(out.status.success());

    let segments: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(
        segments,
        serde_json::json!([{"kind": "code_block", "content": "SELECT 1;"}])
    );
}

#[test]
fn cli_reports_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let out = segmark()
        .arg(dir.path().join("missing.txt"))
        .args(["--format", "typst"])
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).starts_with("Error: "));
}
