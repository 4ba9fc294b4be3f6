//! Integration tests for the `erpscan` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;

const STRUCTURED: &str = "\
Company Name   : ACME Steel
Invoice Number : INV-9
Invoice Date   : 2024-01-01T10:00:00

Items:
Item 1: Rod
  Quantity : 10
Item 2: Plate
  Quantity : 2

Additional Fields:
  Transporter : XYZ
";

fn erpscan() -> Command {
    Command::cargo_bin("erpscan").unwrap()
}

#[test]
fn parse_from_stdin_outputs_json_record() {
    let output = erpscan()
        .arg("parse")
        .write_stdin(STRUCTURED)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["header_fields"]["Invoice Date"], "2024-01-01T10:00:00");
    assert_eq!(json["items"][1]["title"], "Item 2: Plate");
    assert_eq!(json["items"][1]["fields"]["Quantity"], "2");
    assert_eq!(json["additional_fields"]["Transporter"], "XYZ");
    assert_eq!(json["raw_text"], STRUCTURED);
}

#[test]
fn parse_file_as_csv() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("invoice.txt");
    std::fs::write(&input, STRUCTURED).unwrap();

    erpscan()
        .args(["parse", "--format", "csv"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("section,item,label,value\n"))
        .stdout(predicate::str::contains("item,Item 1: Rod,Quantity,10"));
}

#[test]
fn parse_empty_input_yields_empty_record() {
    erpscan()
        .arg("parse")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"{"header_fields":{},"items":[],"additional_fields":{},"raw_text":""}"#,
        ));
}

#[test]
fn parse_missing_file_fails() {
    erpscan()
        .args(["parse", "/nonexistent/invoice.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn extract_without_credentials_fails_before_any_request() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("invoice.pdf");
    std::fs::write(&input, b"%PDF-1.4").unwrap();
    let config = dir.path().join("config.json");
    std::fs::write(&config, "{}").unwrap();

    erpscan()
        .current_dir(dir.path())
        .arg("extract")
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .env_remove("AZURE_DOCUMENT_INTELLIGENCE_KEY")
        .env_remove("AZURE_DOCUMENT_INTELLIGENCE_ENDPOINT")
        .env_remove("OPENROUTER_API_KEY")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing environment variables"));
}

#[test]
fn config_init_and_get() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");

    erpscan()
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();

    erpscan()
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "ocr.max_polls", "7"])
        .assert()
        .success();

    erpscan()
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "ocr.max_polls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("7"));
}

#[test]
fn config_env_reads_dotenv_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".env"),
        "AZURE_DOCUMENT_INTELLIGENCE_KEY=key\n\
         AZURE_DOCUMENT_INTELLIGENCE_ENDPOINT=https://demo.cognitiveservices.azure.com\n\
         OPENROUTER_API_KEY=or-key\n",
    )
    .unwrap();

    erpscan()
        .current_dir(dir.path())
        .args(["config", "env"])
        .env_remove("AZURE_DOCUMENT_INTELLIGENCE_KEY")
        .env_remove("AZURE_DOCUMENT_INTELLIGENCE_ENDPOINT")
        .env_remove("OPENROUTER_API_KEY")
        .assert()
        .success()
        .stdout(predicate::str::contains("AZURE_DOCUMENT_INTELLIGENCE_KEY"))
        .stdout(predicate::str::contains("OPENROUTER_API_KEY"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("missing").not())
        .stdout(predicate::str::contains("or-key").not());
}

#[test]
fn config_env_reports_missing_without_dotenv() {
    let dir = tempfile::tempdir().unwrap();

    erpscan()
        .current_dir(dir.path())
        .args(["config", "env"])
        .env_remove("AZURE_DOCUMENT_INTELLIGENCE_KEY")
        .env_remove("AZURE_DOCUMENT_INTELLIGENCE_ENDPOINT")
        .env_remove("OPENROUTER_API_KEY")
        .assert()
        .success()
        .stdout(predicate::str::contains("missing"));
}
