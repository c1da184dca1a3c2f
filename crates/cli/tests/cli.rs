//! End-to-end tests of the `efdesign` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const DOCUMENT: &str = r#"{
    "EntityContainerName": "SalesContext",
    "Namespace": "Sales",
    "Classes": [
        {
            "Name": "Order",
            "Namespace": "Sales",
            "IsAbstract": false,
            "Properties": [
                { "TypeName": "Int32", "Name": "Id", "IsIdentity": true, "Required": true }
            ],
            "BidirectionalAssociations": [
                {
                    "SourceClassName": "Order",
                    "SourceClassNamespace": "Sales",
                    "TargetClassName": "Line",
                    "TargetClassNamespace": "Sales",
                    "SourceMultiplicity": "One",
                    "TargetMultiplicity": "ZeroMany",
                    "SourcePropertyName": "Order",
                    "TargetPropertyName": "Lines"
                }
            ]
        },
        { "Name": "Line", "Namespace": "Sales" }
    ],
    "Enumerations": [
        {
            "Name": "Status",
            "Namespace": "Sales",
            "Values": [ { "Name": "Open", "Value": 0 }, { "Name": "Closed", "Value": 1 } ]
        }
    ]
}"#;

fn efdesign() -> Command {
    let mut cmd = Command::cargo_bin("efdesign").unwrap();
    cmd.env_remove("EFDESIGN_MODEL").env_remove("RUST_LOG");
    cmd
}

fn write_document(dir: &TempDir, text: &str) -> std::path::PathBuf {
    let path = dir.path().join("parsed.json");
    std::fs::write(&path, text).unwrap();
    path
}

fn merge(document: &Path, model: &Path) -> assert_cmd::assert::Assert {
    efdesign()
        .arg("merge")
        .arg(document)
        .arg("--model")
        .arg(model)
        .assert()
}

#[test]
fn test_help() {
    efdesign()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("import"))
        .stdout(predicate::str::contains("merge"))
        .stdout(predicate::str::contains("info"));
}

#[test]
fn test_merge_creates_model() {
    let dir = TempDir::new().unwrap();
    let document = write_document(&dir, DOCUMENT);
    let model = dir.path().join("sales.efmodel");

    merge(&document, &model)
        .success()
        .stderr(predicate::str::contains("Processing Sales.Order"));

    assert!(model.exists());
    assert!(document.exists());

    efdesign()
        .arg("info")
        .arg("--model")
        .arg(&model)
        .assert()
        .success()
        .stdout(predicate::str::contains("SalesContext"))
        .stdout(predicate::str::contains("Sales.Order - 1 attributes"))
        .stdout(predicate::str::contains("Sales.Order -> Sales.Line"))
        .stdout(predicate::str::contains("Sales.Status : Int32 [Open, Closed]"));
}

#[test]
fn test_merge_twice_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let document = write_document(&dir, DOCUMENT);
    let model = dir.path().join("sales.efmodel");

    merge(&document, &model).success();
    merge(&document, &model).success();

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&model).unwrap()).unwrap();
    let store = &saved["model"];
    assert_eq!(store["classes"].as_object().unwrap().len(), 2);
    assert_eq!(store["enums"].as_object().unwrap().len(), 1);
    assert_eq!(store["associations"].as_object().unwrap().len(), 1);
}

#[test]
fn test_merge_malformed_document() {
    let dir = TempDir::new().unwrap();
    let document = write_document(&dir, "{ \"Classes\": [");
    let model = dir.path().join("sales.efmodel");

    merge(&document, &model)
        .failure()
        .stderr(predicate::str::contains("Error processing document"));

    assert!(!model.exists());
}

#[test]
fn test_info_missing_model() {
    let dir = TempDir::new().unwrap();

    efdesign()
        .arg("info")
        .arg("--model")
        .arg(dir.path().join("missing.efmodel"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Model not found at path"));
}

#[test]
fn test_import_with_missing_parser() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("import.toml");
    std::fs::write(
        &config,
        format!(
            "temp_dir = {:?}\n\n[[parsers]]\npath = {:?}\ndescription = \"Test parser\"\n",
            dir.path().to_string_lossy(),
            dir.path().join("no-such-parser").to_string_lossy()
        ),
    )
    .unwrap();
    let model = dir.path().join("sales.efmodel");

    efdesign()
        .arg("import")
        .arg("Sales.dll")
        .arg("--model")
        .arg(&model)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Detecting .NET and EF versions"))
        .stderr(predicate::str::contains("Failed to launch parser"));

    assert!(!model.exists());
}

#[test]
fn test_import_with_empty_parser_list() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("import.toml");
    std::fs::write(&config, "parsers = []\n").unwrap();

    efdesign()
        .arg("import")
        .arg("Sales.dll")
        .arg("--model")
        .arg(dir.path().join("sales.efmodel"))
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot load import configuration"));
}
