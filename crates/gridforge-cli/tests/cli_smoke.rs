//! End-to-end smoke tests: run the `gridforge` binary against a temp store.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;

use gridforge_store::{DocumentKind, ListEntry, Store, StoreConfig};

fn gridforge(root: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("gridforge").unwrap();
    cmd.arg("--store-root").arg(root);
    cmd
}

fn seeded_store(root: &std::path::Path) -> Store {
    let store = Store::open(StoreConfig::at(root)).unwrap();
    store
        .create(DocumentKind::Enum, ListEntry::new(0, "MoveKind"))
        .unwrap();
    store
        .save(
            DocumentKind::Enum,
            "MoveKind",
            &json!([
                {"id": 1, "property": "Idle", "value": 1, "description": ""},
                {"id": 2, "property": "Run", "value": 2, "description": ""},
            ]),
        )
        .unwrap();
    store
        .create(DocumentKind::ClassDataId, ListEntry::new(0, "Weapon"))
        .unwrap();
    store
        .save(
            DocumentKind::ClassDataId,
            "Weapon",
            &json!({
                "columns": [
                    {"type": "int", "name": "Damage"},
                    {"type": "MoveKind", "name": "Move"},
                ],
                "rows": [
                    {"id": 1, "enum_property": "Weapon_00", "description": "", "data": {
                        "Damage": {"value": 5, "type": "int"},
                        "Move": {"value": "MoveKindID.Run", "type": "MoveKind"},
                    }},
                ],
            }),
        )
        .unwrap();
    store
}

#[test]
fn list_shows_seeded_documents() {
    let dir = tempfile::tempdir().unwrap();
    seeded_store(dir.path());

    gridforge(dir.path())
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MoveKind").and(predicate::str::contains("Weapon")));

    gridforge(dir.path())
        .args(["list", "--kind", "enum"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MoveKind").and(predicate::str::contains("Weapon").not()));
}

#[test]
fn unknown_kind_fails() {
    let dir = tempfile::tempdir().unwrap();
    gridforge(dir.path())
        .args(["list", "--kind", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown document kind"));
}

#[test]
fn csv_export_import_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    seeded_store(dir.path());
    let csv_path = dir.path().join("weapon.csv");

    gridforge(dir.path())
        .args(["export", "class-data-id", "Weapon", "--out"])
        .arg(&csv_path)
        .assert()
        .success();

    let text = std::fs::read_to_string(&csv_path).unwrap();
    assert!(text.starts_with("\"id\",\"enum_property\",\"description\""));
    assert!(text.contains("\"MoveKindID.Run\""));

    gridforge(dir.path())
        .args(["import", "class-data-id", "Weapon"])
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"rows\": 1"));

    // The stored document still carries the original cell values.
    let store = Store::open(StoreConfig::at(dir.path())).unwrap();
    let doc = store.load(DocumentKind::ClassDataId, "Weapon").unwrap();
    assert_eq!(doc["rows"][0]["data"]["Damage"]["value"], 5);
    assert_eq!(doc["rows"][0]["data"]["Move"]["value"], "MoveKindID.Run");
}

#[test]
fn generate_writes_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    seeded_store(dir.path());

    gridforge(dir.path())
        .args(["generate", "enum", "MoveKind"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MoveKind.cs"));

    let source =
        std::fs::read_to_string(dir.path().join("enum/MoveKind/MoveKind.cs")).unwrap();
    assert!(source.contains("public enum MoveKind {"));

    gridforge(dir.path())
        .args(["generate", "all"])
        .assert()
        .success();
    assert!(dir.path().join("class-data-id/Weapon/WeaponID.cs").exists());
    assert!(dir.path().join("class-data-id/Weapon/Weapon.bytes").exists());
    assert!(dir
        .path()
        .join("class-data-matrix-id/MatrixTableID.cs")
        .exists());
}

#[test]
fn generate_requires_name_for_per_document_targets() {
    let dir = tempfile::tempdir().unwrap();
    gridforge(dir.path())
        .args(["generate", "enum"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires a document name"));
}

#[test]
fn doctor_reports_clean_store() {
    let dir = tempfile::tempdir().unwrap();
    seeded_store(dir.path());

    gridforge(dir.path())
        .args(["--json", "doctor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ok\": true"));
}
