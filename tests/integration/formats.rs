//! Version printing and JSON output.

use super::{command, write_archive};
use cps_config::test_utils::TestPrefix;
use predicates::prelude::*;

#[test]
fn test_modversion() {
    let prefix = TestPrefix::new().unwrap();
    write_archive(&prefix, "ifmt-a", "10.2.1");
    write_archive(&prefix, "ifmt-b", "0.3");

    command(&prefix)
        .args(["--modversion", "ifmt-a", "ifmt-b"])
        .assert()
        .success()
        .stdout("10.2.1\n0.3\n");
}

#[test]
fn test_json_format() {
    let prefix = TestPrefix::new().unwrap();
    write_archive(&prefix, "ifmt-json", "4.0");

    let output = command(&prefix).args(["--format", "json", "ifmt-json"]).assert().success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(value["version"], "4.0");
    assert_eq!(value["link_libraries"][0], "m");
    assert!(value["link_location"][0].as_str().unwrap().ends_with("lib/libifmt-json.a"));
    assert_eq!(value["definitions"]["c"][0]["name"], "IFMT_JSON_STATIC");
}

#[test]
fn test_unknown_format_rejected() {
    let prefix = TestPrefix::new().unwrap();

    command(&prefix)
        .args(["--format", "yaml", "anything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("yaml"));
}

#[test]
fn test_version_flag() {
    let prefix = TestPrefix::new().unwrap();

    command(&prefix)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("cps-config "));
}
