//! Integration test suite for cps-config
//!
//! These tests run the compiled binary against package descriptions in
//! temporary prefixes and check its stdout, stderr and exit code.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **flags**: pkg-config style flag selection and output
//! - **errors**: error reporting and exit codes
//! - **formats**: JSON output and version printing

mod errors;
mod flags;
mod formats;

use assert_cmd::Command;
use cps_config::test_utils::TestPrefix;
use serde_json::json;

/// A command for the binary that only sees packages in `prefix`.
pub fn command(prefix: &TestPrefix) -> Command {
    let mut cmd = Command::cargo_bin("cps-config").unwrap();
    cmd.env_clear()
        .env("CPS_PREFIX_PATH", prefix.path())
        .env("PKG_CONFIG_PATH", prefix.pc_dir());
    cmd
}

/// Write an `fmt`-like archive package named `name` into `prefix`.
pub fn write_archive(prefix: &TestPrefix, name: &str, version: &str) {
    let mut doc = json!({
        "name": name,
        "cps_version": "0.10.0",
        "version": version,
        "default_components": [name],
        "components": {},
    });
    doc["components"][name] = json!({
        "type": "archive",
        "location": format!("@prefix@/lib/lib{name}.a"),
        "includes": { "*": ["@prefix@/include"] },
        "definitions": { "c": [format!("{}_STATIC", name.replace('-', "_").to_uppercase())] },
        "compile_flags": { "c++": ["-std=c++17"] },
        "link_libraries": ["m"],
    });
    prefix.write_cps(name, &doc).unwrap();
}
