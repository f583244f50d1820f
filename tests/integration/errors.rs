//! Error reporting and exit codes.

use super::{command, write_archive};
use cps_config::test_utils::TestPrefix;
use predicates::prelude::*;

#[test]
fn test_missing_package_is_silent_by_default() {
    let prefix = TestPrefix::new().unwrap();

    command(&prefix)
        .args(["--cflags", "ierr-missing"])
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("ierr-missing").not());
}

#[test]
fn test_print_errors() {
    let prefix = TestPrefix::new().unwrap();

    command(&prefix)
        .args(["--print-errors", "--cflags", "ierr-missing"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Could not find a CPS file for `ierr-missing`"));
}

#[test]
fn test_errors_to_stdout() {
    let prefix = TestPrefix::new().unwrap();

    command(&prefix)
        .args(["--print-errors", "--errors-to-stdout", "ierr-missing"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("ierr-missing"));
}

#[test]
fn test_debug_spew_enables_errors() {
    let prefix = TestPrefix::new().unwrap();

    command(&prefix)
        .env("CPS_CONFIG_DEBUG_SPEW", "1")
        .args(["ierr-missing"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ierr-missing"));
}

#[test]
fn test_partial_failure_still_prints_resolved_packages() {
    let prefix = TestPrefix::new().unwrap();
    write_archive(&prefix, "ierr-good", "1.0");

    command(&prefix)
        .args(["--libs-only-l", "ierr-good", "ierr-missing"])
        .assert()
        .code(1)
        .stdout("-lierr-good -lm\n");
}

#[test]
fn test_packages_required() {
    let prefix = TestPrefix::new().unwrap();

    command(&prefix).arg("--cflags").assert().failure().stderr(predicate::str::contains("PACKAGES"));
}

#[test]
fn test_help_shows_examples() {
    let prefix = TestPrefix::new().unwrap();

    command(&prefix)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--cflags-only-I").and(predicate::str::contains("Examples:")));
}
