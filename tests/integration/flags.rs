//! Flag selection options.

use super::{command, write_archive};
use cps_config::test_utils::TestPrefix;
use predicates::prelude::*;

#[test]
fn test_cflags() {
    let prefix = TestPrefix::new().unwrap();
    write_archive(&prefix, "ifl-fmt", "10.2.1");
    let root = prefix.path().display().to_string();

    command(&prefix)
        .args(["--cflags", "ifl-fmt"])
        .assert()
        .success()
        .stdout(format!("-I{root}/include -DIFL_FMT_STATIC\n"));

    command(&prefix)
        .args(["--cflags-only-I", "ifl-fmt"])
        .assert()
        .success()
        .stdout(format!("-I{root}/include\n"));

    command(&prefix)
        .args(["--cflags-only-other", "ifl-fmt"])
        .assert()
        .success()
        .stdout("-DIFL_FMT_STATIC\n");
}

#[test]
fn test_cflags_for_cxx() {
    let prefix = TestPrefix::new().unwrap();
    write_archive(&prefix, "ifl-cxx", "1.0");
    let root = prefix.path().display().to_string();

    command(&prefix)
        .args(["--cflags", "--language", "c++", "ifl-cxx"])
        .assert()
        .success()
        .stdout(format!("-std=c++17 -I{root}/include\n"));
}

#[test]
fn test_libs() {
    let prefix = TestPrefix::new().unwrap();
    write_archive(&prefix, "ifl-libs", "1.0");
    let root = prefix.path().display().to_string();

    command(&prefix)
        .args(["--libs", "ifl-libs"])
        .assert()
        .success()
        .stdout(format!("-L{root}/lib -lifl-libs -lm\n"));

    command(&prefix)
        .args(["--libs-only-L", "ifl-libs"])
        .assert()
        .success()
        .stdout(format!("-L{root}/lib\n"));

    command(&prefix)
        .args(["--libs-only-l", "ifl-libs"])
        .assert()
        .success()
        .stdout("-lifl-libs -lm\n");
}

#[test]
fn test_prefix_variable() {
    let prefix = TestPrefix::new().unwrap();
    write_archive(&prefix, "ifl-moved", "1.0");

    command(&prefix)
        .args(["--cflags-only-I", "--libs-only-L", "--prefix-variable", "/opt/moved", "ifl-moved"])
        .assert()
        .success()
        .stdout("-I/opt/moved/include -L/opt/moved/lib\n");
}

#[test]
fn test_multiple_packages_share_a_line() {
    let prefix = TestPrefix::new().unwrap();
    write_archive(&prefix, "ifl-one", "1.0");
    write_archive(&prefix, "ifl-two", "2.0");

    command(&prefix)
        .args(["--libs-only-l", "ifl-one", "ifl-two"])
        .assert()
        .success()
        .stdout("-lifl-one -lm -lifl-two -lm\n");
}

#[test]
fn test_pc_file() {
    let prefix = TestPrefix::new().unwrap();
    prefix
        .write_pc("ifl-legacy", "prefix=/opt/legacy\nName: legacy\nCflags: -I${prefix}/include\nLibs: -llegacy\n")
        .unwrap();

    command(&prefix)
        .args(["--cflags", "--libs", "ifl-legacy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-I/opt/legacy/include").and(predicate::str::contains("-llegacy")));
}
