//! End-to-end resolution of CPS descriptions.

use cps_config::config::Environment;
use cps_config::core::{CpsError, ErrorKind};
use cps_config::find_package;
use cps_config::package::{Define, Language};
use cps_config::test_utils::{TestPrefix, cps_document, init_test_logging};
use serde_json::{Value, json};
use std::path::Path;

fn component(kind: &str, prefix_lib: Option<&str>) -> Value {
    let mut value = json!({ "type": kind });
    if let Some(location) = prefix_lib {
        value["location"] = json!(location);
    }
    value
}

#[test]
fn test_fmt_archive_end_to_end() {
    init_test_logging(None);
    let prefix = TestPrefix::new().unwrap();
    let doc = json!({
        "name": "fmt",
        "cps_version": "0.10.0",
        "version": "10.2.1",
        "prefix": "/usr",
        "default_components": ["fmt"],
        "components": {
            "fmt": {
                "type": "archive",
                "location": "@prefix@/lib/libfmt.a",
                "includes": { "c": ["@prefix@/include"] },
            }
        }
    });
    prefix.write_cps("fmt", &doc).unwrap();

    let env = Environment::default().with_cps_path([prefix.cps_dir()]);
    let flags = find_package("fmt", &[], true, &env, None).unwrap();

    assert_eq!(flags.version, "10.2.1");
    assert_eq!(flags.link_location, vec!["/usr/lib/libfmt.a"]);
    assert_eq!(flags.includes[&Language::C], vec!["/usr/include"]);
}

#[test]
fn test_prefix_derived_from_location_and_overridden() {
    let prefix = TestPrefix::new().unwrap();
    let mut doc = cps_document("ures-derived");
    doc["components"]["ures-derived"] = component("dylib", Some("@prefix@/lib/libderived.so"));
    prefix.write_cps("ures-derived", &doc).unwrap();

    let env = prefix.environment();
    let flags = find_package("ures-derived", &[], true, &env, None).unwrap();
    assert_eq!(flags.link_location, vec![prefix.path().join("lib").join("libderived.so").display().to_string()]);

    let flags = find_package("ures-derived", &[], true, &env, Some(Path::new("/sysroot/usr"))).unwrap();
    assert_eq!(flags.link_location, vec!["/sysroot/usr/lib/libderived.so"]);
}

fn write_diamond(prefix: &TestPrefix) {
    for (name, deps) in [
        ("ures-top", vec!["ures-left", "ures-right"]),
        ("ures-left", vec!["ures-base"]),
        ("ures-right", vec!["ures-base"]),
        ("ures-base", vec![]),
    ] {
        let mut doc = cps_document(name);
        let lib = format!("@prefix@/lib/lib{name}.a");
        doc["components"][name] = component("archive", Some(&lib));
        doc["components"][name]["definitions"] = json!({ "*": [name.replace('-', "_").to_uppercase()] });
        for dep in &deps {
            doc["requires"][*dep] = json!({});
        }
        doc["components"][name]["requires"] = json!(deps);
        prefix.write_cps(name, &doc).unwrap();
    }
}

#[test]
fn test_diamond_flags_appear_once() {
    let prefix = TestPrefix::new().unwrap();
    write_diamond(&prefix);

    let flags = find_package("ures-top", &[], true, &prefix.environment(), None).unwrap();
    let libs: Vec<&str> =
        flags.link_location.iter().map(|l| l.rsplit('/').next().unwrap_or_default()).collect();
    assert_eq!(libs, ["libures-top.a", "libures-right.a", "libures-left.a", "libures-base.a"]);

    let defines: Vec<&str> = flags.definitions[&Language::Cxx].iter().map(|d| d.name.as_str()).collect();
    assert_eq!(defines, ["URES_TOP", "URES_RIGHT", "URES_LEFT", "URES_BASE"]);
}

#[test]
fn test_self_requirement_pulls_in_flags() {
    let prefix = TestPrefix::new().unwrap();
    let doc = json!({
        "name": "ures-multi",
        "cps_version": "0.10.0",
        "default_components": ["comp1"],
        "components": {
            "comp1": { "type": "interface", "requires": [":comp2"], "definitions": { "c": ["ONE"] } },
            "comp2": { "type": "interface", "definitions": { "c": ["TWO=2", "!THREE"] } },
            "comp3": { "type": "interface", "definitions": { "c": ["NEVER"] } },
        }
    });
    prefix.write_cps("ures-multi", &doc).unwrap();

    let flags = find_package("ures-multi", &[], true, &prefix.environment(), None).unwrap();
    assert_eq!(
        flags.definitions[&Language::C],
        vec![Define::new("ONE"), Define::with_value("TWO", "2"), Define::undefine("THREE")]
    );
}

#[test]
fn test_requested_components_replace_defaults() {
    let prefix = TestPrefix::new().unwrap();
    let doc = json!({
        "name": "ures-pick",
        "cps_version": "0.10.0",
        "default_components": ["default"],
        "components": {
            "default": { "type": "interface", "compile_flags": ["-DDEFAULT"] },
            "extra": { "type": "interface", "compile_flags": ["-DEXTRA"] },
        }
    });
    prefix.write_cps("ures-pick", &doc).unwrap();
    let env = prefix.environment();

    let flags = find_package("ures-pick", &["extra".to_string()], false, &env, None).unwrap();
    assert_eq!(flags.compile_flags[&Language::C], vec!["-DEXTRA"]);

    let flags = find_package("ures-pick", &["extra".to_string()], true, &env, None).unwrap();
    assert_eq!(flags.compile_flags[&Language::C], vec!["-DDEFAULT", "-DEXTRA"]);

    let err = find_package("ures-pick", &["absent".to_string()], false, &env, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Resolution);
    assert!(matches!(err.root_causes()[0], CpsError::MissingComponents { .. }));
}

#[test]
fn test_unused_dependency_contributes_nothing() {
    let prefix = TestPrefix::new().unwrap();
    let mut app = cps_document("ures-app");
    app["requires"] = json!({ "ures-needed": {}, "ures-optional": {} });
    app["components"]["ures-app"]["requires"] = json!(["ures-needed"]);
    prefix.write_cps("ures-app", &app).unwrap();

    for name in ["ures-needed", "ures-optional"] {
        let mut doc = cps_document(name);
        doc["components"][name]["link_libraries"] = json!([name]);
        prefix.write_cps(name, &doc).unwrap();
    }

    let flags = find_package("ures-app", &[], true, &prefix.environment(), None).unwrap();
    assert_eq!(flags.link_libraries, vec!["ures-needed"]);
}

#[test]
fn test_too_old_dependency_is_named() {
    let prefix = TestPrefix::new().unwrap();
    let mut app = cps_document("ures-consumer");
    app["requires"] = json!({ "ures-ancient": { "version": "2.0" } });
    prefix.write_cps("ures-consumer", &app).unwrap();

    let mut old = cps_document("ures-ancient");
    old["version"] = json!("1.9.9");
    prefix.write_cps("ures-ancient", &old).unwrap();

    let err = find_package("ures-consumer", &[], true, &prefix.environment(), None).unwrap_err();
    let causes = err.root_causes();
    assert_eq!(causes.len(), 1);
    match causes[0] {
        CpsError::VersionTooOld {
            file,
            found,
            required,
            ..
        } => {
            assert!(file.ends_with("ures-ancient.cps"), "{file}");
            assert_eq!(found, "1.9.9");
            assert_eq!(required, "2.0");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(causes[0].kind(), ErrorKind::Constraint);
}

#[test]
fn test_retries_next_candidate() {
    let prefix = TestPrefix::new().unwrap();
    let old_dir = prefix.path().join("old");
    let new_dir = prefix.path().join("new");

    let mut old = cps_document("ures-retry");
    old["version"] = json!("1.0");
    prefix.write_cps_in(&old_dir, "ures-retry", &old).unwrap();
    let mut new = cps_document("ures-retry");
    new["version"] = json!("3.0");
    prefix.write_cps_in(&new_dir, "ures-retry", &new).unwrap();

    let mut app = cps_document("ures-retrier");
    app["requires"] = json!({ "ures-retry": { "version": "2.0" } });
    prefix.write_cps_in(&old_dir, "ures-retrier", &app).unwrap();

    let env = Environment::default().with_cps_path([&old_dir, &new_dir]);
    let flags = find_package("ures-retrier", &[], true, &env, None).unwrap();
    assert_eq!(flags.version, "unknown");

    let flags = find_package("ures-retry", &[], true, &env, None).unwrap();
    assert_eq!(flags.version, "1.0");
}

#[test]
fn test_cycle_resolves() {
    let prefix = TestPrefix::new().unwrap();
    for (name, other) in [("ures-ping", "ures-pong"), ("ures-pong", "ures-ping")] {
        let mut doc = cps_document(name);
        doc["requires"][other] = json!({});
        doc["components"][name]["requires"] = json!([other]);
        doc["components"][name]["link_libraries"] = json!([name]);
        prefix.write_cps(name, &doc).unwrap();
    }

    let flags = find_package("ures-ping", &[], true, &prefix.environment(), None).unwrap();
    assert_eq!(flags.link_libraries, vec!["ures-ping", "ures-pong"]);
}

/// The first package loaded for a name serves every later requester. When
/// the first requester accepts an old version, a later, stricter requester
/// fails even though a newer candidate exists.
#[test]
fn test_first_load_wins() {
    let prefix = TestPrefix::new().unwrap();
    let old_dir = prefix.path().join("old");
    let new_dir = prefix.path().join("new");

    let mut old = cps_document("ures-shared");
    old["version"] = json!("1.0");
    prefix.write_cps_in(&old_dir, "ures-shared", &old).unwrap();
    let mut new = cps_document("ures-shared");
    new["version"] = json!("2.0");
    prefix.write_cps_in(&new_dir, "ures-shared", &new).unwrap();

    let mut lax = cps_document("ures-lax");
    lax["requires"] = json!({ "ures-shared": {} });
    prefix.write_cps_in(&old_dir, "ures-lax", &lax).unwrap();
    let mut strict = cps_document("ures-strict");
    strict["requires"] = json!({ "ures-shared": { "version": "2.0" } });
    prefix.write_cps_in(&old_dir, "ures-strict", &strict).unwrap();

    let mut root = cps_document("ures-root");
    root["requires"] = json!({ "ures-lax": {}, "ures-strict": {} });
    prefix.write_cps_in(&old_dir, "ures-root", &root).unwrap();

    let env = Environment::default().with_cps_path([&old_dir, &new_dir]);
    let err = find_package("ures-root", &[], true, &env, None).unwrap_err();
    assert!(
        err.root_causes().iter().any(|cause| matches!(cause, CpsError::VersionTooOld { found, .. } if found == "1.0")),
        "{err}"
    );

    // The strict requester alone resolves the newer candidate
    let flags = find_package("ures-strict", &[], true, &env, None);
    assert!(flags.is_ok());
}

#[test]
fn test_missing_package() {
    let prefix = TestPrefix::new().unwrap();
    let err = find_package("ures-no-such-package", &[], true, &prefix.environment(), None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_string().contains("ures-no-such-package"));
}

#[test]
fn test_invalid_description_reported() {
    let prefix = TestPrefix::new().unwrap();
    let mut doc = cps_document("ures-broken");
    doc["components"]["ures-broken"] = json!({ "type": "archive" });
    prefix.write_cps("ures-broken", &doc).unwrap();

    let err = find_package("ures-broken", &[], true, &prefix.environment(), None).unwrap_err();
    assert_eq!(err.root_causes()[0].kind(), ErrorKind::Schema);
}
