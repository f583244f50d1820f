//! Resolution of legacy pkg-config packages, alone and mixed with CPS.

use cps_config::config::Environment;
use cps_config::core::CpsError;
use cps_config::find_package;
use cps_config::package::{Define, Language};
use cps_config::test_utils::{TestPrefix, cps_document};
use serde_json::json;

fn pc_environment(prefix: &TestPrefix) -> Environment {
    prefix.environment().with_pc_path([prefix.pc_dir()])
}

#[test]
fn test_pc_package_flags() {
    let prefix = TestPrefix::new().unwrap();
    prefix
        .write_pc(
            "upc-glue",
            "prefix=/opt/glue\n\
             includedir=${prefix}/include\n\
             libdir=${prefix}/lib\n\
             \n\
             Name: glue\n\
             Version: 2.4.1\n\
             Cflags: -I${includedir}/glue -DGLUE_SHARED -UNDEBUG -pthread\n\
             Libs: -L${libdir} -lglue -Wl,--as-needed\n",
        )
        .unwrap();

    let flags = find_package("upc-glue", &[], true, &pc_environment(&prefix), None).unwrap();
    assert_eq!(flags.version, "2.4.1");
    for lang in Language::ALL {
        assert_eq!(flags.includes[&lang], vec!["/opt/glue/include/glue"]);
        assert_eq!(flags.compile_flags[&lang], vec!["-pthread"]);
        assert_eq!(flags.definitions[&lang], vec![Define::new("GLUE_SHARED"), Define::undefine("NDEBUG")]);
    }
    assert_eq!(flags.link_libraries, vec!["glue"]);
    assert_eq!(flags.link_flags, vec!["-L/opt/glue/lib", "-Wl,--as-needed"]);
    assert!(flags.link_location.is_empty());
}

#[test]
fn test_pc_requires_chain_and_versions() {
    let prefix = TestPrefix::new().unwrap();
    prefix
        .write_pc("upc-top", "Name: top\nVersion: 1.0\nRequires: upc-mid >= 3.0, upc-leaf\nLibs: -ltop\n")
        .unwrap();
    prefix.write_pc("upc-mid", "Name: mid\nVersion: 3.2\nLibs: -lmid\n").unwrap();
    prefix.write_pc("upc-leaf", "Name: leaf\nLibs: -lleaf\n").unwrap();

    let env = pc_environment(&prefix);
    let flags = find_package("upc-top", &[], true, &env, None).unwrap();
    assert_eq!(flags.link_libraries, vec!["top", "mid", "leaf"]);

    prefix.write_pc("upc-mid", "Name: mid\nVersion: 2.9\nLibs: -lmid\n").unwrap();
    let err = find_package("upc-top", &[], true, &env, None).unwrap_err();
    assert!(err.root_causes().iter().any(|cause| matches!(cause, CpsError::VersionTooOld { .. })), "{err}");
}

#[test]
fn test_pc_requires_without_spaces_enforces_version() {
    let prefix = TestPrefix::new().unwrap();
    prefix.write_pc("upc-top", "Name: top\nRequires: upc-mid>=3.0,upc-leaf\nLibs: -ltop\n").unwrap();
    prefix.write_pc("upc-mid", "Name: mid\nVersion: 3.2\nLibs: -lmid\n").unwrap();
    prefix.write_pc("upc-leaf", "Name: leaf\nLibs: -lleaf\n").unwrap();

    let env = pc_environment(&prefix);
    let flags = find_package("upc-top", &[], true, &env, None).unwrap();
    assert_eq!(flags.link_libraries, vec!["top", "mid", "leaf"]);

    prefix.write_pc("upc-mid", "Name: mid\nVersion: 2.9\nLibs: -lmid\n").unwrap();
    let err = find_package("upc-top", &[], true, &env, None).unwrap_err();
    assert!(err.root_causes().iter().any(|cause| matches!(cause, CpsError::VersionTooOld { .. })), "{err}");
}

#[test]
fn test_cps_package_requiring_pc_package() {
    let prefix = TestPrefix::new().unwrap();
    let mut app = cps_document("upc-app");
    app["requires"] = json!({ "upc-zlib": { "version": "1.2" } });
    app["components"]["upc-app"]["requires"] = json!(["upc-zlib"]);
    prefix.write_cps("upc-app", &app).unwrap();
    prefix.write_pc("upc-zlib", "Name: zlib\nVersion: 1.3.1\nLibs: -lz\n").unwrap();

    let flags = find_package("upc-app", &[], true, &pc_environment(&prefix), None).unwrap();
    assert_eq!(flags.link_libraries, vec!["z"]);
}

#[test]
fn test_pc_undefined_variable_is_rejected() {
    let prefix = TestPrefix::new().unwrap();
    prefix.write_pc("upc-bad", "Name: bad\nCflags: -I${nowhere}/include\n").unwrap();

    let err = find_package("upc-bad", &[], true, &pc_environment(&prefix), None).unwrap_err();
    assert!(err.to_string().contains("nowhere"), "{err}");
}
