//! Test utilities for cps-config
//!
//! This module provides helpers shared by unit tests and the `tests/` targets:
//! logging initialization and [`TestPrefix`], a throwaway installation prefix
//! that package descriptions can be written into.
//!
//! # Example
//!
//! ```rust,no_run
//! use cps_config::test_utils::{TestPrefix, cps_document};
//!
//! let prefix = TestPrefix::new().unwrap();
//! prefix.write_cps("zlib", &cps_document("zlib")).unwrap();
//!
//! let env = prefix.environment();
//! let flags = cps_config::find_package("zlib", &[], true, &env, None).unwrap();
//! assert_eq!(flags.version, "unknown");
//! ```

use crate::config::Environment;
use serde_json::{Map, Value, json};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Respects `RUST_LOG` when no level is given; without either, logging stays
/// disabled. Safe to call from every test.
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// A temporary installation prefix.
///
/// Files are laid out the way a real installation would be:
/// `<prefix>/lib/cps/<name>.cps` and `<prefix>/lib/pkgconfig/<name>.pc`.
/// The directory is removed when the value is dropped.
pub struct TestPrefix {
    temp: TempDir,
}

impl TestPrefix {
    /// Create an empty prefix.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            temp: TempDir::new()?,
        })
    }

    /// The prefix root.
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// `<prefix>/lib/cps`
    pub fn cps_dir(&self) -> PathBuf {
        self.path().join("lib").join("cps")
    }

    /// `<prefix>/lib/pkgconfig`
    pub fn pc_dir(&self) -> PathBuf {
        self.path().join("lib").join("pkgconfig")
    }

    /// Write `<prefix>/lib/cps/<name>.cps`.
    pub fn write_cps(&self, name: &str, document: &Value) -> io::Result<PathBuf> {
        self.write_cps_in(&self.cps_dir(), name, document)
    }

    /// Write `<dir>/<name>.cps`, creating `dir` as needed. Used to place
    /// several candidates for one name in different search directories.
    pub fn write_cps_in(&self, dir: &Path, name: &str, document: &Value) -> io::Result<PathBuf> {
        let text = serde_json::to_string_pretty(document).map_err(io::Error::other)?;
        self.write_file(dir, &format!("{name}.cps"), &text)
    }

    /// Write `<prefix>/lib/pkgconfig/<name>.pc`.
    pub fn write_pc(&self, name: &str, text: &str) -> io::Result<PathBuf> {
        self.write_file(&self.pc_dir(), &format!("{name}.pc"), text)
    }

    fn write_file(&self, dir: &Path, file_name: &str, text: &str) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(file_name);
        fs::write(&path, text)?;
        Ok(path)
    }

    /// An environment that searches this prefix through `CPS_PREFIX_PATH`.
    pub fn environment(&self) -> Environment {
        Environment::default().with_prefix_path([self.path()])
    }
}

/// A minimal valid description: one interface component named after the
/// package, which is also the default component.
pub fn cps_document(name: &str) -> Value {
    let mut components = Map::new();
    components.insert(name.to_string(), json!({ "type": "interface" }));
    json!({
        "name": name,
        "cps_version": crate::constants::CPS_VERSION,
        "default_components": [name],
        "components": components,
    })
}
