//! Package description loaders.
//!
//! Two on-disk formats can describe a package:
//!
//! - **CPS** (`.cps`): the native JSON format, handled by [`CpsLoader`]
//! - **pkg-config** (`.pc`): the legacy format, handled by
//!   [`PkgConfigLoader`] and translated into the same [`Package`] model
//!
//! Both implement [`PackageLoader`], so the resolver never needs to know which
//! format a candidate file used. Loaders are pure: they receive the file
//! contents and its identity (the path it was read from, used for
//! diagnostics and for deriving the installation prefix) and return either a
//! validated package or a structured [`CpsError`].
//!
//! [`load_file`] ties a loader to the filesystem.

pub mod cps;
pub mod pkgconfig;
pub mod prefix;

pub use cps::CpsLoader;
pub use pkgconfig::PkgConfigLoader;
pub use prefix::calculate_prefix;

use crate::core::{CpsError, Result};
use crate::package::Package;
use crate::search::FileKind;
use std::path::Path;

/// Turns the text of a package description into a [`Package`].
pub trait PackageLoader {
    /// Parse and validate `text`, which was read from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`CpsError::JsonError`] or [`CpsError::SchemaError`] for
    /// malformed descriptions and [`CpsError::UnsupportedCpsVersion`] when
    /// the description targets a different CPS version.
    fn load(&self, text: &str, source: &Path) -> Result<Package>;
}

/// Read `path` and load it with the loader for `kind`.
///
/// # Errors
///
/// Returns [`CpsError::ReadError`] when the file cannot be read, and any
/// error of the selected loader.
pub fn load_file(path: &Path, kind: FileKind) -> Result<Package> {
    tracing::debug!("Loading {} as {kind}", path.display());
    let text = std::fs::read_to_string(path).map_err(|source| CpsError::ReadError {
        file: path.display().to_string(),
        source,
    })?;
    match kind {
        FileKind::Cps => CpsLoader.load(&text, path),
        FileKind::PkgConfig => PkgConfigLoader.load(&text, path),
    }
}
