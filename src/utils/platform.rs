//! Platform-specific installation layout.
//!
//! CPS and pkg-config files live in well-known directories below an
//! installation prefix. The names of those directories differ between
//! platforms and distributions; this module encapsulates them so that the
//! search code and the prefix derivation agree on a single layout.
//!
//! # Examples
//!
//! ```rust,no_run
//! use cps_config::utils::platform::{datadir, default_prefixes, libdir};
//!
//! for prefix in default_prefixes() {
//!     println!("{}", prefix.join(libdir()).join("cps").display());
//!     println!("{}", prefix.join(datadir()).join("cps").display());
//! }
//! ```

use std::path::{Path, PathBuf};

/// Checks if the current platform is Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// The path segment, relative to a prefix, that architecture specific
/// libraries are installed in.
#[must_use]
pub fn libdir() -> &'static Path {
    Path::new("lib")
}

/// The path segment, relative to a prefix, that architecture agnostic data is
/// installed in.
#[must_use]
pub fn datadir() -> &'static Path {
    Path::new("share")
}

/// Installation prefixes that are always searched, after any prefixes supplied
/// through the environment.
///
/// Only Unix-like layouts are known so far; on other platforms the list is
/// empty and packages must be located through the environment.
#[must_use]
pub fn default_prefixes() -> Vec<PathBuf> {
    if is_windows() {
        Vec::new()
    } else {
        vec![PathBuf::from("/usr"), PathBuf::from("/usr/local")]
    }
}
