//! Installation prefix derivation.
//!
//! Paths in a package description are written relative to `@prefix@`, the
//! root the package was installed into. When a description does not state its
//! prefix explicitly it is derived from where the file was found:
//!
//! - With a `cps_path` such as `@prefix@/lib/cps`, the trailing directories of
//!   the file's location are matched against the path after `@prefix@` and
//!   whatever remains is the prefix.
//! - Without one, a trailing format directory (`cps` or `pkgconfig`) is
//!   dropped, then a trailing library or data directory (`lib`, `share`).
//!   `/usr/lib/cps/zlib.cps` therefore lives in prefix `/usr`.

use crate::constants::{CPS_DIR, PC_DIR, PREFIX_PLACEHOLDER};
use crate::core::{CpsError, Result};
use crate::utils::{datadir, libdir};
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

const FORMAT_DIRS: [&str; 2] = [CPS_DIR, PC_DIR];

/// Derive the installation prefix of the description at `source`.
///
/// # Errors
///
/// Returns [`CpsError::SchemaError`] when `cps_path` does not start with
/// `@prefix@` or does not match the directories the file was found in.
///
/// # Examples
///
/// ```rust
/// use cps_config::loader::calculate_prefix;
/// use std::path::{Path, PathBuf};
///
/// # fn example() -> cps_config::core::Result<()> {
/// let source = Path::new("/opt/fmt/lib/cps/fmt.cps");
/// assert_eq!(calculate_prefix(None, source)?, PathBuf::from("/opt/fmt"));
/// assert_eq!(calculate_prefix(Some("@prefix@/lib/cps/"), source)?, PathBuf::from("/opt/fmt"));
/// # Ok(())
/// # }
/// ```
pub fn calculate_prefix(cps_path: Option<&str>, source: &Path) -> Result<PathBuf> {
    let file_dir = source.parent().unwrap_or_else(|| Path::new(""));
    match cps_path {
        Some(cps_path) => prefix_from_cps_path(cps_path, file_dir, source),
        None => Ok(prefix_from_location(file_dir)),
    }
}

/// Derive a prefix from a directory containing a package description.
#[must_use]
pub fn prefix_from_location(dir: &Path) -> PathBuf {
    let dir = match dir.file_name().and_then(OsStr::to_str) {
        Some(name) if FORMAT_DIRS.contains(&name) => dir.parent().unwrap_or(dir),
        _ => dir,
    };

    strip_trailing(dir, libdir())
        .or_else(|| strip_trailing(dir, datadir()))
        .unwrap_or(dir)
        .to_path_buf()
}

fn strip_trailing<'a>(dir: &'a Path, suffix: &Path) -> Option<&'a Path> {
    let depth = suffix.components().count();
    if depth == 0 || !dir.ends_with(suffix) {
        return None;
    }
    dir.ancestors().nth(depth)
}

fn prefix_from_cps_path(cps_path: &str, file_dir: &Path, source: &Path) -> Result<PathBuf> {
    let file = source.display().to_string();
    let mut template = Path::new(cps_path).components();
    if template.next() != Some(Component::Normal(OsStr::new(PREFIX_PLACEHOLDER))) {
        return Err(CpsError::schema(
            file,
            format!("cps_path `{cps_path}` does not start with `{PREFIX_PLACEHOLDER}`"),
        ));
    }

    let mut dir = file_dir;
    for expected in template.rev() {
        let parent = dir.parent().filter(|_| dir.file_name() == Some(expected.as_os_str()));
        match parent {
            Some(parent) => dir = parent,
            None => {
                return Err(CpsError::schema(
                    file,
                    format!(
                        "cps_path `{cps_path}` does not match the directory `{}` the file was found in",
                        file_dir.display()
                    ),
                ));
            }
        }
    }
    Ok(dir.to_path_buf())
}
