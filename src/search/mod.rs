//! Search path expansion and candidate file discovery.
//!
//! A package name is looked up in an ordered list of directories, each tagged
//! with the format of the files it may contain:
//!
//! 1. every `CPS_PATH` entry as given (`.cps`)
//! 2. every `CPS_PREFIX_PATH` root, expanded to `<prefix>/lib/cps` and
//!    `<prefix>/share/cps` (`.cps`)
//! 3. every `PKG_CONFIG_PATH` entry as given (`.pc`)
//! 4. the default prefixes (`/usr`, `/usr/local`), each expanded to
//!    `lib/cps`, `share/cps` (`.cps`) and then `lib/pkgconfig`,
//!    `share/pkgconfig` (`.pc`)
//!
//! The list is computed once per resolution run ([`SearchPaths::new`]) and
//! every lookup walks it in order, so earlier directories win. A name that is
//! itself the path of an existing file bypasses the search entirely.

use crate::config::Environment;
use crate::constants::{CPS_DIR, CPS_EXTENSION, PC_DIR, PC_EXTENSION};
use crate::core::{CpsError, Result};
use crate::utils::{datadir, default_prefixes, libdir};
use std::fmt;
use std::path::{Path, PathBuf};

/// The description format of a candidate file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Native CPS JSON
    Cps,
    /// Legacy pkg-config
    PkgConfig,
}

impl FileKind {
    /// File extension, without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Cps => CPS_EXTENSION,
            Self::PkgConfig => PC_EXTENSION,
        }
    }

    /// Guess the kind of an explicitly named file from its extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(PC_EXTENSION) => Self::PkgConfig,
            _ => Self::Cps,
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cps => "CPS",
            Self::PkgConfig => "pkg-config",
        })
    }
}

/// A file that may describe the requested package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Path of the file
    pub path: PathBuf,
    /// Format to load it with
    pub kind: FileKind,
}

/// The ordered directories probed for package descriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPaths {
    entries: Vec<(PathBuf, FileKind)>,
}

impl SearchPaths {
    /// Expand the environment and the default prefixes into search
    /// directories.
    #[must_use]
    pub fn new(env: &Environment) -> Self {
        Self::with_default_prefixes(env, &default_prefixes())
    }

    /// Like [`SearchPaths::new`] with an explicit list of fallback prefixes.
    #[must_use]
    pub fn with_default_prefixes(env: &Environment, defaults: &[PathBuf]) -> Self {
        let mut entries = Vec::new();

        for dir in env.cps_path.iter().flatten() {
            entries.push((dir.clone(), FileKind::Cps));
        }
        for prefix in env.cps_prefix_path.iter().flatten() {
            entries.extend(expand_prefix(prefix, FileKind::Cps));
        }
        for dir in env.pc_path.iter().flatten() {
            entries.push((dir.clone(), FileKind::PkgConfig));
        }
        for prefix in defaults {
            entries.extend(expand_prefix(prefix, FileKind::Cps));
            entries.extend(expand_prefix(prefix, FileKind::PkgConfig));
        }

        Self {
            entries,
        }
    }

    /// The directories in search order.
    #[must_use]
    pub fn entries(&self) -> &[(PathBuf, FileKind)] {
        &self.entries
    }

    /// Every existing file that may describe `name`, in search order.
    ///
    /// # Errors
    ///
    /// Returns [`CpsError::PackageNotFound`] listing the searched directories
    /// when no candidate exists.
    pub fn find_candidates(&self, name: &str) -> Result<Vec<Candidate>> {
        let literal = Path::new(name);
        if literal.is_file() {
            tracing::debug!("Using {name} directly as a package description");
            return Ok(vec![Candidate {
                path: literal.to_path_buf(),
                kind: FileKind::from_path(literal),
            }]);
        }

        let found: Vec<Candidate> = self
            .entries
            .iter()
            .filter(|(dir, _)| dir.is_dir())
            .filter_map(|(dir, kind)| {
                let path = dir.join(format!("{name}.{}", kind.extension()));
                tracing::debug!("Probing {}", path.display());
                path.is_file().then_some(Candidate {
                    path,
                    kind: *kind,
                })
            })
            .collect();

        if found.is_empty() {
            return Err(CpsError::PackageNotFound {
                name: name.to_string(),
                searched: self.entries.iter().map(|(dir, _)| dir.clone()).collect(),
            });
        }
        Ok(found)
    }
}

fn expand_prefix(prefix: &Path, kind: FileKind) -> [(PathBuf, FileKind); 2] {
    let format_dir = match kind {
        FileKind::Cps => CPS_DIR,
        FileKind::PkgConfig => PC_DIR,
    };
    [
        (prefix.join(libdir()).join(format_dir), kind),
        (prefix.join(datadir()).join(format_dir), kind),
    ]
}
