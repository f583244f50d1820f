//! Run configuration collected from the environment.
//!
//! cps-config is configured entirely through environment variables, in the
//! same spirit as pkg-config:
//!
//! | Variable                 | Effect                                              |
//! |--------------------------|-----------------------------------------------------|
//! | `CPS_PATH`               | Directories searched for `.cps` files, first        |
//! | `CPS_PREFIX_PATH`        | Installation prefixes searched for `lib/cps`, `share/cps` |
//! | `PKG_CONFIG_PATH`        | Directories searched for legacy `.pc` files         |
//! | `CPS_CONFIG_DEBUG_SPEW`  | Enables debug logging (also `PKG_CONFIG_DEBUG_SPEW`) |
//!
//! Path lists use the platform separator (`:` on Unix, `;` on Windows).
//! [`Environment::from_env`] reads the process environment once; library
//! consumers and tests build an [`Environment`] directly with the builder
//! methods so that no global state is involved.
//!
//! # Examples
//!
//! ```rust
//! use cps_config::config::Environment;
//!
//! let env = Environment::default()
//!     .with_cps_path(["/opt/fmt/lib/cps"])
//!     .with_prefix_path(["/opt/zlib"]);
//! assert!(env.pc_path.is_none());
//! ```

use crate::constants::{ENV_CPS_PATH, ENV_CPS_PREFIX_PATH, ENV_DEBUG_SPEW, ENV_PKG_CONFIG_PATH};
use std::ffi::OsString;
use std::path::PathBuf;

/// Typed view of the environment variables that affect package lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    /// `CPS_PATH`: directories probed for `<name>.cps`
    pub cps_path: Option<Vec<PathBuf>>,
    /// `CPS_PREFIX_PATH`: installation prefixes expanded to their CPS directories
    pub cps_prefix_path: Option<Vec<PathBuf>>,
    /// `PKG_CONFIG_PATH`: directories probed for `<name>.pc`
    pub pc_path: Option<Vec<PathBuf>>,
    /// Whether a debug-spew variable is set
    pub debug_spew: bool,
}

impl Environment {
    /// Read the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Build an environment from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let paths = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .map(|value| std::env::split_paths(&value).collect::<Vec<_>>())
        };

        Self {
            cps_path: paths(ENV_CPS_PATH),
            cps_prefix_path: paths(ENV_CPS_PREFIX_PATH),
            pc_path: paths(ENV_PKG_CONFIG_PATH),
            debug_spew: ENV_DEBUG_SPEW.iter().any(|key| lookup(key).is_some()),
        }
    }

    /// Replace the CPS search directories.
    #[must_use]
    pub fn with_cps_path<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.cps_path = Some(dirs.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the CPS installation prefixes.
    #[must_use]
    pub fn with_prefix_path<I, P>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.cps_prefix_path = Some(prefixes.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the pkg-config search directories.
    #[must_use]
    pub fn with_pc_path<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.pc_path = Some(dirs.into_iter().map(Into::into).collect());
        self
    }
}
