//! cps-config - pkg-config for the Common Package Specification
//!
//! Resolves installed packages described by CPS files (`<name>.cps`, JSON)
//! or legacy pkg-config files (`<name>.pc`) into the compiler and linker
//! flags needed to use them.
//!
//! # Architecture Overview
//!
//! A query for one package runs through these stages:
//!
//! 1. **Search** ([`search`]): the directories named by `CPS_PATH`,
//!    `CPS_PREFIX_PATH`, `PKG_CONFIG_PATH` and the platform defaults are
//!    probed for candidate files.
//! 2. **Load** ([`loader`]): a candidate is parsed and validated into a
//!    [`package::Package`], and its installation prefix is determined.
//! 3. **Resolve** ([`resolver`]): requirements are loaded recursively into a
//!    shared graph, the needed components are selected and the graph is
//!    ordered so that every package precedes its dependencies.
//! 4. **Aggregate**: the flags of the selected components are concatenated
//!    with `@prefix@` placeholders resolved.
//! 5. **Print** ([`printer`]): the result is rendered pkg-config style or as
//!    JSON.
//!
//! # Core Modules
//!
//! - [`cli`] - Command-line interface mirroring pkg-config options
//! - [`config`] - Environment variables that control lookup
//! - [`core`] - Error types and user-facing error rendering
//! - [`loader`] - CPS and pkg-config file loaders and prefix calculation
//! - [`package`] - The package data model
//! - [`printer`] - Output rendering
//! - [`resolver`] - Graph building, component propagation and aggregation
//! - [`search`] - Search path construction and candidate lookup
//! - [`version`] - Version schemas and comparison
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use cps_config::config::Environment;
//!
//! let env = Environment::from_env();
//! let flags = cps_config::find_package("fmt", &[], true, &env, None)?;
//! for dir in flags.includes.values().flatten() {
//!     println!("-I{dir}");
//! }
//! # Ok::<(), cps_config::core::CpsError>(())
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod loader;
pub mod package;
pub mod printer;
pub mod resolver;
pub mod search;
pub mod utils;
pub mod version;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use resolver::{ResolvedFlags, find_package};
