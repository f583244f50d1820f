//! Global constants used throughout the cps-config codebase.
//!
//! This module contains the protocol-level literals of the CPS format and the
//! legacy pkg-config format. Defining them centrally keeps the loaders, the
//! search code and the aggregator in agreement about file names and
//! placeholders.

/// The only `cps_version` accepted by the CPS loader.
///
/// Package descriptions declaring any other schema version are rejected at
/// load time rather than being interpreted with possibly different semantics.
pub const CPS_VERSION: &str = "0.10.0";

/// Placeholder that CPS paths use to refer to the installation prefix.
///
/// Only a leading path segment equal to this literal is substituted.
pub const PREFIX_PLACEHOLDER: &str = "@prefix@";

/// File extension of native CPS package descriptions.
pub const CPS_EXTENSION: &str = "cps";

/// File extension of legacy pkg-config descriptions.
pub const PC_EXTENSION: &str = "pc";

/// Version reported when the root package does not declare one.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Environment variable holding explicit CPS search directories.
pub const ENV_CPS_PATH: &str = "CPS_PATH";

/// Environment variable holding installation prefixes to expand into search directories.
pub const ENV_CPS_PREFIX_PATH: &str = "CPS_PREFIX_PATH";

/// Environment variable holding explicit pkg-config search directories.
pub const ENV_PKG_CONFIG_PATH: &str = "PKG_CONFIG_PATH";

/// Environment variables that enable debug output when set to any value.
pub const ENV_DEBUG_SPEW: [&str; 2] = ["CPS_CONFIG_DEBUG_SPEW", "PKG_CONFIG_DEBUG_SPEW"];

/// Directory below `lib` or `share` that holds CPS files.
pub const CPS_DIR: &str = "cps";

/// Directory below `lib` or `share` that holds pkg-config files.
pub const PC_DIR: &str = "pkgconfig";
