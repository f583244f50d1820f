//! Cross-platform utilities and helpers
//!
//! # Modules
//!
//! - [`platform`] - Installation layout (libdir, datadir, default prefixes)
//!
//! Path-list splitting for environment variables uses
//! [`std::env::split_paths`], so the platform path separator (`:` or `;`) is
//! honored everywhere.

pub mod platform;

pub use platform::{datadir, default_prefixes, is_windows, libdir};
