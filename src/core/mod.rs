//! Core types for cps-config
//!
//! ## `error` - Error Handling
//!
//! - [`CpsError`] - Enumerated error types covering every resolution failure mode
//! - [`ErrorKind`] - Coarse classification (schema, not found, constraint, resolution)
//! - [`ErrorContext`] - User-friendly error wrapper with suggestions and details
//! - [`user_friendly_error`] - Convert any error to user-friendly format
//!
//! Library functions return [`Result`], an alias over [`CpsError`]. The CLI
//! layer works with [`anyhow::Result`] and converts at the boundary.

pub mod error;

pub use error::{CpsError, ErrorContext, ErrorKind, user_friendly_error};

/// Result alias used by every fallible library operation.
pub type Result<T> = std::result::Result<T, CpsError>;
