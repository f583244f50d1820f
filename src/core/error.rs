//! Error handling for cps-config
//!
//! This module provides the error type shared by every stage of package
//! resolution and the user-facing wrapper the CLI uses to present failures.
//! The error system follows two principles:
//! 1. **Strongly-typed errors** so callers (and tests) can tell a missing file
//!    from a too-old version from a malformed description
//! 2. **Complete failure reports**: every layer that retries (candidate files,
//!    transitive dependencies) keeps the inner failures instead of discarding
//!    them, so the final message names every path tried and why it failed
//!
//! # Error Categories
//!
//! - **Schema**: [`CpsError::JsonError`], [`CpsError::SchemaError`],
//!   [`CpsError::UnsupportedCpsVersion`]
//! - **Not found**: [`CpsError::PackageNotFound`]
//! - **Constraint**: [`CpsError::VersionTooOld`], [`CpsError::NoVersion`],
//!   [`CpsError::MissingComponents`], [`CpsError::InvalidVersion`],
//!   [`CpsError::UnsupportedVersionSchema`]
//! - **Resolution**: [`CpsError::ResolutionFailed`], which nests the errors of
//!   every candidate that was tried
//! - **Aggregation**: [`CpsError::MissingLocation`]
//!
//! Broken graph invariants (a selected component that disappeared between
//! propagation and aggregation) are not represented here: they are bugs in
//! cps-config itself and abort with a panic.
//!
//! # Examples
//!
//! ```rust,no_run
//! use cps_config::core::{CpsError, ErrorKind, user_friendly_error};
//!
//! let error = CpsError::PackageNotFound {
//!     name: "fmt".to_string(),
//!     searched: vec![],
//! };
//! assert_eq!(error.kind(), ErrorKind::NotFound);
//!
//! let context = user_friendly_error(anyhow::Error::from(error));
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for cps-config operations.
#[derive(Error, Debug)]
pub enum CpsError {
    /// The file is not syntactically valid JSON.
    #[error("Failed to parse JSON in `{file}`: {reason}")]
    JsonError {
        /// File identity of the description
        file: String,
        /// Parser message
        reason: String,
    },

    /// The description is valid JSON (or pkg-config syntax) but violates the
    /// package schema: a required field is missing, a field has the wrong
    /// type, or the components are degenerate.
    #[error("Invalid package description `{file}`: {reason}")]
    SchemaError {
        /// File identity of the description
        file: String,
        /// What is wrong with it
        reason: String,
    },

    /// The description declares a `cps_version` this tool does not understand.
    #[error("cps-config only supports CPS version `{supported}`, found `{found}` in `{file}`")]
    UnsupportedCpsVersion {
        /// File identity of the description
        file: String,
        /// The declared version
        found: String,
        /// The single supported version
        supported: String,
    },

    /// No candidate file exists for a requested package anywhere on the
    /// search path.
    #[error("Could not find a CPS file for `{name}`")]
    PackageNotFound {
        /// The requested package name
        name: String,
        /// Every directory that was probed, in order
        searched: Vec<PathBuf>,
    },

    /// A version string could not be parsed under its schema.
    #[error("Invalid version `{version}`: {reason}")]
    InvalidVersion {
        /// The offending version string
        version: String,
        /// Why it was rejected
        reason: String,
    },

    /// Versions were compared under a schema that has no implementation.
    #[error("The `{schema}` version schema is not implemented")]
    UnsupportedVersionSchema {
        /// Name of the schema
        schema: String,
    },

    /// A candidate's version is older than a requirement's minimum.
    #[error(
        "`{file}` has a version of {found}{}, which is less than the required {required}, using the schema {schema}",
        .compat_version.as_ref().map(|compat| format!(" (compatible back to {compat})")).unwrap_or_default()
    )]
    VersionTooOld {
        /// File identity of the candidate
        file: String,
        /// The candidate's own version
        found: String,
        /// The oldest version the candidate declares compatibility with, when
        /// that is what failed the comparison
        compat_version: Option<String>,
        /// The required minimum version
        required: String,
        /// The candidate's version schema
        schema: String,
    },

    /// A requirement names a minimum version but the candidate declares none.
    #[error("`{file}` does not specify a version, but version {required} is required")]
    NoVersion {
        /// File identity of the candidate
        file: String,
        /// The required minimum version
        required: String,
    },

    /// A package does not define components that were asked of it.
    #[error("`{package}` does not implement the required component(s) '{}'", .components.join(", "))]
    MissingComponents {
        /// Package name or file identity
        package: String,
        /// The components that are missing
        components: Vec<String>,
    },

    /// Every candidate for a package failed. The causes are kept in candidate
    /// order and may themselves be nested resolution failures.
    #[error("{name}:{}", format_causes(.causes))]
    ResolutionFailed {
        /// The requested package name
        name: String,
        /// One failure per attempted candidate
        causes: Vec<CpsError>,
    },

    /// A non-interface component reached aggregation without a location.
    #[error("Component `{component}` of `{package}` requires a 'location' attribute")]
    MissingLocation {
        /// Package name
        package: String,
        /// Component name
        component: String,
    },

    /// A candidate file exists but could not be read.
    #[error("Failed to read `{file}`: {source}")]
    ReadError {
        /// Path of the file
        file: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

/// Coarse classification of [`CpsError`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Structurally invalid descriptions
    Schema,
    /// No candidate file found
    NotFound,
    /// A version or component constraint was not met
    Constraint,
    /// A dependency could not be satisfied by any candidate
    Resolution,
    /// Filesystem failures
    Io,
}

impl CpsError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::JsonError {
                ..
            }
            | Self::SchemaError {
                ..
            }
            | Self::UnsupportedCpsVersion {
                ..
            }
            | Self::MissingLocation {
                ..
            } => ErrorKind::Schema,
            Self::PackageNotFound {
                ..
            } => ErrorKind::NotFound,
            Self::InvalidVersion {
                ..
            }
            | Self::UnsupportedVersionSchema {
                ..
            }
            | Self::VersionTooOld {
                ..
            }
            | Self::NoVersion {
                ..
            }
            | Self::MissingComponents {
                ..
            } => ErrorKind::Constraint,
            Self::ResolutionFailed {
                ..
            } => ErrorKind::Resolution,
            Self::ReadError {
                ..
            } => ErrorKind::Io,
        }
    }

    /// The innermost errors beneath any nesting of
    /// [`CpsError::ResolutionFailed`], in depth-first order.
    ///
    /// A failure that is not a resolution failure is its own root cause.
    #[must_use]
    pub fn root_causes(&self) -> Vec<&CpsError> {
        match self {
            Self::ResolutionFailed {
                causes,
                ..
            } => causes.iter().flat_map(CpsError::root_causes).collect(),
            other => vec![other],
        }
    }

    /// Shorthand for building a [`CpsError::SchemaError`].
    pub fn schema(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SchemaError {
            file: file.into(),
            reason: reason.into(),
        }
    }
}

fn format_causes(causes: &[CpsError]) -> String {
    causes
        .iter()
        .map(|cause| format!("\n  {}", cause.to_string().replace('\n', "\n  ")))
        .collect()
}

/// Error context wrapper that provides user-friendly error information
///
/// `ErrorContext` wraps an error message and adds optional details and a
/// suggestion for resolution. This is the primary way cps-config presents
/// errors to CLI users.
///
/// # Examples
///
/// ```rust,no_run
/// use cps_config::core::{CpsError, ErrorContext};
///
/// let context = ErrorContext::new(CpsError::PackageNotFound {
///     name: "zlib".to_string(),
///     searched: vec![],
/// })
/// .with_suggestion("Set CPS_PATH to the directory containing zlib.cps");
///
/// println!("{}", context);
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: anyhow::Error,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    pub fn new(error: impl Into<anyhow::Error>) -> Self {
        Self {
            error: error.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Render the context with terminal colors, one section per line.
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    #[must_use]
    pub fn render_colored(&self) -> String {
        let mut out = format!("{}: {:#}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            out.push_str(&format!("\n{}: {}", "details".yellow(), details));
        }

        if let Some(suggestion) = &self.suggestion {
            out.push_str(&format!("\n{}: {}", "suggestion".green(), suggestion));
        }

        out
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}", self.render_colored());
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

/// Convert any error into an [`ErrorContext`] with suggestions tailored to
/// the failure.
///
/// [`CpsError`] values are recognized even when they are wrapped in
/// [`anyhow::Context`]; the context chain is preserved in the message.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let (suggestion, details) = match error.downcast_ref::<CpsError>() {
        Some(cps_error) => advice_for(cps_error),
        None => match error.downcast_ref::<std::io::Error>() {
            Some(io_error) if io_error.kind() == std::io::ErrorKind::PermissionDenied => (
                Some("Check the permissions of the package description files".to_string()),
                None,
            ),
            _ => (None, None),
        },
    };

    let mut context = ErrorContext::new(error);
    context.suggestion = suggestion;
    context.details = details;
    context
}

fn advice_for(error: &CpsError) -> (Option<String>, Option<String>) {
    match error {
        CpsError::PackageNotFound {
            name,
            searched,
        } => {
            let details = if searched.is_empty() {
                None
            } else {
                Some(format!(
                    "Searched: {}",
                    searched.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
                ))
            };
            (
                Some(format!(
                    "Add the directory containing {name}.cps to CPS_PATH, or its installation prefix to CPS_PREFIX_PATH"
                )),
                details,
            )
        }
        CpsError::JsonError {
            ..
        }
        | CpsError::SchemaError {
            ..
        } => (
            Some("Fix the package description; it does not follow the CPS schema".to_string()),
            None,
        ),
        CpsError::UnsupportedCpsVersion {
            supported,
            ..
        } => (Some(format!("Regenerate the description for CPS version {supported}")), None),
        CpsError::UnsupportedVersionSchema {
            ..
        } => (
            None,
            Some("Only the `simple` version schema can be compared at the moment".to_string()),
        ),
        CpsError::ResolutionFailed {
            ..
        } => {
            let leaves = error.root_causes();
            match leaves.first() {
                Some(first) if leaves.len() == 1 => advice_for(first),
                _ => (
                    None,
                    Some("Each candidate file that was tried is listed with its failure".to_string()),
                ),
            }
        }
        CpsError::VersionTooOld {
            ..
        }
        | CpsError::NoVersion {
            ..
        } => (Some("Install a newer version of the dependency".to_string()), None),
        _ => (None, None),
    }
}
