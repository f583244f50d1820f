//! Version comparison under CPS version schemas.
//!
//! A CPS package names the scheme its version strings follow
//! (`version_schema`). Requirements are checked by comparing the candidate's
//! version against the requested minimum under that scheme.
//!
//! Only the `simple` scheme is implemented: dotted unsigned integers with an
//! optional `+` or `-` suffix that is itself a dotted integer list. Comparing
//! under any other scheme is an error rather than a guess.
//!
//! # Examples
//!
//! ```rust
//! use cps_config::version::{Operator, Schema, compare};
//!
//! # fn example() -> cps_config::core::Result<()> {
//! assert!(compare("1.2.0", Operator::Lt, "1.10", Schema::Simple)?);
//! assert!(compare("1+1", Operator::Gt, "1", Schema::Simple)?);
//! assert!(compare("3", Operator::Eq, "3.0.0", Schema::Simple)?);
//! assert!(compare("1.0", Operator::Eq, "1.0", Schema::Rpm).is_err());
//! # Ok(())
//! # }
//! ```

pub mod comparison;

use crate::core::{CpsError, Result};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// How the version strings of a package should be compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Schema {
    /// Dotted integers with an optional numeric suffix
    #[default]
    Simple,
    /// Package-specific; never comparable
    Custom,
    /// RPM version comparison
    Rpm,
    /// Debian version comparison
    Dpkg,
}

impl Schema {
    /// The name used for this schema in package descriptions.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Custom => "custom",
            Self::Rpm => "rpm",
            Self::Dpkg => "dpkg",
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Schema {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "simple" => Ok(Self::Simple),
            "custom" => Ok(Self::Custom),
            "rpm" => Ok(Self::Rpm),
            "dpkg" => Ok(Self::Dpkg),
            other => Err(format!("unknown version schema `{other}`")),
        }
    }
}

/// The relation to test between two versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl Operator {
    /// Whether two values ordered as `ordering` satisfy this operator.
    #[must_use]
    pub const fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::Lt => matches!(ordering, Ordering::Less),
            Self::Le => !matches!(ordering, Ordering::Greater),
            Self::Eq => matches!(ordering, Ordering::Equal),
            Self::Ne => !matches!(ordering, Ordering::Equal),
            Self::Gt => matches!(ordering, Ordering::Greater),
            Self::Ge => !matches!(ordering, Ordering::Less),
        }
    }

    /// The symbol of this operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Le),
            "=" | "==" => Ok(Self::Eq),
            "!=" => Ok(Self::Ne),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Ge),
            other => Err(format!("unknown version operator `{other}`")),
        }
    }
}

/// Compare two version strings using the given operator and schema.
///
/// Returns `Ok(true)` when `left op right` holds.
///
/// # Errors
///
/// - [`CpsError::UnsupportedVersionSchema`] for any schema other than
///   [`Schema::Simple`]
/// - [`CpsError::InvalidVersion`] when either string is malformed
pub fn compare(left: &str, op: Operator, right: &str, schema: Schema) -> Result<bool> {
    match schema {
        Schema::Simple => comparison::simple_compare(left, op, right),
        other => Err(CpsError::UnsupportedVersionSchema {
            schema: other.to_string(),
        }),
    }
}
