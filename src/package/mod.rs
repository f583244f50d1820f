//! The package data model.
//!
//! A [`Package`] is one parsed package description: a named set of
//! [`Component`]s, the dependencies the package needs ([`Requirement`]s keyed
//! by dependency name), version information and the installation prefix that
//! `@prefix@` placeholders resolve against.
//!
//! Values of these types carry no behavior beyond simple queries; they are
//! produced by the loaders in [`crate::loader`] and consumed by the resolver.
//! Loaders guarantee the invariants documented on each type.

pub mod reference;

pub use reference::DependencyRef;

use crate::version::Schema;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Programming languages that per-language settings can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Language {
    /// C
    #[serde(rename = "c")]
    C,
    /// C++
    #[serde(rename = "c++")]
    Cxx,
    /// Fortran
    #[serde(rename = "fortran")]
    Fortran,
}

impl Language {
    /// Every known language, in a fixed order.
    pub const ALL: [Self; 3] = [Self::C, Self::Cxx, Self::Fortran];

    /// The key used for this language in package descriptions.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::C => "c",
            Self::Cxx => "c++",
            Self::Fortran => "fortran",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "c" => Ok(Self::C),
            "c++" | "cxx" | "cpp" => Ok(Self::Cxx),
            "fortran" => Ok(Self::Fortran),
            other => Err(format!("unknown language `{other}`")),
        }
    }
}

/// Per-language string lists (compile flags, include directories).
pub type LangValues = BTreeMap<Language, Vec<String>>;

/// Per-language preprocessor definitions.
pub type LangDefines = BTreeMap<Language, Vec<Define>>;

/// A preprocessor symbol to define or undefine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Define {
    /// Symbol name
    pub name: String,
    /// Value; `None` for a plain define
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Whether the symbol should be undefined instead
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub undefine: bool,
}

impl Define {
    /// A plain define (`-DNAME`).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            undefine: false,
        }
    }

    /// A define with a value (`-DNAME=VALUE`).
    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            undefine: false,
        }
    }

    /// An undefine (`-UNAME`).
    pub fn undefine(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            undefine: true,
        }
    }

    /// Parse the description syntax: `NAME`, `NAME=VALUE` or `!NAME`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if let Some(name) = raw.strip_prefix('!') {
            return Self::undefine(name);
        }
        match raw.split_once('=') {
            Some((name, value)) => Self::with_value(name, value),
            None => Self::new(raw),
        }
    }
}

/// What kind of artifact a component describes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    /// An executable program
    Executable,
    /// A static library
    Archive,
    /// A shared library
    Dylib,
    /// A loadable module
    Module,
    /// A Java archive
    Jar,
    /// Headers and flags only; has no location
    #[default]
    Interface,
    /// A named grouping of other components
    Symbolic,
    /// A kind this tool does not recognize; carries the original name
    Unknown(String),
}

impl ComponentKind {
    /// Whether the kind is one the CPS schema defines.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl From<&str> for ComponentKind {
    fn from(s: &str) -> Self {
        match s {
            "executable" => Self::Executable,
            "archive" => Self::Archive,
            "dylib" => Self::Dylib,
            "module" => Self::Module,
            "jar" => Self::Jar,
            "interface" => Self::Interface,
            "symbolic" => Self::Symbolic,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Executable => "executable",
            Self::Archive => "archive",
            Self::Dylib => "dylib",
            Self::Module => "module",
            Self::Jar => "jar",
            Self::Interface => "interface",
            Self::Symbolic => "symbolic",
            Self::Unknown(name) => name,
        };
        f.write_str(name)
    }
}

/// One buildable or usable unit inside a package.
///
/// Invariant (enforced by the CPS loader): components that are not
/// [`ComponentKind::Interface`] have a `location`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Component {
    /// Artifact kind
    pub kind: ComponentKind,
    /// Compiler flags per language
    pub compile_flags: LangValues,
    /// Include directories per language; may contain `@prefix@`
    pub includes: LangValues,
    /// Preprocessor definitions per language
    pub definitions: LangDefines,
    /// Extra linker flags
    pub link_flags: Vec<String>,
    /// Libraries to link by name (`-l`)
    pub link_libraries: Vec<String>,
    /// Components needed only at link time
    pub link_requires: Vec<String>,
    /// Artifact path; may contain `@prefix@`
    pub location: Option<String>,
    /// Path to link against when it differs from `location`
    pub link_location: Option<String>,
    /// Components this component needs, here or in dependencies
    pub requires: Vec<DependencyRef>,
}

impl Component {
    /// An empty component of the given kind.
    #[must_use]
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }
}

/// Constraints on one named dependency of a package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirement {
    /// Components the dependency must provide
    pub components: Vec<String>,
    /// Minimum acceptable version
    pub version: Option<String>,
}

impl Requirement {
    /// A requirement on specific components with no version constraint.
    #[must_use]
    pub fn components(components: Vec<String>) -> Self {
        Self {
            components,
            version: None,
        }
    }
}

/// One parsed package description.
///
/// Invariants (enforced by the loaders): `name` is non-empty, `cps_version`
/// is the supported version, and `components` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Package name
    pub name: String,
    /// Schema version of the description
    pub cps_version: String,
    /// Components by name
    pub components: BTreeMap<String, Component>,
    /// Oldest version this package is backward-compatible with
    pub compat_version: Option<String>,
    /// Package version
    pub version: Option<String>,
    /// How `version` and `compat_version` compare
    pub version_schema: Schema,
    /// Components used when a consumer does not name any
    pub default_components: Option<Vec<String>>,
    /// Dependencies by name
    pub requires: BTreeMap<String, Requirement>,
    /// Installation root that `@prefix@` resolves to
    pub prefix: PathBuf,
    /// Where the description was loaded from
    pub source: PathBuf,
}

impl Package {
    /// The version compared against requirements: `compat_version` when the
    /// package declares one, otherwise `version`.
    #[must_use]
    pub fn effective_version(&self) -> Option<&str> {
        self.compat_version.as_deref().or(self.version.as_deref())
    }

    /// The names from `wanted` that this package does not define, in order.
    #[must_use]
    pub fn missing_components<'a>(&self, wanted: &'a [String]) -> Vec<&'a str> {
        wanted
            .iter()
            .filter(|name| !self.components.contains_key(name.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// The default components, or an empty slice when none are declared.
    #[must_use]
    pub fn defaults(&self) -> &[String] {
        self.default_components.as_deref().unwrap_or_default()
    }
}
