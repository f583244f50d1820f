//! Component dependency references.
//!
//! Components list what they need as strings of three shapes:
//!
//! | Form             | Meaning                                        |
//! |------------------|------------------------------------------------|
//! | `name`           | the default components of dependency `name`    |
//! | `name:component` | one component of dependency `name`             |
//! | `:component`     | another component of the same package          |
//!
//! The empty string refers to the default components of the same package.

use std::fmt;

/// A parsed component requirement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyRef {
    /// Dependency name; empty for a reference into the same package
    pub package: String,
    /// Component name; `None` selects the default components
    pub component: Option<String>,
}

impl DependencyRef {
    /// Parse a reference string. Every string is a valid reference.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cps_config::package::DependencyRef;
    ///
    /// let dep = DependencyRef::parse("fmt:fmt-header-only");
    /// assert_eq!(dep.package, "fmt");
    /// assert_eq!(dep.component.as_deref(), Some("fmt-header-only"));
    ///
    /// assert!(DependencyRef::parse(":core").is_self());
    /// assert_eq!(DependencyRef::parse("zlib").component, None);
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((package, component)) => Self {
                package: package.to_string(),
                component: (!component.is_empty()).then(|| component.to_string()),
            },
            None => Self {
                package: raw.to_string(),
                component: None,
            },
        }
    }

    /// Whether this reference points into the package that declares it.
    #[must_use]
    pub fn is_self(&self) -> bool {
        self.package.is_empty()
    }
}

impl fmt::Display for DependencyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.component {
            Some(component) => write!(f, "{}:{component}", self.package),
            None => f.write_str(&self.package),
        }
    }
}
