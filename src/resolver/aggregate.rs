//! Prefix substitution and flag aggregation.

use super::{Resolver, Selection};
use crate::constants::{PREFIX_PLACEHOLDER, UNKNOWN_VERSION};
use crate::core::{CpsError, Result};
use crate::package::{ComponentKind, LangDefines, LangValues};
use petgraph::graph::NodeIndex;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// The flags needed to compile and link against a resolved package.
///
/// Every list is accumulated in dependency order: entries of a package come
/// before those of the packages it depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedFlags {
    /// Version of the root package, or `unknown`
    pub version: String,
    /// Compiler flags per language
    pub compile_flags: LangValues,
    /// Include directories per language, with prefixes resolved
    pub includes: LangValues,
    /// Preprocessor definitions per language
    pub definitions: LangDefines,
    /// Extra linker flags
    pub link_flags: Vec<String>,
    /// Libraries linked by name
    pub link_libraries: Vec<String>,
    /// Artifacts to link, with prefixes resolved
    pub link_location: Vec<String>,
}

/// Replace a leading `@prefix@` path segment with `prefix`.
///
/// Strings that do not start with the placeholder segment are returned
/// unchanged.
///
/// # Examples
///
/// ```rust
/// use cps_config::resolver::substitute_prefix;
/// use std::path::Path;
///
/// let prefix = Path::new("/usr");
/// assert_eq!(substitute_prefix("@prefix@/lib/libfmt.a", prefix), "/usr/lib/libfmt.a");
/// assert_eq!(substitute_prefix("/opt/@prefix@/lib", prefix), "/opt/@prefix@/lib");
/// assert_eq!(substitute_prefix("@prefix@x/lib", prefix), "@prefix@x/lib");
/// ```
#[must_use]
pub fn substitute_prefix(value: &str, prefix: &Path) -> String {
    let mut segments = value.split('/');
    if segments.next() != Some(PREFIX_PLACEHOLDER) {
        return value.to_string();
    }

    let mut path = prefix.to_path_buf();
    for segment in segments.filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path.display().to_string()
}

fn merge(target: &mut LangValues, source: &LangValues, map: impl Fn(&str) -> String) {
    for (lang, values) in source {
        target.entry(*lang).or_default().extend(values.iter().map(|v| map(v)));
    }
}

/// Merge the flags of every selected component, visiting packages in
/// `order`.
///
/// Include directories, locations and link locations have `@prefix@`
/// resolved against `prefix_override` or, without one, the prefix of the
/// package they come from.
///
/// # Errors
///
/// Returns [`CpsError::MissingLocation`] for a selected component that needs
/// an artifact but names none.
///
/// # Panics
///
/// Panics if a selected component is not defined by its package; propagation
/// never selects such a component.
pub fn aggregate(
    resolver: &Resolver,
    selection: &Selection,
    order: &[NodeIndex],
    prefix_override: Option<&Path>,
) -> Result<ResolvedFlags> {
    let mut flags = ResolvedFlags {
        version: order
            .first()
            .and_then(|root| resolver.package(*root).version.clone())
            .unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
        ..ResolvedFlags::default()
    };

    for &node in order {
        let package = resolver.package(node);
        let prefix: PathBuf = prefix_override.map_or_else(|| package.prefix.clone(), Path::to_path_buf);
        let resolve = |value: &str| substitute_prefix(value, &prefix);

        for name in selection.components(node) {
            let component = package.components.get(name).unwrap_or_else(|| {
                panic!("selected component `{name}` is not defined by `{}`", package.name)
            });
            tracing::trace!("Merging flags of {}:{name}", package.name);

            merge(&mut flags.includes, &component.includes, resolve);
            merge(&mut flags.compile_flags, &component.compile_flags, str::to_string);
            for (lang, defines) in &component.definitions {
                flags.definitions.entry(*lang).or_default().extend(defines.iter().cloned());
            }
            flags.link_libraries.extend(component.link_libraries.iter().cloned());
            flags.link_flags.extend(component.link_flags.iter().cloned());

            if component.kind == ComponentKind::Interface {
                continue;
            }
            let artifact = component.link_location.as_ref().or(component.location.as_ref());
            match artifact {
                Some(artifact) => flags.link_location.push(resolve(artifact.as_str())),
                None => {
                    return Err(CpsError::MissingLocation {
                        package: package.name.clone(),
                        component: name.clone(),
                    });
                }
            }
        }
    }

    Ok(flags)
}
