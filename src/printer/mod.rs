//! Rendering resolved flags for the command line.
//!
//! [`pkgconf`] produces pkg-config compatible output: a single line of
//! space separated flags, filtered by [`PrintOptions`]. [`json`] dumps the
//! whole [`ResolvedFlags`] value.

use crate::package::{Define, Language};
use crate::resolver::ResolvedFlags;
use std::path::Path;

/// Which parts of the resolved flags to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintOptions {
    /// Compiler flags other than includes and defines
    pub cflags: bool,
    /// `-I` include directories
    pub includes: bool,
    /// `-D` and `-U` definitions
    pub defines: bool,
    /// `-L` search directories
    pub libs_search: bool,
    /// Libraries and artifacts to link
    pub libs_link: bool,
    /// Remaining linker flags
    pub libs_other: bool,
    /// Print only the version
    pub mod_version: bool,
    /// Language whose per-language settings are printed
    pub language: Language,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            cflags: false,
            includes: false,
            defines: false,
            libs_search: false,
            libs_link: false,
            libs_other: false,
            mod_version: false,
            language: Language::C,
        }
    }
}

fn format_define(define: &Define) -> String {
    match (&define.value, define.undefine) {
        (_, true) => format!("-U{}", define.name),
        (Some(value), false) => format!("-D{}={value}", define.name),
        (None, false) => format!("-D{}", define.name),
    }
}

/// `-l<stem>` for `lib<stem>.<ext>`, else the path itself.
fn link_entry(location: &str) -> String {
    let path = Path::new(location);
    let stem = path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_prefix("lib"))
        .and_then(|name| name.split_once('.'))
        .map(|(stem, _)| stem)
        .filter(|stem| !stem.is_empty());
    match stem {
        Some(stem) => format!("-l{stem}"),
        None => location.to_string(),
    }
}

/// Render `flags` in pkg-config style.
///
/// With `mod_version` set only the version is printed. Otherwise the enabled
/// categories are emitted in this order: compile flags, includes, defines,
/// search directories, link entries, link libraries, other link flags.
///
/// # Examples
///
/// ```rust
/// use cps_config::package::Language;
/// use cps_config::printer::{PrintOptions, pkgconf};
/// use cps_config::resolver::ResolvedFlags;
///
/// let mut flags = ResolvedFlags::default();
/// flags.includes.insert(Language::C, vec!["/usr/include".into()]);
/// flags.link_location.push("/usr/lib/libfmt.a".into());
///
/// let options = PrintOptions {
///     includes: true,
///     libs_search: true,
///     libs_link: true,
///     ..PrintOptions::default()
/// };
/// assert_eq!(pkgconf(&flags, &options), "-I/usr/include -L/usr/lib -lfmt");
/// ```
#[must_use]
pub fn pkgconf(flags: &ResolvedFlags, options: &PrintOptions) -> String {
    if options.mod_version {
        return flags.version.clone();
    }

    let lang = options.language;
    let mut out: Vec<String> = Vec::new();

    if options.cflags {
        out.extend(flags.compile_flags.get(&lang).into_iter().flatten().cloned());
    }
    if options.includes {
        out.extend(flags.includes.get(&lang).into_iter().flatten().map(|dir| format!("-I{dir}")));
    }
    if options.defines {
        out.extend(flags.definitions.get(&lang).into_iter().flatten().map(format_define));
    }

    let (search_flags, other_flags): (Vec<&String>, Vec<&String>) =
        flags.link_flags.iter().partition(|flag| flag.starts_with("-L"));

    if options.libs_search {
        let mut dirs: Vec<String> = Vec::new();
        for location in &flags.link_location {
            if let Some(parent) = Path::new(location).parent().filter(|p| !p.as_os_str().is_empty()) {
                let dir = format!("-L{}", parent.display());
                if !dirs.contains(&dir) {
                    dirs.push(dir);
                }
            }
        }
        out.extend(dirs);
        out.extend(search_flags.into_iter().cloned());
    }
    if options.libs_link {
        out.extend(flags.link_location.iter().map(|location| link_entry(location)));
        out.extend(flags.link_libraries.iter().map(|lib| format!("-l{lib}")));
    }
    if options.libs_other {
        out.extend(other_flags.into_iter().cloned());
    }

    out.join(" ")
}

/// Render `flags` as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn json(flags: &ResolvedFlags) -> serde_json::Result<String> {
    serde_json::to_string_pretty(flags)
}
