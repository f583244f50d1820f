//! The legacy pkg-config (`.pc`) loader.
//!
//! A `.pc` file is a list of variable definitions (`prefix=/usr`) and
//! properties (`Cflags: -I${prefix}/include`). Variables may reference earlier
//! variables with `${name}`. The translated [`Package`] has a single interface
//! component named after the package, which is also its default component:
//!
//! - `Cflags`: `-I` becomes an include directory, `-D`/`-U` a definition and
//!   anything else a compile flag, for every language
//! - `Libs`: `-l` becomes a link library, anything else a link flag
//! - `Version`: the package version under the `simple` schema
//! - `Requires`: each entry becomes both a package requirement (a `>=` or `=`
//!   constraint sets the minimum version) and a reference to the
//!   dependency's default components
//!
//! The package takes its name from the file (`zlib.pc` describes `zlib`), so
//! it matches the name it was requested under. The `Name` property is
//! required but only descriptive.

use super::{PackageLoader, prefix};
use crate::constants::{CPS_VERSION, PREFIX_PLACEHOLDER};
use crate::core::{CpsError, Result};
use crate::package::{
    Component, ComponentKind, Define, DependencyRef, LangDefines, LangValues, Language, Package,
    Requirement,
};
use crate::version::{Operator, Schema};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<key>[A-Za-z0-9_.]+)\s*(?P<sep>[=:])\s*(?P<value>.*?)\s*$")
        .expect("pkg-config line pattern is valid")
});

static VARIABLE_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(?P<name>[^}]*)\}").expect("variable pattern is valid"));

/// A comparison operator or a bare word (name or version) in a `Requires` list.
static REQUIRES_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<op>[<>=!]=?)|(?P<word>[^\s,<>=!]+)").expect("requires pattern is valid")
});

/// Loader for `.pc` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct PkgConfigLoader;

/// The raw contents of a `.pc` file after variable expansion.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PcFile {
    /// Variables, in definition order
    pub variables: Vec<(String, String)>,
    /// Properties by key
    pub properties: BTreeMap<String, String>,
}

impl PcFile {
    /// Parse the text of a `.pc` file.
    ///
    /// # Errors
    ///
    /// Returns [`CpsError::SchemaError`] for lines that are neither a variable
    /// nor a property, and for references to undefined variables.
    pub fn parse(text: &str, file: &str) -> Result<Self> {
        let mut parsed = Self::default();
        for (index, raw_line) in text.lines().enumerate() {
            let line = raw_line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }

            let captures = LINE.captures(line).ok_or_else(|| {
                CpsError::schema(file, format!("line {} is not a variable or property", index + 1))
            })?;
            let key = captures["key"].to_string();
            let value = parsed.expand(&captures["value"], file)?;

            if &captures["sep"] == "=" {
                parsed.variables.push((key, value));
            } else {
                parsed.properties.insert(key, value);
            }
        }
        Ok(parsed)
    }

    /// Look up a variable.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.iter().rev().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    fn expand(&self, value: &str, file: &str) -> Result<String> {
        let mut undefined = None;
        let expanded = VARIABLE_REF.replace_all(value, |caps: &Captures<'_>| {
            let name = &caps["name"];
            self.variable(name).map(str::to_string).unwrap_or_else(|| {
                undefined.get_or_insert_with(|| name.to_string());
                String::new()
            })
        });

        match undefined {
            Some(name) => Err(CpsError::schema(file, format!("variable `{name}` is not defined"))),
            None => Ok(expanded.into_owned()),
        }
    }
}

/// One entry of a `Requires` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcRequirement {
    /// Package name
    pub name: String,
    /// Optional version constraint
    pub constraint: Option<(Operator, String)>,
}

/// Parse a `Requires` value: names separated by commas or whitespace, each
/// optionally followed by an operator and a version. The operator may be
/// written flush against its neighbours (`glib-2.0>=2.50`).
///
/// # Errors
///
/// Returns [`CpsError::SchemaError`] when an operator is not recognized or
/// has no version after it.
pub fn parse_requires(raw: &str, file: &str) -> Result<Vec<PcRequirement>> {
    let mut tokens = REQUIRES_TOKEN.captures_iter(raw).peekable();

    let mut requirements = Vec::new();
    while let Some(token) = tokens.next() {
        let name = match (token.name("word"), token.name("op")) {
            (Some(word), _) => word.as_str().to_string(),
            (None, Some(op)) => {
                return Err(CpsError::schema(
                    file,
                    format!("requirement operator `{}` has no package name", op.as_str()),
                ));
            }
            (None, None) => continue,
        };

        let constraint = match tokens.next_if(|next| next.name("op").is_some()) {
            Some(op) => {
                let op = &op["op"];
                let op: Operator = op.parse().map_err(|_| {
                    CpsError::schema(file, format!("requirement `{name}` has unknown operator `{op}`"))
                })?;
                let version = tokens
                    .next_if(|next| next.name("word").is_some())
                    .map(|next| next["word"].to_string())
                    .ok_or_else(|| {
                        CpsError::schema(file, format!("requirement `{name} {op}` has no version"))
                    })?;
                Some((op, version))
            }
            None => None,
        };
        requirements.push(PcRequirement {
            name,
            constraint,
        });
    }
    Ok(requirements)
}

#[derive(Default)]
struct CompileFlags {
    flags: Vec<String>,
    includes: Vec<String>,
    definitions: Vec<Define>,
}

fn split_cflags(raw: &str) -> CompileFlags {
    let mut split = CompileFlags::default();
    for flag in raw.split_whitespace() {
        if let Some(dir) = flag.strip_prefix("-I") {
            split.includes.push(dir.to_string());
        } else if let Some(define) = flag.strip_prefix("-D") {
            split.definitions.push(Define::parse(define.trim_start_matches('!')));
        } else if let Some(name) = flag.strip_prefix("-U") {
            split.definitions.push(Define::undefine(name));
        } else {
            split.flags.push(flag.to_string());
        }
    }
    split
}

fn every_language<T: Clone>(values: Vec<T>) -> BTreeMap<Language, Vec<T>> {
    if values.is_empty() {
        return BTreeMap::new();
    }
    Language::ALL.into_iter().map(|lang| (lang, values.clone())).collect()
}

impl PackageLoader for PkgConfigLoader {
    fn load(&self, text: &str, source: &Path) -> Result<Package> {
        let file = source.display().to_string();
        let pc = PcFile::parse(text, &file)?;

        let display_name = pc
            .properties
            .get("Name")
            .ok_or_else(|| CpsError::schema(&file, "Required property `Name` is missing"))?;
        let name = source
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .unwrap_or(display_name.as_str())
            .to_string();

        let cflags = split_cflags(pc.properties.get("Cflags").map_or("", String::as_str));
        let compile_flags: LangValues = every_language(cflags.flags);
        let includes: LangValues = every_language(cflags.includes);
        let definitions: LangDefines = every_language(cflags.definitions);

        let mut link_flags = Vec::new();
        let mut link_libraries = Vec::new();
        for flag in pc.properties.get("Libs").map_or("", String::as_str).split_whitespace() {
            match flag.strip_prefix("-l") {
                Some(library) => link_libraries.push(library.to_string()),
                None => link_flags.push(flag.to_string()),
            }
        }

        let mut requires = BTreeMap::new();
        let mut references = Vec::new();
        for requirement in parse_requires(pc.properties.get("Requires").map_or("", String::as_str), &file)? {
            let version = match requirement.constraint {
                Some((Operator::Ge | Operator::Eq, version)) => Some(version),
                Some((op, version)) => {
                    tracing::debug!(
                        "{file}: ignoring constraint `{} {op} {version}`; only minimum versions are supported",
                        requirement.name
                    );
                    None
                }
                None => None,
            };
            references.push(DependencyRef {
                package: requirement.name.clone(),
                component: None,
            });
            requires.insert(
                requirement.name,
                Requirement {
                    components: Vec::new(),
                    version,
                },
            );
        }

        let component = Component {
            kind: ComponentKind::Interface,
            compile_flags,
            includes,
            definitions,
            link_flags,
            link_libraries,
            link_requires: Vec::new(),
            location: Some(format!("{PREFIX_PLACEHOLDER}/lib/{name}.a")),
            link_location: None,
            requires: references,
        };

        let prefix = match pc.variable("prefix") {
            Some(prefix) => PathBuf::from(prefix),
            None => prefix::prefix_from_location(source.parent().unwrap_or_else(|| Path::new(""))),
        };

        Ok(Package {
            cps_version: CPS_VERSION.to_string(),
            components: BTreeMap::from([(name.clone(), component)]),
            compat_version: None,
            version: pc.properties.get("Version").cloned(),
            version_schema: Schema::Simple,
            default_components: Some(vec![name.clone()]),
            requires,
            prefix,
            source: source.to_path_buf(),
            name,
        })
    }
}
