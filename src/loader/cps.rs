//! The native CPS JSON loader.
//!
//! Descriptions are parsed into a [`serde_json::Value`] first and then walked
//! field by field, so that every schema violation can name the field and the
//! object it belongs to (`Required field `name` in `package` is missing`).
//!
//! Accepted shapes:
//!
//! ```json
//! {
//!   "name": "fmt",
//!   "cps_version": "0.10.0",
//!   "version": "10.2.1",
//!   "default_components": ["fmt"],
//!   "requires": { "zlib": { "components": ["z"], "version": "1.2" } },
//!   "components": {
//!     "fmt": {
//!       "type": "archive",
//!       "location": "@prefix@/lib/libfmt.a",
//!       "includes": { "c": ["@prefix@/include"], "*": ["@prefix@/include/fmt"] },
//!       "definitions": ["FMT_STATIC", "FMT_LEVEL=2", "!FMT_DEBUG"],
//!       "requires": [":fmt-core", "zlib:z"]
//!     }
//!   }
//! }
//! ```
//!
//! Per-language values are an array (applies to every language) or an object
//! keyed by language, where `*` applies to each language not listed
//! explicitly. Components of a kind this tool does not know are dropped.

use super::{PackageLoader, prefix};
use crate::constants::CPS_VERSION;
use crate::core::{CpsError, Result};
use crate::package::{
    Component, ComponentKind, Define, DependencyRef, LangDefines, LangValues, Language, Package,
    Requirement,
};
use crate::version::Schema;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const WILDCARD_LANGUAGE: &str = "*";

/// Loader for `.cps` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpsLoader;

impl PackageLoader for CpsLoader {
    fn load(&self, text: &str, source: &Path) -> Result<Package> {
        let file = source.display().to_string();
        let root: Value = serde_json::from_str(text).map_err(|e| CpsError::JsonError {
            file: file.clone(),
            reason: e.to_string(),
        })?;
        let Some(root) = root.as_object() else {
            return Err(CpsError::schema(file, "the top level is not an object"));
        };
        let fields = Fields::new(root, "package", &file);

        let name = fields.required_str("name")?;
        if name.is_empty() {
            return Err(CpsError::schema(&file, "`name` must not be empty"));
        }

        let cps_version = fields.required_str("cps_version")?;
        if cps_version != CPS_VERSION {
            return Err(CpsError::UnsupportedCpsVersion {
                file: file.clone(),
                found: cps_version.to_string(),
                supported: CPS_VERSION.to_string(),
            });
        }

        let components = load_components(&fields)?;

        let version_schema = match fields.optional_str("version_schema")? {
            Some(raw) => raw.parse::<Schema>().map_err(|reason| CpsError::schema(&file, reason))?,
            None => Schema::default(),
        };

        let explicit_prefix = fields.optional_str("prefix")?;
        let cps_path = fields.optional_str("cps_path")?;
        let prefix = match (explicit_prefix, cps_path) {
            (Some(_), Some(_)) => {
                return Err(CpsError::schema(
                    &file,
                    "`prefix` and `cps_path` are mutually exclusive",
                ));
            }
            (Some(explicit), None) => PathBuf::from(explicit),
            (None, cps_path) => prefix::calculate_prefix(cps_path, source)?,
        };

        Ok(Package {
            name: name.to_string(),
            cps_version: cps_version.to_string(),
            components,
            compat_version: fields.optional_str("compat_version")?.map(str::to_string),
            version: fields.optional_str("version")?.map(str::to_string),
            version_schema,
            default_components: fields.optional_str_list("default_components")?,
            requires: load_requires(&fields)?,
            prefix,
            source: source.to_path_buf(),
        })
    }
}

/// Typed accessors over one JSON object, carrying enough context to produce
/// precise schema errors.
struct Fields<'a> {
    object: &'a Map<String, Value>,
    parent: String,
    file: &'a str,
}

impl<'a> Fields<'a> {
    fn new(object: &'a Map<String, Value>, parent: &str, file: &'a str) -> Self {
        Self {
            object,
            parent: parent.to_string(),
            file,
        }
    }

    fn error(&self, reason: String) -> CpsError {
        CpsError::schema(self.file, reason)
    }

    fn wrong_type(&self, name: &str, expected: &str) -> CpsError {
        self.error(format!("Field `{name}` in `{}` is not {expected}", self.parent))
    }

    fn get(&self, name: &str) -> Option<&'a Value> {
        self.object.get(name)
    }

    fn required(&self, name: &str) -> Result<&'a Value> {
        self.get(name).ok_or_else(|| {
            self.error(format!("Required field `{name}` in `{}` is missing", self.parent))
        })
    }

    fn required_str(&self, name: &str) -> Result<&'a str> {
        self.required(name)?.as_str().ok_or_else(|| self.wrong_type(name, "a string"))
    }

    fn optional_str(&self, name: &str) -> Result<Option<&'a str>> {
        self.get(name)
            .map(|value| value.as_str().ok_or_else(|| self.wrong_type(name, "a string")))
            .transpose()
    }

    fn str_list(&self, name: &str, value: &'a Value) -> Result<Vec<String>> {
        let items = value.as_array().ok_or_else(|| self.wrong_type(name, "an array"))?;
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| self.wrong_type(name, "an array of strings"))
            })
            .collect()
    }

    fn optional_str_list(&self, name: &str) -> Result<Option<Vec<String>>> {
        self.get(name).map(|value| self.str_list(name, value)).transpose()
    }

    fn str_list_or_empty(&self, name: &str) -> Result<Vec<String>> {
        Ok(self.optional_str_list(name)?.unwrap_or_default())
    }

    /// The object stored in field `name`; errors it reports name the nested
    /// path (`components.fmt`).
    fn object(&self, name: &str, value: &'a Value) -> Result<Fields<'a>> {
        let object = value.as_object().ok_or_else(|| self.wrong_type(name, "an object"))?;
        let parent = if self.parent == "package" {
            name.to_string()
        } else {
            format!("{}.{name}", self.parent)
        };
        Ok(Fields {
            object,
            parent,
            file: self.file,
        })
    }

    /// A per-language field: either an array for every language or an object
    /// keyed by language with `*` as the fallback.
    fn lang_values(&self, name: &str) -> Result<LangValues> {
        let Some(value) = self.get(name) else {
            return Ok(LangValues::new());
        };

        if value.is_array() {
            let all = self.str_list(name, value)?;
            return Ok(Language::ALL.into_iter().map(|lang| (lang, all.clone())).collect());
        }

        let by_language = self.object(name, value).map_err(|_| {
            self.error(format!(
                "Field `{name}` in `{}` is neither an object nor an array",
                self.parent
            ))
        })?;

        let mut explicit = LangValues::new();
        let mut wildcard = None;
        for (key, values) in by_language.object {
            let values = self.str_list(&format!("{name}.{key}"), values)?;
            if key == WILDCARD_LANGUAGE {
                wildcard = Some(values);
                continue;
            }
            match key.parse::<Language>() {
                Ok(lang) => {
                    explicit.insert(lang, values);
                }
                Err(_) => tracing::debug!("{}: ignoring `{name}` for language `{key}`", self.file),
            }
        }

        if let Some(wildcard) = wildcard {
            for lang in Language::ALL {
                explicit.entry(lang).or_insert_with(|| wildcard.clone());
            }
        }
        Ok(explicit)
    }

    fn lang_defines(&self, name: &str) -> Result<LangDefines> {
        Ok(self
            .lang_values(name)?
            .into_iter()
            .map(|(lang, raw)| (lang, raw.iter().map(|d| Define::parse(d)).collect()))
            .collect())
    }
}

fn load_components(package: &Fields<'_>) -> Result<BTreeMap<String, Component>> {
    let value = package.required("components")?;
    let components = package.object("components", value)?;
    if components.object.is_empty() {
        return Err(package.error(
            "`components` of `package` is empty, but must have at least one component".to_string(),
        ));
    }

    let mut loaded = BTreeMap::new();
    for (name, value) in components.object {
        let fields = components.object(name, value)?;

        let kind = ComponentKind::from(fields.required_str("type")?);
        if !kind.is_known() {
            tracing::debug!("{}: dropping component `{name}` of unknown type `{kind}`", package.file);
            continue;
        }

        let location = fields.optional_str("location")?.map(str::to_string);
        if kind != ComponentKind::Interface && location.is_none() {
            return Err(fields.error(format!(
                "component `{name}` of type `{kind}` is missing required key `location`"
            )));
        }

        // Older descriptions spell the field `defines`
        let definitions = if fields.get("definitions").is_some() {
            fields.lang_defines("definitions")?
        } else {
            fields.lang_defines("defines")?
        };

        let component = Component {
            kind,
            compile_flags: fields.lang_values("compile_flags")?,
            includes: fields.lang_values("includes")?,
            definitions,
            link_flags: fields.str_list_or_empty("link_flags")?,
            link_libraries: fields.str_list_or_empty("link_libraries")?,
            link_requires: fields.str_list_or_empty("link_requires")?,
            location,
            link_location: fields.optional_str("link_location")?.map(str::to_string),
            requires: fields
                .str_list_or_empty("requires")?
                .iter()
                .map(|raw| DependencyRef::parse(raw))
                .collect(),
        };
        loaded.insert(name.clone(), component);
    }

    if loaded.is_empty() {
        return Err(package.error("`package` has no components of a known type".to_string()));
    }
    Ok(loaded)
}

fn load_requires(package: &Fields<'_>) -> Result<BTreeMap<String, Requirement>> {
    let Some(value) = package.get("requires") else {
        return Ok(BTreeMap::new());
    };
    let requires = package.object("requires", value)?;

    let mut loaded = BTreeMap::new();
    for (name, value) in requires.object {
        let fields = requires.object(name, value)?;
        loaded.insert(
            name.clone(),
            Requirement {
                components: fields.str_list_or_empty("components")?,
                version: fields.optional_str("version")?.map(str::to_string),
            },
        );
    }
    Ok(loaded)
}
