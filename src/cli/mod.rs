//! Command-line interface for cps-config.
//!
//! The interface follows pkg-config: flag-selection options choose what to
//! print and the positional arguments name the packages to resolve.
//!
//! ```bash
//! cps-config --cflags fmt            # compiler flags, defines and includes
//! cps-config --libs zlib fmt         # linker flags for two packages
//! cps-config --component core foo    # only the `core` component of foo
//! cps-config --format json fmt       # the full resolved result
//! ```
//!
//! Each package is resolved in a run of its own, so results never share
//! state. Errors are silent unless `--print-errors` is given or debug
//! output is enabled; the exit code always reflects failure.


use crate::config::Environment;
use crate::core::{ErrorContext, user_friendly_error};
use crate::find_package;
use crate::package::Language;
use crate::printer::{self, PrintOptions};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

const FOOTER: &str = "\
Examples:

   Getting include directory flags for a set of dependencies.
      $ cps-config --cflags-only-I fmt
      -I/usr/include

   Getting link directory flags for a set of dependencies.
      $ cps-config --libs-only-L fmt
      -L/usr/lib

Support:

    Please report bugs to <https://github.com/cps-org/cps-config/issues>.";

/// Output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// pkg-config compatible flags
    #[default]
    Pkgconf,
    /// The full resolved result as JSON
    Json,
}

/// Settings derived from the command line that affect the whole process
/// rather than a single package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Log filter for the tracing subscriber; `None` defers to `RUST_LOG`
    pub log_level: Option<String>,
    /// Whether resolution errors are printed
    pub print_errors: bool,
    /// Whether errors go to stdout instead of stderr
    pub errors_to_stdout: bool,
}

#[derive(Parser, Debug)]
#[command(
    name = "cps-config",
    about = "cps-config is a utility for querying and using installed libraries.",
    version,
    after_help = FOOTER
)]
pub struct Cli {
    /// Output all pre-processor and compiler flags
    #[arg(long)]
    cflags: bool,

    /// Output -I flags
    #[arg(long = "cflags-only-I")]
    cflags_only_i: bool,

    /// Output cflags not covered by --cflags-only-I
    #[arg(long)]
    cflags_only_other: bool,

    /// Output all linker flags
    #[arg(long)]
    libs: bool,

    /// Print required LDPATH linker flags
    #[arg(long = "libs-only-L")]
    libs_only_search: bool,

    /// Print required LIBNAME linker flags
    #[arg(long = "libs-only-l")]
    libs_only_link: bool,

    /// Print required other linker flags
    #[arg(long)]
    libs_only_other: bool,

    /// Print the version of each package
    #[arg(long)]
    modversion: bool,

    /// Look for the specified component; repeatable. Without any, the
    /// default components are used
    #[arg(long = "component", value_name = "NAME")]
    components: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Pkgconf)]
    format: Format,

    /// Language whose flags are printed (c, c++, fortran)
    #[arg(long, default_value = "c")]
    language: Language,

    /// Print a message when an error is encountered
    #[arg(long)]
    print_errors: bool,

    /// Print errors to stdout instead of stderr
    #[arg(long)]
    errors_to_stdout: bool,

    /// Value of @prefix@, instead of inferring it from where the package
    /// file was found
    #[arg(long, value_name = "PATH")]
    prefix_variable: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(long)]
    debug: bool,

    /// Packages to search for
    #[arg(required = true, value_name = "PACKAGES")]
    packages: Vec<String>,
}

/// The result of one invocation, ready to be written out.
#[derive(Debug, Default)]
pub struct Outcome {
    /// Text for stdout, without a trailing newline
    pub output: String,
    /// Errors encountered, in package order
    pub errors: Vec<ErrorContext>,
}

impl Outcome {
    /// The process exit code.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.errors.is_empty())
    }
}

impl Cli {
    /// Build the process-wide settings from the parsed arguments and the
    /// environment.
    #[must_use]
    pub fn build_config(&self, env: &Environment) -> CliConfig {
        let debug = self.debug || env.debug_spew;
        CliConfig {
            log_level: debug.then(|| "debug".to_string()),
            print_errors: self.print_errors || debug,
            errors_to_stdout: self.errors_to_stdout,
        }
    }

    /// The flag categories selected on the command line.
    #[must_use]
    pub fn print_options(&self) -> PrintOptions {
        PrintOptions {
            cflags: self.cflags || self.cflags_only_other,
            includes: self.cflags || self.cflags_only_i,
            defines: self.cflags || self.cflags_only_other,
            libs_search: self.libs || self.libs_only_search,
            libs_link: self.libs || self.libs_only_link,
            libs_other: self.libs || self.libs_only_other,
            mod_version: self.modversion,
            language: self.language,
        }
    }

    /// Resolve every package and render the combined output.
    pub fn execute(&self, env: &Environment) -> Outcome {
        let options = self.print_options();
        let use_defaults = self.components.is_empty();
        let mut outcome = Outcome::default();
        let mut rendered = Vec::with_capacity(self.packages.len());

        for name in &self.packages {
            match self.render(name, &options, use_defaults, env) {
                Ok(text) => rendered.push(text),
                Err(err) => outcome.errors.push(user_friendly_error(err)),
            }
        }

        let separator = match self.format {
            Format::Pkgconf if !options.mod_version => " ",
            _ => "\n",
        };
        outcome.output = rendered.into_iter().filter(|text| !text.is_empty()).collect::<Vec<_>>().join(separator);
        outcome
    }

    fn render(&self, name: &str, options: &PrintOptions, use_defaults: bool, env: &Environment) -> Result<String> {
        tracing::debug!("Resolving {name} with components {:?}", self.components);
        let flags = find_package(name, &self.components, use_defaults, env, self.prefix_variable.as_deref())
            .with_context(|| format!("Failed to resolve package `{name}`"))?;

        match self.format {
            Format::Pkgconf => Ok(printer::pkgconf(&flags, options)),
            Format::Json => {
                printer::json(&flags).with_context(|| format!("Failed to render `{name}` as JSON"))
            }
        }
    }
}
