//! cps-config CLI entry point
//!
//! Parses the command line, sets up logging on stderr, resolves the
//! requested packages and prints the result. Flags go to stdout; errors are
//! printed only when requested and are reflected in the exit code.

use clap::Parser;
use cps_config::cli::{Cli, CliConfig};
use cps_config::config::Environment;
use tracing_subscriber::EnvFilter;

fn init_logging(config: &CliConfig) {
    let filter = match &config.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let env = Environment::from_env();
    let config = cli.build_config(&env);
    init_logging(&config);

    let outcome = cli.execute(&env);
    if !outcome.output.is_empty() {
        println!("{}", outcome.output);
    }
    if config.print_errors {
        for error in &outcome.errors {
            if config.errors_to_stdout {
                println!("{error}");
            } else {
                error.display();
            }
        }
    }
    std::process::exit(outcome.exit_code());
}
