// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `distkit`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "distkit",
    version,
    about = "Plan packaging pipeline steps from a TOML description.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the pipeline file (TOML).
    ///
    /// Default: `Distkit.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Distkit.toml")]
    pub config: String,

    /// Print the ordered plan for this step only.
    ///
    /// Without it, a plan is printed for every terminal step (steps nothing
    /// else depends on).
    #[arg(long, value_name = "NAME")]
    pub target: Option<String>,

    /// Print the step graph in Graphviz DOT format and exit.
    #[arg(long)]
    pub dot: bool,

    /// Parse + validate, print steps and relations, but compute no plan.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DISTKIT_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
