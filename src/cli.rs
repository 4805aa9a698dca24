// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::config::DEFAULT_CONFIG_FILE;

/// Command-line arguments for `pipegen`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pipegen",
    version,
    about = "Generate Makefile, Dockerfile, CI pipeline and scaffold files from one project description.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the project file (TOML).
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Directory generated files are written to.
    ///
    /// Default: the directory containing the project file.
    #[arg(long, value_name = "DIR")]
    pub root: Option<String>,

    /// Build the graph and print the render order and planned files,
    /// but don't write anything.
    #[arg(long, conflicts_with = "check")]
    pub dry_run: bool,

    /// Fail if any generated file differs from what is on disk.
    #[arg(long)]
    pub check: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PIPEGEN_LOG` or a default level will be used.
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
