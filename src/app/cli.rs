//! Command line interface definition
//!
//! Global flags cover configuration and logging; each subcommand carries its
//! own arguments. Parsing is plain clap derive, validation beyond what clap
//! expresses happens in startup.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "repoaudit")]
#[command(about = "AI-assisted security scanning for source repositories")]
#[command(version)]
pub struct Cli {
    /// Configuration file path
    #[arg(long = "config-file", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Force colored output (overrides TTY detection and NO_COLOR)
    #[arg(long = "color", global = true)]
    pub color: bool,

    /// Disable colored output
    #[arg(long = "no-color", conflicts_with = "color", global = true)]
    pub no_color: bool,

    /// Log level
    #[arg(long = "log-level", value_name = "LEVEL", global = true, value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log file path
    #[arg(long = "log-file", value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", global = true, value_parser = ["text", "json"])]
    pub log_format: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Scan a repository and report security findings
    Scan(ScanArgs),
    /// Show which paths a scan would analyze, descend into or skip
    Filter(FilterArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Repository to scan, as owner/repo
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Branch to scan
    #[arg(long = "branch", value_name = "BRANCH", default_value = "main")]
    pub branch: String,

    /// Owner recorded on the scan
    #[arg(long = "owner", value_name = "OWNER", default_value = "cli")]
    pub owner: String,

    /// Display name for the scan (defaults to the target)
    #[arg(long = "name", value_name = "NAME")]
    pub name: Option<String>,

    /// Free-form description stored with the scan
    #[arg(long = "description", value_name = "TEXT")]
    pub description: Option<String>,

    /// Print the finished scan as JSON instead of a report
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// File paths to classify, relative to the repository root
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<String>,
}
