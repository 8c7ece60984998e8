//! CLI argument parsing for the provisioning workflow.
//!
//! The CLI is intentionally thin: flags select config sources and the debug
//! gate, and everything else comes from `SITEUP_*` variables or the config
//! file, so the same pipeline runs identically from a terminal or CI.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint for the provisioning workflow.
#[derive(Parser, Debug)]
#[command(
    name = "siteup",
    version,
    about = "Provision a content-managed site on a hosting platform",
    after_help = "Commands:\n  provision   Create and configure a site end to end\n  doctor      Check external tools and configuration\n\nExamples:\n  siteup provision --site-type drupal\n  siteup provision --debug --env-file .env.staging\n  siteup doctor",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Emit debug-level tracing on stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Provision(ProvisionArgs),
    Doctor(DoctorArgs),
}

/// Provision command inputs.
#[derive(Parser, Debug)]
#[command(about = "Create and configure a site end to end")]
pub struct ProvisionArgs {
    /// Pause before each step: Enter runs it, s skips, q quits
    #[arg(long)]
    pub debug: bool,

    /// Site type (drupal or wordpress); overrides config and environment
    #[arg(long, value_name = "TYPE")]
    pub site_type: Option<String>,

    /// Path to a JSON config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Dotenv file loaded before reading SITEUP_* variables
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,
}

/// Doctor command inputs.
#[derive(Parser, Debug)]
#[command(about = "Check external tools and configuration")]
pub struct DoctorArgs {
    /// Path to a JSON config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Dotenv file loaded before reading SITEUP_* variables
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,
}
