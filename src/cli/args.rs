//! CLI argument parsing using clap.
//!
//! Defines the command-line interface for site-state.

use clap::Parser;
use std::path::PathBuf;

/// site-state - Compose the per-request state tree for a site
#[derive(Parser, Debug, Clone)]
#[command(name = "site-state")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Settings file (.toml or .json) holding one site or a list of sites
    pub settings: PathBuf,

    /// Absolute request URL(s) to compose state for
    #[arg(required = true, num_args = 1..)]
    pub urls: Vec<String>,

    /// Public path override (takes the place of FRONTITY_INTERNAL_PUBLIC_PATH)
    #[arg(long)]
    pub public_path: Option<String>,

    /// Print one JSON document per line instead of pretty JSON
    #[arg(long)]
    pub compact: bool,

    /// Show verbose output (debug information)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}
