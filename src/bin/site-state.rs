//! site-state - Compose per-request state trees from the command line
//!
//! Loads a settings file, picks the site serving each URL and prints the
//! composed state tree as JSON on stdout. Logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! # Build the CLI binary
//! cargo build --features cli --bin site-state
//!
//! # Compose state for one request
//! ./target/debug/site-state frontity.settings.json "https://site.com/page/2?frontity_name=site"
//!
//! # Several requests, one JSON document per line
//! ./target/debug/site-state settings.toml https://site.com/ https://site.com/about --compact
//!
//! # Override the environment public path
//! ./target/debug/site-state settings.json https://site.com/ --public-path /static/
//! ```

use anyhow::Result;
use clap::Parser;

use site_state::cli::{execute_all, initialize, Args};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let ctx = initialize(&args).await?;

    execute_all(&ctx).await
}
