//! CLI execution runner.
//!
//! Composes the state tree for each requested URL and prints it as JSON.

use std::io::{self, Write};

use anyhow::{Context, Result};
use url::Url;

use crate::state::{compose, StateTree};

use super::bootstrap::CliContext;

/// Compose and print the state for every URL given on the command line.
pub async fn execute_all(ctx: &CliContext) -> Result<()> {
    let mut states = Vec::with_capacity(ctx.args.urls.len());
    for url in &ctx.args.urls {
        states.push(execute_once(ctx, url).await?);
    }

    let mut stdout = io::stdout().lock();
    for state in &states {
        write_state(&mut stdout, state, ctx.args.compact)?;
    }
    stdout.flush()?;
    Ok(())
}

/// Compose the state tree for a single request URL.
pub async fn execute_once(ctx: &CliContext, url: &str) -> Result<StateTree> {
    let url = Url::parse(url).with_context(|| format!("Invalid request URL '{}'", url))?;

    let site = ctx.store.site_for(&url).await?;
    if ctx.args.verbose {
        eprintln!("[cli] {} -> site '{}'", url, site.name);
    }

    let state = compose(&site, &site.active_packages(), &url, &ctx.env)
        .with_context(|| format!("Failed to compose state for site '{}'", site.name))?;
    Ok(state)
}

fn write_state(out: &mut impl Write, state: &StateTree, compact: bool) -> Result<()> {
    if compact {
        serde_json::to_writer(&mut *out, state)?;
    } else {
        serde_json::to_writer_pretty(&mut *out, state)?;
    }
    writeln!(out)?;
    Ok(())
}
