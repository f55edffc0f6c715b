//! CLI bootstrap - Load the environment, logging and settings.

use anyhow::{Context, Result};

use crate::settings::SettingsStore;
use crate::state::RuntimeEnv;

use super::args::Args;

/// Context for CLI execution containing the loaded settings.
pub struct CliContext {
    /// Sites from the settings file
    pub store: SettingsStore,

    /// Environment values read at startup
    pub env: RuntimeEnv,

    /// Command-line arguments
    pub args: Args,
}

/// Initialize the CLI context.
pub async fn initialize(args: &Args) -> Result<CliContext> {
    // Load .env file if present
    if let Err(e) = dotenvy::dotenv() {
        // Only warn on errors other than file not found
        if !matches!(e, dotenvy::Error::Io(_)) {
            tracing::warn!("Failed to load .env file: {}", e);
        }
    }

    // Initialize logging based on verbosity; stdout is reserved for JSON
    let log_level = if args.verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .try_init();

    let store = SettingsStore::load(&args.settings)
        .await
        .context("Failed to load settings")?;

    let env = resolve_env(args);

    if args.verbose {
        eprintln!("[cli] Settings loaded from {}", store.path().display());
        eprintln!("[cli] Public path: {:?}", env.public_path);
    }

    Ok(CliContext {
        store,
        env,
        args: args.clone(),
    })
}

/// Read the process environment, applying the `--public-path` override.
fn resolve_env(args: &Args) -> RuntimeEnv {
    let env = RuntimeEnv::from_process();
    match &args.public_path {
        Some(path) if !path.is_empty() => env.with_public_path(path.clone()),
        _ => env,
    }
}
