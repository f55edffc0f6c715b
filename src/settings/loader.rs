//! Settings loading and environment variable interpolation.
//!
//! The `SettingsStore` handles:
//! - Loading sites from a `.toml` or `.json` settings file
//! - Resolving `$VAR` and `${VAR}` references in string values of site state
//! - Reloading from disk
//! - Picking the site for a request URL

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::sync::RwLock;
use url::Url;

use super::schema::{PackageEntry, SettingsFile, SiteSettings};
use super::select::select_site;

/// Holds the sites of one settings file, loaded once and shared across requests.
pub struct SettingsStore {
    /// Cached sites (with env vars resolved)
    sites: RwLock<Vec<SiteSettings>>,

    /// Path to the settings file
    path: PathBuf,
}

impl SettingsStore {
    /// Load the settings file at `path`.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let sites = load_sites(&path).await?;

        Ok(Self {
            sites: RwLock::new(sites),
            path,
        })
    }

    /// Build a store from sites already in memory.
    pub fn from_sites(sites: Vec<SiteSettings>) -> Self {
        Self {
            sites: RwLock::new(sites),
            path: PathBuf::new(),
        }
    }

    /// Get all configured sites.
    pub async fn sites(&self) -> Vec<SiteSettings> {
        self.sites.read().await.clone()
    }

    /// Get the site that should serve `url`.
    pub async fn site_for(&self, url: &Url) -> Result<SiteSettings> {
        let sites = self.sites.read().await;
        let site = select_site(&sites, url)?;
        Ok(site.clone())
    }

    /// Reload settings from disk.
    pub async fn reload(&self) -> Result<()> {
        let sites = load_sites(&self.path).await?;
        *self.sites.write().await = sites;
        Ok(())
    }

    /// Get the settings file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Read and parse a settings file. The format follows the file extension.
pub async fn load_sites(path: &Path) -> Result<Vec<SiteSettings>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read settings file {:?}", path))?;

    let mut sites = parse_sites(&contents, path)?;
    for site in &mut sites {
        resolve_env_vars(site);
    }

    tracing::info!("Loaded {} site(s) from {:?}", sites.len(), path);
    Ok(sites)
}

fn parse_sites(contents: &str, path: &Path) -> Result<Vec<SiteSettings>> {
    let file: SettingsFile = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(contents).context("Failed to deserialize TOML settings")?,
        _ => serde_json::from_str(contents).context("Failed to deserialize JSON settings")?,
    };
    Ok(file.into_sites())
}

/// Resolve $ENV_VAR references in string values of the site and package state.
fn resolve_env_vars(site: &mut SiteSettings) {
    fn resolve_tree(value: &mut Value) {
        match value {
            Value::String(s) => {
                if let Some(resolved) = resolve_env_ref(s) {
                    *s = resolved;
                }
            }
            Value::Array(items) => items.iter_mut().for_each(resolve_tree),
            Value::Object(map) => map.values_mut().for_each(resolve_tree),
            _ => {}
        }
    }

    site.state.values_mut().for_each(resolve_tree);
    for entry in &mut site.packages {
        if let PackageEntry::Descriptor(pkg) = entry {
            pkg.state.values_mut().for_each(resolve_tree);
        }
    }
}

/// Resolve a $ENV_VAR or ${ENV_VAR} reference.
///
/// Returns `Some(resolved)` if the value starts with `$` and the env var exists.
/// Returns `None` if no env var reference or env var not set.
fn resolve_env_ref(value: &str) -> Option<String> {
    let trimmed = value.trim();

    let var_name = if let Some(inner) = trimmed
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
    {
        inner
    } else {
        trimmed.strip_prefix('$')?
    };

    if var_name.is_empty() {
        return None;
    }
    std::env::var(var_name).ok()
}
