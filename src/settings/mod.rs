//! Site settings: schema, file loading and site selection.
//!
//! Settings are loaded once per process from a `.toml` or `.json` file holding
//! one site or a list of sites. String values in site and package state may
//! reference environment variables as `$VAR` or `${VAR}`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use site_state::settings::SettingsStore;
//!
//! // Load settings
//! let store = SettingsStore::load("frontity.settings.json").await?;
//!
//! // Pick the site serving this request
//! let site = store.site_for(&url).await?;
//! let packages = site.active_packages();
//! ```

pub mod loader;
pub mod schema;
pub mod select;

pub use loader::{load_sites, SettingsStore};
pub use schema::{PackageDescriptor, PackageEntry, SettingsFile, SiteSettings, RESERVED_NAMESPACE};
pub use select::select_site;
