//! Settings schema definitions for a site.
//!
//! All settings structs use `#[serde(default)]` to allow partial configuration files.
//! Missing fields are filled with the same defaults the loader would apply.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved top-level namespace holding core (non-package) state.
pub const RESERVED_NAMESPACE: &str = "frontity";

/// Static configuration of one site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Site identifier, also matched against `frontity_name`
    pub name: String,

    /// Rendering mode tag (e.g. "default", "amp")
    pub mode: String,

    /// URL patterns used to pick this site in a multi-site setup
    #[serde(rename = "match", skip_serializing_if = "Vec::is_empty")]
    pub match_patterns: Vec<String>,

    /// Base state tree, keyed by namespace
    pub state: Map<String, Value>,

    /// Feature packages, in layering order
    pub packages: Vec<PackageEntry>,
}

/// A package as written in a settings file: either a bare name or a full descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PackageEntry {
    Name(String),
    Descriptor(PackageDescriptor),
}

/// One optional feature module and the partial state it contributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageDescriptor {
    pub name: String,

    /// Only active packages participate in composition
    pub active: bool,

    /// Partial state, keyed by namespace (the reserved one or the package's own)
    pub state: Map<String, Value>,
}

/// Contents of a settings file: a single site or a list of sites.
///
/// TOML documents cannot have an array at the root, so they list sites
/// under a `sites` key (`[[sites]]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingsFile {
    Multi(Vec<SiteSettings>),
    Sites { sites: Vec<SiteSettings> },
    Single(Box<SiteSettings>),
}

// =============================================================================
// Default implementations
// =============================================================================

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            mode: "default".to_string(),
            match_patterns: Vec::new(),
            state: Map::new(),
            packages: Vec::new(),
        }
    }
}

impl Default for PackageDescriptor {
    fn default() -> Self {
        Self {
            name: String::new(),
            active: true,
            state: Map::new(),
        }
    }
}

impl PackageDescriptor {
    pub fn new(name: impl Into<String>, state: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            active: true,
            state,
        }
    }
}

impl From<PackageEntry> for PackageDescriptor {
    fn from(entry: PackageEntry) -> Self {
        match entry {
            PackageEntry::Name(name) => PackageDescriptor {
                name,
                ..Default::default()
            },
            PackageEntry::Descriptor(descriptor) => descriptor,
        }
    }
}

impl SiteSettings {
    /// Packages flagged active, normalized to descriptors, in declaration order.
    pub fn active_packages(&self) -> Vec<PackageDescriptor> {
        self.packages
            .iter()
            .cloned()
            .map(PackageDescriptor::from)
            .filter(|pkg| pkg.active)
            .collect()
    }
}

impl SettingsFile {
    pub fn into_sites(self) -> Vec<SiteSettings> {
        match self {
            SettingsFile::Multi(sites) | SettingsFile::Sites { sites } => sites,
            SettingsFile::Single(site) => vec![*site],
        }
    }
}
