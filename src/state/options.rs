//! Runtime options and the sources they are resolved from.
//!
//! Options are resolved by folding an ordered list of layers. Each layer only
//! overwrites the keys it defines, so one source never blocks another from
//! setting an unrelated key.
//!
//! Precedence, lowest first:
//! 1. Environment (`FRONTITY_INTERNAL_PUBLIC_PATH`)
//! 2. Settings (`frontity.options` after package layering)
//! 3. Reserved query parameters of the current request

use serde_json::{Map, Value};

use super::link::ReservedParams;

/// Environment variable supplying the default public path.
pub const PUBLIC_PATH_ENV: &str = "FRONTITY_INTERNAL_PUBLIC_PATH";

/// Option keys that can be set from outside the settings tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    Name,
    PublicPath,
    SourceAuth,
}

impl OptionKey {
    /// Key as it appears in `frontity.options`.
    pub const fn as_str(self) -> &'static str {
        match self {
            OptionKey::Name => "name",
            OptionKey::PublicPath => "publicPath",
            OptionKey::SourceAuth => "sourceAuth",
        }
    }
}

/// Environment values read at composition time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeEnv {
    pub public_path: Option<String>,
}

impl RuntimeEnv {
    /// Read from the process environment.
    pub fn from_process() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let public_path = lookup(PUBLIC_PATH_ENV).filter(|v| !v.is_empty());
        if let Some(ref path) = public_path {
            tracing::debug!("{} set to {:?}", PUBLIC_PATH_ENV, path);
        }
        Self { public_path }
    }

    pub fn with_public_path(mut self, public_path: impl Into<String>) -> Self {
        self.public_path = Some(public_path.into());
        self
    }
}

/// Where an option layer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionSource {
    Environment,
    Settings,
    Query,
}

/// A partial set of option values contributed by one source.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionLayer {
    pub source: OptionSource,
    pub values: Map<String, Value>,
}

impl OptionLayer {
    pub fn environment(env: &RuntimeEnv) -> Self {
        let mut values = Map::new();
        if let Some(path) = &env.public_path {
            values.insert(
                OptionKey::PublicPath.as_str().to_string(),
                Value::String(path.clone()),
            );
        }
        Self {
            source: OptionSource::Environment,
            values,
        }
    }

    pub fn settings(options: &Map<String, Value>) -> Self {
        Self {
            source: OptionSource::Settings,
            values: options.clone(),
        }
    }

    pub fn query(reserved: &ReservedParams) -> Self {
        let values = reserved
            .iter()
            .map(|(key, value)| (key.as_str().to_string(), Value::String(value.to_string())))
            .collect();
        Self {
            source: OptionSource::Query,
            values,
        }
    }
}

/// Fold `layers` left to right; a later layer overwrites only the keys it defines.
pub fn resolve_options(layers: &[OptionLayer]) -> Map<String, Value> {
    let mut resolved = Map::new();
    for layer in layers {
        for (key, value) in &layer.values {
            tracing::debug!(source = ?layer.source, key = %key, "runtime option set");
            resolved.insert(key.clone(), value.clone());
        }
    }
    resolved
}

/// Typed view over the externally settable runtime options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeOptions {
    pub name: Option<String>,
    pub public_path: Option<String>,
    pub source_auth: Option<String>,
}

impl RuntimeOptions {
    /// Pick the string-valued known keys out of an options map.
    pub fn from_map(options: &Map<String, Value>) -> Self {
        let get = |key: OptionKey| {
            options
                .get(key.as_str())
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        Self {
            name: get(OptionKey::Name),
            public_path: get(OptionKey::PublicPath),
            source_auth: get(OptionKey::SourceAuth),
        }
    }
}
