//! Request URL decomposition and `initialLink` construction.
//!
//! Reserved query parameters carry runtime option overrides. They are
//! captured here and removed from the link the renderer sees; every other
//! parameter keeps its position and its original encoding.

use url::{form_urlencoded, Url};

use super::options::OptionKey;

/// Reserved query parameter names and the runtime option each one feeds.
pub const RESERVED_PARAMS: &[(&str, OptionKey)] = &[
    ("frontity_name", OptionKey::Name),
    ("frontity_source_auth", OptionKey::SourceAuth),
    ("frontity_public_path", OptionKey::PublicPath),
];

/// Values captured from reserved query parameters.
///
/// The first non-empty occurrence of a parameter wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservedParams {
    values: Vec<(OptionKey, String)>,
}

impl ReservedParams {
    pub fn get(&self, key: OptionKey) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (OptionKey, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn capture(&mut self, key: OptionKey, value: String) {
        if value.is_empty() || self.get(key).is_some() {
            return;
        }
        self.values.push((key, value));
    }
}

/// A request URL split into the pieces composition needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLink {
    /// Percent-encoded path, always starting with `/`
    pub path: String,

    /// Non-reserved query segments, verbatim and in request order
    pub query: Vec<String>,

    /// Fragment without the leading `#`
    pub fragment: Option<String>,

    /// Captured reserved parameter values
    pub reserved: ReservedParams,
}

impl RequestLink {
    /// Decompose `url`, stripping reserved parameters from its query.
    pub fn parse(url: &Url) -> Self {
        let mut query = Vec::new();
        let mut reserved = ReservedParams::default();

        for segment in url.query().unwrap_or_default().split('&') {
            if segment.is_empty() {
                continue;
            }
            match reserved_key(segment) {
                Some((key, value)) => reserved.capture(key, value),
                None => query.push(segment.to_string()),
            }
        }

        Self {
            path: url.path().to_string(),
            query,
            fragment: url.fragment().filter(|f| !f.is_empty()).map(str::to_string),
            reserved,
        }
    }

    /// Build the link relative to `base_path`.
    ///
    /// `base_path` has no trailing slash; `None` (or `"/"`) means the site is
    /// served from the root.
    pub fn initial_link(&self, base_path: Option<&str>) -> String {
        let mut link = strip_base_path(&self.path, base_path).to_string();
        if link.is_empty() {
            link.push('/');
        }

        if !self.query.is_empty() {
            link.push('?');
            link.push_str(&self.query.join("&"));
        }

        if let Some(fragment) = &self.fragment {
            link.push('#');
            link.push_str(fragment);
        }

        link
    }
}

/// First non-empty value of a reserved parameter in `url`, if any.
pub fn reserved_param(url: &Url, key: OptionKey) -> Option<String> {
    RequestLink::parse(url).reserved.get(key).map(str::to_string)
}

/// Match a raw `name=value` segment against the reserved table.
fn reserved_key(segment: &str) -> Option<(OptionKey, String)> {
    let (name, value) = form_urlencoded::parse(segment.as_bytes()).next()?;
    RESERVED_PARAMS
        .iter()
        .find(|(reserved, _)| *reserved == name)
        .map(|(_, key)| (*key, value.into_owned()))
}

fn strip_base_path<'a>(path: &'a str, base_path: Option<&str>) -> &'a str {
    let Some(base) = base_path.map(|b| b.trim_end_matches('/')) else {
        return path;
    };
    if base.is_empty() {
        return path;
    }

    match path.strip_prefix(base) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => path,
    }
}
