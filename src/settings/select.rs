//! Site selection for multi-site settings.

use regex::Regex;
use url::Url;

use super::schema::SiteSettings;
use crate::error::SelectError;
use crate::state::{reserved_param, OptionKey};

/// Pick the site that serves `url`.
///
/// Order of checks:
/// 1. An explicit `frontity_name` query parameter selects by name.
/// 2. A single configured site is always used.
/// 3. The first site with a `match` pattern matching the full URL.
/// 4. The first site without `match` patterns.
pub fn select_site<'a>(
    sites: &'a [SiteSettings],
    url: &Url,
) -> Result<&'a SiteSettings, SelectError> {
    if sites.is_empty() {
        return Err(SelectError::Empty);
    }

    if let Some(name) = reserved_param(url, OptionKey::Name) {
        tracing::debug!("Selecting site by name {:?}", name);
        return sites
            .iter()
            .find(|site| site.name == name)
            .ok_or(SelectError::UnknownSite(name));
    }

    if let [only] = sites {
        return Ok(only);
    }

    for site in sites {
        for pattern in &site.match_patterns {
            let regex = Regex::new(pattern).map_err(|source| SelectError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
            if regex.is_match(url.as_str()) {
                tracing::debug!(site = %site.name, pattern = %pattern, "site matched");
                return Ok(site);
            }
        }
    }

    sites
        .iter()
        .find(|site| site.match_patterns.is_empty())
        .ok_or_else(|| SelectError::NoMatchingSite(url.to_string()))
}
