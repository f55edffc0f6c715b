//! Per-request state composition.
//!
//! The tree is built in layers, later layers winning on shared paths:
//!
//! ```text
//! descriptor fields -> settings.state -> active packages (in order) -> request fields
//! ```
//!
//! Descriptor fields are `frontity.name`, `frontity.mode` and
//! `frontity.packages`. Request fields are `frontity.initialLink`,
//! `frontity.rendering`, `frontity.platform` and `frontity.options`.

use serde::Serialize;
use serde_json::{json, Map, Value};
use url::Url;

use super::link::RequestLink;
use super::merge::deep_merge_map;
use super::options::{resolve_options, OptionLayer, RuntimeEnv, RuntimeOptions};
use crate::error::{ComposeError, Result};
use crate::settings::{PackageDescriptor, SiteSettings, RESERVED_NAMESPACE};

/// Rendering mode set when composing on the server.
pub const SERVER_RENDERING: &str = "ssr";
/// Platform set when composing on the server.
pub const SERVER_PLATFORM: &str = "server";

/// The composed per-request state, keyed by namespace.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StateTree(Map<String, Value>);

impl StateTree {
    /// The reserved namespace.
    pub fn frontity(&self) -> Option<&Map<String, Value>> {
        self.0.get(RESERVED_NAMESPACE).and_then(Value::as_object)
    }

    pub fn initial_link(&self) -> Option<&str> {
        self.frontity_str("initialLink")
    }

    pub fn rendering(&self) -> Option<&str> {
        self.frontity_str("rendering")
    }

    pub fn platform(&self) -> Option<&str> {
        self.frontity_str("platform")
    }

    pub fn options(&self) -> RuntimeOptions {
        self.frontity()
            .and_then(|f| f.get("options"))
            .and_then(Value::as_object)
            .map(RuntimeOptions::from_map)
            .unwrap_or_default()
    }

    /// Look up a value by dot-notation path (e.g. "frontity.options.publicPath").
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.0.get(parts.next()?)?;
        for part in parts {
            current = current.get(part)?;
        }
        Some(current)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    fn frontity_str(&self, key: &str) -> Option<&str> {
        self.frontity()?.get(key)?.as_str()
    }
}

/// Compose the state tree for one request on the server.
///
/// `settings` and `packages` are only read. Inactive entries in `packages`
/// are skipped. Fails only when the reserved namespace or its `options`
/// turn out not to be objects, or when `frontity.url` is not a valid URL.
pub fn compose(
    settings: &SiteSettings,
    packages: &[PackageDescriptor],
    url: &Url,
    env: &RuntimeEnv,
) -> Result<StateTree> {
    let active: Vec<&PackageDescriptor> = packages.iter().filter(|pkg| pkg.active).collect();

    let mut state = Map::new();
    state.insert(
        RESERVED_NAMESPACE.to_string(),
        json!({
            "name": settings.name,
            "mode": settings.mode,
            "packages": active.iter().map(|pkg| pkg.name.as_str()).collect::<Vec<_>>(),
        }),
    );
    deep_merge_map(&mut state, &settings.state);

    for pkg in &active {
        tracing::debug!(package = %pkg.name, "layering package state");
        deep_merge_map(&mut state, &pkg.state);
    }

    let request = RequestLink::parse(url);

    let frontity = state
        .entry(RESERVED_NAMESPACE)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| ComposeError::NotAnObject {
            path: RESERVED_NAMESPACE.to_string(),
        })?;

    let base_path = site_base_path(frontity)?;
    let initial_link = request.initial_link(base_path.as_deref());

    let settings_options = match frontity.get("options") {
        None => Map::new(),
        Some(Value::Object(options)) => options.clone(),
        Some(_) => {
            return Err(ComposeError::NotAnObject {
                path: format!("{}.options", RESERVED_NAMESPACE),
            })
        }
    };
    let options = resolve_options(&[
        OptionLayer::environment(env),
        OptionLayer::settings(&settings_options),
        OptionLayer::query(&request.reserved),
    ]);

    tracing::debug!(site = %settings.name, initial_link = %initial_link, "composed request state");

    frontity.insert("initialLink".to_string(), Value::String(initial_link));
    frontity.insert("rendering".to_string(), Value::from(SERVER_RENDERING));
    frontity.insert("platform".to_string(), Value::from(SERVER_PLATFORM));
    frontity.insert("options".to_string(), Value::Object(options));

    Ok(StateTree(state))
}

/// Path component of `frontity.url`, without trailing slash; `None` when served from the root.
fn site_base_path(frontity: &Map<String, Value>) -> Result<Option<String>> {
    let Some(raw) = frontity.get("url").and_then(Value::as_str) else {
        return Ok(None);
    };

    let site_url = Url::parse(raw).map_err(|source| ComposeError::InvalidSiteUrl {
        url: raw.to_string(),
        source,
    })?;

    let base = site_url.path().trim_end_matches('/');
    Ok((!base.is_empty()).then(|| base.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SiteSettings {
        serde_json::from_value(json!({
            "name": "site",
            "mode": "default",
            "match": ["https://www.site-1.com"],
            "state": {
                "frontity": {
                    "url": "https://site.com",
                    "prop1": "prop1",
                    "menu1": ["item1"],
                    "options": {}
                }
            }
        }))
        .unwrap()
    }

    fn packages() -> Vec<PackageDescriptor> {
        serde_json::from_value(json!([
            {
                "name": "package1",
                "active": true,
                "state": {
                    "frontity": {
                        "prop1": "overwritten by package1",
                        "menu1": ["item2", "item3"]
                    },
                    "package1": { "prop2": "prop2" }
                }
            },
            {
                "name": "package2",
                "active": true,
                "state": {
                    "frontity": { "prop1": "overwritten by package2" },
                    "package2": { "prop3": "prop2" }
                }
            }
        ]))
        .unwrap()
    }

    fn compose_url(url: &str) -> StateTree {
        compose(
            &settings(),
            &packages(),
            &Url::parse(url).unwrap(),
            &RuntimeEnv::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_initial_state() {
        let state = compose_url("https://site.com/post");

        assert_eq!(
            state.into_value(),
            json!({
                "frontity": {
                    "name": "site",
                    "mode": "default",
                    "packages": ["package1", "package2"],
                    "url": "https://site.com",
                    "prop1": "overwritten by package2",
                    "menu1": ["item2", "item3"],
                    "options": {},
                    "initialLink": "/post",
                    "rendering": "ssr",
                    "platform": "server"
                },
                "package1": { "prop2": "prop2" },
                "package2": { "prop3": "prop2" }
            })
        );
    }

    #[test]
    fn test_initial_links() {
        let cases = [
            ("https://site.com/category/nature/page/2", "/category/nature/page/2"),
            ("https://site.com", "/"),
            ("https://site.com/page/2?some=query", "/page/2?some=query"),
            ("https://site.com/page/2#some-hash", "/page/2#some-hash"),
            (
                "https://site.com/page/2?some=query#some-hash",
                "/page/2?some=query#some-hash",
            ),
            (
                "https://site.com/page/2?frontity_name=mySite&otherParam=value&frontity_source_auth=hello",
                "/page/2?otherParam=value",
            ),
        ];

        for (url, expected) in cases {
            assert_eq!(compose_url(url).initial_link(), Some(expected), "url: {}", url);
        }
    }

    #[test]
    fn test_server_rendering_and_platform() {
        let state = compose_url("https://site.com/page/2?some=query#some-hash");
        assert_eq!(state.rendering(), Some("ssr"));
        assert_eq!(state.platform(), Some("server"));
    }

    #[test]
    fn test_options_from_settings() {
        let mut settings = settings();
        settings.state["frontity"]["options"] = json!({ "publicPath": "/custom-settings-path" });

        let state = compose(
            &settings,
            &packages(),
            &Url::parse("https://site.com/post").unwrap(),
            &RuntimeEnv::default(),
        )
        .unwrap();

        assert_eq!(
            state.get("frontity.options"),
            Some(&json!({ "publicPath": "/custom-settings-path" }))
        );
    }

    #[test]
    fn test_options_from_env() {
        let env = RuntimeEnv::default().with_public_path("/custom-env-path");
        let state = compose(
            &settings(),
            &packages(),
            &Url::parse("https://site.com/post").unwrap(),
            &env,
        )
        .unwrap();

        assert_eq!(
            state.get("frontity.options"),
            Some(&json!({ "publicPath": "/custom-env-path" }))
        );
    }

    #[test]
    fn test_options_from_query_win() {
        let env = RuntimeEnv::default().with_public_path("/custom-env-path");
        let url = Url::parse(
            "https://site.com/page/2?frontity_name=some-site&frontity_source_auth=some-token&frontity_public_path=/custom-query-path",
        )
        .unwrap();
        let state = compose(&settings(), &packages(), &url, &env).unwrap();

        assert_eq!(
            state.get("frontity.options"),
            Some(&json!({
                "publicPath": "/custom-query-path",
                "name": "some-site",
                "sourceAuth": "some-token"
            }))
        );
        assert_eq!(state.initial_link(), Some("/page/2"));
        assert_eq!(state.options().name.as_deref(), Some("some-site"));
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let settings = settings();
        let packages = packages();
        let before = (settings.clone(), packages.clone());

        let mut state = compose(
            &settings,
            &packages,
            &Url::parse("https://site.com/post").unwrap(),
            &RuntimeEnv::default(),
        )
        .unwrap()
        .into_value();
        state["frontity"]["menu1"] = json!("changed");

        assert_eq!((settings, packages), before);
    }

    #[test]
    fn test_empty_package_list_keeps_settings_state() {
        let settings = settings();
        let state = compose(
            &settings,
            &[],
            &Url::parse("https://site.com/").unwrap(),
            &RuntimeEnv::default(),
        )
        .unwrap();

        let mut expected = settings.state.clone();
        let frontity = expected["frontity"].as_object_mut().unwrap();
        for (key, value) in [
            ("name", json!("site")),
            ("mode", json!("default")),
            ("packages", json!([])),
            ("initialLink", json!("/")),
            ("rendering", json!("ssr")),
            ("platform", json!("server")),
        ] {
            frontity.insert(key.to_string(), value);
        }

        assert_eq!(state.as_map(), &expected);
    }

    #[test]
    fn test_inactive_packages_are_skipped() {
        let mut packages = packages();
        packages[1].active = false;

        let state = compose_url_with(&packages, "https://site.com/");
        assert_eq!(state.get("frontity.prop1"), Some(&json!("overwritten by package1")));
        assert_eq!(state.get("package2"), None);
        assert_eq!(state.get("frontity.packages"), Some(&json!(["package1"])));
    }

    #[test]
    fn test_request_fields_override_package_values() {
        let packages = vec![PackageDescriptor::new(
            "rogue",
            json!({ "frontity": { "initialLink": "/nope", "platform": "client" } })
                .as_object()
                .unwrap()
                .clone(),
        )];

        let state = compose_url_with(&packages, "https://site.com/real");
        assert_eq!(state.initial_link(), Some("/real"));
        assert_eq!(state.platform(), Some("server"));
    }

    #[test]
    fn test_package_options_feed_settings_layer() {
        let packages = vec![PackageDescriptor::new(
            "source",
            json!({ "frontity": { "options": { "sourceAuth": "pkg-token" } } })
                .as_object()
                .unwrap()
                .clone(),
        )];

        let state = compose_url_with(&packages, "https://site.com/");
        assert_eq!(state.options().source_auth.as_deref(), Some("pkg-token"));
    }

    #[test]
    fn test_base_path_from_site_url() {
        let mut settings = settings();
        settings.state["frontity"]["url"] = json!("https://site.com/blog/");

        let compose_at = |url: &str| {
            compose(&settings, &[], &Url::parse(url).unwrap(), &RuntimeEnv::default())
                .unwrap()
                .initial_link()
                .map(str::to_string)
        };

        assert_eq!(compose_at("https://site.com/blog/hello?x=1").as_deref(), Some("/hello?x=1"));
        assert_eq!(compose_at("https://site.com/blog").as_deref(), Some("/"));
    }

    #[test]
    fn test_reserved_namespace_must_be_object() {
        let packages = vec![PackageDescriptor::new(
            "broken",
            json!({ "frontity": "not an object" }).as_object().unwrap().clone(),
        )];

        let err = compose(
            &settings(),
            &packages,
            &Url::parse("https://site.com/").unwrap(),
            &RuntimeEnv::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ComposeError::NotAnObject { ref path } if path == "frontity"));
    }

    #[test]
    fn test_options_must_be_object() {
        let mut settings = settings();
        settings.state["frontity"]["options"] = json!(["nope"]);

        let err = compose(
            &settings,
            &[],
            &Url::parse("https://site.com/").unwrap(),
            &RuntimeEnv::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ComposeError::NotAnObject { ref path } if path == "frontity.options"));
    }

    #[test]
    fn test_invalid_site_url_is_rejected() {
        let mut settings = settings();
        settings.state["frontity"]["url"] = json!("not a url");

        let err = compose(
            &settings,
            &[],
            &Url::parse("https://site.com/").unwrap(),
            &RuntimeEnv::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ComposeError::InvalidSiteUrl { .. }));
    }

    fn compose_url_with(packages: &[PackageDescriptor], url: &str) -> StateTree {
        compose(
            &settings(),
            packages,
            &Url::parse(url).unwrap(),
            &RuntimeEnv::default(),
        )
        .unwrap()
    }
}
