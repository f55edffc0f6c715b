//! Per-request state tree composition.
//!
//! Turns static site settings, the active packages and the incoming request
//! URL into the state tree handed to rendering.
//!
//! # Usage
//!
//! ```rust
//! use site_state::settings::SiteSettings;
//! use site_state::state::{compose, RuntimeEnv};
//! use url::Url;
//!
//! let settings = SiteSettings { name: "site".into(), ..Default::default() };
//! let url = Url::parse("https://site.com/page/2?frontity_name=site&a=1").unwrap();
//!
//! let state = compose(&settings, &settings.active_packages(), &url, &RuntimeEnv::from_process())
//!     .unwrap();
//! assert_eq!(state.initial_link(), Some("/page/2?a=1"));
//! ```

pub mod compose;
pub mod link;
pub mod merge;
pub mod options;

pub use compose::{compose, StateTree, SERVER_PLATFORM, SERVER_RENDERING};
pub use link::{reserved_param, RequestLink, ReservedParams, RESERVED_PARAMS};
pub use merge::{deep_merge, deep_merge_map, merge_with};
pub use options::{
    resolve_options, OptionKey, OptionLayer, OptionSource, RuntimeEnv, RuntimeOptions,
    PUBLIC_PATH_ENV,
};
