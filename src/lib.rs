#[cfg(feature = "cli")]
pub mod cli;
pub mod error;
pub mod settings;
pub mod state;

pub use error::{ComposeError, Result, SelectError};
pub use settings::{PackageDescriptor, SiteSettings};
pub use state::{compose, RuntimeEnv, StateTree};
