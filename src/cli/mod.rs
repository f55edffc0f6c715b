//! CLI module for headless state composition.
//!
//! Loads a settings file once, then composes and prints the state tree for
//! each request URL, the same way a rendering server would per request.
//!
//! ```text
//! +-----------------+     +----------------+     +---------------+
//! | bootstrap.rs    | --> | runner.rs      | --> | stdout (JSON) |
//! | (.env, settings)|     | (select+compose)|    |               |
//! +-----------------+     +----------------+     +---------------+
//! ```

mod args;
mod bootstrap;
mod runner;

pub use args::Args;
pub use bootstrap::{initialize, CliContext};
pub use runner::{execute_all, execute_once};
