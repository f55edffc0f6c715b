use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("Expected an object at `{path}`")]
    NotAnObject { path: String },

    #[error("Invalid site url `{url}`: {source}")]
    InvalidSiteUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Errors raised while choosing a site out of a multi-site settings file.
#[derive(Debug, Error)]
pub enum SelectError {
    #[error("No sites configured")]
    Empty,

    #[error("No site named `{0}`")]
    UnknownSite(String),

    #[error("No site matches {0}")]
    NoMatchingSite(String),

    #[error("Invalid match pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, ComposeError>;
