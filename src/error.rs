use crate::format::FormatError;

/// Message used when a level set cannot be built from the supplied value.
pub const INVALID_LEVEL_SET_MESSAGE: &str =
    "Cannot make set from type other than Array of string elements.";

/// Error type returned when building a transport from configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0}")]
    InvalidLevelSet(String),
}

/// Error type returned by [`MultiLineConsole::submit`](crate::transport::MultiLineConsole::submit).
#[derive(thiserror::Error, Debug)]
pub enum SubmitError {
    #[error("formatter failed: {0}")]
    Format(#[source] FormatError),
}

/// Error type returned when installing the tracing subscriber.
#[cfg(feature = "layer")]
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error("failed to set global subscriber: {0}")]
    SetGlobalDefault(#[from] tracing::subscriber::SetGlobalDefaultError),
}
