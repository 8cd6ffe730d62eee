//! Configuration error helpers
//!
//! Turns foreign errors raised while loading, validating or saving settings
//! into the domain `Error::Configuration`, keeping the original as source.

use pctx_domain::error::{Error, Result};
use std::fmt;

/// Extension trait attaching configuration context to foreign errors
///
/// # Example
///
/// ```ignore
/// use pctx_infrastructure::error_ext::ErrorContext;
///
/// let content = std::fs::read_to_string(&path)
///     .config_context(format!("Failed to read config file: {}", path.display()))?;
/// ```
pub trait ErrorContext<T> {
    /// Convert the error into a configuration error prefixed by `context`
    fn config_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn config_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|err| Error::configuration_with_source(format!("{context}: {err}"), err))
    }
}

/// Convert a foreign error into a configuration error with context
pub fn config_error<E>(error: E, message: &str) -> Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    Error::configuration_with_source(message, error)
}
