use std::io;

use template_store::TemplateStoreError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Exit code for failed store operations.
pub const EXIT_OPERATION_FAILED: i32 = 1;

/// Exit code for configuration and argument problems.
pub const EXIT_CONFIGURATION: i32 = 2;

/// Errors that can occur in the template store CLI.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error occurred while loading, parsing or saving configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failed to read a template file or standard input.
    #[error("Failed to load file: {0}")]
    LoadFile(io::Error),

    /// The template input is not a JSON template document.
    #[error("Failed to parse template: {0}")]
    ParseTemplate(serde_json::Error),

    /// A store operation failed.
    #[error("Template store error: {0}")]
    Store(#[from] TemplateStoreError),

    /// Writing command output failed.
    #[error("Failed to write output: {0}")]
    Output(io::Error),
}

impl Error {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_)
            | Error::Store(TemplateStoreError::InvalidConfiguration { .. })
            | Error::Store(TemplateStoreError::InvalidTemplateId { .. }) => EXIT_CONFIGURATION,
            _ => EXIT_OPERATION_FAILED,
        }
    }
}
