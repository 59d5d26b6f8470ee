//! Error handling for Stencil.
//! Defines the error taxonomy and the result alias used throughout the crate.
//! Every error is fatal to the run; there is no recovery path.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can stop a generation run.
#[derive(Error, Debug)]
pub enum Error {
    /// Mutually exclusive or missing required inputs.
    #[error("Usage error: {0}.")]
    UsageError(String),

    /// The configuration document cannot be located, opened or parsed.
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// The templates directory is unusable or a template fails to parse.
    #[error("Failed to load templates from '{dir}': {reason}.")]
    TemplateLoadFailure { dir: String, reason: String },

    /// A template is unknown or fails to render against its context.
    #[error("Failed to render template '{template}': {reason}")]
    TemplateRenderFailure { template: String, reason: String },

    /// Rendering a file entry failed; wraps the render error with the file name.
    #[error("Failed to populate '{file}': {source}.")]
    PopulateFailure {
        file: String,
        #[source]
        source: Box<Error>,
    },

    /// Directory or file creation failed.
    #[error("Failed to create '{}': {source}.", .path.display())]
    FilesystemFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A post-generation command failed to start or exited non-zero.
    #[error("Command '{command}' failed: {reason}.\nOutput: {output}")]
    CommandFailure { command: String, output: String, reason: String },

    /// The run was interrupted while a command was executing.
    #[error("Command '{0}' was cancelled.")]
    Cancelled(String),

    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// Prints the error message to stderr and exits with status code 1.
pub fn default_error_handler(err: Error) -> ! {
    eprintln!("{err}");
    std::process::exit(1);
}
