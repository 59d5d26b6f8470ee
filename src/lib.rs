//! Stencil renders a set of named templates into a project tree (or a single
//! output stream) as described by a configuration document, then runs the
//! configured post-generation commands in the generated directory.

/// Command-line interface module for the Stencil application
pub mod cli;

/// Generation plan parsing (JSON or YAML)
pub mod config;

/// Two-scope (`Global` / `Local`) rendering context
pub mod context;

/// Error types and handling for the Stencil application
pub mod error;

/// Orchestration of a complete generation run
pub mod generate;

/// Post-generation command execution and cancellation
pub mod hooks;

/// Logger initialisation
pub mod logger;

/// Output sink resolution and file materialization
pub mod processor;

/// Template loading and rendering
pub mod renderer;
