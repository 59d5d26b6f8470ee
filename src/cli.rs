//! Command-line interface implementation for Stencil.
//! Provides argument parsing and converts the parsed flags into explicit [`Settings`].

use clap::Parser;
use std::path::PathBuf;

use crate::config::ConfigSource;
use crate::error::{Error, Result};
use crate::generate::Settings;
use crate::processor::OutputMode;

/// Command-line arguments structure for Stencil.
#[derive(Parser, Debug)]
#[command(author, version, about = "Stencil: config-driven project scaffolding", long_about = None)]
pub struct Args {
    /// Path to the configuration document (read from stdin when omitted)
    #[arg(short, long = "configuration", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory containing the *.tmpl templates (defaults to the working directory)
    #[arg(short, long, value_name = "DIR")]
    pub templates: Option<PathBuf>,

    /// Output root directory. Files are written to stdout when omitted
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Project directory created inside the output root
    #[arg(short, long, value_name = "NAME")]
    pub project_name: Option<String>,

    /// Print a `---<name>` marker before each file written to stdout
    #[arg(short, long)]
    pub separator: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Rejects flag combinations that cannot work together.
    ///
    /// # Errors
    /// * `Error::UsageError` if the separator is combined with an output
    ///   directory, or a project name is given without one
    pub fn validate(&self) -> Result<()> {
        if self.separator && self.output.is_some() {
            return Err(Error::UsageError(
                "cannot use stdout and an output directory for file generation".to_string(),
            ));
        }
        if self.project_name.is_some() && self.output.is_none() {
            return Err(Error::UsageError(
                "a project name requires an output directory".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds the run settings.
    ///
    /// `stdin_is_terminal` decides whether a missing config path is a usage error.
    pub fn settings(self, stdin_is_terminal: bool) -> Result<Settings> {
        self.validate()?;

        let config = ConfigSource::detect(self.config, stdin_is_terminal)?;
        let templates_dir = match self.templates {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };
        let output = match self.output {
            Some(root) => OutputMode::Tree { root, project_name: self.project_name },
            None => OutputMode::Stream { separator: self.separator },
        };

        Ok(Settings { config, templates_dir, output })
    }
}

/// Parses command line arguments, exiting with clap's message on error.
pub fn get_args() -> Args {
    Args::parse()
}
