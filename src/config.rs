//! Generation plan handling for Stencil.
//! This module parses the configuration document (JSON or YAML) into the
//! in-memory plan: global values, file entries and post-generation commands.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Untyped template data, keyed by name in declaration order.
pub type Values = IndexMap<String, serde_json::Value>;

/// Parsed, read-only form of the configuration document.
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct GenerationPlan {
    /// Values shared by every file entry.
    #[serde(default, deserialize_with = "null_as_default")]
    pub global: Values,
    /// Files to generate, in render order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub files: Vec<FileEntry>,
    /// Commands executed after every file has been generated.
    #[serde(default, deserialize_with = "null_as_default")]
    pub commands: Vec<CommandEntry>,
}

/// One declared output artifact.
#[derive(Debug, Deserialize, PartialEq)]
pub struct FileEntry {
    /// Base name of the generated file.
    pub name: String,
    /// Directory relative to the output root. Empty means the root itself.
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,
    /// Name of a loaded template, e.g. `readme.tmpl`.
    pub template: String,
    /// Values visible to this entry only.
    #[serde(default, deserialize_with = "null_as_default")]
    pub local: Values,
}

/// A post-generation command.
#[derive(Debug, Deserialize, PartialEq)]
pub struct CommandEntry {
    /// Executable name or path.
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub args: Vec<String>,
}

impl std::fmt::Display for CommandEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Treats an explicit `null` the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Where the configuration document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Stdin,
}

impl ConfigSource {
    /// Picks the configuration source.
    ///
    /// An explicit path always wins. Without one the document must be piped
    /// in: an interactive terminal on stdin is a usage error.
    pub fn detect(path: Option<PathBuf>, stdin_is_terminal: bool) -> Result<Self> {
        match path {
            Some(path) => Ok(Self::File(path)),
            None if stdin_is_terminal => {
                Err(Error::UsageError("no input from stdin".to_string()))
            }
            None => Ok(Self::Stdin),
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "file '{}'", path.display()),
            ConfigSource::Stdin => write!(f, "standard input"),
        }
    }
}

/// Parses a configuration document.
///
/// JSON is tried first; if that fails the content is parsed as YAML.
///
/// # Errors
/// * `Error::ConfigError` if the content is neither valid JSON nor valid YAML
///   for the plan schema
pub fn parse_plan(content: &str) -> Result<GenerationPlan> {
    match serde_json::from_str(content) {
        Ok(plan) => Ok(plan),
        Err(json_err) => {
            debug!("Configuration is not JSON ({json_err}), trying YAML");
            serde_yaml::from_str(content).map_err(|yaml_err| {
                Error::ConfigError(format!("Invalid configuration format: {yaml_err}"))
            })
        }
    }
}

/// Reads and parses the configuration document from its source.
pub fn load_plan(source: &ConfigSource) -> Result<GenerationPlan> {
    debug!("Loading configuration from {source}");
    let content = match source {
        ConfigSource::File(path) => read_config_file(path)?,
        ConfigSource::Stdin => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer).map_err(|e| {
                Error::ConfigError(format!("Failed to read standard input: {e}"))
            })?;
            buffer
        }
    };
    parse_plan(&content)
}

fn read_config_file(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(Error::ConfigError(format!(
            "Invalid configuration path: {}",
            path.display()
        )));
    }
    std::fs::read_to_string(path)
        .map_err(|e| Error::ConfigError(format!("Failed to read {}: {e}", path.display())))
}
