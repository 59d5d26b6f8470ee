//! Template registry and rendering for Stencil.
//! Loads every `*.tmpl` file of a templates directory into a MiniJinja
//! environment and renders them by name into an output sink.
use crate::context::RenderContext;
use crate::error::{Error, Result};
use globset::{Glob, GlobMatcher};
use log::debug;
use minijinja::{Environment, UndefinedBehavior};
use std::io::Write;
use std::path::Path;
use walkdir::WalkDir;

/// File name pattern of loadable templates.
pub const TEMPLATE_GLOB: &str = "*.tmpl";

/// Trait for rendering named templates.
pub trait TemplateRenderer {
    /// Renders the template `template` with `context`, writing to `sink`.
    ///
    /// Output is written incrementally, so part of it may already have
    /// reached `sink` when an error is returned.
    ///
    /// # Errors
    /// * `Error::TemplateRenderFailure` if the template is unknown, a referenced
    ///   field is missing from the context, or the sink rejects a write
    fn render_to(
        &self,
        template: &str,
        context: &RenderContext<'_>,
        sink: &mut dyn Write,
    ) -> Result<()>;
}

/// MiniJinja-backed set of named templates.
pub struct TemplateRegistry {
    env: Environment<'static>,
}

impl TemplateRegistry {
    /// Creates an empty registry with strict undefined handling and the case helpers.
    /// Trailing newlines of template sources are kept in the output.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        register_case_helpers(&mut env);
        Self { env }
    }

    /// Loads all templates that are direct children of `dir`.
    ///
    /// Templates are registered under their file name (`readme.tmpl`).
    /// Loading is all-or-nothing: one unreadable or malformed template fails the whole load.
    ///
    /// # Errors
    /// * `Error::TemplateLoadFailure` if the directory does not exist or
    ///   cannot be read, contains no template, or if a template has invalid syntax
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let load_error = |reason: String| Error::TemplateLoadFailure {
            dir: dir.display().to_string(),
            reason,
        };

        if !dir.is_dir() {
            return Err(load_error("directory does not exist".to_string()));
        }

        let matcher = template_matcher().map_err(|e| load_error(e.to_string()))?;
        let mut registry = Self::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| load_error(e.to_string()))?;
            if !entry.file_type().is_file() && !entry.path().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                debug!("Skipping non UTF-8 file name {}", entry.path().display());
                continue;
            };
            if !matcher.is_match(name) {
                continue;
            }

            debug!("Loading template {}", entry.path().display());
            let source = std::fs::read_to_string(entry.path())
                .map_err(|e| load_error(format!("{name}: {e}")))?;
            registry
                .env
                .add_template_owned(name.to_string(), source)
                .map_err(|e| load_error(e.to_string()))?;
        }

        if registry.env.templates().next().is_none() {
            return Err(load_error(format!("no files match '{TEMPLATE_GLOB}'")));
        }
        Ok(registry)
    }

    /// Registers a template from a string instead of a file.
    pub fn add_inline<S: Into<String>>(&mut self, name: S, source: S) -> Result<()> {
        self.env
            .add_template_owned(name.into(), source.into())
            .map_err(|e| Error::TemplateLoadFailure {
                dir: "<inline>".to_string(),
                reason: e.to_string(),
            })
    }

    /// Names of all loaded templates in sorted order.
    pub fn template_names(&self) -> Vec<String> {
        let mut names: Vec<String> =
            self.env.templates().map(|(name, _)| name.to_string()).collect();
        names.sort();
        names
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        TemplateRegistry::new()
    }
}

impl TemplateRenderer for TemplateRegistry {
    fn render_to(
        &self,
        template: &str,
        context: &RenderContext<'_>,
        sink: &mut dyn Write,
    ) -> Result<()> {
        let render_error = |e: minijinja::Error| Error::TemplateRenderFailure {
            template: template.to_string(),
            reason: e.to_string(),
        };

        let tmpl = self.env.get_template(template).map_err(render_error)?;
        tmpl.render_to_write(context, sink).map_err(render_error)?;
        Ok(())
    }
}

fn template_matcher() -> std::result::Result<GlobMatcher, globset::Error> {
    Ok(Glob::new(TEMPLATE_GLOB)?.compile_matcher())
}

/// Registers `ToUpper`, `ToLower` and `ToTitle`, both as functions and as filters.
fn register_case_helpers(env: &mut Environment<'static>) {
    env.add_function("ToUpper", to_upper);
    env.add_function("ToLower", to_lower);
    env.add_function("ToTitle", to_title);
    env.add_filter("ToUpper", to_upper);
    env.add_filter("ToLower", to_lower);
    env.add_filter("ToTitle", to_title);
}

fn to_upper(value: String) -> String {
    value.to_uppercase()
}

fn to_lower(value: String) -> String {
    value.to_lowercase()
}

/// Maps every character to its upper case form, keeping separators and spacing.
fn to_title(value: String) -> String {
    value.chars().flat_map(char::to_uppercase).collect()
}
