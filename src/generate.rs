//! Generation pipeline.
//! Loads the templates, materializes every file entry in declaration order
//! and then runs the post-generation commands.

use log::debug;
use std::io::Write;
use std::path::PathBuf;

use crate::{
    config::{ConfigSource, GenerationPlan},
    error::Result,
    hooks::{run_commands, CancellationToken},
    processor::{OutputMode, Processor},
    renderer::TemplateRegistry,
};

/// Everything a run needs besides the plan itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub config: ConfigSource,
    pub templates_dir: PathBuf,
    pub output: OutputMode,
}

/// Drives one generation run.
pub struct Generator<'a> {
    settings: &'a Settings,
    cancel: CancellationToken,
}

impl<'a> Generator<'a> {
    pub fn new(settings: &'a Settings, cancel: CancellationToken) -> Self {
        Self { settings, cancel }
    }

    /// Generates every file of `plan`, then runs its commands.
    ///
    /// `stream` receives the rendered files in stream mode. The first error
    /// stops the run; files generated before it are left in place.
    pub fn run(&self, plan: &GenerationPlan, stream: &mut dyn Write) -> Result<()> {
        let registry = TemplateRegistry::load(&self.settings.templates_dir)?;
        debug!("Loaded templates: {:?}", registry.template_names());

        let mut processor = Processor::new(&registry, &self.settings.output, stream);
        processor.prepare()?;
        for entry in &plan.files {
            processor.process(&plan.global, entry)?;
        }

        if !plan.commands.is_empty() {
            let working_dir = self.settings.output.generation_root();
            run_commands(&plan.commands, working_dir.as_deref(), &self.cancel)?;
        }

        debug!(
            "Generation completed: {} file(s), {} command(s)",
            plan.files.len(),
            plan.commands.len()
        );
        Ok(())
    }
}
