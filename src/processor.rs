//! File materialization for Stencil.
//! Resolves the output sink of every file entry, either one shared stream or
//! a file inside the output tree, and renders the entry's template into it.

use log::debug;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use crate::{
    config::{FileEntry, Values},
    context::RenderContext,
    error::{Error, Result},
    renderer::TemplateRenderer,
};

/// Prefix of the marker written before each file in stream mode.
pub const SEPARATOR_PREFIX: &str = "---";

/// Permission bits for created directories and files (rwxr-xr-x).
#[cfg(unix)]
pub const CREATE_MODE: u32 = 0o755;

/// Where rendered files go. Selected once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Every file is rendered, in order, into one stream.
    Stream {
        /// Emit `---<name>` before each file's content.
        separator: bool,
    },
    /// Every file is written below `root`.
    Tree {
        root: PathBuf,
        /// Optional segment inserted between `root` and each file's path.
        project_name: Option<String>,
    },
}

impl OutputMode {
    /// Directory that receives the generated tree, `None` in stream mode.
    pub fn generation_root(&self) -> Option<PathBuf> {
        match self {
            OutputMode::Stream { .. } => None,
            OutputMode::Tree { root, project_name } => {
                let mut dir = root.clone();
                push_normal_components(&mut dir, project_name.as_deref().unwrap_or_default());
                Some(dir)
            }
        }
    }
}

/// Computes `root[/project_name][/relative_path]/name`.
///
/// Only plain components of `project_name`, `relative_path` and `name` are
/// joined: root prefixes, `.` and `..` are dropped, so the result always
/// stays below `root`. An empty path places the file in the root itself.
pub fn resolve_target_path<P: AsRef<Path>>(
    root: P,
    project_name: Option<&str>,
    relative_path: &str,
    name: &str,
) -> PathBuf {
    let mut target = root.as_ref().to_path_buf();
    for segment in [project_name.unwrap_or_default(), relative_path, name] {
        push_normal_components(&mut target, segment);
    }
    target
}

fn push_normal_components(target: &mut PathBuf, segment: &str) {
    for part in normal_components(segment) {
        target.push(part);
    }
}

fn normal_components(segment: &str) -> impl Iterator<Item = &std::ffi::OsStr> {
    Path::new(segment).components().filter_map(|component| match component {
        Component::Normal(part) => Some(part),
        _ => None,
    })
}

/// Creates `path` and any missing ancestors.
pub fn create_dir_all(path: &Path) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(CREATE_MODE);
    }
    builder
        .create(path)
        .map_err(|source| Error::FilesystemFailure { path: path.to_path_buf(), source })
}

/// Creates `path`, truncating it if it already exists.
fn create_file(path: &Path) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(CREATE_MODE);
    }
    options
        .open(path)
        .map_err(|source| Error::FilesystemFailure { path: path.to_path_buf(), source })
}

/// Renders file entries into their output sink.
pub struct Processor<'a> {
    renderer: &'a dyn TemplateRenderer,
    mode: &'a OutputMode,
    stream: &'a mut dyn Write,
}

impl<'a> Processor<'a> {
    /// Creates a processor. `stream` is only written to in stream mode.
    pub fn new(
        renderer: &'a dyn TemplateRenderer,
        mode: &'a OutputMode,
        stream: &'a mut dyn Write,
    ) -> Self {
        Self { renderer, mode, stream }
    }

    /// Creates the generation root in tree mode. Does nothing in stream mode.
    pub fn prepare(&self) -> Result<()> {
        if let Some(root) = self.mode.generation_root() {
            debug!("Creating output directory {}", root.display());
            create_dir_all(&root)?;
        }
        Ok(())
    }

    /// Renders one file entry.
    ///
    /// In tree mode the entry's parent directories are created first and an
    /// existing file at the target path is overwritten.
    ///
    /// # Errors
    /// * `Error::FilesystemFailure` if a directory or the file cannot be created
    /// * `Error::PopulateFailure` wrapping the render error of the entry's template
    pub fn process(&mut self, global: &Values, entry: &FileEntry) -> Result<()> {
        let context = RenderContext::build(global, &entry.local);

        match self.mode {
            OutputMode::Stream { separator } => {
                debug!("Rendering '{}' to the output stream", entry.name);
                if *separator {
                    write!(self.stream, "{SEPARATOR_PREFIX}{}", entry.name)?;
                }
                render_entry(self.renderer, entry, &context, &mut *self.stream)?;
                self.stream.flush()?;
            }
            OutputMode::Tree { root, project_name } => {
                if normal_components(&entry.name).next().is_none() {
                    return Err(Error::FilesystemFailure {
                        path: PathBuf::from(&entry.name),
                        source: io::Error::new(
                            io::ErrorKind::InvalidInput,
                            "file name does not name a file",
                        ),
                    });
                }
                let target =
                    resolve_target_path(root, project_name.as_deref(), &entry.path, &entry.name);
                if let Some(parent) = target.parent() {
                    create_dir_all(parent)?;
                }

                debug!("Writing file: {}", target.display());
                let mut writer = BufWriter::new(create_file(&target)?);
                render_entry(self.renderer, entry, &context, &mut writer)?;
                writer
                    .flush()
                    .map_err(|source| Error::FilesystemFailure { path: target, source })?;
            }
        }
        Ok(())
    }
}

fn render_entry(
    renderer: &dyn TemplateRenderer,
    entry: &FileEntry,
    context: &RenderContext<'_>,
    sink: &mut dyn Write,
) -> Result<()> {
    renderer
        .render_to(&entry.template, context, sink)
        .map_err(|err| Error::PopulateFailure { file: entry.name.clone(), source: Box::new(err) })
}
