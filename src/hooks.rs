//! Post-generation commands.
//! Runs the configured commands one after another in the generation root and
//! stops at the first failure. Only this module observes cancellation.

use std::io::{self, PipeReader, Read};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::debug;

use crate::config::CommandEntry;
use crate::error::{Error, Result};

/// How often a running command is checked for completion or cancellation.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Cooperative cancellation flag shared between the signal handler and the runner.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Runs `commands` in order, waiting for each before starting the next.
///
/// `working_dir` of `None` keeps the current working directory.
///
/// # Errors
/// * `Error::CommandFailure` for the first command that cannot be started or exits non-zero
/// * `Error::Cancelled` if `cancel` fires before or while a command runs
pub fn run_commands(
    commands: &[CommandEntry],
    working_dir: Option<&Path>,
    cancel: &CancellationToken,
) -> Result<()> {
    for command in commands {
        run_command(command, working_dir, cancel)?;
    }
    Ok(())
}

/// Runs a single command and returns its combined stdout and stderr output.
pub fn run_command(
    command: &CommandEntry,
    working_dir: Option<&Path>,
    cancel: &CancellationToken,
) -> Result<String> {
    if cancel.is_cancelled() {
        return Err(Error::Cancelled(command.to_string()));
    }

    debug!("Running command '{command}'");
    // stdout and stderr share one pipe so the captured output keeps the write order.
    let (reader, writer) = io::pipe()?;
    let mut process = Command::new(&command.name);
    process
        .args(&command.args)
        .stdin(Stdio::null())
        .stdout(writer.try_clone()?)
        .stderr(writer);
    if let Some(dir) = working_dir {
        process.current_dir(dir);
    }

    let spawned = process.spawn();
    // Drops the parent's write ends, otherwise the reader never sees EOF.
    drop(process);
    let mut child = spawned.map_err(|e| Error::CommandFailure {
        command: command.to_string(),
        output: String::new(),
        reason: e.to_string(),
    })?;

    let output = capture(reader);

    let status = match wait(&mut child, cancel) {
        Ok(status) => status,
        Err(err) => {
            // The reader thread is detached: a grandchild may still hold the pipe open.
            return Err(match err {
                WaitError::Cancelled => Error::Cancelled(command.to_string()),
                WaitError::Io(e) => Error::IoError(e),
            });
        }
    };

    let output = collect(output);
    if !status.success() {
        return Err(Error::CommandFailure {
            command: command.to_string(),
            output,
            reason: status.to_string(),
        });
    }

    debug!("Command '{command}' finished");
    Ok(output)
}

enum WaitError {
    Cancelled,
    Io(std::io::Error),
}

fn wait(
    child: &mut Child,
    cancel: &CancellationToken,
) -> std::result::Result<std::process::ExitStatus, WaitError> {
    loop {
        if let Some(status) = child.try_wait().map_err(WaitError::Io)? {
            return Ok(status);
        }
        if cancel.is_cancelled() {
            debug!("Cancellation requested, killing child process {}", child.id());
            let _ = child.kill();
            let _ = child.wait();
            return Err(WaitError::Cancelled);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Reads the child's output to the end on a separate thread so the child never blocks on a full pipe.
fn capture(mut pipe: PipeReader) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Err(e) = pipe.read_to_end(&mut buf) {
            debug!("Failed to read command output: {e}");
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn collect(handle: thread::JoinHandle<String>) -> String {
    handle.join().unwrap_or_else(|_| {
        debug!("Command output reader panicked");
        String::new()
    })
}
