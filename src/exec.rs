use anyhow::{Context, Result};
use nix::errno::Errno;
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use std::future::Future;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// A freshly created, uniquely named working directory for one check.
///
/// Call [`ScratchDir::release`] when the check is over. If the owner is
/// dropped early (panic, cancelled future) the directory is still removed by
/// the underlying [`TempDir`].
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    pub fn acquire() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("doc-check-")
            .tempdir()
            .context("Failed to create temporary directory")?;
        log::debug!("Acquired scratch directory {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Removes the directory and everything the check left in it.
    pub fn release(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            log::warn!(
                "Failed to remove scratch directory {}: {}",
                path.display(),
                e
            );
        }
    }
}

/// Runs `check` with the path of a fresh scratch directory.
///
/// The directory is released once `check` finishes, whether it returned an
/// error, saw its process time out or completed normally.
pub async fn in_scratch_dir<F, Fut, T>(check: F) -> Result<T>
where
    F: FnOnce(PathBuf) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let scratch = ScratchDir::acquire()?;
    let result = check(scratch.path().to_path_buf()).await;
    scratch.release();
    result
}

/// What a child process did before its deadline.
#[derive(Debug)]
pub enum Completion {
    Exited(ProcessOutput),
    TimedOut,
}

#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl ProcessOutput {
    /// Stdout followed by stderr, as a single block.
    pub fn combined(&self) -> String {
        let mut combined = self.stdout.clone();
        if !combined.is_empty() && !self.stderr.is_empty() && !combined.ends_with('\n') {
            combined.push('\n');
        }
        combined.push_str(&self.stderr);
        combined
    }

    /// The checker's diagnostic: stderr when present, stdout otherwise.
    pub fn diagnostic(&self) -> &str {
        if !self.stderr.trim().is_empty() {
            &self.stderr
        } else {
            &self.stdout
        }
    }
}

/// Runs `command` until it exits or `timeout` elapses.
///
/// The child gets a null stdin, piped stdout/stderr and its own process group.
/// On timeout the whole group is killed before this returns, so background
/// jobs started by a snippet do not outlive the check.
///
/// # Errors
///
/// Returns an error if the process cannot be spawned or its output cannot be
/// collected. A non-zero exit status is not an error.
pub async fn run_with_deadline(
    mut command: std::process::Command,
    timeout: Duration,
) -> Result<Completion> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .process_group(0);

    let program = command.get_program().to_string_lossy().into_owned();
    let mut command = tokio::process::Command::from(command);
    command.kill_on_drop(true);

    let start = Instant::now();
    let child = command
        .spawn()
        .with_context(|| format!("Failed to execute '{}'", program))?;
    let pid = child.id();

    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(output) => {
            let output =
                output.with_context(|| format!("Failed to collect output of '{}'", program))?;
            Ok(Completion::Exited(ProcessOutput {
                status: output.status,
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                duration: start.elapsed(),
            }))
        }
        Err(_) => {
            if let Some(pid) = pid {
                kill_process_group(pid);
            }
            log::debug!("'{}' timed out after {:?}", program, timeout);
            Ok(Completion::TimedOut)
        }
    }
}

/// Sends SIGKILL to the process group led by `pid`.
fn kill_process_group(pid: u32) {
    let Ok(raw) = i32::try_from(pid) else {
        log::warn!("Process id {} out of range, cannot kill its group", pid);
        return;
    };

    match killpg(Pid::from_raw(raw), Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(e) => log::warn!("Failed to kill process group {}: {}", raw, e),
    }
}
