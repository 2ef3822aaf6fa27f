use crate::config::PythonConfig;
use crate::exec::{in_scratch_dir, run_with_deadline, Completion};
use crate::outcome::Outcome;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

const SOURCE_FILE: &str = "snippet.py";

/// Syntax-checks a Python fragment with `<interpreter> -m py_compile`.
///
/// The fragment is never executed; only the compiler's verdict is used.
pub async fn verify(body: &str, config: &PythonConfig) -> Outcome {
    let completion = in_scratch_dir(|dir| async move { compile(body, config, &dir).await }).await;

    match completion {
        Ok(Completion::Exited(output)) if output.status.success() => Outcome::Passed,
        Ok(Completion::Exited(output)) => {
            Outcome::failed(format!("syntax error: {}", output.diagnostic().trim()))
        }
        Ok(Completion::TimedOut) => {
            Outcome::failed(format!("timed out after {} seconds", config.timeout_secs))
        }
        Err(e) => Outcome::failed(format!("verification error: {:#}", e)),
    }
}

async fn compile(body: &str, config: &PythonConfig, dir: &Path) -> Result<Completion> {
    let source = write_source_file(body, dir).await?;

    let mut command = Command::new(&config.interpreter);
    command
        .arg("-m")
        .arg("py_compile")
        .arg(&source)
        .current_dir(dir);

    run_with_deadline(command, config.timeout()).await
}

async fn write_source_file(body: &str, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(SOURCE_FILE);
    let mut file = File::create(&path)
        .await
        .with_context(|| format!("Failed to create temporary file: {}", path.display()))?;

    file.write_all(body.as_bytes()).await?;
    file.flush().await?;

    Ok(path)
}
