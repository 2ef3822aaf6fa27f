//! Common test utilities for integration tests
//!
//! This module contains shared test fixtures and helper functions used across
//! integration tests. These utilities are not compiled into the library.

use anyhow::Result;
use doc_check_code::{locate_documents, CheckConfig, RunResult, Runner, Verifier};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Isolated test fixture with automatic cleanup
///
/// Creates a temporary copy of a fixture project, allowing tests to run
/// in parallel without interfering with each other.
pub struct TestFixture {
    _project_dir: TempDir,
    project_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture from a specific source directory
    pub fn new(source: impl AsRef<Path>) -> Result<Self> {
        let project_dir = TempDir::new()?;

        copy_dir_all(source.as_ref(), project_dir.path())?;

        Ok(Self {
            project_path: project_dir.path().to_path_buf(),
            _project_dir: project_dir,
        })
    }

    /// Get the path to the project root
    pub fn root(&self) -> &Path {
        &self.project_path
    }

    /// Discover and verify every document of the fixture with default settings
    pub async fn run(&self) -> Result<RunResult> {
        self.run_with(CheckConfig::default(), &[]).await
    }

    /// Verify the fixture with `config`, limited to `files` when non-empty
    pub async fn run_with(&self, config: CheckConfig, files: &[PathBuf]) -> Result<RunResult> {
        let documents = locate_documents(files, self.root(), &config.discovery.patterns)?;
        Ok(Runner::new(Verifier::new(config)).run(&documents).await)
    }

    /// Run the doc-check-code binary with `--root` pointing at the fixture
    pub fn run_binary(&self, args: &[&str]) -> Result<Output> {
        let output = Command::new(env!("CARGO_BIN_EXE_doc-check-code"))
            .arg("--root")
            .arg(self.root())
            .args(args)
            .output()?;
        Ok(output)
    }
}

/// Recursively copy all files and directories from src to dst
fn copy_dir_all(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<()> {
    std::fs::create_dir_all(&dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let ty = entry.file_type()?;
        if ty.is_dir() {
            copy_dir_all(entry.path(), dst.as_ref().join(entry.file_name()))?;
        } else {
            std::fs::copy(entry.path(), dst.as_ref().join(entry.file_name()))?;
        }
    }
    Ok(())
}
