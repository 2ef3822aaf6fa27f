//! Integration tests for doc-check-code
//!
//! These tests verify the full end-to-end workflow by running the checker
//! against test fixtures in isolated environments.
//!
//! ## Test Architecture
//!
//! Each test uses `TestFixture` to create an isolated environment with:
//! - Temporary project directory (copy of fixtures)
//! - Automatic cleanup via RAII (Drop trait)
//!
//! Library-level tests drive `Runner` directly; CLI tests run the built
//! binary and assert on exit status and output.
//!
//! ## Adding New Tests
//!
//! 1. Create a new fixture in tests/fixtures/ if needed
//! 2. Use `TestFixture::new("path/to/fixture")`
//! 3. Use `#[tokio::test]` for async tests
//! 4. Assert on the returned `RunResult` or process output

mod common;

use anyhow::Result;
use common::TestFixture;
use doc_check_code::{CheckConfig, DiscoveryConfig, Outcome, DOCUMENTATION_EXAMPLE};

fn python_available() -> bool {
    std::process::Command::new("python3")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

// ===== Library tests =====

#[tokio::test]
async fn integration_valid_examples_pass() -> Result<()> {
    let fixture = TestFixture::new("tests/fixtures/valid_cases")?;
    let result = fixture.run().await?;

    let failures: Vec<_> = result.failed().collect();
    assert!(failures.is_empty(), "Unexpected failures: {:?}", failures);
    assert!(result.success());
    assert_eq!(result.total(), 10);
    assert_eq!(result.passed().count(), 6);
    assert_eq!(result.skipped().count(), 4);
    Ok(())
}

#[tokio::test]
async fn integration_documents_processed_in_sorted_order() -> Result<()> {
    let fixture = TestFixture::new("tests/fixtures/valid_cases")?;
    let result = fixture.run().await?;

    let mut files: Vec<_> = result
        .entries()
        .iter()
        .map(|(f, _)| f.source_path.strip_prefix(fixture.root()).map(|p| p.to_path_buf()))
        .collect::<Result<_, _>>()?;
    files.dedup();

    assert_eq!(
        files,
        vec![
            std::path::PathBuf::from("README.md"),
            std::path::PathBuf::from("docs/guide.md"),
            std::path::PathBuf::from("docs/reference/config.md"),
        ]
    );

    let (first, outcome) = &result.entries()[1];
    assert_eq!(first.line_number, 13);
    assert_eq!(outcome, &Outcome::skipped(DOCUMENTATION_EXAMPLE));
    Ok(())
}

#[tokio::test]
async fn integration_broken_examples_detected() -> Result<()> {
    let fixture = TestFixture::new("tests/fixtures/error_cases")?;
    let result = fixture.run().await?;

    assert!(!result.success());
    let failures: Vec<_> = result
        .failed()
        .map(|(f, reason)| (f.language.as_str(), f.line_number, reason.to_string()))
        .collect();
    assert_eq!(failures.len(), 2, "{:?}", failures);

    let (language, line, reason) = &failures[0];
    assert_eq!((*language, *line), ("toml", 5));
    assert!(reason.contains("duplicate key"), "{}", reason);

    let (language, line, reason) = &failures[1];
    assert_eq!((*language, *line), ("python", 12));
    if python_available() {
        assert!(reason.starts_with("syntax error:"), "{}", reason);
    }

    assert_eq!(result.passed().count(), 1);
    Ok(())
}

#[tokio::test]
async fn integration_missing_explicit_file_is_not_fatal() -> Result<()> {
    let fixture = TestFixture::new("tests/fixtures/valid_cases")?;
    let files = vec![
        fixture.root().join("does-not-exist.md"),
        fixture.root().join("docs/reference/config.md"),
    ];

    let result = fixture.run_with(CheckConfig::default(), &files).await?;
    assert_eq!(result.total(), 3);
    assert!(result.success());
    Ok(())
}

#[tokio::test]
async fn integration_repeated_runs_are_identical() -> Result<()> {
    let fixture = TestFixture::new("tests/fixtures/error_cases")?;

    let first = fixture.run().await?;
    let second = fixture.run().await?;

    let summary = |r: &doc_check_code::RunResult| -> Vec<(usize, Outcome)> {
        r.entries()
            .iter()
            .map(|(f, o)| (f.line_number, o.clone()))
            .collect()
    };
    assert_eq!(summary(&first), summary(&second));
    Ok(())
}

#[tokio::test]
async fn integration_custom_discovery_patterns() -> Result<()> {
    let fixture = TestFixture::new("tests/fixtures/valid_cases")?;
    let config = CheckConfig {
        discovery: DiscoveryConfig {
            patterns: vec!["docs/reference/*.md".to_string()],
        },
        ..CheckConfig::default()
    };

    let result = fixture.run_with(config, &[]).await?;
    assert_eq!(result.total(), 3);
    Ok(())
}

// ===== CLI tests =====

#[test]
fn cli_valid_project_exits_zero() -> Result<()> {
    let fixture = TestFixture::new("tests/fixtures/valid_cases")?;
    let output = fixture.run_binary(&[])?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stdout: {}", stdout);
    assert!(stdout.contains("Verifying 3 documentation file(s)..."));
    assert!(stdout.contains("Total examples:   10"));
    assert!(stdout.contains("All examples passed verification!"));
    Ok(())
}

#[test]
fn cli_failures_exit_one_with_detail() -> Result<()> {
    let fixture = TestFixture::new("tests/fixtures/error_cases")?;
    let output = fixture.run_binary(&[])?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("Failed examples:"));
    assert!(stdout.contains("  Line: 5"));
    assert!(stdout.contains("  Language: toml"));
    assert!(stdout.contains("  Code preview: key = \"value\""));
    assert!(stdout.contains("Some examples failed verification!"));
    Ok(())
}

#[test]
fn cli_no_documents_exits_one() -> Result<()> {
    let fixture = TestFixture::new("tests/fixtures/empty_project")?;
    let output = fixture.run_binary(&[])?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("no documentation files found"), "{}", stderr);
    assert!(!stdout.contains("Summary"));
    Ok(())
}

#[test]
fn cli_missing_explicit_file_warns() -> Result<()> {
    let fixture = TestFixture::new("tests/fixtures/empty_project")?;
    let missing = fixture.root().join("missing.md");
    let output = fixture.run_binary(&[missing.to_str().unwrap_or_default()])?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success(), "stderr: {}", stderr);
    assert!(stderr.contains("[WARN]"), "{}", stderr);
    assert!(stderr.contains("File not found"), "{}", stderr);
    assert!(stdout.contains("Total examples:   0"));
    Ok(())
}

#[test]
fn cli_json_report() -> Result<()> {
    let fixture = TestFixture::new("tests/fixtures/error_cases")?;
    let output = fixture.run_binary(&["--format", "json"])?;

    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["success"], false);
    assert_eq!(report["total"], 3);
    assert_eq!(report["failed"], 2);
    assert_eq!(report["fragments"][0]["language"], "toml");
    assert_eq!(report["fragments"][2]["status"], "passed");
    Ok(())
}

#[test]
fn cli_config_file_in_root_is_used() -> Result<()> {
    let fixture = TestFixture::new("tests/fixtures/valid_cases")?;
    std::fs::write(
        fixture.root().join("doc-check.toml"),
        "[discovery]\npatterns = [\"README.md\"]\n",
    )?;

    let output = fixture.run_binary(&[])?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stdout: {}", stdout);
    assert!(stdout.contains("Verifying 1 documentation file(s)..."));
    assert!(stdout.contains("Total examples:   4"));
    Ok(())
}

#[test]
fn cli_invalid_config_is_fatal() -> Result<()> {
    let fixture = TestFixture::new("tests/fixtures/valid_cases")?;
    std::fs::write(
        fixture.root().join("doc-check.toml"),
        "[shell]\nprogram = \"sh; rm -rf /\"\n",
    )?;

    let output = fixture.run_binary(&[])?;
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("invalid character"), "{}", stderr);
    Ok(())
}
