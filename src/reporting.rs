use crate::outcome::RunResult;
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

/// Number of body characters shown for each failed fragment.
const PREVIEW_CHARS: usize = 100;

const RULE: &str = "======================================================================";

/// How the final report is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Writes the report for a finished run and returns whether the run succeeded.
///
/// A run succeeds when no fragment failed; a run with no fragments succeeds.
///
/// # Errors
///
/// Returns an error only if writing to `out` fails.
pub fn report(
    result: &RunResult,
    elapsed: Duration,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<bool> {
    match format {
        OutputFormat::Text => write_text(result, elapsed, out)?,
        OutputFormat::Json => write_json(result, elapsed, out)?,
    }
    Ok(result.success())
}

/// Fragment counts per lower-cased tag, sorted by tag.
fn language_counts(result: &RunResult) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for (fragment, _) in result.entries() {
        let tag = if fragment.language.is_empty() {
            "untagged".to_string()
        } else {
            fragment.language.to_lowercase()
        };
        *counts.entry(tag).or_insert(0) += 1;
    }
    counts
}

/// First [`PREVIEW_CHARS`] characters of `body`, marked when cut short.
fn preview(body: &str) -> String {
    let mut preview: String = body.chars().take(PREVIEW_CHARS).collect();
    if body.chars().nth(PREVIEW_CHARS).is_some() {
        preview.push_str("...");
    }
    preview
}

fn write_text(result: &RunResult, elapsed: Duration, out: &mut impl Write) -> Result<()> {
    let failed = result.failed().count();

    let stats_str = language_counts(result)
        .iter()
        .map(|(lang, count)| format!("{}: {}", lang, count))
        .collect::<Vec<_>>()
        .join(", ");

    writeln!(out)?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Documentation Verification Summary")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Total examples:   {}", result.total())?;
    writeln!(out, "Passed:           {}", result.passed().count())?;
    writeln!(out, "Failed:           {}", failed)?;
    writeln!(out, "Skipped:          {}", result.skipped().count())?;
    if !stats_str.is_empty() {
        writeln!(out, "By language:      {}", stats_str)?;
    }
    writeln!(out, "Finished in {}ms", elapsed.as_millis())?;
    writeln!(out, "{}", RULE)?;

    if failed > 0 {
        writeln!(out)?;
        writeln!(out, "Failed examples:")?;
        for (fragment, reason) in result.failed() {
            writeln!(out)?;
            writeln!(out, "  File: {}", fragment.source_path.display())?;
            writeln!(out, "  Line: {}", fragment.line_number)?;
            writeln!(out, "  Language: {}", fragment.language)?;
            writeln!(out, "  Error: {}", reason)?;
            if !fragment.context.is_empty() {
                writeln!(out, "  Context:")?;
                for line in fragment.context.lines() {
                    writeln!(out, "    {}", line)?;
                }
            }
            writeln!(out, "  Code preview: {}", preview(&fragment.body))?;
        }
    }

    writeln!(out)?;
    if failed > 0 {
        writeln!(out, "Some examples failed verification!")?;
    } else {
        writeln!(out, "All examples passed verification!")?;
    }

    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    success: bool,
    total: usize,
    passed: usize,
    failed: usize,
    skipped: usize,
    elapsed_ms: u64,
    languages: BTreeMap<String, usize>,
    fragments: Vec<JsonFragment<'a>>,
}

#[derive(Serialize)]
struct JsonFragment<'a> {
    file: String,
    line: usize,
    language: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

fn write_json(result: &RunResult, elapsed: Duration, out: &mut impl Write) -> Result<()> {
    let fragments = result
        .entries()
        .iter()
        .map(|(fragment, outcome)| JsonFragment {
            file: fragment.source_path.display().to_string(),
            line: fragment.line_number,
            language: &fragment.language,
            status: outcome.label(),
            reason: outcome.reason(),
        })
        .collect();

    let report = JsonReport {
        success: result.success(),
        total: result.total(),
        passed: result.passed().count(),
        failed: result.failed().count(),
        skipped: result.skipped().count(),
        elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        languages: language_counts(result),
        fragments,
    };

    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}
