use crate::extractor::{extract_fragments, CodeFragment};
use crate::language::Strategy;
use crate::outcome::{Outcome, RunResult};
use crate::strategy::Verifier;
use futures::stream::{self, StreamExt};
use std::fmt;
use std::path::{Path, PathBuf};

/// Where a document is in its pass through the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DocumentState {
    NotStarted,
    Extracting,
    Verifying { done: usize, total: usize },
    Done,
}

impl fmt::Display for DocumentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentState::NotStarted => f.write_str("not started"),
            DocumentState::Extracting => f.write_str("extracting"),
            DocumentState::Verifying { done, total } => write!(f, "verifying {} of {}", done, total),
            DocumentState::Done => f.write_str("done"),
        }
    }
}

/// Drives extraction and verification over a list of documents.
///
/// Documents are processed in the order given and fragments in the order they
/// appear. With `jobs > 1` the fragments of one document are verified
/// concurrently, but results are buffered so the [`RunResult`] keeps
/// discovery order.
pub struct Runner {
    verifier: Verifier,
    jobs: usize,
}

impl Runner {
    pub fn new(verifier: Verifier) -> Self {
        let jobs = verifier.config().effective_jobs().max(1);
        Self { verifier, jobs }
    }

    /// Overrides the configured concurrency.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Verifies every fragment of every document.
    ///
    /// Never fails: missing or unreadable documents are warned about and
    /// contribute no fragments.
    pub async fn run(&self, documents: &[PathBuf]) -> RunResult {
        let mut result = RunResult::new();

        log::info!(
            "Verifying {} documentation file(s) with {} job(s)",
            documents.len(),
            self.jobs
        );

        for path in documents {
            self.run_document(path, &mut result).await;
        }

        result
    }

    async fn run_document(&self, path: &Path, result: &mut RunResult) {
        let mut state = DocumentState::NotStarted;

        if !path.exists() {
            log::warn!("File not found: {}", path.display());
            return;
        }

        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Failed to read {}: {}", path.display(), e);
                return;
            }
        };

        transition(path, &mut state, DocumentState::Extracting);
        let fragments: Vec<CodeFragment> = extract_fragments(path, &content).collect();
        log::info!(
            "Found {} code example(s) in {}",
            fragments.len(),
            path.display()
        );

        let total = fragments.len();
        transition(path, &mut state, DocumentState::Verifying { done: 0, total });

        let verifier = &self.verifier;
        let mut outcomes = stream::iter(fragments)
            .map(|fragment| async move {
                let outcome = verifier.verify(&fragment).await;
                (fragment, outcome)
            })
            .buffered(self.jobs);

        let mut done = 0;
        while let Some((fragment, outcome)) = outcomes.next().await {
            done += 1;
            report_progress(&fragment, &outcome, done, total);
            result.push(fragment, outcome);
            state = DocumentState::Verifying { done, total };
        }

        transition(path, &mut state, DocumentState::Done);
    }
}

fn transition(path: &Path, state: &mut DocumentState, next: DocumentState) {
    log::debug!("{}: {} -> {}", path.display(), state, next);
    *state = next;
}

fn report_progress(fragment: &CodeFragment, outcome: &Outcome, done: usize, total: usize) {
    log::info!(
        "  [{}/{}] {} example at line {} ({}): {}",
        done,
        total,
        display_language(&fragment.language),
        fragment.line_number,
        Strategy::for_tag(&fragment.language),
        outcome
    );
    if let Outcome::Failed(reason) = outcome {
        log::error!(
            "{}:{} ({}) failed: {}",
            fragment.source_path.display(),
            fragment.line_number,
            display_language(&fragment.language),
            reason
        );
    }
}

fn display_language(language: &str) -> &str {
    if language.is_empty() {
        "untagged"
    } else {
        language
    }
}
