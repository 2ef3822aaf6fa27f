use crate::extractor::CodeFragment;
use std::fmt;

/// The result of verifying one fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed(String),
    Skipped(String),
}

impl Outcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        Outcome::Failed(reason.into())
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Outcome::Skipped(reason.into())
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    /// Short lowercase label used in reports ("passed", "failed", "skipped").
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Passed => "passed",
            Outcome::Failed(_) => "failed",
            Outcome::Skipped(_) => "skipped",
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Outcome::Passed => None,
            Outcome::Failed(reason) | Outcome::Skipped(reason) => Some(reason),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason() {
            Some(reason) => write!(f, "{}: {}", self.label(), reason),
            None => write!(f, "{}", self.label()),
        }
    }
}

/// Every verified fragment of a run, in discovery order.
///
/// The run owns the only copy; partitions are computed on demand by the
/// accessors and nothing is persisted between invocations.
#[derive(Debug, Default)]
pub struct RunResult {
    entries: Vec<(CodeFragment, Outcome)>,
}

impl RunResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fragment: CodeFragment, outcome: Outcome) {
        self.entries.push((fragment, outcome));
    }

    pub fn entries(&self) -> &[(CodeFragment, Outcome)] {
        &self.entries
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn passed(&self) -> impl Iterator<Item = &CodeFragment> {
        self.entries
            .iter()
            .filter(|(_, outcome)| matches!(outcome, Outcome::Passed))
            .map(|(fragment, _)| fragment)
    }

    pub fn failed(&self) -> impl Iterator<Item = (&CodeFragment, &str)> {
        self.entries.iter().filter_map(|(fragment, outcome)| match outcome {
            Outcome::Failed(reason) => Some((fragment, reason.as_str())),
            _ => None,
        })
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&CodeFragment, &str)> {
        self.entries.iter().filter_map(|(fragment, outcome)| match outcome {
            Outcome::Skipped(reason) => Some((fragment, reason.as_str())),
            _ => None,
        })
    }

    /// True when no fragment failed, including a run with no fragments.
    pub fn success(&self) -> bool {
        !self.entries.iter().any(|(_, outcome)| outcome.is_failed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn fragment(line_number: usize) -> CodeFragment {
        CodeFragment {
            source_path: Arc::new(PathBuf::from("README.md")),
            line_number,
            language: "bash".to_string(),
            body: "ls".to_string(),
            context: String::new(),
        }
    }

    #[test]
    fn test_partitions_keep_discovery_order() {
        let mut result = RunResult::new();
        result.push(fragment(1), Outcome::Passed);
        result.push(fragment(5), Outcome::failed("boom"));
        result.push(fragment(9), Outcome::skipped("documentation example"));
        result.push(fragment(12), Outcome::failed("bang"));

        assert_eq!(result.total(), 4);
        assert_eq!(result.passed().count(), 1);
        let failed: Vec<_> = result.failed().map(|(f, r)| (f.line_number, r)).collect();
        assert_eq!(failed, vec![(5, "boom"), (12, "bang")]);
        let skipped: Vec<_> = result.skipped().map(|(_, r)| r).collect();
        assert_eq!(skipped, vec!["documentation example"]);
        assert!(!result.success());
    }

    #[test]
    fn test_empty_run_is_success() {
        assert!(RunResult::new().success());
    }

    #[test]
    fn test_display() {
        assert_eq!(Outcome::Passed.to_string(), "passed");
        assert_eq!(
            Outcome::skipped("interactive command").to_string(),
            "skipped: interactive command"
        );
    }
}
