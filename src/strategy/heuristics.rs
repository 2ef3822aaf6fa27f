//! Skip rules for fragments that illustrate rather than run.
//!
//! Each strategy evaluates its rules in list order and the first match wins,
//! so the reported reason is stable for a given body.

use crate::config::ShellConfig;
use regex::Regex;
use std::sync::LazyLock;

pub const DOCUMENTATION_EXAMPLE: &str = "documentation example";
pub const VARIABLE_PLACEHOLDERS: &str = "contains variable placeholders";
pub const INTERACTIVE_COMMAND: &str = "interactive command";
pub const PARTIAL_EXAMPLE: &str = "partial example for documentation";

/// Shell-style uppercase placeholders such as `${API_KEY}`.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| match Regex::new(r"\$\{[A-Z_]+\}") {
    Ok(regex) => regex,
    Err(err) => panic!("Invalid placeholder regex: {err}"),
});

#[derive(Debug, Clone)]
enum Predicate {
    ContainsAny(Vec<String>),
    Placeholder,
}

/// A named predicate over a fragment body with the reason reported on a match.
#[derive(Debug, Clone)]
pub struct SkipRule {
    pub name: &'static str,
    pub reason: &'static str,
    predicate: Predicate,
}

impl SkipRule {
    fn contains_any(name: &'static str, reason: &'static str, tokens: &[&str]) -> Self {
        Self {
            name,
            reason,
            predicate: Predicate::ContainsAny(tokens.iter().map(|t| t.to_string()).collect()),
        }
    }

    fn placeholder() -> Self {
        Self {
            name: "placeholder",
            reason: VARIABLE_PLACEHOLDERS,
            predicate: Predicate::Placeholder,
        }
    }

    pub fn matches(&self, body: &str) -> bool {
        match &self.predicate {
            Predicate::ContainsAny(tokens) => tokens.iter().any(|token| body.contains(token.as_str())),
            Predicate::Placeholder => PLACEHOLDER.is_match(body),
        }
    }
}

/// Returns the first rule, in order, that matches `body`.
pub fn first_match<'a>(rules: &'a [SkipRule], body: &str) -> Option<&'a SkipRule> {
    rules.iter().find(|rule| rule.matches(body))
}

/// Rules for shell fragments: prompts and output, placeholders, interactive commands.
pub fn shell_rules(config: &ShellConfig) -> Vec<SkipRule> {
    let interactive: Vec<&str> = config
        .interactive_commands
        .iter()
        .map(String::as_str)
        .filter(|token| !token.is_empty())
        .collect();

    vec![
        SkipRule::contains_any(
            "prompt-or-output",
            DOCUMENTATION_EXAMPLE,
            &["$ ", "# Output:", "..."],
        ),
        SkipRule::placeholder(),
        SkipRule::contains_any("interactive", INTERACTIVE_COMMAND, &interactive),
    ]
}

/// Rules for Python fragments: elided code, placeholders.
pub fn python_rules() -> Vec<SkipRule> {
    vec![
        SkipRule::contains_any("elided", PARTIAL_EXAMPLE, &["...", "# ..."]),
        SkipRule::placeholder(),
    ]
}
