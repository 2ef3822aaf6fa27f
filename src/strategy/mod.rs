//! Per-language verification of extracted fragments.
//!
//! [`Verifier::verify`] resolves the fragment tag to a [`Strategy`], applies
//! that strategy's skip rules and runs the matching check. Checks never return
//! errors: anything that goes wrong while running one becomes a
//! [`Outcome::Failed`] carrying the message.

pub mod heuristics;
mod python;
mod shell;
mod structured;

use crate::config::CheckConfig;
use crate::extractor::CodeFragment;
use crate::language::Strategy;
use crate::outcome::Outcome;
use heuristics::{first_match, SkipRule};

/// Dispatches fragments to their strategy using one run's configuration.
///
/// Holds no per-fragment state, so one verifier can check any number of
/// fragments concurrently.
pub struct Verifier {
    config: CheckConfig,
    shell_rules: Vec<SkipRule>,
    python_rules: Vec<SkipRule>,
}

impl Verifier {
    pub fn new(config: CheckConfig) -> Self {
        let shell_rules = heuristics::shell_rules(&config.shell);
        let python_rules = heuristics::python_rules();
        Self {
            config,
            shell_rules,
            python_rules,
        }
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Verifies one fragment with the strategy its tag resolves to.
    ///
    /// Skip rules are consulted first. The size limit only applies to
    /// fragments that would be handed to an external process.
    pub async fn verify(&self, fragment: &CodeFragment) -> Outcome {
        let strategy = Strategy::for_tag(&fragment.language);
        let body = fragment.body.as_str();

        if let Some(rule) = first_match(self.rules_for(strategy), body) {
            log::debug!("Skip rule '{}' matched {} fragment", rule.name, strategy);
            return Outcome::skipped(rule.reason);
        }

        if strategy.executes() && body.len() > self.config.max_fragment_bytes {
            return Outcome::failed(format!(
                "exceeds size limit of {} bytes ({} bytes)",
                self.config.max_fragment_bytes,
                body.len()
            ));
        }

        match strategy {
            Strategy::Shell => shell::verify(body, &self.config.shell).await,
            Strategy::Python => python::verify(body, &self.config.python).await,
            Strategy::Toml => structured::verify(body),
            Strategy::PassThrough | Strategy::Unrecognized => Outcome::Passed,
        }
    }

    fn rules_for(&self, strategy: Strategy) -> &[SkipRule] {
        match strategy {
            Strategy::Shell => &self.shell_rules,
            Strategy::Python => &self.python_rules,
            Strategy::Toml | Strategy::PassThrough | Strategy::Unrecognized => &[],
        }
    }
}
