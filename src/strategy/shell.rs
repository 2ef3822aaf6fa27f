use crate::config::ShellConfig;
use crate::exec::{in_scratch_dir, run_with_deadline, Completion};
use crate::outcome::Outcome;
use std::process::Command;

/// Runs a shell fragment in its own scratch directory.
///
/// Exit status is not inspected. Only a timeout or a failure to run the
/// shell at all fails the fragment.
pub async fn verify(body: &str, config: &ShellConfig) -> Outcome {
    let completion = in_scratch_dir(|dir| {
        let mut command = Command::new(&config.program);
        command.arg("-c").arg(body).current_dir(dir);
        run_with_deadline(command, config.timeout())
    })
    .await;

    match completion {
        Ok(Completion::Exited(output)) => {
            log::debug!(
                "Shell exited with {} in {}ms:\n{}",
                output.status,
                output.duration.as_millis(),
                output.combined()
            );
            Outcome::Passed
        }
        Ok(Completion::TimedOut) => {
            Outcome::failed(format!("timed out after {} seconds", config.timeout_secs))
        }
        Err(e) => Outcome::failed(format!("execution error: {:#}", e)),
    }
}
