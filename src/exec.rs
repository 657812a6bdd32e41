//! Command executor facade for OS and firmware queries.

use std::process::Command;

/// Runs a named external command and hands back its raw text output.
///
/// Implementations return `None` when the command cannot be launched or
/// writes to stderr; callers treat that uniformly as a query failure. Every
/// call is a fresh, blocking, point-in-time read with no timeout or retry.
pub trait CommandExecutor: Send + Sync {
    /// Run `args` and return stdout on clean success.
    fn output(&self, args: &[&str]) -> Option<String>;
}

/// The real subprocess-backed executor.
pub struct ProcessExecutor;

impl CommandExecutor for ProcessExecutor {
    fn output(&self, args: &[&str]) -> Option<String> {
        let (program, rest) = args.split_first()?;

        match Command::new(program).args(rest).output() {
            Ok(output) if output.stderr.is_empty() => {
                Some(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            Ok(output) => {
                tracing::error!(
                    "Command {:?} wrote to stderr: {}",
                    args,
                    String::from_utf8_lossy(&output.stderr).trim()
                );
                None
            }
            Err(err) => {
                tracing::error!("Failed to launch command {:?}: {}", args, err);
                None
            }
        }
    }
}
