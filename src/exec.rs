//! External command execution.
//!
//! Diagnostic tools (`lspci`, `ethtool`, `mstpctl`) are run through the
//! [`CommandRunner`] capability so that callers can substitute canned output
//! in tests. Failures are reported as [`ExecError`]; every caller in this crate
//! treats them as "no data" rather than as fatal.

use std::process::Command;
use tracing::{debug, trace};

/// Errors raised while running an external command.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with status {code:?}")]
    NonZeroExit { program: String, code: Option<i32> },

    #[error("'{program}' produced non UTF-8 output")]
    InvalidOutput { program: String },
}

/// Runs an external program and returns its standard output.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[&str]) -> Result<String, ExecError>;
}

/// Runs commands on the local system via `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<String, ExecError> {
        trace!("exec: {} {}", program, args.join(" "));

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| ExecError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if !output.status.success() {
            debug!(
                "'{}' failed: {}",
                program,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Err(ExecError::NonZeroExit {
                program: program.to_string(),
                code: output.status.code(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| ExecError::InvalidOutput {
            program: program.to_string(),
        })
    }
}

/// Runs a command, collapsing any failure to an empty string.
pub fn run_or_empty(runner: &dyn CommandRunner, program: &str, args: &[&str]) -> String {
    match runner.run(program, args) {
        Ok(out) => out,
        Err(e) => {
            debug!("{}", e);
            String::new()
        }
    }
}
