//! External command specs whose exit status is the only signal consumed.

use std::fmt;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

/// A program plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Run to completion and report whether it exited successfully.
    ///
    /// Spawn failures count as failure. With `quiet`, stdout and stderr are
    /// discarded; otherwise they are inherited so privilege prompts and
    /// installer progress stay visible.
    pub async fn succeeds(&self, quiet: bool) -> bool {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if quiet {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
        }

        match cmd.status().await {
            Ok(status) => {
                debug!(command = %self, code = ?status.code(), "command finished");
                status.success()
            }
            Err(e) => {
                debug!(command = %self, error = %e, "command failed to spawn");
                false
            }
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
