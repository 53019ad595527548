use crate::error::{ReleaseError, Result};
use std::path::Path;
use std::process::Command;

/// Captured result of an external command
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Stdout and stderr joined for error reports
    pub fn combined(&self) -> String {
        let stdout = self.stdout.trim_end();
        let stderr = self.stderr.trim_end();
        match (stdout.is_empty(), stderr.is_empty()) {
            (true, true) => format!("(no output, exit code {:?})", self.status),
            (false, true) => stdout.to_string(),
            (true, false) => stderr.to_string(),
            (false, false) => format!("{}\n{}", stdout, stderr),
        }
    }
}

/// Process execution capability used by the system git backend
pub trait CommandRunner {
    /// Run `program` with `args` in `cwd` and wait for it to finish.
    ///
    /// A non-zero exit is not an error here; only failing to start the
    /// process is.
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput>;
}

/// Runs commands with `std::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput> {
        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(|e| {
                ReleaseError::git(
                    format!("{} {}", program, args.join(" ")),
                    format!("failed to start: {}", e),
                )
            })?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_combined_output() {
        let output = CommandOutput {
            status: Some(1),
            stdout: "out\n".to_string(),
            stderr: "err\n".to_string(),
        };
        assert_eq!(output.combined(), "out\nerr");
        assert!(!output.success());
    }

    #[test]
    fn test_combined_output_empty() {
        let output = CommandOutput {
            status: Some(128),
            ..Default::default()
        };
        assert!(output.combined().contains("128"));
    }

    #[test]
    #[serial]
    fn test_missing_program_is_git_failure() {
        let err = SystemRunner
            .run(
                "definitely-not-a-real-program-xyz",
                &["--version"],
                Path::new("."),
            )
            .unwrap_err();
        assert!(matches!(err, ReleaseError::GitCommandFailed { .. }));
        assert!(err.to_string().contains("failed to start"));
    }
}
