use crate::error::{ReleaseError, Result};
use crate::hooks::HookContext;
use crate::release::{ReleaseContext, ReleaseExtension};
use crate::ui::{ProgressEvent, ProgressSink};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Executes release hook scripts
pub struct HookExecutor;

impl HookExecutor {
    /// Execute a hook script with the given context
    ///
    /// The script runs in `cwd` with RELEASE_* environment variables set.
    /// Exit code 0 is success; anything else is a hook error carrying the
    /// script's stdout and stderr.
    pub fn execute(script_path: &Path, cwd: &Path, context: &HookContext) -> Result<String> {
        if !script_path.exists() {
            return Err(ReleaseError::hook(format!(
                "Hook script not found: {}",
                script_path.display()
            )));
        }

        if !script_path.is_file() {
            return Err(ReleaseError::hook(format!(
                "Hook path is not a file: {}",
                script_path.display()
            )));
        }

        let output = Command::new(script_path)
            .current_dir(cwd)
            .envs(context.to_env_vars())
            .output()
            .map_err(|e| {
                ReleaseError::hook(format!(
                    "Failed to execute hook {}: {}",
                    script_path.display(),
                    e
                ))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReleaseError::hook(format!(
                "Hook {} failed with exit code {}\nStdout: {}\nStderr: {}",
                script_path.display(),
                output.status.code().unwrap_or(-1),
                stdout,
                stderr
            )));
        }

        Ok(stdout)
    }
}

/// RELEASE phase extension that runs a configured script
#[derive(Debug, Clone)]
pub struct ScriptHook {
    script: PathBuf,
    cwd: PathBuf,
    name: String,
}

impl ScriptHook {
    /// `script` is resolved against `cwd` when relative
    pub fn new(script: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
        let cwd = cwd.into();
        let script = script.into();
        let name = script.display().to_string();
        let script = if script.is_relative() {
            cwd.join(script)
        } else {
            script
        };
        ScriptHook { script, cwd, name }
    }
}

impl ReleaseExtension for ScriptHook {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, context: &ReleaseContext<'_>, sink: &dyn ProgressSink) -> Result<()> {
        let stdout = HookExecutor::execute(&self.script, &self.cwd, &HookContext::from(context))?;
        for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
            sink.emit(&ProgressEvent::Note {
                phase: crate::domain::Phase::Release,
                message: format!("hook: {}", line),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn context() -> HookContext {
        HookContext {
            release_version: "1.0.0".to_string(),
            next_version: "1.0.1-SNAPSHOT".to_string(),
            tag: "releases/v1.0.0".to_string(),
            release_branch: "main".to_string(),
            development_branch: "main".to_string(),
            candidate: false,
        }
    }

    #[test]
    fn test_nonexistent_hook_fails() {
        let result = HookExecutor::execute(
            Path::new("/nonexistent/path/to/hook.sh"),
            Path::new("."),
            &context(),
        );
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Hook script not found"));
    }

    #[test]
    fn test_hook_directory_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = HookExecutor::execute(dir.path(), Path::new("."), &context());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not a file"));
    }

    #[test]
    fn test_script_hook_resolves_relative_path() {
        let hook = ScriptHook::new("scripts/publish.sh", "/repo");
        assert_eq!(hook.name(), "scripts/publish.sh");
        assert_eq!(hook.script, PathBuf::from("/repo/scripts/publish.sh"));
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_script_hook_runs_with_env() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let script = dir.path().join("publish.sh");
        std::fs::write(&script, "#!/bin/sh\necho \"publishing $RELEASE_TAG\"\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let stdout = HookExecutor::execute(&script, dir.path(), &context()).unwrap();
        assert_eq!(stdout.trim(), "publishing releases/v1.0.0");
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_failing_script_reports_output() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let script = dir.path().join("fail.sh");
        std::fs::write(&script, "#!/bin/sh\necho upload refused >&2\nexit 3\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let err = HookExecutor::execute(&script, dir.path(), &context()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("exit code 3"));
        assert!(msg.contains("upload refused"));
    }
}
