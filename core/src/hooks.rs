use std::path::Path;
use std::process::{Command, Stdio};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookStatus {
    Succeeded,
    Failed(String),
}

impl HookStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Runs a descriptor hook. Failures are reported, never raised: the install
/// has already completed by the time a hook runs.
pub trait HookRunner {
    fn run(&self, command: &str, cwd: &Path) -> HookStatus;
}

/// Runs hooks through the platform shell with inherited stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellHookRunner;

impl HookRunner for ShellHookRunner {
    fn run(&self, command: &str, cwd: &Path) -> HookStatus {
        tracing::info!(cwd = %cwd.display(), "Running postinstall hook: {}", command);

        let status = shell_command(command)
            .current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status();

        match status {
            Ok(status) if status.success() => HookStatus::Succeeded,
            Ok(status) => HookStatus::Failed(format!("Command failed with status: {}", status)),
            Err(e) => HookStatus::Failed(format!("Failed to execute command: {}", e)),
        }
    }
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

#[cfg(not(windows))]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}
