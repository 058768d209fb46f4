//! Blocking action dispatch.
//!
//! Exactly one execution path per [`Action`] variant. Invocation failures
//! are not errors at this layer: the contract is "text or nothing", so a
//! non-zero exit still yields its captured streams and a command that
//! cannot even start yields nothing (with a warning for the operator).

use std::path::Path;
use std::process::{Command, Output, Stdio};

use tracing::warn;

use crate::job::Action;

/// Dispatch `action` and capture whatever text it produces.
pub(crate) fn run_action(action: &Action) -> Option<String> {
    match action {
        Action::Shell(command) => run_shell(command),
        Action::Script(path) => run_script(path),
        Action::Call { func, params } => {
            func(params).filter(|text| !text.is_empty())
        }
    }
}

/// Run a command line through the platform shell.
fn run_shell(command: &str) -> Option<String> {
    let (shell, flag) = if cfg!(target_os = "windows") {
        ("cmd", "/C")
    } else {
        ("sh", "-c")
    };

    let output = Command::new(shell)
        .arg(flag)
        .arg(command)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output();

    match output {
        Ok(output) => capture(output),
        Err(e) => {
            warn!("failed to run shell command '{}': {}", command, e);
            None
        }
    }
}

/// Run a script file as a program.
fn run_script(path: &Path) -> Option<String> {
    let output = Command::new(path)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output();

    match output {
        Ok(output) => capture(output),
        Err(e) => {
            warn!("failed to run script {:?}: {}", path, e);
            None
        }
    }
}

/// Combine a finished process's streams into one text blob, or nothing if
/// both were empty. Exit status is deliberately not inspected.
fn capture(output: Output) -> Option<String> {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    let mut text = String::new();
    if !stdout.is_empty() {
        text.push_str(&stdout);
    }
    if !stderr.is_empty() {
        if !text.is_empty() {
            text.push_str("\n--- stderr ---\n");
        }
        text.push_str(&stderr);
    }

    if text.is_empty() { None } else { Some(text) }
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
