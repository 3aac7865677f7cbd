//! Rules over the lower-cased text of `run:` commands.

use super::{Finding, Severity};
use crate::workflow::Step;
use tracing::debug;

/// A rule applied to one lower-cased shell command.
pub struct ShellRule {
    pub id: &'static str,
    pub severity: Severity,
    matches: fn(&str) -> bool,
    message: fn(&str) -> String,
}

/// Evaluated in this order for every `run:` step.
pub const SHELL_RULES: &[ShellRule] = &[
    ShellRule {
        id: "curl-without-fail",
        severity: Severity::Warning,
        matches: curl_without_fail,
        message: curl_message,
    },
    ShellRule {
        id: "wget",
        severity: Severity::Warning,
        matches: uses_wget,
        message: wget_message,
    },
    ShellRule {
        id: "sudo",
        severity: Severity::Critical,
        matches: uses_sudo,
        message: sudo_message,
    },
    ShellRule {
        id: "filesystem-write",
        severity: Severity::Info,
        matches: writes_file,
        message: write_message,
    },
];

fn curl_without_fail(cmd: &str) -> bool {
    cmd.contains("curl") && !cmd.starts_with("curl --fail")
}

fn uses_wget(cmd: &str) -> bool {
    cmd.contains("wget")
}

fn uses_sudo(cmd: &str) -> bool {
    cmd.contains("sudo")
}

// `>>` contains `>`
fn writes_file(cmd: &str) -> bool {
    cmd.contains('>')
}

fn curl_message(step: &str) -> String {
    format!("Unsafe curl usage without --fail in step '{step}'")
}

fn wget_message(step: &str) -> String {
    format!("Consider using curl --fail instead of wget in step '{step}'")
}

fn sudo_message(step: &str) -> String {
    format!("Sudo usage detected in step '{step}'")
}

fn write_message(step: &str) -> String {
    format!("File system write detected in step '{step}'")
}

/// Run every shell rule against a step's command, in rule order.
pub(crate) fn check_command(job: &str, step: &Step, run: &str) -> Vec<Finding> {
    let cmd = run.to_lowercase();
    let step_name = step.display_name();

    SHELL_RULES
        .iter()
        .filter(|rule| (rule.matches)(&cmd))
        .inspect(|rule| debug!(rule = rule.id, job, step = step_name, "shell rule matched"))
        .map(|rule| Finding {
            severity: rule.severity,
            message: (rule.message)(step_name),
            job: job.to_string(),
            step: step_name.to_string(),
        })
        .collect()
}
