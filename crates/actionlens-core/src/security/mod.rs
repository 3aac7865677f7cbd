pub mod pinning;
pub mod shell;

use crate::workflow::WorkflowDefinition;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Severity level for security findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    /// Prefix used for this severity in the rendered report.
    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Critical => "⛔",
            Severity::Warning => "⚠️",
            Severity::Info => "ℹ️",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
        }
    }
}

/// A single security finding raised against one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
    pub job: String,
    pub step: String,
}

impl Finding {
    /// The finding as it appears in the report, prefixed with its severity symbol.
    pub fn display(&self) -> String {
        format!("{} {}", self.severity.symbol(), self.message)
    }
}

/// Findings grouped by severity, each group in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityFindings {
    pub critical: Vec<Finding>,
    pub warning: Vec<Finding>,
    pub info: Vec<Finding>,
}

impl SecurityFindings {
    pub fn push(&mut self, finding: Finding) {
        match finding.severity {
            Severity::Critical => self.critical.push(finding),
            Severity::Warning => self.warning.push(finding),
            Severity::Info => self.info.push(finding),
        }
    }

    pub fn by_severity(&self, severity: Severity) -> &[Finding] {
        match severity {
            Severity::Critical => &self.critical,
            Severity::Warning => &self.warning,
            Severity::Info => &self.info,
        }
    }

    /// Every finding, critical first.
    pub fn iter(&self) -> impl Iterator<Item = &Finding> {
        self.critical
            .iter()
            .chain(self.warning.iter())
            .chain(self.info.iter())
    }

    pub fn total(&self) -> usize {
        self.critical.len() + self.warning.len() + self.info.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Scan every step of every job for unsafe action pins and shell patterns.
///
/// Jobs and steps are visited in definition order; within a step the pin
/// rule runs before the shell rules. Findings are never deduplicated.
pub fn scan(workflow: &WorkflowDefinition) -> SecurityFindings {
    let mut findings = SecurityFindings::default();

    for (job, step) in workflow.steps() {
        if let Some(uses) = &step.uses {
            if let Some(finding) = pinning::check_pin(&job.id, step, uses) {
                findings.push(finding);
            }
        }
        if let Some(run) = &step.run {
            for finding in shell::check_command(&job.id, step, run) {
                findings.push(finding);
            }
        }
    }

    debug!(
        critical = findings.critical.len(),
        warning = findings.warning.len(),
        info = findings.info.len(),
        "security scan complete"
    );
    findings
}
