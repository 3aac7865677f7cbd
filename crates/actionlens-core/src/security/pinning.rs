use super::{Finding, Severity};
use crate::workflow::Step;

/// Risk carried by the ref an action is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinRisk {
    /// Pinned to a moving branch (`@main`, `@master`).
    UnstableBranch,
    /// Pinned to the first major version tag.
    OutdatedMajor,
}

impl PinRisk {
    pub fn severity(&self) -> Severity {
        match self {
            PinRisk::UnstableBranch => Severity::Critical,
            PinRisk::OutdatedMajor => Severity::Warning,
        }
    }

    fn message(&self, uses: &str, step: &str) -> String {
        match self {
            PinRisk::UnstableBranch => format!(
                "Using unstable version in {uses} (step '{step}'). Specify a fixed version."
            ),
            PinRisk::OutdatedMajor => {
                format!("Consider updating {uses} to latest version (step '{step}')")
            }
        }
    }
}

/// Classify an action reference. References without an `@` ref are not judged.
pub fn classify_pin(uses: &str) -> Option<PinRisk> {
    if !uses.contains('@') {
        return None;
    }
    if uses.contains("@master") || uses.contains("@main") {
        Some(PinRisk::UnstableBranch)
    } else if uses.contains("@v1") {
        Some(PinRisk::OutdatedMajor)
    } else {
        None
    }
}

pub(crate) fn check_pin(job: &str, step: &Step, uses: &str) -> Option<Finding> {
    let risk = classify_pin(uses)?;
    Some(Finding {
        severity: risk.severity(),
        message: risk.message(uses, step.display_name()),
        job: job.to_string(),
        step: step.display_name().to_string(),
    })
}
