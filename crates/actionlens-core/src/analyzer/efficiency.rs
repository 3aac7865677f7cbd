use crate::workflow::WorkflowDefinition;
use serde::{Deserialize, Serialize};

/// Above this many steps a workflow should be split into more jobs.
pub const SPLIT_STEP_THRESHOLD: usize = 10;

/// Structural metrics of a workflow plus the suggestions derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyMetrics {
    pub parallel_jobs: usize,
    pub total_steps: usize,
    pub matrix_builds: bool,
    pub caching_used: bool,
    pub optimization_suggestions: Vec<String>,
    pub best_practices: Vec<String>,
}

/// Compute structural metrics and derive optimization and job-hygiene suggestions.
pub fn analyze(workflow: &WorkflowDefinition) -> EfficiencyMetrics {
    let parallel_jobs = workflow.job_count();
    let total_steps = workflow.step_count();
    let matrix_builds = workflow.jobs.values().any(|job| job.has_matrix());
    let caching_used = workflow
        .steps()
        .any(|(_, step)| step.uses.as_deref().is_some_and(|u| u.contains("cache")));

    let mut optimization_suggestions = Vec::new();
    if total_steps > SPLIT_STEP_THRESHOLD {
        optimization_suggestions
            .push("🔄 Consider splitting into multiple jobs for better parallelization".to_string());
    }
    if !caching_used {
        optimization_suggestions.push("💾 Implement dependency caching to speed up builds".to_string());
    }
    if !matrix_builds && parallel_jobs == 1 {
        optimization_suggestions.push("⚡ Consider using matrix strategy for parallel testing".to_string());
    }

    // A missing continue-on-error is flagged even though false is the default.
    let mut best_practices = Vec::new();
    for job in workflow.jobs.values() {
        if !job.has_timeout() {
            best_practices.push(format!(
                "⏱️ Add timeout-minutes to job '{}' to prevent hanging jobs",
                job.id
            ));
        }
        if job.continue_on_error.is_none() {
            best_practices.push(format!(
                "🔄 Consider using continue-on-error in job '{}' for non-critical steps",
                job.id
            ));
        }
    }

    EfficiencyMetrics {
        parallel_jobs,
        total_steps,
        matrix_builds,
        caching_used,
        optimization_suggestions,
        best_practices,
    }
}
