//! Fan-out of the independent workflow analyzers.
//!
//! The security scanner, efficiency analyzer and quality assessor only read
//! the workflow, so they run on the rayon pool side by side and are joined
//! before the metrics are aggregated.

pub mod efficiency;
pub mod metrics;
pub mod quality;

use crate::security::{self, SecurityFindings};
use crate::workflow::WorkflowDefinition;
use efficiency::EfficiencyMetrics;
use metrics::PerformanceMetrics;
use quality::BuildQuality;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Outputs of every analysis stage for one workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub security: SecurityFindings,
    pub efficiency: EfficiencyMetrics,
    pub quality: BuildQuality,
    pub metrics: PerformanceMetrics,
}

/// Run all analyzers on a workflow.
///
/// With `parallel` set the three analyzers run concurrently; the result is
/// identical either way.
pub fn analyze(workflow: &WorkflowDefinition, parallel: bool) -> Analysis {
    let (security, (efficiency, quality)) = if parallel {
        rayon::join(
            || security::scan(workflow),
            || rayon::join(|| efficiency::analyze(workflow), || quality::assess(workflow)),
        )
    } else {
        (
            security::scan(workflow),
            (efficiency::analyze(workflow), quality::assess(workflow)),
        )
    };

    let metrics = metrics::aggregate(&efficiency, &quality);
    debug!(
        parallel,
        findings = security.total(),
        steps = efficiency.total_steps,
        success_rate = quality.estimated_success_rate,
        efficiency_score = metrics.efficiency_score,
        "analysis complete"
    );

    Analysis {
        security,
        efficiency,
        quality,
        metrics,
    }
}
