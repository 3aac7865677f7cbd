//! One-shot audit: validate a raw workflow, analyze it and compose the report.

use crate::analyzer::efficiency::EfficiencyMetrics;
use crate::analyzer::metrics::PerformanceMetrics;
use crate::analyzer::quality::BuildQuality;
use crate::analyzer::{self, Analysis};
use crate::config::AnalysisConfig;
use crate::error::{ValidationError, WorkflowError};
use crate::report::{self, Report};
use crate::security::SecurityFindings;
use crate::workflow::{self, schema, WorkflowDefinition};
use chrono::NaiveDateTime;
use serde::Serialize;
use serde_yaml::Value;
use tracing::info;

/// Everything an audit produces.
#[derive(Debug, Clone, Serialize)]
pub struct AuditOutcome {
    pub workflow: WorkflowDefinition,
    pub security: SecurityFindings,
    pub efficiency: EfficiencyMetrics,
    pub quality: BuildQuality,
    pub metrics: PerformanceMetrics,
    pub report: Report,
}

impl AuditOutcome {
    pub fn markdown(&self) -> String {
        self.report.to_markdown()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Audit an already-parsed workflow document.
///
/// Validation failures abort before any analyzer runs.
pub fn audit(
    raw: Value,
    query: &str,
    generated_at: NaiveDateTime,
    config: &AnalysisConfig,
) -> Result<AuditOutcome, ValidationError> {
    let workflow = schema::validate(raw)?;
    Ok(audit_workflow(workflow, query, generated_at, config))
}

/// Audit workflow text, which may be wrapped in a markdown fence.
pub fn audit_str(
    text: &str,
    query: &str,
    generated_at: NaiveDateTime,
    config: &AnalysisConfig,
) -> Result<AuditOutcome, WorkflowError> {
    let workflow = workflow::parse_workflow(text)?;
    Ok(audit_workflow(workflow, query, generated_at, config))
}

/// Audit a validated workflow.
pub fn audit_workflow(
    workflow: WorkflowDefinition,
    query: &str,
    generated_at: NaiveDateTime,
    config: &AnalysisConfig,
) -> AuditOutcome {
    let Analysis {
        security,
        efficiency,
        quality,
        metrics,
    } = analyzer::analyze(&workflow, config.parallel);

    let report = report::compose(
        &workflow,
        &security,
        &efficiency,
        &quality,
        &metrics,
        query,
        generated_at,
    );

    info!(
        workflow = workflow.name.as_deref().unwrap_or("unnamed"),
        jobs = workflow.job_count(),
        findings = security.total(),
        "audit complete"
    );

    AuditOutcome {
        workflow,
        security,
        efficiency,
        quality,
        metrics,
        report,
    }
}
