//! Report composition: every analysis output plus the query, as an ordered
//! list of sections.

pub mod markdown;

use crate::analyzer::efficiency::EfficiencyMetrics;
use crate::analyzer::metrics::PerformanceMetrics;
use crate::analyzer::quality::BuildQuality;
use crate::security::{Finding, SecurityFindings, Severity};
use crate::workflow::WorkflowDefinition;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const NO_QUALITY_GATES: &str = "❌ No quality gates configured";
pub const NO_CRITICAL_ISSUES: &str = "✅ No critical issues found";
pub const NO_WARNINGS: &str = "✅ No warnings found";
pub const NO_INFORMATION: &str = "ℹ️ No additional information";
pub const NO_OPTIMIZATION_NEEDED: &str = "✅ No optimization needed";
pub const ALL_PRACTICES_IMPLEMENTED: &str = "✅ All recommended practices are implemented";

/// Fixed list of CI best practices closing every report.
pub const CI_BEST_PRACTICES: &[&str] = &[
    "✅ Keep workflow files small and focused",
    "✅ Use specific version tags for actions",
    "✅ Implement proper error handling",
    "✅ Use secrets for sensitive data",
    "✅ Regular maintenance and updates",
];

pub const REFERENCES: &[(&str, &str)] = &[
    (
        "GitHub Actions Security Hardening",
        "https://docs.github.com/en/actions/security-guides/security-hardening-for-github-actions",
    ),
    (
        "Workflow Optimization Guide",
        "https://docs.github.com/en/actions/using-workflows/about-workflows",
    ),
    (
        "GitHub Actions Best Practices",
        "https://docs.github.com/en/actions/learn-github-actions/best-practices-for-using-github-actions",
    ),
];

/// Report sections, in the order they are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Query,
    BuildQuality,
    Security,
    Efficiency,
    Implementation,
    Recommendations,
    PerformanceMetrics,
    BestPractices,
    References,
}

impl SectionKind {
    pub const ORDER: [SectionKind; 9] = [
        SectionKind::Query,
        SectionKind::BuildQuality,
        SectionKind::Security,
        SectionKind::Efficiency,
        SectionKind::Implementation,
        SectionKind::Recommendations,
        SectionKind::PerformanceMetrics,
        SectionKind::BestPractices,
        SectionKind::References,
    ];

    pub fn heading(&self) -> &'static str {
        match self {
            SectionKind::Query => "## 📝 Query",
            SectionKind::BuildQuality => "## 🏗️ Build Quality Analysis",
            SectionKind::Security => "## 🔒 Security Analysis",
            SectionKind::Efficiency => "## ⚡ Pipeline Efficiency",
            SectionKind::Implementation => "## 📊 Implementation Details",
            SectionKind::Recommendations => "### Recommended Improvements",
            SectionKind::PerformanceMetrics => "## 📈 Performance Metrics",
            SectionKind::BestPractices => "## 🔄 Continuous Integration Best Practices",
            SectionKind::References => "## 📚 References",
        }
    }

    /// Sections that open with sub-headings leave a blank line under the heading.
    pub fn blank_line_after_heading(&self) -> bool {
        matches!(self, SectionKind::BuildQuality | SectionKind::Implementation)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub kind: SectionKind,
    pub body: String,
}

/// A composed analysis report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub generated_at: NaiveDateTime,
    pub sections: Vec<Section>,
}

impl Report {
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn to_markdown(&self) -> String {
        markdown::render(self)
    }
}

/// Compose the report. Never fails; every empty list renders a placeholder.
pub fn compose(
    workflow: &WorkflowDefinition,
    security: &SecurityFindings,
    efficiency: &EfficiencyMetrics,
    quality: &BuildQuality,
    metrics: &PerformanceMetrics,
    query: &str,
    generated_at: NaiveDateTime,
) -> Report {
    let sections = SectionKind::ORDER
        .iter()
        .map(|&kind| {
            let body = match kind {
                SectionKind::Query => format!("```\n{query}\n```"),
                SectionKind::BuildQuality => build_quality_body(quality),
                SectionKind::Security => security_body(security),
                SectionKind::Efficiency => efficiency_body(efficiency),
                SectionKind::Implementation => format!(
                    "### Current Implementation\n```yaml\n{}```",
                    workflow.to_yaml()
                ),
                SectionKind::Recommendations => {
                    bullets_or(&recommendations(quality, efficiency), ALL_PRACTICES_IMPLEMENTED)
                }
                SectionKind::PerformanceMetrics => performance_body(metrics),
                SectionKind::BestPractices => bullets_or(CI_BEST_PRACTICES, ""),
                SectionKind::References => REFERENCES
                    .iter()
                    .map(|(title, url)| format!("- [{title}]({url})"))
                    .collect::<Vec<_>>()
                    .join("\n"),
            };
            Section { kind, body }
        })
        .collect();

    Report {
        generated_at,
        sections,
    }
}

/// Practices the workflow is missing, in a fixed order.
pub fn recommendations(quality: &BuildQuality, efficiency: &EfficiencyMetrics) -> Vec<&'static str> {
    let mut recommendations = Vec::new();
    if !quality.linting {
        recommendations.push("🔍 Add code linting (e.g., flake8, pylint) for code quality");
    }
    if !quality.test_coverage {
        recommendations.push("📊 Implement test coverage reporting");
    }
    if !quality.type_checking {
        recommendations.push("🏷️ Add type checking for better code reliability");
    }
    if !efficiency.caching_used {
        recommendations.push("💾 Implement dependency caching to reduce build times");
    }
    recommendations
}

fn bullets_or<S: AsRef<str>>(items: &[S], empty: &str) -> String {
    if items.is_empty() {
        return empty.to_string();
    }
    items
        .iter()
        .map(|item| format!("- {}", item.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn enabled(flag: bool) -> &'static str {
    if flag {
        "✅ Enabled"
    } else {
        "❌ Not configured"
    }
}

fn build_quality_body(quality: &BuildQuality) -> String {
    let gates: Vec<String> = quality
        .quality_gates
        .iter()
        .map(|gate| format!("✅ {gate}"))
        .collect();

    format!(
        "### Quality Gates\n{}\n\n\
         ### Code Quality Metrics\n\
         - 🔍 Linting: {}\n\
         - 🏷️ Type Checking: {}\n\
         - 📊 Test Coverage: {}\n\
         - 🔒 Dependency Audit: {}\n\n\
         ### Build Success Estimation\n\
         - 📈 Estimated Success Rate: {}%\n\
         - 🎯 Quality Score: {}",
        bullets_or(&gates, NO_QUALITY_GATES),
        enabled(quality.linting),
        enabled(quality.type_checking),
        enabled(quality.test_coverage),
        enabled(quality.dependency_audit),
        quality.estimated_success_rate,
        quality.quality_level().label(),
    )
}

fn findings_list(findings: &[Finding], empty: &str) -> String {
    let lines: Vec<String> = findings.iter().map(Finding::display).collect();
    bullets_or(&lines, empty)
}

fn security_body(security: &SecurityFindings) -> String {
    format!(
        "### Critical Issues\n{}\n\n### Warnings\n{}\n\n### Information\n{}",
        findings_list(security.by_severity(Severity::Critical), NO_CRITICAL_ISSUES),
        findings_list(security.by_severity(Severity::Warning), NO_WARNINGS),
        findings_list(security.by_severity(Severity::Info), NO_INFORMATION),
    )
}

fn efficiency_body(efficiency: &EfficiencyMetrics) -> String {
    format!(
        "### Pipeline Metrics\n\
         - 🔄 Parallel Jobs: {}\n\
         - 📋 Total Steps: {}\n\
         - 🔀 Matrix Builds: {}\n\
         - 💾 Caching: {}\n\n\
         ### Optimization Opportunities\n{}",
        efficiency.parallel_jobs,
        efficiency.total_steps,
        if efficiency.matrix_builds { "✅ Yes" } else { "❌ No" },
        if efficiency.caching_used {
            "✅ Implemented"
        } else {
            "❌ Not implemented"
        },
        bullets_or(&efficiency.optimization_suggestions, NO_OPTIMIZATION_NEEDED),
    )
}

fn performance_body(metrics: &PerformanceMetrics) -> String {
    format!(
        "- 🕒 Estimated Total Runtime: {:.1} minutes\n\
         - 💪 Resource Utilization: {}\n\
         - ⚡ Pipeline Efficiency Score: {}/100",
        metrics.runtime_minutes,
        metrics.resource_usage.label(),
        metrics.efficiency_score,
    )
}
