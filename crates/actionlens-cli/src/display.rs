use actionlens_core::audit::AuditOutcome;
use actionlens_core::report;
use actionlens_core::{Finding, SecurityFindings, Severity};
use colored::*;
use std::path::Path;

/// Print a short colored summary of one audit to the terminal.
pub fn print_summary(source: &Path, outcome: &AuditOutcome) {
    println!();
    println!(
        "{}",
        format!(
            " ActionLens v{} — {}",
            env!("CARGO_PKG_VERSION"),
            source.display()
        )
        .bold()
    );
    println!();

    let workflow = &outcome.workflow;
    println!(" {}", "Workflow".bold().underline());
    println!(
        " {} {} ({} jobs, {} steps)",
        "|-".dimmed(),
        workflow.name.as_deref().unwrap_or("unnamed"),
        workflow.job_count(),
        workflow.step_count()
    );
    println!(
        " {} Triggers: {}",
        "|-".dimmed(),
        workflow.trigger_names().join(", ").cyan()
    );
    println!();

    let security = &outcome.security;
    println!(
        " {} Security: {} critical, {} warnings, {} info",
        "|-".dimmed(),
        count(security.critical.len(), Severity::Critical),
        count(security.warning.len(), Severity::Warning),
        security.info.len(),
    );

    let quality = &outcome.quality;
    println!(
        " {} Estimated success rate: {}% ({})",
        "|-".dimmed(),
        quality.estimated_success_rate.to_string().bold(),
        quality.quality_level().label()
    );

    let metrics = &outcome.metrics;
    println!(
        " {} Runtime: {:.1} min, resources: {}, efficiency: {}/100",
        "|-".dimmed(),
        metrics.runtime_minutes,
        metrics.resource_usage.label(),
        metrics.efficiency_score.to_string().bold()
    );

    let recommendations: Vec<&str> = report::recommendations(&outcome.quality, &outcome.efficiency);
    let hints = outcome
        .efficiency
        .optimization_suggestions
        .iter()
        .map(String::as_str)
        .chain(outcome.efficiency.best_practices.iter().map(String::as_str))
        .chain(recommendations);
    for hint in hints {
        println!("   {} {}", "•".dimmed(), hint);
    }
    println!();
}

fn count(n: usize, severity: Severity) -> String {
    if n == 0 {
        return "0".to_string();
    }
    match severity {
        Severity::Critical => n.to_string().red().bold().to_string(),
        Severity::Warning => n.to_string().yellow().bold().to_string(),
        Severity::Info => n.to_string(),
    }
}

fn print_finding(finding: &Finding) {
    let tag = match finding.severity {
        Severity::Critical => format!(" {} ", finding.severity.label())
            .on_red()
            .white()
            .bold()
            .to_string(),
        Severity::Warning => format!(" {} ", finding.severity.label())
            .on_yellow()
            .black()
            .bold()
            .to_string(),
        Severity::Info => format!(" {} ", finding.severity.label())
            .on_blue()
            .white()
            .to_string(),
    };
    println!(" {} {}", tag, finding.message);
    println!(
        "   {} job: {}, step: {}",
        "|".dimmed(),
        finding.job.dimmed(),
        finding.step.dimmed()
    );
}

/// Print security scan results to terminal.
pub fn print_security_report(findings: &SecurityFindings, source_file: &str) {
    println!();
    println!(
        "{}",
        format!(" ActionLens Security Scan — {}", source_file).bold()
    );
    println!();

    if findings.is_empty() {
        println!(" {} No security issues detected!", "OK".green().bold());
        println!();
        return;
    }

    println!(" {}", "=".repeat(60).dimmed());
    println!();

    for finding in findings.iter() {
        print_finding(finding);
    }

    println!();
    println!(" {}", "=".repeat(60).dimmed());
    println!();
    println!(
        " {} security findings: {} critical, {} warnings, {} info",
        findings.total(),
        count(findings.critical.len(), Severity::Critical),
        count(findings.warning.len(), Severity::Warning),
        findings.info.len(),
    );
    println!();
}

/// Report a workflow that could not be analyzed.
pub fn print_error(source: &Path, error: &anyhow::Error) {
    eprintln!(
        " {} {}: {:#}",
        " FAIL ".on_red().white().bold(),
        source.display(),
        error
    );
}
