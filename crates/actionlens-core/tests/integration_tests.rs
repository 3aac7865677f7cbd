use actionlens_core::analyzer::{self, metrics::ResourceUsage};
use actionlens_core::audit::{audit, audit_str};
use actionlens_core::config::AnalysisConfig;
use actionlens_core::report::SectionKind;
use actionlens_core::workflow::schema::{normalize_trigger_key, validate};
use actionlens_core::{parse_workflow, ValidationError};
use chrono::{NaiveDate, NaiveDateTime};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

/// Get the workspace root (two levels up from CARGO_MANIFEST_DIR of actionlens-core).
fn fixtures_dir() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir)
        .parent()
        .unwrap() // crates/
        .parent()
        .unwrap() // workspace root
        .join("tests/fixtures")
}

fn github_fixture(name: &str) -> String {
    let path = fixtures_dir().join("github-actions").join(name);
    std::fs::read_to_string(&path).unwrap()
}

fn ts() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 16)
        .and_then(|d| d.and_hms_opt(8, 30, 0))
        .unwrap()
}

fn single_job(steps: &str) -> String {
    format!("on: push\njobs:\n  build:\n    runs-on: ubuntu-latest\n    steps:\n{steps}")
}

// ─── Validation ───

#[test]
fn test_boolean_on_key_normalization_is_idempotent() {
    let raw: Value = serde_yaml::from_str(&github_fixture("python-ci.yml")).unwrap();
    let Value::Mapping(doc) = raw else {
        panic!("fixture is a mapping")
    };

    // Simulate a YAML 1.1 parser that read `on:` as `true`.
    let mut bool_keyed = Mapping::new();
    for (key, value) in doc {
        if key.as_str() == Some("on") {
            bool_keyed.insert(Value::Bool(true), value);
        } else {
            bool_keyed.insert(key, value);
        }
    }

    let once = normalize_trigger_key(bool_keyed);
    let twice = normalize_trigger_key(once.clone());
    assert_eq!(once, twice);

    let wf = validate(Value::Mapping(twice)).unwrap();
    assert_eq!(wf.trigger_names(), vec!["push", "pull_request"]);
}

#[test]
fn test_validation_error_names_the_field() {
    let raw: Value = serde_yaml::from_str("on: push\njobs:\n  deploy:\n    steps: []\n").unwrap();
    let err = audit(raw, "q", ts(), &AnalysisConfig::default()).unwrap_err();
    assert_eq!(
        err,
        ValidationError::MissingField {
            field: "jobs.deploy.runs-on".into()
        }
    );
    assert!(err.to_string().contains("jobs.deploy.runs-on"));
}

#[test]
fn test_non_string_scalars_and_fractional_timeout_are_accepted() {
    let text = "on: push\njobs:\n  build:\n    runs-on: ubuntu-latest\n    timeout-minutes: 7.5\n    steps:\n      - name: 2024\n        uses: actions/checkout@main\n";
    let wf = parse_workflow(text).unwrap();
    assert!(wf.jobs["build"].has_timeout());
    assert_eq!(wf.jobs["build"].steps[0].display_name(), "2024");

    let outcome = audit_str(text, "q", ts(), &AnalysisConfig::default()).unwrap();
    assert!(outcome.security.critical[0].message.contains("step '2024'"));
    assert!(!outcome
        .efficiency
        .best_practices
        .iter()
        .any(|p| p.contains("timeout-minutes")));
}

// ─── Security ───

#[test]
fn test_version_pin_severity() {
    let master = parse_workflow(&single_job("      - uses: actions/checkout@master\n")).unwrap();
    let findings = actionlens_core::security::scan(&master);
    assert_eq!(findings.critical.len(), 1);
    assert!(findings.critical[0].message.contains("checkout@master"));
    assert_eq!(findings.total(), 1);

    let v1 = parse_workflow(&single_job("      - uses: actions/checkout@v1\n")).unwrap();
    let findings = actionlens_core::security::scan(&v1);
    assert_eq!(findings.warning.len(), 1);
    assert_eq!(findings.total(), 1);

    let v4 = parse_workflow(&single_job("      - uses: actions/checkout@v4\n")).unwrap();
    assert!(actionlens_core::security::scan(&v4).is_empty());
}

#[test]
fn test_unsafe_deploy_fixture() {
    let wf = parse_workflow(&github_fixture("unsafe-deploy.yml")).unwrap();
    let findings = actionlens_core::security::scan(&wf);

    // checkout@master, sudo
    assert_eq!(findings.critical.len(), 2);
    assert!(findings.critical[0].message.contains("checkout@master"));
    assert!(findings.critical[1].message.contains("Install tooling"));

    // curl without --fail, wget, setup-node@v1
    assert_eq!(findings.warning.len(), 3);
    assert_eq!(findings.warning[0].step, "Install tooling");
    assert_eq!(findings.warning[1].step, "Fetch assets");
    assert_eq!(findings.warning[2].job, "publish");

    // >> $GITHUB_OUTPUT
    assert_eq!(findings.info.len(), 1);
    assert_eq!(findings.info[0].step, "Record version");
}

// ─── Efficiency & quality ───

#[test]
fn test_caching_detection_flips_with_cache_step() {
    let without = parse_workflow(&single_job("      - uses: actions/checkout@v4\n      - run: make\n")).unwrap();
    assert!(!analyzer::analyze(&without, false).efficiency.caching_used);

    let with_cache = parse_workflow(&single_job(
        "      - uses: actions/checkout@v4\n      - uses: actions/cache@v3\n      - run: make\n",
    ))
    .unwrap();
    assert!(analyzer::analyze(&with_cache, false).efficiency.caching_used);
}

#[test]
fn test_success_rate_formula() {
    let plain = parse_workflow(&single_job("      - run: make\n")).unwrap();
    assert_eq!(analyzer::analyze(&plain, false).quality.estimated_success_rate, 70);

    let all = parse_workflow(&github_fixture("full-quality.yml")).unwrap();
    let quality = analyzer::analyze(&all, true).quality;
    assert!(quality.linting && quality.type_checking && quality.test_coverage && quality.dependency_audit);
    assert_eq!(quality.estimated_success_rate, 100);
}

#[test]
fn test_runtime_formula() {
    let steps = "      - run: make\n".repeat(20);
    let plain = parse_workflow(&single_job(&steps)).unwrap();
    let analysis = analyzer::analyze(&plain, false);
    assert_eq!(analysis.metrics.runtime_minutes, 10.0);
    assert_eq!(analysis.metrics.resource_usage, ResourceUsage::High);

    let steps = format!("{}      - run: coverage report\n", "      - run: make\n".repeat(19));
    let covered = parse_workflow(&single_job(&steps)).unwrap();
    assert_eq!(analyzer::analyze(&covered, false).metrics.runtime_minutes, 12.0);
}

#[test]
fn test_full_quality_fixture() {
    let wf = parse_workflow(&github_fixture("full-quality.yml")).unwrap();
    let analysis = analyzer::analyze(&wf, true);
    assert_eq!(analysis.efficiency.total_steps, 11);
    assert!(analysis.efficiency.matrix_builds);
    assert!(analysis.efficiency.caching_used);
    assert_eq!(
        analysis.efficiency.optimization_suggestions,
        vec!["🔄 Consider splitting into multiple jobs for better parallelization".to_string()]
    );
    assert!(analysis.efficiency.best_practices.is_empty());
    assert_eq!(analysis.metrics.efficiency_score, 100);
    assert_eq!(analysis.metrics.resource_usage, ResourceUsage::High);
    assert!(analysis.security.is_empty());
}

// ─── Report ───

#[test]
fn test_empty_findings_render_placeholders() {
    let outcome = audit_str(&github_fixture("python-ci.yml"), "python tests", ts(), &AnalysisConfig::default()).unwrap();
    let md = outcome.markdown().to_lowercase();
    assert!(md.contains("no critical issues found"));
    assert!(md.contains("no warnings found"));
    assert!(md.contains("no additional information"));
}

#[test]
fn test_markdown_section_order() {
    let outcome = audit_str(&github_fixture("unsafe-deploy.yml"), "deploy it", ts(), &AnalysisConfig::default()).unwrap();
    let md = outcome.markdown();

    assert!(md.starts_with("# 🚀 Workflow Analysis Report\nGenerated on: 2026-10-16 08:30:00\n"));
    let positions: Vec<usize> = SectionKind::ORDER
        .iter()
        .map(|kind| md.find(kind.heading()).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    assert!(md.contains("- ⛔ Using unstable version in actions/checkout@master"));
    assert!(md.contains("- ⚠️ Unsafe curl usage without --fail in step 'Install tooling'"));
    assert!(md.contains("- ℹ️ File system write detected in step 'Record version'"));
    assert!(md.ends_with("best-practices-for-using-github-actions)\n"));
}

#[test]
fn test_end_to_end_scenario() {
    let outcome = audit_str(&github_fixture("python-ci.yml"), "python ci", ts(), &AnalysisConfig::default()).unwrap();

    assert!(outcome.security.is_empty());
    assert_eq!(outcome.efficiency.total_steps, 2);
    assert!(!outcome.efficiency.caching_used);
    assert_eq!(
        outcome.efficiency.optimization_suggestions,
        vec![
            "💾 Implement dependency caching to speed up builds".to_string(),
            "⚡ Consider using matrix strategy for parallel testing".to_string(),
        ]
    );
    let timeouts: Vec<&String> = outcome
        .efficiency
        .best_practices
        .iter()
        .filter(|p| p.contains("timeout-minutes"))
        .collect();
    assert_eq!(timeouts.len(), 1);
    assert_eq!(outcome.quality.quality_gates, vec!["Unit Testing"]);
    assert_eq!(outcome.quality.estimated_success_rate, 70);
    assert_eq!(outcome.metrics.efficiency_score, 60);
    assert_eq!(outcome.metrics.resource_usage, ResourceUsage::Low);

    let md = outcome.markdown();
    assert!(md.contains("- 🕒 Estimated Total Runtime: 1.0 minutes"));
    assert!(md.contains("- 💪 Resource Utilization: 🟢 Low"));
    assert!(md.contains("- ⚡ Pipeline Efficiency Score: 60/100"));
}
