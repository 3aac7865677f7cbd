//! Keyword-driven detection of build-quality practices.

use crate::workflow::{Step, WorkflowDefinition};
use serde::{Deserialize, Serialize};

/// Success rate of a workflow with no detected quality practice.
pub const BASE_SUCCESS_RATE: u8 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityCategory {
    Testing,
    Linting,
    TypeChecking,
    DependencyAudit,
    Coverage,
}

/// Keywords that place a step in a category, and the quality gate it records.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub category: QualityCategory,
    pub keywords: &'static [&'static str],
    pub gate: Option<&'static str>,
}

impl KeywordRule {
    pub fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|k| text.contains(k))
    }
}

/// Evaluated in this order for every step.
pub const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        category: QualityCategory::Testing,
        keywords: &["pytest", "unittest", "coverage"],
        gate: Some("Unit Testing"),
    },
    KeywordRule {
        category: QualityCategory::Linting,
        keywords: &["flake8", "pylint", "black", "ruff"],
        gate: Some("Code Style"),
    },
    KeywordRule {
        category: QualityCategory::TypeChecking,
        keywords: &["mypy", "pytype", "pyre"],
        gate: Some("Type Safety"),
    },
    KeywordRule {
        category: QualityCategory::DependencyAudit,
        keywords: &["dependabot", "snyk", "safety"],
        gate: Some("Dependency Check"),
    },
    KeywordRule {
        category: QualityCategory::Coverage,
        keywords: &["coverage"],
        gate: None,
    },
];

/// Qualitative bucket for the estimated success rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    High,
    Medium,
    Low,
}

impl QualityLevel {
    pub fn from_success_rate(rate: u8) -> Self {
        match rate {
            90.. => QualityLevel::High,
            75..=89 => QualityLevel::Medium,
            _ => QualityLevel::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityLevel::High => "🟢 High",
            QualityLevel::Medium => "🟡 Medium",
            QualityLevel::Low => "🔴 Low",
        }
    }
}

/// Build-quality practices detected in a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildQuality {
    /// One entry per matching step; repeats are kept.
    pub quality_gates: Vec<String>,
    pub test_coverage: bool,
    pub linting: bool,
    pub type_checking: bool,
    pub dependency_audit: bool,
    pub estimated_success_rate: u8,
}

impl BuildQuality {
    fn record(&mut self, rule: &KeywordRule) {
        match rule.category {
            QualityCategory::Testing => {}
            QualityCategory::Linting => self.linting = true,
            QualityCategory::TypeChecking => self.type_checking = true,
            QualityCategory::DependencyAudit => self.dependency_audit = true,
            QualityCategory::Coverage => self.test_coverage = true,
        }
        if let Some(gate) = rule.gate {
            self.quality_gates.push(gate.to_string());
        }
    }

    pub fn quality_level(&self) -> QualityLevel {
        QualityLevel::from_success_rate(self.estimated_success_rate)
    }
}

/// Lower-cased `name`, `run` and `uses` of a step, space separated.
pub fn search_text(step: &Step) -> String {
    [&step.name, &step.run, &step.uses]
        .iter()
        .map(|field| field.as_deref().unwrap_or(""))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Rules whose keywords occur in `text`, in table order.
fn matching_rules(text: &str) -> impl Iterator<Item = &'static KeywordRule> + '_ {
    KEYWORD_RULES.iter().filter(move |rule| rule.matches(text))
}

/// 70, plus 10 for linting, 10 for type checking, 5 for coverage and 5 for
/// dependency audit, capped at 100.
pub fn success_rate(linting: bool, type_checking: bool, test_coverage: bool, dependency_audit: bool) -> u8 {
    let mut rate = u32::from(BASE_SUCCESS_RATE);
    if linting {
        rate += 10;
    }
    if type_checking {
        rate += 10;
    }
    if test_coverage {
        rate += 5;
    }
    if dependency_audit {
        rate += 5;
    }
    rate.min(100) as u8
}

/// Scan every step for quality-practice keywords and estimate a success rate.
pub fn assess(workflow: &WorkflowDefinition) -> BuildQuality {
    let mut quality = BuildQuality {
        quality_gates: Vec::new(),
        test_coverage: false,
        linting: false,
        type_checking: false,
        dependency_audit: false,
        estimated_success_rate: 0,
    };

    for (_, step) in workflow.steps() {
        let text = search_text(step);
        for rule in matching_rules(&text) {
            quality.record(rule);
        }
    }

    quality.estimated_success_rate = success_rate(
        quality.linting,
        quality.type_checking,
        quality.test_coverage,
        quality.dependency_audit,
    );
    quality
}
