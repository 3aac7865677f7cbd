pub mod extract;
pub mod schema;

use crate::error::WorkflowError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fmt;

/// A field that holds either a literal value or a `${{ ... }}` expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expr<T> {
    Literal(T),
    Expression(String),
}

/// The `runs-on` target of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RunsOn {
    Label(String),
    Labels(Vec<String>),
    Group(Mapping),
}

impl fmt::Display for RunsOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunsOn::Label(label) => write!(f, "{label}"),
            RunsOn::Labels(labels) => write!(f, "[{}]", labels.join(", ")),
            RunsOn::Group(group) => match group.get("group").and_then(|v| v.as_str()) {
                Some(name) => write!(f, "group:{name}"),
                None => write!(f, "runner-group"),
            },
        }
    }
}

/// A single step within a job: an action invocation, a shell command, or both.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Step {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uses: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,
    /// Keys the analyzer does not interpret (`with`, `env`, `if`, ...).
    #[serde(flatten)]
    pub extra: Mapping,
}

impl Step {
    /// Step name for messages, `unnamed` when the step has none.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }
}

/// A job of the workflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Job {
    #[serde(skip)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "runs-on")]
    pub runs_on: RunsOn,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Value>,
    #[serde(rename = "timeout-minutes", skip_serializing_if = "Option::is_none")]
    pub timeout_minutes: Option<Expr<f64>>,
    #[serde(rename = "continue-on-error", skip_serializing_if = "Option::is_none")]
    pub continue_on_error: Option<Expr<bool>>,
    pub steps: Vec<Step>,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl Job {
    pub fn new(id: impl Into<String>, runs_on: RunsOn) -> Self {
        Self {
            id: id.into(),
            name: None,
            runs_on,
            strategy: None,
            timeout_minutes: None,
            continue_on_error: None,
            steps: Vec::new(),
            extra: Mapping::new(),
        }
    }

    /// True when the job's strategy declares a `matrix`.
    pub fn has_matrix(&self) -> bool {
        self.strategy
            .as_ref()
            .is_some_and(|s| s.get("matrix").is_some())
    }

    /// A literal `timeout-minutes: 0` counts as no timeout.
    pub fn has_timeout(&self) -> bool {
        match &self.timeout_minutes {
            None => false,
            Some(Expr::Literal(minutes)) => *minutes != 0.0,
            Some(Expr::Expression(_)) => true,
        }
    }
}

/// A validated workflow document.
///
/// Built by [`schema::validate`]; every analyzer borrows it read-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowDefinition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "on")]
    pub triggers: IndexMap<String, Value>,
    pub jobs: IndexMap<String, Job>,
    /// Top-level keys other than `name`, `on` and `jobs`.
    #[serde(flatten)]
    pub extra: Mapping,
}

impl WorkflowDefinition {
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    pub fn step_count(&self) -> usize {
        self.jobs.values().map(|j| j.steps.len()).sum()
    }

    /// All steps paired with their job, in definition order.
    pub fn steps(&self) -> impl Iterator<Item = (&Job, &Step)> {
        self.jobs
            .values()
            .flat_map(|job| job.steps.iter().map(move |step| (job, step)))
    }

    pub fn trigger_names(&self) -> Vec<&str> {
        self.triggers.keys().map(String::as_str).collect()
    }

    /// Render the normalized workflow back to YAML.
    pub fn to_yaml(&self) -> String {
        serde_yaml::to_string(self)
            .unwrap_or_else(|e| format!("# failed to render workflow: {e}\n"))
    }
}

/// Parse workflow text (optionally wrapped in a markdown fence) and validate it.
pub fn parse_workflow(text: &str) -> Result<WorkflowDefinition, WorkflowError> {
    let yaml = extract::extract_yaml(text);
    let value: Value = serde_yaml::from_str(yaml)?;
    Ok(schema::validate(value)?)
}
