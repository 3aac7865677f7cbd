//! Schema validation for raw workflow documents.
//!
//! Turns a parsed `serde_yaml::Value` into a [`WorkflowDefinition`], failing
//! with a [`ValidationError`] that names the offending field.

use super::{Expr, Job, RunsOn, Step, WorkflowDefinition};
use crate::error::ValidationError;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use tracing::debug;

/// Canonical key of the trigger section.
pub const TRIGGERS_KEY: &str = "on";

const WORKFLOW_KEYS: &[&str] = &["name", TRIGGERS_KEY, "jobs"];
const JOB_KEYS: &[&str] = &[
    "name",
    "runs-on",
    "strategy",
    "timeout-minutes",
    "continue-on-error",
    "steps",
];
const STEP_KEYS: &[&str] = &["name", "uses", "run"];

/// Re-key a boolean `true` top-level key to `on`.
///
/// YAML 1.1 parsers read an unquoted `on:` as the boolean `true`. When such a
/// key is present it replaces any literal `on` key and takes its position.
/// Documents without a boolean key are returned untouched, so applying this
/// twice is the same as applying it once.
pub fn normalize_trigger_key(doc: Mapping) -> Mapping {
    if !doc.contains_key(Value::Bool(true)) {
        return doc;
    }
    debug!("re-keying boolean `true` top-level key to `{}`", TRIGGERS_KEY);

    let mut normalized = Mapping::with_capacity(doc.len());
    for (key, value) in doc {
        match key {
            Value::Bool(true) => {
                normalized.insert(Value::String(TRIGGERS_KEY.to_string()), value);
            }
            Value::String(ref s) if s == TRIGGERS_KEY => {}
            other => {
                normalized.insert(other, value);
            }
        }
    }
    normalized
}

/// Validate a raw workflow document.
///
/// Only the document shape, `jobs`, each job mapping and each job's `runs-on`
/// are enforced. Other fields of an unexpected shape are coerced or skipped.
pub fn validate(raw: Value) -> Result<WorkflowDefinition, ValidationError> {
    let doc = match raw {
        Value::Mapping(doc) => normalize_trigger_key(doc),
        _ => return Err(ValidationError::NotAMapping),
    };

    let name = doc.get("name").and_then(scalar_string);

    let triggers = match doc.get(TRIGGERS_KEY) {
        Some(on) => parse_triggers(on),
        None => return Err(ValidationError::missing(TRIGGERS_KEY)),
    };

    let jobs_map = match doc.get("jobs") {
        Some(Value::Mapping(jobs)) => jobs,
        Some(_) => return Err(ValidationError::invalid("jobs", "a mapping of job ids to jobs")),
        None => return Err(ValidationError::missing("jobs")),
    };

    let mut jobs = IndexMap::with_capacity(jobs_map.len());
    for (job_id, job_config) in jobs_map {
        let job_id = key_string(job_id);
        let job = parse_job(&job_id, job_config)?;
        jobs.insert(job_id, job);
    }

    debug!(
        jobs = jobs.len(),
        triggers = triggers.len(),
        "validated workflow"
    );

    Ok(WorkflowDefinition {
        name,
        triggers,
        jobs,
        extra: unknown_keys(&doc, WORKFLOW_KEYS),
    })
}

fn parse_triggers(on: &Value) -> IndexMap<String, Value> {
    let mut triggers = IndexMap::new();
    match on {
        Value::Sequence(events) => {
            for event in events.iter().filter_map(scalar_string) {
                triggers.insert(event, Value::Mapping(Mapping::new()));
            }
        }
        Value::Mapping(map) => {
            for (event, config) in map {
                triggers.insert(key_string(event), config.clone());
            }
        }
        other => {
            if let Some(event) = scalar_string(other) {
                triggers.insert(event, Value::Mapping(Mapping::new()));
            }
        }
    }
    triggers
}

fn parse_job(job_id: &str, config: &Value) -> Result<Job, ValidationError> {
    let path = format!("jobs.{job_id}");
    let map = config
        .as_mapping()
        .ok_or_else(|| ValidationError::invalid(path.clone(), "a mapping"))?;

    let runs_on = match map.get("runs-on") {
        Some(value) => parse_runs_on(value),
        None => return Err(ValidationError::missing(format!("{path}.runs-on"))),
    };

    let mut job = Job::new(job_id, runs_on);
    job.name = map.get("name").and_then(scalar_string);
    job.strategy = map.get("strategy").cloned();
    job.timeout_minutes = map.get("timeout-minutes").and_then(|v| {
        lenient::<Expr<f64>>(v, &path, "timeout-minutes")
    });
    job.continue_on_error = map.get("continue-on-error").map(|v| {
        lenient::<Expr<bool>>(v, &path, "continue-on-error")
            .unwrap_or_else(|| Expr::Expression(raw_text(v)))
    });

    match map.get("steps") {
        Some(Value::Sequence(steps)) => {
            job.steps = steps.iter().map(parse_step).collect();
        }
        None | Some(Value::Null) => {}
        Some(_) => debug!(job = job_id, "ignoring `steps` that is not a sequence"),
    }

    job.extra = unknown_keys(map, JOB_KEYS);
    Ok(job)
}

fn parse_runs_on(value: &Value) -> RunsOn {
    match value {
        Value::Sequence(labels) => RunsOn::Labels(labels.iter().filter_map(scalar_string).collect()),
        Value::Mapping(group) => RunsOn::Group(group.clone()),
        other => RunsOn::Label(scalar_string(other).unwrap_or_default()),
    }
}

/// A step that is not a mapping still counts, with no fields set.
fn parse_step(step: &Value) -> Step {
    let Some(map) = step.as_mapping() else {
        return Step::default();
    };

    Step {
        name: map.get("name").and_then(scalar_string),
        uses: map.get("uses").and_then(scalar_string),
        run: map.get("run").and_then(scalar_string),
        extra: unknown_keys(map, STEP_KEYS),
    }
}

/// Strings, numbers and booleans as text; `null` and collections as `None`.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn key_string(key: &Value) -> String {
    scalar_string(key).unwrap_or_else(|| raw_text(key))
}

fn raw_text(value: &Value) -> String {
    serde_yaml::to_string(value)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_default()
}

fn lenient<T: DeserializeOwned>(value: &Value, job_path: &str, key: &str) -> Option<T> {
    match serde_yaml::from_value(value.clone()) {
        Ok(typed) => Some(typed),
        Err(e) => {
            debug!(field = %format!("{job_path}.{key}"), error = %e, "ignoring unexpected value");
            None
        }
    }
}

fn unknown_keys(map: &Mapping, known: &[&str]) -> Mapping {
    map.iter()
        .filter(|(key, _)| !key.as_str().is_some_and(|k| known.contains(&k)))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
