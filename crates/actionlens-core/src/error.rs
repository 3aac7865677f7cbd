use thiserror::Error;

/// A workflow document that parsed but does not have the shape of a workflow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("workflow document must be a mapping at the top level")]
    NotAMapping,

    #[error("missing required field '{field}'")]
    MissingField { field: String },

    #[error("invalid field '{field}': expected {expected}")]
    InvalidField { field: String, expected: &'static str },
}

impl ValidationError {
    pub(crate) fn missing(field: impl Into<String>) -> Self {
        ValidationError::MissingField { field: field.into() }
    }

    pub(crate) fn invalid(field: impl Into<String>, expected: &'static str) -> Self {
        ValidationError::InvalidField {
            field: field.into(),
            expected,
        }
    }

    /// Dotted path of the field that violated the schema, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::NotAMapping => None,
            ValidationError::MissingField { field } | ValidationError::InvalidField { field, .. } => {
                Some(field)
            }
        }
    }
}

/// Failure to turn workflow text into a `WorkflowDefinition`.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("workflow validation failed: {0}")]
    Validation(#[from] ValidationError),
}
