pub mod analyzer;
pub mod audit;
pub mod config;
pub mod error;
pub mod report;
pub mod security;
pub mod workflow;

pub use analyzer::efficiency::EfficiencyMetrics;
pub use analyzer::metrics::{PerformanceMetrics, ResourceUsage};
pub use analyzer::quality::BuildQuality;
pub use audit::{audit, audit_str, AuditOutcome};
pub use error::{ValidationError, WorkflowError};
pub use report::{Report, Section, SectionKind};
pub use security::{Finding, SecurityFindings, Severity};
pub use workflow::{parse_workflow, Job, Step, WorkflowDefinition};
