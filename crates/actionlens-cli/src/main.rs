mod display;

use actionlens_core::audit::{audit_str, AuditOutcome};
use actionlens_core::config::{self, Config, OutputFormat};
use actionlens_core::{parse_workflow, security};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "actionlens",
    version,
    about = "ActionLens — GitHub Actions workflow quality & security analyzer",
    long_about = "Audit GitHub Actions workflows for unsafe action pins and shell patterns, \
                  pipeline efficiency and build-quality practices, and produce a markdown report."
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze workflows and produce a full quality & security report
    Analyze {
        /// Path to workflow file or directory containing workflow files
        #[arg(default_value = ".github/workflows/")]
        path: PathBuf,

        /// Description of what the workflow is meant to do, quoted in the report
        #[arg(short, long)]
        query: String,

        /// Output format (markdown, json); defaults to the configured format
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Write one report per workflow into this directory instead of stdout
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Path to config file (defaults to ./.actionlens.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Run the analyzers one after another
        #[arg(long)]
        sequential: bool,
    },

    /// Run only the security compliance scan
    Scan {
        /// Path to workflow file or directory
        #[arg(default_value = ".github/workflows/")]
        path: PathBuf,
    },

    /// Print a starter configuration file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Analyze {
            path,
            query,
            format,
            output_dir,
            config,
            sequential,
        } => {
            let mut config = config::resolve_config(config.as_deref(), Path::new("."))?;
            if sequential {
                config.analysis.parallel = false;
            }
            let format = format.unwrap_or(config.output.format);
            cmd_analyze(&path, &query, format, output_dir.as_deref(), &config).await
        }
        Commands::Scan { path } => cmd_scan(&path),
        Commands::Init => {
            print!("{}", config::default_config_toml());
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn discover_workflow_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    if path.is_dir() {
        let pattern = format!("{}/**/*.yml", path.display());
        let mut files: Vec<PathBuf> = glob::glob(&pattern)
            .context("Failed to read glob pattern")?
            .chain(
                glob::glob(&format!("{}/**/*.yaml", path.display()))
                    .context("Failed to read glob pattern")?,
            )
            .filter_map(|r| r.ok())
            .collect();
        files.sort();
        return Ok(files);
    }

    anyhow::bail!("Path '{}' does not exist", path.display());
}

async fn cmd_analyze(
    path: &Path,
    query: &str,
    format: OutputFormat,
    output_dir: Option<&Path>,
    config: &Config,
) -> Result<()> {
    let files = discover_workflow_files(path)?;
    let scan_root = if path.is_file() {
        path.parent().map(Path::to_path_buf).unwrap_or_default()
    } else {
        path.to_path_buf()
    };

    if files.is_empty() {
        anyhow::bail!(
            "No workflow files found at '{}'. \
            Make sure the path points to a YAML workflow file or directory.",
            path.display()
        );
    }

    if let Some(dir) = output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let mut failed = 0usize;
    for file in &files {
        let outcome = match audit_file(file, query, config).await {
            Ok(outcome) => outcome,
            Err(e) => {
                display::print_error(file, &e);
                failed += 1;
                continue;
            }
        };

        let rendered = match format {
            OutputFormat::Json => outcome.to_json()?,
            OutputFormat::Markdown => outcome.markdown(),
        };

        match output_dir {
            Some(dir) => {
                let name = report_file_name(file, &scan_root, outcome.report.generated_at, format);
                let report_path = dir.join(name);
                write_report(&report_path, &rendered)?;
                display::print_summary(file, &outcome);
                println!(" Report written to {}", report_path.display());
                println!();
            }
            None => println!("{}", rendered),
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} workflow files could not be analyzed", failed, files.len());
    }

    Ok(())
}

async fn audit_file(path: &Path, query: &str, config: &Config) -> Result<AuditOutcome> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read workflow file: {}", path.display()))?;

    let query = query.to_string();
    let analysis = config.analysis.clone();
    let generated_at = Local::now().naive_local();
    let deadline = Duration::from_secs(config.analysis.timeout_secs);
    debug!(file = %path.display(), timeout_secs = config.analysis.timeout_secs, "auditing workflow");

    let task = tokio::task::spawn_blocking(move || audit_str(&content, &query, generated_at, &analysis));
    let outcome = tokio::time::timeout(deadline, task)
        .await
        .map_err(|_| {
            warn!(file = %path.display(), "audit deadline elapsed");
            anyhow::anyhow!(
                "Analysis of {} did not finish within {}s",
                path.display(),
                config.analysis.timeout_secs
            )
        })?
        .context("Analysis task failed")?
        .with_context(|| format!("Failed to analyze {}", path.display()))?;

    Ok(outcome)
}

/// Report name derived from the workflow's path under the scan root, so
/// `ci.yml`, `ci.yaml` and `nested/ci.yml` never share a name.
fn report_file_name(
    workflow: &Path,
    scan_root: &Path,
    generated_at: NaiveDateTime,
    format: OutputFormat,
) -> String {
    let relative = workflow.strip_prefix(scan_root).unwrap_or(workflow);
    let mut slug = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().replace('.', "-")),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        slug = "workflow".to_string();
    }
    let extension = match format {
        OutputFormat::Markdown => "md",
        OutputFormat::Json => "json",
    };
    format!(
        "workflow-analysis-{}-{}.{}",
        slug,
        generated_at.format("%Y%m%d-%H%M%S"),
        extension
    )
}

/// Write a report, refusing to replace an existing file.
fn write_report(path: &Path, contents: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .with_context(|| format!("Failed to create report {}", path.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn cmd_scan(path: &Path) -> Result<()> {
    let files = discover_workflow_files(path)?;

    if files.is_empty() {
        anyhow::bail!("No workflow files found at '{}'", path.display());
    }

    for file in &files {
        let content = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read workflow file: {}", file.display()))?;
        let workflow = parse_workflow(&content)
            .with_context(|| format!("Failed to parse {}", file.display()))?;
        let findings = security::scan(&workflow);
        display::print_security_report(&findings, &file.to_string_lossy());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .and_then(|d| d.and_hms_opt(8, 30, 0))
            .unwrap()
    }

    #[test]
    fn test_report_names_differ_for_same_stem() {
        let root = Path::new(".github/workflows");
        let names = [
            report_file_name(&root.join("ci.yml"), root, ts(), OutputFormat::Markdown),
            report_file_name(&root.join("ci.yaml"), root, ts(), OutputFormat::Markdown),
            report_file_name(&root.join("nested/ci.yml"), root, ts(), OutputFormat::Markdown),
        ];
        assert_eq!(names[0], "workflow-analysis-ci-yml-20261016-083000.md");
        assert_eq!(names[1], "workflow-analysis-ci-yaml-20261016-083000.md");
        assert_eq!(names[2], "workflow-analysis-nested-ci-yml-20261016-083000.md");
    }

    #[test]
    fn test_report_name_for_single_file() {
        let file = Path::new("deploy.yml");
        let root = file.parent().unwrap();
        assert_eq!(
            report_file_name(file, root, ts(), OutputFormat::Json),
            "workflow-analysis-deploy-yml-20261016-083000.json"
        );
    }

    #[test]
    fn test_write_report_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        write_report(&path, "first").unwrap();
        assert!(write_report(&path, "second").is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first");
    }
}
