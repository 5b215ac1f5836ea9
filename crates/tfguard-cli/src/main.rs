//! CLI entry point for tfguard.
//!
//! This module is thin: it handles argument parsing, processes, I/O, and exit codes.
//! All business logic lives in the `tfguard-app` crate.

mod github;
mod terraform;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use tfguard_app::{
    CheckInput, ExplainOutput, IssueSyncOutcome, RepoIdentity, issue_body, parse_github_remote,
    parse_report_json, render_annotations, render_markdown, run_check, run_explain,
    runtime_error_report, serialize_report, sync_issue, to_renderable, verdict_exit_code,
};
use tfguard_settings::Overrides;
use tfguard_types::TfguardReport;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "tfguard",
    version,
    about = "Schema coverage guard for Terraform resource configurations"
)]
struct Cli {
    /// Terraform root module directory.
    #[arg(long, default_value = ".")]
    repo_root: Utf8PathBuf,

    /// Path to tfguard config TOML, relative to the repo root.
    #[arg(long, default_value = "tfguard.toml")]
    config: Utf8PathBuf,

    /// Override profile (strict|warn|compat).
    #[arg(long)]
    profile: Option<String>,

    /// Restrict schema lookup to one provider address
    /// (e.g. registry.terraform.io/hashicorp/azurerm).
    #[arg(long)]
    provider: Option<String>,

    /// Override maximum findings to emit.
    #[arg(long)]
    max_findings: Option<u32>,

    /// Log filter (e.g. debug, tfguard_domain=debug). Defaults to RUST_LOG, then `warn`.
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate resources against the provider schema and write artifacts.
    Check {
        /// Provider schema JSON (`terraform providers schema -json` output).
        /// Without it, terraform is run in the repo root to produce one.
        #[arg(long)]
        schema: Option<Utf8PathBuf>,

        /// Terraform executable used when no --schema is given.
        #[arg(long, default_value = "terraform")]
        terraform_bin: String,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/tfguard/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/tfguard/comment.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/tfguard/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/tfguard/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// Create or update a GitHub issue listing the schema gaps of a report.
    Issue {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/tfguard/report.json")]
        report: Utf8PathBuf,

        /// Issue title; an open issue with this exact title is updated in place.
        #[arg(long, default_value = "Terraform schema coverage")]
        title: String,

        /// Target repository as owner/name. Defaults to the `origin` remote.
        #[arg(long)]
        repo: Option<String>,

        /// Print the issue body instead of talking to GitHub.
        #[arg(long)]
        dry_run: bool,
    },

    /// Explain a check_id or code with remediation guidance.
    Explain {
        /// The check_id (e.g., "schema.attributes") or code
        /// (e.g., "missing_required_block") to explain.
        identifier: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match cli.cmd {
        Commands::Check {
            ref schema,
            ref terraform_bin,
            ref report_out,
            write_markdown,
            ref markdown_out,
        } => cmd_check(
            &cli,
            schema.clone(),
            terraform_bin,
            report_out,
            write_markdown,
            markdown_out,
        ),
        Commands::Md {
            ref report,
            ref output,
        } => cmd_md(report, output.as_deref()),
        Commands::Annotations { ref report, max } => cmd_annotations(report, max),
        Commands::Issue {
            ref report,
            ref title,
            ref repo,
            dry_run,
        } => cmd_issue(&cli, report, title, repo.as_deref(), dry_run),
        Commands::Explain { ref identifier } => cmd_explain(identifier),
    }
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_check(
    cli: &Cli,
    schema: Option<Utf8PathBuf>,
    terraform_bin: &str,
    report_out: &Utf8Path,
    write_markdown: bool,
    markdown_out: &Utf8Path,
) -> anyhow::Result<()> {
    let repo_root = cli
        .repo_root
        .canonicalize_utf8()
        .unwrap_or_else(|_| cli.repo_root.clone());

    let result = (|| -> anyhow::Result<i32> {
        if !repo_root.is_dir() {
            anyhow::bail!("repo root does not exist: {}", repo_root);
        }
        // Load config if present; missing file is allowed (defaults apply).
        let cfg_path = repo_root.join(&cli.config);
        let cfg_text = match std::fs::read_to_string(&cfg_path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e).with_context(|| format!("read config: {}", cfg_path)),
        };

        let schema_text = match &schema {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("read provider schema: {}", path))?,
            None => terraform::provider_schema_json(terraform_bin, &repo_root)?,
        };

        let input = CheckInput {
            module_root: &repo_root,
            config_text: &cfg_text,
            schema_text: &schema_text,
            overrides: Overrides {
                profile: cli.profile.clone(),
                provider: cli.provider.clone(),
                max_findings: cli.max_findings,
            },
        };

        let output = run_check(input)?;

        write_report_file(report_out, &output.report).context("write report json")?;

        if write_markdown {
            let renderable = to_renderable(&output.report);
            let md = render_markdown(&renderable);
            write_text_file(markdown_out, &md).context("write markdown")?;
        }

        Ok(verdict_exit_code(output.report.verdict))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            let report = runtime_error_report(&format!("{err:#}"));
            let _ = write_report_file(report_out, &report);
            eprintln!("tfguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn write_report_file(path: &Utf8Path, report: &TfguardReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    let data = serialize_report(report).context("serialize report")?;
    std::fs::write(path, data).with_context(|| format!("write report: {}", path))?;
    Ok(())
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    std::fs::write(path, text).with_context(|| format!("write text: {}", path))?;
    Ok(())
}

fn read_report(report_path: &Utf8Path) -> anyhow::Result<TfguardReport> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    parse_report_json(&report_text)
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<()> {
    let report = read_report(report_path)?;
    let renderable = to_renderable(&report);
    let md = render_markdown(&renderable);

    if let Some(out_path) = output {
        write_text_file(out_path, &md).context("write markdown output")?;
    } else {
        print!("{}", md);
    }

    Ok(())
}

fn cmd_annotations(report_path: &Utf8Path, max: usize) -> anyhow::Result<()> {
    let report = read_report(report_path)?;
    let renderable = to_renderable(&report);
    let annotations = render_annotations(&renderable, max);

    for annotation in annotations {
        println!("{}", annotation);
    }

    Ok(())
}

fn cmd_issue(
    cli: &Cli,
    report_path: &Utf8Path,
    title: &str,
    repo: Option<&str>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let report = read_report(report_path)?;
    let body = issue_body(&report);

    if dry_run {
        print!("{}", body);
        return Ok(());
    }

    let identity = match repo {
        Some(slug) => RepoIdentity::parse(slug)
            .with_context(|| format!("invalid --repo {slug:?} (expected owner/name)"))?,
        None => {
            let url = terraform::git_origin_url(&cli.repo_root)?;
            parse_github_remote(&url)
                .with_context(|| format!("origin is not a GitHub remote: {}", url.trim()))?
        }
    };

    let token = std::env::var("GITHUB_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty())
        .context("GITHUB_TOKEN is not set")?;

    let client = github::GitHubIssues::new(identity, token)?;
    match sync_issue(&client, title, &body)? {
        IssueSyncOutcome::Created(n) => println!("created issue #{n}"),
        IssueSyncOutcome::Updated(n) => println!("updated issue #{n}"),
        IssueSyncOutcome::Unchanged(n) => println!("issue #{n} is up to date"),
    }

    Ok(())
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", tfguard_app::format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available_check_ids,
            available_codes,
        } => {
            eprint!(
                "{}",
                tfguard_app::format_not_found(&identifier, available_check_ids, available_codes)
            );
            std::process::exit(1);
        }
    }
}
