//! The `check` use case: validate a root module against a provider schema and produce a report.

use anyhow::Context;
use camino::Utf8Path;
use tfguard_settings::{Overrides, ResolvedConfig};
use tfguard_types::{ReportEnvelope, SCHEMA_REPORT_V1, TfguardReport, ToolMeta, Verdict};
use time::OffsetDateTime;
use tracing::info;

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Terraform root module directory.
    pub module_root: &'a Utf8Path,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// `terraform providers schema -json` output.
    pub schema_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub report: TfguardReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the check use case: parse config, read the module, decode the schema, evaluate, report.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        tfguard_settings::TfguardConfigV1::default()
    } else {
        tfguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved = tfguard_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;

    let schemas = tfguard_repo::parse_provider_schemas(input.schema_text)?;
    let model =
        tfguard_repo::build_config_model(input.module_root).context("build config model")?;

    let domain_report = tfguard_domain::evaluate(&model, &schemas, &resolved.effective);

    info!(
        profile = %resolved.effective.profile,
        files = domain_report.data.files_scanned,
        resources = domain_report.data.resources_scanned,
        unmatched = domain_report.data.resources_unmatched,
        errors = domain_report.counts.error,
        warnings = domain_report.counts.warning,
        infos = domain_report.counts.info,
        verdict = ?domain_report.verdict,
        "check complete"
    );

    let finished_at = OffsetDateTime::now_utc();

    let report = ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "tfguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at,
        verdict: domain_report.verdict,
        findings: domain_report.findings,
        data: domain_report.data,
    };

    Ok(CheckOutput {
        report,
        resolved_config: resolved,
    })
}

/// Map verdict to exit code: 0 = pass/warn, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Warn => 0,
        Verdict::Fail => 2,
    }
}
