use crate::fingerprint::fingerprint_for_gap;
use crate::model::{ConfigModel, ParsedResource, ResourceMode, ValidationFinding};
use crate::policy::{CheckPolicy, EffectiveConfig, FailOn};
use crate::report::{DomainReport, SeverityCounts};
use crate::schema::ProviderSchemas;
use crate::validate::validate_resource;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde_json::json;
use tfguard_types::{Finding, Severity, TfguardData, Verdict, ids};
use tracing::debug;

pub fn evaluate(
    model: &ConfigModel,
    schemas: &ProviderSchemas,
    cfg: &EffectiveConfig,
) -> DomainReport {
    let attributes = CheckContext::new(cfg, ids::CHECK_SCHEMA_ATTRIBUTES);
    let blocks = CheckContext::new(cfg, ids::CHECK_SCHEMA_BLOCKS);

    let mut findings: Vec<Finding> = Vec::new();
    let mut validated = 0u32;
    let mut unmatched = 0u32;

    for resource in &model.resources {
        if resource.mode == ResourceMode::Data && !cfg.include_data_sources {
            debug!(address = %resource.address(), "skipping data source");
            continue;
        }

        let Some(schema) = schemas.resource_schema(
            resource.mode,
            &resource.resource_type,
            cfg.provider.as_deref(),
        ) else {
            debug!(
                address = %resource.address(),
                "no provider schema for resource type; not validated"
            );
            unmatched += 1;
            continue;
        };
        validated += 1;

        for gap in validate_resource(resource, Some(schema)) {
            let check = if gap.is_block { &blocks } else { &attributes };
            let Some(severity) = check.severity_for(&gap, cfg.report_optional) else {
                continue;
            };
            findings.push(finding_for(resource, &gap, check.check_id, severity));
        }
    }

    // Deterministic ordering before truncation.
    findings.sort_by(compare_findings);

    let total = findings.len() as u32;

    let mut emitted = findings;
    let mut truncated_reason: Option<String> = None;
    if emitted.len() > cfg.max_findings {
        emitted.truncate(cfg.max_findings);
        truncated_reason = Some(format!(
            "findings truncated to max_findings={}",
            cfg.max_findings
        ));
    }

    let verdict = compute_verdict(&emitted, cfg.fail_on);
    let counts = SeverityCounts::from_findings(&emitted);

    let data = TfguardData {
        profile: cfg.profile.clone(),
        provider: cfg.provider.clone(),
        files_scanned: model.files.len() as u32,
        resources_scanned: model.resources.len() as u32,
        resources_validated: validated,
        resources_unmatched: unmatched,
        findings_total: total,
        findings_emitted: emitted.len() as u32,
        truncated_reason,
    };

    DomainReport {
        verdict,
        findings: emitted,
        data,
        counts,
    }
}

/// One enabled check with its compiled allowlist.
struct CheckContext<'a> {
    check_id: &'static str,
    policy: Option<&'a CheckPolicy>,
    allow: Option<GlobSet>,
}

impl<'a> CheckContext<'a> {
    fn new(cfg: &'a EffectiveConfig, check_id: &'static str) -> Self {
        let policy = cfg.check_policy(check_id);
        let allow = policy.and_then(|p| build_allowlist(&p.allow));
        Self {
            check_id,
            policy,
            allow,
        }
    }

    /// Severity to report `gap` at, or `None` when the gap is filtered out.
    fn severity_for(&self, gap: &ValidationFinding, report_optional: bool) -> Option<Severity> {
        let policy = self.policy?;
        if self
            .allow
            .as_ref()
            .is_some_and(|set| set.is_match(&gap.resource_type))
        {
            return None;
        }
        if gap.required {
            Some(policy.severity)
        } else if report_optional {
            Some(Severity::Info)
        } else {
            None
        }
    }
}

/// Allowlist entries are resource-type globs; settings validates them, so
/// anything that still fails to compile is dropped here.
fn build_allowlist(allow: &[String]) -> Option<GlobSet> {
    if allow.is_empty() {
        return None;
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in allow {
        if let Ok(glob) = Glob::new(pattern) {
            builder.add(glob);
        }
    }
    builder.build().ok()
}

fn finding_for(
    resource: &ParsedResource,
    gap: &ValidationFinding,
    check_id: &str,
    severity: Severity,
) -> Finding {
    let (kind, code) = match (gap.is_block, gap.required) {
        (false, true) => ("attribute", ids::CODE_MISSING_REQUIRED_ATTRIBUTE),
        (false, false) => ("attribute", ids::CODE_MISSING_OPTIONAL_ATTRIBUTE),
        (true, true) => ("block", ids::CODE_MISSING_REQUIRED_BLOCK),
        (true, false) => ("block", ids::CODE_MISSING_OPTIONAL_BLOCK),
    };
    let requirement = if gap.required { "required" } else { "optional" };

    let help = if gap.is_block {
        format!(
            "Add a `{}` block (literal or dynamic), or list it in lifecycle.ignore_changes.",
            gap.name
        )
    } else {
        format!(
            "Set `{}` explicitly, or list it in lifecycle.ignore_changes.",
            gap.name
        )
    };

    Finding {
        severity,
        check_id: check_id.to_string(),
        code: code.to_string(),
        message: format!(
            "{} is missing {} {} '{}' in {}",
            resource.address(),
            requirement,
            kind,
            gap.name,
            gap.path
        ),
        location: resource.location.clone(),
        help: Some(help),
        url: None,
        fingerprint: Some(fingerprint_for_gap(
            &gap.resource_type,
            gap.relative_path(),
            &gap.name,
            gap.is_block,
        )),
        data: json!({
            "mode": resource.mode.keyword(),
            "resource_type": gap.resource_type,
            "resource_name": resource.name,
            "path": gap.path,
            "name": gap.name,
            "required": gap.required,
            "is_block": gap.is_block,
        }),
    }
}

fn compute_verdict(findings: &[Finding], fail_on: FailOn) -> Verdict {
    let has_error = findings.iter().any(|f| f.severity == Severity::Error);
    if has_error {
        return Verdict::Fail;
    }

    let has_warn = findings.iter().any(|f| f.severity == Severity::Warning);
    if has_warn {
        return match fail_on {
            FailOn::Warning => Verdict::Fail,
            FailOn::Error => Verdict::Warn,
        };
    }

    Verdict::Pass
}

fn compare_findings(a: &Finding, b: &Finding) -> std::cmp::Ordering {
    // Ordering priority:
    // 1) severity (error -> warning -> info)
    // 2) location.path (missing last)
    // 3) location.line (missing last)
    // 4) check_id
    // 5) code
    // 6) message
    let severity_rank = |sev: Severity| match sev {
        Severity::Error => 0,
        Severity::Warning => 1,
        Severity::Info => 2,
    };
    let (ap, al) = match &a.location {
        Some(l) => (l.path.as_str(), l.line.unwrap_or(u32::MAX)),
        None => ("~", u32::MAX),
    };
    let (bp, bl) = match &b.location {
        Some(l) => (l.path.as_str(), l.line.unwrap_or(u32::MAX)),
        None => ("~", u32::MAX),
    };

    severity_rank(a.severity)
        .cmp(&severity_rank(b.severity))
        .then(ap.cmp(bp))
        .then(al.cmp(&bl))
        .then(a.check_id.cmp(&b.check_id))
        .then(a.code.cmp(&b.code))
        .then(a.message.cmp(&b.message))
}
