use crate::{model::TfguardConfigV1, presets};
use anyhow::Context;
use globset::Glob;
use tfguard_domain::policy::{CheckPolicy, EffectiveConfig, FailOn};
use tfguard_types::Severity;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub provider: Option<String>,
    pub max_findings: Option<u32>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
}

pub fn resolve_config(
    cfg: TfguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "strict".to_string());

    let mut effective = presets::preset(&profile);

    // provider
    if let Some(provider) = overrides.provider.clone().or(cfg.provider.clone()) {
        let provider = provider.trim().to_string();
        if provider.is_empty() {
            anyhow::bail!("provider must not be empty");
        }
        effective.provider = Some(provider);
    }

    // max findings
    if let Some(mf) = overrides.max_findings.or(cfg.max_findings) {
        effective.max_findings = mf as usize;
    }

    if let Some(report_optional) = cfg.report_optional {
        effective.report_optional = report_optional;
    }
    if let Some(include) = cfg.include_data_sources {
        effective.include_data_sources = include;
    }

    // per-check overrides
    for (check_id, cc) in cfg.checks.iter() {
        let entry = effective
            .checks
            .entry(check_id.clone())
            .or_insert_with(CheckPolicy::disabled);

        if let Some(enabled) = cc.enabled {
            entry.enabled = enabled;
        }
        if let Some(sev) = cc.severity.as_deref() {
            entry.severity =
                parse_severity(sev).with_context(|| format!("invalid severity for {check_id}"))?;
        }
        if !cc.allow.is_empty() {
            validate_allowlist(check_id, &cc.allow)?;
            entry.allow = cc.allow.clone();
        }
    }

    // fail_on override from config
    if let Some(fail_on_s) = cfg.fail_on.as_deref() {
        effective.fail_on = parse_fail_on(fail_on_s)?;
    }

    Ok(ResolvedConfig { effective })
}

fn validate_allowlist(check_id: &str, patterns: &[String]) -> anyhow::Result<()> {
    for pattern in patterns {
        Glob::new(pattern)
            .with_context(|| format!("invalid allow glob for {check_id}: {pattern}"))?;
    }
    Ok(())
}

fn parse_severity(v: &str) -> anyhow::Result<Severity> {
    match v {
        "info" => Ok(Severity::Info),
        "warning" | "warn" => Ok(Severity::Warning),
        "error" => Ok(Severity::Error),
        other => anyhow::bail!("unknown severity: {other} (expected info|warning|error)"),
    }
}

fn parse_fail_on(v: &str) -> anyhow::Result<FailOn> {
    match v {
        "error" => Ok(FailOn::Error),
        "warning" | "warn" => Ok(FailOn::Warning),
        other => anyhow::bail!("unknown fail_on: {other} (expected error|warning)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_config_toml;
    use tfguard_types::ids;

    fn resolve(toml: &str, overrides: Overrides) -> anyhow::Result<EffectiveConfig> {
        let cfg = parse_config_toml(toml)?;
        Ok(resolve_config(cfg, overrides)?.effective)
    }

    #[test]
    fn empty_config_is_strict() {
        let eff = resolve("", Overrides::default()).expect("resolve");
        assert_eq!(eff.profile, "strict");
        assert_eq!(eff.fail_on, FailOn::Error);
        assert!(eff.report_optional);
        assert!(!eff.include_data_sources);
        assert_eq!(eff.provider, None);
        let attrs = eff
            .check_policy(ids::CHECK_SCHEMA_ATTRIBUTES)
            .expect("attributes enabled");
        assert_eq!(attrs.severity, Severity::Error);
    }

    #[test]
    fn compat_reports_required_gaps_only() {
        let eff = resolve("profile = \"compat\"", Overrides::default()).expect("resolve");
        assert!(!eff.report_optional);
        assert_eq!(eff.checks[ids::CHECK_SCHEMA_BLOCKS].severity, Severity::Warning);
    }

    #[test]
    fn overrides_beat_config_file() {
        let toml = r#"
profile = "warn"
provider = "registry.terraform.io/hashicorp/azurerm"
max_findings = 10
"#;
        let eff = resolve(
            toml,
            Overrides {
                profile: Some("strict".to_string()),
                provider: Some("registry.terraform.io/hashicorp/aws".to_string()),
                max_findings: Some(3),
            },
        )
        .expect("resolve");
        assert_eq!(eff.profile, "strict");
        assert_eq!(
            eff.provider.as_deref(),
            Some("registry.terraform.io/hashicorp/aws")
        );
        assert_eq!(eff.max_findings, 3);
    }

    #[test]
    fn per_check_settings_apply() {
        let toml = r#"
report_optional = false
include_data_sources = true
fail_on = "warning"

[checks."schema.attributes"]
severity = "warning"
allow = ["azurerm_role_*"]

[checks."schema.blocks"]
enabled = false
"#;
        let eff = resolve(toml, Overrides::default()).expect("resolve");
        assert!(!eff.report_optional);
        assert!(eff.include_data_sources);
        assert_eq!(eff.fail_on, FailOn::Warning);

        let attrs = &eff.checks[ids::CHECK_SCHEMA_ATTRIBUTES];
        assert_eq!(attrs.severity, Severity::Warning);
        assert_eq!(attrs.allow, vec!["azurerm_role_*".to_string()]);
        assert!(eff.check_policy(ids::CHECK_SCHEMA_BLOCKS).is_none());
    }

    #[test]
    fn unknown_check_ids_start_disabled() {
        let eff = resolve("[checks.\"custom.thing\"]\nseverity = \"info\"\n", Overrides::default())
            .expect("resolve");
        assert!(eff.check_policy("custom.thing").is_none());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(resolve("fail_on = \"sometimes\"", Overrides::default()).is_err());
        assert!(
            resolve(
                "[checks.\"schema.blocks\"]\nseverity = \"fatal\"\n",
                Overrides::default()
            )
            .is_err()
        );
        assert!(
            resolve(
                "[checks.\"schema.blocks\"]\nallow = [\"azurerm_[\"]\n",
                Overrides::default()
            )
            .is_err()
        );
        assert!(resolve("provider = \"  \"", Overrides::default()).is_err());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(parse_config_toml("profile = ").is_err());
    }
}
