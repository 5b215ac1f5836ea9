use std::collections::BTreeMap;
use tfguard_domain::policy::{CheckPolicy, EffectiveConfig, FailOn};
use tfguard_types::Severity;

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything complex should go into repo config.
pub fn preset(profile: &str) -> EffectiveConfig {
    match profile {
        "warn" => warn_profile(),
        "compat" => compat_profile(),
        // default
        _ => strict_profile(),
    }
}

fn strict_profile() -> EffectiveConfig {
    EffectiveConfig {
        profile: "strict".to_string(),
        provider: None,
        fail_on: FailOn::Error,
        max_findings: 200,
        report_optional: true,
        include_data_sources: false,
        checks: default_checks(Severity::Error),
    }
}

fn warn_profile() -> EffectiveConfig {
    EffectiveConfig {
        profile: "warn".to_string(),
        provider: None,
        fail_on: FailOn::Warning,
        max_findings: 200,
        report_optional: true,
        include_data_sources: false,
        checks: default_checks(Severity::Warning),
    }
}

fn compat_profile() -> EffectiveConfig {
    // Required gaps only, and never blocking.
    EffectiveConfig {
        profile: "compat".to_string(),
        provider: None,
        fail_on: FailOn::Error,
        max_findings: 200,
        report_optional: false,
        include_data_sources: false,
        checks: default_checks(Severity::Warning),
    }
}

fn default_checks(default_severity: Severity) -> BTreeMap<String, CheckPolicy> {
    use tfguard_types::ids::*;
    let mut m = BTreeMap::new();

    m.insert(
        CHECK_SCHEMA_ATTRIBUTES.to_string(),
        CheckPolicy::enabled(default_severity),
    );
    m.insert(
        CHECK_SCHEMA_BLOCKS.to_string(),
        CheckPolicy::enabled(default_severity),
    );

    m
}
