use std::collections::BTreeMap;
use tfguard_types::Severity;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailOn {
    Error,
    Warning,
}

#[derive(Clone, Debug)]
pub struct CheckPolicy {
    pub enabled: bool,
    /// Severity of required gaps. Optional gaps are always `info`.
    pub severity: Severity,
    /// Resource-type globs the check skips.
    pub allow: Vec<String>,
}

impl CheckPolicy {
    pub fn enabled(severity: Severity) -> Self {
        Self {
            enabled: true,
            severity,
            allow: Vec::new(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            severity: Severity::Info,
            allow: Vec::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct EffectiveConfig {
    pub profile: String,
    /// Restrict schema lookup to one provider address.
    pub provider: Option<String>,
    pub fail_on: FailOn,
    pub max_findings: usize,
    /// Emit `info` findings for absent optional attributes and blocks.
    pub report_optional: bool,
    /// Validate `data` blocks against the data source schemas too.
    pub include_data_sources: bool,
    pub checks: BTreeMap<String, CheckPolicy>,
}

impl EffectiveConfig {
    pub fn check_policy(&self, check_id: &str) -> Option<&CheckPolicy> {
        self.checks.get(check_id).filter(|p| p.enabled)
    }
}
