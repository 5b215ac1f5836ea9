use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `tfguard.toml` schema v1.
///
/// User-facing and permissive: unknown profiles fall back to `strict`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TfguardConfigV1 {
    /// Optional schema string for tooling (`tfguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// `strict` (default), `warn` or `compat`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Provider source address to validate against, e.g.
    /// `registry.terraform.io/hashicorp/azurerm`. Unset means every provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// When to fail the check: `error` or `warning`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<String>,

    /// How many findings to emit before truncating the list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_findings: Option<u32>,

    /// Emit `info` findings for optional attributes and blocks that are not set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_optional: Option<bool>,

    /// Also validate `data` blocks against data source schemas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_data_sources: Option<bool>,

    /// Map of check_id -> config.
    #[serde(default)]
    pub checks: BTreeMap<String, CheckConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CheckConfig {
    /// Override preset enable/disable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Override preset severity: `info`, `warning`, `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,

    /// Resource-type globs the check skips, e.g. `azurerm_role_*`.
    #[serde(default)]
    pub allow: Vec<String>,
}
