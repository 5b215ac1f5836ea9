//! Explain registry for checks and codes.
//!
//! Maps check IDs and codes to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a check or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the check/code.
    pub title: &'static str,
    /// What the check does and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after HCL examples.
    pub examples: ExamplePair,
}

/// Before and after HCL examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Configuration that would trigger a finding.
    pub before: &'static str,
    /// Configuration that passes the check.
    pub after: &'static str,
}

/// Look up an explanation by check_id or code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        ids::CHECK_SCHEMA_ATTRIBUTES => Some(explain_schema_attributes()),
        ids::CHECK_SCHEMA_BLOCKS => Some(explain_schema_blocks()),

        ids::CODE_MISSING_REQUIRED_ATTRIBUTE => Some(explain_missing_required_attribute()),
        ids::CODE_MISSING_OPTIONAL_ATTRIBUTE => Some(explain_missing_optional_attribute()),
        ids::CODE_MISSING_REQUIRED_BLOCK => Some(explain_missing_required_block()),
        ids::CODE_MISSING_OPTIONAL_BLOCK => Some(explain_missing_optional_block()),

        _ => None,
    }
}

/// List all known check IDs.
pub fn all_check_ids() -> &'static [&'static str] {
    &[ids::CHECK_SCHEMA_ATTRIBUTES, ids::CHECK_SCHEMA_BLOCKS]
}

/// List all known codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_MISSING_REQUIRED_ATTRIBUTE,
        ids::CODE_MISSING_OPTIONAL_ATTRIBUTE,
        ids::CODE_MISSING_REQUIRED_BLOCK,
        ids::CODE_MISSING_OPTIONAL_BLOCK,
    ]
}

// --- Check-level explanations ---

fn explain_schema_attributes() -> Explanation {
    Explanation {
        title: "Schema Attribute Coverage",
        description: "\
Compares the attributes written in each resource (and in each nested block) against
the attributes the provider schema declares for that resource type.

Every non-computed attribute that is absent is reported:
- required attributes are reported at the configured severity
- optional attributes are reported as info (when `report_optional` is on)

Optional gaps are useful during provider upgrades: new arguments show up here
before anybody decides whether the module should set them.

Attributes named in a `lifecycle { ignore_changes = [...] }` list are treated as
covered, at that level and in every block nested below it.",
        remediation: "\
Set the attribute explicitly, or list it under `lifecycle.ignore_changes` if it is
managed outside Terraform. Use the `allow` list in `tfguard.toml` to skip whole
resource types.",
        examples: ExamplePair {
            before: r#"resource "azurerm_resource_group" "main" {
  name = "rg-main"
}"#,
            after: r#"resource "azurerm_resource_group" "main" {
  name     = "rg-main"
  location = "westeurope"
}"#,
        },
    }
}

fn explain_schema_blocks() -> Explanation {
    Explanation {
        title: "Schema Block Coverage",
        description: "\
Compares the nested blocks of each resource against the block types the provider
schema declares. A block type counts as present when it is written literally or
rendered through a `dynamic` block of the same name.

A missing block type is required when the schema gives it `min_items > 0`.
`timeouts` blocks are never reported. Present blocks are validated recursively
against their nested schema.",
        remediation: "\
Add the block (literally or via `dynamic`), or list its name under
`lifecycle.ignore_changes`.",
        examples: ExamplePair {
            before: r#"resource "azurerm_kubernetes_cluster" "aks" {
  name = "aks"
}"#,
            after: r#"resource "azurerm_kubernetes_cluster" "aks" {
  name = "aks"

  default_node_pool {
    name    = "system"
    vm_size = "Standard_D2s_v3"
  }
}"#,
        },
    }
}

// --- Code-level explanations ---

fn explain_missing_required_attribute() -> Explanation {
    let mut exp = explain_schema_attributes();
    exp.title = "Missing Required Attribute";
    exp
}

fn explain_missing_optional_attribute() -> Explanation {
    let mut exp = explain_schema_attributes();
    exp.title = "Missing Optional Attribute";
    exp
}

fn explain_missing_required_block() -> Explanation {
    let mut exp = explain_schema_blocks();
    exp.title = "Missing Required Block";
    exp
}

fn explain_missing_optional_block() -> Explanation {
    Explanation {
        title: "Missing Optional Block",
        description: "\
The provider schema declares a nested block type with `min_items = 0` that the
resource does not configure. This is informational.",
        remediation: "\
Configure the block if the default behavior is not what you want, or add it to
`lifecycle.ignore_changes` to acknowledge it.",
        examples: ExamplePair {
            before: r#"resource "azurerm_storage_account" "sa" {
  name = "sa"
}"#,
            after: r#"resource "azurerm_storage_account" "sa" {
  name = "sa"

  lifecycle {
    ignore_changes = ["network_rules"]
  }
}"#,
        },
    }
}
