//! Provider schema model, shaped after `terraform providers schema -json`.
//!
//! Pure reference data: decoded once, then only read.

use crate::model::ResourceMode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level document printed by `terraform providers schema -json`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderSchemas {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_version: Option<String>,

    /// Keyed by provider source address, e.g. `registry.terraform.io/hashicorp/azurerm`.
    #[serde(default)]
    pub provider_schemas: BTreeMap<String, ProviderSchema>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderSchema {
    #[serde(default)]
    pub resource_schemas: BTreeMap<String, ResourceSchema>,
    #[serde(default)]
    pub data_source_schemas: BTreeMap<String, ResourceSchema>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceSchema {
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub block: Option<SchemaBlock>,
}

/// Expected shape of one block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaBlock {
    #[serde(default)]
    pub attributes: BTreeMap<String, SchemaAttribute>,
    #[serde(default)]
    pub block_types: BTreeMap<String, SchemaBlockType>,
}

/// Attribute flags. `computed` attributes are filled in by the provider and
/// are never reported missing, whatever the other flags say.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaAttribute {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub computed: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaBlockType {
    #[serde(default, rename = "nesting_mode", alias = "nesting")]
    pub nesting: NestingMode,
    #[serde(default)]
    pub min_items: u64,
    /// Zero means unbounded (Terraform omits the key in that case).
    #[serde(default)]
    pub max_items: u64,
    #[serde(default)]
    pub block: Option<SchemaBlock>,
}

impl SchemaBlockType {
    pub fn is_required(&self) -> bool {
        self.min_items > 0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NestingMode {
    #[default]
    Single,
    List,
    Set,
    Map,
    Group,
    #[serde(other)]
    Unknown,
}

impl ProviderSchema {
    /// Block schema of `resource_type` in the table for `mode`.
    pub fn block_for(&self, mode: ResourceMode, resource_type: &str) -> Option<&SchemaBlock> {
        let table = match mode {
            ResourceMode::Managed => &self.resource_schemas,
            ResourceMode::Data => &self.data_source_schemas,
        };
        table.get(resource_type).and_then(|s| s.block.as_ref())
    }
}

impl ProviderSchemas {
    /// Schema of `resource_type` for the given mode.
    ///
    /// With `provider` set, only that provider is consulted. Otherwise providers
    /// are searched in address order and the first one declaring the type wins.
    pub fn resource_schema(
        &self,
        mode: ResourceMode,
        resource_type: &str,
        provider: Option<&str>,
    ) -> Option<&SchemaBlock> {
        match provider {
            Some(address) => self
                .provider_schemas
                .get(address)
                .and_then(|p| p.block_for(mode, resource_type)),
            None => self
                .provider_schemas
                .values()
                .find_map(|p| p.block_for(mode, resource_type)),
        }
    }

    pub fn resource_type_count(&self) -> usize {
        self.provider_schemas
            .values()
            .map(|p| p.resource_schemas.len())
            .sum()
    }
}
