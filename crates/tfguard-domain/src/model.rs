use std::collections::{BTreeMap, BTreeSet};
use tfguard_types::{Location, RepoPath};

/// Block type name that carries the exclusion list of the enclosing block.
pub const LIFECYCLE_BLOCK: &str = "lifecycle";
/// Attribute of the lifecycle block holding the exclusion list.
pub const IGNORE_CHANGES_ATTR: &str = "ignore_changes";
/// Block type name of a conditionally rendered block group.
pub const DYNAMIC_BLOCK: &str = "dynamic";
/// Child of a dynamic block holding the shape of each rendered instance.
pub const DYNAMIC_CONTENT_BLOCK: &str = "content";
/// Nested block type that is never reported missing.
pub const TIMEOUTS_BLOCK: &str = "timeouts";
/// First segment of every finding path.
pub const ROOT_PATH: &str = "root";

/// A configuration body as the syntax layer hands it over: attributes and
/// nested blocks in source order. Nothing here knows about HCL text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawBody {
    pub attributes: Vec<RawAttribute>,
    pub blocks: Vec<RawBlock>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RawAttribute {
    pub name: String,
    pub value: RawValue,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RawBlock {
    pub ident: String,
    pub labels: Vec<String>,
    pub body: RawBody,
    /// 1-based line of the block header, when the source position is known.
    pub line: Option<u32>,
}

/// Literal shape of an attribute value. Only string literals and literal
/// collections are kept; everything else collapses to `Other`.
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    String(String),
    /// List, set or tuple literal.
    Collection(Vec<RawValue>),
    Other,
}

/// Normalized shape of one configuration block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockData {
    /// Attribute names written in this block. Values are not retained.
    pub properties: BTreeSet<String>,
    /// Literal nested blocks, one per type name (the last one written wins).
    pub static_blocks: BTreeMap<String, BlockData>,
    /// `dynamic "<label>"` groups, merged per label.
    pub dynamic_blocks: BTreeMap<String, BlockData>,
    /// Names excluded from validation here and below.
    pub ignore_changes: Vec<String>,
}

impl BlockData {
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains(name)
    }

    /// Child block for `name`; a literal block takes precedence over a dynamic one.
    pub fn child(&self, name: &str) -> Option<&BlockData> {
        self.static_blocks
            .get(name)
            .or_else(|| self.dynamic_blocks.get(name))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceMode {
    /// `resource "type" "name"`
    Managed,
    /// `data "type" "name"`
    Data,
}

impl ResourceMode {
    pub fn keyword(self) -> &'static str {
        match self {
            ResourceMode::Managed => "resource",
            ResourceMode::Data => "data",
        }
    }
}

/// One top-level `resource` or `data` declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedResource {
    pub mode: ResourceMode,
    pub resource_type: String,
    pub name: String,
    pub location: Option<Location>,
    pub data: BlockData,
}

impl ParsedResource {
    /// Terraform address, e.g. `azurerm_storage_account.main` or
    /// `data.azurerm_client_config.current`.
    pub fn address(&self) -> String {
        match self.mode {
            ResourceMode::Managed => format!("{}.{}", self.resource_type, self.name),
            ResourceMode::Data => format!("data.{}.{}", self.resource_type, self.name),
        }
    }
}

/// All declarations of one Terraform root module.
#[derive(Clone, Debug, Default)]
pub struct ConfigModel {
    pub root: RepoPath,
    /// Source files that were parsed.
    pub files: Vec<RepoPath>,
    pub resources: Vec<ParsedResource>,
}

/// One attribute or block the schema expects but the configuration lacks.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValidationFinding {
    pub resource_type: String,
    /// Dot-joined block names from the resource body, starting at `root`.
    pub path: String,
    pub name: String,
    pub required: bool,
    pub is_block: bool,
}

impl ValidationFinding {
    /// Path without the leading `root` segment; empty for the resource body itself.
    pub fn relative_path(&self) -> &str {
        match self.path.strip_prefix(ROOT_PATH) {
            Some(rest) => rest.strip_prefix('.').unwrap_or(rest),
            None => &self.path,
        }
    }
}
