//! Stable identifiers for checks and finding codes.
//!
//! `check_id` is a dotted namespace. `code` is a short snake_case discriminator.

// Checks
pub const CHECK_SCHEMA_ATTRIBUTES: &str = "schema.attributes";
pub const CHECK_SCHEMA_BLOCKS: &str = "schema.blocks";

// Codes: schema.attributes
pub const CODE_MISSING_REQUIRED_ATTRIBUTE: &str = "missing_required_attribute";
pub const CODE_MISSING_OPTIONAL_ATTRIBUTE: &str = "missing_optional_attribute";

// Codes: schema.blocks
pub const CODE_MISSING_REQUIRED_BLOCK: &str = "missing_required_block";
pub const CODE_MISSING_OPTIONAL_BLOCK: &str = "missing_optional_block";

// Tool-level
pub const CHECK_TOOL_RUNTIME: &str = "tool.runtime";
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";
