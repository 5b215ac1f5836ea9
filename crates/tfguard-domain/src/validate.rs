//! Recursive reconciliation of a [`BlockData`] tree against a [`SchemaBlock`] tree.

use crate::model::{BlockData, ParsedResource, ROOT_PATH, TIMEOUTS_BLOCK, ValidationFinding};
use crate::schema::SchemaBlock;

/// Walk `data` and `schema` in lock-step and append every gap to `out`.
///
/// `ancestor_ignore` is the exclusion list accumulated from enclosing blocks;
/// this block's own `ignore_changes` is appended to it before both passes and
/// handed down on recursion. A missing schema node ends the walk for that
/// subtree without findings.
pub fn validate(
    data: &BlockData,
    ancestor_ignore: &[String],
    schema: Option<&SchemaBlock>,
    resource_type: &str,
    path: &str,
    out: &mut Vec<ValidationFinding>,
) {
    let Some(schema) = schema else {
        return;
    };

    let mut ignore = Vec::with_capacity(ancestor_ignore.len() + data.ignore_changes.len());
    ignore.extend_from_slice(ancestor_ignore);
    ignore.extend(data.ignore_changes.iter().cloned());
    let excluded = |name: &str| ignore.iter().any(|i| i == name);

    for (name, attr) in &schema.attributes {
        if attr.computed || excluded(name) {
            continue;
        }
        if !data.has_property(name) {
            out.push(ValidationFinding {
                resource_type: resource_type.to_string(),
                path: path.to_string(),
                name: name.clone(),
                required: attr.required,
                is_block: false,
            });
        }
    }

    for (name, block_type) in &schema.block_types {
        if name == TIMEOUTS_BLOCK || excluded(name) {
            continue;
        }
        match data.child(name) {
            Some(child) => validate(
                child,
                &ignore,
                block_type.block.as_ref(),
                resource_type,
                &format!("{path}.{name}"),
                out,
            ),
            None => out.push(ValidationFinding {
                resource_type: resource_type.to_string(),
                path: path.to_string(),
                name: name.clone(),
                required: block_type.is_required(),
                is_block: true,
            }),
        }
    }
}

/// Validate one resource from its root, with findings sorted by `(path, name)`.
pub fn validate_resource(
    resource: &ParsedResource,
    schema: Option<&SchemaBlock>,
) -> Vec<ValidationFinding> {
    let mut out = Vec::new();
    validate(
        &resource.data,
        &[],
        schema,
        &resource.resource_type,
        ROOT_PATH,
        &mut out,
    );
    out.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.name.cmp(&b.name)));
    out
}
