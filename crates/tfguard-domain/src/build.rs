//! Raw configuration body -> normalized [`BlockData`] tree.

use crate::model::{
    BlockData, DYNAMIC_BLOCK, DYNAMIC_CONTENT_BLOCK, IGNORE_CHANGES_ATTR, LIFECYCLE_BLOCK,
    RawBody, RawValue,
};
use std::collections::BTreeMap;
use tracing::warn;

/// Build the normalized tree for one block body.
///
/// - attributes are recorded by name only
/// - `lifecycle` contributes its `ignore_changes` list to *this* block
/// - `dynamic "<label>"` is resolved and merged into `dynamic_blocks[label]`
/// - any other block becomes `static_blocks[ident]`; a repeated ident replaces the earlier one
pub fn build_tree(body: &RawBody) -> BlockData {
    let mut data = BlockData::default();

    for attr in &body.attributes {
        data.properties.insert(attr.name.clone());
    }

    for block in &body.blocks {
        match block.ident.as_str() {
            LIFECYCLE_BLOCK => data.ignore_changes.extend(lifecycle_exclusions(&block.body)),
            DYNAMIC_BLOCK => {
                let [label] = block.labels.as_slice() else {
                    warn!(
                        labels = block.labels.len(),
                        line = ?block.line,
                        "skipping dynamic block without exactly one label"
                    );
                    continue;
                };
                let rendered = resolve_dynamic(&block.body);
                let merged = match data.dynamic_blocks.remove(label) {
                    Some(existing) => merge(existing, rendered),
                    None => rendered,
                };
                data.dynamic_blocks.insert(label.clone(), merged);
            }
            ident => {
                data.static_blocks.insert(ident.to_string(), build_tree(&block.body));
            }
        }
    }

    data
}

/// Names listed by a value of `lifecycle.ignore_changes`.
///
/// A single string is one name, a literal collection contributes its string
/// elements in order. Anything else contributes nothing.
pub fn exclusions_from(value: &RawValue) -> Vec<String> {
    match value {
        RawValue::String(s) => vec![s.clone()],
        RawValue::Collection(items) => items
            .iter()
            .filter_map(|item| match item {
                RawValue::String(s) => Some(s.clone()),
                _ => None,
            })
            .collect(),
        RawValue::Other => Vec::new(),
    }
}

fn lifecycle_exclusions(body: &RawBody) -> Vec<String> {
    body.attributes
        .iter()
        .filter(|attr| attr.name == IGNORE_CHANGES_ATTR)
        .flat_map(|attr| exclusions_from(&attr.value))
        .collect()
}

/// Rendered shape of one `dynamic` group: the merge of its `content` blocks,
/// or the dynamic body itself when it has none.
fn resolve_dynamic(body: &RawBody) -> BlockData {
    let mut contents = body
        .blocks
        .iter()
        .filter(|b| b.ident == DYNAMIC_CONTENT_BLOCK)
        .map(|b| build_tree(&b.body));

    match contents.next() {
        Some(first) => contents.fold(first, merge),
        None => build_tree(body),
    }
}

/// Merge two renderings of the same block type.
///
/// Properties are unioned, child maps are merged key by key (recursively on
/// collision), and exclusion lists are concatenated.
pub fn merge(mut base: BlockData, incoming: BlockData) -> BlockData {
    base.properties.extend(incoming.properties);
    merge_children(&mut base.static_blocks, incoming.static_blocks);
    merge_children(&mut base.dynamic_blocks, incoming.dynamic_blocks);
    base.ignore_changes.extend(incoming.ignore_changes);
    base
}

fn merge_children(into: &mut BTreeMap<String, BlockData>, from: BTreeMap<String, BlockData>) {
    for (name, child) in from {
        let merged = match into.remove(&name) {
            Some(existing) => merge(existing, child),
            None => child,
        };
        into.insert(name, merged);
    }
}
