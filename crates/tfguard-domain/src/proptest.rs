//! Property-based tests for the domain crate.
//!
//! Covered invariants:
//! - computed attributes never surface as findings
//! - exclusions suppress findings at and below the declaring block, at any depth
//! - merge is order-insensitive for presence and idempotent
//! - evaluation is deterministic and respects `max_findings`

use crate::build::{build_tree, merge};
use crate::engine::evaluate;
use crate::model::{BlockData, ConfigModel, ParsedResource, ROOT_PATH, TIMEOUTS_BLOCK};
use crate::schema::{
    ProviderSchema, ProviderSchemas, ResourceSchema, SchemaAttribute, SchemaBlock,
};
use crate::test_support::{block_type, body, lifecycle, resource, strings};
use crate::validate::validate_resource;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use tfguard_types::{RepoPath, Severity};

// ============================================================================
// Strategies
// ============================================================================

fn arb_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,11}").unwrap()
}

fn arb_attribute() -> impl Strategy<Value = SchemaAttribute> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(required, optional, computed)| {
        SchemaAttribute {
            required,
            optional,
            computed,
        }
    })
}

fn arb_attributes() -> impl Strategy<Value = BTreeMap<String, SchemaAttribute>> {
    prop::collection::btree_map(arb_name(), arb_attribute(), 0..12)
}

fn arb_schema() -> impl Strategy<Value = SchemaBlock> {
    let leaf = arb_attributes().prop_map(|attributes| SchemaBlock {
        attributes,
        block_types: BTreeMap::new(),
    });

    leaf.prop_recursive(3, 24, 3, |inner| {
        (
            arb_attributes(),
            prop::collection::btree_map(arb_name(), (0u64..2, inner), 0..3),
        )
            .prop_map(|(attributes, nested)| SchemaBlock {
                attributes,
                block_types: nested
                    .into_iter()
                    .map(|(name, (min_items, block))| (name, block_type(min_items, block)))
                    .collect(),
            })
    })
}

fn arb_block_data() -> impl Strategy<Value = BlockData> {
    let leaf = (
        prop::collection::btree_set(arb_name(), 0..8),
        prop::collection::vec(arb_name(), 0..3),
    )
        .prop_map(|(properties, ignore_changes)| BlockData {
            properties,
            ignore_changes,
            ..BlockData::default()
        });

    leaf.prop_recursive(3, 24, 4, |inner| {
        (
            prop::collection::btree_set(arb_name(), 0..6),
            prop::collection::btree_map(arb_name(), inner.clone(), 0..3),
            prop::collection::btree_map(arb_name(), inner, 0..3),
        )
            .prop_map(|(properties, static_blocks, dynamic_blocks)| BlockData {
                properties,
                static_blocks,
                dynamic_blocks,
                ignore_changes: Vec::new(),
            })
    })
}

fn schemas_for(resource_type: &str, block: SchemaBlock) -> ProviderSchemas {
    let mut provider = ProviderSchema::default();
    provider.resource_schemas.insert(
        resource_type.to_string(),
        ResourceSchema {
            version: 0,
            block: Some(block),
        },
    );
    let mut schemas = ProviderSchemas::default();
    schemas
        .provider_schemas
        .insert("registry.terraform.io/hashicorp/test".to_string(), provider);
    schemas
}

/// Every property name reachable in the tree, across both child maps.
fn all_properties(data: &BlockData, out: &mut BTreeSet<String>) {
    out.extend(data.properties.iter().cloned());
    for child in data.static_blocks.values().chain(data.dynamic_blocks.values()) {
        all_properties(child, out);
    }
}

/// Data tree that instantiates every nested block of `schema` and sets only
/// the attributes named in `keep`.
fn mirror(schema: &SchemaBlock, keep: &BTreeSet<String>) -> BlockData {
    BlockData {
        properties: schema
            .attributes
            .keys()
            .filter(|name| keep.contains(*name))
            .cloned()
            .collect(),
        static_blocks: schema
            .block_types
            .iter()
            .map(|(name, bt)| {
                let child = bt
                    .block
                    .as_ref()
                    .map(|b| mirror(b, keep))
                    .unwrap_or_default();
                (name.clone(), child)
            })
            .collect(),
        ..BlockData::default()
    }
}

/// Number of gaps `data` should produce against `schema` when `excluded`
/// applies from the root down.
fn expected_gaps(schema: &SchemaBlock, data: &BlockData, excluded: &[String]) -> usize {
    let attributes = schema
        .attributes
        .iter()
        .filter(|(n, a)| !a.computed && !data.has_property(n) && !excluded.contains(n))
        .count();
    let blocks: usize = schema
        .block_types
        .iter()
        .filter(|(n, _)| n.as_str() != TIMEOUTS_BLOCK && !excluded.contains(n))
        .map(|(n, bt)| match (data.child(n), bt.block.as_ref()) {
            (Some(child), Some(block)) => expected_gaps(block, child, excluded),
            (Some(_), None) => 0,
            (None, _) => 1,
        })
        .sum();
    attributes + blocks
}

fn shape(data: &BlockData) -> (BTreeSet<String>, BTreeSet<String>) {
    let mut props = BTreeSet::new();
    all_properties(data, &mut props);
    let children = data
        .static_blocks
        .keys()
        .chain(data.dynamic_blocks.keys())
        .cloned()
        .collect();
    (props, children)
}

// ============================================================================
// Validation properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn computed_attributes_never_reported(
        schema in arb_schema(),
        present in prop::collection::btree_set(arb_name(), 0..8),
    ) {
        let data = BlockData { properties: present, ..BlockData::default() };
        let out = validate_resource(&resource("t", "r", data), Some(&schema));
        for f in &out {
            prop_assert_eq!(f.path.as_str(), ROOT_PATH);
            if f.is_block {
                prop_assert_eq!(f.required, schema.block_types[&f.name].is_required());
            } else {
                let attr = &schema.attributes[&f.name];
                prop_assert!(!attr.computed, "computed attribute {} reported", f.name);
                prop_assert_eq!(f.required, attr.required);
            }
        }
    }

    #[test]
    fn reported_names_are_absent_and_not_excluded(
        schema in arb_schema(),
        present in prop::collection::vec(arb_name(), 0..8),
        excluded in prop::collection::vec(arb_name(), 0..4),
    ) {
        let names: Vec<&str> = present.iter().map(String::as_str).collect();
        let excl: Vec<&str> = excluded.iter().map(String::as_str).collect();
        let data = build_tree(&body(&names, vec![lifecycle(strings(&excl))]));

        let out = validate_resource(&resource("t", "r", data.clone()), Some(&schema));
        for f in &out {
            if f.is_block {
                prop_assert!(data.child(&f.name).is_none());
            } else {
                prop_assert!(!data.has_property(&f.name));
            }
            prop_assert!(!excluded.contains(&f.name));
        }
        prop_assert_eq!(out.len(), expected_gaps(&schema, &data, &excluded));
    }

    #[test]
    fn root_exclusions_hold_at_every_depth(
        schema in arb_schema(),
        keep in prop::collection::btree_set(arb_name(), 0..8),
        excluded in prop::collection::vec(arb_name(), 1..4),
    ) {
        let mut data = mirror(&schema, &keep);
        data.ignore_changes = excluded.clone();

        let out = validate_resource(&resource("t", "r", data.clone()), Some(&schema));
        for f in &out {
            prop_assert!(
                !excluded.contains(&f.name),
                "excluded {} reported at {}",
                f.name,
                f.path
            );
            for segment in f.path.split('.').skip(1) {
                prop_assert!(
                    !excluded.iter().any(|e| e == segment),
                    "descended into excluded block {}",
                    segment
                );
            }
        }
        prop_assert_eq!(out.len(), expected_gaps(&schema, &data, &excluded));
    }

    #[test]
    fn nested_exclusions_do_not_leak_upward(
        schema in arb_schema(),
        excluded in prop::collection::vec(arb_name(), 1..4),
    ) {
        let mut data = mirror(&schema, &BTreeSet::new());
        for child in data.static_blocks.values_mut() {
            child.ignore_changes = excluded.clone();
        }

        let out = validate_resource(&resource("t", "r", data), Some(&schema));
        let root_expected = schema
            .attributes
            .iter()
            .filter(|(_, a)| !a.computed)
            .count();
        let root_reported = out
            .iter()
            .filter(|f| f.path == ROOT_PATH && !f.is_block)
            .count();
        prop_assert_eq!(root_reported, root_expected);
    }

    #[test]
    fn no_schema_means_no_findings(data in arb_block_data()) {
        prop_assert!(validate_resource(&resource("t", "r", data), None).is_empty());
    }
}

// ============================================================================
// Merge properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn merge_presence_is_order_insensitive(a in arb_block_data(), b in arb_block_data()) {
        let ab = merge(a.clone(), b.clone());
        let ba = merge(b, a);
        prop_assert_eq!(shape(&ab), shape(&ba));
        prop_assert_eq!(ab.ignore_changes.len(), ba.ignore_changes.len());
    }

    #[test]
    fn merge_with_self_keeps_presence(a in arb_block_data()) {
        let twice = merge(a.clone(), a.clone());
        prop_assert_eq!(shape(&twice), shape(&a));
    }

    #[test]
    fn merge_with_empty_is_identity(a in arb_block_data()) {
        prop_assert_eq!(merge(a.clone(), BlockData::default()), a.clone());
        prop_assert_eq!(merge(BlockData::default(), a.clone()), a);
    }
}

// ============================================================================
// Engine properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn evaluation_is_deterministic_and_bounded(
        schema in arb_schema(),
        resources in prop::collection::vec(
            (arb_name(), prop::collection::btree_set(arb_name(), 0..6)),
            0..6,
        ),
        max_findings in 0usize..10,
    ) {
        let schemas = schemas_for("t", schema);
        let model = ConfigModel {
            root: RepoPath::new("."),
            files: vec![RepoPath::new("main.tf")],
            resources: resources
                .into_iter()
                .map(|(name, properties)| {
                    resource("t", &name, BlockData { properties, ..BlockData::default() })
                })
                .collect::<Vec<ParsedResource>>(),
        };
        let mut cfg = crate::test_support::config(Severity::Warning, true);
        cfg.max_findings = max_findings;

        let first = evaluate(&model, &schemas, &cfg);
        let second = evaluate(&model, &schemas, &cfg);
        prop_assert_eq!(&first.findings, &second.findings);
        prop_assert!(first.findings.len() <= max_findings);
        prop_assert_eq!(first.data.findings_emitted as usize, first.findings.len());
        prop_assert!(first.data.findings_total >= first.data.findings_emitted);
        prop_assert_eq!(
            first.data.truncated_reason.is_some(),
            first.data.findings_total > first.data.findings_emitted
        );
    }
}
