use crate::model::{
    BlockData, ParsedResource, RawAttribute, RawBlock, RawBody, RawValue, ResourceMode,
};
use crate::policy::{CheckPolicy, EffectiveConfig, FailOn};
use crate::schema::{NestingMode, SchemaAttribute, SchemaBlock, SchemaBlockType};
use std::collections::BTreeMap;
use tfguard_types::{Location, RepoPath, Severity, ids};

pub fn body(attrs: &[&str], blocks: Vec<RawBlock>) -> RawBody {
    RawBody {
        attributes: attrs
            .iter()
            .map(|name| RawAttribute {
                name: name.to_string(),
                value: RawValue::Other,
            })
            .collect(),
        blocks,
    }
}

pub fn block(ident: &str, labels: &[&str], body: RawBody) -> RawBlock {
    RawBlock {
        ident: ident.to_string(),
        labels: labels.iter().map(|l| l.to_string()).collect(),
        body,
        line: None,
    }
}

pub fn lifecycle(value: RawValue) -> RawBlock {
    block(
        "lifecycle",
        &[],
        RawBody {
            attributes: vec![RawAttribute {
                name: "ignore_changes".to_string(),
                value,
            }],
            blocks: Vec::new(),
        },
    )
}

pub fn strings(values: &[&str]) -> RawValue {
    RawValue::Collection(
        values
            .iter()
            .map(|v| RawValue::String(v.to_string()))
            .collect(),
    )
}

pub fn block_data(props: &[&str]) -> BlockData {
    BlockData {
        properties: props.iter().map(|p| p.to_string()).collect(),
        ..BlockData::default()
    }
}

pub fn required() -> SchemaAttribute {
    SchemaAttribute {
        required: true,
        optional: false,
        computed: false,
    }
}

pub fn optional() -> SchemaAttribute {
    SchemaAttribute {
        required: false,
        optional: true,
        computed: false,
    }
}

pub fn computed() -> SchemaAttribute {
    SchemaAttribute {
        required: false,
        optional: true,
        computed: true,
    }
}

pub fn schema(
    attributes: Vec<(&str, SchemaAttribute)>,
    block_types: Vec<(&str, SchemaBlockType)>,
) -> SchemaBlock {
    SchemaBlock {
        attributes: attributes
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        block_types: block_types
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    }
}

pub fn block_type(min_items: u64, block: SchemaBlock) -> SchemaBlockType {
    SchemaBlockType {
        nesting: NestingMode::List,
        min_items,
        max_items: 0,
        block: Some(block),
    }
}

pub fn resource(resource_type: &str, name: &str, data: BlockData) -> ParsedResource {
    ParsedResource {
        mode: ResourceMode::Managed,
        resource_type: resource_type.to_string(),
        name: name.to_string(),
        location: Some(Location {
            path: RepoPath::new("main.tf"),
            line: Some(1),
            col: None,
        }),
        data,
    }
}

pub fn config(severity: Severity, report_optional: bool) -> EffectiveConfig {
    let mut checks = BTreeMap::new();
    checks.insert(
        ids::CHECK_SCHEMA_ATTRIBUTES.to_string(),
        CheckPolicy::enabled(severity),
    );
    checks.insert(
        ids::CHECK_SCHEMA_BLOCKS.to_string(),
        CheckPolicy::enabled(severity),
    );
    EffectiveConfig {
        profile: "test".to_string(),
        provider: None,
        fail_on: FailOn::Error,
        max_findings: 200,
        report_optional,
        include_data_sources: false,
        checks,
    }
}
