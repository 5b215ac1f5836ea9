use hcl_edit::Span;
use hcl_edit::expr::Expression;
use hcl_edit::parser::parse_body;
use hcl_edit::structure::{Block, BlockLabel, Body, Structure};
use tfguard_domain::build::build_tree;
use tfguard_domain::model::{
    ParsedResource, RawAttribute, RawBlock, RawBody, RawValue, ResourceMode,
};
use tfguard_types::{Location, RepoPath};
use tracing::debug;

/// A `.tf` file that is not valid HCL.
#[derive(Debug, thiserror::Error)]
#[error("{path}: invalid HCL: {message}")]
pub struct ParseError {
    pub path: String,
    pub message: String,
}

/// Calculate the 1-based line number from a byte offset in the source text.
fn byte_offset_to_line(source: &str, offset: usize) -> u32 {
    let line_count = source.as_bytes()[..offset.min(source.len())]
        .iter()
        .filter(|&&b| b == b'\n')
        .count();
    (line_count + 1) as u32
}

/// Parse HCL text into the syntax-free body the domain builds trees from.
pub fn parse_raw_body(path: &RepoPath, text: &str) -> Result<RawBody, ParseError> {
    let body = parse_body(text).map_err(|e| ParseError {
        path: path.as_str().to_string(),
        message: e.to_string(),
    })?;
    Ok(convert_body(&body, text))
}

/// Parse one Terraform file and return its `resource` and `data` declarations,
/// each with its normalized block tree.
///
/// Declarations without both a type and a name label are skipped.
pub fn parse_terraform_file(
    path: &RepoPath,
    text: &str,
) -> Result<Vec<ParsedResource>, ParseError> {
    let raw = parse_raw_body(path, text)?;
    Ok(resources_from(path, raw))
}

fn resources_from(path: &RepoPath, raw: RawBody) -> Vec<ParsedResource> {
    let mut out = Vec::new();
    for block in raw.blocks {
        let mode = match block.ident.as_str() {
            "resource" => ResourceMode::Managed,
            "data" => ResourceMode::Data,
            _ => continue,
        };
        let [resource_type, name, ..] = block.labels.as_slice() else {
            debug!(
                path = path.as_str(),
                line = ?block.line,
                "skipping {} block without type and name labels",
                mode.keyword()
            );
            continue;
        };
        out.push(ParsedResource {
            mode,
            resource_type: resource_type.clone(),
            name: name.clone(),
            location: Some(Location {
                path: path.clone(),
                line: block.line,
                col: None,
            }),
            data: build_tree(&block.body),
        });
    }
    out
}

fn convert_body(body: &Body, source: &str) -> RawBody {
    let mut raw = RawBody::default();
    for structure in body.iter() {
        match structure {
            Structure::Attribute(attr) => raw.attributes.push(RawAttribute {
                name: attr.key.as_str().to_string(),
                value: convert_value(&attr.value),
            }),
            Structure::Block(block) => raw.blocks.push(convert_block(block, source)),
        }
    }
    raw
}

fn convert_block(block: &Block, source: &str) -> RawBlock {
    RawBlock {
        ident: block.ident.as_str().to_string(),
        labels: block.labels.iter().map(label_text).collect(),
        body: convert_body(&block.body, source),
        line: block
            .span()
            .map(|span| byte_offset_to_line(source, span.start)),
    }
}

fn label_text(label: &BlockLabel) -> String {
    match label {
        BlockLabel::String(s) => s.value().clone(),
        BlockLabel::Ident(ident) => ident.as_str().to_string(),
    }
}

/// Only string literals and literal arrays are kept; variables, templates and
/// function calls have no static value here.
fn convert_value(expr: &Expression) -> RawValue {
    match expr {
        Expression::String(s) => RawValue::String(s.value().clone()),
        Expression::Array(items) => RawValue::Collection(items.iter().map(convert_value).collect()),
        _ => RawValue::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> RepoPath {
        RepoPath::new("main.tf")
    }

    #[test]
    fn extracts_resources_with_lines() {
        let text = r#"
terraform {
  required_version = ">= 1.5"
}

resource "azurerm_resource_group" "main" {
  name     = "rg"
  location = var.location
}

data "azurerm_client_config" "current" {}

resource "azurerm_storage_account" "sa" {
  name = "sa"
}
"#;
        let resources = parse_terraform_file(&path(), text).expect("parse");
        assert_eq!(resources.len(), 3);

        let rg = &resources[0];
        assert_eq!(rg.mode, ResourceMode::Managed);
        assert_eq!(rg.address(), "azurerm_resource_group.main");
        let loc = rg.location.as_ref().expect("location");
        assert_eq!(loc.path.as_str(), "main.tf");
        assert_eq!(loc.line, Some(6));
        assert!(rg.data.has_property("name"));
        assert!(rg.data.has_property("location"));

        assert_eq!(resources[1].mode, ResourceMode::Data);
        assert_eq!(resources[1].address(), "data.azurerm_client_config.current");
        assert_eq!(resources[2].location.as_ref().and_then(|l| l.line), Some(13));
    }

    #[test]
    fn resource_with_one_label_is_skipped() {
        let text = "resource \"azurerm_thing\" {\n  name = \"x\"\n}\n";
        assert!(parse_terraform_file(&path(), text).expect("parse").is_empty());
    }

    #[test]
    fn nested_lifecycle_and_dynamic_blocks_are_normalized() {
        let text = r#"
resource "azurerm_linux_web_app" "app" {
  name = "app"

  site_config {
    always_on = true

    dynamic "ip_restriction" {
      for_each = var.rules
      content {
        ip_address = ip_restriction.value
        action     = "Allow"
      }
    }
  }

  lifecycle {
    ignore_changes = ["tags", var.other, "app_settings"]
  }
}
"#;
        let resources = parse_terraform_file(&path(), text).expect("parse");
        let data = &resources[0].data;
        assert_eq!(data.ignore_changes, vec!["tags", "app_settings"]);

        let site = &data.static_blocks["site_config"];
        assert!(site.has_property("always_on"));
        let rule = &site.dynamic_blocks["ip_restriction"];
        assert!(rule.has_property("ip_address"));
        assert!(rule.has_property("action"));
        assert!(!rule.has_property("for_each"));
    }

    #[test]
    fn values_keep_only_literals() {
        let raw = parse_raw_body(
            &path(),
            "a = \"x\"\nb = [\"y\", 1, [\"z\"]]\nc = var.d\nd = \"${var.e}-f\"\n",
        )
        .expect("parse");
        let values: Vec<&RawValue> = raw.attributes.iter().map(|a| &a.value).collect();
        assert_eq!(values[0], &RawValue::String("x".to_string()));
        assert_eq!(
            values[1],
            &RawValue::Collection(vec![
                RawValue::String("y".to_string()),
                RawValue::Other,
                RawValue::Collection(vec![RawValue::String("z".to_string())]),
            ])
        );
        assert_eq!(values[2], &RawValue::Other);
        assert_eq!(values[3], &RawValue::Other);
    }

    #[test]
    fn syntax_error_names_the_file() {
        let err = parse_terraform_file(&RepoPath::new("broken.tf"), "resource \"a\" \"b\" {")
            .expect_err("should fail");
        assert_eq!(err.path, "broken.tf");
        assert!(err.to_string().starts_with("broken.tf: invalid HCL"));
    }

    #[test]
    fn byte_offset_to_line_counts_newlines() {
        assert_eq!(byte_offset_to_line("a\nb\nc", 0), 1);
        assert_eq!(byte_offset_to_line("a\nb\nc", 2), 2);
        assert_eq!(byte_offset_to_line("a\nb\nc", 100), 3);
    }
}
