use anyhow::Context;
use tfguard_domain::schema::ProviderSchemas;

/// Decode the output of `terraform providers schema -json`.
///
/// Unknown keys are ignored. A document without `provider_schemas` decodes to
/// an empty schema set, which validates nothing.
pub fn parse_provider_schemas(text: &str) -> anyhow::Result<ProviderSchemas> {
    let schemas: ProviderSchemas =
        serde_json::from_str(text).context("parse provider schema JSON")?;
    Ok(schemas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfguard_domain::model::ResourceMode;

    #[test]
    fn decodes_minimal_document() {
        let text = r#"{
  "format_version": "1.0",
  "provider_schemas": {
    "registry.terraform.io/hashicorp/azurerm": {
      "resource_schemas": {
        "azurerm_resource_group": {
          "version": 0,
          "block": {
            "attributes": { "name": { "type": "string", "required": true } },
            "block_types": {
              "timeouts": { "nesting_mode": "single", "block": {} }
            }
          }
        }
      }
    }
  }
}"#;
        let schemas = parse_provider_schemas(text).expect("decode");
        let rg = schemas
            .resource_schema(ResourceMode::Managed, "azurerm_resource_group", None)
            .expect("rg");
        assert!(rg.attributes["name"].required);
        assert_eq!(schemas.format_version.as_deref(), Some("1.0"));
    }

    #[test]
    fn empty_object_has_no_providers() {
        let schemas = parse_provider_schemas("{}").expect("decode");
        assert_eq!(schemas.resource_type_count(), 0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = parse_provider_schemas("{ not json").expect_err("should fail");
        assert!(format!("{err:#}").contains("parse provider schema JSON"));
    }
}
