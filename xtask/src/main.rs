//! Developer tasks (schema generation, fixture conformance, explain coverage).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the project root (parent of xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    match manifest_dir.parent() {
        Some(parent) if manifest_dir.ends_with("xtask") => parent.to_path_buf(),
        _ => manifest_dir,
    }
}

fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

fn fixtures_dir() -> PathBuf {
    project_root().join("tests").join("fixtures")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_report_schema() -> schemars::Schema {
    schema_for!(tfguard_types::TfguardReport)
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(tfguard_settings::TfguardConfigV1)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "tfguard.report.v1.json",
            generate: generate_report_schema,
        },
        SchemaSpec {
            filename: "tfguard.config.v1.json",
            generate: generate_config_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

/// Emit schemas to the schemas/ directory.
fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Validate that schemas in the repo match what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }
    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {}", name);
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {}", name);
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Validate tests/fixtures/*/expected.report.json");
    eprintln!("  explain-coverage  Validate all check IDs and codes have explanations");
}

/// snake_case token, as used by codes.
fn is_valid_token(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Check that a path is clean: no absolute paths, no `../`, forward slashes only.
fn is_clean_path(path: &str) -> bool {
    !(path.starts_with('/')
        || path.starts_with('\\')
        || path.contains("..")
        || path.contains('\\')
        // Reject Windows-style drive letters like C:
        || (path.len() >= 2 && path.as_bytes()[1] == b':'))
}

/// Problems with one expected report, as human-readable lines.
fn check_expected_report(
    name: &str,
    value: &serde_json::Value,
    validator: &jsonschema::Validator,
) -> Vec<String> {
    let mut errors = Vec::new();

    for err in validator.iter_errors(value) {
        errors.push(format!("{}: schema validation: {}", name, err));
    }

    if tfguard_test_util::normalize_nondeterministic(value.clone()) != *value {
        errors.push(format!(
            "{}: timestamps and tool.version must use the __TIMESTAMP__/__VERSION__ placeholders",
            name
        ));
    }

    let known_checks = tfguard_types::explain::all_check_ids();
    let findings = value
        .get("findings")
        .and_then(|v| v.as_array())
        .map(Vec::as_slice)
        .unwrap_or_default();
    for (i, finding) in findings.iter().enumerate() {
        if let Some(path) = finding
            .get("location")
            .and_then(|l| l.get("path"))
            .and_then(|v| v.as_str())
            && !is_clean_path(path)
        {
            errors.push(format!(
                "{}: finding[{}].location.path '{}' is not clean (no absolute, no ../, forward slashes only)",
                name, i, path
            ));
        }
        if let Some(code) = finding.get("code").and_then(|v| v.as_str())
            && !is_valid_token(code)
        {
            errors.push(format!(
                "{}: finding[{}].code '{}' is not a valid token",
                name, i, code
            ));
        }
        if let Some(check_id) = finding.get("check_id").and_then(|v| v.as_str())
            && !known_checks.contains(&check_id)
        {
            errors.push(format!(
                "{}: finding[{}].check_id '{}' is not a registered check",
                name, i, check_id
            ));
        }
    }

    errors
}

fn fixture_reports(dir: &Path) -> anyhow::Result<Vec<(String, PathBuf)>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let path = entry?.path().join("expected.report.json");
        if path.is_file() {
            let name = path
                .parent()
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            out.push((name, path));
        }
    }
    out.sort();
    Ok(out)
}

/// Validate every fixture's expected report against the generated report schema.
fn conform() -> anyhow::Result<()> {
    let schema = serde_json::to_value(generate_report_schema())?;
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| anyhow::anyhow!("Failed to compile report schema: {}", e))?;
    println!("✓ tfguard.report.v1 schema compiles");

    let reports = fixture_reports(&fixtures_dir())?;
    if reports.is_empty() {
        bail!("no expected.report.json files under {}", fixtures_dir().display());
    }

    let mut errors = Vec::new();
    for (name, path) in &reports {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let value: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {} as JSON", path.display()))?;
        errors.extend(check_expected_report(name, &value, &validator));
    }

    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {}", err);
        }
        bail!("Conformance validation failed with {} errors", errors.len());
    }

    println!("✓ {} fixture reports conform", reports.len());
    Ok(())
}

/// Validate that all check IDs and codes have explanations.
fn explain_coverage() -> anyhow::Result<()> {
    let check_ids = tfguard_types::explain::all_check_ids();
    let codes = tfguard_types::explain::all_codes();

    let mut errors = Vec::new();
    for (kind, id) in check_ids
        .iter()
        .map(|id| ("Check ID", id))
        .chain(codes.iter().map(|code| ("Code", code)))
    {
        match tfguard_types::explain::lookup_explanation(id) {
            Some(exp) => {
                if exp.title.is_empty() {
                    errors.push(format!("{} '{}' has empty title", kind, id));
                }
                if exp.description.is_empty() {
                    errors.push(format!("{} '{}' has empty description", kind, id));
                }
                if exp.remediation.is_empty() {
                    errors.push(format!("{} '{}' has empty remediation", kind, id));
                }
            }
            None => errors.push(format!("{} '{}' has no explanation", kind, id)),
        }
    }

    if errors.is_empty() {
        println!("✓ {} check IDs have explanations", check_ids.len());
        println!("✓ {} codes have explanations", codes.len());
        println!("\n✓ All explain coverage checks passed!");
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {}", error);
        }
        bail!(
            "Explain coverage validation failed with {} errors",
            errors.len()
        )
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "explain-coverage" => explain_coverage(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
