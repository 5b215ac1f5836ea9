//! Repository adapters: discover Terraform sources, parse HCL, decode provider schemas.
//!
//! This crate is allowed to do filesystem IO. It does not spawn processes; obtaining
//! schema JSON from `terraform` is the caller's job (typically the CLI).

#![forbid(unsafe_code)]

mod discover;
mod parse;
mod schema;

use anyhow::Context;
use camino::Utf8Path;
use rayon::prelude::*;
use tfguard_domain::model::{ConfigModel, ParsedResource};
use tfguard_types::RepoPath;
use tracing::debug;

pub use discover::discover_terraform_files;
pub use parse::{ParseError, parse_raw_body, parse_terraform_file};
pub use schema::parse_provider_schemas;

/// Fuzz-friendly API for testing parsing robustness without filesystem access.
/// These functions are designed to never panic on any input.
pub mod fuzz {
    use super::*;

    /// Parse arbitrary text as a Terraform file.
    ///
    /// Returns `Ok(resource_count)` on valid HCL, `Err(...)` otherwise.
    /// **Never panics** on any input.
    pub fn parse_terraform(text: &str) -> anyhow::Result<usize> {
        let path = RepoPath::new("fuzz.tf");
        let resources = parse::parse_terraform_file(&path, text)?;
        Ok(resources.len())
    }

    /// Decode arbitrary text as provider schema JSON. **Never panics** on any input.
    pub fn parse_schema(text: &str) -> anyhow::Result<usize> {
        Ok(schema::parse_provider_schemas(text)?.resource_type_count())
    }
}

/// Build the in-memory configuration model used by the engine.
///
/// `module_root` is the Terraform root module directory. Files are parsed in
/// parallel; resources come back in file order, then source order.
pub fn build_config_model(module_root: &Utf8Path) -> anyhow::Result<ConfigModel> {
    let files = discover::discover_terraform_files(module_root).context("discover .tf files")?;
    debug!(root = %module_root, files = files.len(), "discovered terraform files");

    let parsed: Vec<(RepoPath, Vec<ParsedResource>)> = files
        .par_iter()
        .map(|rel| -> anyhow::Result<_> {
            let abs = module_root.join(rel.as_str());
            let text = std::fs::read_to_string(&abs).with_context(|| format!("read {}", abs))?;
            let resources = parse::parse_terraform_file(rel, &text)?;
            Ok((rel.clone(), resources))
        })
        .collect::<anyhow::Result<_>>()?;

    let mut by_file = parsed;
    by_file.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(ConfigModel {
        root: RepoPath::from(module_root),
        files,
        resources: by_file.into_iter().flat_map(|(_, r)| r).collect(),
    })
}
