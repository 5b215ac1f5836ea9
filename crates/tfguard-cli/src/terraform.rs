//! External processes: `terraform` for provider schemas, `git` for the origin remote.

use anyhow::Context;
use camino::Utf8Path;
use std::process::{Command, Output};
use tracing::{debug, info};

/// Run `terraform init` and `terraform providers schema -json` in `module_root`
/// and return the schema document.
pub fn provider_schema_json(terraform_bin: &str, module_root: &Utf8Path) -> anyhow::Result<String> {
    info!(root = %module_root, "running terraform init");
    let init = Command::new(terraform_bin)
        .current_dir(module_root)
        .args(["init", "-input=false", "-no-color"])
        .output()
        .with_context(|| format!("spawn {terraform_bin}"))?;
    ensure_success("terraform init", &init)?;

    debug!("reading provider schemas");
    let schema = Command::new(terraform_bin)
        .current_dir(module_root)
        .args(["providers", "schema", "-json"])
        .output()
        .with_context(|| format!("spawn {terraform_bin}"))?;
    ensure_success("terraform providers schema -json", &schema)?;

    String::from_utf8(schema.stdout).context("provider schema output is not UTF-8")
}

/// URL of the `origin` remote of the repository containing `dir`.
pub fn git_origin_url(dir: &Utf8Path) -> anyhow::Result<String> {
    let output = Command::new("git")
        .current_dir(dir)
        .args(["remote", "get-url", "origin"])
        .output()
        .context("spawn git")?;
    ensure_success("git remote get-url origin", &output)?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn ensure_success(what: &str, output: &Output) -> anyhow::Result<()> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("{what} failed ({}): {}", output.status, stderr.trim())
}
