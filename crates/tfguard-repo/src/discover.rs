use camino::{Utf8Path, Utf8PathBuf};
use std::path::PathBuf;
use tfguard_types::RepoPath;
use walkdir::WalkDir;

/// Directory Terraform uses for downloaded providers and modules.
const TERRAFORM_DATA_DIR: &str = ".terraform";

/// Discover the `*.tf` files of the root module at `module_root`.
///
/// A Terraform module is a single directory, so subdirectories (including
/// `.terraform/`) are not descended into. Paths are sorted.
pub fn discover_terraform_files(module_root: &Utf8Path) -> anyhow::Result<Vec<RepoPath>> {
    if !module_root.is_dir() {
        anyhow::bail!("module root is not a directory: {module_root}");
    }

    let mut out: Vec<RepoPath> = WalkDir::new(module_root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_entry(|e| e.file_name() != TERRAFORM_DATA_DIR)
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| pathbuf_to_utf8(e.path().to_path_buf()))
        .filter_map(|abs| abs.file_name().map(RepoPath::new))
        .filter(RepoPath::is_terraform_source)
        .collect();

    // Stable order.
    out.sort();
    out.dedup();

    Ok(out)
}

fn pathbuf_to_utf8(path: PathBuf) -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).ok()
}
