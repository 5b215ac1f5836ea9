use camino::{Utf8Path, Utf8PathBuf};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Repo-relative path of a Terraform source file, as it appears in findings.
///
/// Always forward slashes, never a leading `./`, and `.` for the module root itself.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct RepoPath(String);

impl Default for RepoPath {
    fn default() -> Self {
        RepoPath::new(".")
    }
}

impl RepoPath {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        let mut v = s.as_ref().replace('\\', "/");
        while let Some(rest) = v.strip_prefix("./") {
            v = rest.to_string();
        }
        if v.is_empty() {
            v = ".".to_string();
        }
        Self(v)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_utf8_pathbuf(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.0.clone())
    }

    /// True for `*.tf` sources (not `*.tf.json`, which the HCL adapter cannot read).
    pub fn is_terraform_source(&self) -> bool {
        self.0.ends_with(".tf")
    }
}

impl From<&Utf8Path> for RepoPath {
    fn from(value: &Utf8Path) -> Self {
        RepoPath::new(value.as_str())
    }
}

impl From<Utf8PathBuf> for RepoPath {
    fn from(value: Utf8PathBuf) -> Self {
        RepoPath::new(value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_separators_and_leading_dot() {
        assert_eq!(RepoPath::new("./modules\\net/main.tf").as_str(), "modules/net/main.tf");
        assert_eq!(RepoPath::new("././main.tf").as_str(), "main.tf");
        assert_eq!(RepoPath::new("").as_str(), ".");
    }

    #[test]
    fn recognizes_terraform_sources() {
        assert!(RepoPath::new("main.tf").is_terraform_source());
        assert!(!RepoPath::new("main.tf.json").is_terraform_source());
        assert!(!RepoPath::new("terraform.tfvars").is_terraform_source());
    }
}
