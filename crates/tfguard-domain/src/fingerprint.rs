use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for one schema gap.
///
/// Identity fields match the issue dedup key:
/// - resource type
/// - block path below the resource root (empty for the root itself)
/// - attribute or block name
/// - whether it is a block
pub fn fingerprint_for_gap(
    resource_type: &str,
    relative_path: &str,
    name: &str,
    is_block: bool,
) -> String {
    let kind = if is_block { "block" } else { "attribute" };
    let canonical = [resource_type, relative_path, name, kind].join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
