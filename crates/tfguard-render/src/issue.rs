//! Tracking-issue body for schema gaps.

use crate::{RenderableGap, RenderableTruncation};
use std::collections::BTreeSet;

/// Collapse gaps that share `(resource_type, path, name, is_block)`.
///
/// When duplicates disagree on `required`, the required flavour is kept.
/// Output is sorted by that key.
pub fn dedup_gaps(gaps: &[RenderableGap]) -> Vec<RenderableGap> {
    let mut required: BTreeSet<(&str, &str, &str, bool)> = BTreeSet::new();
    let mut keys: BTreeSet<(&str, &str, &str, bool)> = BTreeSet::new();
    for g in gaps {
        let key = (
            g.resource_type.as_str(),
            g.path.as_str(),
            g.name.as_str(),
            g.is_block,
        );
        keys.insert(key);
        if g.required {
            required.insert(key);
        }
    }

    keys.into_iter()
        .map(|key @ (resource_type, path, name, is_block)| RenderableGap {
            resource_type: resource_type.to_string(),
            path: path.to_string(),
            name: name.to_string(),
            is_block,
            required: required.contains(&key),
        })
        .collect()
}

/// Markdown body of the tracking issue: one line per unique gap.
///
/// With `truncated` set the body says so up front, and the counts are
/// worded as a lower bound.
pub fn render_issue_body(
    gaps: &[RenderableGap],
    truncated: Option<&RenderableTruncation>,
) -> String {
    let unique = dedup_gaps(gaps);

    let mut out = String::new();
    out.push_str("## Terraform schema coverage\n\n");

    if let Some(t) = truncated {
        out.push_str(&format!(
            "> **Incomplete:** {}. Only {} of {} findings were kept; re-run `tfguard check` \
             with a larger `--max-findings` to list every gap.\n\n",
            t.reason, t.findings_emitted, t.findings_total
        ));
    }

    if unique.is_empty() {
        out.push_str(match truncated {
            Some(_) => "No schema gaps listed.\n",
            None => "No schema gaps found.\n",
        });
        return out;
    }

    let required = unique.iter().filter(|g| g.required).count();
    out.push_str(&format!(
        "{}{} gap(s) found ({} required, {} optional).\n\n",
        if truncated.is_some() { "At least " } else { "" },
        unique.len(),
        required,
        unique.len() - required
    ));

    for g in &unique {
        let requirement = if g.required { "required" } else { "optional" };
        let kind = if g.is_block { "block" } else { "attribute" };
        out.push_str(&format!(
            "- {}: missing {} {} `{}`",
            g.resource_type, requirement, kind, g.name
        ));
        if !g.path.is_empty() {
            out.push_str(&format!(" (in `{}`)", g.path));
        }
        out.push('\n');
    }

    out
}
