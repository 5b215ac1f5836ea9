//! The `issue` use case: keep one open tracking issue in sync with the latest report.

use tfguard_domain::model::ValidationFinding;
use tfguard_render::{RenderableGap, RenderableTruncation};
use tfguard_types::{TfguardReport, ids};
use tracing::{debug, info};

/// Failure talking to an issue tracker.
#[derive(Debug, thiserror::Error)]
pub enum IssueError {
    #[error("issue tracker request failed: {0}")]
    Request(String),
    #[error("issue tracker returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected issue tracker response: {0}")]
    Response(String),
}

/// An open issue as the tracker reports it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackedIssue {
    pub number: u64,
    pub body: String,
}

/// Issue tracker seam. The CLI implements it over the GitHub REST API; tests use an
/// in-memory fake.
pub trait IssueTracker {
    /// The open issue whose title is exactly `title`, if any.
    fn find_open_issue(&self, title: &str) -> Result<Option<TrackedIssue>, IssueError>;
    /// Create an issue and return its number.
    fn create_issue(&self, title: &str, body: &str) -> Result<u64, IssueError>;
    fn update_issue(&self, number: u64, body: &str) -> Result<(), IssueError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IssueSyncOutcome {
    Created(u64),
    Updated(u64),
    Unchanged(u64),
}

/// Create the issue, or update its body if it changed.
pub fn sync_issue(
    tracker: &dyn IssueTracker,
    title: &str,
    body: &str,
) -> Result<IssueSyncOutcome, IssueError> {
    match tracker.find_open_issue(title)? {
        Some(existing) if existing.body.trim_end() == body.trim_end() => {
            debug!(number = existing.number, "issue body unchanged");
            Ok(IssueSyncOutcome::Unchanged(existing.number))
        }
        Some(existing) => {
            tracker.update_issue(existing.number, body)?;
            info!(number = existing.number, "updated issue");
            Ok(IssueSyncOutcome::Updated(existing.number))
        }
        None => {
            let number = tracker.create_issue(title, body)?;
            info!(number, "created issue");
            Ok(IssueSyncOutcome::Created(number))
        }
    }
}

/// Schema gaps carried by a report, with paths made relative to the resource body.
///
/// Findings from other checks (such as `tool.runtime`) and findings without a
/// structured payload are skipped.
pub fn gaps_from_report(report: &TfguardReport) -> Vec<RenderableGap> {
    report
        .findings
        .iter()
        .filter(|f| {
            f.check_id == ids::CHECK_SCHEMA_ATTRIBUTES || f.check_id == ids::CHECK_SCHEMA_BLOCKS
        })
        .filter_map(|f| {
            let data = &f.data;
            let gap = ValidationFinding {
                resource_type: data.get("resource_type")?.as_str()?.to_string(),
                path: data.get("path")?.as_str()?.to_string(),
                name: data.get("name")?.as_str()?.to_string(),
                required: data.get("required")?.as_bool()?,
                is_block: data.get("is_block")?.as_bool()?,
            };
            Some(RenderableGap {
                path: gap.relative_path().to_string(),
                resource_type: gap.resource_type,
                name: gap.name,
                is_block: gap.is_block,
                required: gap.required,
            })
        })
        .collect()
}

/// Issue body for `report`. A report cut to `max_findings` yields a body
/// marked incomplete.
pub fn issue_body(report: &TfguardReport) -> String {
    let truncation = report
        .data
        .truncated_reason
        .as_ref()
        .map(|reason| RenderableTruncation {
            reason: reason.clone(),
            findings_emitted: report.data.findings_emitted,
            findings_total: report.data.findings_total,
        });
    tfguard_render::render_issue_body(&gaps_from_report(report), truncation.as_ref())
}

/// `owner/name` of a GitHub repository.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepoIdentity {
    pub owner: String,
    pub name: String,
}

impl RepoIdentity {
    /// Parse `owner/name`.
    pub fn parse(slug: &str) -> Option<Self> {
        let (owner, name) = slug.trim().split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

/// Repository identity from a GitHub remote URL.
///
/// Accepts `git@github.com:o/r.git`, `ssh://git@github.com/o/r.git` and
/// `https://github.com/o/r(.git)`.
pub fn parse_github_remote(url: &str) -> Option<RepoIdentity> {
    let url = url.trim();
    let rest = url
        .strip_prefix("git@github.com:")
        .or_else(|| url.strip_prefix("ssh://git@github.com/"))
        .or_else(|| url.strip_prefix("https://github.com/"))
        .or_else(|| url.strip_prefix("http://github.com/"))?;
    let rest = rest.trim_end_matches('/');
    let rest = rest.strip_suffix(".git").unwrap_or(rest);
    RepoIdentity::parse(rest)
}
