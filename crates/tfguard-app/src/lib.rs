//! Use case orchestration for tfguard.
//!
//! This crate provides the application layer: use cases that coordinate the domain, repo, and
//! render layers. It stays thin and delegates heavy lifting to the appropriate layers.
//!
//! The CLI crate depends on this; it only handles argument parsing, processes, and network I/O.

#![forbid(unsafe_code)]

mod check;
mod explain;
mod issue;
mod render;
mod report;

pub use check::{CheckInput, CheckOutput, run_check, verdict_exit_code};
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use issue::{
    IssueError, IssueSyncOutcome, IssueTracker, RepoIdentity, TrackedIssue, gaps_from_report,
    issue_body, parse_github_remote, sync_issue,
};
pub use render::{render_annotations, render_markdown};
pub use report::{parse_report_json, runtime_error_report, serialize_report, to_renderable};
