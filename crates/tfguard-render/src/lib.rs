//! Rendering utilities for CI surfaces (Markdown, GitHub annotations, tracking issues).

#![forbid(unsafe_code)]

mod gha;
mod issue;
mod markdown;
mod model;

pub use gha::render_github_annotations;
pub use issue::{dedup_gaps, render_issue_body};
pub use markdown::render_markdown;
pub use model::{
    RenderableData, RenderableFinding, RenderableGap, RenderableLocation, RenderableReport,
    RenderableSeverity, RenderableTruncation, RenderableVerdictStatus,
};
