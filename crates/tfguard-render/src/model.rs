#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableSeverity {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableVerdictStatus {
    Pass,
    Warn,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableLocation {
    pub path: String,
    pub line: Option<u32>,
    pub col: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableFinding {
    pub severity: RenderableSeverity,
    pub check_id: Option<String>,
    pub code: String,
    pub message: String,
    pub location: Option<RenderableLocation>,
    pub help: Option<String>,
    pub url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableData {
    pub profile: String,
    pub files_scanned: u32,
    pub resources_scanned: u32,
    pub resources_unmatched: u32,
    pub findings_emitted: u32,
    pub findings_total: u32,
    pub truncated_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub verdict: RenderableVerdictStatus,
    pub findings: Vec<RenderableFinding>,
    pub data: RenderableData,
}

/// One schema gap as it appears in a tracking issue.
///
/// `path` is relative to the resource body (empty for the body itself), so the
/// same gap in two instances of a resource type renders once.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderableGap {
    pub resource_type: String,
    pub path: String,
    pub name: String,
    pub is_block: bool,
    pub required: bool,
}

/// The report behind a gap list was cut to `max_findings`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableTruncation {
    pub reason: String,
    pub findings_emitted: u32,
    pub findings_total: u32,
}
