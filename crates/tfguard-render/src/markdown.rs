use crate::{RenderableReport, RenderableSeverity, RenderableVerdictStatus};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Tfguard report\n\n");
    let verdict = match report.verdict {
        RenderableVerdictStatus::Pass => "PASS",
        RenderableVerdictStatus::Warn => "WARN",
        RenderableVerdictStatus::Fail => "FAIL",
    };
    out.push_str(&format!(
        "- Verdict: **{}**\n- Profile: `{}`\n- Resources: {} scanned in {} file(s), {} without a provider schema\n- Findings: {} (emitted) / {} (total)\n\n",
        verdict,
        report.data.profile,
        report.data.resources_scanned,
        report.data.files_scanned,
        report.data.resources_unmatched,
        report.data.findings_emitted,
        report.data.findings_total
    ));

    if let Some(r) = &report.data.truncated_reason {
        out.push_str(&format!("> Note: {}\n\n", r));
    }

    if report.findings.is_empty() {
        out.push_str("No findings.\n");
        return out;
    }

    out.push_str("## Findings\n\n");

    for f in &report.findings {
        let sev = match f.severity {
            RenderableSeverity::Info => "INFO",
            RenderableSeverity::Warning => "WARN",
            RenderableSeverity::Error => "ERROR",
        };

        out.push_str(&format!(
            "- [{}] `{}` / `{}`: {}",
            sev,
            f.check_id.as_deref().unwrap_or(""),
            f.code,
            f.message
        ));
        if let Some(loc) = &f.location {
            match loc.line {
                Some(line) => out.push_str(&format!(" (`{}`:{})", loc.path, line)),
                None => out.push_str(&format!(" (`{}`)", loc.path)),
            }
        }
        out.push('\n');

        if let Some(help) = &f.help {
            out.push_str(&format!("  - help: {}\n", help));
        }
        if let Some(url) = &f.url {
            out.push_str(&format!("  - url: {}\n", url));
        }
    }

    out
}
