use crate::models::{ComplianceRun, ComplianceStatus, Permit};

/// Render the Markdown compliance report for a finished run.
pub fn generate_markdown_report(permit: &Permit, run: &ComplianceRun, report_id: &str) -> String {
    let counts = run.status_counts();
    let mut out = String::new();

    out.push_str(&format!("# BAT/RIE Compliance Report {report_id}\n\n"));
    out.push_str(&format!(
        "**Permit:** {} ({})\n\n**Generated:** {}\n\n",
        permit.title,
        permit.permit_id,
        run.finished_at.format("%Y-%m-%d %H:%M"),
    ));

    out.push_str("## Installation activities\n\n");
    out.push_str(&permit.activity_description);
    out.push_str("\n\n");

    out.push_str("## Summary\n\n");
    out.push_str(&format!(
        "| Status | Count |\n|---|---|\n| Compliant | {} |\n| Partially Compliant | {} |\n| Non-Compliant | {} |\n| Ambiguous / Insufficient Information | {} |\n\n",
        counts.compliant,
        counts.partially_compliant,
        counts.non_compliant,
        counts.insufficient_information,
    ));

    out.push_str("## BREF applicability\n\n");
    if run.assessments.is_empty() {
        out.push_str("_No BREF documents were assessed._\n\n");
    } else {
        out.push_str("| BREF | Applicability | Justification |\n|---|---|---|\n");
        for assessment in &run.assessments {
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                assessment.bref_id,
                assessment.applicability.label(),
                table_cell(&assessment.justification),
            ));
        }
        out.push('\n');
    }

    out.push_str("## BAT conclusion findings\n\n");
    if run.results.is_empty() {
        out.push_str("_No BAT conclusions were verified._\n\n");
    } else {
        for (bref_id, results) in run.results_by_bref() {
            out.push_str(&format!("### {bref_id}\n\n"));
            for result in results {
                out.push_str(&format!(
                    "**{}** — {}\n\n{}\n\n",
                    result.bat_id,
                    status_marker(result.status),
                    result.findings,
                ));
            }
        }
    }

    if !run.failures.is_empty() {
        out.push_str("## Items that could not be verified\n\n");
        for failure in &run.failures {
            out.push_str(&format!(
                "- `{}` ({}): {}\n",
                failure.subject,
                failure.stage.as_str(),
                failure.error,
            ));
        }
        out.push('\n');
    }

    out.push_str("---\n\n");
    out.push_str(
        "_This report was generated automatically. LLM-based findings require review by a \
         qualified permit writer before use in a formal assessment._\n",
    );

    out
}

fn status_marker(status: ComplianceStatus) -> String {
    let marker = match status {
        ComplianceStatus::Compliant => "✅",
        ComplianceStatus::PartiallyCompliant => "🟡",
        ComplianceStatus::NonCompliant => "❌",
        ComplianceStatus::InsufficientInformation => "❓",
    };
    format!("{marker} {}", status.label())
}

/// Pipes and newlines break table rows.
fn table_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
