use crate::models::{ComplianceRun, ComplianceStatus, Permit};

/// Render the standalone HTML compliance report (inline CSS, no assets).
pub fn render_html_report(permit: &Permit, run: &ComplianceRun, report_id: &str) -> String {
    let counts = run.status_counts();
    let mut body = String::new();

    body.push_str(&format!(
        r#"<div class="header">
  <h1>BAT/RIE Compliance Report</h1>
  <p>{} — {}</p>
  <p>Report {} · generated {}</p>
</div>
"#,
        escape(&permit.title),
        escape(&permit.permit_id),
        escape(report_id),
        run.finished_at.format("%Y-%m-%d %H:%M"),
    ));

    body.push_str(&format!(
        r#"<div class="summary">
  <div class="stats">
    <div class="stat-box"><div class="stat-number">{}</div><div class="stat-label">Compliant</div></div>
    <div class="stat-box"><div class="stat-number">{}</div><div class="stat-label">Partially</div></div>
    <div class="stat-box"><div class="stat-number">{}</div><div class="stat-label">Non-Compliant</div></div>
    <div class="stat-box"><div class="stat-number">{}</div><div class="stat-label">Ambiguous</div></div>
  </div>
  <h2>Installation activities</h2>
  <p>{}</p>
</div>
"#,
        counts.compliant,
        counts.partially_compliant,
        counts.non_compliant,
        counts.insufficient_information,
        escape(&permit.activity_description),
    ));

    body.push_str("<h2>BREF applicability</h2>\n<table>\n<tr><th>BREF</th><th>Applicability</th><th>Justification</th></tr>\n");
    for assessment in &run.assessments {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(&assessment.bref_id),
            assessment.applicability.label(),
            escape(&assessment.justification),
        ));
    }
    body.push_str("</table>\n");

    for (bref_id, results) in run.results_by_bref() {
        body.push_str(&format!(
            r#"<div class="bref-section">
  <div class="bref-header"><h2>{} — {} conclusions verified</h2></div>
"#,
            escape(bref_id),
            results.len(),
        ));
        for result in results {
            body.push_str(&format!(
                r#"  <div class="bat-entry">
    <div class="bat-header"><h3>{}</h3><span class="badge {}">{}</span></div>
    <div class="bat-text">{}</div>
  </div>
"#,
                escape(&result.bat_id),
                badge_class(result.status),
                result.status.label(),
                escape(&result.findings),
            ));
        }
        body.push_str("</div>\n");
    }

    if !run.failures.is_empty() {
        body.push_str("<div class=\"failures\">\n<h2>Items that could not be verified</h2>\n<ul>\n");
        for failure in &run.failures {
            body.push_str(&format!(
                "<li><strong>{}</strong> ({}): {}</li>\n",
                escape(&failure.subject),
                failure.stage.as_str(),
                escape(&failure.error),
            ));
        }
        body.push_str("</ul>\n</div>\n");
    }

    body.push_str(
        "<div class=\"footer\"><p>Generated automatically; findings require review by a \
         qualified permit writer.</p></div>\n",
    );

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Compliance Report {}</title>
<style>
{}
</style>
</head>
<body>
{}
</body>
</html>
"#,
        escape(report_id),
        STYLE,
        body
    )
}

const STYLE: &str = r#"body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; margin: 20px; line-height: 1.6; }
.header { background: #2c3e50; color: white; padding: 30px; border-radius: 10px; text-align: center; margin-bottom: 30px; }
.summary { background: #f8f9fa; padding: 20px; border-radius: 8px; margin-bottom: 30px; }
.stats { display: flex; justify-content: space-around; margin: 20px 0; }
.stat-box { text-align: center; padding: 15px; background: #e8f4f8; border-radius: 8px; flex: 1; margin: 0 10px; }
.stat-number { font-size: 2em; font-weight: bold; color: #2980b9; }
.stat-label { color: #7f8c8d; text-transform: uppercase; font-size: 0.9em; }
table { border-collapse: collapse; width: 100%; margin-bottom: 30px; }
th, td { border: 1px solid #ddd; padding: 8px; text-align: left; vertical-align: top; }
th { background: #e8f4f8; }
.bref-section { margin: 30px 0; border: 1px solid #ddd; border-radius: 10px; overflow: hidden; }
.bref-header { background: #2c3e50; color: white; padding: 10px 15px; }
.bref-header h2 { margin: 0; font-size: 1.1em; }
.bat-entry { border-bottom: 1px solid #eee; padding: 15px; }
.bat-entry:last-child { border-bottom: none; }
.bat-header { display: flex; justify-content: space-between; align-items: center; }
.bat-header h3 { margin: 0; }
.bat-text { background: #f8f9fa; padding: 10px; border-radius: 5px; margin-top: 10px; white-space: pre-wrap; }
.badge { padding: 4px 10px; border-radius: 12px; color: white; font-size: 0.85em; }
.badge.compliant { background: #27ae60; }
.badge.partial { background: #f39c12; }
.badge.non-compliant { background: #c0392b; }
.badge.ambiguous { background: #7f8c8d; }
.failures { background: #fff3cd; padding: 15px 20px; border-radius: 8px; }
.footer { margin-top: 40px; text-align: center; color: #7f8c8d; }"#;

fn badge_class(status: ComplianceStatus) -> &'static str {
    match status {
        ComplianceStatus::Compliant => "compliant",
        ComplianceStatus::PartiallyCompliant => "partial",
        ComplianceStatus::NonCompliant => "non-compliant",
        ComplianceStatus::InsufficientInformation => "ambiguous",
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
