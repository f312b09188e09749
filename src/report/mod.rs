pub mod html;
pub mod markdown;
pub mod pdf;

pub use html::render_html_report;
pub use markdown::generate_markdown_report;
pub use pdf::generate_pdf_report;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::{ComplianceRun, Permit};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF rendering error: {0}")]
    Pdf(String),
}

/// Paths of the written report artifacts.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ReportPaths {
    pub markdown: PathBuf,
    pub html: PathBuf,
    pub pdf: PathBuf,
}

/// Render and write all three report formats into `dir`, named after the
/// report id.
pub fn write_reports(
    dir: &Path,
    permit: &Permit,
    run: &ComplianceRun,
    report_id: &str,
) -> Result<ReportPaths, ReportError> {
    std::fs::create_dir_all(dir)?;

    let markdown = generate_markdown_report(permit, run, report_id);
    let markdown_path = dir.join(format!("{report_id}.md"));
    std::fs::write(&markdown_path, &markdown)?;

    let html = render_html_report(permit, run, report_id);
    let html_path = dir.join(format!("{report_id}.html"));
    std::fs::write(&html_path, &html)?;

    let pdf_bytes = generate_pdf_report(permit, run, report_id)?;
    let pdf_path = dir.join(format!("{report_id}.pdf"));
    std::fs::write(&pdf_path, &pdf_bytes)?;

    tracing::info!(report_id, dir = %dir.display(), "wrote compliance reports");

    Ok(ReportPaths {
        markdown: markdown_path,
        html: html_path,
        pdf: pdf_path,
    })
}
