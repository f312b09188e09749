//! PDF rendering of the compliance report via `printpdf`.
//! Built-in Helvetica fonts, manual line wrapping and page breaks.

use std::io::BufWriter;

use printpdf::*;

use super::ReportError;
use crate::models::{ComplianceRun, Permit};

const WRAP_CHARS: usize = 95;

/// Generates the report PDF. Returns PDF bytes.
pub fn generate_pdf_report(
    permit: &Permit,
    run: &ComplianceRun,
    report_id: &str,
) -> Result<Vec<u8>, ReportError> {
    let title = format!("BAT/RIE Compliance Report {report_id}");
    let (doc, page1, layer1) = PdfDocument::new(&title, Mm(210.0), Mm(297.0), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Pdf(format!("font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError::Pdf(format!("font error: {e}")))?;

    let mut writer = PageWriter {
        doc: &doc,
        layer: doc.get_page(page1).get_layer(layer1),
        y: Mm(280.0),
        font,
        bold,
    };

    writer.title(&title);
    writer.line(&format!("Permit: {} ({})", permit.title, permit.permit_id));
    writer.line(&format!(
        "Generated: {}",
        run.finished_at.format("%Y-%m-%d %H:%M")
    ));
    writer.space();

    let counts = run.status_counts();
    writer.heading("SUMMARY");
    writer.line(&format!(
        "Compliant: {}   Partially: {}   Non-compliant: {}   Ambiguous: {}",
        counts.compliant,
        counts.partially_compliant,
        counts.non_compliant,
        counts.insufficient_information
    ));
    writer.space();

    writer.heading("INSTALLATION ACTIVITIES");
    writer.wrapped(&permit.activity_description);
    writer.space();

    writer.heading("BREF APPLICABILITY");
    for assessment in &run.assessments {
        writer.wrapped(&format!(
            "{} — {}: {}",
            assessment.bref_id,
            assessment.applicability.label(),
            assessment.justification
        ));
    }
    writer.space();

    for (bref_id, results) in run.results_by_bref() {
        writer.heading(&format!("FINDINGS — {bref_id}"));
        for result in results {
            writer.entry(&format!("{} [{}]", result.bat_id, result.status.label()));
            writer.wrapped(&result.findings);
            writer.space();
        }
    }

    if !run.failures.is_empty() {
        writer.heading("ITEMS THAT COULD NOT BE VERIFIED");
        for failure in &run.failures {
            writer.wrapped(&format!(
                "{} ({}): {}",
                failure.subject,
                failure.stage.as_str(),
                failure.error
            ));
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ReportError::Pdf(format!("save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ReportError::Pdf(format!("buffer error: {e}")))
}

/// Y-cursor over the document, adding pages as sections run off the bottom.
struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: Mm,
    font: IndirectFontRef,
    bold: IndirectFontRef,
}

impl PageWriter<'_> {
    /// Start a fresh page when fewer than ~10mm remain above the margin.
    fn ensure_room(&mut self) {
        if self.y.0 < 30.0 {
            let (page, layer) = self.doc.add_page(Mm(210.0), Mm(297.0), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = Mm(280.0);
        }
    }

    fn title(&mut self, text: &str) {
        self.ensure_room();
        self.layer
            .use_text(text, 14.0, Mm(20.0), self.y, &self.bold);
        self.y -= Mm(8.0);
    }

    fn heading(&mut self, text: &str) {
        self.ensure_room();
        self.layer
            .use_text(text, 11.0, Mm(20.0), self.y, &self.bold);
        self.y -= Mm(6.0);
    }

    fn entry(&mut self, text: &str) {
        self.ensure_room();
        self.layer
            .use_text(text, 10.0, Mm(20.0), self.y, &self.bold);
        self.y -= Mm(5.0);
    }

    fn line(&mut self, text: &str) {
        self.ensure_room();
        self.layer
            .use_text(text, 9.0, Mm(20.0), self.y, &self.font);
        self.y -= Mm(4.5);
    }

    fn wrapped(&mut self, text: &str) {
        for line in wrap_text(text, WRAP_CHARS) {
            self.ensure_room();
            self.layer
                .use_text(&line, 9.0, Mm(25.0), self.y, &self.font);
            self.y -= Mm(4.0);
        }
    }

    fn space(&mut self) {
        self.y -= Mm(3.0);
    }
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() + 1 > max_chars && !current.is_empty() {
            lines.push(current.clone());
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
