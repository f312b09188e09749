pub mod language;
pub mod pdf;
pub mod sanitize;
pub mod types;

pub use language::*;
pub use pdf::*;
pub use sanitize::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("Document contains no extractable text")]
    EmptyDocument,

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Run the full extraction pass over a PDF: per-page text, sanitization,
/// language detection, overall confidence.
pub fn extract_document(
    extractor: &dyn PdfExtractor,
    pdf_bytes: &[u8],
) -> Result<ExtractionResult, ExtractionError> {
    let mut pages = extractor.extract_text(pdf_bytes)?;

    for page in &mut pages {
        page.text = sanitize_extracted_text(&page.text);
    }

    let full_text: String = pages
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    if full_text.trim().is_empty() {
        return Err(ExtractionError::EmptyDocument);
    }

    let language = detect_language(&full_text);
    let page_count = pages.len();
    let with_text = pages.iter().filter(|p| p.confidence > 0.0).count();
    let overall_confidence = if page_count == 0 {
        0.0
    } else {
        pages.iter().map(|p| p.confidence).sum::<f32>() / page_count as f32
    };

    tracing::debug!(
        page_count,
        with_text,
        language = language.as_str(),
        "extracted document"
    );

    Ok(ExtractionResult {
        pages,
        full_text,
        page_count,
        language,
        overall_confidence,
    })
}
