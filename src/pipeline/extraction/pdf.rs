use super::types::{ExtractionWarning, PageExtraction, PdfExtractor};
use super::ExtractionError;

/// Minimum characters on a page before we trust its text layer.
const MIN_PAGE_TEXT_LEN: usize = 10;

/// PDF text extractor using the pdf-extract crate.
/// Handles digital PDFs with embedded text layers; scanned pages come back
/// empty and are flagged, not OCR'd.
pub struct PdfTextExtractor;

impl PdfExtractor for PdfTextExtractor {
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<Vec<PageExtraction>, ExtractionError> {
        let page_texts = pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
            .map_err(|e| ExtractionError::PdfParsing(e.to_string()))?;

        let pages = page_texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let page_number = i + 1;
                let mut warnings = vec![];
                let confidence = if text.trim().len() >= MIN_PAGE_TEXT_LEN {
                    0.95
                } else {
                    warnings.push(ExtractionWarning::EmptyTextLayer { page: page_number });
                    0.0
                };
                PageExtraction {
                    page_number,
                    text,
                    confidence,
                    warnings,
                }
            })
            .collect();

        Ok(pages)
    }

    fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize, ExtractionError> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
            .map_err(|e| ExtractionError::PdfParsing(e.to_string()))?;
        Ok(pages.len())
    }
}
