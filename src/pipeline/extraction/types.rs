use serde::{Deserialize, Serialize};

use super::ExtractionError;
use crate::models::DocLanguage;

/// Result of text extraction from a single document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub pages: Vec<PageExtraction>,
    pub full_text: String,
    pub page_count: usize,
    pub language: DocLanguage,
    pub overall_confidence: f32,
}

/// Per-page extraction result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageExtraction {
    pub page_number: usize,
    pub text: String,
    pub confidence: f32,
    pub warnings: Vec<ExtractionWarning>,
}

/// Warnings about extraction quality
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExtractionWarning {
    /// Page has no usable text layer (likely a scanned image).
    EmptyTextLayer { page: usize },
    LowConfidencePage { page: usize, confidence: f32 },
}

/// PDF text extraction abstraction (allows mocking for tests)
pub trait PdfExtractor {
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<Vec<PageExtraction>, ExtractionError>;

    fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize, ExtractionError>;
}
