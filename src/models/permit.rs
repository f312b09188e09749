use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// An uploaded environmental permit (vergunning) after text extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permit {
    pub permit_id: String,
    pub title: String,
    pub source_file: String,
    /// SHA-256 of the PDF bytes, base64 encoded.
    pub content_hash: String,
    /// Excerpt describing the installation's activities, used for
    /// BREF applicability screening.
    pub activity_description: String,
    pub full_text: String,
    pub page_count: u32,
    pub ingested_at: NaiveDateTime,
}

/// A numbered condition (voorschrift) found in the permit text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermitCondition {
    /// Condition number as printed, e.g. "3.1.2".
    pub condition_id: String,
    pub text: String,
    pub page: u32,
}
