use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::enums::DocLanguage;

/// Sector marker used for BREFs that apply across all industrial sectors
/// (cooling, energy efficiency, monitoring, surface treatment, waste water).
pub const HORIZONTAL_SECTOR: &str = "HORIZONTAL";

/// A BREF document in the knowledge base: one EU BAT reference document or
/// its Dutch BAT-conclusions (BATC) implementing decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrefDocument {
    pub bref_id: String,
    pub title: String,
    pub sector: String,
    pub adoption_date: Option<NaiveDate>,
    pub celex_url: Option<String>,
    pub local_path: Option<String>,
    pub language: DocLanguage,
    pub scope_description: Option<String>,
    pub page_count: Option<u32>,
    pub content_hash: Option<String>,
    pub ingested_at: Option<NaiveDateTime>,
}

impl BrefDocument {
    /// Horizontal BREFs apply to every installation regardless of sector.
    pub fn is_horizontal(&self) -> bool {
        self.sector == HORIZONTAL_SECTOR
    }
}

/// The scope excerpt handed to the LLM for applicability classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrefScope {
    pub bref_id: String,
    pub scope_description: String,
}
