//! Document ingestion: PDF bytes in, structured knowledge out.
//! Shared by the CLI subcommands and the HTTP verify endpoint.

use base64::Engine;
use chrono::Utc;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::db::DatabaseError;
use crate::models::{BatConclusion, BrefDocument, BrefScope, DocLanguage, Permit, PermitCondition};
use crate::pipeline::bat;
use crate::pipeline::extraction::{extract_document, ExtractionError, PdfExtractor};
use crate::pipeline::sections;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// A BREF document after extraction and conclusion parsing.
#[derive(Debug, Clone)]
pub struct IngestedBref {
    pub bref_id: String,
    pub title: String,
    pub language: DocLanguage,
    pub scope_description: String,
    pub page_count: u32,
    pub content_hash: String,
    pub conclusions: Vec<BatConclusion>,
}

impl IngestedBref {
    pub fn scope(&self) -> BrefScope {
        BrefScope {
            bref_id: self.bref_id.clone(),
            scope_description: self.scope_description.clone(),
        }
    }
}

/// Extract a BREF/BATC PDF: text, language, scope section, conclusions.
pub fn ingest_bref_bytes(
    extractor: &dyn PdfExtractor,
    bref_id: &str,
    title: &str,
    pdf_bytes: &[u8],
) -> Result<IngestedBref, IngestError> {
    let extraction = extract_document(extractor, pdf_bytes)?;
    let paged_text = bat::scanner::assemble_paged_text(&extraction.pages);

    let scope = sections::find_scope(&paged_text, extraction.language);
    let conclusions = bat::extract_conclusions(bref_id, &extraction);

    Ok(IngestedBref {
        bref_id: bref_id.to_string(),
        title: title.to_string(),
        language: extraction.language,
        scope_description: scope.text,
        page_count: extraction.page_count as u32,
        content_hash: content_hash(pdf_bytes),
        conclusions,
    })
}

/// Extract a permit PDF: text, activity description, numbered conditions.
pub fn ingest_permit_bytes(
    extractor: &dyn PdfExtractor,
    permit_id: &str,
    title: &str,
    source_file: &str,
    pdf_bytes: &[u8],
) -> Result<(Permit, Vec<PermitCondition>), IngestError> {
    let extraction = extract_document(extractor, pdf_bytes)?;
    let paged_text = bat::scanner::assemble_paged_text(&extraction.pages);

    let activity = sections::find_activity_description(&paged_text);
    let conditions = sections::find_permit_conditions(&paged_text);

    let permit = Permit {
        permit_id: permit_id.to_string(),
        title: title.to_string(),
        source_file: source_file.to_string(),
        content_hash: content_hash(pdf_bytes),
        activity_description: activity.text,
        full_text: extraction.full_text,
        page_count: extraction.page_count as u32,
        ingested_at: Utc::now().naive_utc(),
    };

    tracing::info!(
        permit_id,
        pages = permit.page_count,
        conditions = conditions.len(),
        "ingested permit"
    );

    Ok((permit, conditions))
}

/// Persist an ingested BREF into the knowledge base: document row (catalog
/// metadata preserved where present) plus its conclusion set.
pub fn store_bref(
    conn: &mut rusqlite::Connection,
    ingested: &IngestedBref,
    local_path: Option<&str>,
) -> Result<(), DatabaseError> {
    let catalog_entry = crate::catalog::find_entry(&ingested.bref_id);
    let existing = crate::db::get_bref(conn, &ingested.bref_id)?;

    let bref = BrefDocument {
        bref_id: ingested.bref_id.clone(),
        title: catalog_entry
            .map(|e| e.title.to_string())
            .or_else(|| existing.as_ref().map(|b| b.title.clone()))
            .unwrap_or_else(|| ingested.title.clone()),
        sector: catalog_entry
            .map(|e| e.sector.to_string())
            .or_else(|| existing.as_ref().map(|b| b.sector.clone()))
            .unwrap_or_else(|| "Unknown".to_string()),
        adoption_date: existing.as_ref().and_then(|b| b.adoption_date),
        celex_url: catalog_entry
            .map(|e| e.celex_url.to_string())
            .or_else(|| existing.as_ref().and_then(|b| b.celex_url.clone())),
        local_path: local_path
            .map(str::to_string)
            .or_else(|| existing.as_ref().and_then(|b| b.local_path.clone())),
        language: ingested.language,
        scope_description: Some(ingested.scope_description.clone()),
        page_count: Some(ingested.page_count),
        content_hash: Some(ingested.content_hash.clone()),
        ingested_at: Some(Utc::now().naive_utc()),
    };

    crate::db::upsert_bref(conn, &bref)?;
    crate::db::replace_conclusions(conn, &ingested.bref_id, &ingested.conclusions)?;
    Ok(())
}

/// SHA-256 content hash, base64 encoded.
pub fn content_hash(bytes: &[u8]) -> String {
    let hash = Sha256::digest(bytes);
    base64::engine::general_purpose::STANDARD.encode(hash)
}
