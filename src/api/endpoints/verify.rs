//! `POST /api/verify` — the upload-and-verify flow.
//!
//! Multipart form: one `permit_file` (required) and any number of
//! `bref_files`. Uploads are staged per run, the permit and BREFs are
//! extracted, the LLM engine assesses applicability and verifies each BAT
//! conclusion, reports are written, and the run is persisted.

use std::path::Path;

use axum::extract::{Multipart, State};
use axum::Json;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ReportUrls, VerifyResponse};
use crate::ingest;
use crate::models::{RunFailure, RunStage};
use crate::pipeline::compliance::{BrefInput, ComplianceEngine};
use crate::pipeline::extraction::PdfTextExtractor;

struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

pub async fn verify(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<Json<VerifyResponse>, ApiError> {
    let mut permit_upload: Option<Upload> = None;
    let mut bref_uploads: Vec<Upload> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().unwrap_or("upload.pdf").to_string();
        match name.as_str() {
            "permit_file" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {e}")))?;
                permit_upload = Some(Upload {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            "bref_files" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {e}")))?;
                if !bytes.is_empty() {
                    bref_uploads.push(Upload {
                        filename,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    let permit_upload =
        permit_upload.ok_or_else(|| ApiError::BadRequest("No permit file part".into()))?;
    if permit_upload.bytes.is_empty() {
        return Err(ApiError::BadRequest("Selected permit file is empty".into()));
    }

    // The whole pipeline is blocking (PDF parsing, SQLite, blocking LLM
    // client) — keep it off the async workers.
    let response =
        tokio::task::spawn_blocking(move || run_verification(ctx, permit_upload, bref_uploads))
            .await
            .map_err(|e| ApiError::Internal(format!("verification task panicked: {e}")))??;

    Ok(Json(response))
}

fn run_verification(
    ctx: ApiContext,
    permit_upload: Upload,
    bref_uploads: Vec<Upload>,
) -> Result<VerifyResponse, ApiError> {
    let run_uuid = Uuid::new_v4();
    let extractor = PdfTextExtractor;

    // Stage the uploads under a per-run directory
    let run_dir = ctx.uploads_dir().join(run_uuid.to_string());
    std::fs::create_dir_all(&run_dir).map_err(|e| ApiError::Internal(e.to_string()))?;
    std::fs::write(run_dir.join(&permit_upload.filename), &permit_upload.bytes)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let permit_stem = file_stem(&permit_upload.filename);
    let permit_id = format!("UPLOADED_PERMIT_{permit_stem}");
    let (permit, _conditions) = ingest::ingest_permit_bytes(
        &extractor,
        &permit_id,
        &permit_stem,
        &permit_upload.filename,
        &permit_upload.bytes,
    )?;

    // Extract each BREF; extraction failures are recorded, not fatal
    let mut inputs: Vec<BrefInput> = Vec::new();
    let mut pre_failures: Vec<RunFailure> = Vec::new();
    for (i, upload) in bref_uploads.iter().enumerate() {
        std::fs::write(run_dir.join(&upload.filename), &upload.bytes)
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        let bref_id = bref_id_for_upload(i, &upload.filename);
        match ingest::ingest_bref_bytes(&extractor, &bref_id, &upload.filename, &upload.bytes) {
            Ok(ingested) => inputs.push(BrefInput {
                scope: ingested.scope(),
                conclusions: ingested.conclusions,
            }),
            Err(e) => {
                tracing::warn!(bref_id, error = %e, "uploaded BREF could not be processed");
                pre_failures.push(RunFailure {
                    stage: RunStage::BrefExtraction,
                    subject: upload.filename.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    let engine = ComplianceEngine::new(ctx.llm());
    let mut run = engine.run(&permit, &inputs);
    pre_failures.extend(run.failures);
    run.failures = pre_failures;

    // Persist the run
    let mut conn = crate::db::open_database(ctx.kb_path())?;
    crate::db::insert_permit(&conn, &permit)?;
    crate::db::insert_run(&mut conn, &run)?;

    // Write reports
    let report_id = format!(
        "COMP_REPORT_{}_{}",
        &run.run_id.simple().to_string()[..8],
        run.finished_at.format("%Y%m%d%H%M%S")
    );
    crate::report::write_reports(ctx.reports_dir(), &permit, &run, &report_id)?;

    Ok(VerifyResponse {
        message: "Verification process completed.",
        report_id: report_id.clone(),
        run_id: run.run_id.to_string(),
        permit_id: permit.permit_id,
        applicable_brefs_analysis: run.assessments,
        bat_compliance_results: run.results,
        failures: run.failures,
        report_urls: ReportUrls {
            markdown: format!("/reports/{report_id}.md"),
            html: format!("/reports/{report_id}.html"),
            pdf: format!("/reports/{report_id}.pdf"),
        },
    })
}

fn file_stem(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}

/// BREF id for an upload: the filename stem when it names a catalog entry
/// ("IRPP.pdf", "wt_bref.pdf" does not), otherwise a per-run synthetic id.
fn bref_id_for_upload(index: usize, filename: &str) -> String {
    let stem = file_stem(filename).to_uppercase();
    if crate::catalog::find_entry(&stem).is_some() {
        stem
    } else {
        format!("UPLOADED_BREF_{index}_{}", file_stem(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_strips_extension() {
        assert_eq!(file_stem("solidus_vergunning.pdf"), "solidus_vergunning");
        assert_eq!(file_stem("noext"), "noext");
    }

    #[test]
    fn catalog_named_uploads_keep_their_id() {
        assert_eq!(bref_id_for_upload(0, "irpp.pdf"), "IRPP");
        assert_eq!(bref_id_for_upload(0, "IRPP.pdf"), "IRPP");
        assert_eq!(
            bref_id_for_upload(2, "custom_bref.pdf"),
            "UPLOADED_BREF_2_custom_bref"
        );
    }
}
