use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::models::{ApplicabilityAssessment, BatComplianceResult, RunFailure};
use crate::pipeline::compliance::LlmClient;

/// Shared state behind the HTTP surface: storage locations plus the LLM
/// client used for compliance runs.
#[derive(Clone)]
pub struct ApiContext {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    kb_path: PathBuf,
    uploads_dir: PathBuf,
    reports_dir: PathBuf,
    llm: Arc<dyn LlmClient>,
}

impl ApiContext {
    pub fn new(
        kb_path: PathBuf,
        uploads_dir: PathBuf,
        reports_dir: PathBuf,
        llm: Arc<dyn LlmClient>,
    ) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                kb_path,
                uploads_dir,
                reports_dir,
                llm,
            }),
        }
    }

    pub fn kb_path(&self) -> &Path {
        &self.inner.kb_path
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.inner.uploads_dir
    }

    pub fn reports_dir(&self) -> &Path {
        &self.inner.reports_dir
    }

    pub fn llm(&self) -> Arc<dyn LlmClient> {
        self.inner.llm.clone()
    }
}

/// Links to the written report artifacts, served under `/reports`.
#[derive(Debug, Serialize)]
pub struct ReportUrls {
    pub markdown: String,
    pub html: String,
    pub pdf: String,
}

/// Response body of `POST /api/verify`.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub message: &'static str,
    pub report_id: String,
    pub run_id: String,
    pub permit_id: String,
    pub applicable_brefs_analysis: Vec<ApplicabilityAssessment>,
    pub bat_compliance_results: Vec<BatComplianceResult>,
    pub failures: Vec<RunFailure>,
    pub report_urls: ReportUrls,
}
