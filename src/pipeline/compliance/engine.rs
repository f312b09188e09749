use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::llm::LlmClient;
use super::parser::{parse_applicability, parse_compliance};
use super::prompt::{
    build_applicability_prompt, build_compliance_prompt, APPLICABILITY_SYSTEM_PROMPT,
    COMPLIANCE_SYSTEM_PROMPT,
};
use super::ComplianceError;
use crate::models::{
    ApplicabilityAssessment, BatComplianceResult, BatConclusion, BrefScope, ComplianceRun, Permit,
    RunFailure, RunStage,
};

/// Maximum LLM+parse retry attempts for malformed responses.
const MAX_LLM_RETRIES: usize = 1;

/// One BREF offered to a compliance run: its scope excerpt plus the
/// conclusions extracted from it.
#[derive(Debug, Clone)]
pub struct BrefInput {
    pub scope: BrefScope,
    pub conclusions: Vec<BatConclusion>,
}

/// Orchestrates the LLM steps of a run: applicability per BREF scope, then
/// per-conclusion verification for the applicable ones. Item failures are
/// recorded as `RunFailure`s; they never become compliance statuses.
pub struct ComplianceEngine {
    llm: Arc<dyn LlmClient>,
}

impl ComplianceEngine {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Classify one BREF's applicability to the permit's activities.
    pub fn assess_applicability(
        &self,
        activity_description: &str,
        scope: &BrefScope,
    ) -> Result<ApplicabilityAssessment, ComplianceError> {
        let prompt = build_applicability_prompt(activity_description, scope);
        self.call_and_parse(APPLICABILITY_SYSTEM_PROMPT, &prompt, |response| {
            parse_applicability(response, &scope.bref_id)
        })
    }

    /// Verify the permit against one BAT conclusion.
    pub fn verify_conclusion(
        &self,
        permit_text: &str,
        bat: &BatConclusion,
    ) -> Result<BatComplianceResult, ComplianceError> {
        let prompt = build_compliance_prompt(permit_text, bat);
        self.call_and_parse(COMPLIANCE_SYSTEM_PROMPT, &prompt, |response| {
            parse_compliance(response, &bat.bat_id, &bat.bref_id)
        })
    }

    /// Full run: applicability for every offered BREF, then per-conclusion
    /// verification for those classified as (potentially) applicable.
    pub fn run(&self, permit: &Permit, brefs: &[BrefInput]) -> ComplianceRun {
        let started_at = Utc::now().naive_utc();
        let mut assessments = Vec::new();
        let mut results = Vec::new();
        let mut failures = Vec::new();

        for bref in brefs {
            match self.assess_applicability(&permit.activity_description, &bref.scope) {
                Ok(assessment) => {
                    tracing::info!(
                        bref_id = %assessment.bref_id,
                        applicability = assessment.applicability.as_str(),
                        "assessed BREF applicability"
                    );
                    assessments.push(assessment);
                }
                Err(e) => {
                    tracing::warn!(bref_id = %bref.scope.bref_id, error = %e, "applicability check failed");
                    failures.push(RunFailure {
                        stage: RunStage::ApplicabilityCheck,
                        subject: bref.scope.bref_id.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        for bref in brefs {
            let applicable = assessments
                .iter()
                .any(|a| a.bref_id == bref.scope.bref_id && a.applicability.warrants_verification());
            if !applicable {
                continue;
            }

            for bat in &bref.conclusions {
                match self.verify_conclusion(&permit.full_text, bat) {
                    Ok(result) => results.push(result),
                    Err(e) => {
                        tracing::warn!(bat_id = %bat.bat_id, error = %e, "conclusion verification failed");
                        failures.push(RunFailure {
                            stage: RunStage::BatVerification,
                            subject: bat.bat_id.clone(),
                            error: e.to_string(),
                        });
                    }
                }
            }
        }

        ComplianceRun {
            run_id: Uuid::new_v4(),
            permit_id: permit.permit_id.clone(),
            started_at,
            finished_at: Utc::now().naive_utc(),
            assessments,
            results,
            failures,
        }
    }

    /// Call the LLM and parse the response, retrying parse-level failures
    /// once. Transport failures propagate immediately.
    fn call_and_parse<T>(
        &self,
        system: &str,
        prompt: &str,
        parse: impl Fn(&str) -> Result<T, ComplianceError>,
    ) -> Result<T, ComplianceError> {
        let mut last_error = None;

        for attempt in 0..=MAX_LLM_RETRIES {
            let response = self.llm.complete(system, prompt)?;

            match parse(&response) {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < MAX_LLM_RETRIES => {
                    tracing::warn!(attempt = attempt + 1, error = %e, "LLM response parse failed, retrying");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error
            .unwrap_or_else(|| ComplianceError::MalformedResponse("retries exhausted".into())))
    }
}
