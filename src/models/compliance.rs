use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{Applicability, ComplianceStatus, RunStage};

/// LLM verdict on whether one BREF's scope covers the permit's activities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicabilityAssessment {
    pub bref_id: String,
    pub applicability: Applicability,
    pub justification: String,
}

/// LLM verdict on one BAT conclusion against the full permit text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatComplianceResult {
    pub bat_id: String,
    pub bref_id: String,
    pub status: ComplianceStatus,
    /// Free-text findings: citations, discrepancies, missing elements.
    pub findings: String,
}

/// A per-item failure during a run. Failures are recorded, never converted
/// into a compliance status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunFailure {
    pub stage: RunStage,
    /// What failed: a BREF id, a BAT id, or a filename.
    pub subject: String,
    pub error: String,
}

/// Outcome of a full compliance run over one permit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceRun {
    pub run_id: Uuid,
    pub permit_id: String,
    pub started_at: NaiveDateTime,
    pub finished_at: NaiveDateTime,
    pub assessments: Vec<ApplicabilityAssessment>,
    pub results: Vec<BatComplianceResult>,
    pub failures: Vec<RunFailure>,
}

/// Counts per compliance status, for report summaries.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StatusCounts {
    pub compliant: usize,
    pub partially_compliant: usize,
    pub non_compliant: usize,
    pub insufficient_information: usize,
}

impl ComplianceRun {
    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for result in &self.results {
            match result.status {
                ComplianceStatus::Compliant => counts.compliant += 1,
                ComplianceStatus::PartiallyCompliant => counts.partially_compliant += 1,
                ComplianceStatus::NonCompliant => counts.non_compliant += 1,
                ComplianceStatus::InsufficientInformation => {
                    counts.insufficient_information += 1
                }
            }
        }
        counts
    }

    /// Results grouped per BREF, in first-seen order.
    pub fn results_by_bref(&self) -> Vec<(&str, Vec<&BatComplianceResult>)> {
        let mut groups: Vec<(&str, Vec<&BatComplianceResult>)> = Vec::new();
        for result in &self.results {
            match groups.iter_mut().find(|(id, _)| *id == result.bref_id) {
                Some((_, items)) => items.push(result),
                None => groups.push((result.bref_id.as_str(), vec![result])),
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn run_with(results: Vec<BatComplianceResult>) -> ComplianceRun {
        let at = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        ComplianceRun {
            run_id: Uuid::new_v4(),
            permit_id: "PERMIT-1".into(),
            started_at: at,
            finished_at: at,
            assessments: vec![],
            results,
            failures: vec![],
        }
    }

    fn result(bref: &str, n: u32, status: ComplianceStatus) -> BatComplianceResult {
        BatComplianceResult {
            bat_id: format!("{bref}-BAT-{n}"),
            bref_id: bref.into(),
            status,
            findings: String::new(),
        }
    }

    #[test]
    fn status_counts_tally_all_variants() {
        let run = run_with(vec![
            result("IRPP", 1, ComplianceStatus::Compliant),
            result("IRPP", 2, ComplianceStatus::Compliant),
            result("IRPP", 3, ComplianceStatus::NonCompliant),
            result("ENE", 1, ComplianceStatus::InsufficientInformation),
        ]);
        let counts = run.status_counts();
        assert_eq!(counts.compliant, 2);
        assert_eq!(counts.non_compliant, 1);
        assert_eq!(counts.insufficient_information, 1);
        assert_eq!(counts.partially_compliant, 0);
    }

    #[test]
    fn results_grouped_by_bref_in_order() {
        let run = run_with(vec![
            result("IRPP", 1, ComplianceStatus::Compliant),
            result("ENE", 1, ComplianceStatus::Compliant),
            result("IRPP", 2, ComplianceStatus::NonCompliant),
        ]);
        let groups = run.results_by_bref();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "IRPP");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "ENE");
    }
}
