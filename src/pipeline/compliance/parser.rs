//! Parses the JSON object out of an LLM response.
//!
//! Models occasionally wrap the object in prose or code fences; everything
//! from the first `{` to the last `}` is treated as the answer. The echoed
//! id must match the one asked about — a mismatch is an error, not a result.

use serde::Deserialize;

use super::ComplianceError;
use crate::models::{Applicability, ApplicabilityAssessment, BatComplianceResult, ComplianceStatus};

/// Slice the JSON object out of a free-text response.
pub fn extract_json_object(response: &str) -> Result<&str, ComplianceError> {
    let start = response
        .find('{')
        .ok_or_else(|| ComplianceError::MalformedResponse("no JSON object found".into()))?;
    let end = response
        .rfind('}')
        .ok_or_else(|| ComplianceError::MalformedResponse("unterminated JSON object".into()))?;
    if end < start {
        return Err(ComplianceError::MalformedResponse(
            "unterminated JSON object".into(),
        ));
    }
    Ok(&response[start..=end])
}

#[derive(Deserialize)]
struct RawApplicability {
    bref_id: String,
    applicability: String,
    #[serde(default)]
    justification: String,
}

/// Parse an applicability classification, enforcing the echoed BREF id.
pub fn parse_applicability(
    response: &str,
    expected_bref_id: &str,
) -> Result<ApplicabilityAssessment, ComplianceError> {
    let json = extract_json_object(response)?;
    let raw: RawApplicability =
        serde_json::from_str(json).map_err(|e| ComplianceError::JsonParsing(e.to_string()))?;

    if raw.bref_id != expected_bref_id {
        return Err(ComplianceError::MismatchedId {
            expected: expected_bref_id.to_string(),
            got: raw.bref_id,
        });
    }

    Ok(ApplicabilityAssessment {
        bref_id: raw.bref_id,
        applicability: normalize_applicability(&raw.applicability)?,
        justification: raw.justification,
    })
}

#[derive(Deserialize)]
struct RawCompliance {
    bat_id: String,
    compliance_status: String,
    #[serde(default)]
    detailed_findings: String,
}

/// Parse a compliance verdict, enforcing the echoed BAT id.
pub fn parse_compliance(
    response: &str,
    expected_bat_id: &str,
    bref_id: &str,
) -> Result<BatComplianceResult, ComplianceError> {
    let json = extract_json_object(response)?;
    let raw: RawCompliance =
        serde_json::from_str(json).map_err(|e| ComplianceError::JsonParsing(e.to_string()))?;

    if raw.bat_id != expected_bat_id {
        return Err(ComplianceError::MismatchedId {
            expected: expected_bat_id.to_string(),
            got: raw.bat_id,
        });
    }

    Ok(BatComplianceResult {
        bat_id: raw.bat_id,
        bref_id: bref_id.to_string(),
        status: normalize_status(&raw.compliance_status)?,
        findings: raw.detailed_findings,
    })
}

fn normalize_applicability(label: &str) -> Result<Applicability, ComplianceError> {
    let normalized = label.trim().to_lowercase().replace('_', " ");
    match normalized.as_str() {
        "likely applicable" => Ok(Applicability::LikelyApplicable),
        "potentially applicable" => Ok(Applicability::PotentiallyApplicable),
        "not applicable" => Ok(Applicability::NotApplicable),
        _ => Err(ComplianceError::UnknownLabel {
            field: "applicability",
            value: label.to_string(),
        }),
    }
}

fn normalize_status(label: &str) -> Result<ComplianceStatus, ComplianceError> {
    let normalized = label.trim().to_lowercase().replace('_', " ");
    match normalized.as_str() {
        "compliant" => Ok(ComplianceStatus::Compliant),
        "partially compliant" => Ok(ComplianceStatus::PartiallyCompliant),
        "non-compliant" | "non compliant" => Ok(ComplianceStatus::NonCompliant),
        _ if normalized.contains("ambiguous") || normalized.contains("insufficient") => {
            Ok(ComplianceStatus::InsufficientInformation)
        }
        _ => Err(ComplianceError::UnknownLabel {
            field: "compliance_status",
            value: label.to_string(),
        }),
    }
}
