use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::{
    DocLanguage, ExtractionMethod, MonitoringFrequency, Pollutant, ValidationStatus,
};
use super::ModelError;

/// One numbered BAT/BBT conclusion extracted from a BREF document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatConclusion {
    /// Stable identifier, `"{bref_id}-BAT-{number}"`.
    pub bat_id: String,
    pub bref_id: String,
    pub number: u32,
    pub title: String,
    /// Complete conclusion text, sliced from the head of this conclusion to
    /// the head of the next one, with referenced sections appended.
    pub full_text: String,
    /// 1-based page of the conclusion head in the source PDF.
    pub page: u32,
    /// Cross-references found in the conclusion text ("section 4.2",
    /// "bijlage III", ...).
    pub section_references: Vec<String>,
    pub language: DocLanguage,
    pub emission_limits: Vec<EmissionLimitValue>,
    pub monitoring: Vec<MonitoringRequirement>,
    pub applicability_conditions: Vec<ApplicabilityCondition>,
    pub extraction: ExtractionInfo,
}

impl BatConclusion {
    pub fn make_id(bref_id: &str, number: u32) -> String {
        format!("{bref_id}-BAT-{number}")
    }
}

/// Provenance of an extracted conclusion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionInfo {
    pub method: ExtractionMethod,
    pub confidence: f32,
    pub validation_status: ValidationStatus,
    pub extracted_at: NaiveDateTime,
}

impl ExtractionInfo {
    pub fn new(
        method: ExtractionMethod,
        confidence: f32,
        validation_status: ValidationStatus,
        extracted_at: NaiveDateTime,
    ) -> Result<Self, ModelError> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(ModelError::ConfidenceOutOfRange(confidence));
        }
        Ok(Self {
            method,
            confidence,
            validation_status,
            extracted_at,
        })
    }
}

/// BAT-associated emission level (BAT-AEL): a limit or range with unit and
/// averaging period, e.g. "NH3 0.02–0.1 kg/dierplaats/jaar".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmissionLimitValue {
    pub pollutant: Pollutant,
    /// Lower bound of the range; equals `high` for single-valued limits.
    pub low: f64,
    pub high: f64,
    pub unit: String,
    pub averaging_period: Option<String>,
    pub monitoring_frequency: Option<MonitoringFrequency>,
}

impl EmissionLimitValue {
    pub fn new(
        pollutant: Pollutant,
        low: f64,
        high: f64,
        unit: &str,
    ) -> Result<Self, ModelError> {
        if low < 0.0 {
            return Err(ModelError::NegativeLimit(low));
        }
        if low > high {
            return Err(ModelError::InvalidLimitRange { low, high });
        }
        if unit.trim().is_empty() {
            return Err(ModelError::EmptyField("unit"));
        }
        Ok(Self {
            pollutant,
            low,
            high,
            unit: unit.to_string(),
            averaging_period: None,
            monitoring_frequency: None,
        })
    }

    pub fn is_range(&self) -> bool {
        self.low < self.high
    }
}

/// A monitoring obligation attached to a conclusion (parameter, frequency,
/// measurement standard where stated).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringRequirement {
    pub parameter: String,
    pub frequency: Option<MonitoringFrequency>,
    /// EN/ISO measurement standard reference, e.g. "EN 14792".
    pub standard: Option<String>,
}

/// A condition limiting where a BAT conclusion applies
/// ("only for existing plants", "not applicable to batch processes", ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicabilityCondition {
    pub description: String,
    pub restriction: Option<String>,
}
