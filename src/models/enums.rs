use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Pollutant {
    Ammonia => "NH3",
    NitrogenOxides => "NOx",
    ParticulateMatter => "PM",
    ParticulateMatter10 => "PM10",
    ParticulateMatter25 => "PM2.5",
    SulfurDioxide => "SO2",
    CarbonMonoxide => "CO",
    Methane => "CH4",
    NitrousOxide => "N2O",
    TotalSuspendedParticles => "TSP",
    Dust => "dust",
    Odour => "odour",
    Noise => "noise",
});

str_enum!(MonitoringFrequency {
    Continuous => "continuous",
    Daily => "daily",
    Weekly => "weekly",
    Monthly => "monthly",
    Quarterly => "quarterly",
    Biannual => "biannual",
    Annual => "annual",
    AsNeeded => "as_needed",
});

str_enum!(ValidationStatus {
    Verified => "verified",
    Pending => "pending",
    Flagged => "flagged",
    NeedsReview => "needs_review",
});

str_enum!(ExtractionMethod {
    Manual => "manual",
    SemiAutomated => "semi_automated",
    FullyAutomated => "fully_automated",
    ExpertValidated => "expert_validated",
});

str_enum!(BatCategory {
    Housing => "housing",
    Feeding => "feeding",
    ManureManagement => "manure_management",
    AirTreatment => "air_treatment",
    WasteWaterTreatment => "waste_water_treatment",
    EnergyEfficiency => "energy_efficiency",
    Monitoring => "monitoring",
    Management => "management",
});

str_enum!(DocLanguage {
    Dutch => "nld",
    English => "eng",
});

str_enum!(Applicability {
    LikelyApplicable => "likely_applicable",
    PotentiallyApplicable => "potentially_applicable",
    NotApplicable => "not_applicable",
});

str_enum!(ComplianceStatus {
    Compliant => "compliant",
    PartiallyCompliant => "partially_compliant",
    NonCompliant => "non_compliant",
    InsufficientInformation => "insufficient_information",
});

str_enum!(RunStage {
    BrefExtraction => "bref_extraction",
    ApplicabilityCheck => "applicability_check",
    BatVerification => "bat_verification",
});

impl Applicability {
    /// True when a BREF warrants per-conclusion verification.
    pub fn warrants_verification(&self) -> bool {
        matches!(self, Self::LikelyApplicable | Self::PotentiallyApplicable)
    }

    /// Human-readable label for reports ("Likely Applicable" etc.).
    pub fn label(&self) -> &'static str {
        match self {
            Self::LikelyApplicable => "Likely Applicable",
            Self::PotentiallyApplicable => "Potentially Applicable",
            Self::NotApplicable => "Not Applicable",
        }
    }
}

impl ComplianceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Compliant => "Compliant",
            Self::PartiallyCompliant => "Partially Compliant",
            Self::NonCompliant => "Non-Compliant",
            Self::InsufficientInformation => "Ambiguous / Insufficient Information",
        }
    }
}
