//! Extracts BAT-AEL emission ranges and monitoring requirements from
//! conclusion text. Best-effort: unparseable fragments are skipped.

use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

use crate::models::{
    ApplicabilityCondition, EmissionLimitValue, MonitoringFrequency, MonitoringRequirement,
    Pollutant,
};

/// "NH3 ... 0,02 – 0,1 kg/dierplaats/jaar" — pollutant, range, unit on one line.
static ELV_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(NH3|NOx|SO2|CO|PM10|PM2[.,]5|PM|N2O|CH4|TSP|stof|dust)\b[^\n]*?(\d+(?:[.,]\d+)?)\s*(?:[-–—]|tot|to)\s*(\d+(?:[.,]\d+)?)\s*(mg/Nm³|mg/Nm3|ng/Nm³|ng/Nm3|µg/Nm³|µg/Nm3|g/GJ|mg/l|kg/[\w/]+)",
    )
    .unwrap()
});

/// "NH3 ... ≤ 30 mg/Nm³" — single-bounded limit.
static ELV_SINGLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(NH3|NOx|SO2|CO|PM10|PM2[.,]5|PM|N2O|CH4|TSP|stof|dust)\b[^\n]*?(?:≤|<|maximaal|max\.?)\s*(\d+(?:[.,]\d+)?)\s*(mg/Nm³|mg/Nm3|ng/Nm³|ng/Nm3|µg/Nm³|µg/Nm3|g/GJ|mg/l|kg/[\w/]+)",
    )
    .unwrap()
});

/// EN/ISO measurement standard references.
static STANDARD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(EN\s?\d{3,5}(?:-\d+)?|ISO\s?\d{3,5})\b").unwrap());

/// "Toepasbaarheid: ..." / "Applicability: ..." paragraphs inside a
/// conclusion.
static APPLICABILITY_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:Toepasbaarheid|Applicability)\b[.:]?[ \t]*(\S.*)$").unwrap()
});

/// Markers that the technique applies without restriction.
const GENERAL_MARKERS: &[&str] = &["algemeen toepasbaar", "generally applicable"];

/// (keyword, frequency) lookup, Dutch and English.
const FREQUENCY_KEYWORDS: &[(&str, MonitoringFrequency)] = &[
    ("continu", MonitoringFrequency::Continuous),
    ("continuous", MonitoringFrequency::Continuous),
    ("dagelijks", MonitoringFrequency::Daily),
    ("daily", MonitoringFrequency::Daily),
    ("wekelijks", MonitoringFrequency::Weekly),
    ("weekly", MonitoringFrequency::Weekly),
    ("maandelijks", MonitoringFrequency::Monthly),
    ("monthly", MonitoringFrequency::Monthly),
    ("per kwartaal", MonitoringFrequency::Quarterly),
    ("quarterly", MonitoringFrequency::Quarterly),
    ("halfjaarlijks", MonitoringFrequency::Biannual),
    ("twice a year", MonitoringFrequency::Biannual),
    ("jaarlijks", MonitoringFrequency::Annual),
    ("eenmaal per jaar", MonitoringFrequency::Annual),
    ("once a year", MonitoringFrequency::Annual),
    ("yearly", MonitoringFrequency::Annual),
    ("annually", MonitoringFrequency::Annual),
];

/// Parse BAT-AEL ranges and single-bounded limits from conclusion text.
pub fn parse_emission_limits(text: &str) -> Vec<EmissionLimitValue> {
    let mut limits = Vec::new();

    for caps in ELV_RANGE.captures_iter(text) {
        let (Some(pollutant), Some(low), Some(high)) = (
            parse_pollutant(&caps[1]),
            parse_number(&caps[2]),
            parse_number(&caps[3]),
        ) else {
            continue;
        };
        if let Ok(elv) = EmissionLimitValue::new(pollutant, low, high, &caps[4]) {
            limits.push(elv);
        }
    }

    for caps in ELV_SINGLE.captures_iter(text) {
        let (Some(pollutant), Some(value)) = (parse_pollutant(&caps[1]), parse_number(&caps[2]))
        else {
            continue;
        };
        // A range on the same pollutant+unit supersedes the single bound
        if limits
            .iter()
            .any(|l| l.pollutant == pollutant && l.unit == &caps[3])
        {
            continue;
        }
        if let Ok(elv) = EmissionLimitValue::new(pollutant, value, value, &caps[3]) {
            limits.push(elv);
        }
    }

    limits
}

/// Parse monitoring requirements: each referenced measurement standard
/// becomes one requirement; the frequency is taken from the standard's own
/// line, falling back to the first frequency keyword in the text.
pub fn parse_monitoring(text: &str) -> Vec<MonitoringRequirement> {
    let text_frequency = detect_frequency(text);
    let mut requirements: Vec<MonitoringRequirement> = Vec::new();

    for line in text.lines() {
        for m in STANDARD.find_iter(line) {
            let standard = m.as_str().to_string();
            if requirements
                .iter()
                .any(|r| r.standard.as_deref() == Some(standard.as_str()))
            {
                continue;
            }
            let parameter = line_pollutant(line).unwrap_or("emissions").to_string();
            requirements.push(MonitoringRequirement {
                parameter,
                frequency: detect_frequency(line).or(text_frequency),
                standard: Some(standard),
            });
        }
    }

    requirements
}

/// Parse "Toepasbaarheid"/"Applicability" paragraphs. Restricted conditions
/// keep the restricting sentence; "generally applicable" ones do not.
pub fn parse_applicability_conditions(text: &str) -> Vec<ApplicabilityCondition> {
    APPLICABILITY_LINE
        .captures_iter(text)
        .map(|caps| {
            let description = caps[1].trim().to_string();
            let lower = description.to_lowercase();
            let restriction = if GENERAL_MARKERS.iter().any(|m| lower.contains(m)) {
                None
            } else {
                Some(description.clone())
            };
            ApplicabilityCondition {
                description,
                restriction,
            }
        })
        .collect()
}

fn parse_pollutant(raw: &str) -> Option<Pollutant> {
    let normalized = match raw.to_lowercase().as_str() {
        "stof" | "dust" => "dust".to_string(),
        "pm2,5" => "PM2.5".to_string(),
        other => other.to_uppercase(),
    };
    Pollutant::from_str(&normalized).ok()
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.replace(',', ".").parse().ok()
}

fn detect_frequency(text: &str) -> Option<MonitoringFrequency> {
    let lower = text.to_lowercase();
    FREQUENCY_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, frequency)| *frequency)
}

fn line_pollutant(line: &str) -> Option<&'static str> {
    let lower = line.to_lowercase();
    for (needle, name) in [
        ("nh3", "NH3"),
        ("ammoniak", "NH3"),
        ("ammonia", "NH3"),
        ("nox", "NOx"),
        ("so2", "SO2"),
        ("stof", "dust"),
        ("dust", "dust"),
    ] {
        if lower.contains(needle) {
            return Some(name);
        }
    }
    None
}
