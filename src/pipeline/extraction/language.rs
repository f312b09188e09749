//! Lightweight language detection for extracted regulatory text.
//!
//! Detects Dutch vs English using keyword frequency. BREFs circulate both as
//! English originals ("BAT 12 is to ...") and as Dutch implementing
//! decisions ("BBT 12. De BBT is om ..."); the detected language selects the
//! pattern set used by the conclusion parser.

use crate::models::DocLanguage;

/// Common Dutch words and regulatory phrases unlikely in English text.
const DUTCH_INDICATORS: &[&str] = &[
    "de ", "het ", "een ", "van ", "voor ", "met ", "aan ", "bij ", "niet ",
    "zijn ", "wordt ", "worden ", "deze ", "door ", "of ", "ook ",
    // Regulatory Dutch
    "de bbt is", "ter vermindering", "te voorkomen", "het toepassen",
    "vergunning", "voorschrift", "inrichting", "installatie", "bevoegd gezag",
    "emissies", "afvalwater", "toepassingsgebied", "monitoring", "bijlage",
    "conclusies", "beste beschikbare technieken",
];

/// English indicators (common English words rarely found in Dutch text).
const ENGLISH_INDICATORS: &[&str] = &[
    "the ", "and ", "was ", "for ", "are ", "not ", "all ", "can ",
    "has ", "its ", "from ", "have ", "this ", "that ", "with ", "they ",
    "will ", "shall ", "where ", "which ",
    // Regulatory English
    "bat is to", "in order to", "best available techniques", "applicability",
    "permit", "installation", "emission", "waste water", "monitoring",
    "scope", "annex", "conclusions",
];

/// Detect the primary language of extracted text.
///
/// Uses case-insensitive keyword frequency analysis. Dutch wins ties: the
/// primary inputs are Dutch permits and Dutch BATC decisions.
pub fn detect_language(text: &str) -> DocLanguage {
    if text.trim().len() < 20 {
        return DocLanguage::Dutch;
    }

    let lower = text.to_lowercase();

    let dutch_score = count_indicators(&lower, DUTCH_INDICATORS);
    let english_score = count_indicators(&lower, ENGLISH_INDICATORS);

    if dutch_score >= english_score {
        DocLanguage::Dutch
    } else {
        DocLanguage::English
    }
}

/// Count how many indicator patterns appear in the text.
fn count_indicators(lower_text: &str, indicators: &[&str]) -> u32 {
    let mut score = 0u32;
    for &indicator in indicators {
        score += lower_text.matches(indicator).count() as u32;
    }
    score
}
