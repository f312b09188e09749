//! Locates named sections in extracted documents: the SCOPE chapter of a
//! BREF, the activity description of a permit, and numbered permit
//! conditions (voorschriften).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{DocLanguage, PermitCondition};
use crate::pipeline::bat::scanner::page_at;
use crate::pipeline::bat::slicer::clean_text;

/// Bounded excerpt of a located section.
#[derive(Debug, Clone)]
pub struct SectionExcerpt {
    pub text: String,
    pub page: u32,
}

/// Length bound for scope excerpts.
const SCOPE_EXCERPT_LEN: usize = 1500;
/// Length bound for activity-description excerpts.
const ACTIVITY_EXCERPT_LEN: usize = 1200;
/// Upper bound on extracted permit conditions.
const MAX_CONDITIONS: usize = 500;

static SCOPE_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^[ \t]*(?:\d+\.?[ \t]*)?(SCOPE|TOEPASSINGSGEBIED|REIKWIJDTE)\b").unwrap()
});

/// Phrases introducing a permit's activity description, Dutch first.
const ACTIVITY_PHRASES: &[&str] = &[
    "activiteiten van de inrichting",
    "activiteiten van de installatie",
    "de aanvraag betreft",
    "aard van de inrichting",
    "beschrijving van de activiteiten",
    "activities of the installation",
];

/// Numbered condition lines: "3.1.2 <text>" or "Voorschrift 3.1.2 <text>".
static CONDITION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^[ \t]*(?:voorschrift[ \t]+)?(\d+(?:\.\d+)+)\.?[ \t]+(\S.{10,})$").unwrap()
});

/// Find the SCOPE / TOEPASSINGSGEBIED section of a BREF.
/// Falls back to the head of the document when no heading is present.
pub fn find_scope(paged_text: &str, language: DocLanguage) -> SectionExcerpt {
    if let Some(m) = SCOPE_HEADING.find(paged_text) {
        let excerpt = bounded_excerpt(paged_text, m.start(), SCOPE_EXCERPT_LEN);
        return SectionExcerpt {
            text: excerpt,
            page: page_at(paged_text, m.start()),
        };
    }

    tracing::debug!(
        language = language.as_str(),
        "no scope heading found, using document head"
    );
    SectionExcerpt {
        text: bounded_excerpt(paged_text, 0, SCOPE_EXCERPT_LEN),
        page: 1,
    }
}

/// Find the permit's activity description. Always returns an excerpt: when
/// none of the known phrases occurs, the head of the document is used.
pub fn find_activity_description(paged_text: &str) -> SectionExcerpt {
    let lower = paged_text.to_lowercase();

    for phrase in ACTIVITY_PHRASES {
        if let Some(pos) = lower.find(phrase) {
            return SectionExcerpt {
                text: bounded_excerpt(paged_text, pos, ACTIVITY_EXCERPT_LEN),
                page: page_at(paged_text, pos),
            };
        }
    }

    SectionExcerpt {
        text: bounded_excerpt(paged_text, 0, ACTIVITY_EXCERPT_LEN),
        page: 1,
    }
}

/// Extract numbered conditions (voorschriften) from permit text.
/// First occurrence wins for a repeated number.
pub fn find_permit_conditions(paged_text: &str) -> Vec<PermitCondition> {
    let mut conditions: Vec<PermitCondition> = Vec::new();

    for caps in CONDITION_LINE.captures_iter(paged_text) {
        if conditions.len() >= MAX_CONDITIONS {
            break;
        }
        let condition_id = caps[1].to_string();
        if conditions.iter().any(|c| c.condition_id == condition_id) {
            continue;
        }
        let offset = caps.get(0).map(|m| m.start()).unwrap_or(0);
        conditions.push(PermitCondition {
            condition_id,
            text: caps[2].trim().to_string(),
            page: page_at(paged_text, offset),
        });
    }

    conditions
}

fn bounded_excerpt(text: &str, start: usize, max_len: usize) -> String {
    let mut start = start.min(text.len());
    while start > 0 && !text.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (start + max_len).min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    clean_text(&text[start..end])
}
