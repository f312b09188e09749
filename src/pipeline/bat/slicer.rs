//! Slices complete conclusion texts between consecutive heads, validates and
//! cleans them, and derives titles.

use super::patterns::{LONE_PAGE_NUMBER, PAGE_MARKER, TERMINATOR};
use super::scanner::{page_at, ConclusionStart};
use crate::models::DocLanguage;

/// A validated conclusion slice before reference resolution.
#[derive(Debug, Clone)]
pub struct SlicedConclusion {
    pub number: u32,
    pub title: String,
    pub text: String,
    pub page: u32,
    /// Span of the raw slice within the page-marked text, used to keep
    /// reference resolution from matching the conclusion's own mentions.
    pub range: std::ops::Range<usize>,
}

/// Entries shorter than this are index/TOC fragments, not conclusions.
const MIN_CONCLUSION_LEN: usize = 50;
/// Bound for the last conclusion when no terminator heading follows it.
const MAX_CONCLUSION_LEN: usize = 50_000;
/// Title length cap.
const MAX_TITLE_LEN: usize = 200;

const DUTCH_KEYWORDS: &[&str] = &[
    "de bbt is",
    "om de",
    "ter vermindering",
    "te voorkomen",
    "het toepassen",
];

const ENGLISH_KEYWORDS: &[&str] = &[
    "bat is to",
    "in order to",
    "to reduce",
    "to prevent",
    "applicability",
];

/// Slice each conclusion from its head to the next head (or a logical end
/// for the last one), dropping entries that fail validation. Results are
/// sorted by conclusion number.
pub fn slice_conclusions(
    paged_text: &str,
    starts: &[ConclusionStart],
    language: DocLanguage,
) -> Vec<SlicedConclusion> {
    let mut conclusions = Vec::new();

    for (i, start) in starts.iter().enumerate() {
        let end = match starts.get(i + 1) {
            Some(next) => next.offset,
            None => logical_end(paged_text, start.offset),
        };

        let raw = paged_text[start.offset..end].trim();

        if !is_valid_entry(raw, start.number, language) {
            tracing::debug!(number = start.number, "rejected conclusion fragment");
            continue;
        }

        let text = clean_text(raw);
        let title = derive_title(&text, language);
        let page = page_at(paged_text, start.offset);

        conclusions.push(SlicedConclusion {
            number: start.number,
            title,
            text,
            page,
            range: start.offset..end,
        });
    }

    conclusions.sort_by_key(|c| c.number);
    conclusions
}

/// End position for the last conclusion: the next terminator heading
/// (annex, references, glossary), else a length cap.
fn logical_end(text: &str, start: usize) -> usize {
    let tail = &text[start..];
    if let Some(m) = TERMINATOR.find(tail) {
        return start + m.start();
    }
    let mut end = (start + MAX_CONCLUSION_LEN).min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    end
}

/// Accept only slices that look like complete conclusion entries.
fn is_valid_entry(text: &str, number: u32, language: DocLanguage) -> bool {
    if text.len() < MIN_CONCLUSION_LEN {
        return false;
    }

    let head_term = match language {
        DocLanguage::Dutch => "BBT",
        DocLanguage::English => "BAT",
    };
    let first_lines: String = text.lines().take(3).collect::<Vec<_>>().join("\n");
    let contains_head = first_lines.contains(&format!("{head_term} {number}"))
        || first_lines.contains(&format!("{head_term}{number}"))
        || first_lines.contains(&format!("{number}. {head_term}"));

    let keywords = match language {
        DocLanguage::Dutch => DUTCH_KEYWORDS,
        DocLanguage::English => ENGLISH_KEYWORDS,
    };
    let lower = text.to_lowercase();
    let contains_keywords = keywords.iter().any(|k| lower.contains(k));

    // Reject fragments that start mid-sentence
    let first_real_line = text
        .lines()
        .map(str::trim)
        .find(|l| l.len() > 10)
        .unwrap_or("");
    if first_real_line
        .chars()
        .next()
        .is_some_and(|c| c.is_lowercase())
    {
        return false;
    }

    contains_head || contains_keywords
}

/// Strip page markers and footer artifacts, normalize whitespace.
pub fn clean_text(text: &str) -> String {
    let no_markers = PAGE_MARKER.replace_all(text, "");
    let no_footers = LONE_PAGE_NUMBER.replace_all(&no_markers, "");

    let mut out = String::with_capacity(no_footers.len());
    let mut blank_run = 0usize;
    for line in no_footers.lines() {
        let trimmed = line.trim_end();
        if trimmed.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
            out.push('\n');
        } else {
            blank_run = 0;
            out.push_str(&collapse_spaces(trimmed));
            out.push('\n');
        }
    }
    out.trim().to_string()
}

fn collapse_spaces(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut prev_space = false;
    for c in line.chars() {
        if c == ' ' || c == '\t' {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            prev_space = false;
            out.push(c);
        }
    }
    out
}

/// Title: the first substantial line, with the numbering prefix stripped.
fn derive_title(text: &str, language: DocLanguage) -> String {
    for line in text.lines().take(5) {
        let line = line.trim();
        if line.len() > 20 && !line.chars().all(|c| c.is_ascii_digit() || c == '.') {
            let stripped = strip_head_prefix(line);
            let mut title: String = stripped.chars().take(MAX_TITLE_LEN).collect();
            if title.is_empty() {
                continue;
            }
            if stripped.chars().count() > MAX_TITLE_LEN {
                title.push('…');
            }
            return title;
        }
    }

    match language {
        DocLanguage::Dutch => "BBT-tekst geëxtraheerd".to_string(),
        DocLanguage::English => "BAT text extracted".to_string(),
    }
}

fn strip_head_prefix(line: &str) -> &str {
    static HEAD_PREFIX: once_cell::sync::Lazy<regex::Regex> = once_cell::sync::Lazy::new(|| {
        regex::Regex::new(r"(?i)^(?:\d+\.\s*)?B[AB]T\s+\d+\s*[.:]?\s*").unwrap()
    });
    match HEAD_PREFIX.find(line) {
        Some(m) => line[m.end()..].trim(),
        None => line,
    }
}
