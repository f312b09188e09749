//! Assembles page-marked text and locates conclusion heads in it.

use super::patterns::{DUTCH_HEAD, ENGLISH_HEAD, NUMBERED_HEAD, PAGE_MARKER, SECTIONED_HEAD};
use crate::models::DocLanguage;
use crate::pipeline::extraction::PageExtraction;

/// Start of one conclusion: byte offset into the page-marked text plus the
/// conclusion number its head carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConclusionStart {
    pub offset: usize,
    pub number: u32,
}

/// Concatenate page texts with `[PAGE_n]` markers so slice offsets can be
/// mapped back to source pages.
pub fn assemble_paged_text(pages: &[PageExtraction]) -> String {
    let mut out = String::new();
    for page in pages {
        out.push_str(&format!("\n[PAGE_{}]\n", page.page_number));
        out.push_str(&page.text);
    }
    out
}

/// Find all conclusion heads. The language-specific head pattern is primary;
/// the alternative numbering patterns only contribute numbers not already
/// seen. Results are sorted by offset; for a duplicated number the earliest
/// occurrence wins.
pub fn find_starts(text: &str, language: DocLanguage) -> Vec<ConclusionStart> {
    let primary = match language {
        DocLanguage::Dutch => &*DUTCH_HEAD,
        DocLanguage::English => &*ENGLISH_HEAD,
    };

    let mut starts: Vec<ConclusionStart> = Vec::new();

    for caps in primary.captures_iter(text) {
        if let Some(start) = capture_to_start(&caps) {
            starts.push(start);
        }
    }

    for alt in [&*NUMBERED_HEAD, &*SECTIONED_HEAD] {
        for caps in alt.captures_iter(text) {
            if let Some(start) = capture_to_start(&caps) {
                if !starts.iter().any(|s| s.number == start.number) {
                    starts.push(start);
                }
            }
        }
    }

    starts.sort_by_key(|s| s.offset);

    // Keep the first occurrence per number, in document order
    let mut seen = std::collections::HashSet::new();
    starts.retain(|s| seen.insert(s.number));

    starts
}

fn capture_to_start(caps: &regex::Captures<'_>) -> Option<ConclusionStart> {
    let whole = caps.get(0)?;
    let number = caps.get(1)?.as_str().parse().ok()?;
    Some(ConclusionStart {
        offset: whole.start(),
        number,
    })
}

/// Which source page a byte offset falls on (last marker before it).
pub fn page_at(text: &str, offset: usize) -> u32 {
    PAGE_MARKER
        .captures_iter(&text[..offset.min(text.len())])
        .last()
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: usize, text: &str) -> PageExtraction {
        PageExtraction {
            page_number: n,
            text: text.to_string(),
            confidence: 0.95,
            warnings: vec![],
        }
    }

    #[test]
    fn assembled_text_carries_markers() {
        let text = assemble_paged_text(&[page(1, "eerste"), page(2, "tweede")]);
        assert!(text.contains("[PAGE_1]\neerste"));
        assert!(text.contains("[PAGE_2]\ntweede"));
    }

    #[test]
    fn finds_dutch_heads_in_order() {
        let text = "\n[PAGE_1]\nBBT 1. Algemeen\ntekst\nBBT 2. Monitoring\ntekst";
        let starts = find_starts(text, DocLanguage::Dutch);
        assert_eq!(starts.len(), 2);
        assert_eq!(starts[0].number, 1);
        assert_eq!(starts[1].number, 2);
        assert!(starts[0].offset < starts[1].offset);
    }

    #[test]
    fn duplicate_numbers_keep_first_occurrence() {
        // The same head reappears in a running header further down
        let text = "BBT 4. De BBT is om te monitoren\nveel tekst\nBBT 4. (vervolg)";
        let starts = find_starts(text, DocLanguage::Dutch);
        assert_eq!(starts.len(), 1);
        assert_eq!(starts[0].offset, 0);
    }

    #[test]
    fn alternative_numbering_fills_gaps_only() {
        let text = "BAT 1. First conclusion\ntext\n2. BAT is to monitor continuously\ntext";
        let starts = find_starts(text, DocLanguage::English);
        assert_eq!(starts.len(), 2);
        assert_eq!(starts[1].number, 2);

        // When the primary pattern already found the number, the alternative
        // match for it is ignored.
        let text = "BAT 2. Real head\ntext\n2. BAT is to do something else";
        let starts = find_starts(text, DocLanguage::English);
        assert_eq!(starts.len(), 1);
        assert_eq!(starts[0].offset, 0);
    }

    #[test]
    fn sectioned_heads_are_found_for_english() {
        let text = "4.12 BAT is to reduce diffuse dust emissions\n";
        let starts = find_starts(text, DocLanguage::English);
        assert_eq!(starts.len(), 1);
        assert_eq!(starts[0].number, 12);
    }

    #[test]
    fn page_at_maps_offsets_to_pages() {
        let text = assemble_paged_text(&[page(1, "a"), page(2, "BBT 1. tekst"), page(3, "z")]);
        let starts = find_starts(&text, DocLanguage::Dutch);
        assert_eq!(starts.len(), 1);
        assert_eq!(page_at(&text, starts[0].offset), 2);
        assert_eq!(page_at(&text, 0), 1);
    }
}
