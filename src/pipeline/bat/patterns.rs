//! Compiled patterns for locating BAT/BBT conclusion heads and their
//! surroundings in page-marked document text.

use once_cell::sync::Lazy;
use regex::Regex;

/// English conclusion head at the start of a line: "BAT 12.", "BAT 12:",
/// "BAT 12 is to ...".
pub static ENGLISH_HEAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?mi)^[ \t]*BAT[ \t]+(\d+)[.:]?(?:[ \t]|$)").unwrap());

/// Dutch conclusion head: "BBT 12.", "BBT 12:".
pub static DUTCH_HEAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?mi)^[ \t]*BBT[ \t]+(\d+)[.:]?(?:[ \t]|$)").unwrap());

/// Alternative numbering: "12. BAT ..." / "12. BBT ...".
pub static NUMBERED_HEAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?mi)^[ \t]*(\d+)\.[ \t]*B[AB]T[ \t]").unwrap());

/// Section-numbered English variant used by some BREFs:
/// "4.12 BAT is to ..." — the conclusion number is the trailing component.
pub static SECTIONED_HEAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?mi)^[ \t]*(?:\d+\.)+(\d+)[ \t]+BAT[ \t]+is[ \t]+to\b").unwrap());

/// Cross-references inside a conclusion: "section 4.2", "bijlage III",
/// "table 6.1", "hoofdstuk 5" ...
pub static SECTION_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(section|chapter|annex|table|figure|hoofdstuk|bijlage|tabel|figuur|paragraaf)\s+(\d+(?:\.\d+)*|[IVXLC]+)\b",
    )
    .unwrap()
});

/// Headings that end the conclusions chapter (bound for the last slice).
pub static TERMINATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?mi)^[ \t]*(?:(?:BIJLAGE|ANNEX)[ \t]+[IVX]+\b|Referenties[ \t]*$|References[ \t]*$|Glossarium[ \t]*$|Glossary[ \t]*$|Bibliografie[ \t]*$|Bibliography[ \t]*$)",
    )
    .unwrap()
});

/// Page markers injected by the scanner: `[PAGE_12]`.
pub static PAGE_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[PAGE_(\d+)\]").unwrap());

/// A line carrying nothing but a page number (running footer artifact).
pub static LONE_PAGE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*\d+[ \t]*$").unwrap());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_head_variants() {
        assert!(ENGLISH_HEAD.is_match("BAT 7. In order to reduce"));
        assert!(ENGLISH_HEAD.is_match("BAT 7: monitoring"));
        assert!(ENGLISH_HEAD.is_match(" BAT 12 is to apply"));
        assert!(!ENGLISH_HEAD.is_match("see BAT 7 for details"));
        assert!(!ENGLISH_HEAD.is_match("BAT-AEL ranges"));
    }

    #[test]
    fn dutch_head_variants() {
        assert!(DUTCH_HEAD.is_match("BBT 13. Ter vermindering van"));
        assert!(DUTCH_HEAD.is_match("bbt 2: algemene"));
        assert!(!DUTCH_HEAD.is_match("volgens BBT 13 geldt"));
    }

    #[test]
    fn numbered_head_matches_both_terms() {
        assert!(NUMBERED_HEAD.is_match("12. BAT is to use"));
        assert!(NUMBERED_HEAD.is_match("3. BBT De BBT is om"));
    }

    #[test]
    fn sectioned_head_captures_trailing_component() {
        let caps = SECTIONED_HEAD.captures("1.2.14 BAT is to recycle").unwrap();
        assert_eq!(&caps[1], "14");
        assert!(!SECTIONED_HEAD.is_match("14 BAT is to recycle"));
    }

    #[test]
    fn section_refs_bilingual() {
        let text = "zie bijlage III en tabel 6.1, see also Section 4.2.3";
        let found: Vec<_> = SECTION_REF.find_iter(text).map(|m| m.as_str()).collect();
        assert_eq!(found, vec!["bijlage III", "tabel 6.1", "Section 4.2.3"]);
    }

    #[test]
    fn terminator_headings() {
        assert!(TERMINATOR.is_match("BIJLAGE I Lijst van technieken"));
        assert!(TERMINATOR.is_match("ANNEX II"));
        assert!(TERMINATOR.is_match("Glossarium"));
        assert!(!TERMINATOR.is_match("de bijlage bevat"));
        assert!(!TERMINATOR.is_match("References to section 4"));
    }

    #[test]
    fn lone_page_number_only_matches_bare_lines() {
        assert!(LONE_PAGE_NUMBER.is_match("text\n142\ntext"));
        assert!(!LONE_PAGE_NUMBER.is_match("142 mg/Nm³"));
    }
}
