//! Cross-reference detection and resolution.
//!
//! Conclusions routinely point at descriptive sections elsewhere in the
//! document ("techniques are described in section 4.8.1", "zie bijlage III").
//! The referenced text is appended to the conclusion so the compliance check
//! sees the technique descriptions, not just the pointer.

use super::patterns::SECTION_REF;

/// Characters of context kept before a resolved reference heading.
const REF_CONTEXT_BEFORE: usize = 100;
/// Excerpt length taken from a resolved reference.
const REF_EXCERPT_LEN: usize = 1000;

/// Find section references in conclusion text. Normalized to lowercase type
/// plus number ("section 4.2", "bijlage iii"), deduplicated, sorted.
pub fn find_section_references(text: &str) -> Vec<String> {
    let mut refs: Vec<String> = SECTION_REF
        .captures_iter(text)
        .map(|caps| format!("{} {}", caps[1].to_lowercase(), caps[2].to_lowercase()))
        .collect();
    refs.sort();
    refs.dedup();
    refs
}

/// Append the referenced sections' text to a conclusion. References whose
/// heading cannot be located elsewhere in the document are skipped.
/// `conclusion_range` is the conclusion's own span within `full_text`;
/// matches inside it are self-mentions, not resolution targets.
pub fn resolve_references(
    full_text: &str,
    conclusion_text: &str,
    conclusion_range: std::ops::Range<usize>,
    references: &[String],
) -> String {
    let mut complete = conclusion_text.to_string();

    for reference in references {
        if let Some(excerpt) = find_referenced_excerpt(full_text, &conclusion_range, reference) {
            complete.push_str(&format!(
                "\n\n--- REFERENCED {} ---\n{}",
                reference.to_uppercase(),
                excerpt
            ));
        }
    }

    complete
}

/// Locate a reference outside the conclusion itself and cut a bounded
/// excerpt around it.
fn find_referenced_excerpt(
    full_text: &str,
    conclusion_range: &std::ops::Range<usize>,
    reference: &str,
) -> Option<String> {
    let pattern = regex::Regex::new(&format!(r"(?i){}", regex::escape(reference))).ok()?;

    let m = pattern
        .find_iter(full_text)
        .find(|m| !conclusion_range.contains(&m.start()))?;

    let mut start = m.start().saturating_sub(REF_CONTEXT_BEFORE);
    let mut end = (m.start() + REF_EXCERPT_LEN).min(full_text.len());
    while !full_text.is_char_boundary(start) {
        start -= 1;
    }
    while !full_text.is_char_boundary(end) {
        end -= 1;
    }

    // Page markers and footer artifacts have no business in the excerpt
    Some(super::slicer::clean_text(full_text[start..end].trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_and_normalizes_references() {
        let text = "De techniek staat beschreven in Bijlage III en in tabel 6.1. \
                    See also Section 4.2 and section 4.2 again.";
        let refs = find_section_references(text);
        assert_eq!(refs, vec!["bijlage iii", "section 4.2", "tabel 6.1"]);
    }

    #[test]
    fn no_references_in_plain_text() {
        assert!(find_section_references("De BBT is om emissies te meten.").is_empty());
    }

    #[test]
    fn resolves_reference_to_excerpt() {
        let conclusion = "BBT 12. Toepassen van technieken uit bijlage III.";
        let full = format!(
            "{}\nveel andere tekst\nBIJLAGE III\nBeschrijving van luchtwassystemen: \
             chemische wassers verwijderen ammoniak uit stallucht.",
            conclusion
        );
        let refs = find_section_references(conclusion);
        let resolved = resolve_references(&full, conclusion, 0..conclusion.len(), &refs);

        assert!(resolved.contains("--- REFERENCED BIJLAGE III ---"));
        assert!(resolved.contains("luchtwassystemen"));
    }

    #[test]
    fn self_mention_does_not_resolve_to_itself() {
        let conclusion = "BBT 1. Zie hoofdstuk 9 voor details.";
        // "hoofdstuk 9" never appears outside the conclusion
        let resolved = resolve_references(
            conclusion,
            conclusion,
            0..conclusion.len(),
            &find_section_references(conclusion),
        );
        assert!(!resolved.contains("--- REFERENCED"));
        assert_eq!(resolved, conclusion);
    }

    #[test]
    fn resolution_without_references_is_identity() {
        let conclusion = "BBT 2. Geen verwijzingen hier.";
        let resolved = resolve_references("irrelevant", conclusion, 0..10, &[]);
        assert_eq!(resolved, conclusion);
    }
}
