/// Sanitize extracted text before passing downstream.
/// Strips control characters, normalizes whitespace, preserves the
/// punctuation and unit symbols common in regulatory text.
pub fn sanitize_extracted_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| {
            c.is_alphanumeric()
                || c.is_whitespace()
                || matches!(
                    c,
                    '.' | ','
                        | ';'
                        | ':'
                        | '-'
                        | '/'
                        | '('
                        | ')'
                        | '['
                        | ']'
                        | '+'
                        | '='
                        | '%'
                        | '#'
                        | '&'
                        | '\''
                        | '"'
                        | '!'
                        | '?'
                        | '<'
                        | '>'
                        | '*'
                        | '_'
                        | '§'
                        | '°'
                        | '²'
                        | '³'
                        | 'µ'
                        | '«'
                        | '»'
                        | '\u{2013}' // En-dash –
                        | '\u{2014}' // Em-dash —
                        | '\u{2019}' // Right single quotation mark
                        | '\u{2018}' // Left single quotation mark
                        | '\u{201C}' // Left double quotation mark
                        | '\u{201D}' // Right double quotation mark
                        | '≤'
                        | '≥'
                        | '€'
                )
        })
        .collect::<String>()
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_null_bytes() {
        let raw = "BBT 12\x00vermindering";
        let clean = sanitize_extracted_text(raw);
        assert!(!clean.contains('\x00'));
        assert!(clean.contains("BBT 12"));
    }

    #[test]
    fn strips_control_characters() {
        let raw = "Emissiegrenswaarde: 10 mg/Nm³\x01\x02\nVoorschrift 3.1";
        let clean = sanitize_extracted_text(raw);
        assert!(!clean.contains('\x01'));
        assert!(clean.contains("10 mg/Nm³"));
        assert!(clean.contains("Voorschrift 3.1"));
    }

    #[test]
    fn preserves_regulatory_symbols() {
        let raw = "NH3 ≤ 0,5 kg/dierplaats/jaar (artikel §2.1, 20–30 °C)";
        let clean = sanitize_extracted_text(raw);
        assert!(clean.contains('≤'));
        assert!(clean.contains('§'));
        assert!(clean.contains("20–30 °C"));
        assert!(clean.contains("kg/dierplaats/jaar"));
    }

    #[test]
    fn preserves_units_and_ranges() {
        let raw = "Stof: 2-5 mg/Nm³ (daggemiddelde)";
        let clean = sanitize_extracted_text(raw);
        assert_eq!(clean, "Stof: 2-5 mg/Nm³ (daggemiddelde)");
    }

    #[test]
    fn collapses_blank_lines() {
        let raw = "Regel een\n\n\n\nRegel twee\n\n\nRegel drie";
        let clean = sanitize_extracted_text(raw);
        assert_eq!(clean, "Regel een\nRegel twee\nRegel drie");
    }

    #[test]
    fn trims_whitespace_per_line() {
        let raw = "  leidende spaties  \n  en aan het eind  ";
        let clean = sanitize_extracted_text(raw);
        assert_eq!(clean, "leidende spaties\nen aan het eind");
    }

    #[test]
    fn empty_input_returns_empty() {
        assert_eq!(sanitize_extracted_text(""), "");
    }

    #[test]
    fn preserves_dutch_accented_chars() {
        let raw = "geëxtraheerd materiaal, ruimtelijke ordening, residuën";
        let clean = sanitize_extracted_text(raw);
        assert!(clean.contains("geëxtraheerd"));
        assert!(clean.contains("residuën"));
    }
}
