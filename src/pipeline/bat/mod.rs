//! BAT/BBT conclusion extraction.
//!
//! BREF documents number their conclusions ("BAT 12 is to ...",
//! "BBT 12. Ter vermindering van ..."). The scanner locates every head in
//! page-marked text, the slicer cuts the complete text of each conclusion up
//! to the next head, and cross-references to descriptive sections are
//! resolved and appended.

pub mod limits;
pub mod patterns;
pub mod refs;
pub mod scanner;
pub mod slicer;

pub use scanner::ConclusionStart;
pub use slicer::SlicedConclusion;

use chrono::Utc;

use crate::models::{
    BatConclusion, ExtractionInfo, ExtractionMethod, ValidationStatus,
};
use crate::pipeline::extraction::ExtractionResult;

/// Extract all BAT/BBT conclusions from an extracted BREF document.
pub fn extract_conclusions(bref_id: &str, extraction: &ExtractionResult) -> Vec<BatConclusion> {
    let paged_text = scanner::assemble_paged_text(&extraction.pages);
    let starts = scanner::find_starts(&paged_text, extraction.language);
    let sliced = slicer::slice_conclusions(&paged_text, &starts, extraction.language);

    tracing::info!(
        bref_id,
        heads = starts.len(),
        kept = sliced.len(),
        language = extraction.language.as_str(),
        "extracted conclusions"
    );

    let extracted_at = Utc::now().naive_utc();

    sliced
        .into_iter()
        .map(|conclusion| {
            let references = refs::find_section_references(&conclusion.text);
            let full_text = refs::resolve_references(
                &paged_text,
                &conclusion.text,
                conclusion.range.clone(),
                &references,
            );
            let emission_limits = limits::parse_emission_limits(&full_text);
            let monitoring = limits::parse_monitoring(&full_text);
            let applicability_conditions = limits::parse_applicability_conditions(&full_text);

            BatConclusion {
                bat_id: BatConclusion::make_id(bref_id, conclusion.number),
                bref_id: bref_id.to_string(),
                number: conclusion.number,
                title: conclusion.title,
                full_text,
                page: conclusion.page,
                section_references: references,
                language: extraction.language,
                emission_limits,
                monitoring,
                applicability_conditions,
                extraction: ExtractionInfo {
                    method: ExtractionMethod::FullyAutomated,
                    confidence: extraction.overall_confidence,
                    validation_status: ValidationStatus::Pending,
                    extracted_at,
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocLanguage, Pollutant};
    use crate::pipeline::extraction::PageExtraction;

    fn extraction(pages: Vec<(usize, &str)>, language: DocLanguage) -> ExtractionResult {
        let pages: Vec<PageExtraction> = pages
            .into_iter()
            .map(|(n, text)| PageExtraction {
                page_number: n,
                text: text.to_string(),
                confidence: 0.95,
                warnings: vec![],
            })
            .collect();
        let full_text = pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let page_count = pages.len();
        ExtractionResult {
            pages,
            full_text,
            page_count,
            language,
            overall_confidence: 0.95,
        }
    }

    #[test]
    fn end_to_end_dutch_batc() {
        let result = extraction(
            vec![
                (
                    150,
                    "BBT 12. Ter vermindering van ammoniakemissies naar lucht is de BBT \
                     het toepassen van de technieken uit bijlage III.\n\
                     De BBT-GEN voor NH3 is 0,02 – 0,1 kg/dierplaats/jaar.\n\
                     Continu meten volgens EN 15483.",
                ),
                (
                    151,
                    "BBT 13. Om de geuremissies te voorkomen is de BBT het opstellen van \
                     een geurbeheersplan met periodieke monitoring.",
                ),
                (
                    210,
                    "BIJLAGE III\nBeschrijving van luchtwassystemen: chemische wassers \
                     verwijderen ammoniak uit de stallucht.",
                ),
            ],
            DocLanguage::Dutch,
        );

        let conclusions = extract_conclusions("IRPP", &result);

        assert_eq!(conclusions.len(), 2);

        let bbt12 = &conclusions[0];
        assert_eq!(bbt12.bat_id, "IRPP-BAT-12");
        assert_eq!(bbt12.page, 150);
        assert_eq!(bbt12.section_references, vec!["bijlage iii"]);
        assert!(
            bbt12.full_text.contains("--- REFERENCED BIJLAGE III ---"),
            "reference must be resolved into the conclusion text"
        );
        assert!(bbt12.full_text.contains("luchtwassystemen"));
        assert_eq!(bbt12.emission_limits.len(), 1);
        assert_eq!(bbt12.emission_limits[0].pollutant, Pollutant::Ammonia);
        assert_eq!(bbt12.monitoring.len(), 1);
        assert_eq!(bbt12.monitoring[0].standard.as_deref(), Some("EN 15483"));

        let bbt13 = &conclusions[1];
        assert_eq!(bbt13.number, 13);
        assert!(bbt13.section_references.is_empty());
        assert!(bbt13.emission_limits.is_empty());
    }

    #[test]
    fn english_bref_conclusions() {
        let result = extraction(
            vec![(
                80,
                "BAT 5. In order to prevent diffuse dust emissions, BAT is to use \
                 enclosed conveying systems.\n\
                 BAT 6. In order to reduce channelled dust emissions, BAT is to use \
                 fabric filters achieving 2-5 mg/Nm3.",
            )],
            DocLanguage::English,
        );

        let conclusions = extract_conclusions("CLM", &result);
        assert_eq!(conclusions.len(), 2);
        assert_eq!(conclusions[0].bat_id, "CLM-BAT-5");
        assert_eq!(conclusions[1].emission_limits.len(), 1);
        assert_eq!(conclusions[1].emission_limits[0].pollutant, Pollutant::Dust);
    }

    #[test]
    fn document_without_conclusions_yields_empty() {
        let result = extraction(
            vec![(1, "Dit hoofdstuk beschrijft het toepassingsgebied van het document.")],
            DocLanguage::Dutch,
        );
        assert!(extract_conclusions("FDM", &result).is_empty());
    }
}
