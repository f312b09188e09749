//! Keyword pre-screening of permit activities.
//!
//! Before any LLM call, the permit's activity description is matched against
//! sector keyword tables (Dutch and English) to shortlist candidate BREFs.
//! Horizontal BREFs are always shortlisted. The LLM makes the final
//! applicability call per BREF scope; this stage only bounds how many scopes
//! it is asked about.

use crate::catalog::{CatalogEntry, RieActivity};

struct SectorKeywords {
    sector: &'static str,
    keywords: &'static [&'static str],
}

const SECTOR_KEYWORDS: &[SectorKeywords] = &[
    SectorKeywords {
        sector: "Livestock",
        keywords: &[
            // Dutch
            "pluimvee", "varkens", "kippen", "leghennen", "vleeskuikens", "zeugen",
            "veehouderij", "stallen", "dierplaatsen", "mest",
            // English
            "poultry", "pigs", "broilers", "laying hens", "livestock", "rearing",
        ],
    },
    SectorKeywords {
        sector: "Energy",
        keywords: &[
            "stookinstallatie", "verbranding van brandstof", "energiecentrale",
            "raffinaderij", "ketelhuis", "warmtekrachtkoppeling",
            "combustion plant", "power plant", "refinery", "boiler",
        ],
    },
    SectorKeywords {
        sector: "Chemical",
        keywords: &[
            "chemisch", "chemie", "polymeer", "kunststof", "chloor", "organische producten",
            "chemical", "polymer", "chlor-alkali", "organic chemicals",
        ],
    },
    SectorKeywords {
        sector: "Food Processing",
        keywords: &[
            "zuivel", "melk", "voedingsmiddelen", "slachthuis", "slachterij", "drank",
            "food", "drink", "milk", "dairy", "slaughterhouse",
        ],
    },
    SectorKeywords {
        sector: "Metals",
        keywords: &[
            "staal", "ijzer", "gieterij", "smelterij", "non-ferro", "metaalproductie",
            "steel", "iron", "smelter", "foundry", "non-ferrous",
        ],
    },
    SectorKeywords {
        sector: "Building Materials",
        keywords: &[
            "cement", "kalk", "glas", "keramiek", "baksteen", "magnesiumoxide",
            "lime", "glass", "ceramic",
        ],
    },
    SectorKeywords {
        sector: "Paper",
        keywords: &[
            "papier", "karton", "pulp", "papierstof",
            "paper", "board", "cardboard",
        ],
    },
    SectorKeywords {
        sector: "Waste Management",
        keywords: &[
            "afvalverwerking", "afvalverbranding", "afvalstoffen", "storten", "vergisting",
            "waste treatment", "waste incineration", "landfill",
        ],
    },
    SectorKeywords {
        sector: "Textiles",
        keywords: &["textiel", "weverij", "ververij", "textile", "dyeing"],
    },
    SectorKeywords {
        sector: "Wood",
        keywords: &["houtverwerking", "spaanplaat", "houtvezel", "wood-based", "panels"],
    },
    SectorKeywords {
        sector: "Mining",
        keywords: &["mijnbouw", "winning van delfstoffen", "mining", "quarry"],
    },
];

/// Sectors whose keyword sets match the activity description.
pub fn match_sectors(activity_text: &str) -> Vec<&'static str> {
    let lower = activity_text.to_lowercase();
    SECTOR_KEYWORDS
        .iter()
        .filter(|entry| entry.keywords.iter().any(|k| lower.contains(k)))
        .map(|entry| entry.sector)
        .collect()
}

/// Shortlist catalog BREFs for an activity description: sector matches plus
/// all horizontal BREFs, in catalog order.
pub fn prescreen_brefs<'a>(
    activity_text: &str,
    catalog: &'a [CatalogEntry],
) -> Vec<&'a CatalogEntry> {
    let sectors = match_sectors(activity_text);
    catalog
        .iter()
        .filter(|entry| entry.is_horizontal() || sectors.contains(&entry.sector))
        .collect()
}

/// RIE Annex-I activities sharing keywords with the activity description.
/// Tokens of four letters and longer count; matching is substring-based so
/// Dutch compounds ("pluimveehouderij") still hit.
pub fn match_rie_activities<'a>(
    activity_text: &str,
    activities: &'a [RieActivity],
) -> Vec<&'a RieActivity> {
    let lower = activity_text.to_lowercase();
    let tokens: Vec<String> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 3)
        .map(str::to_string)
        .collect();

    activities
        .iter()
        .filter(|activity| {
            let haystack =
                format!("{} {}", activity.description, activity.threshold).to_lowercase();
            tokens.iter().any(|t| haystack.contains(t.as_str()))
        })
        .collect()
}
