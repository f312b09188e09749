//! Built-in catalog of the official EU BREF series and a representative set
//! of RIE (Industrial Emissions Directive) Annex-I activity categories.
//!
//! CELEX URLs point at the Dutch BAT-conclusions implementing decisions on
//! EUR-Lex.

use chrono::NaiveDate;
use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::{BrefDocument, DocLanguage, HORIZONTAL_SECTOR};

/// One catalog row: the official BREF series entry for a sector.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub bref_id: &'static str,
    pub title: &'static str,
    pub sector: &'static str,
    pub adoption_date: &'static str,
    pub celex_url: &'static str,
}

impl CatalogEntry {
    pub fn is_horizontal(&self) -> bool {
        self.sector == HORIZONTAL_SECTOR
    }
}

/// The official BREF series: sector-specific, waste, and horizontal.
pub const CATALOG: &[CatalogEntry] = &[
    // Sector-specific BREFs
    CatalogEntry { bref_id: "FDM", title: "Food, Drink and Milk Industries", sector: "Food Processing", adoption_date: "2019-12-12", celex_url: "https://eur-lex.europa.eu/legal-content/NL/TXT/PDF/?uri=CELEX:32019D2031" },
    CatalogEntry { bref_id: "IRPP", title: "Intensive Rearing of Poultry or Pigs", sector: "Livestock", adoption_date: "2017-02-15", celex_url: "https://eur-lex.europa.eu/legal-content/NL/TXT/PDF/?uri=CELEX:32017D0302" },
    CatalogEntry { bref_id: "LCP", title: "Large Combustion Plants", sector: "Energy", adoption_date: "2017-07-31", celex_url: "https://eur-lex.europa.eu/legal-content/NL/TXT/PDF/?uri=CELEX:32017D1442" },
    CatalogEntry { bref_id: "REF", title: "Refining of Mineral Oil and Gas", sector: "Energy", adoption_date: "2014-10-09", celex_url: "https://eur-lex.europa.eu/legal-content/NL/TXT/PDF/?uri=CELEX:32014D0738" },
    CatalogEntry { bref_id: "ISP", title: "Iron and Steel Production", sector: "Metals", adoption_date: "2012-02-28", celex_url: "https://eur-lex.europa.eu/legal-content/NL/TXT/PDF/?uri=CELEX:32012D0135" },
    CatalogEntry { bref_id: "NFM", title: "Non-ferrous Metals", sector: "Metals", adoption_date: "2016-06-13", celex_url: "https://eur-lex.europa.eu/legal-content/NL/TXT/PDF/?uri=CELEX:32016D1032" },
    CatalogEntry { bref_id: "CLM", title: "Cement, Lime and Magnesium Oxide Production", sector: "Building Materials", adoption_date: "2013-02-26", celex_url: "https://eur-lex.europa.eu/legal-content/NL/TXT/PDF/?uri=CELEX:32013D0163" },
    CatalogEntry { bref_id: "GLS", title: "Glass Manufacturing", sector: "Building Materials", adoption_date: "2012-02-28", celex_url: "https://eur-lex.europa.eu/legal-content/NL/TXT/PDF/?uri=CELEX:32012D0134" },
    CatalogEntry { bref_id: "CAM", title: "Ceramic Manufacturing", sector: "Building Materials", adoption_date: "2007-08-24", celex_url: "https://eur-lex.europa.eu/legal-content/NL/TXT/PDF/?uri=CELEX:32007D0506" },
    CatalogEntry { bref_id: "LVIC", title: "Large Volume Inorganic Chemicals", sector: "Chemical", adoption_date: "2013-12-09", celex_url: "https://eur-lex.europa.eu/legal-content/NL/TXT/PDF/?uri=CELEX:32013D0732" },
    CatalogEntry { bref_id: "LVOC", title: "Large Volume Organic Chemicals", sector: "Chemical", adoption_date: "2017-12-13", celex_url: "https://eur-lex.europa.eu/legal-content/NL/TXT/PDF/?uri=CELEX:32017D2117" },
    CatalogEntry { bref_id: "OFC", title: "Organic Fine Chemicals", sector: "Chemical", adoption_date: "2006-11-09", celex_url: "https://eur-lex.europa.eu/legal-content/NL/TXT/PDF/?uri=CELEX:32006D0738" },
    CatalogEntry { bref_id: "POL", title: "Polymers Production", sector: "Chemical", adoption_date: "2007-02-02", celex_url: "https://eur-lex.europa.eu/legal-content/NL/TXT/PDF/?uri=CELEX:32007D0064" },
    CatalogEntry { bref_id: "CAK", title: "Chlor-alkali Production", sector: "Chemical", adoption_date: "2013-12-09", celex_url: "https://eur-lex.europa.eu/legal-content/NL/TXT/PDF/?uri=CELEX:32013D0732" },
    CatalogEntry { bref_id: "PPB", title: "Pulp, Paper and Board Production", sector: "Paper", adoption_date: "2014-09-26", celex_url: "https://eur-lex.europa.eu/legal-content/NL/TXT/PDF/?uri=CELEX:32014D0687" },
    CatalogEntry { bref_id: "TXT", title: "Textiles Industry", sector: "Textiles", adoption_date: "2003-10-14", celex_url: "https://eur-lex.europa.eu/legal-content/NL/TXT/PDF/?uri=CELEX:32003D0720" },
    CatalogEntry { bref_id: "SA", title: "Slaughterhouses and Animal By-products", sector: "Food Processing", adoption_date: "2005-02-08", celex_url: "https://eur-lex.europa.eu/legal-content/NL/TXT/PDF/?uri=CELEX:32005D0079" },
    CatalogEntry { bref_id: "WBP", title: "Wood-based Panels Production", sector: "Wood", adoption_date: "2007-01-25", celex_url: "https://eur-lex.europa.eu/legal-content/NL/TXT/PDF/?uri=CELEX:32007D0053" },
    CatalogEntry { bref_id: "MIN", title: "Mining", sector: "Mining", adoption_date: "2009-05-13", celex_url: "https://eur-lex.europa.eu/legal-content/NL/TXT/PDF/?uri=CELEX:32009D0416" },
    // Waste BREFs
    CatalogEntry { bref_id: "WT", title: "Waste Treatment", sector: "Waste Management", adoption_date: "2018-08-10", celex_url: "https://eur-lex.europa.eu/legal-content/NL/TXT/PDF/?uri=CELEX:32018D1147" },
    CatalogEntry { bref_id: "WI", title: "Waste Incineration", sector: "Waste Management", adoption_date: "2019-11-12", celex_url: "https://eur-lex.europa.eu/legal-content/NL/TXT/PDF/?uri=CELEX:32019D2010" },
    // Horizontal BREFs, applicable to every sector
    CatalogEntry { bref_id: "ICS", title: "Industrial Cooling Systems", sector: HORIZONTAL_SECTOR, adoption_date: "2021-12-16", celex_url: "https://eur-lex.europa.eu/legal-content/NL/TXT/PDF/?uri=CELEX:32021D2285" },
    CatalogEntry { bref_id: "ENE", title: "Energy Efficiency", sector: HORIZONTAL_SECTOR, adoption_date: "2009-02-24", celex_url: "https://eur-lex.europa.eu/legal-content/NL/TXT/PDF/?uri=CELEX:32009D1357" },
    CatalogEntry { bref_id: "EMS", title: "Emissions Monitoring and Reporting", sector: HORIZONTAL_SECTOR, adoption_date: "2007-08-24", celex_url: "https://eur-lex.europa.eu/legal-content/NL/TXT/PDF/?uri=CELEX:32007D0589" },
    CatalogEntry { bref_id: "STM", title: "Surface Treatment of Metals", sector: HORIZONTAL_SECTOR, adoption_date: "2006-08-24", celex_url: "https://eur-lex.europa.eu/legal-content/NL/TXT/PDF/?uri=CELEX:32006D0061" },
    CatalogEntry { bref_id: "STP", title: "Surface Treatment using Plastics", sector: HORIZONTAL_SECTOR, adoption_date: "2007-02-09", celex_url: "https://eur-lex.europa.eu/legal-content/NL/TXT/PDF/?uri=CELEX:32007D0084" },
    CatalogEntry { bref_id: "STS", title: "Surface Treatment using Solvents", sector: HORIZONTAL_SECTOR, adoption_date: "2007-02-09", celex_url: "https://eur-lex.europa.eu/legal-content/NL/TXT/PDF/?uri=CELEX:32007D0084" },
    CatalogEntry { bref_id: "CWW", title: "Chemical Sector Waste Water and Gas Treatment", sector: HORIZONTAL_SECTOR, adoption_date: "2016-05-30", celex_url: "https://eur-lex.europa.eu/legal-content/NL/TXT/PDF/?uri=CELEX:32016D0902" },
];

/// One RIE Annex-I activity category.
#[derive(Debug, Clone)]
pub struct RieActivity {
    pub category: &'static str,
    pub description: &'static str,
    pub threshold: &'static str,
}

/// Representative RIE Annex-I activities used for keyword pre-screening.
pub const RIE_ACTIVITIES: &[RieActivity] = &[
    RieActivity { category: "1.1", description: "Het stoken in installaties (verbranding van brandstof)", threshold: "totaal nominaal thermisch ingangsvermogen van 50 MW of meer" },
    RieActivity { category: "2.2", description: "De productie van ijzer of staal (primaire of secundaire smelting)", threshold: "capaciteit van meer dan 2,5 ton per uur" },
    RieActivity { category: "3.1", description: "De productie van cement, ongebluste kalk en magnesiumoxide", threshold: "productiecapaciteit van meer dan 500 ton per dag" },
    RieActivity { category: "4.1", description: "De fabricage van organisch-chemische producten", threshold: "productie op industriële schaal" },
    RieActivity { category: "5.2", description: "De verwijdering of nuttige toepassing van afvalstoffen in afvalverbrandingsinstallaties", threshold: "capaciteit van meer dan 3 ton per uur" },
    RieActivity { category: "6.1", description: "De fabricage van papierstof, papier of karton", threshold: "productiecapaciteit van meer dan 20 ton per dag" },
    RieActivity { category: "6.4", description: "De bewerking en verwerking van melk", threshold: "hoeveelheid ontvangen melk van meer dan 200 ton per dag" },
    RieActivity { category: "6.6", description: "Intensieve pluimvee- of varkenshouderij", threshold: "meer dan 40 000 plaatsen voor pluimvee, 2 000 plaatsen voor mestvarkens of 750 plaatsen voor zeugen" },
];

/// Seed the database with the built-in BREF catalog. Existing rows keep
/// their ingestion fields; only catalog metadata is refreshed.
pub fn seed_catalog(conn: &Connection) -> Result<usize, DatabaseError> {
    let mut seeded = 0;
    for entry in CATALOG {
        let existing = crate::db::get_bref(conn, entry.bref_id)?;
        let bref = BrefDocument {
            bref_id: entry.bref_id.to_string(),
            title: entry.title.to_string(),
            sector: entry.sector.to_string(),
            adoption_date: NaiveDate::parse_from_str(entry.adoption_date, "%Y-%m-%d").ok(),
            celex_url: Some(entry.celex_url.to_string()),
            local_path: existing.as_ref().and_then(|b| b.local_path.clone()),
            language: existing
                .as_ref()
                .map(|b| b.language)
                .unwrap_or(DocLanguage::Dutch),
            scope_description: existing.as_ref().and_then(|b| b.scope_description.clone()),
            page_count: existing.as_ref().and_then(|b| b.page_count),
            content_hash: existing.as_ref().and_then(|b| b.content_hash.clone()),
            ingested_at: existing.as_ref().and_then(|b| b.ingested_at),
        };
        crate::db::upsert_bref(conn, &bref)?;
        seeded += 1;
    }
    tracing::info!(seeded, "seeded BREF catalog");
    Ok(seeded)
}

/// Seed the RIE activity table (replaces the previous set).
pub fn seed_rie_activities(conn: &Connection) -> Result<usize, DatabaseError> {
    conn.execute("DELETE FROM rie_activities", [])?;
    for activity in RIE_ACTIVITIES {
        conn.execute(
            "INSERT INTO rie_activities (category, activity_description, threshold_values, annex_ref)
             VALUES (?1, ?2, ?3, 'Annex I')",
            params![activity.category, activity.description, activity.threshold],
        )?;
    }
    Ok(RIE_ACTIVITIES.len())
}

/// Look up a catalog entry by BREF id.
pub fn find_entry(bref_id: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|e| e.bref_id == bref_id)
}
