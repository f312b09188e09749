use std::str::FromStr;

use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::{
    ApplicabilityCondition, BatConclusion, DocLanguage, EmissionLimitValue, ExtractionInfo,
    ExtractionMethod, MonitoringRequirement, ValidationStatus,
};

/// Replace all stored conclusions of a BREF with a freshly extracted set.
/// Runs in a transaction so a failed insert leaves the old set intact.
pub fn replace_conclusions(
    conn: &mut Connection,
    bref_id: &str,
    conclusions: &[BatConclusion],
) -> Result<(), DatabaseError> {
    let tx = conn.transaction()?;

    tx.execute(
        "DELETE FROM bat_conclusions WHERE bref_id = ?1",
        params![bref_id],
    )?;

    for bat in conclusions {
        tx.execute(
            "INSERT INTO bat_conclusions
             (bat_id, bref_id, bat_number, title, full_text, page, section_references,
              language, emission_limits, monitoring, applicability_conditions,
              extraction_method, confidence, validation_status, extracted_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                bat.bat_id,
                bat.bref_id,
                bat.number,
                bat.title,
                bat.full_text,
                bat.page,
                to_json(&bat.section_references, "section_references")?,
                bat.language.as_str(),
                to_json(&bat.emission_limits, "emission_limits")?,
                to_json(&bat.monitoring, "monitoring")?,
                to_json(&bat.applicability_conditions, "applicability_conditions")?,
                bat.extraction.method.as_str(),
                bat.extraction.confidence,
                bat.extraction.validation_status.as_str(),
                bat.extraction.extracted_at,
            ],
        )?;
    }

    tx.commit()?;
    Ok(())
}

pub fn conclusions_for_bref(
    conn: &Connection,
    bref_id: &str,
) -> Result<Vec<BatConclusion>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT bat_id, bref_id, bat_number, title, full_text, page, section_references,
         language, emission_limits, monitoring, applicability_conditions,
         extraction_method, confidence, validation_status, extracted_at
         FROM bat_conclusions WHERE bref_id = ?1 ORDER BY bat_number",
    )?;

    let rows = stmt.query_map(params![bref_id], read_row)?;

    let mut conclusions = Vec::new();
    for row in rows {
        conclusions.push(bat_from_row(row?)?);
    }
    Ok(conclusions)
}

pub fn count_conclusions(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM bat_conclusions", [], |row| row.get(0))?;
    Ok(count)
}

struct BatRow {
    bat_id: String,
    bref_id: String,
    number: u32,
    title: String,
    full_text: String,
    page: u32,
    section_references: String,
    language: String,
    emission_limits: String,
    monitoring: String,
    applicability_conditions: String,
    extraction_method: String,
    confidence: f32,
    validation_status: String,
    extracted_at: chrono::NaiveDateTime,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<BatRow> {
    Ok(BatRow {
        bat_id: row.get(0)?,
        bref_id: row.get(1)?,
        number: row.get(2)?,
        title: row.get(3)?,
        full_text: row.get(4)?,
        page: row.get(5)?,
        section_references: row.get(6)?,
        language: row.get(7)?,
        emission_limits: row.get(8)?,
        monitoring: row.get(9)?,
        applicability_conditions: row.get(10)?,
        extraction_method: row.get(11)?,
        confidence: row.get(12)?,
        validation_status: row.get(13)?,
        extracted_at: row.get(14)?,
    })
}

fn bat_from_row(row: BatRow) -> Result<BatConclusion, DatabaseError> {
    let section_references: Vec<String> = from_json(&row.section_references, "section_references")?;
    let emission_limits: Vec<EmissionLimitValue> =
        from_json(&row.emission_limits, "emission_limits")?;
    let monitoring: Vec<MonitoringRequirement> = from_json(&row.monitoring, "monitoring")?;
    let applicability_conditions: Vec<ApplicabilityCondition> =
        from_json(&row.applicability_conditions, "applicability_conditions")?;

    Ok(BatConclusion {
        bat_id: row.bat_id,
        bref_id: row.bref_id,
        number: row.number,
        title: row.title,
        full_text: row.full_text,
        page: row.page,
        section_references,
        language: DocLanguage::from_str(&row.language)?,
        emission_limits,
        monitoring,
        applicability_conditions,
        extraction: ExtractionInfo {
            method: ExtractionMethod::from_str(&row.extraction_method)?,
            confidence: row.confidence,
            validation_status: ValidationStatus::from_str(&row.validation_status)?,
            extracted_at: row.extracted_at,
        },
    })
}

fn to_json<T: serde::Serialize>(value: &T, column: &'static str) -> Result<String, DatabaseError> {
    serde_json::to_string(value).map_err(|e| DatabaseError::InvalidJson {
        column,
        reason: e.to_string(),
    })
}

fn from_json<T: serde::de::DeserializeOwned>(
    raw: &str,
    column: &'static str,
) -> Result<T, DatabaseError> {
    serde_json::from_str(raw).map_err(|e| DatabaseError::InvalidJson {
        column,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use crate::db::repository::bref::upsert_bref;
    use crate::models::{BrefDocument, Pollutant};
    use chrono::NaiveDate;

    fn seed_bref(conn: &Connection) {
        let bref = BrefDocument {
            bref_id: "IRPP".into(),
            title: "Intensive Rearing of Poultry or Pigs".into(),
            sector: "Livestock".into(),
            adoption_date: None,
            celex_url: None,
            local_path: None,
            language: DocLanguage::Dutch,
            scope_description: None,
            page_count: None,
            content_hash: None,
            ingested_at: None,
        };
        upsert_bref(conn, &bref).unwrap();
    }

    fn sample(number: u32) -> BatConclusion {
        let at = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        BatConclusion {
            bat_id: BatConclusion::make_id("IRPP", number),
            bref_id: "IRPP".into(),
            number,
            title: format!("Conclusie {number}"),
            full_text: format!("BBT {number} De BBT is om ammoniakemissies te verminderen."),
            page: 140 + number,
            section_references: vec!["section 4.2".into()],
            language: DocLanguage::Dutch,
            emission_limits: vec![
                EmissionLimitValue::new(Pollutant::Ammonia, 0.02, 0.1, "kg/dierplaats/jaar")
                    .unwrap(),
            ],
            monitoring: vec![],
            applicability_conditions: vec![ApplicabilityCondition {
                description: "Alleen toepasbaar bij nieuwe stallen".into(),
                restriction: Some("Alleen toepasbaar bij nieuwe stallen".into()),
            }],
            extraction: ExtractionInfo {
                method: ExtractionMethod::FullyAutomated,
                confidence: 0.9,
                validation_status: ValidationStatus::Pending,
                extracted_at: at,
            },
        }
    }

    #[test]
    fn replace_and_load_round_trip() {
        let mut conn = open_memory_database().unwrap();
        seed_bref(&conn);

        replace_conclusions(&mut conn, "IRPP", &[sample(3), sample(1)]).unwrap();

        let loaded = conclusions_for_bref(&conn, "IRPP").unwrap();
        assert_eq!(loaded.len(), 2);
        // Ordered by number regardless of insert order
        assert_eq!(loaded[0].number, 1);
        assert_eq!(loaded[1].number, 3);
        assert_eq!(loaded[0].bat_id, "IRPP-BAT-1");
        assert_eq!(loaded[0].section_references, vec!["section 4.2"]);
        assert_eq!(loaded[0].emission_limits[0].pollutant, Pollutant::Ammonia);
        assert!(loaded[0].applicability_conditions[0].restriction.is_some());
        assert_eq!(loaded[0].extraction.validation_status, ValidationStatus::Pending);
    }

    #[test]
    fn replace_overwrites_previous_set() {
        let mut conn = open_memory_database().unwrap();
        seed_bref(&conn);

        replace_conclusions(&mut conn, "IRPP", &[sample(1), sample(2)]).unwrap();
        replace_conclusions(&mut conn, "IRPP", &[sample(5)]).unwrap();

        let loaded = conclusions_for_bref(&conn, "IRPP").unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].number, 5);
        assert_eq!(count_conclusions(&conn).unwrap(), 1);
    }

    #[test]
    fn duplicate_number_within_bref_is_rejected() {
        let mut conn = open_memory_database().unwrap();
        seed_bref(&conn);

        let result = replace_conclusions(&mut conn, "IRPP", &[sample(1), sample(1)]);
        assert!(result.is_err());
        // Transaction rolled back — nothing persisted
        assert_eq!(count_conclusions(&conn).unwrap(), 0);
    }

    #[test]
    fn unknown_bref_violates_foreign_key() {
        let mut conn = open_memory_database().unwrap();
        let mut bat = sample(1);
        bat.bref_id = "GHOST".into();
        let result = replace_conclusions(&mut conn, "GHOST", &[bat]);
        assert!(result.is_err());
    }
}
