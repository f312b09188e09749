use std::str::FromStr;

use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::{BrefDocument, DocLanguage};

pub fn upsert_bref(conn: &Connection, bref: &BrefDocument) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT OR REPLACE INTO bref_documents
         (bref_id, title, sector, adoption_date, celex_url, local_path, language,
          scope_description, page_count, content_hash, ingested_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            bref.bref_id,
            bref.title,
            bref.sector,
            bref.adoption_date,
            bref.celex_url,
            bref.local_path,
            bref.language.as_str(),
            bref.scope_description,
            bref.page_count,
            bref.content_hash,
            bref.ingested_at,
        ],
    )?;
    Ok(())
}

pub fn get_bref(conn: &Connection, bref_id: &str) -> Result<Option<BrefDocument>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT bref_id, title, sector, adoption_date, celex_url, local_path, language,
         scope_description, page_count, content_hash, ingested_at
         FROM bref_documents WHERE bref_id = ?1",
    )?;

    let result = stmt.query_row(params![bref_id], read_row);

    match result {
        Ok(row) => Ok(Some(bref_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_brefs(conn: &Connection) -> Result<Vec<BrefDocument>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT bref_id, title, sector, adoption_date, celex_url, local_path, language,
         scope_description, page_count, content_hash, ingested_at
         FROM bref_documents ORDER BY bref_id",
    )?;

    let rows = stmt.query_map([], read_row)?;

    let mut brefs = Vec::new();
    for row in rows {
        brefs.push(bref_from_row(row?)?);
    }
    Ok(brefs)
}

struct BrefRow {
    bref_id: String,
    title: String,
    sector: String,
    adoption_date: Option<chrono::NaiveDate>,
    celex_url: Option<String>,
    local_path: Option<String>,
    language: String,
    scope_description: Option<String>,
    page_count: Option<u32>,
    content_hash: Option<String>,
    ingested_at: Option<chrono::NaiveDateTime>,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<BrefRow> {
    Ok(BrefRow {
        bref_id: row.get(0)?,
        title: row.get(1)?,
        sector: row.get(2)?,
        adoption_date: row.get(3)?,
        celex_url: row.get(4)?,
        local_path: row.get(5)?,
        language: row.get(6)?,
        scope_description: row.get(7)?,
        page_count: row.get(8)?,
        content_hash: row.get(9)?,
        ingested_at: row.get(10)?,
    })
}

fn bref_from_row(row: BrefRow) -> Result<BrefDocument, DatabaseError> {
    Ok(BrefDocument {
        bref_id: row.bref_id,
        title: row.title,
        sector: row.sector,
        adoption_date: row.adoption_date,
        celex_url: row.celex_url,
        local_path: row.local_path,
        language: DocLanguage::from_str(&row.language)?,
        scope_description: row.scope_description,
        page_count: row.page_count,
        content_hash: row.content_hash,
        ingested_at: row.ingested_at,
    })
}
