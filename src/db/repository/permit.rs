use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::Permit;

pub fn insert_permit(conn: &Connection, permit: &Permit) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT OR REPLACE INTO permits
         (permit_id, title, source_file, content_hash, activity_description,
          full_text, page_count, ingested_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            permit.permit_id,
            permit.title,
            permit.source_file,
            permit.content_hash,
            permit.activity_description,
            permit.full_text,
            permit.page_count,
            permit.ingested_at,
        ],
    )?;
    Ok(())
}

pub fn get_permit(conn: &Connection, permit_id: &str) -> Result<Option<Permit>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT permit_id, title, source_file, content_hash, activity_description,
         full_text, page_count, ingested_at
         FROM permits WHERE permit_id = ?1",
    )?;

    let result = stmt.query_row(params![permit_id], |row| {
        Ok(Permit {
            permit_id: row.get(0)?,
            title: row.get(1)?,
            source_file: row.get(2)?,
            content_hash: row.get(3)?,
            activity_description: row.get(4)?,
            full_text: row.get(5)?,
            page_count: row.get(6)?,
            ingested_at: row.get(7)?,
        })
    });

    match result {
        Ok(permit) => Ok(Some(permit)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Look up a previously ingested permit by its content hash (re-upload dedup).
pub fn get_permit_by_hash(
    conn: &Connection,
    content_hash: &str,
) -> Result<Option<Permit>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT permit_id, title, source_file, content_hash, activity_description,
         full_text, page_count, ingested_at
         FROM permits WHERE content_hash = ?1 LIMIT 1",
    )?;

    let result = stmt.query_row(params![content_hash], |row| {
        Ok(Permit {
            permit_id: row.get(0)?,
            title: row.get(1)?,
            source_file: row.get(2)?,
            content_hash: row.get(3)?,
            activity_description: row.get(4)?,
            full_text: row.get(5)?,
            page_count: row.get(6)?,
            ingested_at: row.get(7)?,
        })
    });

    match result {
        Ok(permit) => Ok(Some(permit)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use chrono::NaiveDate;

    fn sample() -> Permit {
        Permit {
            permit_id: "PERMIT-SOLIDUS".into(),
            title: "Omgevingsvergunning Solidus Solutions".into(),
            source_file: "solidus_vergunning.pdf".into(),
            content_hash: "c2FtcGxlaGFzaA==".into(),
            activity_description: "Productie van massief karton".into(),
            full_text: "Voorschrift 3.1.1 ...".into(),
            page_count: 68,
            ingested_at: NaiveDate::from_ymd_opt(2025, 5, 12)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn insert_and_get_round_trip() {
        let conn = open_memory_database().unwrap();
        insert_permit(&conn, &sample()).unwrap();

        let loaded = get_permit(&conn, "PERMIT-SOLIDUS").unwrap().unwrap();
        assert_eq!(loaded.title, "Omgevingsvergunning Solidus Solutions");
        assert_eq!(loaded.page_count, 68);
    }

    #[test]
    fn lookup_by_hash_finds_duplicate() {
        let conn = open_memory_database().unwrap();
        insert_permit(&conn, &sample()).unwrap();

        let found = get_permit_by_hash(&conn, "c2FtcGxlaGFzaA==").unwrap();
        assert!(found.is_some());
        assert!(get_permit_by_hash(&conn, "other").unwrap().is_none());
    }
}
