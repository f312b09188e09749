use std::str::FromStr;

use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{
    ApplicabilityAssessment, BatComplianceResult, ComplianceRun, ComplianceStatus, RunFailure,
    RunStage,
};

/// Persist a completed run with its results and failures in one transaction.
pub fn insert_run(conn: &mut Connection, run: &ComplianceRun) -> Result<(), DatabaseError> {
    let tx = conn.transaction()?;

    tx.execute(
        "INSERT INTO compliance_runs (run_id, permit_id, started_at, finished_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            run.run_id.to_string(),
            run.permit_id,
            run.started_at,
            run.finished_at,
        ],
    )?;

    for result in &run.results {
        tx.execute(
            "INSERT INTO compliance_results (run_id, bat_id, bref_id, status, findings)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                run.run_id.to_string(),
                result.bat_id,
                result.bref_id,
                result.status.as_str(),
                result.findings,
            ],
        )?;
    }

    for failure in &run.failures {
        tx.execute(
            "INSERT INTO run_failures (run_id, stage, subject, error)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                run.run_id.to_string(),
                failure.stage.as_str(),
                failure.subject,
                failure.error,
            ],
        )?;
    }

    tx.commit()?;
    Ok(())
}

/// Load the persisted results of a run. Applicability assessments live in
/// the report artifacts, not the database; the loaded run has them empty.
pub fn load_run(conn: &Connection, run_id: &Uuid) -> Result<Option<ComplianceRun>, DatabaseError> {
    let header = conn.query_row(
        "SELECT permit_id, started_at, finished_at FROM compliance_runs WHERE run_id = ?1",
        params![run_id.to_string()],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, chrono::NaiveDateTime>(1)?,
                row.get::<_, chrono::NaiveDateTime>(2)?,
            ))
        },
    );

    let (permit_id, started_at, finished_at) = match header {
        Ok(h) => h,
        Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut stmt = conn.prepare(
        "SELECT bat_id, bref_id, status, findings FROM compliance_results
         WHERE run_id = ?1 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![run_id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut results = Vec::new();
    for row in rows {
        let (bat_id, bref_id, status, findings) = row?;
        results.push(BatComplianceResult {
            bat_id,
            bref_id,
            status: ComplianceStatus::from_str(&status)?,
            findings,
        });
    }

    let mut stmt = conn.prepare(
        "SELECT stage, subject, error FROM run_failures WHERE run_id = ?1 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![run_id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;

    let mut failures = Vec::new();
    for row in rows {
        let (stage, subject, error) = row?;
        failures.push(RunFailure {
            stage: RunStage::from_str(&stage)?,
            subject,
            error,
        });
    }

    Ok(Some(ComplianceRun {
        run_id: *run_id,
        permit_id,
        started_at,
        finished_at,
        assessments: Vec::<ApplicabilityAssessment>::new(),
        results,
        failures,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use crate::db::repository::permit::insert_permit;
    use crate::models::Permit;
    use chrono::NaiveDate;

    fn seed_permit(conn: &Connection) {
        let at = NaiveDate::from_ymd_opt(2025, 5, 12)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        insert_permit(
            conn,
            &Permit {
                permit_id: "PERMIT-1".into(),
                title: "Vergunning".into(),
                source_file: "permit.pdf".into(),
                content_hash: "hash".into(),
                activity_description: "pluimveehouderij".into(),
                full_text: "tekst".into(),
                page_count: 10,
                ingested_at: at,
            },
        )
        .unwrap();
    }

    fn sample_run() -> ComplianceRun {
        let at = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        ComplianceRun {
            run_id: Uuid::new_v4(),
            permit_id: "PERMIT-1".into(),
            started_at: at,
            finished_at: at,
            assessments: vec![],
            results: vec![BatComplianceResult {
                bat_id: "IRPP-BAT-12".into(),
                bref_id: "IRPP".into(),
                status: ComplianceStatus::PartiallyCompliant,
                findings: "Monitoring frequency not specified.".into(),
            }],
            failures: vec![RunFailure {
                stage: RunStage::BatVerification,
                subject: "IRPP-BAT-13".into(),
                error: "LLM request timed out after 120s".into(),
            }],
        }
    }

    #[test]
    fn insert_and_load_round_trip() {
        let mut conn = open_memory_database().unwrap();
        seed_permit(&conn);
        let run = sample_run();
        insert_run(&mut conn, &run).unwrap();

        let loaded = load_run(&conn, &run.run_id).unwrap().unwrap();
        assert_eq!(loaded.permit_id, "PERMIT-1");
        assert_eq!(loaded.results.len(), 1);
        assert_eq!(loaded.results[0].status, ComplianceStatus::PartiallyCompliant);
        assert_eq!(loaded.failures.len(), 1);
        assert_eq!(loaded.failures[0].stage, RunStage::BatVerification);
    }

    #[test]
    fn load_missing_run_returns_none() {
        let conn = open_memory_database().unwrap();
        assert!(load_run(&conn, &Uuid::new_v4()).unwrap().is_none());
    }
}
