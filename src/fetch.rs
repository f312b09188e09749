//! Downloads BREF documents (Dutch BAT-conclusions PDFs) from EUR-Lex into
//! the local brefs directory.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::catalog::CatalogEntry;

/// EUR-Lex can be slow to assemble PDFs.
const DOWNLOAD_TIMEOUT_SECS: u64 = 60;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot reach {0}")]
    Connection(String),

    #[error("Download timed out after {0}s")]
    Timeout(u64),

    #[error("Server returned {status} for {bref_id}")]
    Status { bref_id: String, status: u16 },

    #[error("Downloaded file for {0} is not a PDF")]
    NotAPdf(String),
}

/// Summary of a catalog-wide download pass.
#[derive(Debug, Default)]
pub struct FetchSummary {
    pub downloaded: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<(String, String)>,
}

pub fn download_client() -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
        .build()
        .expect("Failed to create HTTP client")
}

/// Local filename for a BREF PDF.
pub fn bref_pdf_path(dest_dir: &Path, bref_id: &str) -> PathBuf {
    dest_dir.join(format!("{bref_id}_bref.pdf"))
}

/// Download one BREF PDF. Verifies the `%PDF` magic before writing; EUR-Lex
/// answers some CELEX queries with an HTML error page and status 200.
pub fn download_bref(
    client: &reqwest::blocking::Client,
    entry: &CatalogEntry,
    dest_dir: &Path,
) -> Result<PathBuf, FetchError> {
    std::fs::create_dir_all(dest_dir)?;
    let dest = bref_pdf_path(dest_dir, entry.bref_id);

    let response = client.get(entry.celex_url).send().map_err(|e| {
        if e.is_connect() {
            FetchError::Connection(entry.celex_url.to_string())
        } else if e.is_timeout() {
            FetchError::Timeout(DOWNLOAD_TIMEOUT_SECS)
        } else {
            FetchError::Connection(e.to_string())
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            bref_id: entry.bref_id.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response
        .bytes()
        .map_err(|e| FetchError::Connection(e.to_string()))?;

    if !bytes.starts_with(b"%PDF") {
        return Err(FetchError::NotAPdf(entry.bref_id.to_string()));
    }

    std::fs::write(&dest, &bytes)?;
    tracing::info!(bref_id = entry.bref_id, size = bytes.len(), "downloaded BREF");
    Ok(dest)
}

/// Download every catalog entry that is not already on disk.
/// Failures are collected, not fatal.
pub fn download_all(
    client: &reqwest::blocking::Client,
    entries: &[CatalogEntry],
    dest_dir: &Path,
) -> FetchSummary {
    let mut summary = FetchSummary::default();

    for entry in entries {
        if bref_pdf_path(dest_dir, entry.bref_id).exists() {
            summary.skipped.push(entry.bref_id.to_string());
            continue;
        }
        match download_bref(client, entry, dest_dir) {
            Ok(_) => summary.downloaded.push(entry.bref_id.to_string()),
            Err(e) => {
                tracing::warn!(bref_id = entry.bref_id, error = %e, "BREF download failed");
                summary.failed.push((entry.bref_id.to_string(), e.to_string()));
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_path_is_per_bref() {
        let path = bref_pdf_path(Path::new("/data/brefs"), "IRPP");
        assert!(path.ends_with("IRPP_bref.pdf"));
    }

    #[test]
    fn existing_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(bref_pdf_path(dir.path(), "IRPP"), b"%PDF-1.4 existing").unwrap();

        let entry = crate::catalog::find_entry("IRPP").unwrap();
        let summary = download_all(&download_client(), &[*entry], dir.path());

        assert_eq!(summary.skipped, vec!["IRPP"]);
        assert!(summary.downloaded.is_empty());
    }

    #[test]
    fn unreachable_host_is_collected_as_failure() {
        let dir = tempfile::tempdir().unwrap();
        let entry = CatalogEntry {
            bref_id: "TEST",
            title: "Test",
            sector: "Test",
            adoption_date: "2020-01-01",
            celex_url: "http://127.0.0.1:1/nothing.pdf",
        };
        let summary = download_all(&download_client(), &[entry], dir.path());
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, "TEST");
    }
}
