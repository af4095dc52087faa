//! Dataset summary — record count, class average and content digest.
//!
//! The digest is SHA-256 over the raw file bytes (lowercase hex), so a
//! summary taken earlier can tell whether the file has changed since.

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use grading_kernel::arithmetic::mean_of;
use grading_kernel::domain::FinalScore;

use crate::record_store::{PersistenceError, RecordStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub path: PathBuf,
    pub record_count: u64,
    /// Mean of every record's final score.
    pub class_average: FinalScore,
    pub sha256: String,
}

pub fn digest_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Read the store once and summarize it.
pub fn summarize(store: &RecordStore) -> Result<DatasetSummary, PersistenceError> {
    let bytes = store.read_bytes()?;
    summarize_bytes(store, &bytes)
}

/// Summarize store contents already in memory. Count, average and digest
/// all come from `bytes`, never from a second read of the file.
pub fn summarize_bytes(store: &RecordStore, bytes: &[u8]) -> Result<DatasetSummary, PersistenceError> {
    let text = std::str::from_utf8(bytes).map_err(|e| PersistenceError::Io {
        path: store.path().to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidData, e),
    })?;
    let records = store.parse_records(text)?;
    let finals: Vec<FinalScore> = records.iter().map(|r| r.final_score).collect();

    Ok(DatasetSummary {
        path: store.path().to_path_buf(),
        record_count: records.len() as u64,
        class_average: mean_of(&finals),
        sha256: digest_hex(bytes),
    })
}

/// True if the store's current bytes still match `summary.sha256`.
pub fn verify_summary(store: &RecordStore, summary: &DatasetSummary) -> Result<bool, PersistenceError> {
    let bytes = store.read_bytes()?;
    Ok(digest_hex(&bytes) == summary.sha256)
}
