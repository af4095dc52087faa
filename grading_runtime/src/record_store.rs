//! Append-only record store — CSV file of grading rows.
//!
//! Storage format: UTF-8 CSV, `\r\n` terminated.
//!   Name,Score 1,Score 2,Score 3,Score 4,Final
//!   Jane Doe,80,95,,,87.5
//!
//! Rules:
//!   - Header written exactly once, only when the file does not exist or is empty
//!   - Rows are only appended after a complete header
//!   - Strict append only: existing rows are never rewritten
//!   - fsync after every write
//!   - No file handle is held between calls

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use grading_kernel::arithmetic;
use grading_kernel::domain::{FinalScore, Record, HEADER};

use crate::csv_codec::{self, CodecError};

/// Storage failure on ensure, append or load.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed CSV in {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    /// `row` counts data rows from 1, header excluded.
    #[error("malformed record {row} in {}: {source}", .path.display())]
    Codec {
        path: PathBuf,
        row: usize,
        #[source]
        source: CodecError,
    },

    #[error("unexpected header in {}: {found:?}", .path.display())]
    BadHeader { path: PathBuf, found: Vec<String> },
}

/// Append-only grading dataset backed by a CSV file.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Store at an explicit path. Nothing is touched until the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Create the file with its header if it does not exist yet.
    ///
    /// Idempotent. An existing file is never truncated or rewritten. An
    /// existing file must start with the header; a zero-length file gets
    /// the header written into it.
    pub fn ensure_initialized(&self) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
            }
        }

        let file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return self.check_header(),
            Err(e) => return Err(self.io_err(e)),
        };

        if let Err(e) = self.write_header(&file) {
            drop(file);
            // No header means no store: the next call starts from scratch.
            if let Err(cleanup) = fs::remove_file(&self.path) {
                warn!(
                    path = %self.path.display(),
                    error = %cleanup,
                    "could not remove store after failed header write"
                );
            }
            return Err(e);
        }

        debug!(path = %self.path.display(), "created record store with header");
        Ok(())
    }

    fn write_header(&self, file: &File) -> Result<(), PersistenceError> {
        let mut writer = BufWriter::new(file);
        writer
            .write_all(csv_codec::header_row().as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|e| self.io_err(e))?;
        drop(writer);
        file.sync_all().map_err(|e| self.io_err(e))
    }

    /// Existing file: accept the header (with `\r\n` or `\n`), fill in a
    /// zero-length file, reject anything else.
    fn check_header(&self) -> Result<(), PersistenceError> {
        let expected = csv_codec::header_row();
        let mut prefix = Vec::with_capacity(expected.len());
        File::open(&self.path)
            .and_then(|f| f.take(expected.len() as u64).read_to_end(&mut prefix))
            .map_err(|e| self.io_err(e))?;

        if prefix.is_empty() {
            let file = OpenOptions::new()
                .append(true)
                .open(&self.path)
                .map_err(|e| self.io_err(e))?;
            self.write_header(&file)?;
            debug!(path = %self.path.display(), "wrote header into empty record store");
            return Ok(());
        }

        let lf_header = format!("{}\n", HEADER.join(","));
        if prefix == expected.as_bytes() || prefix.starts_with(lf_header.as_bytes()) {
            return Ok(());
        }

        let text = String::from_utf8_lossy(&prefix);
        let first_line = text.lines().next().unwrap_or_default();
        Err(PersistenceError::BadHeader {
            path: self.path.clone(),
            found: first_line.split(',').map(str::to_string).collect(),
        })
    }

    /// Append one record as a single row at end of file.
    pub fn append(&self, record: &Record) -> Result<(), PersistenceError> {
        self.ensure_initialized()?;

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;

        let row = csv_codec::record_to_row(record);
        {
            let mut writer = BufWriter::new(&mut file);
            writer
                .write_all(row.as_bytes())
                .and_then(|_| writer.flush())
                .map_err(|e| self.io_err(e))?;
        }
        file.sync_all().map_err(|e| self.io_err(e))?;

        info!(
            path = %self.path.display(),
            name = %record.name,
            final_score = %record.final_score,
            "appended record"
        );
        Ok(())
    }

    /// Mean of the filled scores, two fraction digits. `0.0` when empty.
    pub fn average(scores: &[u8]) -> FinalScore {
        arithmetic::average(scores)
    }

    /// Load all records in file order. A missing file holds no records.
    pub fn load_records(&self) -> Result<Vec<Record>, PersistenceError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_err(e)),
        };
        self.parse_records(&text)
    }

    /// Decode store contents already read into memory.
    pub fn parse_records(&self, text: &str) -> Result<Vec<Record>, PersistenceError> {
        let rows = csv_codec::decode_rows(text).map_err(|source| PersistenceError::Malformed {
            path: self.path.clone(),
            source,
        })?;

        let mut rows = rows.into_iter().enumerate();
        match rows.next() {
            None => return Ok(Vec::new()),
            Some((_, header)) if header.iter().map(String::as_str).eq(HEADER) => {}
            Some((_, found)) => {
                return Err(PersistenceError::BadHeader {
                    path: self.path.clone(),
                    found,
                })
            }
        }

        let mut records = Vec::new();
        for (index, row) in rows {
            // Blank lines carry no record.
            if row.len() == 1 && row[0].is_empty() {
                continue;
            }
            let record = csv_codec::row_to_record(&row).map_err(|source| {
                PersistenceError::Codec {
                    path: self.path.clone(),
                    row: index,
                    source,
                }
            })?;
            records.push(record);
        }
        Ok(records)
    }

    /// Raw file bytes. Empty if the file does not exist.
    pub fn read_bytes(&self) -> Result<Vec<u8>, PersistenceError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(self.io_err(e)),
        }
    }
}
