//! In-memory record store built from a changelog.
//!
//! Records keep their fields in insertion order. Deletes are soft: the
//! record stays in place with its flag set and is skipped by [`Inventory::live`].
//! PATCH and DELETE only ever touch the first live record with a matching
//! `isbn`.

use std::io::BufRead;

use serde_json::Value;

use crate::changelog::{self, ChangeEntry, ChangeOp, Fields};
use crate::error::{Error, Result};

/// A stored record and its soft-delete flag.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    /// Record fields.
    pub fields: Fields,
    /// Set once a DELETE matched this record.
    pub deleted: bool,
}

/// Tally of one ingest run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Entries applied (including PATCH/DELETE with no match).
    pub applied: usize,
    /// Lines without a separator, or with an unknown op.
    pub skipped: usize,
    /// Lines that failed to parse or apply.
    pub failed: usize,
}

/// Ordered collection of records.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    records: Vec<StoredRecord>,
}

impl Inventory {
    /// An empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one changelog entry.
    ///
    /// Returns whether the entry changed a record.
    ///
    /// # Errors
    /// `MalformedRecord` if a PATCH or DELETE has no string `isbn`.
    pub fn apply(&mut self, entry: ChangeEntry) -> Result<bool> {
        match entry.op {
            ChangeOp::Insert => {
                self.records.push(StoredRecord {
                    fields: entry.fields,
                    deleted: false,
                });
                Ok(true)
            }
            ChangeOp::Patch => {
                let isbn = isbn_of(&entry.fields)?.to_string();
                let Some(record) = self.find_live_mut(&isbn) else {
                    tracing::debug!(%isbn, "patch matched no live record");
                    return Ok(false);
                };
                for (key, value) in entry.fields {
                    record.fields.insert(key, value);
                }
                Ok(true)
            }
            ChangeOp::Delete => {
                let isbn = isbn_of(&entry.fields)?.to_string();
                let Some(record) = self.find_live_mut(&isbn) else {
                    tracing::debug!(%isbn, "delete matched no live record");
                    return Ok(false);
                };
                record.deleted = true;
                Ok(true)
            }
            ChangeOp::Other(_) => Ok(false),
        }
    }

    /// Read and apply every line of a changelog.
    ///
    /// Bad lines are logged and counted; they never stop the run.
    ///
    /// # Errors
    /// Only I/O errors from `reader` are returned.
    pub fn ingest<R: BufRead>(&mut self, reader: R) -> Result<IngestStats> {
        let mut stats = IngestStats::default();
        for (idx, raw) in changelog::raw_lines(reader).enumerate() {
            let lineno = idx + 1;
            let line = match changelog::decode_line(raw?) {
                Ok(line) => line,
                Err(error) => {
                    tracing::warn!(lineno, %error, "could not decode changelog line");
                    stats.failed += 1;
                    continue;
                }
            };
            match changelog::parse_line(&line) {
                Ok(Some(entry)) => {
                    if let ChangeOp::Other(op) = &entry.op {
                        tracing::debug!(lineno, op = %op, "ignoring unknown operation");
                        stats.skipped += 1;
                        continue;
                    }
                    match self.apply(entry) {
                        Ok(_) => stats.applied += 1,
                        Err(error) => {
                            tracing::warn!(lineno, %error, line = %line, "could not apply changelog entry");
                            stats.failed += 1;
                        }
                    }
                }
                Ok(None) => stats.skipped += 1,
                Err(error) => {
                    tracing::warn!(lineno, %error, line = %line, "could not parse changelog line");
                    stats.failed += 1;
                }
            }
        }
        Ok(stats)
    }

    /// Records that are not deleted, in insertion order.
    pub fn live(&self) -> impl Iterator<Item = &Fields> + '_ {
        self.records
            .iter()
            .filter(|r| !r.deleted)
            .map(|r| &r.fields)
    }

    /// Every record, deleted ones included.
    pub fn records(&self) -> &[StoredRecord] {
        &self.records
    }

    /// Total number of records, deleted ones included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing was ever inserted.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn find_live_mut(&mut self, isbn: &str) -> Option<&mut StoredRecord> {
        self.records
            .iter_mut()
            .find(|r| !r.deleted && r.fields.get("isbn").and_then(Value::as_str) == Some(isbn))
    }
}

fn isbn_of(fields: &Fields) -> Result<&str> {
    fields
        .get("isbn")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::MalformedRecord("missing string field `isbn`".to_string()))
}
