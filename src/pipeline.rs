//! End-to-end run: changelog to output file to final report.
//!
//! Searches run against the output file as written to disk, not against the
//! in-memory inventory, so the report reflects exactly what was materialized.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::compare::ComparisonCounters;
use crate::config::Settings;
use crate::error::Result;
use crate::inventory::{IngestStats, Inventory};
use crate::report::{self, OutputSummary};
use crate::search::SearchIndex;

/// What a run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Changelog processing tallies.
    pub ingest: IngestStats,
    /// Output file tallies, including the comparison counters.
    pub output: OutputSummary,
    /// Search hits written to the report.
    pub hits: usize,
}

impl RunSummary {
    /// The accumulated comparison counters.
    pub fn counters(&self) -> &ComparisonCounters {
        &self.output.counters
    }
}

/// Run every stage using the paths in `settings`.
///
/// # Errors
/// Any I/O failure opening, reading or writing the configured files.
/// Malformed lines and records are logged and skipped instead.
#[tracing::instrument(skip_all)]
pub fn run(settings: &Settings) -> Result<RunSummary> {
    let files = &settings.files;

    let mut inventory = Inventory::new();
    let ingest = inventory.ingest(BufReader::new(open(&files.changelog)?))?;
    tracing::info!(
        applied = ingest.applied,
        skipped = ingest.skipped,
        failed = ingest.failed,
        live = inventory.live().count(),
        "changelog ingested"
    );

    let output = report::write_output(inventory.live(), BufWriter::new(create(&files.output)?))?;
    tracing::info!(
        path = %files.output.display(),
        written = output.written,
        skipped = output.skipped,
        uncompared = output.uncompared,
        "output written"
    );

    let index = SearchIndex::load(BufReader::new(open(&files.output)?))?;
    let hits = index.answer(BufReader::new(open(&files.searches)?))?;

    report::write_final(&hits, &output.counters, BufWriter::new(create(&files.report)?))?;
    tracing::info!(
        path = %files.report.display(),
        hits = hits.len(),
        equal = output.counters.equal,
        decompress = output.counters.decompress,
        huffman = output.counters.huffman,
        arithmetic = output.counters.arithmetic,
        either = output.counters.either,
        "report written"
    );

    Ok(RunSummary {
        ingest,
        output,
        hits: hits.len(),
    })
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|error| {
        tracing::error!(path = %path.display(), %error, "could not open input file");
        error.into()
    })
}

fn create(path: &Path) -> Result<File> {
    File::create(path).map_err(|error| {
        tracing::error!(path = %path.display(), %error, "could not create output file");
        error.into()
    })
}
