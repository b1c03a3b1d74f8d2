//! Writers for the materialized record file and the final report.

use std::io::Write;

use serde_json::Value;

use crate::changelog::Fields;
use crate::compare::{self, ComparisonCounters};
use crate::error::{Error, Result};

/// Record fields copied to the output, in output order.
pub const PROJECTED_FIELDS: [&str; 6] = ["isbn", "name", "author", "category", "price", "quantity"];

/// Header preceding the counters in the final report.
pub const COUNTERS_HEADER: &str = "Compression results:";

/// Outcome of writing the materialized records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputSummary {
    /// Records written.
    pub written: usize,
    /// Records skipped because `name` was not a string.
    pub skipped: usize,
    /// Records written without a codec comparison (empty name).
    pub uncompared: usize,
    /// Per-outcome tallies.
    pub counters: ComparisonCounters,
}

/// Project one record and attach its name sizes.
///
/// Returns the output object and whether the codecs were compared.
/// `counters` is bumped for compared names.
///
/// # Errors
/// `MalformedRecord` if `name` is missing or not a string.
pub fn materialize(fields: &Fields, counters: &mut ComparisonCounters) -> Result<(Fields, bool)> {
    let Some(Value::String(name)) = fields.get("name") else {
        return Err(Error::MalformedRecord(
            "record needs a string field `name`".to_string(),
        ));
    };

    let mut out = Fields::new();
    for key in PROJECTED_FIELDS {
        out.insert(key.to_string(), fields.get(key).cloned().unwrap_or(Value::Null));
    }

    match compare::analyze(name) {
        Ok(encoding) => {
            let outcome = encoding.outcome();
            tracing::debug!(
                %name,
                baseline = encoding.baseline_bits,
                huffman = encoding.prefix_bits,
                arithmetic = encoding.interval_bits,
                outcome = outcome.map(|o| o.label()).unwrap_or("none"),
                "compared name encodings"
            );
            counters.record(outcome);
            out.insert("namesize".to_string(), encoding.baseline_bits.into());
            out.insert("namesizehuffman".to_string(), encoding.prefix_bits.into());
            out.insert("namesizearithmetic".to_string(), encoding.interval_bits.into());
            Ok((out, true))
        }
        Err(Error::EmptyInput) => {
            out.insert("namesize".to_string(), 0.into());
            Ok((out, false))
        }
        Err(error) => Err(error),
    }
}

/// Write every record as one JSON line and tally the comparisons.
///
/// Records without a string `name` are logged and left out.
///
/// # Errors
/// I/O and serialization errors from `writer`.
pub fn write_output<'a, I, W>(records: I, mut writer: W) -> Result<OutputSummary>
where
    I: IntoIterator<Item = &'a Fields>,
    W: Write,
{
    let mut summary = OutputSummary::default();
    for fields in records {
        match materialize(fields, &mut summary.counters) {
            Ok((out, compared)) => {
                serde_json::to_writer(&mut writer, &out)?;
                writeln!(writer)?;
                summary.written += 1;
                if !compared {
                    summary.uncompared += 1;
                }
            }
            Err(Error::MalformedRecord(reason)) => {
                let isbn = fields.get("isbn").cloned().unwrap_or(Value::Null);
                tracing::warn!(%isbn, reason = %reason, "skipping record");
                summary.skipped += 1;
            }
            Err(error) => return Err(error),
        }
    }
    writer.flush()?;
    Ok(summary)
}

/// Write the search hits followed by the counters.
///
/// # Errors
/// I/O and serialization errors from `writer`.
pub fn write_final<W: Write>(
    hits: &[Fields],
    counters: &ComparisonCounters,
    mut writer: W,
) -> Result<()> {
    for hit in hits {
        serde_json::to_writer(&mut writer, hit)?;
        writeln!(writer)?;
    }
    writeln!(writer, "{COUNTERS_HEADER}")?;
    write!(writer, "{counters}")?;
    writer.flush()?;
    Ok(())
}
