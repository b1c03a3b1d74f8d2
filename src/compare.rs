//! Size comparison between the raw field and its two encodings.
//!
//! [`analyze`] runs both codecs over one field. [`classify`] picks the
//! winner from the three bit-lengths, and [`ComparisonCounters`] tallies
//! outcomes across records. Counters are plain values owned by the caller;
//! per-record results can be folded in any order with
//! [`ComparisonCounters::merge`].

use std::fmt;

use crate::error::Result;
use crate::huffman::{CodeTable, CodeTree, PrefixEncoder};
use crate::interval::{IntervalCode, IntervalEncoder};

/// Bits per byte in the uncompressed baseline.
pub const BASELINE_BITS_PER_BYTE: usize = 8;

/// Which representation of a field came out smallest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// All three lengths are equal.
    Equal,
    /// The raw field is strictly smaller than both encodings.
    Decompress,
    /// The Huffman encoding is strictly smallest.
    Huffman,
    /// The interval encoding is strictly smallest.
    Arithmetic,
    /// Both encodings tie and differ from the baseline.
    Either,
}

impl Outcome {
    /// Label used in the textual report.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Equal => "Equal",
            Outcome::Decompress => "Decompress",
            Outcome::Huffman => "Huffman",
            Outcome::Arithmetic => "Arithmetic",
            Outcome::Either => "Either",
        }
    }
}

/// Classify three bit-lengths. First matching rule wins.
///
/// Returns `None` when no rule matches, e.g. the baseline ties one encoding
/// while the other is larger (`(16, 16, 64)`). Such records are left out of
/// every counter.
pub fn classify(baseline: usize, prefix: usize, interval: usize) -> Option<Outcome> {
    if baseline == prefix && baseline == interval {
        Some(Outcome::Equal)
    } else if baseline < prefix && baseline < interval {
        Some(Outcome::Decompress)
    } else if prefix < baseline && prefix < interval {
        Some(Outcome::Huffman)
    } else if interval < baseline && interval < prefix {
        Some(Outcome::Arithmetic)
    } else if prefix == interval && prefix != baseline {
        Some(Outcome::Either)
    } else {
        None
    }
}

/// Running tally of outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComparisonCounters {
    /// [`Outcome::Equal`] count.
    pub equal: u64,
    /// [`Outcome::Decompress`] count.
    pub decompress: u64,
    /// [`Outcome::Huffman`] count.
    pub huffman: u64,
    /// [`Outcome::Arithmetic`] count.
    pub arithmetic: u64,
    /// [`Outcome::Either`] count.
    pub either: u64,
}

impl ComparisonCounters {
    /// Fresh zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bump the counter for `outcome`. `None` leaves everything unchanged.
    pub fn record(&mut self, outcome: Option<Outcome>) {
        match outcome {
            Some(Outcome::Equal) => self.equal += 1,
            Some(Outcome::Decompress) => self.decompress += 1,
            Some(Outcome::Huffman) => self.huffman += 1,
            Some(Outcome::Arithmetic) => self.arithmetic += 1,
            Some(Outcome::Either) => self.either += 1,
            None => {}
        }
    }

    /// Add another tally into this one.
    pub fn merge(&mut self, other: &ComparisonCounters) {
        self.equal += other.equal;
        self.decompress += other.decompress;
        self.huffman += other.huffman;
        self.arithmetic += other.arithmetic;
        self.either += other.either;
    }

    /// Sum of all five counters.
    pub fn total(&self) -> u64 {
        self.equal + self.decompress + self.huffman + self.arithmetic + self.either
    }

    /// `(label, count)` pairs in report order.
    pub fn entries(&self) -> [(&'static str, u64); 5] {
        [
            (Outcome::Equal.label(), self.equal),
            (Outcome::Decompress.label(), self.decompress),
            (Outcome::Huffman.label(), self.huffman),
            (Outcome::Arithmetic.label(), self.arithmetic),
            (Outcome::Either.label(), self.either),
        ]
    }
}

impl fmt::Display for ComparisonCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, count) in self.entries() {
            writeln!(f, "{label}: {count}")?;
        }
        Ok(())
    }
}

/// Both encodings of one field and their sizes.
#[derive(Debug, Clone)]
pub struct NameEncoding {
    /// `8 * byte length` of the field.
    pub baseline_bits: usize,
    /// Length of the Huffman bit-string.
    pub prefix_bits: usize,
    /// Length of the interval code (always 64).
    pub interval_bits: usize,
    /// The Huffman code built for this field.
    pub prefix_codes: CodeTable,
    /// The interval code.
    pub interval_code: IntervalCode,
}

impl NameEncoding {
    /// Classify this field's three lengths.
    pub fn outcome(&self) -> Option<Outcome> {
        classify(self.baseline_bits, self.prefix_bits, self.interval_bits)
    }
}

/// Encode `name` both ways and measure the results.
///
/// # Errors
/// Returns `Error::EmptyInput` if `name` is empty.
pub fn analyze(name: &str) -> Result<NameEncoding> {
    let data = name.as_bytes();
    let tree = CodeTree::from_bytes(data)?;
    let encoder = PrefixEncoder::new(tree.code_table());
    let prefix_bits = encoder.encode(data).len();
    let interval_code = IntervalEncoder::encode(data)?;

    Ok(NameEncoding {
        baseline_bits: data.len() * BASELINE_BITS_PER_BYTE,
        prefix_bits,
        interval_bits: interval_code.len(),
        prefix_codes: encoder.table().clone(),
        interval_code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use test_case::test_case;

    #[test_case(16, 16, 16 => Some(Outcome::Equal); "all equal")]
    #[test_case(16, 24, 64 => Some(Outcome::Decompress); "baseline smallest")]
    #[test_case(32, 8, 64 => Some(Outcome::Huffman); "prefix smallest")]
    #[test_case(512, 300, 64 => Some(Outcome::Arithmetic); "interval smallest")]
    #[test_case(512, 64, 64 => Some(Outcome::Either); "codecs tie below baseline")]
    #[test_case(32, 64, 64 => Some(Outcome::Decompress); "codecs tie above baseline")]
    #[test_case(16, 16, 64 => None; "baseline ties prefix")]
    #[test_case(64, 80, 64 => None; "baseline ties interval")]
    fn test_classify(baseline: usize, prefix: usize, interval: usize) -> Option<Outcome> {
        classify(baseline, prefix, interval)
    }

    #[test]
    fn test_counters_record_and_display() {
        let mut counters = ComparisonCounters::new();
        counters.record(Some(Outcome::Decompress));
        counters.record(Some(Outcome::Decompress));
        counters.record(Some(Outcome::Huffman));
        counters.record(None);
        assert_eq!(counters.decompress, 2);
        assert_eq!(counters.huffman, 1);
        assert_eq!(counters.total(), 3);
        assert_eq!(
            counters.to_string(),
            "Equal: 0\nDecompress: 2\nHuffman: 1\nArithmetic: 0\nEither: 0\n"
        );
    }

    #[test]
    fn test_counters_merge() {
        let mut a = ComparisonCounters::new();
        a.record(Some(Outcome::Equal));
        let mut b = ComparisonCounters::new();
        b.record(Some(Outcome::Either));
        b.record(Some(Outcome::Arithmetic));
        a.merge(&b);
        assert_eq!(
            a,
            ComparisonCounters {
                equal: 1,
                decompress: 0,
                huffman: 0,
                arithmetic: 1,
                either: 1,
            }
        );
    }

    #[test]
    fn test_analyze_repeated_symbol() {
        let enc = analyze("aaa").unwrap();
        assert_eq!(enc.baseline_bits, 24);
        assert_eq!(enc.prefix_bits, 0);
        assert_eq!(enc.interval_bits, 64);
        assert_eq!(enc.prefix_codes.get(b'a'), Some(&[][..]));
        assert_eq!(enc.outcome(), Some(Outcome::Huffman));
    }

    #[test]
    fn test_analyze_two_symbols() {
        let enc = analyze("ab").unwrap();
        assert_eq!(enc.baseline_bits, 16);
        assert_eq!(enc.prefix_bits, 2);
        assert_eq!(enc.outcome(), Some(Outcome::Huffman));
    }

    #[test]
    fn test_analyze_four_symbols() {
        let enc = analyze("abcd").unwrap();
        assert_eq!(enc.baseline_bits, 32);
        assert_eq!(enc.prefix_bits, 8);
        assert_eq!(enc.interval_bits, 64);
        assert_eq!(enc.outcome(), Some(Outcome::Huffman));
    }

    #[test]
    fn test_analyze_reaches_either() {
        let name = "ab".repeat(32);
        let enc = analyze(&name).unwrap();
        assert_eq!(enc.baseline_bits, 512);
        assert_eq!(enc.prefix_bits, 64);
        assert_eq!(enc.outcome(), Some(Outcome::Either));
    }

    #[test]
    fn test_analyze_empty() {
        assert!(matches!(analyze(""), Err(Error::EmptyInput)));
    }
}
