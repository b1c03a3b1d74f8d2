//! Interval-subdivision (arithmetic-style) encoding.
//!
//! Every byte narrows a running `[low, high)` interval to its 1/256 slice
//! under a fixed uniform model. Only the midpoint of the final interval is
//! emitted, scaled to a 64-bit word.
//!
//! # Precision
//!
//! The interval width shrinks by a factor of 256 per byte, and `f64` keeps
//! 53 significant bits. Past roughly six to eight bytes distinct inputs
//! collapse onto the same midpoint. The encoder still terminates and still
//! emits 64 digits, but the output stops identifying the input. There is no
//! renormalization and no decoder.
//!
//! # Output word
//!
//! `midpoint * 2^64` is truncated into an `i64`. The cast saturates, so any
//! midpoint at or above 0.5 (a first byte of 0x80 or more) maps to
//! `i64::MAX`.

use std::fmt;

use crate::error::{Error, Result};

/// Width of the emitted code, in bits.
pub const CODE_BITS: usize = 64;

/// Number of equal slices the uniform model splits each interval into.
const MODEL_SLICES: f64 = 256.0;

/// `2^64`, exactly representable as an `f64`.
const WORD_SCALE: f64 = 18_446_744_073_709_551_616.0;

/// A sub-range of `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Inclusive lower bound.
    pub low: f64,
    /// Exclusive upper bound.
    pub high: f64,
}

impl Interval {
    /// The starting interval `[0, 1)`.
    pub const UNIT: Interval = Interval {
        low: 0.0,
        high: 1.0,
    };

    /// `high - low`.
    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    /// Midpoint of the interval.
    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    /// Whether `inner` lies within `self`.
    pub fn contains(&self, inner: &Interval) -> bool {
        inner.low >= self.low && inner.high <= self.high
    }

    /// Narrow to the slice for `symbol`.
    ///
    /// Both bounds come from the same pre-update `low` and width. The new
    /// bounds are clamped to the old ones so rounding can never widen the
    /// interval.
    pub fn narrow(self, symbol: u8) -> Interval {
        let range = self.width();
        let value = f64::from(symbol);
        let high = self.low + range * ((value + 1.0) / MODEL_SLICES);
        let low = self.low + range * (value / MODEL_SLICES);
        Interval {
            low: low.max(self.low),
            high: high.min(self.high),
        }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Fixed-width output of the interval encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntervalCode(i64);

impl IntervalCode {
    /// The raw 64-bit word.
    pub fn word(&self) -> i64 {
        self.0
    }

    /// Length of the code in bits; always [`CODE_BITS`].
    pub fn len(&self) -> usize {
        CODE_BITS
    }

    /// Never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The word as exactly 64 `'0'`/`'1'` characters, most significant first.
    pub fn to_bit_string(&self) -> String {
        format!("{:064b}", self.0)
    }
}

impl fmt::Display for IntervalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:064b}", self.0)
    }
}

/// Interval-subdivision encoder.
#[derive(Debug, Clone)]
pub struct IntervalEncoder {
    interval: Interval,
    consumed: usize,
}

impl IntervalEncoder {
    /// Create an encoder positioned at `[0, 1)`.
    pub fn new() -> Self {
        Self {
            interval: Interval::UNIT,
            consumed: 0,
        }
    }

    /// Narrow the running interval by one byte.
    pub fn push(&mut self, symbol: u8) {
        self.interval = self.interval.narrow(symbol);
        self.consumed += 1;
    }

    /// The current interval.
    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// Bytes consumed so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Emit the final midpoint as a 64-bit code.
    ///
    /// # Errors
    /// Returns `Error::EmptyInput` if no byte was pushed.
    pub fn finish(self) -> Result<IntervalCode> {
        if self.consumed == 0 {
            return Err(Error::EmptyInput);
        }
        let scaled = self.interval.midpoint() * WORD_SCALE;
        Ok(IntervalCode(scaled as i64))
    }

    /// Encode a whole byte string.
    ///
    /// # Errors
    /// Returns `Error::EmptyInput` if `data` is empty.
    pub fn encode(data: &[u8]) -> Result<IntervalCode> {
        let mut encoder = Self::new();
        for &b in data {
            encoder.push(b);
        }
        encoder.finish()
    }

    /// Every interval the encoder passes through, starting with `[0, 1)`.
    ///
    /// # Errors
    /// Returns `Error::EmptyInput` if `data` is empty.
    pub fn trace(data: &[u8]) -> Result<Vec<Interval>> {
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }
        let mut encoder = Self::new();
        let mut steps = Vec::with_capacity(data.len() + 1);
        steps.push(encoder.interval());
        for &b in data {
            encoder.push(b);
            steps.push(encoder.interval());
        }
        Ok(steps)
    }
}

impl Default for IntervalEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(text: &str) -> String {
        IntervalEncoder::encode(text.as_bytes())
            .unwrap()
            .to_bit_string()
    }

    #[test]
    fn test_single_byte() {
        assert_eq!(
            bits("a"),
            "0110000110000000000000000000000000000000000000000000000000000000"
        );
        assert_eq!(
            bits("Z"),
            "0101101010000000000000000000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_short_strings_are_exact() {
        assert_eq!(
            bits("ab"),
            "0110000101100010100000000000000000000000000000000000000000000000"
        );
        assert_eq!(
            bits("abc"),
            "0110000101100010011000111000000000000000000000000000000000000000"
        );
        assert_eq!(
            bits("abcd"),
            "0110000101100010011000110110010010000000000000000000000000000000"
        );
        assert_eq!(
            bits("aaa"),
            "0110000101100001011000011000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_high_first_byte_saturates() {
        let code = IntervalEncoder::encode(&[0x80]).unwrap();
        assert_eq!(code.word(), i64::MAX);
        assert_eq!(code.to_bit_string(), format!("0{}", "1".repeat(63)));
    }

    #[test]
    fn test_long_input_still_emits_full_word() {
        let text = "The Hitchhiker's Guide to the Galaxy, 42nd anniversary edition";
        let code = IntervalEncoder::encode(text.as_bytes()).unwrap();
        let s = code.to_string();
        assert_eq!(s.len(), CODE_BITS);
        assert!(s.chars().all(|c| c == '0' || c == '1'));
        assert_eq!(code.len(), CODE_BITS);
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(IntervalEncoder::encode(b""), Err(Error::EmptyInput)));
        assert!(matches!(IntervalEncoder::trace(b""), Err(Error::EmptyInput)));
        assert!(matches!(
            IntervalEncoder::new().finish(),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn test_narrow_first_slice() {
        let i = Interval::UNIT.narrow(97);
        assert_eq!(i.low, 97.0 / 256.0);
        assert_eq!(i.high, 98.0 / 256.0);
        assert_eq!(i.width(), 1.0 / 256.0);
        assert!(Interval::UNIT.contains(&i));
    }

    #[test]
    fn test_trace_is_nested() {
        let steps = IntervalEncoder::trace(b"hello, world").unwrap();
        assert_eq!(steps.len(), 13);
        assert_eq!(steps[0], Interval::UNIT);
        for pair in steps.windows(2) {
            assert!(pair[0].contains(&pair[1]), "{:?} escapes {:?}", pair[1], pair[0]);
        }
    }

    #[test]
    fn test_push_matches_encode() {
        let mut encoder = IntervalEncoder::default();
        for &b in b"abc" {
            encoder.push(b);
        }
        assert_eq!(encoder.consumed(), 3);
        assert_eq!(
            encoder.finish().unwrap(),
            IntervalEncoder::encode(b"abc").unwrap()
        );
    }
}
