//! # Inventory name codecs
//!
//! *Huffman versus interval subdivision on short text fields.*
//!
//! ## Intuition First
//!
//! A book title stored as plain bytes costs eight bits per character. If some
//! characters repeat, a variable-length code can spend fewer bits on the
//! common ones. If we instead treat the whole title as one point on the
//! number line, a single fixed-width word can stand in for the title, at
//! least while floating point has the digits to tell titles apart.
//!
//! This crate runs both ideas over the `name` field of every live record in
//! an inventory changelog and counts which representation came out smallest.
//!
//! ## The Two Codecs
//!
//! - **Huffman** ([`huffman`]): a prefix-free code built from the field's own
//!   byte frequencies. Optimal among symbol-by-symbol codes, and rebuilt for
//!   every string.
//! - **Interval subdivision** ([`interval`]): each byte narrows `[0, 1)` to
//!   its 1/256 slice under a uniform model. The final midpoint is emitted as
//!   a 64-bit word, so the output length never depends on the input.
//!
//! ## Failure Modes
//!
//! 1. **Precision loss**: the interval shrinks 256-fold per byte, and `f64`
//!    holds 53 significant bits. Beyond a handful of bytes, different names
//!    produce the same word. The code is still emitted; it just no longer
//!    identifies the name.
//! 2. **Degenerate alphabets**: a name made of one repeated byte gets the
//!    empty Huffman code and encodes to zero bits.
//!
//! ## Pipeline
//!
//! ```text
//! changelog ──► Inventory ──► output file ──► SearchIndex ──► final report
//!   (INSERT/PATCH/DELETE)    (+ name sizes)    (SEARCH by name)  (+ counters)
//! ```
//!
//! [`pipeline::run`] drives the stages from [`config::Settings`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod changelog;
pub mod compare;
pub mod config;
pub mod error;
pub mod huffman;
pub mod interval;
pub mod inventory;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod search;

pub use compare::{analyze, classify, ComparisonCounters, NameEncoding, Outcome};
pub use error::Error;
pub use huffman::{CodeTable, CodeTree, FrequencyTable, PrefixDecoder, PrefixEncoder};
pub use interval::{Interval, IntervalCode, IntervalEncoder};
pub use inventory::Inventory;
pub use search::SearchIndex;
