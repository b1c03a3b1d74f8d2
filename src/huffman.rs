//! Huffman coding over the bytes of a single field.
//!
//! Builds an optimal prefix-free code from one string's byte frequencies and
//! applies it to that same string. The code is rebuilt for every string; no
//! table survives between calls.
//!
//! # Historical Context
//!
//! David Huffman (1952) developed this algorithm as a term paper at MIT.
//! It was the first practical algorithm for constructing optimal prefix codes.
//!
//! # Tree layout
//!
//! The tree lives in an arena (`Vec<Node>`) and children are referenced by
//! [`NodeId`]. Leaves are pushed first in symbol order, internal nodes after
//! them, so the root is always the last node in the arena.
//!
//! # Determinism
//!
//! The build heap orders nodes by `(frequency, smallest symbol in subtree)`.
//! Two disjoint subtrees never share a smallest symbol, so the order is
//! total and the same input always yields the same codes. The node popped
//! first becomes the left child and takes bit `0`.
//!
//! # Single distinct symbol
//!
//! With one distinct symbol there is nothing to combine and the lone leaf is
//! the root. Its code is the empty bit-string, so the encoded output is empty.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::{Error, Result};

/// Number of distinct symbols a byte can take.
pub const ALPHABET_SIZE: usize = 256;

/// Occurrence counts for each byte of one input string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u32; ALPHABET_SIZE],
}

impl FrequencyTable {
    /// Count the bytes of `data`.
    ///
    /// # Errors
    /// Returns `Error::EmptyInput` if `data` is empty.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut counts = [0u32; ALPHABET_SIZE];
        for &b in data {
            counts[b as usize] += 1;
        }
        Self::from_counts(counts)
    }

    /// Wrap raw per-symbol counts.
    ///
    /// # Errors
    /// Returns `Error::EmptyInput` if every count is zero.
    pub fn from_counts(counts: [u32; ALPHABET_SIZE]) -> Result<Self> {
        if counts.iter().all(|&c| c == 0) {
            return Err(Error::EmptyInput);
        }
        Ok(Self { counts })
    }

    /// Count for `symbol` (zero if absent).
    pub fn count(&self, symbol: u8) -> u32 {
        self.counts[symbol as usize]
    }

    /// Symbols with a positive count, in ascending symbol order.
    pub fn symbols(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(s, &c)| (s as u8, c))
    }

    /// Number of distinct symbols present.
    pub fn distinct(&self) -> usize {
        self.symbols().count()
    }
}

/// Index of a node inside a [`CodeTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Huffman tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    /// A symbol and its count.
    Leaf {
        /// The byte this leaf stands for.
        symbol: u8,
        /// Occurrences of `symbol`.
        freq: u64,
    },
    /// Two children and their summed count.
    Internal {
        /// Sum of both children's frequencies.
        freq: u64,
        /// Child reached with bit 0.
        left: NodeId,
        /// Child reached with bit 1.
        right: NodeId,
    },
}

impl Node {
    /// Aggregate frequency of the subtree rooted here.
    pub fn freq(&self) -> u64 {
        match self {
            Node::Leaf { freq, .. } => *freq,
            Node::Internal { freq, .. } => *freq,
        }
    }
}

/// Heap key: lowest frequency first, then lowest symbol in the subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Pending {
    freq: u64,
    min_symbol: u8,
    id: NodeId,
}

/// Arena-backed Huffman tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl CodeTree {
    /// Build the tree by repeatedly combining the two lowest-weight nodes.
    pub fn build(freqs: &FrequencyTable) -> Self {
        let mut nodes = Vec::with_capacity(2 * freqs.distinct());
        let mut pq = BinaryHeap::new();

        for (symbol, count) in freqs.symbols() {
            let id = NodeId(nodes.len());
            let freq = u64::from(count);
            nodes.push(Node::Leaf { symbol, freq });
            pq.push(Reverse(Pending {
                freq,
                min_symbol: symbol,
                id,
            }));
        }

        while pq.len() > 1 {
            let (Some(Reverse(left)), Some(Reverse(right))) = (pq.pop(), pq.pop()) else {
                unreachable!("heap holds at least two nodes");
            };
            let id = NodeId(nodes.len());
            let freq = left.freq + right.freq;
            nodes.push(Node::Internal {
                freq,
                left: left.id,
                right: right.id,
            });
            pq.push(Reverse(Pending {
                freq,
                min_symbol: left.min_symbol.min(right.min_symbol),
                id,
            }));
        }

        // A non-empty table leaves exactly one node: the last one pushed.
        let root = NodeId(nodes.len() - 1);
        Self { nodes, root }
    }

    /// Count `data` and build its tree.
    ///
    /// # Errors
    /// Returns `Error::EmptyInput` if `data` is empty.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(Self::build(&FrequencyTable::from_bytes(data)?))
    }

    /// The root node handle.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Number of nodes in the arena (`2n - 1` for `n` distinct symbols).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree is only built from a non-empty table.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walk the tree and assign each leaf its path: left appends 0, right 1.
    pub fn code_table(&self) -> CodeTable {
        let mut codes = vec![None; ALPHABET_SIZE];
        self.build_codes(self.root, Vec::new(), &mut codes);
        CodeTable { codes }
    }

    fn build_codes(&self, id: NodeId, prefix: Vec<u8>, codes: &mut [Option<Vec<u8>>]) {
        match *self.node(id) {
            Node::Leaf { symbol, .. } => {
                codes[symbol as usize] = Some(prefix);
            }
            Node::Internal { left, right, .. } => {
                let mut left_prefix = prefix.clone();
                left_prefix.push(0);
                self.build_codes(left, left_prefix, codes);

                let mut right_prefix = prefix;
                right_prefix.push(1);
                self.build_codes(right, right_prefix, codes);
            }
        }
    }
}

/// Symbol to bit-string mapping. Only symbols that occurred have a code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Vec<u8>>>, // symbol -> bit sequence
}

impl CodeTable {
    /// Code for `symbol`, if it occurred in the source string.
    pub fn get(&self, symbol: u8) -> Option<&[u8]> {
        self.codes[symbol as usize].as_deref()
    }

    /// `(symbol, code)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &[u8])> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(s, code)| code.as_deref().map(|c| (s as u8, c)))
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }

    /// True when no symbol has a code.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Codes rendered as `'0'`/`'1'` strings, for inspection.
    pub fn to_strings(&self) -> Vec<(u8, String)> {
        self.iter().map(|(s, c)| (s, render_bits(c))).collect()
    }
}

/// Render a bit sequence as a string of `'0'` and `'1'`.
pub fn render_bits(bits: &[u8]) -> String {
    bits.iter().map(|&b| if b == 0 { '0' } else { '1' }).collect()
}

/// Huffman encoder.
#[derive(Debug, Clone)]
pub struct PrefixEncoder {
    table: CodeTable,
}

impl PrefixEncoder {
    /// Wrap an existing code table.
    pub fn new(table: CodeTable) -> Self {
        Self { table }
    }

    /// Build the code for `data` itself.
    ///
    /// # Errors
    /// Returns `Error::EmptyInput` if `data` is empty.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(Self::new(CodeTree::from_bytes(data)?.code_table()))
    }

    /// The underlying code table.
    pub fn table(&self) -> &CodeTable {
        &self.table
    }

    /// Encode a symbol sequence into a bit stream.
    ///
    /// # Panics
    /// Panics if `data` holds a symbol the table has no code for. Tables are
    /// built from the string being encoded, so this is a caller bug.
    pub fn encode(&self, data: &[u8]) -> Vec<u8> {
        let mut bits = Vec::new();
        for &s in data {
            match self.table.get(s) {
                Some(code) => bits.extend_from_slice(code),
                None => panic!("symbol {s:#04x} has no code in this table"),
            }
        }
        bits
    }
}

/// Huffman decoder.
#[derive(Debug, Clone)]
pub struct PrefixDecoder {
    tree: CodeTree,
}

impl PrefixDecoder {
    /// Create a decoder over a built tree.
    pub fn new(tree: CodeTree) -> Self {
        Self { tree }
    }

    /// Decode exactly `count` symbols from `bits`.
    ///
    /// A lone-leaf tree spends no bits per symbol, so `count` is what tells
    /// the decoder how many symbols the empty stream holds.
    ///
    /// # Errors
    /// `TruncatedCode` if the stream ends early, `TrailingBits` if bits are
    /// left over, `InvalidBit` if a unit is neither 0 nor 1.
    pub fn decode(&self, bits: &[u8], count: usize) -> Result<Vec<u8>> {
        let root = self.tree.root();
        let mut out = Vec::with_capacity(count);
        let mut stream = bits.iter();

        while out.len() < count {
            let mut curr = root;
            loop {
                match *self.tree.node(curr) {
                    Node::Leaf { symbol, .. } => {
                        out.push(symbol);
                        break;
                    }
                    Node::Internal { left, right, .. } => {
                        curr = match stream.next() {
                            Some(0) => left,
                            Some(1) => right,
                            Some(&b) => return Err(Error::InvalidBit(b)),
                            None => {
                                return Err(Error::TruncatedCode {
                                    decoded: out.len(),
                                    expected: count,
                                })
                            }
                        };
                    }
                }
            }
        }

        match stream.len() {
            0 => Ok(out),
            n => Err(Error::TrailingBits(n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(text: &str) -> CodeTable {
        CodeTree::from_bytes(text.as_bytes()).unwrap().code_table()
    }

    #[test]
    fn test_huffman_roundtrip() {
        let data = b"abracadabra";
        let tree = CodeTree::from_bytes(data).unwrap();

        let encoder = PrefixEncoder::new(tree.code_table());
        let bits = encoder.encode(data);

        let decoder = PrefixDecoder::new(tree);
        let decoded = decoder.decode(&bits, data.len()).unwrap();

        assert_eq!(data.to_vec(), decoded);
    }

    #[test]
    fn test_single_symbol_gets_empty_code() {
        let tree = CodeTree::from_bytes(b"aaa").unwrap();
        assert_eq!(tree.len(), 1);
        assert!(matches!(
            tree.node(tree.root()),
            Node::Leaf { symbol: b'a', freq: 3 }
        ));

        let table = tree.code_table();
        assert_eq!(table.get(b'a'), Some(&[][..]));
        assert_eq!(table.len(), 1);

        let bits = PrefixEncoder::new(table).encode(b"aaa");
        assert!(bits.is_empty());

        let decoded = PrefixDecoder::new(tree).decode(&bits, 3).unwrap();
        assert_eq!(decoded, b"aaa");
    }

    #[test]
    fn test_two_symbols_split_at_root() {
        let table = codes("ab");
        assert_eq!(table.get(b'a'), Some(&[0][..]));
        assert_eq!(table.get(b'b'), Some(&[1][..]));
        assert_eq!(table.get(b'c'), None);
    }

    #[test]
    fn test_uniform_four_symbols() {
        let table = codes("abcd");
        let rendered = table.to_strings();
        assert_eq!(
            rendered,
            vec![
                (b'a', "00".to_string()),
                (b'b', "01".to_string()),
                (b'c', "10".to_string()),
                (b'd', "11".to_string()),
            ]
        );
        let encoder = PrefixEncoder::new(table);
        assert_eq!(encoder.encode(b"abcd").len(), 8);
    }

    #[test]
    fn test_skewed_frequencies_give_shorter_codes() {
        let table = codes("aaaaaaabbbc");
        let a = table.get(b'a').unwrap().len();
        let b = table.get(b'b').unwrap().len();
        let c = table.get(b'c').unwrap().len();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
        assert_eq!(c, 2);
    }

    #[test]
    fn test_build_is_deterministic() {
        let text = b"the quick brown fox jumps over the lazy dog";
        let first = CodeTree::from_bytes(text).unwrap();
        let second = CodeTree::from_bytes(text).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.code_table(), second.code_table());
    }

    #[test]
    fn test_arena_size_and_root_weight() {
        let text = b"mississippi";
        let tree = CodeTree::from_bytes(text).unwrap();
        assert_eq!(tree.len(), 2 * 4 - 1);
        assert_eq!(tree.node(tree.root()).freq(), text.len() as u64);
        assert_eq!(tree.root().index(), tree.len() - 1);
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(CodeTree::from_bytes(b""), Err(Error::EmptyInput)));
        assert!(matches!(
            FrequencyTable::from_counts([0; ALPHABET_SIZE]),
            Err(Error::EmptyInput)
        ));
        assert!(matches!(PrefixEncoder::from_bytes(b""), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_decode_errors() {
        let tree = CodeTree::from_bytes(b"abcd").unwrap();
        let decoder = PrefixDecoder::new(tree);

        assert!(matches!(
            decoder.decode(&[0, 0, 1], 2),
            Err(Error::TruncatedCode {
                decoded: 1,
                expected: 2
            })
        ));
        assert!(matches!(
            decoder.decode(&[0, 0, 1, 1, 0], 2),
            Err(Error::TrailingBits(1))
        ));
        assert!(matches!(decoder.decode(&[2], 1), Err(Error::InvalidBit(2))));
    }

    #[test]
    #[should_panic(expected = "has no code")]
    fn test_encode_unknown_symbol_panics() {
        let encoder = PrefixEncoder::from_bytes(b"ab").unwrap();
        encoder.encode(b"abc");
    }

    #[test]
    fn test_render_bits() {
        assert_eq!(render_bits(&[1, 0, 1, 1]), "1011");
        assert_eq!(render_bits(&[]), "");
    }
}
