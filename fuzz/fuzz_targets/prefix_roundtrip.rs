#![no_main]
use inventory_codec::huffman::{CodeTree, PrefixDecoder, PrefixEncoder};
use inventory_codec::interval::{IntervalEncoder, CODE_BITS};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: Vec<u8>| {
    if data.is_empty() {
        return;
    }

    let tree = CodeTree::from_bytes(&data).unwrap();
    let bits = PrefixEncoder::new(tree.code_table()).encode(&data);
    assert!(bits.len() <= data.len() * 8);

    let decoded = PrefixDecoder::new(tree).decode(&bits, data.len()).unwrap();
    assert_eq!(data, decoded);

    let code = IntervalEncoder::encode(&data).unwrap();
    assert_eq!(code.to_bit_string().len(), CODE_BITS);
});
