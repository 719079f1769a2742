//! Fuzz target: `LineDecoder::feed`
//!
//! Drives arbitrary byte sequences into the streaming line decoder and
//! asserts that every yielded line is non-empty, bounded and free of
//! terminators, and that splitting the input does not change the result.
//!
//! cargo fuzz run fuzz_line_decoder

#![no_main]

use clickerlink::link::codec::LineDecoder;
use clickerlink::protocol::MAX_MESSAGE_LEN;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut whole = Vec::new();
    LineDecoder::new().feed(data, |line| whole.push(line));

    for line in &whole {
        assert!(!line.is_empty(), "decoder must not yield empty lines");
        assert!(line.len() <= MAX_MESSAGE_LEN);
        assert!(!line.contains(&b'\n'));
        assert!(line.last() != Some(&b'\r'));
    }

    // Split at the first byte value as a cheap varying chunk boundary.
    let cut = data.first().map_or(0, |&b| b as usize).min(data.len());
    let mut decoder = LineDecoder::new();
    let mut split = Vec::new();
    decoder.feed(&data[..cut], |line| split.push(line));
    decoder.feed(&data[cut..], |line| split.push(line));
    assert_eq!(whole, split);
});
