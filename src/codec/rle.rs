//! Run-length encoding as `(length, value)` byte pairs.
//!
//! Runs are capped at 255 so every length fits in a single byte. The format
//! is not a general-purpose compressor: input without repeated bytes doubles
//! in size.

const MAX_RUN: usize = u8::MAX as usize;

pub fn encode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        let value = input[i];
        let run = input[i..]
            .iter()
            .take(MAX_RUN)
            .take_while(|&&b| b == value)
            .count();

        out.push(run as u8);
        out.push(value);
        i += run;
    }

    out
}

/// Expands `(length, value)` pairs. A trailing unpaired byte is ignored.
pub fn decode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    for pair in input.chunks_exact(2) {
        out.extend(std::iter::repeat(pair[1]).take(pair[0] as usize));
    }
    out
}
