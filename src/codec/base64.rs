//! Standard-alphabet base64 with `=` padding.

use thiserror::Error;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Base64Error {
    #[error("invalid base64 character: {0:?}")]
    InvalidChar(char),
    #[error("decoded bytes are not valid UTF-8")]
    InvalidUtf8,
}

pub fn encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(3) * 4);

    for chunk in data.chunks(3) {
        let b0 = chunk[0] as u32;
        let b1 = chunk.get(1).copied().unwrap_or(0) as u32;
        let b2 = chunk.get(2).copied().unwrap_or(0) as u32;
        let triple = (b0 << 16) | (b1 << 8) | b2;

        out.push(ALPHABET[((triple >> 18) & 0x3F) as usize] as char);
        out.push(ALPHABET[((triple >> 12) & 0x3F) as usize] as char);
        out.push(if chunk.len() > 1 {
            ALPHABET[((triple >> 6) & 0x3F) as usize] as char
        } else {
            '='
        });
        out.push(if chunk.len() > 2 {
            ALPHABET[(triple & 0x3F) as usize] as char
        } else {
            '='
        });
    }

    out
}

/// Decoding stops at the first `=`; whitespace is skipped.
pub fn decode(input: &str) -> Result<Vec<u8>, Base64Error> {
    let mut sextets = Vec::with_capacity(input.len());
    for c in input.chars() {
        if c == '=' {
            break;
        }
        if c.is_whitespace() {
            continue;
        }
        let value = ALPHABET
            .iter()
            .position(|&a| a as char == c)
            .ok_or(Base64Error::InvalidChar(c))?;
        sextets.push(value as u32);
    }

    let mut out = Vec::with_capacity(sextets.len() * 3 / 4);
    for chunk in sextets.chunks(4) {
        if chunk.len() < 2 {
            break;
        }
        let triple = (chunk[0] << 18)
            | (chunk[1] << 12)
            | (chunk.get(2).copied().unwrap_or(0) << 6)
            | chunk.get(3).copied().unwrap_or(0);

        out.push((triple >> 16) as u8);
        if chunk.len() > 2 {
            out.push((triple >> 8) as u8);
        }
        if chunk.len() > 3 {
            out.push(triple as u8);
        }
    }

    Ok(out)
}

pub fn decode_to_string(input: &str) -> Result<String, Base64Error> {
    String::from_utf8(decode(input)?).map_err(|_| Base64Error::InvalidUtf8)
}
