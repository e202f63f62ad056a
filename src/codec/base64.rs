//! Base64 codec over the standard alphabet.
//!
//! Encoding always pads to a multiple of four symbols. Decoding validates
//! length and alphabet up front, then reassembles three bytes per group of
//! four symbols. How the reassembled buffer is truncated is selected by
//! [`DecodeMode`]:
//!
//! - [`DecodeMode::Exact`] drops only the bytes that the final group's `=`
//!   padding stands for, so `decode(encode(b)) == b` for every `b`.
//! - [`DecodeMode::TrimTrailingZeros`] strips every trailing `0x00` byte of
//!   the whole buffer. This matches data URIs produced by older text-oriented
//!   decoders and loses real trailing zero bytes.

use crate::config::{CaptchaError, Result};

const ENCODING_TABLE: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const PAD: u8 = b'=';

const INVALID: u8 = 0xFF;
const PAD_SEXTET: u8 = 0x40;

static DECODING_TABLE: [u8; 256] = build_decoding_table();

const fn build_decoding_table() -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < ENCODING_TABLE.len() {
        table[ENCODING_TABLE[i] as usize] = i as u8;
        i += 1;
    }
    table[PAD as usize] = PAD_SEXTET;
    table
}

/// Truncation applied to decoded output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodeMode {
    /// Truncate by the padding count of the final group.
    #[default]
    Exact,
    /// Strip all trailing zero bytes from the decoded buffer.
    TrimTrailingZeros,
}

/// Number of symbols `encode` produces for `len` input bytes.
#[must_use]
pub const fn encoded_len(len: usize) -> usize {
    len.div_ceil(3) * 4
}

/// Encodes bytes as padded standard Base64.
#[must_use]
pub fn encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(encoded_len(data.len()));

    for chunk in data.chunks(3) {
        let mut triple = 0u32;
        for i in 0..3 {
            triple <<= 8;
            if let Some(&octet) = chunk.get(i) {
                triple |= u32::from(octet);
            }
        }

        // n input bytes cover n + 1 sextets
        let symbols = chunk.len() + 1;
        for i in 0..4 {
            if i < symbols {
                let sextet = (triple >> (18 - 6 * i)) & 0x3F;
                out.push(char::from(ENCODING_TABLE[sextet as usize]));
            } else {
                out.push(char::from(PAD));
            }
        }
    }

    out
}

/// Decodes padded standard Base64, truncating exactly by padding.
///
/// # Errors
///
/// Returns `CaptchaError::InvalidEncoding` if the length is not a multiple of
/// four or the input contains characters outside `[A-Za-z0-9+/=]`.
pub fn decode(input: &str) -> Result<Vec<u8>> {
    decode_with(input, DecodeMode::Exact)
}

/// Decodes Base64 and strips every trailing zero byte from the result.
///
/// An all-zero payload decodes to an empty vector.
///
/// # Errors
///
/// Same validation as [`decode`].
pub fn decode_trimmed(input: &str) -> Result<Vec<u8>> {
    decode_with(input, DecodeMode::TrimTrailingZeros)
}

/// Decodes Base64 with an explicit truncation mode.
///
/// # Errors
///
/// Same validation as [`decode`].
pub fn decode_with(input: &str, mode: DecodeMode) -> Result<Vec<u8>> {
    let bytes = input.as_bytes();
    validate(input)?;

    let mut out = Vec::with_capacity(bytes.len() / 4 * 3);
    for quad in bytes.chunks_exact(4) {
        let mut quadruple = 0u32;
        for &symbol in quad {
            let sextet = DECODING_TABLE[usize::from(symbol)] & 0x3F;
            quadruple = (quadruple << 6) | u32::from(sextet);
        }
        out.extend_from_slice(&quadruple.to_be_bytes()[1..]);
    }

    let keep = match mode {
        DecodeMode::Exact => {
            let padding = bytes.iter().rev().take_while(|&&b| b == PAD).count().min(4);
            let covered = (4 - padding) * 6 / 8;
            out.len() - (3 - covered).min(out.len())
        }
        DecodeMode::TrimTrailingZeros => out.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1),
    };
    out.truncate(keep);

    Ok(out)
}

fn validate(input: &str) -> Result<()> {
    if input.len() % 4 != 0 {
        return Err(CaptchaError::InvalidEncoding(format!(
            "length {} is not a multiple of 4",
            input.len()
        )));
    }

    if let Some(pos) = input
        .bytes()
        .position(|b| DECODING_TABLE[usize::from(b)] == INVALID)
    {
        // every byte before `pos` is ASCII, so `pos` is a char boundary
        let ch = input[pos..].chars().next().unwrap_or_default();
        return Err(CaptchaError::InvalidEncoding(format!(
            "invalid character {ch:?} at offset {pos}"
        )));
    }

    Ok(())
}
