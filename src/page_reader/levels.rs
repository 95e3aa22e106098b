//! C3: level decoder family.
//!
//! Grounded on `parquet2::read::levels` (`RLEDecoder`, `split_buffer_v1`, `split_buffer_v2`)
//! and `parquet2::encoding::hybrid_rle`. The constant-folded variant is required, not an
//! optimization: the on-disk format omits the definition-level stream entirely for
//! non-nested REQUIRED columns, and the repetition-level stream for non-nested non-REPEATED
//! columns.
//!
//! Both variants decode eagerly into an owned `Vec<i16>` sized to the page's `numValues`
//! (see `page_reader::data_page` for why pages decode levels up front rather than lazily
//! per batch).

use crate::encoding::bitpacked;
use crate::encoding::hybrid_rle::{Decoder as HybridDecoder, HybridEncoded};
use crate::error::{Error, Result};

/// A source of per-value levels (definition or repetition), bound to one page.
#[derive(Debug)]
pub enum LevelDecoder<'a> {
    /// Every level is synthesized as the same constant.
    Constant(i16),
    /// The standard hybrid RLE/bit-packed stream, already split out of the page body.
    Hybrid { bit_width: u32, data: &'a [u8] },
}

impl<'a> LevelDecoder<'a> {
    /// Decodes exactly `num_values` levels, each `<= max_level`.
    pub fn decode(&self, max_level: i16, num_values: usize) -> Result<Vec<i16>> {
        match self {
            LevelDecoder::Constant(v) => Ok(vec![*v; num_values]),
            LevelDecoder::Hybrid { bit_width, data } => {
                let raw = decode_hybrid_rle(data, *bit_width, num_values)?;
                raw.into_iter()
                    .map(|v| {
                        if v as i64 > max_level as i64 {
                            Err(short_read!(
                                "level {} exceeds column maximum {}",
                                v,
                                max_level
                            ))
                        } else {
                            Ok(v as i16)
                        }
                    })
                    .collect()
            }
        }
    }
}

/// Decodes `num_values` unsigned integers out of a standard hybrid RLE/bit-packed stream
/// of the given `bit_width`. Shared with the dictionary-indirect values decoder,
/// which indexes into the dictionary with the same framing.
pub fn decode_hybrid_rle(data: &[u8], bit_width: u32, num_values: usize) -> Result<Vec<u32>> {
    let mut out = Vec::with_capacity(num_values);
    let mut decoder = HybridDecoder::new(data, bit_width);
    while out.len() < num_values {
        let run = decoder
            .next()
            .ok_or_else(|| short_read!("hybrid RLE stream ended with {} values left", num_values - out.len()))?;
        let remaining = num_values - out.len();
        match run {
            HybridEncoded::Bitpacked(packed) => {
                let capacity = if bit_width == 0 {
                    remaining
                } else {
                    std::cmp::min(remaining, packed.len() * 8 / bit_width as usize)
                };
                out.extend(bitpacked::Decoder::new(packed, bit_width as u8, capacity));
            }
            HybridEncoded::Rle(value_bytes, run_length) => {
                let value = decode_rle_value(value_bytes);
                let take = std::cmp::min(remaining, run_length);
                out.extend(std::iter::repeat(value).take(take));
            }
        }
    }
    Ok(out)
}

/// Reads a little-endian fixed-width value out of an RLE run's value bytes (`ceil8(bit_width)`
/// bytes long, per the hybrid RLE/bit-packed framing).
fn decode_rle_value(bytes: &[u8]) -> u32 {
    let mut value = 0u32;
    for (i, byte) in bytes.iter().take(4).enumerate() {
        value |= (*byte as u32) << (8 * i);
    }
    value
}

/// Reads the 4-byte little-endian length prefix used by the *size-prefixed* (V1) framing,
/// returning the prefix value and the number of header bytes consumed (always 4).
pub fn read_length_prefix(data: &[u8]) -> Result<(usize, usize)> {
    if data.len() < 4 {
        return Err(Error::ShortRead(
            "level stream missing 4-byte length prefix".to_string(),
        ));
    }
    let length = crate::encoding::get_length(data) as usize;
    Ok((length, 4))
}
