//! C7: data page, V1 and V2 variants.
//!
//! Grounded on `parquet2::read::levels::{split_buffer_v1, split_buffer_v2}` for the framing
//! split and `parquet2::read::page::reader::{build_page, finish_page}` for the
//! header-then-body sequencing, restructured around this crate's synchronous
//! position-advancing reader instead of building one compressed-page struct up front and
//! decompressing/decoding it later.
//!
//! Both variants decode their whole value and level region eagerly in `read_v1`/`read_v2`,
//! matching `page_reader::decoder`'s eager style; `read_batch` then only slices the
//! already-decoded vectors, which is where the batching contract is actually honored from
//! the caller's perspective.

use std::convert::TryInto;
use std::io::Read;

use parquet_format_safe::{DataPageHeader, DataPageHeaderV2};

use crate::error::{Error, Result};
use crate::metadata::PhysicalType;
use crate::page_reader::decoder::{decode_values, DecoderKind};
use crate::page_reader::framed::read_framed_body;
use crate::page_reader::levels::LevelDecoder;
use crate::page_reader::select::select;
use crate::page_reader::value::Value;
use crate::parquet_bridge::{Compression, Encoding};

/// How a page should obtain one level stream (definition or repetition), decided once per
/// chunk from the column descriptor and threaded into each page's `read_v1`/`read_v2`
/// call. Stateless here, since the choice depends only on descriptor data and not on
/// anything a page accumulates, so a plain `Copy` value suffices in place of a closure.
#[derive(Debug, Clone, Copy)]
pub enum LevelSource {
    /// The level stream is not stored on disk; every value gets this constant.
    Constant(i16),
    /// The level stream is the standard hybrid RLE/bit-packed encoding at this bit width.
    Hybrid { bit_width: u32, max_level: i16 },
}

impl LevelSource {
    /// V1 framing: read a 4-byte little-endian length prefix from `reader`, then that many
    /// bytes, and decode `num_values` levels out of them. Constant sources consume nothing.
    /// Returns the decoded levels alongside the number of bytes consumed off `reader`
    /// (including the 4-byte length prefix, when present), so the caller can exclude that
    /// framing from the value region's declared sizes.
    fn decode_size_prefixed<R: Read>(
        &self,
        reader: &mut R,
        num_values: usize,
    ) -> Result<(Vec<i16>, usize)> {
        match *self {
            LevelSource::Constant(v) => Ok((vec![v; num_values], 0)),
            LevelSource::Hybrid {
                bit_width,
                max_level,
            } => {
                let len = read_u32_le(reader)? as usize;
                let mut data = vec![0u8; len];
                reader
                    .read_exact(&mut data)
                    .map_err(|e| Error::ShortRead(format!("level stream: {e}")))?;
                let levels = LevelDecoder::Hybrid {
                    bit_width,
                    data: &data,
                }
                .decode(max_level, num_values)?;
                Ok((levels, 4 + len))
            }
        }
    }

    /// V2 framing: `data` is already the exact byte slice the page header declared.
    fn decode_slice(&self, data: &[u8], num_values: usize) -> Result<Vec<i16>> {
        match *self {
            LevelSource::Constant(v) => Ok(vec![v; num_values]),
            LevelSource::Hybrid {
                bit_width,
                max_level,
            } => LevelDecoder::Hybrid { bit_width, data }.decode(max_level, num_values),
        }
    }
}

fn read_u32_le<R: Read>(reader: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader
        .read_exact(&mut buf)
        .map_err(|e| Error::ShortRead(format!("level stream length prefix: {e}")))?;
    Ok(u32::from_le_bytes(buf))
}

/// One caller-sized slice of `(values, dLevels, rLevels)`, as pulled from a page by
/// [`ColumnChunkReader::read_batch`](crate::page_reader::chunk::ColumnChunkReader::read_batch).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    pub values: Vec<Value>,
    pub d_levels: Vec<i16>,
    pub r_levels: Vec<i16>,
}

impl Batch {
    fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.d_levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.d_levels.is_empty()
    }
}

/// A fully-decoded data page (V1 or V2); batching only slices the eagerly-decoded vectors.
#[derive(Debug)]
pub struct DataPage {
    num_values: usize,
    max_def_level: i16,
    level_pos: usize,
    value_pos: usize,
    d_levels: Vec<i16>,
    r_levels: Vec<i16>,
    values: Vec<Value>,
}

#[allow(clippy::too_many_arguments)]
impl DataPage {
    /// Reads a V1 data page: levels in size-prefixed framing, read **r then d**,
    /// directly off `reader`; the remaining bytes are the framed, possibly-compressed value
    /// region, whose declared sizes this crate treats as covering only that region (the
    /// level blocks, including their length prefixes, are excluded).
    pub fn read_v1<R: Read>(
        header: Option<&DataPageHeader>,
        physical_type: PhysicalType,
        is_utf8: bool,
        max_def_level: i16,
        d_source: LevelSource,
        r_source: LevelSource,
        dict: Option<&[Value]>,
        reader: &mut R,
        codec: Compression,
        compressed_page_size: i32,
        uncompressed_page_size: i32,
    ) -> Result<Self> {
        let header = header.ok_or_else(|| malformed_header!("expected a V1 data page header"))?;
        if header.num_values < 0 {
            return Err(invalid_size!(
                "V1 data page numValues is negative: {}",
                header.num_values
            ));
        }
        let num_values = header.num_values as usize;
        let encoding: Encoding = header
            .encoding
            .try_into()
            .map_err(|_| malformed_header!("data page encoding out of range"))?;
        let kind = select(physical_type, encoding)?;

        // On-disk order: repetition levels, then definition levels.
        let (r_levels, r_consumed) = r_source.decode_size_prefixed(reader, num_values)?;
        let (d_levels, d_consumed) = d_source.decode_size_prefixed(reader, num_values)?;
        let levels_consumed = (r_consumed + d_consumed) as i32;

        let not_null = d_levels.iter().filter(|&&d| d == max_def_level).count();

        let remaining_compressed = compressed_page_size - levels_consumed;
        let remaining_uncompressed = uncompressed_page_size - levels_consumed;
        let body = read_framed_body(reader, codec, remaining_compressed, remaining_uncompressed)?;
        let values = decode_values(kind, &body, dict, is_utf8, not_null)?;
        if values.len() != not_null {
            return Err(Error::ShortRead(format!(
                "V1 data page: expected {not_null} values, decoded {}",
                values.len()
            )));
        }

        Ok(Self {
            num_values,
            max_def_level,
            level_pos: 0,
            value_pos: 0,
            d_levels,
            r_levels,
            values,
        })
    }

    /// Reads a V2 data page: `rLevelsByteLen + dLevelsByteLen` bytes are read uncompressed
    /// off `reader` into one in-memory buffer and split; the remaining value region is
    /// framed with both compressed and uncompressed sizes reduced by that same length, since
    /// V2 levels are never compressed regardless of the chunk's codec.
    pub fn read_v2<R: Read>(
        header: Option<&DataPageHeaderV2>,
        physical_type: PhysicalType,
        is_utf8: bool,
        max_def_level: i16,
        d_source: LevelSource,
        r_source: LevelSource,
        dict: Option<&[Value]>,
        reader: &mut R,
        codec: Compression,
        compressed_page_size: i32,
        uncompressed_page_size: i32,
    ) -> Result<Self> {
        let header =
            header.ok_or_else(|| malformed_header!("expected a V2 data page header"))?;
        if header.num_values < 0 {
            return Err(invalid_size!(
                "V2 data page numValues is negative: {}",
                header.num_values
            ));
        }
        if header.repetition_levels_byte_length < 0 || header.definition_levels_byte_length < 0 {
            return Err(invalid_size!(
                "V2 data page level byte lengths must be non-negative (r={}, d={})",
                header.repetition_levels_byte_length,
                header.definition_levels_byte_length
            ));
        }
        let num_values = header.num_values as usize;
        let r_len = header.repetition_levels_byte_length;
        let d_len = header.definition_levels_byte_length;
        let encoding: Encoding = header
            .encoding
            .try_into()
            .map_err(|_| malformed_header!("data page encoding out of range"))?;
        let kind = select(physical_type, encoding)?;

        let levels_len = (r_len + d_len) as usize;
        let mut levels = vec![0u8; levels_len];
        reader
            .read_exact(&mut levels)
            .map_err(|e| Error::ShortRead(format!("V2 level sections: {e}")))?;
        let (r_slice, d_slice) = levels.split_at(r_len as usize);

        let r_levels = r_source.decode_slice(r_slice, num_values)?;
        let d_levels = d_source.decode_slice(d_slice, num_values)?;

        let not_null = d_levels.iter().filter(|&&d| d == max_def_level).count();

        let remaining_compressed = compressed_page_size - r_len - d_len;
        let remaining_uncompressed = uncompressed_page_size - r_len - d_len;
        let body = read_framed_body(
            reader,
            codec,
            remaining_compressed,
            remaining_uncompressed,
        )?;
        let values = decode_values(kind, &body, dict, is_utf8, not_null)?;
        if values.len() != not_null {
            return Err(Error::ShortRead(format!(
                "V2 data page: expected {not_null} values, decoded {}",
                values.len()
            )));
        }

        Ok(Self {
            num_values,
            max_def_level,
            level_pos: 0,
            value_pos: 0,
            d_levels,
            r_levels,
            values,
        })
    }

    pub fn is_exhausted(&self) -> bool {
        self.level_pos >= self.num_values
    }

    /// Pulls up to `max` positions.
    pub fn read_batch(&mut self, max: usize) -> Batch {
        let m = max.min(self.num_values - self.level_pos);
        if m == 0 {
            return Batch::empty();
        }
        let d_levels = self.d_levels[self.level_pos..self.level_pos + m].to_vec();
        let r_levels = self.r_levels[self.level_pos..self.level_pos + m].to_vec();
        let not_null = d_levels.iter().filter(|&&d| d == self.max_def_level).count();
        let values = self.values[self.value_pos..self.value_pos + not_null].to_vec();

        self.level_pos += m;
        self.value_pos += not_null;

        Batch {
            values,
            d_levels,
            r_levels,
        }
    }
}
