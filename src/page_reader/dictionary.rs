//! C6: dictionary page.
//!
//! Grounded on `parquet2::page::page_dict::{primitive, binary, fixed_len_binary}` and
//! `parquet2::read::page::reader::finish_page`'s `PageType::DictionaryPage` arm, collapsed
//! into one function since this crate's dictionary values are always PLAIN-decoded
//! regardless of physical type.

use std::io::Read;

use parquet_format_safe::DictionaryPageHeader;

use crate::error::{Error, Result};
use crate::metadata::PhysicalType;
use crate::page_reader::decoder::{decode_values, DecoderKind};
use crate::page_reader::framed::read_framed_body;
use crate::page_reader::select::select_dictionary_page;
use crate::page_reader::value::Value;
use crate::parquet_bridge::{Compression, Encoding};

/// Reads a dictionary page's `numValues` entries into an owned vector of raw physical
/// values: logical interpretation is not applied at dictionary time.
pub fn read_dictionary_page<R: Read>(
    reader: &mut R,
    header: Option<&DictionaryPageHeader>,
    physical_type: PhysicalType,
    codec: Compression,
    compressed_size: i32,
    uncompressed_size: i32,
) -> Result<Vec<Value>> {
    let header = header.ok_or_else(|| malformed_header!("expected a dictionary page header"))?;

    if header.num_values < 0 {
        return Err(invalid_size!(
            "dictionary page numValues is negative: {}",
            header.num_values
        ));
    }
    let num_values = header.num_values as usize;

    let encoding: Encoding = header
        .encoding
        .try_into()
        .map_err(|_| malformed_header!("dictionary page encoding out of range"))?;
    select_dictionary_page(physical_type, encoding)?;

    let body = read_framed_body(reader, codec, compressed_size, uncompressed_size)?;

    let kind = match physical_type {
        PhysicalType::Boolean => unreachable!("select_dictionary_page rejects BOOLEAN"),
        PhysicalType::Int32 => DecoderKind::Int32Plain,
        PhysicalType::Int64 => DecoderKind::Int64Plain,
        PhysicalType::Int96 => DecoderKind::Int96Plain,
        PhysicalType::Float => DecoderKind::FloatPlain,
        PhysicalType::Double => DecoderKind::DoublePlain,
        PhysicalType::ByteArray => DecoderKind::ByteArrayPlain,
        PhysicalType::FixedLenByteArray(l) => DecoderKind::FixedLenByteArrayPlain(l),
    };

    let values = decode_values(kind, &body, None, false, num_values)?;
    if values.len() != num_values {
        return Err(Error::ShortRead(format!(
            "dictionary page: expected {} values, decoded {}",
            num_values,
            values.len()
        )));
    }
    Ok(values)
}
