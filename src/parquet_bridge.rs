// Bridges Thrift wire types (from `parquet_format_safe`) to idiomatic Rust enums.
// Adapted from parquet2's `parquet_bridge.rs`, trimmed to the types this reader needs:
// schema/footer concerns (logical-type tree, boundary order, sort order) are out of this
// crate's scope, so only the UTF-8 string marker survives from the original
// LogicalType/ConvertedType bridging.
use std::convert::TryFrom;

use parquet_format_safe::CompressionCodec;
use parquet_format_safe::ConvertedType as ParquetConvertedType;
use parquet_format_safe::Encoding as ParquetEncoding;
use parquet_format_safe::FieldRepetitionType;
use parquet_format_safe::LogicalType as ParquetLogicalType;
use parquet_format_safe::PageType as ParquetPageType;

use crate::error::Error;

/// The repetition of a column.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
pub enum Repetition {
    /// The field has no null values.
    Required,
    /// The field may have null values.
    Optional,
    /// The field may be repeated (a list field).
    Repeated,
}

impl TryFrom<FieldRepetitionType> for Repetition {
    type Error = Error;

    fn try_from(repetition: FieldRepetitionType) -> Result<Self, Self::Error> {
        Ok(match repetition {
            FieldRepetitionType::REQUIRED => Repetition::Required,
            FieldRepetitionType::OPTIONAL => Repetition::Optional,
            FieldRepetitionType::REPEATED => Repetition::Repeated,
            _ => return Err(Error::MetadataMismatch("repetition out of range".into())),
        })
    }
}

/// Block-compression codec carried in chunk metadata.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
pub enum Compression {
    Uncompressed,
    Snappy,
    Gzip,
    Lzo,
    Brotli,
    Lz4,
    Zstd,
    Lz4Raw,
}

impl TryFrom<CompressionCodec> for Compression {
    type Error = Error;

    fn try_from(codec: CompressionCodec) -> Result<Self, Self::Error> {
        Ok(match codec {
            CompressionCodec::UNCOMPRESSED => Compression::Uncompressed,
            CompressionCodec::SNAPPY => Compression::Snappy,
            CompressionCodec::GZIP => Compression::Gzip,
            CompressionCodec::LZO => Compression::Lzo,
            CompressionCodec::BROTLI => Compression::Brotli,
            CompressionCodec::LZ4 => Compression::Lz4,
            CompressionCodec::ZSTD => Compression::Zstd,
            CompressionCodec::LZ4_RAW => Compression::Lz4Raw,
            _ => return Err(Error::MetadataMismatch("compression codec out of range".into())),
        })
    }
}

/// The three page shapes this reader understands.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
pub enum PageType {
    DataPage,
    DataPageV2,
    DictionaryPage,
}

impl TryFrom<ParquetPageType> for PageType {
    type Error = Error;

    fn try_from(type_: ParquetPageType) -> Result<Self, Self::Error> {
        Ok(match type_ {
            ParquetPageType::DATA_PAGE => PageType::DataPage,
            ParquetPageType::DATA_PAGE_V2 => PageType::DataPageV2,
            ParquetPageType::DICTIONARY_PAGE => PageType::DictionaryPage,
            _ => {
                return Err(Error::UnexpectedPageType(format!(
                    "page type {type_:?} is not a data or dictionary page"
                )))
            }
        })
    }
}

/// Value encoding as it appears on the wire (before `RLE_DICTIONARY` normalization).
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
pub enum Encoding {
    Plain,
    /// Deprecated alias of [`Encoding::RleDictionary`]; normalized away at decoder
    /// selection (see `page_reader::select`).
    PlainDictionary,
    Rle,
    BitPacked,
    DeltaBinaryPacked,
    DeltaLengthByteArray,
    DeltaByteArray,
    RleDictionary,
    ByteStreamSplit,
}

impl TryFrom<ParquetEncoding> for Encoding {
    type Error = Error;

    fn try_from(encoding: ParquetEncoding) -> Result<Self, Self::Error> {
        Ok(match encoding {
            ParquetEncoding::PLAIN => Encoding::Plain,
            ParquetEncoding::PLAIN_DICTIONARY => Encoding::PlainDictionary,
            ParquetEncoding::RLE => Encoding::Rle,
            ParquetEncoding::BIT_PACKED => Encoding::BitPacked,
            ParquetEncoding::DELTA_BINARY_PACKED => Encoding::DeltaBinaryPacked,
            ParquetEncoding::DELTA_LENGTH_BYTE_ARRAY => Encoding::DeltaLengthByteArray,
            ParquetEncoding::DELTA_BYTE_ARRAY => Encoding::DeltaByteArray,
            ParquetEncoding::RLE_DICTIONARY => Encoding::RleDictionary,
            ParquetEncoding::BYTE_STREAM_SPLIT => Encoding::ByteStreamSplit,
            _ => {
                return Err(Error::UnsupportedEncodingForType(format!(
                    "encoding {encoding:?} out of range"
                )))
            }
        })
    }
}

/// Whether a column's converted/logical type marks it as UTF-8 text.
pub fn is_utf8(
    converted_type: Option<&ParquetConvertedType>,
    logical_type: Option<&ParquetLogicalType>,
) -> bool {
    if matches!(converted_type, Some(ParquetConvertedType::UTF8)) {
        return true;
    }
    matches!(logical_type, Some(ParquetLogicalType::STRING(_)))
}
