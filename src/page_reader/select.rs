//! C5: decoder-selection policy.
//!
//! Grounded on the normalization step in `parquet2::page::read_dict_page` and the encoding
//! match arms scattered through `parquet2::deserialize::mod`, consolidated here into one
//! explicit function ("normalize `PLAIN_DICTIONARY` at the single entry point
//! of decoder selection so downstream code need not know about the alias").

use crate::error::Result;
use crate::metadata::PhysicalType;
use crate::page_reader::decoder::{encoding_name, physical_type_name, DecoderKind};
use crate::parquet_bridge::Encoding;

/// Maps `(physicalType, pageEncoding)` to a concrete [`DecoderKind`], normalizing the
/// deprecated `PLAIN_DICTIONARY` alias to `RLE_DICTIONARY` first.
pub fn select(physical_type: PhysicalType, encoding: Encoding) -> Result<DecoderKind> {
    let encoding = if encoding == Encoding::PlainDictionary {
        Encoding::RleDictionary
    } else {
        encoding
    };

    use Encoding::*;
    use PhysicalType::*;

    Ok(match (physical_type, encoding) {
        (_, RleDictionary) => DecoderKind::Dictionary,
        (Boolean, Plain) => DecoderKind::BooleanPlain,
        (Boolean, Rle) => DecoderKind::BooleanRle,
        (Int32, Plain) => DecoderKind::Int32Plain,
        (Int32, DeltaBinaryPacked) => DecoderKind::Int32DeltaBinaryPacked,
        (Int64, Plain) => DecoderKind::Int64Plain,
        (Int64, DeltaBinaryPacked) => DecoderKind::Int64DeltaBinaryPacked,
        (Int96, Plain) => DecoderKind::Int96Plain,
        (Float, Plain) => DecoderKind::FloatPlain,
        (Double, Plain) => DecoderKind::DoublePlain,
        (ByteArray, Plain) => DecoderKind::ByteArrayPlain,
        (ByteArray, DeltaLengthByteArray) => DecoderKind::ByteArrayDeltaLength,
        (ByteArray, DeltaByteArray) => DecoderKind::ByteArrayDeltaByteArray,
        (FixedLenByteArray(l), Plain) => DecoderKind::FixedLenByteArrayPlain(l),
        (FixedLenByteArray(l), DeltaByteArray) => DecoderKind::FixedLenByteArrayDeltaByteArray(l),
        (pt, enc) => {
            return Err(unsupported_encoding!(
                "{} does not support {} encoding",
                physical_type_name(pt),
                encoding_name(enc)
            ))
        }
    })
}

/// The narrower table describes for dictionary *pages*: only PLAIN (the
/// deprecated `PLAIN_DICTIONARY` alias normalizes to it too), and never `BOOLEAN` (a
/// dictionary of booleans carries no useful indirection).
pub fn select_dictionary_page(physical_type: PhysicalType, encoding: Encoding) -> Result<()> {
    if physical_type == PhysicalType::Boolean {
        return Err(unsupported_encoding!(
            "BOOLEAN columns cannot carry a dictionary page"
        ));
    }
    match encoding {
        Encoding::Plain | Encoding::PlainDictionary => Ok(()),
        other => Err(malformed_header!(
            "dictionary page encoding must be PLAIN, got {}",
            encoding_name(other)
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_plain_dictionary_alias() {
        let a = select(PhysicalType::Int32, Encoding::PlainDictionary).unwrap();
        let b = select(PhysicalType::Int32, Encoding::RleDictionary).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_unsupported_combination() {
        assert!(select(PhysicalType::Boolean, Encoding::DeltaBinaryPacked).is_err());
    }

    #[test]
    fn dictionary_page_rejects_boolean() {
        assert!(select_dictionary_page(PhysicalType::Boolean, Encoding::Plain).is_err());
    }

    #[test]
    fn dictionary_page_rejects_non_plain_encoding() {
        assert!(select_dictionary_page(PhysicalType::Int32, Encoding::Rle).is_err());
    }
}
