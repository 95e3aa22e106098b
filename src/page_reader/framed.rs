//! C2: framed data-body reader.
//!
//! Grounded on `parquet2::read::compression::{decompress, decompress_v1, decompress_v2}`,
//! adapted from "decompress an in-memory buffer" to "read exactly `C` compressed bytes off
//! the chunk stream and return the up-to-`U`-byte uncompressed body" to fit this crate's
//! eager-per-page decode: the whole body is materialized once per page so the level and
//! values decoders downstream can work over plain borrowed slices instead of a
//! self-referential incremental reader.

use std::io::Read;

use crate::compression::create_codec;
use crate::error::{Error, Result};
use crate::parquet_bridge::Compression;

/// Reads exactly `compressed_size` bytes from `reader` and returns the decompressed body,
/// which is exactly `uncompressed_size` bytes long.
///
/// For [`Compression::Uncompressed`] this is a bounded pass-through: `compressed_size` must
/// equal `uncompressed_size`.
pub fn read_framed_body<R: Read>(
    reader: &mut R,
    codec: Compression,
    compressed_size: i32,
    uncompressed_size: i32,
) -> Result<Vec<u8>> {
    if compressed_size < 0 {
        return Err(invalid_size!(
            "negative compressed page size: {}",
            compressed_size
        ));
    }
    if uncompressed_size < 0 {
        return Err(invalid_size!(
            "negative uncompressed page size: {}",
            uncompressed_size
        ));
    }

    let mut compressed = vec![0u8; compressed_size as usize];
    reader
        .read_exact(&mut compressed)
        .map_err(|e| Error::ShortRead(format!("page body: {e}")))?;

    match create_codec(&codec)? {
        None => {
            if compressed.len() != uncompressed_size as usize {
                return Err(invalid_size!(
                    "uncompressed codec: compressed length {} does not match declared \
                     uncompressed length {}",
                    compressed.len(),
                    uncompressed_size
                ));
            }
            Ok(compressed)
        }
        Some(mut codec) => {
            let mut out = vec![0u8; uncompressed_size as usize];
            codec.decompress(&compressed, &mut out)?;
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn passthrough_uncompressed() {
        let data = vec![1u8, 2, 3, 4];
        let mut reader = Cursor::new(data.clone());
        let body =
            read_framed_body(&mut reader, Compression::Uncompressed, 4, 4).unwrap();
        assert_eq!(body, data);
    }

    #[test]
    fn rejects_negative_sizes() {
        let mut reader = Cursor::new(vec![0u8; 4]);
        assert!(read_framed_body(&mut reader, Compression::Uncompressed, -1, 4).is_err());
        let mut reader = Cursor::new(vec![0u8; 4]);
        assert!(read_framed_body(&mut reader, Compression::Uncompressed, 4, -1).is_err());
    }

    #[test]
    fn rejects_size_mismatch_when_uncompressed() {
        let mut reader = Cursor::new(vec![0u8; 4]);
        assert!(read_framed_body(&mut reader, Compression::Uncompressed, 4, 5).is_err());
    }
}
