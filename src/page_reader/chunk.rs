//! C8: chunk reader.
//!
//! Grounded on `parquet2::read::page::reader::{PageReader, next_page, build_page}`'s overall
//! loop shape (read header, dispatch on `PageType`, recurse past dictionary pages), adapted
//! to own fully-decoded state per chunk instead of yielding raw compressed pages to a
//! caller-driven decode step.

use std::convert::TryInto;
use std::io::{Read, Seek};

use parquet_format_safe::thrift::protocol::TCompactInputProtocol;
use parquet_format_safe::PageHeader;

use crate::encoding::get_bit_width;
use crate::error::{Error, Result};
use crate::metadata::{ChunkMetaData, ColumnDescriptor};
use crate::page_reader::data_page::{Batch, DataPage, LevelSource};
use crate::page_reader::dictionary::read_dictionary_page;
use crate::page_reader::offset::OffsetTrackingReader;
use crate::page_reader::value::Value;
use crate::parquet_bridge::{PageType, Repetition};

/// Drives the page sequence of a single column chunk. Owns the dictionary, if any,
/// for the lifetime of the chunk; creates each data page just-in-time and discards it once
/// exhausted. `Read(out)` is realized as [`ColumnChunkReader::read_batch`].
pub struct ColumnChunkReader<R> {
    reader: OffsetTrackingReader<R>,
    chunk_start: u64,
    column: ColumnDescriptor,
    chunk: ChunkMetaData,
    dictionary: Option<Vec<Value>>,
    active: Option<DataPage>,
    done: bool,
}

impl<R: Read + Seek> ColumnChunkReader<R> {
    /// Binds a reader to a chunk. Validates the chunk has no file-path reference and that
    /// its physical type matches the column, then seeks to the chunk's start offset
    /// (the dictionary offset if present, else the data-page offset).
    pub fn new(reader: R, column: ColumnDescriptor, chunk: ChunkMetaData) -> Result<Self> {
        if chunk.file_path().is_some() {
            return Err(metadata_mismatch!(
                "cross-file column chunks are not supported"
            ));
        }
        if chunk.physical_type() != column.physical_type() {
            return Err(metadata_mismatch!(
                "chunk physical type does not match column descriptor"
            ));
        }

        let chunk_start = chunk.start_offset() as u64;
        let mut reader = OffsetTrackingReader::new(reader);
        reader.seek(chunk_start)?;

        Ok(Self {
            reader,
            chunk_start,
            column,
            chunk,
            dictionary: None,
            active: None,
            done: false,
        })
    }

    /// Constant `D_max` for a non-nested REQUIRED column (definition levels are not
    /// stored on disk for it); a size-prefixed hybrid decoder otherwise.
    fn d_level_source(&self) -> LevelSource {
        let max = self.column.max_def_level();
        if !self.column.is_nested() && self.column.repetition() == Repetition::Required {
            LevelSource::Constant(max)
        } else {
            LevelSource::Hybrid {
                bit_width: get_bit_width(max),
                max_level: max,
            }
        }
    }

    /// Constant `0` for a non-nested non-REPEATED column; a size-prefixed hybrid
    /// decoder otherwise.
    fn r_level_source(&self) -> LevelSource {
        let max = self.column.max_rep_level();
        if !self.column.is_nested() && self.column.repetition() != Repetition::Repeated {
            LevelSource::Constant(0)
        } else {
            LevelSource::Hybrid {
                bit_width: get_bit_width(max),
                max_level: max,
            }
        }
    }

    /// Bytes of `totalCompressedSize` consumed so far, tracked from the absolute stream
    /// position relative to the chunk's start offset rather than `OffsetTrackingReader`'s
    /// own reset-on-seek counter: the state machine below seeks past gaps between a
    /// non-contiguous dictionary and its data pages, and computing remaining bytes from
    /// absolute position sidesteps having to re-derive what a seek "resets" against.
    fn bytes_consumed(&mut self) -> Result<i64> {
        let pos = self.reader.position()?;
        Ok(pos as i64 - self.chunk_start as i64)
    }

    fn read_page_header(&mut self) -> Result<PageHeader> {
        let mut prot = TCompactInputProtocol::new(&mut self.reader);
        Ok(PageHeader::read_from_in_protocol(&mut prot)?)
    }

    /// Page-reading state machine: returns `None` at end-of-chunk, recurses past
    /// dictionary pages (which never count as a returned page), and fails on any page type
    /// other than DICTIONARY_PAGE / DATA_PAGE / DATA_PAGE_V2.
    fn fetch_page(&mut self) -> Result<Option<DataPage>> {
        loop {
            let remaining = self.chunk.total_compressed_size() - self.bytes_consumed()?;
            if remaining <= 0 {
                return Ok(None);
            }

            let header = self.read_page_header()?;
            let page_type: PageType = header.type_.try_into()?;

            match page_type {
                PageType::DictionaryPage => {
                    if self.dictionary.is_some() {
                        return Err(Error::DuplicateDictionary);
                    }
                    let dict = read_dictionary_page(
                        &mut self.reader,
                        header.dictionary_page_header.as_ref(),
                        self.column.physical_type(),
                        self.chunk.compression(),
                        header.compressed_page_size,
                        header.uncompressed_page_size,
                    )?;
                    self.dictionary = Some(dict);

                    // If the dictionary was not contiguous with
                    // the data pages, resynchronize to the declared data-page offset.
                    if self.chunk.dictionary_page_offset().is_some() {
                        let current = self.reader.position()?;
                        let data_offset = self.chunk.data_page_offset() as u64;
                        if current != data_offset {
                            self.reader.seek(data_offset)?;
                        }
                    }
                    // the dictionary does not count as a returned page; keep looping.
                }
                PageType::DataPage => {
                    let page = DataPage::read_v1(
                        header.data_page_header.as_ref(),
                        self.column.physical_type(),
                        self.column.is_utf8(),
                        self.column.max_def_level(),
                        self.d_level_source(),
                        self.r_level_source(),
                        self.dictionary.as_deref(),
                        &mut self.reader,
                        self.chunk.compression(),
                        header.compressed_page_size,
                        header.uncompressed_page_size,
                    )?;
                    return Ok(Some(page));
                }
                PageType::DataPageV2 => {
                    let page = DataPage::read_v2(
                        header.data_page_header_v2.as_ref(),
                        self.column.physical_type(),
                        self.column.is_utf8(),
                        self.column.max_def_level(),
                        self.d_level_source(),
                        self.r_level_source(),
                        self.dictionary.as_deref(),
                        &mut self.reader,
                        self.chunk.compression(),
                        header.compressed_page_size,
                        header.uncompressed_page_size,
                    )?;
                    return Ok(Some(page));
                }
            }
        }
    }

    /// Pulls up to `max` positions from the active page, advancing to
    /// the next page automatically when the active one is exhausted, pinned by
    /// `advances_across_pages_without_caller_bookkeeping` below.
    /// End-of-chunk is normalized to an empty, error-free [`Batch`].
    pub fn read_batch(&mut self, max: usize) -> Result<Batch> {
        loop {
            if let Some(page) = self.active.as_mut() {
                let batch = page.read_batch(max);
                if batch.is_empty() {
                    self.active = None;
                    continue;
                }
                return Ok(batch);
            }

            if self.done {
                return Ok(Batch::default());
            }

            match self.fetch_page() {
                Ok(Some(page)) => self.active = Some(page),
                Ok(None) => {
                    self.done = true;
                    return Ok(Batch::default());
                }
                Err(e) => {
                    self.done = true;
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::PhysicalType;
    use crate::parquet_bridge::Compression;
    use parquet_format_safe::{DataPageHeader, DictionaryPageHeader, PageType as ThriftPageType};
    use std::io::Cursor;

    fn descriptor(repetition: Repetition, max_def: i16, max_rep: i16) -> ColumnDescriptor {
        ColumnDescriptor::new(
            PhysicalType::Int32,
            false,
            repetition,
            vec!["a".to_string()],
            max_def,
            max_rep,
        )
    }

    fn write_v1_page(out: &mut Vec<u8>, num_values: i32, values: &[i32]) {
        let data_header = DataPageHeader::new(
            num_values,
            parquet_format_safe::Encoding::PLAIN,
            parquet_format_safe::Encoding::RLE,
            parquet_format_safe::Encoding::RLE,
            None,
        );
        let mut body = Vec::new();
        for v in values {
            body.extend_from_slice(&v.to_le_bytes());
        }
        let header = PageHeader::new(
            ThriftPageType::DATA_PAGE,
            body.len() as i32,
            body.len() as i32,
            None,
            Some(data_header),
            None,
            None,
            None,
        );
        write_header(out, &header);
        out.extend_from_slice(&body);
    }

    fn write_header(out: &mut Vec<u8>, header: &PageHeader) {
        use parquet_format_safe::thrift::protocol::TCompactOutputProtocol;
        let mut prot = TCompactOutputProtocol::new(out);
        header.write_to_out_protocol(&mut prot).unwrap();
    }

    /// Driven through the full chunk state machine: a single
    /// REQUIRED INT32 PLAIN V1 page of 5 values, then idempotent end-of-chunk.
    #[test]
    fn required_int32_single_page_then_end_of_chunk() {
        let mut bytes = Vec::new();
        write_v1_page(&mut bytes, 5, &[1, 2, 3, 4, 5]);
        let total = bytes.len() as i64;

        let column = descriptor(Repetition::Required, 0, 0);
        let chunk = ChunkMetaData::new(
            PhysicalType::Int32,
            Compression::Uncompressed,
            total,
            0,
            None,
            None,
        );
        let mut reader = ColumnChunkReader::new(Cursor::new(bytes), column, chunk).unwrap();

        let batch = reader.read_batch(10).unwrap();
        assert_eq!(batch.d_levels, vec![0, 0, 0, 0, 0]);
        assert_eq!(batch.r_levels, vec![0, 0, 0, 0, 0]);
        assert_eq!(
            batch.values,
            vec![
                Value::Int32(1),
                Value::Int32(2),
                Value::Int32(3),
                Value::Int32(4),
                Value::Int32(5)
            ]
        );

        let eof = reader.read_batch(10).unwrap();
        assert!(eof.is_empty());
        let eof_again = reader.read_batch(10).unwrap();
        assert!(eof_again.is_empty());
    }

    /// A chunk of 3 data pages is drained through repeated
    /// `read_batch` calls without the caller tracking page boundaries.
    #[test]
    fn advances_across_pages_without_caller_bookkeeping() {
        let mut bytes = Vec::new();
        write_v1_page(&mut bytes, 2, &[1, 2]);
        write_v1_page(&mut bytes, 2, &[3, 4]);
        write_v1_page(&mut bytes, 1, &[5]);
        let total = bytes.len() as i64;

        let column = descriptor(Repetition::Required, 0, 0);
        let chunk = ChunkMetaData::new(
            PhysicalType::Int32,
            Compression::Uncompressed,
            total,
            0,
            None,
            None,
        );
        let mut reader = ColumnChunkReader::new(Cursor::new(bytes), column, chunk).unwrap();

        let mut all_values = Vec::new();
        loop {
            let batch = reader.read_batch(2).unwrap();
            if batch.is_empty() {
                break;
            }
            all_values.extend(batch.values);
        }
        assert_eq!(
            all_values,
            vec![
                Value::Int32(1),
                Value::Int32(2),
                Value::Int32(3),
                Value::Int32(4),
                Value::Int32(5)
            ]
        );
    }

    /// Dictionary page ends before `dataPageOffset`; the reader
    /// must resynchronize to the declared offset rather than trust where the dictionary
    /// page actually ended.
    #[test]
    fn seeks_to_data_page_offset_after_noncontiguous_dictionary() {
        let dict_header = DictionaryPageHeader::new(2, parquet_format_safe::Encoding::PLAIN, None);
        let mut dict_body = Vec::new();
        dict_body.extend_from_slice(&10i32.to_le_bytes());
        dict_body.extend_from_slice(&20i32.to_le_bytes());
        let dict_page_header = PageHeader::new(
            ThriftPageType::DICTIONARY_PAGE,
            dict_body.len() as i32,
            dict_body.len() as i32,
            None,
            None,
            None,
            Some(dict_header),
            None,
        );

        let mut bytes = Vec::new();
        write_header(&mut bytes, &dict_page_header);
        bytes.extend_from_slice(&dict_body);
        let gap_start = bytes.len();
        bytes.extend_from_slice(&[0xAAu8; 5]); // padding gap before the data page
        let data_page_offset = bytes.len() as i64;
        assert!(data_page_offset as usize > gap_start);

        // index 0 -> dict[0] == 10, RLE-run-encoded at bit_width 1.
        let data_header = DataPageHeader::new(
            1,
            parquet_format_safe::Encoding::RLE_DICTIONARY,
            parquet_format_safe::Encoding::RLE,
            parquet_format_safe::Encoding::RLE,
            None,
        );
        let index_body = vec![1u8, 0b00000010, 0b00000000];
        let header = PageHeader::new(
            ThriftPageType::DATA_PAGE,
            index_body.len() as i32,
            index_body.len() as i32,
            None,
            Some(data_header),
            None,
            None,
            None,
        );
        write_header(&mut bytes, &header);
        bytes.extend_from_slice(&index_body);
        let total = bytes.len() as i64;

        let column = descriptor(Repetition::Required, 0, 0);
        let chunk = ChunkMetaData::new(
            PhysicalType::Int32,
            Compression::Uncompressed,
            total,
            data_page_offset,
            Some(0),
            None,
        );
        let mut reader = ColumnChunkReader::new(Cursor::new(bytes), column, chunk).unwrap();

        let batch = reader.read_batch(10).unwrap();
        assert_eq!(batch.values, vec![Value::Int32(10)]);
    }

    #[test]
    fn rejects_cross_file_chunk() {
        let column = descriptor(Repetition::Required, 0, 0);
        let chunk = ChunkMetaData::new(
            PhysicalType::Int32,
            Compression::Uncompressed,
            10,
            0,
            None,
            Some("other.parquet".to_string()),
        );
        assert!(ColumnChunkReader::new(Cursor::new(Vec::new()), column, chunk).is_err());
    }

    #[test]
    fn rejects_physical_type_mismatch() {
        let column = descriptor(Repetition::Required, 0, 0);
        let chunk = ChunkMetaData::new(
            PhysicalType::Int64,
            Compression::Uncompressed,
            10,
            0,
            None,
            None,
        );
        assert!(ColumnChunkReader::new(Cursor::new(Vec::new()), column, chunk).is_err());
    }

    /// Two consecutive dictionary pages.
    #[test]
    fn duplicate_dictionary_page_fails() {
        let dict_header = DictionaryPageHeader::new(1, parquet_format_safe::Encoding::PLAIN, None);
        let mut dict_body = Vec::new();
        dict_body.extend_from_slice(&1i32.to_le_bytes());
        let dict_page_header = PageHeader::new(
            ThriftPageType::DICTIONARY_PAGE,
            dict_body.len() as i32,
            dict_body.len() as i32,
            None,
            None,
            None,
            Some(dict_header),
            None,
        );

        let mut bytes = Vec::new();
        write_header(&mut bytes, &dict_page_header);
        bytes.extend_from_slice(&dict_body);
        // The chunk's declared data-page offset sits right after the first (only valid)
        // dictionary page, contiguous with it, so the post-dictionary resync in
        // `fetch_page` has nothing to skip and the second, duplicate dictionary page
        // below is actually seen as the next header.
        let data_page_offset = bytes.len() as i64;
        write_header(&mut bytes, &dict_page_header);
        bytes.extend_from_slice(&dict_body);
        let total = bytes.len() as i64;

        let column = descriptor(Repetition::Required, 0, 0);
        let chunk = ChunkMetaData::new(
            PhysicalType::Int32,
            Compression::Uncompressed,
            total,
            data_page_offset,
            Some(0),
            None,
        );
        let mut reader = ColumnChunkReader::new(Cursor::new(bytes), column, chunk).unwrap();
        assert!(matches!(
            reader.read_batch(10),
            Err(Error::DuplicateDictionary)
        ));
    }

    /// Error-injection scenario 6: a `RLE_DICTIONARY` data page with no prior dictionary.
    #[test]
    fn missing_dictionary_fails() {
        let data_header = DataPageHeader::new(
            1,
            parquet_format_safe::Encoding::RLE_DICTIONARY,
            parquet_format_safe::Encoding::RLE,
            parquet_format_safe::Encoding::RLE,
            None,
        );
        let body = vec![1u8, 0b00000011, 0];
        let header = PageHeader::new(
            ThriftPageType::DATA_PAGE,
            body.len() as i32,
            body.len() as i32,
            None,
            Some(data_header),
            None,
            None,
            None,
        );
        let mut bytes = Vec::new();
        write_header(&mut bytes, &header);
        bytes.extend_from_slice(&body);
        let total = bytes.len() as i64;

        let column = descriptor(Repetition::Required, 0, 0);
        let chunk = ChunkMetaData::new(
            PhysicalType::Int32,
            Compression::Uncompressed,
            total,
            0,
            None,
            None,
        );
        let mut reader = ColumnChunkReader::new(Cursor::new(bytes), column, chunk).unwrap();
        assert!(matches!(
            reader.read_batch(10),
            Err(Error::MissingDictionary)
        ));
    }

    /// Error-injection scenario 6: a V1 data header with `numValues=-1`.
    #[test]
    fn negative_num_values_fails() {
        let data_header = DataPageHeader::new(
            -1,
            parquet_format_safe::Encoding::PLAIN,
            parquet_format_safe::Encoding::RLE,
            parquet_format_safe::Encoding::RLE,
            None,
        );
        let header = PageHeader::new(
            ThriftPageType::DATA_PAGE,
            0,
            0,
            None,
            Some(data_header),
            None,
            None,
            None,
        );
        let mut bytes = Vec::new();
        write_header(&mut bytes, &header);
        let total = bytes.len() as i64;

        let column = descriptor(Repetition::Required, 0, 0);
        let chunk = ChunkMetaData::new(
            PhysicalType::Int32,
            Compression::Uncompressed,
            total,
            0,
            None,
            None,
        );
        let mut reader = ColumnChunkReader::new(Cursor::new(bytes), column, chunk).unwrap();
        assert!(matches!(reader.read_batch(10), Err(Error::InvalidSize(_))));
    }
}
