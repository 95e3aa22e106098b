use crate::metadata::PhysicalType;
use crate::parquet_bridge::Compression;

/// The slice of a row-group's column-chunk metadata a page reader needs, supplied by the
/// (out-of-scope) file-footer parser.
///
/// Grounded on `parquet2::read::page::reader::PageMetaData` / `ColumnChunkMetaData`, trimmed
/// to the per-chunk fields a thrift `ColumnMetaData` struct carries.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkMetaData {
    physical_type: PhysicalType,
    compression: Compression,
    total_compressed_size: i64,
    data_page_offset: i64,
    dictionary_page_offset: Option<i64>,
    file_path: Option<String>,
}

impl ChunkMetaData {
    /// Creates new chunk metadata.
    pub fn new(
        physical_type: PhysicalType,
        compression: Compression,
        total_compressed_size: i64,
        data_page_offset: i64,
        dictionary_page_offset: Option<i64>,
        file_path: Option<String>,
    ) -> Self {
        Self {
            physical_type,
            compression,
            total_compressed_size,
            data_page_offset,
            dictionary_page_offset,
            file_path,
        }
    }

    /// The physical type recorded for this chunk; must equal the column descriptor's.
    pub fn physical_type(&self) -> PhysicalType {
        self.physical_type
    }

    /// The block-compression codec used for every page in this chunk.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Total compressed byte length of the chunk (dictionary page, if any, plus data pages).
    pub fn total_compressed_size(&self) -> i64 {
        self.total_compressed_size
    }

    /// Byte offset of the first data page.
    pub fn data_page_offset(&self) -> i64 {
        self.data_page_offset
    }

    /// Byte offset of the dictionary page, if the chunk has one.
    pub fn dictionary_page_offset(&self) -> Option<i64> {
        self.dictionary_page_offset
    }

    /// The file this chunk's bytes live in, if not the current one. Cross-file chunks are
    /// unsupported; a present value is always rejected by `ColumnChunkReader::new`.
    pub fn file_path(&self) -> Option<&str> {
        self.file_path.as_deref()
    }

    /// The offset a reader should seek to before reading the first page: the dictionary
    /// offset if present, else the data-page offset.
    pub fn start_offset(&self) -> i64 {
        self.dictionary_page_offset.unwrap_or(self.data_page_offset)
    }
}
