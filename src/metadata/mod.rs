//! Caller-supplied description types: the "column view" and "chunk metadata" collaborators a
//! reader needs before it can walk a column chunk. The outer file-footer/schema-catalog parser
//! that would normally produce these (thrift `FileMetaData`, the `SchemaElement` tree, sort
//! order, column indexes) is out of scope for this crate.

mod column_chunk_metadata;
mod column_descriptor;
mod physical_type;

pub use column_chunk_metadata::ChunkMetaData;
pub use column_descriptor::ColumnDescriptor;
pub use physical_type::PhysicalType;

/// Re-exported here (rather than only from `parquet_bridge`, which is private) because
/// [`ColumnDescriptor::repetition`] hands one back across the crate's public boundary, the same
/// reason `Compression` and `Encoding` are re-exported from `compression`/`encoding`.
pub use crate::parquet_bridge::Repetition;
