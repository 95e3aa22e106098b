//! Column-chunk page reader: turns the byte stream of a single column
//! chunk into a sequence of decoded values annotated with definition and repetition levels.
//!
//! Ordered leaves-first, matching the component table: `offset` (C1) and `framed` (C2)
//! underlie everything; `levels` (C3), `decoder`/`select` (C4/C5) and `dictionary` (C6) are
//! assembled by `data_page` (C7) into pages, which `chunk` (C8) sequences end to end.

pub mod chunk;
pub mod data_page;
pub mod decoder;
pub mod dictionary;
pub mod framed;
pub mod levels;
pub mod offset;
pub mod select;
pub mod value;

pub use chunk::ColumnChunkReader;
pub use data_page::Batch;
pub use value::Value;
