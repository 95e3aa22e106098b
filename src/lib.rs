#![forbid(unsafe_code)]
//! A column-chunk page reader for a Parquet-style columnar file format.
//!
//! This crate turns the byte stream of a single column chunk (an optional dictionary
//! page followed by one or more data pages) into a sequence of decoded values annotated
//! with definition and repetition levels. The outer file-footer/metadata parser, the
//! schema/column catalog, the thrift header deserializer, and all writer paths are
//! out of scope for this crate.

#[macro_use]
pub mod error;
pub mod compression;
pub mod encoding;
pub mod metadata;
mod parquet_bridge;
pub mod page_reader;

pub use error::{Error, Result};
