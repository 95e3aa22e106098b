//! Error taxonomy for the column-chunk page reader.

/// The error type returned by this crate.
#[derive(Debug)]
pub enum Error {
    /// A page header was missing its expected sub-record, or carried a disallowed value
    /// (e.g. a dictionary page encoded with something other than PLAIN/PLAIN_DICTIONARY).
    MalformedHeader(String),
    /// A declared size or length was negative where the format requires `>= 0`.
    InvalidSize(String),
    /// Chunk metadata disagreed with the column descriptor, was missing, or referenced
    /// another file.
    MetadataMismatch(String),
    /// A second dictionary page was seen within the same chunk.
    DuplicateDictionary,
    /// A `RLE_DICTIONARY`-encoded page was read before any dictionary page.
    MissingDictionary,
    /// A dictionary index was `>=` the dictionary length.
    DictionaryOutOfRange,
    /// The physical type has no known meaning to this reader.
    UnsupportedType(String),
    /// The (physical type, encoding) pair has no decoder.
    UnsupportedEncodingForType(String),
    /// The underlying stream ended, or a decoder produced fewer values than requested,
    /// before a record was fully read.
    ShortRead(String),
    /// A page type other than DATA_PAGE / DATA_PAGE_V2 / DICTIONARY_PAGE was seen where a
    /// page was expected.
    UnexpectedPageType(String),
    /// A FIXED_LEN_BYTE_ARRAY column has no declared type length.
    MissingTypeLength,
    /// Pass-through I/O error from the underlying byte source.
    Io(std::io::Error),
    /// Pass-through error from the Thrift compact-protocol header decoder.
    Thrift(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MalformedHeader(msg) => write!(f, "malformed page header: {msg}"),
            Error::InvalidSize(msg) => write!(f, "invalid size: {msg}"),
            Error::MetadataMismatch(msg) => write!(f, "metadata mismatch: {msg}"),
            Error::DuplicateDictionary => {
                write!(f, "chunk carries more than one dictionary page")
            }
            Error::MissingDictionary => {
                write!(f, "dictionary-encoded page with no prior dictionary page")
            }
            Error::DictionaryOutOfRange => write!(f, "dictionary index out of range"),
            Error::UnsupportedType(msg) => write!(f, "unsupported type: {msg}"),
            Error::UnsupportedEncodingForType(msg) => {
                write!(f, "unsupported encoding for type: {msg}")
            }
            Error::ShortRead(msg) => write!(f, "short read: {msg}"),
            Error::UnexpectedPageType(msg) => write!(f, "unexpected page type: {msg}"),
            Error::MissingTypeLength => {
                write!(f, "PLAIN FIXED_LEN_BYTE_ARRAY requires a declared type length")
            }
            Error::Io(e) => write!(f, "underlying I/O error: {e}"),
            Error::Thrift(msg) => write!(f, "underlying thrift error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<parquet_format_safe::thrift::Error> for Error {
    fn from(e: parquet_format_safe::thrift::Error) -> Self {
        Error::Thrift(e.to_string())
    }
}

/// A specialized `Result` for this crate's errors.
pub type Result<T> = std::result::Result<T, Error>;

macro_rules! invalid_size {
    ($fmt:expr) => ($crate::error::Error::InvalidSize($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => ($crate::error::Error::InvalidSize(format!($fmt, $($args),*)));
}

macro_rules! malformed_header {
    ($fmt:expr) => ($crate::error::Error::MalformedHeader($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => ($crate::error::Error::MalformedHeader(format!($fmt, $($args),*)));
}

macro_rules! metadata_mismatch {
    ($fmt:expr) => ($crate::error::Error::MetadataMismatch($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => ($crate::error::Error::MetadataMismatch(format!($fmt, $($args),*)));
}

macro_rules! unsupported_type {
    ($fmt:expr) => ($crate::error::Error::UnsupportedType($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => ($crate::error::Error::UnsupportedType(format!($fmt, $($args),*)));
}

macro_rules! unsupported_encoding {
    ($fmt:expr) => ($crate::error::Error::UnsupportedEncodingForType($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => ($crate::error::Error::UnsupportedEncodingForType(format!($fmt, $($args),*)));
}

macro_rules! short_read {
    ($fmt:expr) => ($crate::error::Error::ShortRead($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => ($crate::error::Error::ShortRead(format!($fmt, $($args),*)));
}
