/// The physical on-disk representation of a column's values.
///
/// `FixedLenByteArray` carries the declared byte length `L`; PLAIN decoding of that variant
/// fails with [`crate::error::Error::MissingTypeLength`] if `L` were ever absent, which the
/// type itself makes unrepresentable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhysicalType {
    Boolean,
    Int32,
    Int64,
    Int96,
    Float,
    Double,
    ByteArray,
    FixedLenByteArray(i32),
}
