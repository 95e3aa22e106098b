use crate::metadata::PhysicalType;
use crate::parquet_bridge::Repetition;

/// A descriptor for a leaf-level primitive column, supplied by the (out-of-scope)
/// schema/column catalog. This is the "column view" a reader needs before it can walk a
/// column chunk.
///
/// Grounded on `parquet2::metadata::ColumnDescriptor`, trimmed of the `ParquetType` tree
/// (schema catalog, out of scope) down to the handful of facts a page reader actually
/// consults.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    physical_type: PhysicalType,
    is_utf8: bool,
    repetition: Repetition,
    path: Vec<String>,
    max_def_level: i16,
    max_rep_level: i16,
}

impl ColumnDescriptor {
    /// Creates a new column descriptor.
    pub fn new(
        physical_type: PhysicalType,
        is_utf8: bool,
        repetition: Repetition,
        path: Vec<String>,
        max_def_level: i16,
        max_rep_level: i16,
    ) -> Self {
        Self {
            physical_type,
            is_utf8,
            repetition,
            path,
            max_def_level,
            max_rep_level,
        }
    }

    /// The physical type of this column's values.
    pub fn physical_type(&self) -> PhysicalType {
        self.physical_type
    }

    /// `true` if the column's converted/logical type marks it as UTF-8 text.
    pub fn is_utf8(&self) -> bool {
        self.is_utf8
    }

    /// The column's repetition category.
    pub fn repetition(&self) -> Repetition {
        self.repetition
    }

    /// The column's flat path, e.g. `["a", "b", "c"]` for `a.b.c`.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// `true` if this column is nested inside a group (has more than one path segment).
    pub fn is_nested(&self) -> bool {
        self.path.len() > 1
    }

    /// The maximum definition level for this column.
    pub fn max_def_level(&self) -> i16 {
        self.max_def_level
    }

    /// The maximum repetition level for this column.
    pub fn max_rep_level(&self) -> i16 {
        self.max_rep_level
    }
}
