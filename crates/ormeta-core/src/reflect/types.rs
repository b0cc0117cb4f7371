//! Scalar classification of reflected value types.

use serde::Serialize;

/// Scalar data types a column value can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    /// Boolean value.
    Bool,
    /// 32-bit (or narrower) integer.
    Int32,
    /// 64-bit integer.
    Int64,
    /// 32-bit floating point.
    Float32,
    /// 64-bit floating point.
    Float64,
    /// UTF-8 text.
    String,
    /// Binary data.
    Bytes,
}

impl ScalarType {
    /// Check if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ScalarType::Int32 | ScalarType::Int64 | ScalarType::Float32 | ScalarType::Float64
        )
    }

    /// Check if this type is text. Only text columns carry a meaningful length.
    pub fn is_text(&self) -> bool {
        matches!(self, ScalarType::String)
    }
}
