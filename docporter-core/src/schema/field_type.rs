//! Value-kind classification and type unification.
//!
//! BSON values are classified into a closed set of kinds so that every
//! "switch on type" downstream is an exhaustive match. Unification combines
//! two observed kinds for the same field into one inferred kind using a
//! small set of widening rules.

use bson::Bson;

/// The kind of a document field value, as seen by the schema analyzer.
///
/// BSON types outside this set (binary data, timestamps, Decimal128,
/// regular expressions, and the deprecated shell types) classify as
/// [`FieldType::String`]: they export as serialized text and take the
/// text column type in both SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Explicit null
    Null,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// IEEE 754 double
    Double,
    /// Boolean
    Boolean,
    /// UTC datetime with millisecond precision
    DateTime,
    /// 12-byte object identifier, rendered as a hex string
    ObjectId,
    /// UTF-8 string
    String,
    /// Array of values
    Array,
    /// Nested document
    Document,
}

impl FieldType {
    /// Classifies a BSON value.
    pub fn of(value: &Bson) -> Self {
        match value {
            Bson::Null => Self::Null,
            Bson::Int32(_) => Self::Int32,
            Bson::Int64(_) => Self::Int64,
            Bson::Double(_) => Self::Double,
            Bson::Boolean(_) => Self::Boolean,
            Bson::DateTime(_) => Self::DateTime,
            Bson::ObjectId(_) => Self::ObjectId,
            Bson::String(_) => Self::String,
            Bson::Array(_) => Self::Array,
            Bson::Document(_) => Self::Document,
            // Everything else exports as serialized text
            Bson::Binary(_)
            | Bson::Timestamp(_)
            | Bson::Decimal128(_)
            | Bson::RegularExpression(_)
            | Bson::JavaScriptCode(_)
            | Bson::JavaScriptCodeWithScope(_)
            | Bson::Symbol(_)
            | Bson::MinKey
            | Bson::MaxKey
            | Bson::Undefined
            | Bson::DbPointer(_) => Self::String,
        }
    }

    /// Combines this kind with a newly observed kind for the same field.
    ///
    /// Rules, in order:
    /// - identical kinds are unchanged
    /// - String absorbs any numeric kind (text can carry any serialized
    ///   value losslessly)
    /// - Int32 widens to Int64
    /// - either integer widens to Double
    /// - any other mismatch keeps the left operand — the
    ///   keep-first-seen-on-unhandled-mismatch policy, which makes the
    ///   whole analysis best-effort rather than failing over one
    ///   inconsistent field
    ///
    /// `self` must be the previously inferred kind and `other` the newly
    /// observed one; the fallback rule is the only one sensitive to order.
    #[must_use]
    pub fn unify(self, other: Self) -> Self {
        use FieldType::{Double, Int32, Int64, String};

        match (self, other) {
            (a, b) if a == b => a,
            (String, Int32 | Int64 | Double) | (Int32 | Int64 | Double, String) => String,
            (Int32, Int64) | (Int64, Int32) => Int64,
            (Int32 | Int64, Double) | (Double, Int32 | Int64) => Double,
            // keep-first-seen policy for every unhandled combination
            (first, _) => first,
        }
    }

    /// Human-readable kind name for diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Double => "double",
            Self::Boolean => "boolean",
            Self::DateTime => "datetime",
            Self::ObjectId => "objectId",
            Self::String => "string",
            Self::Array => "array",
            Self::Document => "document",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
