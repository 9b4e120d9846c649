//! Schema unification for semi-structured document sets.
//!
//! MongoDB collections carry no declared schema, so a relational export has
//! to infer one. This module provides:
//! - A closed value-kind model ([`FieldType`]) over the BSON type space
//! - Pairwise type unification with explicit widening rules
//! - A streaming analyzer that folds a document sequence into an ordered
//!   column set, honoring a configurable field exclusion list
//!
//! The analysis looks at top-level fields only; a nested document or array
//! is a value kind of its own, exported as serialized text.

mod analyzer;
mod field_type;

pub use analyzer::{ColumnDescriptor, SchemaAnalyzer};
pub use field_type::FieldType;

use std::collections::HashSet;

/// Housekeeping and audit fields excluded from relational exports by default.
pub const DEFAULT_SKIP_FIELDS: &[&str] = &[
    "_id",
    "_v",
    "__v",
    "TDtUpdate",
    "updatedAt",
    "createdAt",
    "createTime",
    "updateTime",
    "MenuType2",
];

/// Set of field names excluded from column analysis and SQL emission.
///
/// The default set covers common bookkeeping fields (`_id`, Mongoose
/// version keys, audit timestamps) that carry no meaning in a relational
/// export. Callers can extend the set, or start from [`SkipFields::none`]
/// to export every field. Matching is exact and case-sensitive.
#[derive(Debug, Clone)]
pub struct SkipFields(HashSet<String>);

impl Default for SkipFields {
    fn default() -> Self {
        Self(DEFAULT_SKIP_FIELDS.iter().map(|s| (*s).to_string()).collect())
    }
}

impl SkipFields {
    /// Creates an empty exclusion set.
    pub fn none() -> Self {
        Self(HashSet::new())
    }

    /// Returns true if `name` is excluded.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Adds a field name to the exclusion set.
    pub fn insert(&mut self, name: impl Into<String>) {
        self.0.insert(name.into());
    }

    /// Number of excluded field names.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no fields are excluded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<String> for SkipFields {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_skip_fields() {
        let skip = SkipFields::default();
        assert!(skip.contains("_id"));
        assert!(skip.contains("__v"));
        assert!(skip.contains("updatedAt"));
        assert!(!skip.contains("name"));
        assert_eq!(skip.len(), DEFAULT_SKIP_FIELDS.len());
    }

    #[test]
    fn test_skip_fields_are_case_sensitive() {
        let skip = SkipFields::default();
        assert!(skip.contains("createdAt"));
        assert!(!skip.contains("CreatedAt"));
    }

    #[test]
    fn test_none_and_insert() {
        let mut skip = SkipFields::none();
        assert!(skip.is_empty());
        assert!(!skip.contains("_id"));

        skip.insert("internalFlag");
        assert!(skip.contains("internalFlag"));
        assert_eq!(skip.len(), 1);
    }
}
