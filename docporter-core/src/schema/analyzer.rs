//! Column analysis over a sequence of documents.

use super::{FieldType, SkipFields};
use bson::Document;
use std::collections::HashMap;

/// One inferred column of the relational projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Field name, exactly as it appears in the documents
    pub name: String,
    /// Unified value kind across every observation of the field
    pub field_type: FieldType,
}

/// Streaming analyzer that folds documents into an ordered column set.
///
/// Feed documents with [`SchemaAnalyzer::analyze_document`], then call
/// [`SchemaAnalyzer::finalize`] to obtain the columns in first-seen field
/// order. Fields in the configured [`SkipFields`] set are never recorded.
///
/// Unification is applied in encounter order, left-to-right: the running
/// kind for a field is combined with each new observation as it arrives,
/// not as a set-commutative reduction. With the fallback rule in
/// [`FieldType::unify`] this makes the result order-sensitive by design.
#[derive(Debug)]
pub struct SchemaAnalyzer {
    skip_fields: SkipFields,
    /// Field name -> running kind and first-seen position
    columns: HashMap<String, ColumnSlot>,
    next_position: u32,
}

#[derive(Debug, Clone, Copy)]
struct ColumnSlot {
    field_type: FieldType,
    first_seen: u32,
}

impl Default for SchemaAnalyzer {
    fn default() -> Self {
        Self::new(SkipFields::default())
    }
}

impl SchemaAnalyzer {
    /// Creates an analyzer with the given exclusion set.
    pub fn new(skip_fields: SkipFields) -> Self {
        Self {
            skip_fields,
            columns: HashMap::new(),
            next_position: 0,
        }
    }

    /// Folds one document's top-level fields into the running column set.
    pub fn analyze_document(&mut self, doc: &Document) {
        for (name, value) in doc {
            if self.skip_fields.contains(name) {
                continue;
            }

            let observed = FieldType::of(value);
            match self.columns.get_mut(name) {
                Some(slot) => {
                    slot.field_type = slot.field_type.unify(observed);
                }
                None => {
                    let position = self.next_position;
                    self.next_position = self.next_position.saturating_add(1);
                    self.columns.insert(
                        name.clone(),
                        ColumnSlot {
                            field_type: observed,
                            first_seen: position,
                        },
                    );
                }
            }
        }
    }

    /// Consumes the analyzer and returns columns in first-seen order.
    pub fn finalize(self) -> Vec<ColumnDescriptor> {
        let mut slots: Vec<(String, ColumnSlot)> = self.columns.into_iter().collect();
        slots.sort_by_key(|(_, slot)| slot.first_seen);
        slots
            .into_iter()
            .map(|(name, slot)| ColumnDescriptor {
                name,
                field_type: slot.field_type,
            })
            .collect()
    }

    /// Convenience: analyzes a whole document slice in one call.
    pub fn analyze_all(documents: &[Document], skip_fields: SkipFields) -> Vec<ColumnDescriptor> {
        let mut analyzer = Self::new(skip_fields);
        for doc in documents {
            analyzer.analyze_document(doc);
        }
        analyzer.finalize()
    }
}
