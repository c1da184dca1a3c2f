//! # Entity Merger
//!
//! Merges parsed classes, properties, enumerations and enumeration values into
//! a [`ModelStore`] by structural key.
//!
//! A record whose key is unknown becomes a new element built with every field
//! in place before it is inserted. A record whose key already exists
//! overwrites every mutable field of the existing element. The one field never
//! written is an enumeration's value type, which belongs to the designer and
//! not to the parsed assembly.
//!
//! Association records are merged by the same [`ModelMerger`]; see
//! `association_merge`.

use crate::document::{ParsedClass, ParsedEnum, ParsedEnumValue, ParsedModel, ParsedProperty};
use efdesign_core::{ClassId, EngineResult, EnumId};
use efdesign_ir::{ModelAttribute, ModelClass, ModelEnum, ModelEnumValue, ModelStore};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

// ============================================================================
// MergeReport
// ============================================================================

/// Diagnostic counts collected during a merge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub classes_created: usize,
    pub classes_updated: usize,
    pub attributes_created: usize,
    pub attributes_updated: usize,
    pub enums_created: usize,
    pub enums_updated: usize,
    pub enum_values_created: usize,
    pub enum_values_updated: usize,
    pub associations_created: usize,
    pub duplicate_associations: usize,
    pub unresolved_associations: usize,
}

impl MergeReport {
    /// Check if the merge changed nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Total number of elements created
    pub fn created(&self) -> usize {
        self.classes_created
            + self.attributes_created
            + self.enums_created
            + self.enum_values_created
            + self.associations_created
    }

    /// Total number of elements updated in place
    pub fn updated(&self) -> usize {
        self.classes_updated
            + self.attributes_updated
            + self.enums_updated
            + self.enum_values_updated
    }

    /// Total number of association records dropped
    pub fn skipped(&self) -> usize {
        self.duplicate_associations + self.unresolved_associations
    }
}

impl fmt::Display for MergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "classes +{}/~{}, attributes +{}/~{}, enums +{}/~{}, values +{}/~{}, \
             associations +{} ({} duplicate, {} unresolved)",
            self.classes_created,
            self.classes_updated,
            self.attributes_created,
            self.attributes_updated,
            self.enums_created,
            self.enums_updated,
            self.enum_values_created,
            self.enum_values_updated,
            self.associations_created,
            self.duplicate_associations,
            self.unresolved_associations,
        )
    }
}

// ============================================================================
// ModelMerger
// ============================================================================

/// Merges parsed records into a store
pub struct ModelMerger<'a> {
    pub(crate) store: &'a mut ModelStore,
    pub(crate) report: MergeReport,
}

impl<'a> ModelMerger<'a> {
    /// Create a merger writing into the given store
    pub fn new(store: &'a mut ModelStore) -> Self {
        Self {
            store,
            report: MergeReport::default(),
        }
    }

    /// Counts collected so far
    pub fn report(&self) -> &MergeReport {
        &self.report
    }

    /// Finish merging and return the counts
    pub fn into_report(self) -> MergeReport {
        self.report
    }

    // ========================================================================
    // Root
    // ========================================================================

    /// Overwrite the root metadata
    pub fn merge_root(&mut self, document: &ParsedModel) {
        self.store.root.entity_container_name = document.entity_container_name.clone();
        self.store.root.namespace = document.namespace.clone();
        self.store.touch();
    }

    // ========================================================================
    // Classes
    // ========================================================================

    /// Merge a class record and its properties.
    ///
    /// Association records of the class are not touched here.
    pub fn merge_class(&mut self, data: &ParsedClass) -> EngineResult<ClassId> {
        let existing = self.store.find_class(&data.full_name()).map(|c| c.id);

        match existing {
            Some(id) => {
                let report = &mut self.report;
                self.store.update_class(id, |class| {
                    apply_class_fields(class, data);
                    merge_properties(class, &data.properties, report);
                })?;
                self.report.classes_updated += 1;
                Ok(id)
            }
            None => {
                let mut class = ModelClass::new(&data.name, &data.namespace);
                apply_class_fields(&mut class, data);
                merge_properties(&mut class, &data.properties, &mut self.report);

                let id = self.store.add_class(class)?;
                self.report.classes_created += 1;
                Ok(id)
            }
        }
    }

    // ========================================================================
    // Enumerations
    // ========================================================================

    /// Merge an enumeration record and its values
    pub fn merge_enum(&mut self, data: &ParsedEnum) -> EngineResult<EnumId> {
        let full_name = data.full_name();
        let existing = self
            .store
            .find_enum(&full_name)
            .map(|e| (e.id, e.value_type.clone()));

        match existing {
            Some((id, value_type)) => {
                skip_value_type(&full_name, &value_type, data);

                let report = &mut self.report;
                self.store.update_enum(id, |model_enum| {
                    apply_enum_fields(model_enum, data);
                    merge_enum_values(&mut model_enum.values, &data.values, report);
                })?;
                self.report.enums_updated += 1;
                Ok(id)
            }
            None => {
                let mut model_enum = ModelEnum::new(&data.name, &data.namespace);
                skip_value_type(&full_name, &model_enum.value_type, data);
                apply_enum_fields(&mut model_enum, data);
                merge_enum_values(&mut model_enum.values, &data.values, &mut self.report);

                let id = self.store.add_enum(model_enum)?;
                self.report.enums_created += 1;
                Ok(id)
            }
        }
    }
}

// ============================================================================
// Field application
// ============================================================================

fn apply_class_fields(class: &mut ModelClass, data: &ParsedClass) {
    class.name = data.name.clone();
    class.namespace = data.namespace.clone();
    class.custom_attributes = data.custom_attributes.clone();
    class.custom_interfaces = data.custom_interfaces.clone();
    class.is_abstract = data.is_abstract;
    class.base_class = data.base_class.clone();
    class.table_name = data.table_name.clone();
    class.is_dependent_type = data.is_dependent_type;
}

/// Merge properties in input order. A repeated name updates the attribute
/// matched by its first occurrence again.
fn merge_properties(class: &mut ModelClass, properties: &[ParsedProperty], report: &mut MergeReport) {
    for data in properties {
        match class.attributes.get_mut(&data.name) {
            Some(attribute) => {
                apply_property_fields(attribute, data);
                report.attributes_updated += 1;
            }
            None => {
                let mut attribute = ModelAttribute::new(&data.name, &data.type_name);
                apply_property_fields(&mut attribute, data);
                class.attributes.insert(data.name.clone(), attribute);
                report.attributes_created += 1;
            }
        }
    }
}

fn apply_property_fields(attribute: &mut ModelAttribute, data: &ParsedProperty) {
    attribute.name = data.name.clone();
    attribute.type_name = data.type_name.clone();
    attribute.custom_attributes = data.custom_attributes.clone();
    attribute.indexed = data.indexed;
    attribute.required = data.required;
    attribute.max_length = data.max_string_length;
    attribute.min_length = data.min_string_length;
    attribute.is_identity = data.is_identity;
}

fn apply_enum_fields(model_enum: &mut ModelEnum, data: &ParsedEnum) {
    model_enum.name = data.name.clone();
    model_enum.namespace = data.namespace.clone();
    model_enum.custom_attributes = data.custom_attributes.clone();
    model_enum.is_flags = data.is_flags;
}

fn merge_enum_values(
    values: &mut IndexMap<String, ModelEnumValue>,
    records: &[ParsedEnumValue],
    report: &mut MergeReport,
) {
    for data in records {
        match values.get_mut(&data.name) {
            Some(value) => {
                apply_enum_value_fields(value, data);
                report.enum_values_updated += 1;
            }
            None => {
                let mut value = ModelEnumValue::new(&data.name, &data.value);
                apply_enum_value_fields(&mut value, data);
                values.insert(data.name.clone(), value);
                report.enum_values_created += 1;
            }
        }
    }
}

fn apply_enum_value_fields(value: &mut ModelEnumValue, data: &ParsedEnumValue) {
    value.name = data.name.clone();
    value.value = data.value.clone();
    value.custom_attributes = data.custom_attributes.clone();
    value.display_text = data.display_text.clone();
}

// The value type is owned by the designer; the parsed one is never merged.
fn skip_value_type(full_name: &str, current: &str, data: &ParsedEnum) {
    if let Some(incoming) = data.value_type.as_deref() {
        if incoming != current {
            tracing::debug!(
                "Keeping value type {} of {} (parsed {})",
                current,
                full_name,
                incoming
            );
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
