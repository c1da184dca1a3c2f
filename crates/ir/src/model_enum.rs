//! Enumeration definitions for the model graph

use efdesign_core::{EngineError, EngineResult, EnumId, EnumValueId, Named, Validatable};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Underlying type of an enumeration when none has been chosen
pub const DEFAULT_ENUM_VALUE_TYPE: &str = "Int32";

// ============================================================================
// ModelEnum
// ============================================================================

/// An enumeration in the entity model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEnum {
    /// Unique identifier for this enumeration
    pub id: EnumId,

    /// Simple enumeration name
    pub name: String,

    /// Namespace the enumeration lives in (may be empty)
    pub namespace: String,

    /// Attribute declarations emitted verbatim on the generated enum
    pub custom_attributes: String,

    /// Whether values combine as bit flags
    pub is_flags: bool,

    /// Underlying integral type. Managed by the designer, never by import.
    pub value_type: String,

    /// Values keyed by name, in declaration order
    pub values: IndexMap<String, ModelEnumValue>,
}

impl ModelEnum {
    /// Create a new enumeration
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            namespace: namespace.into(),
            custom_attributes: String::new(),
            is_flags: false,
            value_type: DEFAULT_ENUM_VALUE_TYPE.to_string(),
            values: IndexMap::new(),
        }
    }

    /// Mark as a flags enumeration
    pub fn flags(mut self) -> Self {
        self.is_flags = true;
        self
    }

    /// Append a value, keeping declaration order
    pub fn add_value(&mut self, value: ModelEnumValue) -> EngineResult<EnumValueId> {
        if self.values.contains_key(&value.name) {
            return Err(EngineError::DuplicateEnumValue {
                enumeration: self.full_name(),
                value: value.name,
            });
        }
        let id = value.id;
        self.values.insert(value.name.clone(), value);
        Ok(id)
    }

    /// Get a value by name
    pub fn value(&self, name: &str) -> Option<&ModelEnumValue> {
        self.values.get(name)
    }

    /// Iterate values in declaration order
    pub fn values(&self) -> impl Iterator<Item = &ModelEnumValue> {
        self.values.values()
    }

    /// Get the number of values
    pub fn value_count(&self) -> usize {
        self.values.len()
    }
}

impl Named for ModelEnum {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl Validatable for ModelEnum {
    fn validate(&self) -> EngineResult<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::validation("Enumeration name cannot be empty"));
        }

        for (key, value) in &self.values {
            if key != &value.name || value.name.trim().is_empty() {
                return Err(EngineError::validation(format!(
                    "Enumeration '{}' has an invalid value entry '{}'",
                    self.full_name(),
                    key
                )));
            }
        }

        Ok(())
    }
}

// ============================================================================
// ModelEnumValue
// ============================================================================

/// A single member of a `ModelEnum`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEnumValue {
    /// Unique identifier for this value
    pub id: EnumValueId,

    /// Member name, unique within the owning enumeration
    pub name: String,

    /// Initializer, numeric or symbolic (empty when implicit)
    pub value: String,

    /// Attribute declarations emitted verbatim on the generated member
    pub custom_attributes: String,

    /// Text shown to end users
    pub display_text: String,
}

impl ModelEnumValue {
    /// Create a new enumeration value
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            value: value.into(),
            custom_attributes: String::new(),
            display_text: String::new(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_new() {
        let model_enum = ModelEnum::new("Status", "Sales").flags();
        assert_eq!(model_enum.full_name(), "Sales.Status");
        assert_eq!(model_enum.value_type, DEFAULT_ENUM_VALUE_TYPE);
        assert!(model_enum.is_flags);
    }

    #[test]
    fn test_enum_values_keep_order() {
        let mut model_enum = ModelEnum::new("Status", "Sales");
        model_enum.add_value(ModelEnumValue::new("Open", "0")).unwrap();
        model_enum.add_value(ModelEnumValue::new("Closed", "1")).unwrap();

        let names: Vec<&str> = model_enum.values().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Open", "Closed"]);
        assert!(model_enum.validate().is_ok());
    }

    #[test]
    fn test_enum_duplicate_value() {
        let mut model_enum = ModelEnum::new("Status", "Sales");
        model_enum.add_value(ModelEnumValue::new("Open", "0")).unwrap();

        let result = model_enum.add_value(ModelEnumValue::new("Open", "5"));
        assert!(matches!(result, Err(EngineError::DuplicateEnumValue { .. })));
        assert_eq!(model_enum.value("Open").unwrap().value, "0");
    }
}
