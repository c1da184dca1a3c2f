//! Class definitions for the model graph
//!
//! This module contains the `ModelClass` struct and its owned `ModelAttribute`
//! properties. A class is keyed by its full name; attributes are keyed by name
//! within their owning class and kept in declaration order.

use efdesign_core::{AttributeId, ClassId, EngineError, EngineResult, Named, Validatable};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ModelClass
// ============================================================================

/// A persistent class in the entity model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelClass {
    /// Unique identifier for this class
    pub id: ClassId,

    /// Simple class name (e.g., "Order")
    pub name: String,

    /// Namespace the class lives in (may be empty)
    pub namespace: String,

    /// Attribute declarations emitted verbatim on the generated class
    pub custom_attributes: String,

    /// Extra interfaces the generated class implements
    pub custom_interfaces: String,

    /// Whether the class is abstract
    pub is_abstract: bool,

    /// Base class, by name; resolved outside the store
    pub base_class: String,

    /// Mapped table name
    pub table_name: String,

    /// Whether the class is a dependent (owned) type
    pub is_dependent_type: bool,

    /// Whether the generated class raises change notifications.
    /// Never written by import.
    #[serde(default)]
    pub implement_notify: bool,

    /// Properties of the class, keyed by name, in declaration order
    pub attributes: IndexMap<String, ModelAttribute>,
}

impl ModelClass {
    /// Create a new class with the given name and namespace
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            namespace: namespace.into(),
            custom_attributes: String::new(),
            custom_interfaces: String::new(),
            is_abstract: false,
            base_class: String::new(),
            table_name: String::new(),
            is_dependent_type: false,
            implement_notify: false,
            attributes: IndexMap::new(),
        }
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Mark as raising change notifications
    pub fn notifying(mut self) -> Self {
        self.implement_notify = true;
        self
    }

    /// Add an attribute (builder style)
    pub fn with_attribute(mut self, attribute: ModelAttribute) -> Self {
        self.attributes.insert(attribute.name.clone(), attribute);
        self
    }

    // ========================================================================
    // Attribute management
    // ========================================================================

    /// Append an attribute, keeping declaration order.
    ///
    /// Fails if an attribute with the same name already exists.
    pub fn add_attribute(&mut self, attribute: ModelAttribute) -> EngineResult<AttributeId> {
        if self.attributes.contains_key(&attribute.name) {
            return Err(EngineError::DuplicateAttribute {
                class: self.full_name(),
                attribute: attribute.name,
            });
        }
        let id = attribute.id;
        self.attributes.insert(attribute.name.clone(), attribute);
        Ok(id)
    }

    /// Get an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&ModelAttribute> {
        self.attributes.get(name)
    }

    /// Iterate attributes in declaration order
    pub fn attributes(&self) -> impl Iterator<Item = &ModelAttribute> {
        self.attributes.values()
    }

    /// Get the number of attributes
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Attributes that make up the identity of the class
    pub fn identity_attributes(&self) -> impl Iterator<Item = &ModelAttribute> {
        self.attributes.values().filter(|a| a.is_identity)
    }
}

impl Named for ModelClass {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl Validatable for ModelClass {
    fn validate(&self) -> EngineResult<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::validation("Class name cannot be empty"));
        }

        for (key, attribute) in &self.attributes {
            if key != &attribute.name {
                return Err(EngineError::validation(format!(
                    "Attribute '{}' in class '{}' is indexed as '{}'",
                    attribute.name,
                    self.full_name(),
                    key
                )));
            }
            attribute.validate()?;
        }

        Ok(())
    }
}

// ============================================================================
// ModelAttribute
// ============================================================================

/// A scalar property of a `ModelClass`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelAttribute {
    /// Unique identifier for this attribute
    pub id: AttributeId,

    /// Property name, unique within the owning class
    pub name: String,

    /// Type name as declared (e.g., "String", "Int32")
    #[serde(rename = "type")]
    pub type_name: String,

    /// Attribute declarations emitted verbatim on the generated property
    pub custom_attributes: String,

    /// Whether the column is indexed
    pub indexed: bool,

    /// Whether a value is required
    pub required: bool,

    /// Maximum string length
    pub max_length: Option<i32>,

    /// Minimum string length
    pub min_length: Option<i32>,

    /// Whether the attribute is part of the class identity
    pub is_identity: bool,
}

impl ModelAttribute {
    /// Create a new attribute
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            type_name: type_name.into(),
            custom_attributes: String::new(),
            indexed: false,
            required: false,
            max_length: None,
            min_length: None,
            is_identity: false,
        }
    }

    /// Mark as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark as identity
    pub fn identity(mut self) -> Self {
        self.is_identity = true;
        self.required = true;
        self
    }

    /// Set the string length bounds
    pub fn with_length(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }
}

impl Validatable for ModelAttribute {
    fn validate(&self) -> EngineResult<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::validation("Attribute name cannot be empty"));
        }

        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(EngineError::validation(format!(
                    "Attribute '{}' has min length {} greater than max length {}",
                    self.name, min, max
                )));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
