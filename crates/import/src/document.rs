//! The parsed input document
//!
//! External parser tools reverse-engineer a compiled assembly and write this
//! document as JSON with PascalCase member names. Every member is optional and
//! `null` is read as the member's default, since the tools emit whatever the
//! assembly happened to declare. Class and enumeration references inside the
//! document are untrusted: they may name elements that are not in the batch.

use crate::multiplicity::ParsedMultiplicity;
use efdesign_core::{EngineError, EngineResult, full_name};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// Read `null` as the type's default
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read a number, a string or `null` as a string
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(serde_json::Number),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(number)) => number.to_string(),
        Some(Raw::Text(text)) => text,
        None => String::new(),
    })
}

// ============================================================================
// Root
// ============================================================================

/// Root of a parsed document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ParsedModel {
    #[serde(deserialize_with = "nullable")]
    pub entity_container_name: String,

    #[serde(deserialize_with = "nullable")]
    pub namespace: String,

    #[serde(deserialize_with = "nullable")]
    pub classes: Vec<ParsedClass>,

    #[serde(deserialize_with = "nullable")]
    pub enumerations: Vec<ParsedEnum>,
}

impl ParsedModel {
    /// Parse a document from JSON text
    pub fn from_json(json: &str) -> EngineResult<Self> {
        serde_json::from_str(json).map_err(|e| EngineError::invalid_document(e.to_string()))
    }

    /// Read and parse a document file
    pub fn from_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| EngineError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json(&json)
    }
}

// ============================================================================
// Classes
// ============================================================================

/// A class record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ParsedClass {
    #[serde(deserialize_with = "nullable")]
    pub name: String,

    #[serde(deserialize_with = "nullable")]
    pub namespace: String,

    #[serde(deserialize_with = "nullable")]
    pub custom_attributes: String,

    #[serde(deserialize_with = "nullable")]
    pub custom_interfaces: String,

    #[serde(deserialize_with = "nullable")]
    pub is_abstract: bool,

    #[serde(deserialize_with = "nullable")]
    pub base_class: String,

    #[serde(deserialize_with = "nullable")]
    pub table_name: String,

    #[serde(deserialize_with = "nullable")]
    pub is_dependent_type: bool,

    #[serde(deserialize_with = "nullable")]
    pub properties: Vec<ParsedProperty>,

    #[serde(deserialize_with = "nullable")]
    pub unidirectional_associations: Vec<ParsedUnidirectionalAssociation>,

    #[serde(deserialize_with = "nullable")]
    pub bidirectional_associations: Vec<ParsedBidirectionalAssociation>,
}

impl ParsedClass {
    /// Create a class record with the given name and namespace
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    /// Structural key of the class
    pub fn full_name(&self) -> String {
        full_name(&self.namespace, &self.name)
    }
}

/// A property record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ParsedProperty {
    #[serde(deserialize_with = "nullable")]
    pub type_name: String,

    #[serde(deserialize_with = "nullable")]
    pub name: String,

    #[serde(deserialize_with = "nullable")]
    pub custom_attributes: String,

    #[serde(deserialize_with = "nullable")]
    pub indexed: bool,

    #[serde(deserialize_with = "nullable")]
    pub required: bool,

    pub max_string_length: Option<i32>,

    pub min_string_length: Option<i32>,

    #[serde(deserialize_with = "nullable")]
    pub is_identity: bool,
}

impl ParsedProperty {
    /// Create a property record
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            ..Default::default()
        }
    }
}

// ============================================================================
// Associations
// ============================================================================

/// An association navigable from the source only
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ParsedUnidirectionalAssociation {
    #[serde(deserialize_with = "nullable")]
    pub source_class_name: String,

    #[serde(deserialize_with = "nullable")]
    pub source_class_namespace: String,

    #[serde(deserialize_with = "nullable")]
    pub target_class_name: String,

    #[serde(deserialize_with = "nullable")]
    pub target_class_namespace: String,

    #[serde(deserialize_with = "nullable")]
    pub source_multiplicity: ParsedMultiplicity,

    #[serde(deserialize_with = "nullable")]
    pub target_multiplicity: ParsedMultiplicity,

    #[serde(deserialize_with = "nullable")]
    pub target_property_name: String,

    #[serde(deserialize_with = "nullable")]
    pub target_summary: String,

    #[serde(deserialize_with = "nullable")]
    pub target_description: String,
}

impl ParsedUnidirectionalAssociation {
    /// Structural key of the source class
    pub fn source_class_full_name(&self) -> String {
        full_name(&self.source_class_namespace, &self.source_class_name)
    }

    /// Structural key of the target class
    pub fn target_class_full_name(&self) -> String {
        full_name(&self.target_class_namespace, &self.target_class_name)
    }
}

/// An association navigable from both ends
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ParsedBidirectionalAssociation {
    #[serde(deserialize_with = "nullable")]
    pub source_class_name: String,

    #[serde(deserialize_with = "nullable")]
    pub source_class_namespace: String,

    #[serde(deserialize_with = "nullable")]
    pub target_class_name: String,

    #[serde(deserialize_with = "nullable")]
    pub target_class_namespace: String,

    #[serde(deserialize_with = "nullable")]
    pub source_multiplicity: ParsedMultiplicity,

    #[serde(deserialize_with = "nullable")]
    pub target_multiplicity: ParsedMultiplicity,

    #[serde(deserialize_with = "nullable")]
    pub source_property_name: String,

    #[serde(deserialize_with = "nullable")]
    pub source_summary: String,

    #[serde(deserialize_with = "nullable")]
    pub source_description: String,

    #[serde(deserialize_with = "nullable")]
    pub target_property_name: String,

    #[serde(deserialize_with = "nullable")]
    pub target_summary: String,

    #[serde(deserialize_with = "nullable")]
    pub target_description: String,
}

impl ParsedBidirectionalAssociation {
    /// Structural key of the source class
    pub fn source_class_full_name(&self) -> String {
        full_name(&self.source_class_namespace, &self.source_class_name)
    }

    /// Structural key of the target class
    pub fn target_class_full_name(&self) -> String {
        full_name(&self.target_class_namespace, &self.target_class_name)
    }
}

// ============================================================================
// Enumerations
// ============================================================================

/// An enumeration record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ParsedEnum {
    #[serde(deserialize_with = "nullable")]
    pub name: String,

    #[serde(deserialize_with = "nullable")]
    pub namespace: String,

    #[serde(deserialize_with = "nullable")]
    pub custom_attributes: String,

    #[serde(deserialize_with = "nullable")]
    pub is_flags: bool,

    /// Declared underlying type; read but never merged
    pub value_type: Option<String>,

    #[serde(deserialize_with = "nullable")]
    pub values: Vec<ParsedEnumValue>,
}

impl ParsedEnum {
    /// Create an enumeration record
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    /// Structural key of the enumeration
    pub fn full_name(&self) -> String {
        full_name(&self.namespace, &self.name)
    }
}

/// An enumeration value record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ParsedEnumValue {
    #[serde(deserialize_with = "nullable")]
    pub name: String,

    #[serde(deserialize_with = "string_or_number")]
    pub value: String,

    #[serde(deserialize_with = "nullable")]
    pub custom_attributes: String,

    #[serde(deserialize_with = "nullable")]
    pub display_text: String,
}

impl ParsedEnumValue {
    /// Create an enumeration value record
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Default::default()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "EntityContainerName": "SalesContext",
        "Namespace": "Sales",
        "Classes": [
            {
                "Name": "Order",
                "Namespace": "Sales",
                "CustomAttributes": null,
                "IsAbstract": false,
                "TableName": "Orders",
                "Properties": [
                    { "TypeName": "Int32", "Name": "Id", "IsIdentity": true, "Required": true },
                    { "TypeName": "String", "Name": "Code", "MaxStringLength": 20, "MinStringLength": null }
                ],
                "UnidirectionalAssociations": [],
                "BidirectionalAssociations": [
                    {
                        "SourceClassName": "Order",
                        "SourceClassNamespace": "Sales",
                        "TargetClassName": "Line",
                        "TargetClassNamespace": "Sales",
                        "SourceMultiplicity": 1,
                        "TargetMultiplicity": "ZeroMany",
                        "SourcePropertyName": "Order",
                        "TargetPropertyName": "Lines"
                    }
                ]
            }
        ],
        "Enumerations": [
            {
                "Name": "Status",
                "Namespace": "Sales",
                "IsFlags": false,
                "ValueType": "Int16",
                "Values": [
                    { "Name": "Open", "Value": 0 },
                    { "Name": "Closed", "Value": "Open + 1", "DisplayText": "Closed" },
                    { "Name": "Unknown", "Value": null }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_sample_document() {
        let document = ParsedModel::from_json(SAMPLE).unwrap();
        assert_eq!(document.entity_container_name, "SalesContext");
        assert_eq!(document.classes.len(), 1);

        let order = &document.classes[0];
        assert_eq!(order.full_name(), "Sales.Order");
        assert_eq!(order.custom_attributes, "");
        assert_eq!(order.properties[1].max_string_length, Some(20));
        assert_eq!(order.properties[1].min_string_length, None);

        let association = &order.bidirectional_associations[0];
        assert_eq!(association.source_multiplicity, ParsedMultiplicity::One);
        assert_eq!(association.target_multiplicity, ParsedMultiplicity::ZeroMany);
        assert_eq!(association.target_class_full_name(), "Sales.Line");
        assert_eq!(association.source_summary, "");
    }

    #[test]
    fn test_parse_enum_values() {
        let document = ParsedModel::from_json(SAMPLE).unwrap();
        let status = &document.enumerations[0];

        assert_eq!(status.value_type.as_deref(), Some("Int16"));
        let values: Vec<&str> = status.values.iter().map(|v| v.value.as_str()).collect();
        assert_eq!(values, vec!["0", "Open + 1", ""]);
    }

    #[test]
    fn test_parse_empty_document() {
        let document = ParsedModel::from_json("{}").unwrap();
        assert_eq!(document, ParsedModel::default());

        let document = ParsedModel::from_json(r#"{"Classes": null}"#).unwrap();
        assert!(document.classes.is_empty());
    }

    #[test]
    fn test_parse_malformed_document() {
        let result = ParsedModel::from_json("{ \"Classes\": [ ");
        assert!(matches!(result, Err(EngineError::InvalidDocument(_))));
    }

    #[test]
    fn test_odd_multiplicity_keeps_document() {
        let json = r#"{
            "Classes": [
                {
                    "Name": "Order",
                    "Namespace": "Sales",
                    "UnidirectionalAssociations": [
                        {
                            "SourceClassName": "Order",
                            "SourceClassNamespace": "Sales",
                            "TargetClassName": "Customer",
                            "TargetClassNamespace": "Sales",
                            "SourceMultiplicity": true,
                            "TargetMultiplicity": { "Kind": 1 },
                            "TargetPropertyName": "Customer"
                        }
                    ]
                },
                { "Name": "Customer", "Namespace": "Sales" }
            ]
        }"#;

        let document = ParsedModel::from_json(json).unwrap();
        assert_eq!(document.classes.len(), 2);

        let association = &document.classes[0].unidirectional_associations[0];
        assert_eq!(association.source_multiplicity, ParsedMultiplicity::Unrecognized);
        assert_eq!(association.target_multiplicity, ParsedMultiplicity::Unrecognized);
        assert_eq!(association.target_property_name, "Customer");
    }

    #[test]
    fn test_full_name_without_namespace() {
        let class = ParsedClass::new("Order", "");
        assert_eq!(class.full_name(), "Order");
    }
}
