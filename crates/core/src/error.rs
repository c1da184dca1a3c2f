//! Error types for the EF model designer
//!
//! This module provides unified error handling across the model store, the
//! import engine and the command-line front end, including lookup errors,
//! invariant violations, IO errors, serialization errors and errors reported
//! by the external parser tools.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the EF model designer
#[derive(Debug, Error)]
pub enum EngineError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// General validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Association validation failed
    #[error("Association validation failed: {0}")]
    AssociationValidation(String),

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    /// Class not found
    #[error("Class not found: {0}")]
    ClassNotFound(String),

    /// Enumeration not found
    #[error("Enumeration not found: {0}")]
    EnumNotFound(String),

    /// Model file not found
    #[error("Model not found at path: {0}")]
    ModelNotFound(PathBuf),

    // ========================================================================
    // Duplicate Errors
    // ========================================================================
    /// Duplicate class full name
    #[error("Duplicate class: '{0}' already exists")]
    DuplicateClass(String),

    /// Duplicate enumeration full name
    #[error("Duplicate enumeration: '{0}' already exists")]
    DuplicateEnum(String),

    /// Duplicate attribute name within a class
    #[error("Duplicate attribute name: '{attribute}' already exists in class '{class}'")]
    DuplicateAttribute { class: String, attribute: String },

    /// Duplicate value name within an enumeration
    #[error("Duplicate value name: '{value}' already exists in enumeration '{enumeration}'")]
    DuplicateEnumValue { enumeration: String, value: String },

    /// Duplicate association
    #[error("Duplicate association between '{from}' and '{to}'")]
    DuplicateAssociation { from: String, to: String },

    // ========================================================================
    // Document Errors
    // ========================================================================
    /// Parsed document could not be interpreted
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    // ========================================================================
    // Tool Errors
    // ========================================================================
    /// External parser tool could not be started
    #[error("Failed to launch parser '{tool}': {message}")]
    ToolLaunch { tool: PathBuf, message: String },

    /// External parser tool terminated without an exit code
    #[error("Parser '{0}' terminated without an exit code")]
    ToolTerminated(PathBuf),

    // ========================================================================
    // IO Errors
    // ========================================================================
    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File read error
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    /// File write error
    #[error("Failed to write file '{path}': {message}")]
    FileWrite { path: PathBuf, message: String },

    /// Directory creation failed
    #[error("Failed to create directory '{path}': {message}")]
    DirectoryCreate { path: PathBuf, message: String },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, found {found}")]
    SchemaVersionMismatch { expected: u32, found: u32 },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        EngineError::Validation(msg.into())
    }

    /// Create an association validation error
    pub fn association_validation(msg: impl Into<String>) -> Self {
        EngineError::AssociationValidation(msg.into())
    }

    /// Create an invalid document error
    pub fn invalid_document(msg: impl Into<String>) -> Self {
        EngineError::InvalidDocument(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        EngineError::Internal(msg.into())
    }

    /// Check if this error is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EngineError::Validation(_)
                | EngineError::AssociationValidation(_)
                | EngineError::DuplicateClass(_)
                | EngineError::DuplicateEnum(_)
                | EngineError::DuplicateAttribute { .. }
                | EngineError::DuplicateEnumValue { .. }
                | EngineError::DuplicateAssociation { .. }
        )
    }

    /// Check if this error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EngineError::ClassNotFound(_)
                | EngineError::EnumNotFound(_)
                | EngineError::ModelNotFound(_)
        )
    }

    /// Check if this error is an IO error
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            EngineError::Io(_)
                | EngineError::FileRead { .. }
                | EngineError::FileWrite { .. }
                | EngineError::DirectoryCreate { .. }
        )
    }

    /// Check if this error came from invoking an external parser tool
    pub fn is_tool(&self) -> bool {
        matches!(
            self,
            EngineError::ToolLaunch { .. } | EngineError::ToolTerminated(_)
        )
    }
}

/// Result type alias using EngineError
pub type EngineResult<T> = Result<T, EngineError>;

// ============================================================================
// Tests
// ============================================================================
