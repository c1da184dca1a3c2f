//! Saving and loading model files
//!
//! A model file is the JSON form of a `ModelStore` wrapped with its schema
//! version. Lookup indices are not written; they are rebuilt on load.

use crate::{MODEL_FILE_EXTENSION, ModelStore, SCHEMA_VERSION};
use efdesign_core::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ============================================================================
// Model File Wrapper
// ============================================================================

/// Wrapper for model files that includes version information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    /// Schema version for migration purposes
    pub schema_version: u32,

    /// The model data
    pub model: ModelStore,
}

impl ModelFile {
    /// Wrap a store for writing
    pub fn new(model: ModelStore) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            model,
        }
    }

    /// Check if the file was written by a newer designer
    pub fn is_from_future(&self) -> bool {
        self.schema_version > SCHEMA_VERSION
    }
}

// ============================================================================
// Save Functions
// ============================================================================

/// Save a model to a file, creating parent directories as needed
pub fn save_model(model: &ModelStore, path: impl AsRef<Path>) -> EngineResult<()> {
    let path = path.as_ref();
    let json = save_model_to_string(model).map_err(|e| EngineError::FileWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| EngineError::DirectoryCreate {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
        }
    }

    std::fs::write(path, json).map_err(|e| EngineError::FileWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    tracing::debug!("Saved model to {}", path.display());
    Ok(())
}

/// Save a model to a JSON string
pub fn save_model_to_string(model: &ModelStore) -> EngineResult<String> {
    let file = ModelFile::new(model.clone());
    Ok(serde_json::to_string_pretty(&file)?)
}

// ============================================================================
// Load Functions
// ============================================================================

/// Load a model from a file
pub fn load_model(path: impl AsRef<Path>) -> EngineResult<ModelStore> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(EngineError::ModelNotFound(path.to_path_buf()));
    }

    let json = std::fs::read_to_string(path).map_err(|e| EngineError::FileRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    load_model_from_string(&json).map_err(|e| match e {
        EngineError::JsonSerialization(je) => EngineError::FileRead {
            path: path.to_path_buf(),
            message: format!("Invalid model file format: {}", je),
        },
        other => other,
    })
}

/// Load a model file, or start an empty model if it does not exist yet
pub fn load_or_create_model(path: impl AsRef<Path>) -> EngineResult<ModelStore> {
    match load_model(path) {
        Err(EngineError::ModelNotFound(_)) => Ok(ModelStore::new()),
        other => other,
    }
}

/// Load a model from a JSON string
pub fn load_model_from_string(json: &str) -> EngineResult<ModelStore> {
    let file: ModelFile = serde_json::from_str(json)?;
    if file.is_from_future() {
        return Err(EngineError::SchemaVersionMismatch {
            expected: SCHEMA_VERSION,
            found: file.schema_version,
        });
    }
    Ok(file.model)
}

// ============================================================================
// Utility Functions
// ============================================================================

/// Ensure a path has the model file extension
pub fn ensure_extension(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();

    if path.extension().is_none_or(|e| e != MODEL_FILE_EXTENSION) {
        let mut new_path = path.to_path_buf();
        new_path.set_extension(MODEL_FILE_EXTENSION);
        new_path
    } else {
        path.to_path_buf()
    }
}

// ============================================================================
// Tests
// ============================================================================
