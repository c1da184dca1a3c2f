//! # EF Designer IR
//!
//! This crate holds the live entity model: the graph the import engine merges
//! into and the property editor reads from.
//!
//! ## Core Concepts
//!
//! - **ModelStore**: the context object owning the single `ModelRoot`, every
//!   element, and the structural-key indices
//! - **ModelClass**: a persistent class keyed by its full name, owning its
//!   `ModelAttribute`s
//! - **ModelEnum**: an enumeration keyed by its full name, owning its
//!   `ModelEnumValue`s
//! - **Association**: a unidirectional or bidirectional edge between two
//!   classes
//! - **AssociationPresentation**: which shape-dependent association fields are
//!   meaningful
//!

// Module declarations
pub mod association;
pub mod model_class;
pub mod model_enum;
pub mod presentation;
pub mod serialization;
pub mod store;

// Re-export commonly used types at crate root
pub use association::{Association, AssociationKind, EdgeKey, SourceNavigation};
pub use model_class::{ModelAttribute, ModelClass};
pub use model_enum::{DEFAULT_ENUM_VALUE_TYPE, ModelEnum, ModelEnumValue};
pub use presentation::AssociationPresentation;
pub use serialization::{load_model, load_or_create_model, save_model};
pub use store::{ModelRoot, ModelStore};

// Re-export core types that are commonly used with IR
pub use efdesign_core::{
    DeleteAction, EndpointRole, EngineError, EngineResult, Multiplicity, Named, Validatable,
};

/// Current schema version for model files
pub const SCHEMA_VERSION: u32 = 1;

/// File extension for model files
pub const MODEL_FILE_EXTENSION: &str = "efmodel";

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient re-exports for common usage
pub mod prelude {
    pub use crate::{
        Association, AssociationKind, AssociationPresentation, EngineError, EngineResult,
        ModelAttribute, ModelClass, ModelEnum, ModelEnumValue, ModelRoot, ModelStore,
        Multiplicity, Named, SourceNavigation, Validatable,
    };
}

// ============================================================================
// Tests
// ============================================================================
