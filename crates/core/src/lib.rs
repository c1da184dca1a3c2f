//! # EF Designer Core
//!
//! Core types, traits, and error handling for the EF model designer.
//!
//! This crate provides the foundational building blocks used by the model
//! store, the import engine and the command-line front end:
//!
//! - **Types**: identifiers, association multiplicities, endpoint roles and
//!   delete actions
//! - **Traits**: common behaviors like `Validatable` and `Named`
//! - **Errors**: unified error handling with `EngineError` and `EngineResult`
//!

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{EngineError, EngineResult};
pub use traits::{Named, Validatable};
pub use types::{
    AssociationId, AttributeId, ClassId, DeleteAction, EndpointRole, EnumId, EnumValueId,
    Multiplicity, full_name,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
