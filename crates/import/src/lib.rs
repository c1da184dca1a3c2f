//! # EF Designer Import
//!
//! Reverse-engineers a compiled assembly into the model store.
//!
//! ## Pipeline
//!
//! ```text
//! assembly ──► parser tools (first applicable wins) ──► JSON document
//!                                                          │
//!                                                          ▼
//!                                  ModelImporter: root, classes, associations, enums
//!                                                          │
//!                                                          ▼
//!                                                     ModelStore
//! ```
//!
//! Merging is idempotent: every element is matched by its structural key and
//! updated in place, so importing the same assembly twice leaves the store as
//! it was after the first import.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use efdesign_import::{AssemblyImporter, ImportConfig, LogFeedback};
//! use efdesign_ir::ModelStore;
//!
//! let mut store = ModelStore::new();
//! let mut importer = AssemblyImporter::with_config(ImportConfig::default());
//! let outcome = importer.process(&mut store, &mut LogFeedback, "Sales.dll")?;
//! ```

pub mod association_merge;
pub mod config;
pub mod document;
pub mod feedback;
pub mod merge;
pub mod multiplicity;
pub mod orchestrator;
pub mod tool;

#[cfg(test)]
mod testing;

pub use association_merge::AssociationOutcome;
pub use config::{ImportConfig, ParserTool};
pub use document::{
    ParsedBidirectionalAssociation, ParsedClass, ParsedEnum, ParsedEnumValue, ParsedModel,
    ParsedProperty, ParsedUnidirectionalAssociation,
};
pub use feedback::{ImportFeedback, LogFeedback};
pub use merge::{MergeReport, ModelMerger};
pub use multiplicity::{ParsedMultiplicity, map_multiplicity};
pub use orchestrator::{AssemblyImporter, ImportOutcome, ImportState, ModelImporter};
pub use tool::{ProcessToolRunner, ToolExit, ToolInvocation, ToolRunner, invoke_parser};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
