//! Core traits for the EF model designer
//!
//! This module defines the traits that model elements implement to provide
//! consistent behavior for validation and structural lookup.

use crate::error::EngineResult;

// ============================================================================
// Validatable Trait
// ============================================================================

/// Model elements that check their own invariants
pub trait Validatable {
    /// `Ok(())` when consistent, otherwise the first problem found
    fn validate(&self) -> EngineResult<()>;
}

// ============================================================================
// Named Trait
// ============================================================================

/// Trait for namespaced model elements (classes and enumerations)
///
/// The full name is the structural key used to match incoming records
/// against existing elements. Matching is exact and case-sensitive.
pub trait Named {
    /// Get the simple name
    fn name(&self) -> &str;

    /// Get the namespace (may be empty)
    fn namespace(&self) -> &str;

    /// Get the fully-qualified name
    fn full_name(&self) -> String {
        crate::types::full_name(self.namespace(), self.name())
    }

    /// Check if this element has the given name and namespace
    fn is_named(&self, name: &str, namespace: &str) -> bool {
        self.name() == name && self.namespace() == namespace
    }
}

// ============================================================================
// Tests
// ============================================================================
