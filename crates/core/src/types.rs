//! Core types used throughout the EF model designer
//!
//! This module contains the identifier aliases and the small value enums that
//! describe association endpoints. They are shared by the model store, the
//! import engine and the presentation rules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Unique Identifiers
// ============================================================================

/// Type alias for model class identifiers
pub type ClassId = uuid::Uuid;

/// Type alias for class attribute identifiers
pub type AttributeId = uuid::Uuid;

/// Type alias for enumeration identifiers
pub type EnumId = uuid::Uuid;

/// Type alias for enumeration value identifiers
pub type EnumValueId = uuid::Uuid;

/// Type alias for association identifiers
pub type AssociationId = uuid::Uuid;

/// Build the structural key of a class or enumeration.
///
/// A blank namespace yields the bare name.
pub fn full_name(namespace: &str, name: &str) -> String {
    if namespace.trim().is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", namespace, name)
    }
}

// ============================================================================
// Multiplicity
// ============================================================================

/// Cardinality of one association endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Multiplicity {
    /// Zero or more related instances
    ZeroMany,
    /// Exactly one related instance
    One,
    /// Zero or one related instance
    #[default]
    ZeroOne,
}

impl Multiplicity {
    /// Check if this endpoint holds a collection
    pub fn is_many(&self) -> bool {
        matches!(self, Multiplicity::ZeroMany)
    }

    /// Check if this endpoint holds at most one instance
    pub fn is_single(&self) -> bool {
        !self.is_many()
    }

    /// Get display notation
    pub fn notation(&self) -> &'static str {
        match self {
            Multiplicity::ZeroMany => "0..*",
            Multiplicity::One => "1",
            Multiplicity::ZeroOne => "0..1",
        }
    }
}

impl std::fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.notation())
    }
}

// ============================================================================
// Endpoint Roles
// ============================================================================

/// Principal/dependent designation of an association endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EndpointRole {
    /// Controls delete behavior for the relationship
    Principal,
    /// Follows the principal
    Dependent,
    /// Roles carry no meaning for this shape (many-to-many)
    NotApplicable,
    /// Roles are meaningful but have not been decided yet
    #[default]
    NotSet,
}

impl EndpointRole {
    /// Role the opposite endpoint takes when this one is assigned
    pub fn opposite(&self) -> Self {
        match self {
            EndpointRole::Principal => EndpointRole::Dependent,
            EndpointRole::Dependent => EndpointRole::Principal,
            other => *other,
        }
    }

    /// Check if this is the principal role
    pub fn is_principal(&self) -> bool {
        matches!(self, EndpointRole::Principal)
    }

    /// Derive both endpoint roles from the association's multiplicities.
    ///
    /// Returns `(source_role, target_role)`.
    pub fn from_multiplicities(
        source: Multiplicity,
        target: Multiplicity,
    ) -> (EndpointRole, EndpointRole) {
        use EndpointRole::*;
        use Multiplicity::*;

        match (source, target) {
            (ZeroMany, ZeroMany) => (NotApplicable, NotApplicable),
            (One, ZeroMany) | (ZeroOne, ZeroMany) => (Principal, Dependent),
            (ZeroMany, One) | (ZeroMany, ZeroOne) => (Dependent, Principal),
            (One, ZeroOne) => (Principal, Dependent),
            (ZeroOne, One) => (Dependent, Principal),
            (One, One) | (ZeroOne, ZeroOne) => (NotSet, NotSet),
        }
    }
}

impl std::fmt::Display for EndpointRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EndpointRole::Principal => "Principal",
            EndpointRole::Dependent => "Dependent",
            EndpointRole::NotApplicable => "Not Applicable",
            EndpointRole::NotSet => "Not Set",
        };
        write!(f, "{}", label)
    }
}

// ============================================================================
// Delete Actions
// ============================================================================

/// What happens to the dependent end when the principal is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DeleteAction {
    /// Let the persistence layer decide
    #[default]
    Default,
    /// Leave dependents untouched
    None,
    /// Delete dependents with the principal
    Cascade,
}

impl std::fmt::Display for DeleteAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DeleteAction::Default => "Default",
            DeleteAction::None => "None",
            DeleteAction::Cascade => "Cascade",
        };
        write!(f, "{}", label)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_name() {
        assert_eq!(full_name("Sales", "Order"), "Sales.Order");
        assert_eq!(full_name("", "Order"), "Order");
        assert_eq!(full_name("  ", "Order"), "Order");
    }

    #[test]
    fn test_multiplicity_notation() {
        assert_eq!(Multiplicity::ZeroMany.to_string(), "0..*");
        assert_eq!(Multiplicity::One.to_string(), "1");
        assert!(Multiplicity::ZeroMany.is_many());
        assert!(Multiplicity::ZeroOne.is_single());
    }

    #[test]
    fn test_roles_from_multiplicities() {
        use EndpointRole::*;

        assert_eq!(
            EndpointRole::from_multiplicities(Multiplicity::One, Multiplicity::ZeroMany),
            (Principal, Dependent)
        );
        assert_eq!(
            EndpointRole::from_multiplicities(Multiplicity::ZeroMany, Multiplicity::One),
            (Dependent, Principal)
        );
        assert_eq!(
            EndpointRole::from_multiplicities(Multiplicity::ZeroOne, Multiplicity::One),
            (Dependent, Principal)
        );
        assert_eq!(
            EndpointRole::from_multiplicities(Multiplicity::ZeroMany, Multiplicity::ZeroMany),
            (NotApplicable, NotApplicable)
        );
        assert_eq!(
            EndpointRole::from_multiplicities(Multiplicity::One, Multiplicity::One),
            (NotSet, NotSet)
        );
    }

    #[test]
    fn test_role_opposite() {
        assert_eq!(EndpointRole::Principal.opposite(), EndpointRole::Dependent);
        assert_eq!(EndpointRole::Dependent.opposite(), EndpointRole::Principal);
        assert_eq!(EndpointRole::NotSet.opposite(), EndpointRole::NotSet);
    }
}
