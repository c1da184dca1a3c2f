//! Association definitions between classes
//!
//! An association is a graph edge referencing two classes by id without
//! owning them. Unidirectional associations are navigable from the source
//! only; bidirectional ones also carry the reverse navigation property on the
//! target.

use efdesign_core::{
    AssociationId, ClassId, DeleteAction, EndpointRole, EngineError, EngineResult, Multiplicity,
    Validatable,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Association
// ============================================================================

/// An edge between two classes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Association {
    /// Unique identifier for this association
    pub id: AssociationId,

    /// Class owning the target navigation property
    pub source: ClassId,

    /// Class the target navigation property points to
    pub target: ClassId,

    /// Cardinality on the source end
    pub source_multiplicity: Multiplicity,

    /// Cardinality on the target end
    pub target_multiplicity: Multiplicity,

    /// Navigation property on the source class
    pub target_property_name: String,

    /// Short doc comment for the target navigation property
    pub target_summary: String,

    /// Long doc comment for the target navigation property
    pub target_description: String,

    /// Principal/dependent designation of the source end
    pub source_role: EndpointRole,

    /// Principal/dependent designation of the target end
    pub target_role: EndpointRole,

    /// Delete behavior when the source end is principal
    pub source_delete_action: DeleteAction,

    /// Delete behavior when the target end is principal
    pub target_delete_action: DeleteAction,

    /// Navigability of the edge
    pub kind: AssociationKind,
}

/// Navigability of an association
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssociationKind {
    /// Navigable from the source only
    Unidirectional,
    /// Navigable from both ends
    Bidirectional(SourceNavigation),
}

/// Reverse navigation property declared on the target class
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceNavigation {
    /// Property name on the target class
    pub property_name: String,

    /// Short doc comment
    pub summary: String,

    /// Long doc comment
    pub description: String,
}

impl SourceNavigation {
    /// Create a reverse navigation with the given property name
    pub fn new(property_name: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            ..Default::default()
        }
    }
}

impl Association {
    /// Create a new association; roles follow the default multiplicities
    pub fn new(source: ClassId, target: ClassId, kind: AssociationKind) -> Self {
        let source_multiplicity = Multiplicity::ZeroMany;
        let target_multiplicity = Multiplicity::One;
        let (source_role, target_role) =
            EndpointRole::from_multiplicities(source_multiplicity, target_multiplicity);

        Self {
            id: Uuid::new_v4(),
            source,
            target,
            source_multiplicity,
            target_multiplicity,
            target_property_name: String::new(),
            target_summary: String::new(),
            target_description: String::new(),
            source_role,
            target_role,
            source_delete_action: DeleteAction::Default,
            target_delete_action: DeleteAction::Default,
            kind,
        }
    }

    /// Create a unidirectional association
    pub fn unidirectional(source: ClassId, target: ClassId) -> Self {
        Self::new(source, target, AssociationKind::Unidirectional)
    }

    /// Create a bidirectional association
    pub fn bidirectional(source: ClassId, target: ClassId, navigation: SourceNavigation) -> Self {
        Self::new(source, target, AssociationKind::Bidirectional(navigation))
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Set both multiplicities (roles are re-derived)
    pub fn with_multiplicities(mut self, source: Multiplicity, target: Multiplicity) -> Self {
        self.set_multiplicities(source, target);
        self
    }

    /// Set the target navigation property
    pub fn with_target_navigation(
        mut self,
        property_name: impl Into<String>,
        summary: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.target_property_name = property_name.into();
        self.target_summary = summary.into();
        self.target_description = description.into();
        self
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Change the multiplicities and re-derive both roles from them
    pub fn set_multiplicities(&mut self, source: Multiplicity, target: Multiplicity) {
        self.source_multiplicity = source;
        self.target_multiplicity = target;
        let (source_role, target_role) = EndpointRole::from_multiplicities(source, target);
        self.source_role = source_role;
        self.target_role = target_role;
    }

    /// Assign the source role; the target takes the opposite role
    pub fn set_source_role(&mut self, role: EndpointRole) {
        self.source_role = role;
        self.target_role = role.opposite();
    }

    /// Assign the target role; the source takes the opposite role
    pub fn set_target_role(&mut self, role: EndpointRole) {
        self.target_role = role;
        self.source_role = role.opposite();
    }

    // ========================================================================
    // Query methods
    // ========================================================================

    /// Check if this is a bidirectional association
    pub fn is_bidirectional(&self) -> bool {
        matches!(self.kind, AssociationKind::Bidirectional(_))
    }

    /// Reverse navigation, for bidirectional associations
    pub fn source_navigation(&self) -> Option<&SourceNavigation> {
        match &self.kind {
            AssociationKind::Bidirectional(navigation) => Some(navigation),
            AssociationKind::Unidirectional => None,
        }
    }

    /// Reverse navigation property name, for bidirectional associations
    pub fn source_property_name(&self) -> Option<&str> {
        self.source_navigation().map(|n| n.property_name.as_str())
    }

    /// Check if a given class is an endpoint of this association
    pub fn involves_class(&self, class_id: ClassId) -> bool {
        self.source == class_id || self.target == class_id
    }

    /// Structural identity of this edge, see [`EdgeKey`]
    pub fn edge_key(&self) -> EdgeKey {
        EdgeKey::new(
            self.source,
            self.target,
            self.source_property_name(),
            &self.target_property_name,
        )
    }

    /// Display label, e.g. `Orders 0..* -> 1`
    pub fn display_label(&self) -> String {
        let arrow = if self.is_bidirectional() { "<->" } else { "->" };
        format!(
            "{} {} {} {}",
            self.target_property_name, self.source_multiplicity, arrow, self.target_multiplicity
        )
    }
}

impl Validatable for Association {
    fn validate(&self) -> EngineResult<()> {
        if self.target_property_name.trim().is_empty() {
            return Err(EngineError::association_validation(
                "Target property name must be specified",
            ));
        }

        if let Some(name) = self.source_property_name() {
            if name.trim().is_empty() {
                return Err(EngineError::association_validation(
                    "Source property name must be specified for bidirectional associations",
                ));
            }
        }

        if self.source_role.is_principal() && self.target_role.is_principal() {
            return Err(EngineError::association_validation(
                "Both ends cannot be principal",
            ));
        }

        Ok(())
    }
}

// ============================================================================
// EdgeKey
// ============================================================================

/// Structural identity of an edge, used to detect duplicates.
///
/// A unidirectional edge is keyed by (source, target, target property). A
/// bidirectional edge is keyed by its two (class, property) ends in sorted
/// order, so an edge and the same edge reported from the other endpoint
/// produce equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EdgeKey {
    Unidirectional {
        source: ClassId,
        target: ClassId,
        target_property: String,
    },
    Bidirectional {
        first: (ClassId, String),
        second: (ClassId, String),
    },
}

impl EdgeKey {
    /// `source_property` is `None` for unidirectional edges
    pub fn new(
        source: ClassId,
        target: ClassId,
        source_property: Option<&str>,
        target_property: &str,
    ) -> Self {
        match source_property {
            None => EdgeKey::Unidirectional {
                source,
                target,
                target_property: target_property.to_string(),
            },
            Some(source_property) => {
                let source_end = (source, source_property.to_string());
                let target_end = (target, target_property.to_string());
                let (first, second) = if source_end <= target_end {
                    (source_end, target_end)
                } else {
                    (target_end, source_end)
                };
                EdgeKey::Bidirectional { first, second }
            }
        }
    }
}

impl PartialEq for Association {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Association {}

// ============================================================================
// Tests
// ============================================================================
