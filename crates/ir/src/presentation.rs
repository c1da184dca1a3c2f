//! Derived presentation constraints for associations
//!
//! Which association fields a property editor should expose depends on the
//! shape of the edge: its navigability, both multiplicities, the endpoint
//! roles and the change-notification flag of both classes. The derivation is
//! a pure function of those inputs, so it is recomputed on every call and can
//! never go stale.

use crate::{Association, ModelClass, ModelStore};
use efdesign_core::{AssociationId, EndpointRole, Multiplicity};
use serde::Serialize;
use std::collections::BTreeSet;

/// Field name of the source backing-field toggle
pub const SOURCE_AUTO_PROPERTY: &str = "SourceAutoProperty";
/// Field name of the target backing-field toggle
pub const TARGET_AUTO_PROPERTY: &str = "TargetAutoProperty";
/// Field name of the source role
pub const SOURCE_ROLE: &str = "SourceRole";
/// Field name of the target role
pub const TARGET_ROLE: &str = "TargetRole";
/// Field name of the source delete action
pub const SOURCE_DELETE_ACTION: &str = "SourceDeleteAction";
/// Field name of the target delete action
pub const TARGET_DELETE_ACTION: &str = "TargetDeleteAction";

/// Which shape-dependent association fields are meaningful
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssociationPresentation {
    /// The source navigation property always gets a generated backing field,
    /// so the toggle is redundant
    pub source_auto_property_implied: bool,

    /// The target navigation property always gets a generated backing field
    pub target_auto_property_implied: bool,

    /// Roles are shown; hidden for the symmetric 1-1 and 0..1-0..1 shapes
    pub show_roles: bool,

    /// Source delete action is configurable (source is principal)
    pub show_source_delete_action: bool,

    /// Target delete action is configurable (target is principal)
    pub show_target_delete_action: bool,
}

impl AssociationPresentation {
    /// Derive the constraints for an association and its two endpoint classes
    pub fn derive(association: &Association, source: &ModelClass, target: &ModelClass) -> Self {
        let source_auto_property_implied = association.is_bidirectional()
            && (target.implement_notify || association.source_multiplicity.is_many());

        let target_auto_property_implied =
            source.implement_notify || association.target_multiplicity.is_many();

        Self {
            source_auto_property_implied,
            target_auto_property_implied,
            show_roles: !is_symmetric(
                association.source_multiplicity,
                association.target_multiplicity,
            ),
            show_source_delete_action: association.source_role == EndpointRole::Principal,
            show_target_delete_action: association.target_role == EndpointRole::Principal,
        }
    }

    /// Names of the shape-dependent fields that remain visible
    pub fn visible_fields(&self) -> BTreeSet<&'static str> {
        let mut fields = BTreeSet::new();

        if !self.source_auto_property_implied {
            fields.insert(SOURCE_AUTO_PROPERTY);
        }
        if !self.target_auto_property_implied {
            fields.insert(TARGET_AUTO_PROPERTY);
        }
        if self.show_roles {
            fields.insert(SOURCE_ROLE);
            fields.insert(TARGET_ROLE);
        }
        if self.show_source_delete_action {
            fields.insert(SOURCE_DELETE_ACTION);
        }
        if self.show_target_delete_action {
            fields.insert(TARGET_DELETE_ACTION);
        }

        fields
    }
}

fn is_symmetric(source: Multiplicity, target: Multiplicity) -> bool {
    matches!(
        (source, target),
        (Multiplicity::One, Multiplicity::One) | (Multiplicity::ZeroOne, Multiplicity::ZeroOne)
    )
}

impl ModelStore {
    /// Presentation constraints for an association, if it and both of its
    /// endpoint classes exist
    pub fn presentation(&self, id: AssociationId) -> Option<AssociationPresentation> {
        let association = self.association(id)?;
        let source = self.class(association.source)?;
        let target = self.class(association.target)?;
        Some(AssociationPresentation::derive(association, source, target))
    }
}

// ============================================================================
// Tests
// ============================================================================
