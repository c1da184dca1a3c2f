//! # Association Resolver/Merger
//!
//! Turns parsed association records into edges between classes already in the
//! store. Records are best effort: an endpoint that cannot be resolved drops
//! the record and nothing else. Existing edges are never modified; a record
//! matching one is dropped even when its multiplicities differ.

use crate::document::{ParsedBidirectionalAssociation, ParsedUnidirectionalAssociation};
use crate::merge::ModelMerger;
use efdesign_core::{AssociationId, EngineResult};
use efdesign_ir::{Association, SourceNavigation};

/// What happened to one association record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationOutcome {
    /// A new edge was added
    Created(AssociationId),
    /// An equivalent edge already exists
    Duplicate,
    /// The source class is not in the store
    UnresolvedSource,
    /// The target class is not in the store
    UnresolvedTarget,
}

impl AssociationOutcome {
    /// Check if a new edge was added
    pub fn is_created(&self) -> bool {
        matches!(self, AssociationOutcome::Created(_))
    }
}

impl ModelMerger<'_> {
    /// Merge unidirectional records in input order
    pub fn merge_unidirectional_associations(
        &mut self,
        records: &[ParsedUnidirectionalAssociation],
    ) -> EngineResult<Vec<AssociationOutcome>> {
        records
            .iter()
            .map(|record| self.merge_unidirectional(record))
            .collect()
    }

    /// Merge bidirectional records in input order
    pub fn merge_bidirectional_associations(
        &mut self,
        records: &[ParsedBidirectionalAssociation],
    ) -> EngineResult<Vec<AssociationOutcome>> {
        records
            .iter()
            .map(|record| self.merge_bidirectional(record))
            .collect()
    }

    /// Merge one unidirectional record.
    ///
    /// Both endpoints resolve by full name. The record is a duplicate when an
    /// edge with the same source, target and target property exists.
    pub fn merge_unidirectional(
        &mut self,
        data: &ParsedUnidirectionalAssociation,
    ) -> EngineResult<AssociationOutcome> {
        let source_name = data.source_class_full_name();
        let target_name = data.target_class_full_name();

        let Some(source) = self.store.find_class(&source_name).map(|c| c.id) else {
            return Ok(self.unresolved(AssociationOutcome::UnresolvedSource, &source_name));
        };
        let Some(target) = self.store.find_class(&target_name).map(|c| c.id) else {
            return Ok(self.unresolved(AssociationOutcome::UnresolvedTarget, &target_name));
        };

        if self
            .store
            .has_association(source, target, None, &data.target_property_name)
        {
            return Ok(self.duplicate(&source_name, &data.target_property_name));
        }

        let association = Association::unidirectional(source, target)
            .with_target_navigation(
                &data.target_property_name,
                &data.target_summary,
                &data.target_description,
            )
            .with_multiplicities(
                data.source_multiplicity.into(),
                data.target_multiplicity.into(),
            );

        let id = self.store.add_association(association)?;
        self.report.associations_created += 1;
        Ok(AssociationOutcome::Created(id))
    }

    /// Merge one bidirectional record.
    ///
    /// The source resolves by full name, the target by its name and
    /// namespace pair. The record is a duplicate when an edge with the same
    /// endpoints and property names exists in either orientation.
    pub fn merge_bidirectional(
        &mut self,
        data: &ParsedBidirectionalAssociation,
    ) -> EngineResult<AssociationOutcome> {
        let source_name = data.source_class_full_name();

        let Some(source) = self.store.find_class(&source_name).map(|c| c.id) else {
            return Ok(self.unresolved(AssociationOutcome::UnresolvedSource, &source_name));
        };
        let Some(target) = self
            .store
            .find_class_by_name(&data.target_class_name, &data.target_class_namespace)
            .map(|c| c.id)
        else {
            let target_name = data.target_class_full_name();
            return Ok(self.unresolved(AssociationOutcome::UnresolvedTarget, &target_name));
        };

        if self.store.has_association(
            source,
            target,
            Some(&data.source_property_name),
            &data.target_property_name,
        ) {
            return Ok(self.duplicate(&source_name, &data.target_property_name));
        }

        let navigation = SourceNavigation {
            property_name: data.source_property_name.clone(),
            summary: data.source_summary.clone(),
            description: data.source_description.clone(),
        };
        let association = Association::bidirectional(source, target, navigation)
            .with_target_navigation(
                &data.target_property_name,
                &data.target_summary,
                &data.target_description,
            )
            .with_multiplicities(
                data.source_multiplicity.into(),
                data.target_multiplicity.into(),
            );

        let id = self.store.add_association(association)?;
        self.report.associations_created += 1;
        Ok(AssociationOutcome::Created(id))
    }

    fn unresolved(&mut self, outcome: AssociationOutcome, class_name: &str) -> AssociationOutcome {
        tracing::debug!("Skipping association: class {} not found", class_name);
        self.report.unresolved_associations += 1;
        outcome
    }

    fn duplicate(&mut self, source_name: &str, property: &str) -> AssociationOutcome {
        tracing::debug!("Skipping existing association {}.{}", source_name, property);
        self.report.duplicate_associations += 1;
        AssociationOutcome::Duplicate
    }
}

// ============================================================================
// Tests
// ============================================================================
