//! The model graph store
//!
//! `ModelStore` is the context object every component receives explicitly.
//! It owns the single `ModelRoot`, the class, enumeration and association
//! collections, and the lookup indices that make structural-key resolution
//! O(1). The indices are maintained incrementally as elements are added or
//! re-keyed and are rebuilt after deserialization.

use crate::{Association, EdgeKey, ModelClass, ModelEnum};
use chrono::{DateTime, Utc};
use efdesign_core::{
    AssociationId, ClassId, EngineError, EngineResult, EnumId, Named, Validatable,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// ============================================================================
// ModelRoot
// ============================================================================

/// Model-wide metadata. Exactly one exists per store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRoot {
    /// Name of the generated context class
    pub entity_container_name: String,

    /// Default namespace for generated code
    pub namespace: String,
}

// ============================================================================
// ModelStore
// ============================================================================

/// Root container for a model graph
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "StoredModel")]
pub struct ModelStore {
    /// Model-wide metadata
    pub root: ModelRoot,

    /// Classes in creation order
    classes: IndexMap<ClassId, ModelClass>,

    /// Enumerations in creation order
    enums: IndexMap<EnumId, ModelEnum>,

    /// Association edges in creation order
    associations: IndexMap<AssociationId, Association>,

    /// Last modification timestamp
    pub modified_at: DateTime<Utc>,

    #[serde(skip)]
    class_by_full_name: HashMap<String, ClassId>,

    #[serde(skip)]
    class_by_name: HashMap<(String, String), ClassId>,

    #[serde(skip)]
    enum_by_full_name: HashMap<String, EnumId>,

    #[serde(skip)]
    edge_keys: HashSet<EdgeKey>,
}

/// Persisted shape of a `ModelStore`, without indices
#[derive(Deserialize)]
struct StoredModel {
    root: ModelRoot,
    classes: IndexMap<ClassId, ModelClass>,
    enums: IndexMap<EnumId, ModelEnum>,
    associations: IndexMap<AssociationId, Association>,
    modified_at: DateTime<Utc>,
}

impl From<StoredModel> for ModelStore {
    fn from(stored: StoredModel) -> Self {
        let mut store = Self {
            root: stored.root,
            classes: stored.classes,
            enums: stored.enums,
            associations: stored.associations,
            modified_at: stored.modified_at,
            class_by_full_name: HashMap::new(),
            class_by_name: HashMap::new(),
            enum_by_full_name: HashMap::new(),
            edge_keys: HashSet::new(),
        };
        store.rebuild_indices();
        store
    }
}

impl ModelStore {
    /// Create an empty store with a default root
    pub fn new() -> Self {
        Self::with_root(ModelRoot::default())
    }

    /// Create an empty store with the given root metadata
    pub fn with_root(root: ModelRoot) -> Self {
        Self {
            root,
            classes: IndexMap::new(),
            enums: IndexMap::new(),
            associations: IndexMap::new(),
            modified_at: Utc::now(),
            class_by_full_name: HashMap::new(),
            class_by_name: HashMap::new(),
            enum_by_full_name: HashMap::new(),
            edge_keys: HashSet::new(),
        }
    }

    // ========================================================================
    // Identity Resolution
    // ========================================================================

    /// Find a class by its full name (exact match)
    pub fn find_class(&self, full_name: &str) -> Option<&ModelClass> {
        self.class_by_full_name
            .get(full_name)
            .and_then(|id| self.classes.get(id))
    }

    /// Find a class by its name and namespace (exact match on both)
    pub fn find_class_by_name(&self, name: &str, namespace: &str) -> Option<&ModelClass> {
        self.class_by_name
            .get(&(name.to_string(), namespace.to_string()))
            .and_then(|id| self.classes.get(id))
    }

    /// Find an enumeration by its full name (exact match)
    pub fn find_enum(&self, full_name: &str) -> Option<&ModelEnum> {
        self.enum_by_full_name
            .get(full_name)
            .and_then(|id| self.enums.get(id))
    }

    // ========================================================================
    // Class Management
    // ========================================================================

    /// Add a class, failing if its full name is already taken
    pub fn add_class(&mut self, class: ModelClass) -> EngineResult<ClassId> {
        let key = class.full_name();
        if self.class_by_full_name.contains_key(&key) {
            return Err(EngineError::DuplicateClass(key));
        }

        let id = class.id;
        self.index_class(&class);
        self.classes.insert(id, class);
        self.touch();
        Ok(id)
    }

    /// Get a class by ID
    pub fn class(&self, id: ClassId) -> Option<&ModelClass> {
        self.classes.get(&id)
    }

    /// Apply an in-place update to a class and re-key it if its name or
    /// namespace changed.
    ///
    /// Fails without applying anything if the class does not exist, and
    /// rolls back if the new full name collides with another class.
    pub fn update_class<F>(&mut self, id: ClassId, update: F) -> EngineResult<()>
    where
        F: FnOnce(&mut ModelClass),
    {
        let class = self
            .classes
            .get_mut(&id)
            .ok_or_else(|| EngineError::ClassNotFound(id.to_string()))?;
        let before = class.clone();
        update(class);

        if class.is_named(&before.name, &before.namespace) {
            self.touch();
            return Ok(());
        }

        let new_key = class.full_name();
        if self
            .class_by_full_name
            .get(&new_key)
            .is_some_and(|other| *other != id)
        {
            self.classes.insert(id, before);
            return Err(EngineError::DuplicateClass(new_key));
        }

        self.unindex_class(&before);
        if let Some(updated) = self.classes.get(&id).cloned() {
            self.index_class(&updated);
        }
        tracing::debug!("Re-keyed class {} as {}", before.full_name(), new_key);
        self.touch();
        Ok(())
    }

    /// Iterate classes in creation order
    pub fn classes(&self) -> impl Iterator<Item = &ModelClass> {
        self.classes.values()
    }

    /// Get the number of classes
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    fn index_class(&mut self, class: &ModelClass) {
        self.class_by_full_name.insert(class.full_name(), class.id);
        self.class_by_name
            .insert((class.name.clone(), class.namespace.clone()), class.id);
    }

    fn unindex_class(&mut self, class: &ModelClass) {
        self.class_by_full_name.remove(&class.full_name());
        self.class_by_name
            .remove(&(class.name.clone(), class.namespace.clone()));
    }

    // ========================================================================
    // Enumeration Management
    // ========================================================================

    /// Add an enumeration, failing if its full name is already taken
    pub fn add_enum(&mut self, model_enum: ModelEnum) -> EngineResult<EnumId> {
        let key = model_enum.full_name();
        if self.enum_by_full_name.contains_key(&key) {
            return Err(EngineError::DuplicateEnum(key));
        }

        let id = model_enum.id;
        self.enum_by_full_name.insert(key, id);
        self.enums.insert(id, model_enum);
        self.touch();
        Ok(id)
    }

    /// Get an enumeration by ID
    pub fn enumeration(&self, id: EnumId) -> Option<&ModelEnum> {
        self.enums.get(&id)
    }

    /// Apply an in-place update to an enumeration and re-key it if needed
    pub fn update_enum<F>(&mut self, id: EnumId, update: F) -> EngineResult<()>
    where
        F: FnOnce(&mut ModelEnum),
    {
        let model_enum = self
            .enums
            .get_mut(&id)
            .ok_or_else(|| EngineError::EnumNotFound(id.to_string()))?;
        let before = model_enum.clone();
        update(model_enum);

        let new_key = model_enum.full_name();
        let old_key = before.full_name();
        if new_key != old_key {
            if self
                .enum_by_full_name
                .get(&new_key)
                .is_some_and(|other| *other != id)
            {
                self.enums.insert(id, before);
                return Err(EngineError::DuplicateEnum(new_key));
            }
            self.enum_by_full_name.remove(&old_key);
            self.enum_by_full_name.insert(new_key, id);
        }

        self.touch();
        Ok(())
    }

    /// Iterate enumerations in creation order
    pub fn enums(&self) -> impl Iterator<Item = &ModelEnum> {
        self.enums.values()
    }

    /// Get the number of enumerations
    pub fn enum_count(&self) -> usize {
        self.enums.len()
    }

    // ========================================================================
    // Association Management
    // ========================================================================

    /// Add an association edge.
    ///
    /// Both endpoints must exist, and a bidirectional edge must not duplicate
    /// an existing one in either orientation.
    pub fn add_association(&mut self, association: Association) -> EngineResult<AssociationId> {
        for endpoint in [association.source, association.target] {
            if !self.classes.contains_key(&endpoint) {
                return Err(EngineError::ClassNotFound(endpoint.to_string()));
            }
        }

        let key = association.edge_key();
        if self.edge_keys.contains(&key) {
            return Err(EngineError::DuplicateAssociation {
                from: self.class_label(association.source),
                to: self.class_label(association.target),
            });
        }

        let id = association.id;
        self.edge_keys.insert(key);
        self.associations.insert(id, association);
        self.touch();
        Ok(id)
    }

    /// Check for an existing edge with the given shape.
    ///
    /// `source_property` is `None` for unidirectional edges; bidirectional
    /// edges also match with both endpoints and both property names swapped.
    pub fn has_association(
        &self,
        source: ClassId,
        target: ClassId,
        source_property: Option<&str>,
        target_property: &str,
    ) -> bool {
        self.edge_keys
            .contains(&EdgeKey::new(source, target, source_property, target_property))
    }

    /// Get an association by ID
    pub fn association(&self, id: AssociationId) -> Option<&Association> {
        self.associations.get(&id)
    }

    /// Iterate associations in creation order
    pub fn associations(&self) -> impl Iterator<Item = &Association> {
        self.associations.values()
    }

    /// Associations touching a class
    pub fn associations_for_class(&self, class_id: ClassId) -> Vec<&Association> {
        self.associations
            .values()
            .filter(|a| a.involves_class(class_id))
            .collect()
    }

    /// Get the number of unidirectional associations
    pub fn unidirectional_count(&self) -> usize {
        self.associations
            .values()
            .filter(|a| !a.is_bidirectional())
            .count()
    }

    /// Get the number of bidirectional associations
    pub fn bidirectional_count(&self) -> usize {
        self.associations
            .values()
            .filter(|a| a.is_bidirectional())
            .count()
    }

    /// Get the number of associations
    pub fn association_count(&self) -> usize {
        self.associations.len()
    }

    // ========================================================================
    // Utility Methods
    // ========================================================================

    /// Update the modification timestamp
    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }

    /// Check if the model is empty
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.enums.is_empty()
    }

    /// Rebuild all lookup indices from the collections.
    ///
    /// On duplicate keys the first element in collection order wins.
    pub fn rebuild_indices(&mut self) {
        self.class_by_full_name.clear();
        self.class_by_name.clear();
        self.enum_by_full_name.clear();
        self.edge_keys.clear();

        for class in self.classes.values() {
            self.class_by_full_name
                .entry(class.full_name())
                .or_insert(class.id);
            self.class_by_name
                .entry((class.name.clone(), class.namespace.clone()))
                .or_insert(class.id);
        }
        for model_enum in self.enums.values() {
            self.enum_by_full_name
                .entry(model_enum.full_name())
                .or_insert(model_enum.id);
        }
        for association in self.associations.values() {
            self.edge_keys.insert(association.edge_key());
        }
    }

    fn class_label(&self, id: ClassId) -> String {
        self.classes
            .get(&id)
            .map(|c| c.full_name())
            .unwrap_or_else(|| id.to_string())
    }
}

impl Validatable for ModelStore {
    fn validate(&self) -> EngineResult<()> {
        let mut class_names = HashSet::new();
        for class in self.classes.values() {
            class.validate()?;
            if !class_names.insert(class.full_name()) {
                return Err(EngineError::DuplicateClass(class.full_name()));
            }
        }

        let mut enum_names = HashSet::new();
        for model_enum in self.enums.values() {
            model_enum.validate()?;
            if !enum_names.insert(model_enum.full_name()) {
                return Err(EngineError::DuplicateEnum(model_enum.full_name()));
            }
        }

        let mut edge_keys = HashSet::new();
        for association in self.associations.values() {
            association.validate()?;

            for endpoint in [association.source, association.target] {
                if !self.classes.contains_key(&endpoint) {
                    return Err(EngineError::association_validation(format!(
                        "Association '{}' references non-existent class {}",
                        association.target_property_name, endpoint
                    )));
                }
            }

            if !edge_keys.insert(association.edge_key()) {
                return Err(EngineError::DuplicateAssociation {
                    from: self.class_label(association.source),
                    to: self.class_label(association.target),
                });
            }
        }

        Ok(())
    }
}

impl Default for ModelStore {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
