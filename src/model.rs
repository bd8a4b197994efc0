//! The in-memory model graph.
//!
//! A [`Model`] stores concepts (elements and relationships) in an
//! id-keyed arena, with a folder forest of id references and a list of
//! diagram views. Relationship endpoints and folder items are
//! non-owning `Id` references resolved by lookup, never by containment,
//! so forward references within one document are fine.
//!
//! ```text
//! Model
//! ├── concepts: IndexMap<Id, Concept>   (insertion order preserved)
//! ├── folders:  Vec<Folder>             (organization tree, id refs)
//! └── views:    Vec<View>
//! ```

use std::sync::Arc;

use indexmap::IndexMap;

use crate::types::{ConceptKind, JunctionKind};
use crate::view::View;

// ============================================================================
// IDS
// ============================================================================

/// Unique identifier for a model entity.
///
/// This corresponds to the `identifier` attribute in the exchange
/// format. Nodes and connections share this namespace with concepts so
/// connection endpoints can be resolved with one lookup.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Id(Arc<str>);

impl Id {
    /// Create a new id.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh UUID-based id.
    pub fn generate() -> Self {
        Self(format!("id-{}", uuid::Uuid::new_v4()).into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

// ============================================================================
// PROPERTIES
// ============================================================================

/// A key/value property. Keys need not be unique within one owner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Property {
    pub key: String,
    pub value: String,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

// ============================================================================
// CONCEPTS
// ============================================================================

/// Access direction of an access relationship.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AccessKind {
    #[default]
    Unspecified,
    Read,
    Write,
    ReadWrite,
}

impl AccessKind {
    /// Serialized `accessType` attribute value.
    pub fn type_value(&self) -> &'static str {
        match self {
            Self::Unspecified => crate::xml::ACCESS_TYPE_ACCESS,
            Self::Read => crate::xml::ACCESS_TYPE_READ,
            Self::Write => crate::xml::ACCESS_TYPE_WRITE,
            Self::ReadWrite => crate::xml::ACCESS_TYPE_READ_WRITE,
        }
    }

    /// Parse an `accessType` attribute value. Unknown values fall back
    /// to write access.
    pub fn from_type_value(value: &str) -> Self {
        match value {
            crate::xml::ACCESS_TYPE_ACCESS => Self::Unspecified,
            crate::xml::ACCESS_TYPE_READ => Self::Read,
            crate::xml::ACCESS_TYPE_READ_WRITE => Self::ReadWrite,
            _ => Self::Write,
        }
    }
}

/// Endpoint data carried by relationship concepts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelationshipInfo {
    /// Source concept id.
    pub source: Id,
    /// Target concept id.
    pub target: Id,
    /// Access direction, for access relationships only.
    pub access: Option<AccessKind>,
    /// Influence strength label, for influence relationships only.
    pub influence_strength: Option<String>,
}

impl RelationshipInfo {
    pub fn new(source: impl Into<Id>, target: impl Into<Id>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            access: None,
            influence_strength: None,
        }
    }
}

/// A model concept: an element, or a relationship when `relationship`
/// data is present.
#[derive(Clone, Debug)]
pub struct Concept {
    /// Unique identifier.
    pub id: Id,
    /// The concept kind.
    pub kind: ConceptKind,
    /// Name (may be absent).
    pub name: Option<String>,
    /// Documentation text.
    pub documentation: Option<String>,
    /// Properties in declaration order.
    pub properties: Vec<Property>,
    /// Junction sub-type; only meaningful when `kind` is a junction.
    pub junction: Option<JunctionKind>,
    /// Endpoint data; present exactly when `kind.is_relationship()`.
    pub relationship: Option<RelationshipInfo>,
}

impl Concept {
    /// Create a new element concept.
    pub fn new(id: impl Into<Id>, kind: ConceptKind) -> Self {
        Self {
            id: id.into(),
            kind,
            name: None,
            documentation: None,
            properties: Vec::new(),
            junction: None,
            relationship: None,
        }
    }

    /// Create a new relationship concept with endpoints.
    pub fn new_relationship(
        id: impl Into<Id>,
        kind: ConceptKind,
        source: impl Into<Id>,
        target: impl Into<Id>,
    ) -> Self {
        Self {
            relationship: Some(RelationshipInfo::new(source, target)),
            ..Self::new(id, kind)
        }
    }

    /// Create a junction concept with the given sub-type.
    pub fn new_junction(id: impl Into<Id>, junction: JunctionKind) -> Self {
        Self {
            junction: Some(junction),
            ..Self::new(id, ConceptKind::Junction)
        }
    }

    /// Set the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the documentation.
    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    /// Append a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push(Property::new(key, value));
        self
    }

    /// Set the access direction (access relationships).
    pub fn with_access(mut self, access: AccessKind) -> Self {
        if let Some(info) = self.relationship.as_mut() {
            info.access = Some(access);
        }
        self
    }

    /// Set the influence strength label (influence relationships).
    pub fn with_influence_strength(mut self, strength: impl Into<String>) -> Self {
        if let Some(info) = self.relationship.as_mut() {
            info.influence_strength = Some(strength.into());
        }
        self
    }

    /// Returns true if this concept is a relationship.
    pub fn is_relationship(&self) -> bool {
        self.relationship.is_some()
    }

    /// Source concept id, for relationships.
    pub fn source(&self) -> Option<&Id> {
        self.relationship.as_ref().map(|r| &r.source)
    }

    /// Target concept id, for relationships.
    pub fn target(&self) -> Option<&Id> {
        self.relationship.as_ref().map(|r| &r.target)
    }

    /// The serialized type name, consulting the junction sub-type flag.
    pub fn type_name(&self) -> &'static str {
        if self.kind == ConceptKind::Junction {
            ConceptKind::junction_type_name(self.junction.unwrap_or_default())
        } else {
            self.kind.type_name()
        }
    }
}

// ============================================================================
// FOLDERS
// ============================================================================

/// A folder in the organization tree.
///
/// Folders reference concepts and views by id; they never own them.
/// The serialized `organization` section is an auxiliary index built
/// from this forest.
#[derive(Clone, Debug, Default)]
pub struct Folder {
    pub name: String,
    pub documentation: Option<String>,
    /// Ids of concepts/views filed in this folder.
    pub items: Vec<Id>,
    /// Sub-folders.
    pub folders: Vec<Folder>,
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append an item reference.
    pub fn with_item(mut self, id: impl Into<Id>) -> Self {
        self.items.push(id.into());
        self
    }

    /// Append a sub-folder.
    pub fn with_folder(mut self, folder: Folder) -> Self {
        self.folders.push(folder);
        self
    }

    /// Returns true if the folder has neither items nor sub-folders.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.folders.is_empty()
    }
}

// ============================================================================
// MODEL
// ============================================================================

/// A complete model graph.
#[derive(Clone, Debug)]
pub struct Model {
    /// Globally unique model id.
    pub id: Id,
    /// Model name.
    pub name: Option<String>,
    /// Documentation (purpose) text.
    pub documentation: Option<String>,
    /// Root-level properties.
    pub properties: Vec<Property>,
    /// All concepts by id, in insertion order.
    pub concepts: IndexMap<Id, Concept>,
    /// Organization folder forest.
    pub folders: Vec<Folder>,
    /// Diagram views.
    pub views: Vec<View>,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// Create a new empty model with a generated id.
    pub fn new() -> Self {
        Self {
            id: Id::generate(),
            name: None,
            documentation: None,
            properties: Vec::new(),
            concepts: IndexMap::new(),
            folders: Vec::new(),
            views: Vec::new(),
        }
    }

    /// Add a concept, returning its id.
    pub fn add_concept(&mut self, concept: Concept) -> Id {
        let id = concept.id.clone();
        self.concepts.insert(id.clone(), concept);
        id
    }

    /// Add a view.
    pub fn add_view(&mut self, view: View) {
        self.views.push(view);
    }

    /// Get a concept by id.
    pub fn concept(&self, id: &Id) -> Option<&Concept> {
        self.concepts.get(id)
    }

    /// Get a view by id.
    pub fn view(&self, id: &Id) -> Option<&View> {
        self.views.iter().find(|v| &v.id == id)
    }

    /// Iterate over element concepts.
    pub fn elements(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.values().filter(|c| !c.is_relationship())
    }

    /// Iterate over relationship concepts.
    pub fn relationships(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.values().filter(|c| c.is_relationship())
    }

    /// Number of element concepts.
    pub fn element_count(&self) -> usize {
        self.elements().count()
    }

    /// Number of relationship concepts.
    pub fn relationship_count(&self) -> usize {
        self.relationships().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_generation() {
        let id1 = Id::generate();
        let id2 = Id::generate();
        assert_ne!(id1, id2);
        assert!(id1.as_str().starts_with("id-"));
    }

    #[test]
    fn test_concept_builder() {
        let concept = Concept::new("actor-1", ConceptKind::BusinessActor)
            .with_name("Customer")
            .with_documentation("An external customer.")
            .with_property("criticality", "high");

        assert_eq!(concept.id.as_str(), "actor-1");
        assert_eq!(concept.name.as_deref(), Some("Customer"));
        assert_eq!(concept.properties.len(), 1);
        assert!(!concept.is_relationship());
        assert_eq!(concept.type_name(), "BusinessActor");
    }

    #[test]
    fn test_relationship_concept() {
        let rel = Concept::new_relationship(
            "rel-1",
            ConceptKind::AccessRelationship,
            "proc-1",
            "obj-1",
        )
        .with_access(AccessKind::ReadWrite);

        assert!(rel.is_relationship());
        assert_eq!(rel.source().unwrap().as_str(), "proc-1");
        assert_eq!(rel.target().unwrap().as_str(), "obj-1");
        assert_eq!(
            rel.relationship.as_ref().unwrap().access,
            Some(AccessKind::ReadWrite)
        );
    }

    #[test]
    fn test_junction_type_name() {
        let and = Concept::new_junction("j1", JunctionKind::And);
        let or = Concept::new_junction("j2", JunctionKind::Or);
        assert_eq!(and.type_name(), "AndJunction");
        assert_eq!(or.type_name(), "OrJunction");
    }

    #[test]
    fn test_model_counts() {
        let mut model = Model::new();
        model.add_concept(Concept::new("a", ConceptKind::BusinessActor));
        model.add_concept(Concept::new("b", ConceptKind::BusinessProcess));
        model.add_concept(Concept::new_relationship(
            "r",
            ConceptKind::AssignmentRelationship,
            "a",
            "b",
        ));

        assert_eq!(model.element_count(), 2);
        assert_eq!(model.relationship_count(), 1);
        assert!(model.concept(&Id::new("a")).is_some());
        assert!(model.concept(&Id::new("missing")).is_none());
    }

    #[test]
    fn test_access_kind_values() {
        assert_eq!(AccessKind::Unspecified.type_value(), "Access");
        assert_eq!(AccessKind::from_type_value("Read"), AccessKind::Read);
        assert_eq!(
            AccessKind::from_type_value("ReadWrite"),
            AccessKind::ReadWrite
        );
        // Unknown values fall back to write access.
        assert_eq!(AccessKind::from_type_value("Bogus"), AccessKind::Write);
    }

    #[test]
    fn test_folder_is_empty() {
        let folder = Folder::new("Business");
        assert!(folder.is_empty());
        let folder = folder.with_item("a");
        assert!(!folder.is_empty());
    }
}
