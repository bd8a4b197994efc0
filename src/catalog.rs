//! Property catalog: the deduplicated key table of the serialized form.
//!
//! The exchange format never repeats property key strings; each key is
//! declared once in the `propertydefinitions` section and referenced by
//! a synthetic `propid-N` identifier. The catalog exists only while a
//! model is being serialized.

use indexmap::IndexMap;

use crate::model::{Model, Property};
use crate::view::{Node, NodeKind};

/// Ordered mapping from property key to synthetic identifier.
#[derive(Clone, Debug, Default)]
pub struct PropertyCatalog {
    entries: IndexMap<String, String>,
}

impl PropertyCatalog {
    /// Build the catalog with one stable traversal over every property
    /// instance in the model: the root, concepts in arena order, then
    /// each view with its node tree.
    ///
    /// Each non-empty key gets the next sequential id the first time it
    /// is seen, so repeated exports of an unchanged model produce an
    /// identical table.
    pub fn build(model: &Model) -> Self {
        let mut catalog = Self::default();

        catalog.add_all(&model.properties);
        for concept in model.concepts.values() {
            catalog.add_all(&concept.properties);
        }
        for view in &model.views {
            catalog.add_all(&view.properties);
            for node in &view.nodes {
                catalog.add_node(node);
            }
        }

        catalog
    }

    fn add_node(&mut self, node: &Node) {
        if let NodeKind::Group { properties, .. } = &node.kind {
            self.add_all(properties);
        }
        for child in node.children() {
            self.add_node(child);
        }
    }

    fn add_all(&mut self, properties: &[Property]) {
        for property in properties {
            if property.key.is_empty() {
                continue;
            }
            if !self.entries.contains_key(&property.key) {
                let id = format!("propid-{}", self.entries.len() + 1);
                self.entries.insert(property.key.clone(), id);
            }
        }
    }

    /// The synthetic id for a key, if the key is cataloged.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Iterate over `(key, id)` entries in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
