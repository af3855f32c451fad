//! An arena-backed, in-memory schema tree implementing [`SchemaNode`].
//!
//! Hosts that keep their schema elsewhere implement [`SchemaNode`] over their own
//! storage. This implementation serves tests, tooling and small embedded schemas.

use crate::schema::{SchemaNode, ValueAlias};
use std::collections::BTreeMap;

/// Index of a node inside a [`SchemaTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(usize);

#[derive(Debug, Clone, Default)]
struct SchemaNodeData {
    name: String,
    attributes: BTreeMap<String, String>,
    values: Vec<(String, String)>,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// The arena. Index 0 is a virtual root that holds the top-level nodes.
#[derive(Debug, Clone)]
pub struct SchemaTree {
    nodes: Vec<SchemaNodeData>,
}

impl Default for SchemaTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![SchemaNodeData::default()],
        }
    }

    pub fn root_id(&self) -> SchemaId {
        SchemaId(0)
    }

    /// A handle to the virtual root, the starting point for absolute lookups.
    pub fn root(&self) -> SchemaRef<'_> {
        SchemaRef { id: 0, tree: self }
    }

    pub fn get(&self, id: SchemaId) -> Option<SchemaRef<'_>> {
        (id.0 < self.nodes.len()).then_some(SchemaRef { id: id.0, tree: self })
    }

    /// Appends a node named `name` below `parent`.
    pub fn add_node(&mut self, parent: SchemaId, name: impl Into<String>) -> SchemaId {
        let id = self.nodes.len();
        self.nodes.push(SchemaNodeData {
            name: name.into(),
            parent: Some(parent.0),
            ..Default::default()
        });
        if let Some(parent_data) = self.nodes.get_mut(parent.0) {
            parent_data.children.push(id);
        }
        SchemaId(id)
    }

    pub fn set_attribute(&mut self, id: SchemaId, key: impl Into<String>, value: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.attributes.insert(key.into(), value.into());
        }
    }

    /// Adds an enumeration entry mapping the configured `name` to the stored `value`.
    pub fn add_value(&mut self, id: SchemaId, name: impl Into<String>, value: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.values.push((name.into(), value.into()));
        }
    }

    /// Creates every missing node along `path` and returns the id of the last one.
    pub fn insert_path(&mut self, path: &str) -> SchemaId {
        let mut current = 0;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let existing = self.nodes[current]
                .children
                .iter()
                .copied()
                .find(|&c| self.nodes[c].name == segment);
            current = match existing {
                Some(child) => child,
                None => self.add_node(SchemaId(current), segment).0,
            };
        }
        SchemaId(current)
    }

    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A copyable handle into a [`SchemaTree`].
#[derive(Debug, Clone, Copy)]
pub struct SchemaRef<'a> {
    id: usize,
    tree: &'a SchemaTree,
}

impl PartialEq for SchemaRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.tree, other.tree)
    }
}
impl Eq for SchemaRef<'_> {}

impl<'a> SchemaRef<'a> {
    pub fn id(&self) -> SchemaId {
        SchemaId(self.id)
    }

    fn data(&self) -> &'a SchemaNodeData {
        &self.tree.nodes[self.id]
    }
}

impl<'a> SchemaNode<'a> for SchemaRef<'a> {
    fn name(&self) -> &'a str {
        &self.data().name
    }

    fn attribute(&self, key: &str) -> Option<&'a str> {
        if key == "name" {
            return Some(self.name());
        }
        self.data().attributes.get(key).map(String::as_str)
    }

    fn parent(&self) -> Option<Self> {
        match self.data().parent {
            Some(0) | None => None,
            Some(id) => Some(SchemaRef { id, tree: self.tree }),
        }
    }

    fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
        let tree = self.tree;
        Box::new(
            self.data()
                .children
                .iter()
                .map(move |&id| SchemaRef { id, tree }),
        )
    }

    fn values(&self) -> Box<dyn Iterator<Item = ValueAlias<'a>> + 'a> {
        Box::new(self.data().values.iter().map(|(name, value)| ValueAlias {
            name: name.as_str(),
            value: value.as_str(),
        }))
    }

    fn is_leaf(&self) -> bool {
        let data = self.data();
        if !data.children.is_empty() {
            return false;
        }
        data.attributes.contains_key("mode") || !data.values.is_empty()
    }

    fn is_list(&self) -> bool {
        match self.data().children.as_slice() {
            [only] => self.tree.nodes[*only].name == "*",
            _ => false,
        }
    }

    fn is_leaf_list(&self) -> bool {
        match self.data().children.as_slice() {
            [only] => {
                let entry = &self.tree.nodes[*only];
                entry.name == "*" && entry.children.is_empty()
            }
            _ => false,
        }
    }

    fn next_sibling(&self) -> Option<Self> {
        let parent = self.data().parent?;
        let siblings = &self.tree.nodes[parent].children;
        let position = siblings.iter().position(|&c| c == self.id)?;
        siblings.get(position + 1).map(|&id| SchemaRef { id, tree: self.tree })
    }
}
