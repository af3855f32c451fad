//! The in-memory data tree that conditions are evaluated against.
//!
//! A tree is a plain owned hierarchy of named nodes. Leaves carry a string value.
//! The root node's name doubles as the absolute path of the tree: a root named
//! `/interfaces` yields children at `/interfaces/<name>`, while a root named `""`
//! or `/` anchors its children directly under `/`.

use crate::path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataNode {
    name: String,
    value: Option<String>,
    children: Vec<DataNode>,
}

impl DataNode {
    /// Creates an interior node with no value.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            children: Vec::new(),
        }
    }

    /// Creates a leaf node carrying `value`.
    pub fn leaf(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            children: Vec::new(),
        }
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: DataNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: DataNode) {
        self.children.push(child);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
    }

    pub fn children(&self) -> &[DataNode] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&DataNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// A node carries data when it has a value or at least one child.
    pub fn has_data(&self) -> bool {
        self.value.is_some() || !self.children.is_empty()
    }

    /// The absolute path this node occupies when it is the root of a tree.
    pub fn root_path(&self) -> String {
        let trimmed = self.name.trim_end_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            path::join("", trimmed)
        }
    }

    /// Depth-first search for the node at exactly `target`, treating `self` as the root.
    pub fn find(&self, target: &str) -> Option<&DataNode> {
        let root_path = self.root_path();
        if root_path == target {
            return Some(self);
        }
        let relative = target.strip_prefix(root_path.as_str())?;
        if !relative.starts_with('/') {
            return None;
        }
        self.find_below(&root_path, target)
    }

    fn find_below(&self, own_path: &str, target: &str) -> Option<&DataNode> {
        for child in &self.children {
            let child_path = path::join(own_path, &child.name);
            if child_path == target {
                return Some(child);
            }
            if target.starts_with(child_path.as_str()) {
                if let Some(found) = child.find_below(&child_path, target) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Inserts `value` at `target`, creating intermediate nodes as needed.
    ///
    /// Returns `false` when `target` does not lie under this tree's root path.
    pub fn insert(&mut self, target: &str, value: impl Into<String>) -> bool {
        let root_path = self.root_path();
        let Some(relative) = target.strip_prefix(root_path.as_str()) else {
            return false;
        };
        if !relative.starts_with('/') {
            return false;
        }
        let mut node = self;
        for segment in path::segments(relative) {
            let idx = match node.children.iter().position(|c| c.name == segment) {
                Some(idx) => idx,
                None => {
                    node.children.push(DataNode::new(segment));
                    node.children.len() - 1
                }
            };
            node = &mut node.children[idx];
        }
        node.value = Some(value.into());
        true
    }

    /// Visits every node below the root together with its absolute path, depth first.
    pub fn walk<'t, F>(&'t self, mut visit: F)
    where
        F: FnMut(&str, &'t DataNode),
    {
        let root_path = self.root_path();
        self.walk_below(&root_path, &mut visit);
    }

    fn walk_below<'t, F>(&'t self, own_path: &str, visit: &mut F)
    where
        F: FnMut(&str, &'t DataNode),
    {
        for child in &self.children {
            let child_path = path::join(own_path, &child.name);
            visit(&child_path, child);
            child.walk_below(&child_path, visit);
        }
    }
}
