//! The schema accessor seam.
//!
//! The evaluator never owns schema data. It navigates whatever schema representation
//! the host system has through the [`SchemaNode`] trait, which mirrors the attribute
//! vocabulary of the schema format: `name`, `mode`, `default`, `pattern`, `features`,
//! `idref_prefix`, `idref_self`, `when`, `must`, `if-feature`, and enumeration values
//! that map a configured name to a stored value.

use std::fmt::Debug;

/// One enumeration entry of a schema node: the configured name and the value stored for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueAlias<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

/// A read-only handle to a node in a schema tree.
///
/// Handles are cheap to copy. `'a` is the lifetime of the underlying schema storage.
///
/// Only the navigation primitives and the three shape predicates must be provided;
/// path lookup, attribute shortcuts and value translation have default implementations
/// in terms of those.
pub trait SchemaNode<'a>: Debug + Clone + Copy + PartialEq + Eq {
    /// The node's `name` attribute. List-entry placeholders are named `*`.
    fn name(&self) -> &'a str;

    /// Reads an attribute by key, `None` when absent.
    fn attribute(&self, key: &str) -> Option<&'a str>;

    /// The enclosing schema node. Top-level nodes have no parent.
    fn parent(&self) -> Option<Self>;

    /// The schema nodes directly below this one, in document order.
    fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a>;

    /// The enumeration table of this node.
    fn values(&self) -> Box<dyn Iterator<Item = ValueAlias<'a>> + 'a>;

    /// A leaf holds a single value.
    fn is_leaf(&self) -> bool;

    /// A list has a single `*` child standing for its entries.
    fn is_list(&self) -> bool;

    /// A leaf-list is a list whose entries have no children of their own.
    fn is_leaf_list(&self) -> bool;

    /// The following sibling in document order.
    fn next_sibling(&self) -> Option<Self> {
        let parent = self.parent()?;
        parent.children().skip_while(|c| c != self).nth(1)
    }

    /// Finds the child matching one path segment.
    ///
    /// An exact name match wins, then a match after dropping a `prefix:` qualifier
    /// from the segment, then a `*` list-entry placeholder.
    fn child(&self, segment: &str) -> Option<Self> {
        if let Some(exact) = self.children().find(|c| c.name() == segment) {
            return Some(exact);
        }
        if let Some((_, local)) = segment.split_once(':') {
            if let Some(unqualified) = self.children().find(|c| c.name() == local) {
                return Some(unqualified);
            }
        }
        self.children().find(|c| c.name() == "*")
    }

    /// Resolves a slash-separated path relative to this node.
    ///
    /// Called on a schema root this is the absolute path lookup. Empty paths resolve
    /// to nothing since the root itself is not a schema node.
    fn lookup(&self, path: &str) -> Option<Self> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let mut node = self.child(segments.next()?)?;
        for segment in segments {
            node = node.child(segment)?;
        }
        Some(node)
    }

    fn mode(&self) -> Option<&'a str> {
        self.attribute("mode")
    }

    fn pattern(&self) -> Option<&'a str> {
        self.attribute("pattern")
    }

    fn default_value(&self) -> Option<&'a str> {
        self.attribute("default")
    }

    fn features(&self) -> Option<&'a str> {
        self.attribute("features")
    }

    /// Maps a configured enumeration name to the value stored for it.
    ///
    /// Values with no matching entry pass through unchanged.
    fn translate_from(&self, value: &str) -> String {
        self.values()
            .find(|alias| alias.name == value)
            .map_or_else(|| value.to_string(), |alias| alias.value.to_string())
    }

    /// Maps a stored value back to its configured enumeration name.
    ///
    /// An absent value falls back to the node's `default` attribute first.
    fn translate_to(&self, value: Option<&str>) -> Option<String> {
        let value = value.or_else(|| self.default_value())?;
        Some(
            self.values()
                .find(|alias| alias.value == value)
                .map_or_else(|| value.to_string(), |alias| alias.name.to_string()),
        )
    }
}
