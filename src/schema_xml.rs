//! Loads a [`SchemaTree`] from schema XML.
//!
//! The format nests `NODE` elements under a `MODULE` document element. A `NODE` carries
//! its name and attributes such as `mode`, `features`, `when`, `must` and `if-feature`;
//! its `VALUE` children map enumeration names to stored values. Namespaces are ignored.

use crate::error::AppError;
use yangcond_traits::{SchemaId, SchemaTree};

/// Parses `text` into a new schema tree.
pub fn load_schema(text: &str) -> Result<SchemaTree, AppError> {
    let doc = roxmltree::Document::parse(text)?;
    let mut tree = SchemaTree::new();
    let root = tree.root_id();
    load_children(doc.root_element(), root, &mut tree)?;
    log::debug!("Loaded schema with {} nodes", tree.len());
    Ok(tree)
}

fn load_children(
    element: roxmltree::Node<'_, '_>,
    parent: SchemaId,
    tree: &mut SchemaTree,
) -> Result<(), AppError> {
    for child in element.children().filter(roxmltree::Node::is_element) {
        match child.tag_name().name() {
            "NODE" => load_node(child, parent, tree)?,
            "VALUE" => {
                let name = child.attribute("name");
                let value = child.attribute("value");
                match (name, value) {
                    (Some(name), Some(value)) => tree.add_value(parent, name, value),
                    _ => {
                        return Err(AppError::Schema(format!(
                            "VALUE at byte {} needs both name and value",
                            child.range().start
                        )));
                    }
                }
            }
            other => log::trace!("Ignoring schema element <{other}>"),
        }
    }
    Ok(())
}

fn load_node(
    element: roxmltree::Node<'_, '_>,
    parent: SchemaId,
    tree: &mut SchemaTree,
) -> Result<(), AppError> {
    let Some(name) = element.attribute("name") else {
        return Err(AppError::Schema(format!(
            "NODE at byte {} has no name",
            element.range().start
        )));
    };
    let id = tree.add_node(parent, name);
    for attr in element.attributes().filter(|attr| attr.name() != "name") {
        tree.set_attribute(id, attr.name(), attr.value());
    }
    load_children(element, id, tree)
}
