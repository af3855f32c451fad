//! Data lookups: the in-memory tree first, then the backing store.

use crate::context::EvalContext;
use yangcond_traits::SchemaNode;

/// Checks whether `path` exists, returning the value stored there when it does.
///
/// The stored value is translated through the schema node's enumeration table.
pub fn step_exists<'a, N: SchemaNode<'a>>(
    ctx: &EvalContext<'a, '_, N>,
    path: &str,
) -> Option<Option<String>> {
    let stored = match ctx.data_root.find(path) {
        Some(node) => node.value().map(str::to_string),
        None if ctx.config.store_fallback => {
            log::trace!("'{path}' not in tree, asking {} store", ctx.store.name());
            ctx.store.get_tree(path)?.value().map(str::to_string)
        }
        None => return None,
    };
    Some(stored.map(|value| match ctx.schema.lookup(path) {
        Some(schema_node) => schema_node.translate_from(&value),
        None => value,
    }))
}

/// The value stored at `path`, untranslated.
pub fn stored_value<'a, N: SchemaNode<'a>>(
    ctx: &EvalContext<'a, '_, N>,
    path: &str,
) -> Option<String> {
    if let Some(node) = ctx.data_root.find(path) {
        return node.value().map(str::to_string);
    }
    if ctx.config.store_fallback {
        ctx.store.get_value(path)
    } else {
        None
    }
}

/// Number of children below `path`, 0 when nothing is there.
pub fn child_count<'a, N: SchemaNode<'a>>(ctx: &EvalContext<'a, '_, N>, path: &str) -> usize {
    if let Some(node) = ctx.data_root.find(path) {
        return node.children().len();
    }
    if !ctx.config.store_fallback {
        return 0;
    }
    ctx.store
        .get_tree(path)
        .map_or(0, |tree| tree.children().len())
}
