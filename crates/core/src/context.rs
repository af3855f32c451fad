//! The state an evaluation runs against.

use crate::config::EvalConfig;
use std::marker::PhantomData;
use yangcond_traits::{DataStore, SchemaNode};
use yangcond_types::DataNode;

/// Everything an evaluation reads. Immutable for the whole evaluation.
pub struct EvalContext<'a, 'd, N: SchemaNode<'a>> {
    /// Absolute path of the data node the condition is anchored at.
    pub path: &'d str,
    /// The in-memory data tree, searched before the store.
    pub data_root: &'d DataNode,
    /// Root of the schema, for path lookups.
    pub schema: N,
    pub store: &'d dyn DataStore,
    pub config: &'d EvalConfig,
    /// Set while evaluating the argument of `if-feature()`.
    pub in_if_feature: bool,
    _marker: PhantomData<&'a ()>,
}

impl<'a, 'd, N: SchemaNode<'a>> EvalContext<'a, 'd, N> {
    pub fn new(
        path: &'d str,
        data_root: &'d DataNode,
        schema: N,
        store: &'d dyn DataStore,
        config: &'d EvalConfig,
    ) -> Self {
        Self {
            path,
            data_root,
            schema,
            store,
            config,
            in_if_feature: false,
            _marker: PhantomData,
        }
    }

    /// A copy of this context for evaluating an `if-feature()` argument.
    pub fn for_if_feature(&self) -> Self {
        Self {
            in_if_feature: true,
            ..*self
        }
    }
}

impl<'a, N: SchemaNode<'a>> Clone for EvalContext<'a, '_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, N: SchemaNode<'a>> Copy for EvalContext<'a, '_, N> {}

/// Mutable state scoped to one Step evaluation.
#[derive(Debug, Default, Clone, Copy)]
pub struct StepScope {
    /// Set once the first child test of the step has been re-anchored at the parent.
    pub first_child_done: bool,
}
