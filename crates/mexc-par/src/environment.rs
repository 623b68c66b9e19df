//! The `let` binding environment.
//!
//! One flat scope per parse. Values are stored with spans stripped and
//! cloned out on every substitution, so each use site owns an independent
//! subtree: a handler mutating one substitution can never corrupt another,
//! and diagnostics never point into a `let` body the user is no longer
//! looking at.

use indexmap::IndexMap;

use crate::ast::Node;

/// Name-to-value map for `let` bindings, in source order.
#[derive(Debug, Default)]
pub(crate) struct Environment {
    bindings: IndexMap<String, Vec<Node>>,
}

impl Environment {
    pub(crate) fn new() -> Self {
        Self {
            bindings: IndexMap::new(),
        }
    }

    /// Store a binding, stripping spans first. A later binding for the same
    /// name shadows the earlier one.
    pub(crate) fn define(&mut self, name: String, mut value: Vec<Node>) {
        crate::ast::strip_spans(&mut value);
        self.bindings.insert(name, value);
    }

    /// Clone out the value bound to `name`, if any.
    pub(crate) fn lookup(&self, name: &str) -> Option<Vec<Node>> {
        self.bindings.get(name).cloned()
    }
}
