use std::fmt;

use crate::ast::Operation;

/// A path compiled once and evaluated many times.
///
/// Holds no evaluation state: every traversal carries its own cursor, so a
/// single compiled path can be shared across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPath {
    path: String,
    operations: Vec<Operation>,
}

impl CompiledPath {
    pub(crate) fn new(path: &str, operations: Vec<Operation>) -> Self {
        CompiledPath {
            path: path.to_string(),
            operations,
        }
    }

    /// The path text this was compiled from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Operations in evaluation order (the root marker is not included).
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }
}

impl fmt::Display for CompiledPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Compiled lookup: {}", self.path)
    }
}
