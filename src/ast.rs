//! # Compiled path representation
//!
//! A path string is compiled once into a [`CompiledPath`]: the original text
//! plus an ordered list of [`Operation`]s. Compiled paths are immutable and
//! can be evaluated any number of times, from any number of threads, against
//! different documents.
//!
//! ## Submodules
//!
//! - **[operation]** - operation kinds and their arguments
//! - **[operators]** - comparison operators used in filters
//! - **[filter]** - filter conjuncts, both as written and compiled
//! - **[path]** - the compiled path itself
//!
//! ## Path grammar
//!
//! ```text
//! $ | @                  root of the document / current node
//! .key                   object key
//! ..key                  recursive descent
//! [n] | [n1,n2,...]      index or index list (negative counts from the end)
//! [from:to] | [*]        inclusive range, either bound optional
//! [?( <filter> )]        filter, conjuncts joined by &&
//! *                      wildcard
//! ```
pub mod filter;
pub mod operation;
pub mod operators;
pub mod path;

pub use filter::{Filter, FilterExpression};
pub(crate) use filter::{Operand, OperandStep, Predicate, Test};
pub use operation::{OpKind, Operation, OperationArgs};
pub use operators::CmpOp;
pub use path::CompiledPath;
