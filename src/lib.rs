//! Compiled JSONPath-like paths over JSON-shaped documents.
//!
//! A path is compiled once into a [`CompiledPath`] and can then be used to
//! read from ([`CompiledPath::lookup`]), write into ([`CompiledPath::set`])
//! or canonicalize against ([`CompiledPath::canonicalize`]) any document
//! whose type implements [`Node`].
//!
//! ```
//! use jpath::get;
//! use serde_json::json;
//!
//! let doc = json!({"store": {"book": [{"price": 8.95}, {"price": 12.99}]}});
//! let (prices, many) = get(&doc, "$.store.book[*].price").unwrap();
//! assert_eq!(prices, json!([8.95, 12.99]));
//! assert!(many);
//! ```
pub mod accessor;
pub mod ast;
pub mod canonical;
#[cfg(feature = "cli")]
pub mod cli;
pub mod compare;
pub mod error;
pub mod evaluator;
pub mod filter;
pub mod lexer;
pub mod node;
pub mod parser;
pub mod value;

pub use accessor::{get_by_index, get_by_key, get_by_range, set_by_index, set_by_key, Selection, Slot};
pub use ast::{CmpOp, CompiledPath, Filter, FilterExpression, OpKind, Operation, OperationArgs};
pub use canonical::{optimize, optimize_with, Discriminators};
pub use compare::compare;
pub use error::{PathError, Result};
pub use evaluator::EvalContext;
pub use filter::{eval_filter, parse_filter};
pub use lexer::{tokenize, Lexer};
pub use node::{ArrayLike, Node, ObjectLike, Scalar};
pub use parser::{compile, must_compile, parse_operation, Parser};
pub use value::Value;

/// Compile `path` and evaluate it against `document`.
///
/// The flag is `true` when the result was assembled from several elements.
pub fn get<D: Node>(document: &D, path: &str) -> Result<(D, bool)> {
    compile(path)?.lookup(document)
}

/// Compile `path` and write `value` into `document` at it.
pub fn set<D: Node>(document: &mut D, path: &str, value: D) -> Result<()> {
    compile(path)?.set(document, value)
}
