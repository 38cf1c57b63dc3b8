use std::fmt;

use crate::ast::Filter;

/// What a single path step does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// Jump back to the document root (`$`)
    Root,
    /// Object key (`.key`)
    Key,
    /// One or more indices (`key[0]`, `key[0,2]`)
    Index,
    /// Inclusive slice (`key[1:3]`, `key[*]`)
    Range,
    /// Filter (`key[?(@.price > 10)]`)
    Filter,
    /// Recursive descent (`..`)
    Scan,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpKind::Root => "root",
            OpKind::Key => "key",
            OpKind::Index => "idx",
            OpKind::Range => "range",
            OpKind::Filter => "filter",
            OpKind::Scan => "scan",
        };
        f.pad(name)
    }
}

/// Arguments carried by an operation.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationArgs {
    None,
    IndexList(Vec<i64>),
    /// `(from, to)`, both inclusive; `None` is unbounded
    RangeBound(Option<i64>, Option<i64>),
    FilterExpr(Filter),
}

/// One compiled path step.
///
/// `key` is the text before a bracket (`book` in `book[0]`); it is empty for
/// key-less brackets such as `$[0]`, `$` for [`OpKind::Root`] and `*` for
/// [`OpKind::Scan`].
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub kind: OpKind,
    pub key: String,
    pub args: OperationArgs,
}

/// The token form of the step, as it appears after a `.` in a path.
///
/// ```
/// use jpath::parse_operation;
///
/// let op = parse_operation("book[:2]").unwrap();
/// assert_eq!(op.to_string(), "book[:2]");
/// ```
impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.args {
            OperationArgs::None => f.write_str(&self.key),
            OperationArgs::IndexList(indices) => {
                let indices: Vec<String> = indices.iter().map(i64::to_string).collect();
                write!(f, "{}[{}]", self.key, indices.join(","))
            }
            OperationArgs::RangeBound(None, None) => write!(f, "{}[*]", self.key),
            OperationArgs::RangeBound(from, to) => {
                let bound = |b: &Option<i64>| b.map(|n| n.to_string()).unwrap_or_default();
                write!(f, "{}[{}:{}]", self.key, bound(from), bound(to))
            }
            OperationArgs::FilterExpr(filter) => write!(f, "{}[?({})]", self.key, filter.source()),
        }
    }
}

impl Operation {
    pub fn root() -> Self {
        Operation {
            kind: OpKind::Root,
            key: "$".to_string(),
            args: OperationArgs::None,
        }
    }

    pub fn scan() -> Self {
        Operation {
            kind: OpKind::Scan,
            key: "*".to_string(),
            args: OperationArgs::None,
        }
    }

    pub fn key(key: impl Into<String>) -> Self {
        Operation {
            kind: OpKind::Key,
            key: key.into(),
            args: OperationArgs::None,
        }
    }

    pub fn index(key: impl Into<String>, indices: Vec<i64>) -> Self {
        Operation {
            kind: OpKind::Index,
            key: key.into(),
            args: OperationArgs::IndexList(indices),
        }
    }

    pub fn range(key: impl Into<String>, from: Option<i64>, to: Option<i64>) -> Self {
        Operation {
            kind: OpKind::Range,
            key: key.into(),
            args: OperationArgs::RangeBound(from, to),
        }
    }

    pub fn filter(key: impl Into<String>, filter: Filter) -> Self {
        Operation {
            kind: OpKind::Filter,
            key: key.into(),
            args: OperationArgs::FilterExpr(filter),
        }
    }
}
