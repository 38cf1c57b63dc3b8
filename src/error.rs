use thiserror::Error;

/// Errors produced while compiling or evaluating a path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    /// Syntax error in a path, an index list, a filter or a regex literal
    #[error("malformed path: {0}")]
    MalformedPath(String),

    /// Key or index access on a null node
    #[error("get attribute from null object")]
    NullObject,

    /// Key access on something that is neither object-like nor array-like
    #[error("object is not a map: {0}")]
    NotObject(&'static str),

    /// Index, range or filter access on something that is not array-like
    #[error("object is not an array: {0}")]
    NotArray(&'static str),

    /// Regex match attempted on a non-string operand
    #[error("only string can match with regular expression, got {0}")]
    NotAString(&'static str),

    #[error("key error: {0} not found in object")]
    KeyNotFound(String),

    #[error("index out of range: len: {len}, idx: {index}")]
    IndexOutOfRange { len: usize, index: i64 },

    #[error("range out of bounds: len: {len}, from: {from:?}, to: {to:?}")]
    RangeOutOfBounds {
        len: usize,
        from: Option<i64>,
        to: Option<i64>,
    },

    #[error("cannot index on empty index list")]
    EmptyIndexList,

    /// Set through a step that does not address exactly one node
    #[error("ambiguous set: {0}")]
    AmbiguousSet(String),

    #[error("unsupported operator `{0}`: op should only be <, <=, ==, >= and >")]
    UnsupportedOperator(String),

    /// Filter operands may only use key and single-index steps
    #[error("unsupported step in filter operand `{0}`")]
    UnsupportedInFilterOperand(String),

    #[error("cannot canonicalize path: {0}")]
    UnresolvedCanonicalPath(String),
}

impl PathError {
    /// Failures that only mean "this candidate does not resolve".
    ///
    /// Filter conjuncts treat these as a non-match instead of an error.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            PathError::NullObject
                | PathError::NotObject(_)
                | PathError::NotArray(_)
                | PathError::KeyNotFound(_)
                | PathError::IndexOutOfRange { .. }
                | PathError::RangeOutOfBounds { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PathError>;
