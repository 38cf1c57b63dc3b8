use std::fmt;

use crate::error::{PathError, Result};

/// Relational operators accepted by filters and the comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// Less than (`<`)
    LessThan,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Equal (`==`)
    Equal,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Greater than (`>`)
    GreaterThan,
}

impl CmpOp {
    pub fn parse(op: &str) -> Result<Self> {
        match op {
            "<" => Ok(CmpOp::LessThan),
            "<=" => Ok(CmpOp::LessEqual),
            "==" => Ok(CmpOp::Equal),
            ">=" => Ok(CmpOp::GreaterEqual),
            ">" => Ok(CmpOp::GreaterThan),
            other => Err(PathError::UnsupportedOperator(other.to_string())),
        }
    }

    /// Whether `ordering` (left compared to right) satisfies the operator.
    pub fn accepts(self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            CmpOp::LessThan => ordering == Less,
            CmpOp::LessEqual => ordering != Greater,
            CmpOp::Equal => ordering == Equal,
            CmpOp::GreaterEqual => ordering != Less,
            CmpOp::GreaterThan => ordering == Greater,
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            CmpOp::LessThan => "<",
            CmpOp::LessEqual => "<=",
            CmpOp::Equal => "==",
            CmpOp::GreaterEqual => ">=",
            CmpOp::GreaterThan => ">",
        };
        f.write_str(symbol)
    }
}
