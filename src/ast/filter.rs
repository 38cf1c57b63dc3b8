use regex::Regex;

use crate::ast::CmpOp;

/// One `lhs op rhs` conjunct as written in the filter.
///
/// ```text
/// @.isbn                 => @.isbn, exists, ""
/// @.price < 10           => @.price, <, 10
/// @.price <= $.expensive => @.price, <=, $.expensive
/// @.author =~ /.*REES/i  => @.author, =~, /.*REES/i
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExpression {
    pub lhs: String,
    pub op: String,
    pub rhs: String,
}

/// A compiled filter: the text between `?(` and `)` plus its conjuncts,
/// validated and ready to evaluate. All conjuncts must hold for an element
/// to be kept.
#[derive(Debug, Clone)]
pub struct Filter {
    pub source: String,
    pub(crate) predicates: Vec<Predicate>,
}

impl Filter {
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl PartialEq for Filter {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// Where a filter operand gets its value from.
#[derive(Debug, Clone)]
pub(crate) enum Operand {
    /// `@.a.b[0]`, resolved against the element under test
    Current(Vec<OperandStep>),
    /// `$.a.b[0]`, resolved against the document root
    Root(Vec<OperandStep>),
    Literal(String),
}

/// Steps allowed inside a filter operand.
#[derive(Debug, Clone)]
pub(crate) enum OperandStep {
    Key(String),
    Index { key: String, index: i64 },
}

#[derive(Debug, Clone)]
pub(crate) enum Test {
    Exists,
    Matches(Regex),
    Compare(CmpOp, Operand),
}

#[derive(Debug, Clone)]
pub(crate) struct Predicate {
    pub(crate) lhs: Operand,
    pub(crate) test: Test,
}
