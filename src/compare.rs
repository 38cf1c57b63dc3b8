use std::{borrow::Cow, cmp::Ordering, str::FromStr};

use rust_decimal::Decimal;

use crate::{
    ast::CmpOp,
    error::Result,
    node::{Node, Scalar},
};

/// Compare two values under `op` (`<`, `<=`, `==`, `>=` or `>`).
///
/// When both sides are numeric (a number, or a string that parses as one)
/// they are compared as numbers; otherwise both are compared as strings.
///
/// # Examples
///
/// ```
/// use jpath::{compare, Value};
///
/// assert!(compare(&Value::from("1"), &Value::from("2.0"), "<").unwrap());
/// assert!(!compare(&Value::Integer(20), &Value::from("100"), ">").unwrap());
/// assert!(compare(&Value::from("ha ha"), &Value::from("ha ha"), "==").unwrap());
/// assert!(compare(&Value::Integer(1), &Value::Integer(2), "=~").is_err());
/// ```
pub fn compare<D: Node>(a: &D, b: &D, op: &str) -> Result<bool> {
    Ok(compare_with(a, b, CmpOp::parse(op)?))
}

pub(crate) fn compare_with<D: Node>(a: &D, b: &D, op: CmpOp) -> bool {
    if let Some(left) = Number::of(a)
        && let Some(right) = Number::of(b)
    {
        return match left.ordering(&right) {
            Some(ordering) => op.accepts(ordering),
            // NaN never compares
            None => false,
        };
    }

    op.accepts(text(a).cmp(&text(b)))
}

/// A numeric operand, kept as an exact decimal whenever it fits.
///
/// Exact decimals make `8.95 == '8.95'` hold regardless of how the float
/// was produced; values outside the decimal range fall back to `f64`.
#[derive(Debug, Clone, Copy)]
struct Number {
    exact: Option<Decimal>,
    approx: f64,
}

impl Number {
    fn of<D: Node>(node: &D) -> Option<Number> {
        match node.scalar() {
            Scalar::Integer(n) => Some(Number {
                exact: Some(Decimal::from(n)),
                approx: n as f64,
            }),
            Scalar::Float(f) => Some(Number {
                exact: parse_decimal(&f.to_string()),
                approx: f,
            }),
            Scalar::Str(s) => {
                let approx = s.parse::<f64>().ok()?;
                Some(Number {
                    exact: parse_decimal(s),
                    approx,
                })
            }
            Scalar::Null | Scalar::Bool(_) | Scalar::Composite => None,
        }
    }

    fn ordering(&self, other: &Number) -> Option<Ordering> {
        match (self.exact, other.exact) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => self.approx.partial_cmp(&other.approx),
        }
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// String form used when at least one side is not numeric.
fn text<D: Node>(node: &D) -> Cow<'_, str> {
    match node.scalar() {
        Scalar::Str(s) => Cow::Borrowed(s),
        Scalar::Null => Cow::Borrowed("null"),
        Scalar::Bool(b) => Cow::Owned(b.to_string()),
        Scalar::Integer(n) => Cow::Owned(n.to_string()),
        Scalar::Float(f) => Cow::Owned(f.to_string()),
        Scalar::Composite => Cow::Owned(node.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn cmp(a: Value, b: Value, op: &str) -> bool {
        compare(&a, &b, op).unwrap()
    }

    #[test]
    fn numbers_compare_numerically() {
        assert!(cmp(Value::Integer(1), Value::Integer(1), "=="));
        assert!(!cmp(Value::Integer(1), Value::Integer(2), "=="));
        assert!(cmp(Value::Float(1.1), Value::Float(2.0), "<"));
        assert!(cmp(Value::Float(10.0), Value::Integer(10), "=="));
        assert!(cmp(Value::Float(12.99), Value::from("10"), ">"));
        assert!(cmp(Value::Float(8.95), Value::from("8.95"), "=="));
        assert!(cmp(Value::from("1e2"), Value::Integer(100), "=="));
    }

    #[test]
    fn numeric_strings_are_coerced() {
        assert!(cmp(Value::from("1"), Value::from("2.0"), "<"));
        assert!(!cmp(Value::from("1"), Value::from("2.0"), ">"));
        // lexicographically "20" > "100", numerically it is not
        assert!(!cmp(Value::Integer(20), Value::from("100"), ">"));
    }

    #[test]
    fn non_numeric_operands_compare_as_strings() {
        assert!(cmp(Value::from("haha"), Value::from("haha"), "=="));
        assert!(cmp(Value::from("ha ha"), Value::from("ha ha"), "=="));
        assert!(cmp(Value::from("abc"), Value::from("abd"), "<"));
        assert!(cmp(Value::from("b"), Value::Integer(1), ">"));
        assert!(cmp(Value::Boolean(true), Value::from("true"), "=="));
        assert!(cmp(Value::Null, Value::from("null"), ">="));
    }

    #[test]
    fn nan_never_matches() {
        assert!(!cmp(Value::Float(f64::NAN), Value::Float(f64::NAN), "=="));
        assert!(!cmp(Value::Float(f64::NAN), Value::Integer(1), "<"));
    }

    #[test]
    fn unsupported_operator_is_rejected() {
        let err = compare(&Value::Integer(1), &Value::Integer(2), "!=").unwrap_err();
        assert_eq!(err, crate::PathError::UnsupportedOperator("!=".into()));
    }
}
