//! Filter expressions: `?( <conjunct> && <conjunct> ... )`.
//!
//! A conjunct is `lhs`, `lhs op rhs`, or `lhs =~ /pattern/flags`. Operands
//! beginning with `@.` read from the element under test, operands beginning
//! with `$.` read from the document root, and anything else is a literal.
//! Single quotes group a literal containing spaces and are dropped.
//!
//! Filters are compiled with the rest of the path, so a bad operator or
//! regex is reported by `compile` rather than at lookup time.

use std::borrow::Cow;

use log::trace;
use regex::{Regex, RegexBuilder};

use crate::{
    accessor::{get_by_index, get_by_key, Selection, Slot},
    ast::{CmpOp, Filter, FilterExpression, OpKind, Operand, OperandStep, OperationArgs, Predicate, Test},
    compare::compare_with,
    error::{PathError, Result},
    lexer::tokenize,
    node::{sorted_entries, Node, Scalar},
    parser::parse_operation,
};

/// Split a filter into its conjuncts.
///
/// # Examples
///
/// ```
/// use jpath::parse_filter;
///
/// let exprs = parse_filter("@.price < 10 && @.isbn").unwrap();
/// assert_eq!(exprs[0].op, "<");
/// assert_eq!(exprs[1].op, "exists");
/// ```
pub fn parse_filter(filter: &str) -> Result<Vec<FilterExpression>> {
    filter.split("&&").map(|c| parse_conjunct(c.trim())).collect()
}

fn parse_conjunct(conjunct: &str) -> Result<FilterExpression> {
    let mut fields: [String; 3] = Default::default();
    let mut stage = 0;
    let mut current = String::new();
    let mut started = false;
    let mut quoted = false;

    for (at, ch) in conjunct.char_indices() {
        match ch {
            '\'' => {
                quoted = !quoted;
                started = true;
            }
            ' ' if !quoted => {
                // runs of spaces separate a single pair of fields
                if !started {
                    continue;
                }
                if stage == 2 {
                    return Err(PathError::MalformedPath(format!(
                        "unexpected text at {} in filter `{}`",
                        at, conjunct
                    )));
                }
                fields[stage] = std::mem::take(&mut current);
                stage += 1;
                started = false;
            }
            _ => {
                current.push(ch);
                started = true;
            }
        }
    }

    if quoted {
        return Err(PathError::MalformedPath(format!(
            "unterminated string literal in filter `{}`",
            conjunct
        )));
    }
    if started {
        fields[stage] = current;
    } else if stage > 0 {
        stage -= 1;
    }

    let [lhs, op, rhs] = fields;
    match stage {
        0 if lhs.is_empty() => Err(PathError::MalformedPath("empty filter expression".into())),
        0 => Ok(FilterExpression {
            lhs,
            op: "exists".into(),
            rhs: String::new(),
        }),
        1 => Err(PathError::MalformedPath(format!(
            "missing right operand in filter `{}`",
            conjunct
        ))),
        _ => Ok(FilterExpression { lhs, op, rhs }),
    }
}

/// Parse and validate the text between `?(` and `)`.
pub(crate) fn compile_filter(source: &str) -> Result<Filter> {
    let predicates = parse_filter(source)?
        .iter()
        .map(compile_predicate)
        .collect::<Result<Vec<_>>>()?;
    Ok(Filter {
        source: source.to_string(),
        predicates,
    })
}

fn compile_predicate(expr: &FilterExpression) -> Result<Predicate> {
    let lhs = compile_operand(&expr.lhs)?;
    let test = match expr.op.as_str() {
        "exists" => Test::Exists,
        "=~" => Test::Matches(compile_regex(&expr.rhs)?),
        op => Test::Compare(CmpOp::parse(op)?, compile_operand(&expr.rhs)?),
    };
    Ok(Predicate { lhs, test })
}

fn compile_operand(text: &str) -> Result<Operand> {
    if text.starts_with("@.") {
        Ok(Operand::Current(operand_steps(text)?))
    } else if text.starts_with("$.") {
        Ok(Operand::Root(operand_steps(text)?))
    } else {
        Ok(Operand::Literal(text.to_string()))
    }
}

fn operand_steps(text: &str) -> Result<Vec<OperandStep>> {
    tokenize(text)?
        .iter()
        .skip(1)
        .map(|token| {
            let op = parse_operation(token)?;
            match (op.kind, op.args) {
                (OpKind::Key, _) => Ok(OperandStep::Key(op.key)),
                (OpKind::Index, OperationArgs::IndexList(indices)) if indices.len() == 1 => {
                    Ok(OperandStep::Index {
                        key: op.key,
                        index: indices[0],
                    })
                }
                _ => Err(PathError::UnsupportedInFilterOperand(text.to_string())),
            }
        })
        .collect()
}

/// Compile a `/pattern/flags` literal. Supported flags are `i`, `m`, `s`,
/// `x` and `U`.
fn compile_regex(rule: &str) -> Result<Regex> {
    let malformed = || PathError::MalformedPath(format!("regex should be in /pattern/ form: `{}`", rule));

    let body = rule.strip_prefix('/').ok_or_else(malformed)?;
    let close = body.rfind('/').ok_or_else(malformed)?;
    let (pattern, flags) = (&body[..close], &body[close + 1..]);
    if pattern.is_empty() {
        return Err(malformed());
    }

    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            'U' => builder.swap_greed(true),
            other => {
                return Err(PathError::MalformedPath(format!(
                    "unknown regex flag `{}` in `{}`",
                    other, rule
                )));
            }
        };
    }
    builder
        .build()
        .map_err(|e| PathError::MalformedPath(format!("invalid regex `{}`: {}", pattern, e)))
}

/// Evaluate a single `lhs op rhs` conjunct against `element`.
///
/// Operands that cannot be resolved make the conjunct false. Applying `=~`
/// to something that is not a string is an error.
pub fn eval_filter<D: Node>(element: &D, root: &D, lhs: &str, op: &str, rhs: &str) -> Result<bool> {
    let expr = FilterExpression {
        lhs: lhs.to_string(),
        op: op.to_string(),
        rhs: rhs.to_string(),
    };
    compile_predicate(&expr)?.holds(element, root)
}

impl Filter {
    /// Whether every conjunct holds for `element`.
    pub(crate) fn matches<D: Node>(&self, element: &D, root: &D) -> Result<bool> {
        for predicate in &self.predicates {
            if !predicate.holds(element, root)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl Predicate {
    fn holds<D: Node>(&self, element: &D, root: &D) -> Result<bool> {
        let Some(left) = resolved(self.lhs.resolve(element, root))? else {
            return Ok(false);
        };

        match &self.test {
            Test::Exists => Ok(!left.is_null()),
            Test::Matches(regex) => match left.scalar() {
                Scalar::Str(s) => Ok(regex.is_match(s)),
                _ => Err(PathError::NotAString(left.type_name())),
            },
            Test::Compare(op, rhs) => {
                let Some(right) = resolved(rhs.resolve(element, root))? else {
                    return Ok(false);
                };
                Ok(compare_with(&*left, &*right, *op))
            }
        }
    }
}

/// Resolution failures mean "no value"; anything else propagates.
fn resolved<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_resolution_failure() => {
            trace!("filter operand unresolved: {}", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

impl Operand {
    fn resolve<'a, D: Node>(&self, element: &'a D, root: &'a D) -> Result<Cow<'a, D>> {
        let (start, steps) = match self {
            Operand::Literal(text) => return Ok(Cow::Owned(D::from_text(text))),
            Operand::Current(steps) => (element, steps),
            Operand::Root(steps) => (root, steps),
        };

        let mut selection = Selection::Node(start);
        for step in steps {
            selection = match step {
                OperandStep::Key(key) => get_by_key(&selection, key)?,
                OperandStep::Index { key, index } => {
                    if !key.is_empty() {
                        selection = get_by_key(&selection, key)?;
                    }
                    get_by_index(&selection, *index)?
                }
            };
        }

        Ok(match selection {
            Selection::Node(node) => Cow::Borrowed(node),
            many => Cow::Owned(many.to_value()),
        })
    }
}

/// Elements of `container` that satisfy `filter`, with their positions.
///
/// Array-like containers are filtered by element; object-like containers
/// are filtered by value and report the matching keys.
pub(crate) fn select_matches<'a, D: Node>(
    container: &Selection<'a, D>,
    filter: &Filter,
    root: &D,
) -> Result<Vec<(Slot, Selection<'a, D>)>> {
    let mut matched = Vec::new();

    match container {
        Selection::Many(items) => {
            for (i, item) in items.iter().enumerate() {
                let keep = match item {
                    Selection::Node(node) => filter.matches(*node, root)?,
                    Selection::Many(_) => filter.matches(&item.to_value(), root)?,
                };
                if keep {
                    matched.push((Slot::Index(i), item.clone()));
                }
            }
        }
        Selection::Node(node) => {
            let node: &'a D = *node;
            if node.is_null() {
                return Err(PathError::NullObject);
            }
            if let Some(arr) = node.as_array() {
                for i in 0..arr.len() {
                    if let Some(element) = arr.element(i)
                        && filter.matches(element, root)?
                    {
                        matched.push((Slot::Index(i), Selection::Node(element)));
                    }
                }
            } else if let Some(obj) = node.as_object() {
                for (key, value) in sorted_entries(obj) {
                    if filter.matches(value, root)? {
                        matched.push((Slot::Key(key.to_string()), Selection::Node(value)));
                    }
                }
            } else {
                return Err(PathError::NotArray(node.type_name()));
            }
        }
    }

    Ok(matched)
}
