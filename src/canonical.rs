//! Canonical paths: rewrite a data-dependent path into one pinned to a
//! concrete document.
//!
//! Every index or filter step is replaced by the first element it selects.
//! When the container is listed in a [`Discriminators`] table and that
//! element's discriminating fields pick it out uniquely, the step becomes a
//! filter on those fields, so the path keeps naming the same record after
//! the array is reordered. Otherwise the step becomes a plain index. Ranges
//! are kept as written.

use std::collections::HashMap;

use log::debug;

use crate::{
    accessor::{array_of, get_by_key, get_by_range, resolve_index, Selection, Slot},
    ast::{CompiledPath, OpKind, Operation, OperationArgs},
    error::{PathError, Result},
    evaluator::EvalContext,
    filter::{compile_filter, select_matches},
    node::{Node, Scalar},
    parser::compile,
};

/// Maps a container key to the fields that identify its elements.
///
/// Fields are dotted paths relative to the element (`schema.name`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discriminators {
    table: HashMap<String, Vec<String>>,
}

impl Default for Discriminators {
    fn default() -> Self {
        Discriminators::empty()
            .with("tips", ["tipLevel"])
            .with("parameters", ["in", "schema.name"])
            .with("properties", ["name"])
            .with("options", ["name"])
            .with("errorCodeMapping", ["errorCode"])
    }
}

impl Discriminators {
    pub fn empty() -> Self {
        Discriminators {
            table: HashMap::new(),
        }
    }

    /// Add or replace the fields for `container`.
    pub fn with<I, S>(mut self, container: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.table
            .insert(container.into(), fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn fields(&self, container: &str) -> Option<&[String]> {
        self.table.get(container).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Canonicalize `path` against `document` with the built-in table.
///
/// # Examples
///
/// ```
/// use jpath::optimize;
/// use serde_json::json;
///
/// let doc = json!({"properties": [{"name": "a"}, {"name": "b"}]});
/// let path = optimize(&doc, "$.properties[?(@.name == 'b')]").unwrap();
/// assert_eq!(path, "$.properties[?(@.name == 'b')]");
///
/// let path = optimize(&doc, "$.properties[-1]").unwrap();
/// assert_eq!(path, "$.properties[?(@.name == 'b')]");
/// ```
pub fn optimize<D: Node>(document: &D, path: &str) -> Result<String> {
    optimize_with(document, path, &Discriminators::default())
}

/// Canonicalize `path` against `document` with a custom table.
pub fn optimize_with<D: Node>(document: &D, path: &str, table: &Discriminators) -> Result<String> {
    compile(path)?.canonicalize(document, table)
}

impl CompiledPath {
    /// Replay this path against `document`, emitting a path that reads the
    /// same data.
    ///
    /// Index and filter steps are pinned to the first element they select.
    /// A range is kept as written, and the steps after it are replayed over
    /// every element it selects and emitted unchanged.
    pub fn canonicalize<D: Node>(&self, document: &D, table: &Discriminators) -> Result<String> {
        let ctx = EvalContext::new(document);
        let mut out = String::from("$");
        let mut node = document;
        // set once a range spreads the replay over several elements
        let mut spread: Option<Selection<'_, D>> = None;

        for op in self.operations() {
            if op.kind != OpKind::Scan
                && let Some(selection) = spread.take()
            {
                spread = Some(ctx.walk(std::slice::from_ref(op), selection)?);
                push_step(&mut out, op);
                continue;
            }

            match (op.kind, &op.args) {
                (OpKind::Root, _) => {
                    node = document;
                    out.truncate(1);
                }
                (OpKind::Key, _) => {
                    node = child_by_key(node, &op.key)?;
                    out.push('.');
                    out.push_str(&op.key);
                }
                (OpKind::Index, OperationArgs::IndexList(indices)) => {
                    let container = container_of(node, &op.key)?;
                    let len = array_of(container)?.len();
                    // every index must resolve, the first one is kept
                    let mut resolved = indices
                        .iter()
                        .map(|index| resolve_index(len, *index))
                        .collect::<Result<Vec<_>>>()?
                        .into_iter();
                    let i = resolved.next().ok_or(PathError::EmptyIndexList)?;
                    node = emit_element(&mut out, document, container, &op.key, i, table)?;
                }
                (OpKind::Range, OperationArgs::RangeBound(from, to)) => {
                    let container = container_of(node, &op.key)?;
                    spread = Some(get_by_range(&Selection::Node(container), *from, *to)?);
                    push_step(&mut out, op);
                }
                (OpKind::Filter, OperationArgs::FilterExpr(filter)) => {
                    let container = container_of(node, &op.key)?;
                    let matched = select_matches(&Selection::Node(container), filter, document)?;
                    let Some((slot, _)) = matched.into_iter().next() else {
                        return Err(PathError::UnresolvedCanonicalPath(format!(
                            "filter `{}` matches nothing",
                            filter.source()
                        )));
                    };
                    node = match slot {
                        Slot::Index(i) => emit_element(&mut out, document, container, &op.key, i, table)?,
                        Slot::Key(key) => {
                            push_key(&mut out, &op.key);
                            out.push('.');
                            out.push_str(&key);
                            child_by_key(container, &key)?
                        }
                    };
                }
                (OpKind::Scan, _) => {
                    return Err(PathError::UnresolvedCanonicalPath(
                        "recursive descent has no single canonical form".into(),
                    ));
                }
                (OpKind::Index, _) => return Err(PathError::EmptyIndexList),
                (OpKind::Range, _) | (OpKind::Filter, _) => {
                    return Err(PathError::MalformedPath(format!(
                        "{} step on `{}` is missing its arguments",
                        op.kind, op.key
                    )));
                }
            }
        }

        if let Some(Selection::Many(items)) = &spread
            && items.is_empty()
        {
            return Err(PathError::UnresolvedCanonicalPath(format!(
                "`{}` resolves to nothing",
                self.path()
            )));
        }
        Ok(out)
    }
}

/// Append `op` as written; key-less brackets attach without a dot.
fn push_step(out: &mut String, op: &Operation) {
    if !op.key.is_empty() {
        out.push('.');
    }
    out.push_str(&op.to_string());
}

fn push_key(out: &mut String, key: &str) {
    if !key.is_empty() {
        out.push('.');
        out.push_str(key);
    }
}

/// Key access that must stay on a single node.
fn child_by_key<'a, D: Node>(node: &'a D, key: &str) -> Result<&'a D> {
    if node.as_array().is_some() {
        return Err(PathError::UnresolvedCanonicalPath(format!(
            "key `{}` is applied to every element of an array",
            key
        )));
    }
    match get_by_key(&Selection::Node(node), key)? {
        Selection::Node(child) => Ok(child),
        Selection::Many(_) => Err(PathError::UnresolvedCanonicalPath(format!(
            "key `{}` selects more than one node",
            key
        ))),
    }
}

fn container_of<'a, D: Node>(node: &'a D, key: &str) -> Result<&'a D> {
    if key.is_empty() {
        Ok(node)
    } else {
        child_by_key(node, key)
    }
}

/// Append the fragment for element `index` of `container` and return that
/// element.
fn emit_element<'a, D: Node>(
    out: &mut String,
    root: &D,
    container: &'a D,
    key: &str,
    index: usize,
    table: &Discriminators,
) -> Result<&'a D> {
    let arr = array_of(container)?;
    let element = arr.element(index).ok_or(PathError::IndexOutOfRange {
        len: arr.len(),
        index: index as i64,
    })?;

    push_key(out, key);
    match discriminate(root, container, key, index, element, table) {
        Some(clause) => {
            out.push_str("[?(");
            out.push_str(&clause);
            out.push_str(")]");
        }
        None => {
            out.push('[');
            out.push_str(&index.to_string());
            out.push(']');
        }
    }
    Ok(element)
}

/// A filter clause that selects exactly `element` from `container`, if the
/// table knows how to build one.
fn discriminate<D: Node>(
    root: &D,
    container: &D,
    key: &str,
    index: usize,
    element: &D,
    table: &Discriminators,
) -> Option<String> {
    let fields = table.fields(key)?;
    if fields.is_empty() {
        return None;
    }

    let mut conjuncts = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(literal) = field_literal(element, field) else {
            debug!("`{}[{}]` has no usable `{}`, keeping the index", key, index, field);
            return None;
        };
        conjuncts.push(format!("@.{} == {}", field, literal));
    }
    let clause = conjuncts.join(" && ");

    let unique = compile_filter(&clause)
        .and_then(|filter| select_matches(&Selection::Node(container), &filter, root))
        .map(|matched| matches!(matched.as_slice(), [(Slot::Index(i), _)] if *i == index));
    match unique {
        Ok(true) => Some(clause),
        Ok(false) => {
            debug!("`{}` does not single out `{}[{}]`, keeping the index", clause, key, index);
            None
        }
        Err(e) => {
            debug!("`{}` is not a usable filter ({}), keeping the index", clause, e);
            None
        }
    }
}

/// The filter literal for `element`'s `field`, if it can be written so
/// that it reads back as the same value.
fn field_literal<D: Node>(element: &D, field: &str) -> Option<String> {
    let mut selection = Selection::Node(element);
    for part in field.split('.') {
        selection = get_by_key(&selection, part).ok()?;
    }
    let Selection::Node(value) = selection else {
        return None;
    };

    match value.scalar() {
        Scalar::Str(s) if is_safe_literal(s) => Some(format!("'{}'", s)),
        Scalar::Integer(n) => Some(n.to_string()),
        Scalar::Float(f) if f.is_finite() => Some(f.to_string()),
        Scalar::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Strings that would break out of the quoted literal, the bracket or the
/// conjunct, or that would be read back as a path.
fn is_safe_literal(s: &str) -> bool {
    !s.is_empty()
        && !s.contains(['\'', ']'])
        && !s.contains("&&")
        && !s.starts_with("@.")
        && !s.starts_with("$.")
}
