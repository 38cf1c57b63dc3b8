use log::{debug, trace};

use crate::{
    accessor::{
        array_of, child_at, child_at_mut, get_by_index, get_by_key, get_by_range, resolve_index,
        resolve_range, set_by_index, set_by_key, Selection, Slot,
    },
    ast::{CompiledPath, OpKind, Operation, OperationArgs},
    error::{PathError, Result},
    filter::select_matches,
    node::Node,
};

impl CompiledPath {
    /// Evaluate against `document` without copying anything out of it.
    pub fn select<'a, D: Node>(&self, document: &'a D) -> Result<Selection<'a, D>> {
        EvalContext::new(document).walk(self.operations(), Selection::Node(document))
    }

    /// Evaluate against `document`.
    ///
    /// Returns the result and whether it was built from several elements
    /// (slices, index lists, filters, recursive descent and anything that
    /// followed them) as opposed to a single node of the document.
    pub fn lookup<D: Node>(&self, document: &D) -> Result<(D, bool)> {
        let selection = self.select(document)?;
        Ok((selection.to_value(), selection.is_array()))
    }

    /// Write `value` at this path.
    ///
    /// Every step but the last must lead to exactly one node. A final key
    /// step binds the key (on each element when it lands on an array); a
    /// final index, single-element slice or single-match filter replaces
    /// that element.
    pub fn set<D: Node>(&self, document: &mut D, value: D) -> Result<()> {
        let Some((last, prefix)) = self.operations().split_last() else {
            return Err(PathError::MalformedPath(
                "set requires at least one step after the root".into(),
            ));
        };

        let (parents, target) = {
            let mut cursor = Cursor::new(&*document);
            for op in prefix {
                cursor.advance(op)?;
            }
            if last.kind == OpKind::Key {
                (cursor.slots, Slot::Key(last.key.clone()))
            } else {
                cursor.advance(last)?;
                let mut slots = cursor.slots;
                let target = slots.pop().ok_or_else(|| {
                    PathError::AmbiguousSet(format!("`{}` does not name a single element", last.key))
                })?;
                (slots, target)
            }
        };

        let mut node = document;
        for slot in &parents {
            node = child_at_mut(node, slot)?;
        }

        match target {
            Slot::Key(key) => set_by_key(node, &key, value),
            Slot::Index(i) => set_by_index(node, i as i64, value),
        }
    }
}

/// Per-evaluation state. The compiled path itself stays untouched, so
/// concurrent evaluations never share a cursor.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a, D> {
    /// The document `$` refers to, also inside filters
    pub root: &'a D,
}

impl<'a, D: Node> EvalContext<'a, D> {
    pub fn new(root: &'a D) -> Self {
        EvalContext { root }
    }

    pub(crate) fn walk(&self, ops: &[Operation], current: Selection<'a, D>) -> Result<Selection<'a, D>> {
        let Some((op, rest)) = ops.split_first() else {
            return Ok(current);
        };

        let node = match current {
            // a constructed sequence applies the remaining steps per element
            Selection::Many(items) => return self.broadcast(ops, items).map(Selection::Many),
            Selection::Node(node) => node,
        };

        if op.kind == OpKind::Scan {
            return self.scan(rest, node).map(Selection::Many);
        }

        let next = self.step(op, node)?;
        self.walk(rest, next)
    }

    fn step(&self, op: &Operation, node: &'a D) -> Result<Selection<'a, D>> {
        match (op.kind, &op.args) {
            (OpKind::Root, _) => Ok(Selection::Node(self.root)),
            (OpKind::Key, _) => get_by_key(&Selection::Node(node), &op.key),
            (OpKind::Index, OperationArgs::IndexList(indices)) => {
                let container = keyed(node, &op.key)?;
                match indices.as_slice() {
                    [] => Err(PathError::EmptyIndexList),
                    [index] => get_by_index(&container, *index),
                    _ => indices
                        .iter()
                        .map(|index| get_by_index(&container, *index))
                        .collect::<Result<Vec<_>>>()
                        .map(Selection::Many),
                }
            }
            (OpKind::Range, OperationArgs::RangeBound(from, to)) => {
                get_by_range(&keyed(node, &op.key)?, *from, *to)
            }
            (OpKind::Filter, OperationArgs::FilterExpr(filter)) => {
                let matched = select_matches(&keyed(node, &op.key)?, filter, self.root)?;
                Ok(Selection::Many(matched.into_iter().map(|(_, sel)| sel).collect()))
            }
            (OpKind::Scan, _) => self.scan(&[], node).map(Selection::Many),
            (OpKind::Index, _) => Err(PathError::EmptyIndexList),
            (OpKind::Range, _) => Err(PathError::MalformedPath(
                "range args length should be 2".into(),
            )),
            (OpKind::Filter, _) => Err(PathError::MalformedPath(format!(
                "filter step on `{}` has no expression",
                op.key
            ))),
        }
    }

    /// Apply `ops` to every item, splicing multi-valued results one level.
    ///
    /// Items the steps do not resolve on (missing key, wrong shape, out of
    /// bounds) are skipped. Any other error, such as `=~` on a non-string,
    /// fails the whole lookup.
    fn broadcast(&self, ops: &[Operation], items: Vec<Selection<'a, D>>) -> Result<Vec<Selection<'a, D>>> {
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            match self.walk(ops, item) {
                Ok(Selection::Many(inner)) => out.extend(inner),
                Ok(single) => out.push(single),
                Err(e) if e.is_resolution_failure() => {
                    debug!("skipping element {} at {} step: {}", i, ops[0].kind, e)
                }
                Err(e) => return Err(e),
            }
        }
        Ok(out)
    }

    /// Recursive descent from `node`.
    ///
    /// With no further steps every descendant is returned. Otherwise the
    /// remaining steps are tried at `node` and every descendant, keeping the
    /// results of the attempts that resolve. Errors other than resolution
    /// failures end the scan.
    fn scan(&self, rest: &[Operation], node: &'a D) -> Result<Vec<Selection<'a, D>>> {
        let mut out = Vec::new();
        match rest.first() {
            None => collect_descendants(node, &mut out),
            Some(first) => self.descend(rest, first, node, &mut out)?,
        }
        Ok(out)
    }

    fn descend(
        &self,
        rest: &[Operation],
        first: &Operation,
        node: &'a D,
        out: &mut Vec<Selection<'a, D>>,
    ) -> Result<()> {
        if applies_at(first, node) {
            match self.walk(rest, Selection::Node(node)) {
                Ok(Selection::Many(inner)) => out.extend(inner),
                Ok(single) => out.push(single),
                Err(e) if e.is_resolution_failure() => {
                    trace!("scan: {} step not applicable: {}", first.kind, e)
                }
                Err(e) => return Err(e),
            }
        }
        for child in node.children() {
            self.descend(rest, first, child, out)?;
        }
        Ok(())
    }
}

/// Steps are tried at every object-like node. Array-like nodes only take
/// key-less bracket steps, otherwise a key would be found once through the
/// array and again at each element.
fn applies_at<D: Node>(op: &Operation, node: &D) -> bool {
    if node.as_object().is_some() {
        return true;
    }
    node.as_array().is_some()
        && op.key.is_empty()
        && matches!(op.kind, OpKind::Index | OpKind::Range | OpKind::Filter)
}

fn collect_descendants<'a, D: Node>(node: &'a D, out: &mut Vec<Selection<'a, D>>) {
    for child in node.children() {
        out.push(Selection::Node(child));
        collect_descendants(child, out);
    }
}

/// The container a bracket step applies to: the node itself for `[...]`,
/// or its `key` for `key[...]`.
fn keyed<'a, D: Node>(node: &'a D, key: &str) -> Result<Selection<'a, D>> {
    if key.is_empty() {
        Ok(Selection::Node(node))
    } else {
        get_by_key(&Selection::Node(node), key)
    }
}

/// Follows a path one node at a time, remembering how each node was
/// reached so a write can retrace the route mutably.
struct Cursor<'a, D> {
    root: &'a D,
    node: &'a D,
    slots: Vec<Slot>,
}

impl<'a, D: Node> Cursor<'a, D> {
    fn new(root: &'a D) -> Self {
        Cursor {
            root,
            node: root,
            slots: Vec::new(),
        }
    }

    fn advance(&mut self, op: &Operation) -> Result<()> {
        match (op.kind, &op.args) {
            (OpKind::Root, _) => {
                self.node = self.root;
                self.slots.clear();
                Ok(())
            }
            (OpKind::Key, _) => self.enter_key(&op.key),
            (OpKind::Index, OperationArgs::IndexList(indices)) => {
                self.enter_container(&op.key)?;
                match indices.as_slice() {
                    [] => Err(PathError::EmptyIndexList),
                    [index] => {
                        let i = resolve_index(array_of(self.node)?.len(), *index)?;
                        self.enter(Slot::Index(i))
                    }
                    _ => Err(PathError::AmbiguousSet(format!(
                        "index list {:?} selects {} elements",
                        indices,
                        indices.len()
                    ))),
                }
            }
            (OpKind::Range, OperationArgs::RangeBound(from, to)) => {
                self.enter_container(&op.key)?;
                let range = resolve_range(array_of(self.node)?.len(), *from, *to)?;
                if range.len() != 1 {
                    return Err(PathError::AmbiguousSet(format!(
                        "range selects {} elements",
                        range.len()
                    )));
                }
                self.enter(Slot::Index(range.start))
            }
            (OpKind::Filter, OperationArgs::FilterExpr(filter)) => {
                self.enter_container(&op.key)?;
                let mut matched = select_matches(&Selection::Node(self.node), filter, self.root)?;
                if matched.len() != 1 {
                    return Err(PathError::AmbiguousSet(format!(
                        "filter `{}` matches {} elements",
                        filter.source(),
                        matched.len()
                    )));
                }
                let (slot, _) = matched.remove(0);
                self.enter(slot)
            }
            (OpKind::Scan, _) => Err(PathError::AmbiguousSet(
                "recursive descent selects more than one node".into(),
            )),
            (OpKind::Index, _) => Err(PathError::EmptyIndexList),
            (OpKind::Range, _) | (OpKind::Filter, _) => Err(PathError::MalformedPath(format!(
                "{} step on `{}` is missing its arguments",
                op.kind, op.key
            ))),
        }
    }

    fn enter_container(&mut self, key: &str) -> Result<()> {
        if key.is_empty() {
            return Ok(());
        }
        self.enter_key(key)
    }

    fn enter_key(&mut self, key: &str) -> Result<()> {
        if self.node.is_null() {
            return Err(PathError::NullObject);
        }
        if self.node.as_array().is_some() {
            return Err(PathError::AmbiguousSet(format!(
                "key `{}` is applied to every element of an array",
                key
            )));
        }
        if self.node.as_object().is_none() {
            return Err(PathError::NotObject(self.node.type_name()));
        }
        self.enter(Slot::Key(key.to_string()))
    }

    fn enter(&mut self, slot: Slot) -> Result<()> {
        self.node = child_at(self.node, &slot)?;
        self.slots.push(slot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{parser::compile, value::Value};
    use serde_json::json;

    fn doc() -> Value {
        Value::from(json!({
            "a": [{"b": 1}, {"b": 2}, {"c": 3}],
            "n": [[{"t": 1.1}, {"t": 2.1}], [{"t": 3.1}, {"t": 4.1}]]
        }))
    }

    #[test]
    fn broadcast_applies_only_to_constructed_sequences() {
        let doc = doc();

        let (value, multi) = compile("$.n[0].[0].t").unwrap().lookup(&doc).unwrap();
        assert_eq!(value, Value::Float(1.1));
        assert!(!multi);

        let (value, multi) = compile("$.n[:1].[0].t").unwrap().lookup(&doc).unwrap();
        assert_eq!(value, Value::from(json!([1.1, 3.1])));
        assert!(multi);
    }

    #[test]
    fn broadcast_skips_failing_elements() {
        let doc = doc();
        let (value, _) = compile("$.a[*].b").unwrap().lookup(&doc).unwrap();
        assert_eq!(value, Value::from(json!([1, 2])));
    }

    #[test]
    fn regex_type_errors_survive_broadcast() {
        let doc = Value::from(json!({"groups": [[{"n": 1}], [{"n": "1"}]]}));
        let err = compile("$.groups[*].[?(@.n =~ /1/)]").unwrap().lookup(&doc).unwrap_err();
        assert_eq!(err, crate::PathError::NotAString("integer"));
    }

    #[test]
    fn set_rejects_ambiguous_targets() {
        let mut doc = doc();
        for path in ["$.a[0,1].b", "$.a[*].b", "$..b", "$.a[?(@.b)].b"] {
            assert!(
                matches!(
                    compile(path).unwrap().set(&mut doc, Value::Null),
                    Err(crate::PathError::AmbiguousSet(_))
                ),
                "{} should be ambiguous",
                path
            );
        }
    }
}
