//! Key, index and range access over any [`Node`].
//!
//! Reads return a [`Selection`] that borrows from the document; nothing is
//! copied until a caller asks for an owned value with
//! [`Selection::to_value`].

use std::ops::Range;

use crate::{
    error::{PathError, Result},
    node::{ArrayLike, Node},
};

/// Result of reading a path: one borrowed node, or a constructed sequence
/// of selections (the `isArray` result of slices, index lists, filters and
/// broadcasts).
#[derive(Debug, Clone)]
pub enum Selection<'a, D> {
    Node(&'a D),
    Many(Vec<Selection<'a, D>>),
}

impl<'a, D: Node> Selection<'a, D> {
    /// Whether this is a constructed sequence rather than a document node.
    pub fn is_array(&self) -> bool {
        matches!(self, Selection::Many(_))
    }

    /// Copy the selected data out of the document.
    pub fn to_value(&self) -> D {
        match self {
            Selection::Node(node) => (*node).clone(),
            Selection::Many(items) => D::from_elements(items.iter().map(Selection::to_value).collect()),
        }
    }
}

/// Position of a child inside its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Index(usize),
    Key(String),
}

/// Read `key` from an object-like node.
///
/// Array-like nodes and sequences answer with the per-element results,
/// silently dropping elements that do not have the key; this is how `..key`
/// reaches through intervening arrays.
pub fn get_by_key<'a, D: Node>(selection: &Selection<'a, D>, key: &str) -> Result<Selection<'a, D>> {
    let node: &'a D = match selection {
        Selection::Node(node) => *node,
        Selection::Many(items) => {
            return Ok(Selection::Many(
                items.iter().filter_map(|item| get_by_key(item, key).ok()).collect(),
            ));
        }
    };

    if node.is_null() {
        return Err(PathError::NullObject);
    }
    if let Some(obj) = node.as_object() {
        return obj
            .field(key)
            .map(Selection::Node)
            .ok_or_else(|| PathError::KeyNotFound(key.to_string()));
    }
    if let Some(arr) = node.as_array() {
        let found = (0..arr.len())
            .filter_map(|i| arr.element(i))
            .filter_map(|element| get_by_key(&Selection::Node(element), key).ok())
            .collect();
        return Ok(Selection::Many(found));
    }
    Err(PathError::NotObject(node.type_name()))
}

/// Read one element; negative indices count from the end.
pub fn get_by_index<'a, D: Node>(selection: &Selection<'a, D>, index: i64) -> Result<Selection<'a, D>> {
    match selection {
        Selection::Node(node) => {
            let node: &'a D = *node;
            let arr = array_of(node)?;
            let i = resolve_index(arr.len(), index)?;
            arr.element(i)
                .map(Selection::Node)
                .ok_or(PathError::IndexOutOfRange { len: arr.len(), index })
        }
        Selection::Many(items) => {
            let i = resolve_index(items.len(), index)?;
            Ok(items[i].clone())
        }
    }
}

/// Read the inclusive slice `from..=to`. Unbounded `from` is the first
/// element, unbounded `to` the last; negative bounds count from the end.
pub fn get_by_range<'a, D: Node>(
    selection: &Selection<'a, D>,
    from: Option<i64>,
    to: Option<i64>,
) -> Result<Selection<'a, D>> {
    match selection {
        Selection::Node(node) => {
            let node: &'a D = *node;
            let arr = array_of(node)?;
            let range = resolve_range(arr.len(), from, to)?;
            Ok(Selection::Many(
                range.filter_map(|i| arr.element(i)).map(Selection::Node).collect(),
            ))
        }
        Selection::Many(items) => {
            let range = resolve_range(items.len(), from, to)?;
            Ok(Selection::Many(items[range].to_vec()))
        }
    }
}

/// Bind `key` on an object-like node, or on every element of an
/// array-like one.
pub fn set_by_key<D: Node>(node: &mut D, key: &str, value: D) -> Result<()> {
    if node.is_null() {
        return Err(PathError::NullObject);
    }
    if let Some(obj) = node.as_object_mut() {
        return obj.insert_field(key, value);
    }
    if let Some(arr) = node.as_array_mut() {
        for i in 0..arr.len() {
            if let Some(element) = arr.element_mut(i) {
                set_by_key(element, key, value.clone())?;
            }
        }
        return Ok(());
    }
    Err(PathError::NotObject(node.type_name()))
}

/// Replace one element in place; same bounds rules as [`get_by_index`].
pub fn set_by_index<D: Node>(node: &mut D, index: i64, value: D) -> Result<()> {
    if node.is_null() {
        return Err(PathError::NullObject);
    }
    let type_name = node.type_name();
    let arr = node.as_array_mut().ok_or(PathError::NotArray(type_name))?;
    let len = arr.len();
    let i = resolve_index(len, index)?;
    let slot = arr
        .element_mut(i)
        .ok_or(PathError::IndexOutOfRange { len, index })?;
    *slot = value;
    Ok(())
}

pub(crate) fn array_of<D: Node>(node: &D) -> Result<&dyn ArrayLike<D>> {
    if node.is_null() {
        return Err(PathError::NullObject);
    }
    node.as_array()
        .ok_or(PathError::NotArray(node.type_name()))
}

pub(crate) fn resolve_index(len: usize, index: i64) -> Result<usize> {
    let resolved = if index < 0 { len as i64 + index } else { index };
    if resolved < 0 || resolved >= len as i64 {
        return Err(PathError::IndexOutOfRange { len, index });
    }
    Ok(resolved as usize)
}

pub(crate) fn resolve_range(len: usize, from: Option<i64>, to: Option<i64>) -> Result<Range<usize>> {
    let n = len as i64;
    let start = match from {
        None => 0,
        Some(f) if f < 0 => n + f,
        Some(f) => f,
    };
    // `to` is inclusive, so the exclusive end is one past it
    let end = match to {
        None => n,
        Some(t) if t < 0 => n + t + 1,
        Some(t) => t
            .checked_add(1)
            .ok_or(PathError::RangeOutOfBounds { len, from, to })?,
    };

    if start < 0 || start >= n || end < 0 || end > n || start > end {
        return Err(PathError::RangeOutOfBounds { len, from, to });
    }
    Ok(start as usize..end as usize)
}

/// The child at `slot`, borrowed for as long as its parent.
pub(crate) fn child_at<'a, D: Node>(node: &'a D, slot: &Slot) -> Result<&'a D> {
    match slot {
        Slot::Key(key) => node
            .as_object()
            .and_then(|obj| obj.field(key))
            .ok_or_else(|| PathError::KeyNotFound(key.clone())),
        Slot::Index(i) => {
            let arr = array_of(node)?;
            arr.element(*i).ok_or(PathError::IndexOutOfRange {
                len: arr.len(),
                index: *i as i64,
            })
        }
    }
}

/// Mutable counterpart of [`child_at`].
pub(crate) fn child_at_mut<'a, D: Node>(node: &'a mut D, slot: &Slot) -> Result<&'a mut D> {
    match slot {
        Slot::Key(key) => node
            .as_object_mut()
            .and_then(|obj| obj.field_mut(key))
            .ok_or_else(|| PathError::KeyNotFound(key.clone())),
        Slot::Index(i) => node
            .as_array_mut()
            .and_then(|arr| arr.element_mut(*i))
            .ok_or(PathError::IndexOutOfRange { len: 0, index: *i as i64 }),
    }
}
