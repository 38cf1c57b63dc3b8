//! Capability interface over document representations.
//!
//! The evaluator never matches on a concrete document type. It asks a node
//! whether it is *object-like* (supports lookup by key) or *array-like*
//! (supports indexed access and a length), and reads scalars through
//! [`Scalar`]. Any representation that implements [`Node`] can be queried:
//! the crate ships implementations for its own [`Value`] and for
//! `serde_json::Value`.

use std::{collections::HashMap, fmt};

use crate::{error::Result, value::Value};

/// Borrowed view of a leaf value, used by the comparator and by the
/// regex operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Str(&'a str),
    /// An object or array; compared through its `Display` form
    Composite,
}

/// "Get field by name" capability.
pub trait ObjectLike<N> {
    fn field(&self, key: &str) -> Option<&N>;
    fn field_mut(&mut self, key: &str) -> Option<&mut N>;
    /// Bind `key` to `value`, replacing any previous binding.
    ///
    /// Maps accept any key. A record with a fixed set of fields rejects
    /// keys it does not have.
    fn insert_field(&mut self, key: &str, value: N) -> Result<()>;
    fn entries(&self) -> Vec<(&str, &N)>;
}

/// "Get by index, length" capability.
pub trait ArrayLike<N> {
    fn len(&self) -> usize;
    fn element(&self, index: usize) -> Option<&N>;
    fn element_mut(&mut self, index: usize) -> Option<&mut N>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A document node that paths can be evaluated against.
pub trait Node: Clone + fmt::Debug + fmt::Display + Sized {
    fn type_name(&self) -> &'static str;
    fn is_null(&self) -> bool;
    fn as_object(&self) -> Option<&dyn ObjectLike<Self>>;
    fn as_object_mut(&mut self) -> Option<&mut dyn ObjectLike<Self>>;
    fn as_array(&self) -> Option<&dyn ArrayLike<Self>>;
    fn as_array_mut(&mut self) -> Option<&mut dyn ArrayLike<Self>>;
    fn scalar(&self) -> Scalar<'_>;

    /// Build the aggregate returned for multi-valued results.
    fn from_elements(items: Vec<Self>) -> Self;

    /// Build a string node, used for literal filter operands.
    fn from_text(text: &str) -> Self;

    /// Direct children: object values ordered by key, or array elements in
    /// order.
    fn children(&self) -> Vec<&Self> {
        if let Some(obj) = self.as_object() {
            return sorted_entries(obj).into_iter().map(|(_, v)| v).collect();
        }
        if let Some(arr) = self.as_array() {
            return (0..arr.len()).filter_map(|i| arr.element(i)).collect();
        }
        Vec::new()
    }
}

/// Object entries in key order, so that traversal does not depend on how
/// the map stores them.
pub(crate) fn sorted_entries<N>(obj: &dyn ObjectLike<N>) -> Vec<(&str, &N)> {
    let mut entries = obj.entries();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}

impl<N> ObjectLike<N> for HashMap<String, N> {
    fn field(&self, key: &str) -> Option<&N> {
        self.get(key)
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut N> {
        self.get_mut(key)
    }

    fn insert_field(&mut self, key: &str, value: N) -> Result<()> {
        self.insert(key.to_string(), value);
        Ok(())
    }

    fn entries(&self) -> Vec<(&str, &N)> {
        self.iter().map(|(k, v)| (k.as_str(), v)).collect()
    }
}

impl<N> ArrayLike<N> for Vec<N> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn element(&self, index: usize) -> Option<&N> {
        self.get(index)
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut N> {
        self.get_mut(index)
    }
}

impl Node for Value {
    fn type_name(&self) -> &'static str {
        Value::type_name(self)
    }

    fn is_null(&self) -> bool {
        Value::is_null(self)
    }

    fn as_object(&self) -> Option<&dyn ObjectLike<Self>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    fn as_object_mut(&mut self) -> Option<&mut dyn ObjectLike<Self>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    fn as_array(&self) -> Option<&dyn ArrayLike<Self>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    fn as_array_mut(&mut self) -> Option<&mut dyn ArrayLike<Self>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    fn scalar(&self) -> Scalar<'_> {
        match self {
            Value::Null => Scalar::Null,
            Value::Boolean(b) => Scalar::Bool(*b),
            Value::Integer(n) => Scalar::Integer(*n),
            Value::Float(n) => Scalar::Float(*n),
            Value::String(s) => Scalar::Str(s),
            Value::Array(_) | Value::Object(_) => Scalar::Composite,
        }
    }

    fn from_elements(items: Vec<Self>) -> Self {
        Value::Array(items)
    }

    fn from_text(text: &str) -> Self {
        Value::String(text.to_string())
    }
}

impl ObjectLike<serde_json::Value> for serde_json::Map<String, serde_json::Value> {
    fn field(&self, key: &str) -> Option<&serde_json::Value> {
        self.get(key)
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut serde_json::Value> {
        self.get_mut(key)
    }

    fn insert_field(&mut self, key: &str, value: serde_json::Value) -> Result<()> {
        self.insert(key.to_string(), value);
        Ok(())
    }

    fn entries(&self) -> Vec<(&str, &serde_json::Value)> {
        self.iter().map(|(k, v)| (k.as_str(), v)).collect()
    }
}

impl Node for serde_json::Value {
    fn type_name(&self) -> &'static str {
        match self {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "boolean",
            serde_json::Value::Number(n) if n.is_f64() => "float",
            serde_json::Value::Number(_) => "integer",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        }
    }

    fn is_null(&self) -> bool {
        serde_json::Value::is_null(self)
    }

    fn as_object(&self) -> Option<&dyn ObjectLike<Self>> {
        match self {
            serde_json::Value::Object(map) => Some(map),
            _ => None,
        }
    }

    fn as_object_mut(&mut self) -> Option<&mut dyn ObjectLike<Self>> {
        match self {
            serde_json::Value::Object(map) => Some(map),
            _ => None,
        }
    }

    fn as_array(&self) -> Option<&dyn ArrayLike<Self>> {
        match self {
            serde_json::Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    fn as_array_mut(&mut self) -> Option<&mut dyn ArrayLike<Self>> {
        match self {
            serde_json::Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    fn scalar(&self) -> Scalar<'_> {
        match self {
            serde_json::Value::Null => Scalar::Null,
            serde_json::Value::Bool(b) => Scalar::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Scalar::Integer(i),
                None => Scalar::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Scalar::Str(s),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => Scalar::Composite,
        }
    }

    fn from_elements(items: Vec<Self>) -> Self {
        serde_json::Value::Array(items)
    }

    fn from_text(text: &str) -> Self {
        serde_json::Value::String(text.to_string())
    }
}
