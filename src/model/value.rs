//! Universal value type for element properties.

use std::fmt;

use super::{Bag, NodeId};

/// Property value carried by element records.
///
/// Covers everything the building-model export can hold:
/// - Scalars: Bool, Int, Float, String
/// - Containers: Bag (ordered record), List, Map (both typed)
/// - Graph: Ref (handle to a detached node in the arena)
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Bag(Bag),
    List(List),
    Map(Map),
    Ref(NodeId),
}

/// Declared or runtime type of a value, used for assignability checks
/// during list and map merges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Any,
    Bool,
    Int,
    Float,
    String,
    Bag,
    List,
    Map,
    Ref,
}

impl ValueType {
    /// Whether a value of runtime type `self` may be stored where `declared`
    /// is expected.
    pub fn is_assignable_to(self, declared: ValueType) -> bool {
        declared == ValueType::Any || self == declared
    }

    pub fn name(self) -> &'static str {
        match self {
            ValueType::Any => "ANY",
            ValueType::Bool => "BOOLEAN",
            ValueType::Int => "INTEGER",
            ValueType::Float => "FLOAT",
            ValueType::String => "STRING",
            ValueType::Bag => "BAG",
            ValueType::List => "LIST",
            ValueType::Map => "MAP",
            ValueType::Ref => "REF",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A list with a declared element type.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub elem_type: ValueType,
    pub items: Vec<Value>,
}

impl List {
    pub fn new(elem_type: ValueType) -> Self {
        Self { elem_type, items: Vec::new() }
    }

    pub fn of(elem_type: ValueType, items: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Self { elem_type, items: items.into_iter().map(Into::into).collect() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A string-keyed dictionary with declared key and value types.
///
/// Entries keep insertion order; upserting an existing key overwrites in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    pub key_type: ValueType,
    pub value_type: ValueType,
    entries: Vec<(String, Value)>,
}

impl Map {
    pub fn new(value_type: ValueType) -> Self {
        Self { key_type: ValueType::String, value_type, entries: Vec::new() }
    }

    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.upsert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn upsert(&mut self, key: String, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Type checking
// ============================================================================

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self.value_type() {
            Some(ty) => ty.name(),
            None => "NULL",
        }
    }

    /// Runtime type of the value; `None` for `Null`.
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(ValueType::Bool),
            Value::Int(_) => Some(ValueType::Int),
            Value::Float(_) => Some(ValueType::Float),
            Value::String(_) => Some(ValueType::String),
            Value::Bag(_) => Some(ValueType::Bag),
            Value::List(_) => Some(ValueType::List),
            Value::Map(_) => Some(ValueType::Map),
            Value::Ref(_) => Some(ValueType::Ref),
        }
    }

    /// Null items fit every declared type.
    pub fn is_assignable_to(&self, declared: ValueType) -> bool {
        self.value_type().is_none_or(|ty| ty.is_assignable_to(declared))
    }

    pub fn is_null(&self) -> bool { matches!(self, Value::Null) }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bag(&self) -> Option<&Bag> {
        match self {
            Value::Bag(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_ref_id(&self) -> Option<NodeId> {
        match self {
            Value::Ref(id) => Some(*id),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

impl From<bool> for Value { fn from(v: bool) -> Self { Value::Bool(v) } }
impl From<i32> for Value { fn from(v: i32) -> Self { Value::Int(v as i64) } }
impl From<i64> for Value { fn from(v: i64) -> Self { Value::Int(v) } }
impl From<f64> for Value { fn from(v: f64) -> Self { Value::Float(v) } }
impl From<String> for Value { fn from(v: String) -> Self { Value::String(v) } }
impl From<&str> for Value { fn from(v: &str) -> Self { Value::String(v.to_owned()) } }
impl From<Bag> for Value { fn from(v: Bag) -> Self { Value::Bag(v) } }
impl From<List> for Value { fn from(v: List) -> Self { Value::List(v) } }
impl From<Map> for Value { fn from(v: Map) -> Self { Value::Map(v) } }
impl From<NodeId> for Value { fn from(v: NodeId) -> Self { Value::Ref(v) } }
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self { v.map(Into::into).unwrap_or(Value::Null) }
}
