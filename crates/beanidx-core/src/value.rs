//! Runtime values.
//!
//! `Value` is what crosses the dispatch boundary: every result and argument is
//! a reference, with primitives boxed. `Slot` is what fields and the operand
//! stack hold: primitives stay unboxed until a `Box` instruction turns them
//! into a `Value`.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::types::{PrimitiveType, TypeRef, builtin};

/// A reference value. Primitive variants are the boxed wrappers.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    Str(Arc<str>),
    Object(ObjRef),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Runtime class name of the value, `"null"` for `Null`.
    pub fn class_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => builtin::BOOLEAN,
            Value::Int(_) => builtin::INTEGER,
            Value::Long(_) => builtin::LONG,
            Value::Double(_) => builtin::DOUBLE,
            Value::Str(_) => builtin::STRING,
            Value::Object(obj) => obj.class_name(),
        }
    }

    pub fn as_object(&self) -> Option<&ObjRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(l) => Some(*l),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Long(l) => write!(f, "{l}"),
            Value::Double(d) => write!(f, "{d}"),
            Value::Str(s) => f.write_str(s),
            Value::Object(obj) => write!(f, "{obj}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i)
    }
}

impl From<i64> for Value {
    fn from(l: i64) -> Self {
        Value::Long(l)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<ObjRef> for Value {
    fn from(obj: ObjRef) -> Self {
        Value::Object(obj)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Storage cell for fields and operand stack entries.
#[derive(Clone, Debug, PartialEq)]
pub enum Slot {
    Bool(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    Ref(Value),
}

impl Slot {
    pub fn null() -> Self {
        Slot::Ref(Value::Null)
    }

    /// Zero value for a declared type: `false`/`0`/`0.0` for primitives,
    /// null for references.
    pub fn default_for(ty: &TypeRef) -> Self {
        match ty.as_primitive() {
            Some(PrimitiveType::Boolean) => Slot::Bool(false),
            Some(PrimitiveType::Int) => Slot::Int(0),
            Some(PrimitiveType::Long) => Slot::Long(0),
            Some(PrimitiveType::Double) => Slot::Double(0.0),
            None => Slot::null(),
        }
    }

    /// Unbox `value` into a primitive slot. `None` unless `value` is the
    /// matching wrapper.
    pub fn unbox(value: &Value, prim: PrimitiveType) -> Option<Self> {
        match (prim, value) {
            (PrimitiveType::Boolean, Value::Bool(b)) => Some(Slot::Bool(*b)),
            (PrimitiveType::Int, Value::Int(i)) => Some(Slot::Int(*i)),
            (PrimitiveType::Long, Value::Long(l)) => Some(Slot::Long(*l)),
            (PrimitiveType::Double, Value::Double(d)) => Some(Slot::Double(*d)),
            _ => None,
        }
    }

    pub fn primitive_type(&self) -> Option<PrimitiveType> {
        match self {
            Slot::Bool(_) => Some(PrimitiveType::Boolean),
            Slot::Int(_) => Some(PrimitiveType::Int),
            Slot::Long(_) => Some(PrimitiveType::Long),
            Slot::Double(_) => Some(PrimitiveType::Double),
            Slot::Ref(_) => None,
        }
    }

    /// Box primitives; references pass through unchanged.
    pub fn into_value(self) -> Value {
        match self {
            Slot::Bool(b) => Value::Bool(b),
            Slot::Int(i) => Value::Int(i),
            Slot::Long(l) => Value::Long(l),
            Slot::Double(d) => Value::Double(d),
            Slot::Ref(v) => v,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Slot::Ref(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Slot::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Slot::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Slot::Long(l) => Some(*l),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Slot::Double(d) => Some(*d),
            _ => None,
        }
    }
}

impl From<Value> for Slot {
    fn from(v: Value) -> Self {
        Slot::Ref(v)
    }
}

#[derive(Debug)]
struct Instance {
    class: Arc<str>,
    fields: RwLock<IndexMap<String, Slot>>,
}

/// Shared handle to an object instance.
///
/// Equality is identity: two handles are equal only if they point at the same
/// instance.
#[derive(Clone, Debug)]
pub struct ObjRef(Arc<Instance>);

impl ObjRef {
    /// Allocate an instance of `class` with the given field layout.
    pub fn new(class: impl Into<Arc<str>>, fields: IndexMap<String, Slot>) -> Self {
        Self(Arc::new(Instance {
            class: class.into(),
            fields: RwLock::new(fields),
        }))
    }

    pub fn class_name(&self) -> &str {
        &self.0.class
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.0.fields.read().contains_key(name)
    }

    /// Snapshot of a field's current slot.
    pub fn field(&self, name: &str) -> Option<Slot> {
        self.0.fields.read().get(name).cloned()
    }

    /// Overwrite an existing field. Returns `false` when the instance has no
    /// such field; the layout is fixed at allocation.
    pub fn set_field(&self, name: &str, slot: Slot) -> bool {
        match self.0.fields.write().get_mut(name) {
            Some(cell) => {
                *cell = slot;
                true
            }
            None => false,
        }
    }

    pub fn field_names(&self) -> Vec<String> {
        self.0.fields.read().keys().cloned().collect()
    }

    pub fn ptr_eq(&self, other: &ObjRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ObjRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Display for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:x}", self.0.class, Arc::as_ptr(&self.0) as usize)
    }
}
