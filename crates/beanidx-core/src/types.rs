//! Type references for fields, parameters and return values.
//!
//! Types are referenced by name. Resolution against real classes happens in
//! the VM's class table, so a catalog can be built (and serialized) without
//! one.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Names of the classes every class table knows about.
pub mod builtin {
    /// Root of the reference hierarchy; every non-null value is an instance.
    pub const OBJECT: &str = "Object";
    pub const STRING: &str = "String";
    /// Common supertype of the numeric wrappers.
    pub const NUMBER: &str = "Number";
    pub const BOOLEAN: &str = "Boolean";
    pub const INTEGER: &str = "Integer";
    pub const LONG: &str = "Long";
    pub const DOUBLE: &str = "Double";
}

/// Primitive kinds. Stored unboxed in fields and on the operand stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Boolean,
    Int,
    Long,
    Double,
}

impl PrimitiveType {
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Double => "double",
        }
    }

    /// Name of the boxed counterpart class.
    pub fn wrapper_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => builtin::BOOLEAN,
            PrimitiveType::Int => builtin::INTEGER,
            PrimitiveType::Long => builtin::LONG,
            PrimitiveType::Double => builtin::DOUBLE,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "boolean" => Some(PrimitiveType::Boolean),
            "int" => Some(PrimitiveType::Int),
            "long" => Some(PrimitiveType::Long),
            "double" => Some(PrimitiveType::Double),
            _ => None,
        }
    }
}

/// Reference to a type by name.
///
/// Serialized as its plain name (`"void"`, `"int"`, `"String"`, `"Person"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TypeRef {
    Void,
    Primitive(PrimitiveType),
    Class(String),
}

impl TypeRef {
    /// Parse a type name. Lower-case primitive names and `void` are keywords,
    /// everything else is a class name.
    pub fn parse(name: &str) -> Self {
        if name == "void" {
            return TypeRef::Void;
        }
        match PrimitiveType::from_name(name) {
            Some(p) => TypeRef::Primitive(p),
            None => TypeRef::Class(name.to_owned()),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        TypeRef::Class(name.into())
    }

    pub fn string() -> Self {
        TypeRef::Class(builtin::STRING.to_owned())
    }

    pub fn object() -> Self {
        TypeRef::Class(builtin::OBJECT.to_owned())
    }

    pub fn boolean() -> Self {
        TypeRef::Primitive(PrimitiveType::Boolean)
    }

    pub fn int() -> Self {
        TypeRef::Primitive(PrimitiveType::Int)
    }

    pub fn long() -> Self {
        TypeRef::Primitive(PrimitiveType::Long)
    }

    pub fn double() -> Self {
        TypeRef::Primitive(PrimitiveType::Double)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Void)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeRef::Primitive(_))
    }

    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            TypeRef::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TypeRef::Void => "void",
            TypeRef::Primitive(p) => p.name(),
            TypeRef::Class(name) => name,
        }
    }

    /// The boxed form of this type: primitives map to their wrapper class,
    /// reference types and `void` are returned unchanged.
    pub fn wrapper(&self) -> TypeRef {
        match self {
            TypeRef::Primitive(p) => TypeRef::Class(p.wrapper_name().to_owned()),
            other => other.clone(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for TypeRef {
    fn from(name: String) -> Self {
        TypeRef::parse(&name)
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        TypeRef::parse(name)
    }
}

impl From<TypeRef> for String {
    fn from(ty: TypeRef) -> Self {
        match ty {
            TypeRef::Class(name) => name,
            other => other.name().to_owned(),
        }
    }
}

/// Name, ordered parameter types and return type of a method.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSignature {
    pub name: String,
    #[serde(default)]
    pub params: Vec<TypeRef>,
    #[serde(default = "void_type")]
    pub return_type: TypeRef,
}

fn void_type() -> TypeRef {
    TypeRef::Void
}

impl MethodSignature {
    pub fn new(name: impl Into<String>, params: Vec<TypeRef>, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            params,
            return_type,
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn returns_void(&self) -> bool {
        self.return_type.is_void()
    }

    /// Same parameters and return type under another name.
    ///
    /// Used for proxy bridge methods, which mirror the intercepted method.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: self.params.clone(),
            return_type: self.return_type.clone(),
        }
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{p}")?;
        }
        write!(f, "): {}", self.return_type)
    }
}
