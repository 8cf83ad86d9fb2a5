//! beanidx: index-based, reflection-free bean introspection.
//!
//! Members of a bean type are registered once, in order, with an
//! [`IntrospectionBuilder`]. Each member gets a stable dispatch index, the
//! catalog is compiled into dispatch routines, and the resulting
//! [`Introspection`] reads properties, writes them, invokes methods and
//! instantiates beans by index.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use beanidx::{Argument, ClassDef, ClassTable, IntrospectionBuilder, TypeRef, Value};
//!
//! let mut classes = ClassTable::new();
//! classes
//!     .define(ClassDef::class("Point").field("x", TypeRef::int()))
//!     .unwrap();
//!
//! let introspection = IntrospectionBuilder::new("Point")
//!     .constructor(vec![Argument::new("x", TypeRef::int())])
//!     .field(Argument::new("x", TypeRef::int()))
//!     .build(Arc::new(classes))
//!     .unwrap();
//!
//! let point = introspection.instantiate(&[Value::from(3)]).unwrap();
//! let x = introspection.property("x").unwrap();
//! assert_eq!(x.get(&point).unwrap(), Value::Int(3));
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod introspection;

pub use beanidx_bytecode::{DispatchModule, dump};
pub use beanidx_compiler::{DispatchCatalog, DispatchStyle, EmitError, EmitOptions};
pub use beanidx_core::{AnnotationMetadata, Argument, MethodSignature, ObjRef, TypeRef, Value};
pub use beanidx_vm::{ClassDef, ClassTable, ReflectedMethod, RuntimeError};
pub use introspection::{
    Accessors, CompiledType, ConstructorHandle, GeneratedType, InstantiateOptions, Instantiator,
    Introspection, IntrospectionBuilder, MethodDecl, MethodHandle, MethodRef, PropertyHandle,
    PropertyRef,
};

/// Errors raised by the introspection facade.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A bean or value is not an instance of the required type.
    #[error("{0}")]
    TypeMismatch(String),

    /// The property or bean does not support the requested operation.
    #[error("{0}")]
    UnsupportedOperation(String),

    /// Arguments were rejected or no suitable constructor exists.
    #[error("{0}")]
    Instantiation(String),

    /// Fault raised by an emitted dispatch routine.
    #[error(transparent)]
    Dispatch(#[from] RuntimeError),

    /// The member catalog could not be compiled.
    #[error(transparent)]
    Emit(#[from] EmitError),
}

/// Result type for introspection operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
