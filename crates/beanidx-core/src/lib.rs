#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures shared by every beanidx layer.
//!
//! Two worlds meet here:
//! - **Declaration layer**: `TypeRef`, `MethodSignature`, `Argument` and
//!   `AnnotationMetadata` describe members at build time.
//! - **Value layer**: `Value` (boxed references) and `Slot` (unboxed storage)
//!   carry data at run time.

mod annotation;
mod argument;
mod types;
mod value;

#[cfg(test)]
mod types_tests;

pub use annotation::AnnotationMetadata;
pub use argument::Argument;
pub use types::{MethodSignature, PrimitiveType, TypeRef, builtin};
pub use value::{ObjRef, Slot, Value};
