//! Runtime for executing emitted dispatch modules.
//!
//! This crate provides the class table that stands in for the runtime type
//! universe, and the interpreter that runs dispatch routines against it.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod engine;

pub use engine::{
    Args, Call, ClassDef, ClassTable, Completion, Interpreter, NativeFn, NoopTracer, PrintTracer,
    ReflectedMethod, RuntimeError, Tracer, Verbosity,
};
