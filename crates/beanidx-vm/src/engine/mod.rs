//! Runtime engine for executing dispatch modules.
//!
//! The interpreter runs one routine case per call against the class table,
//! producing either a value or a reflective method handle.

mod class_table;
mod error;
mod interpreter;
mod reflect;
mod trace;

#[cfg(test)]
mod test_utils;

pub use class_table::{ClassDef, ClassTable, NativeFn};
pub use error::RuntimeError;
pub use interpreter::{Args, Call, Completion, Interpreter};
pub use reflect::ReflectedMethod;
pub use trace::{NoopTracer, PrintTracer, Tracer, Verbosity};
