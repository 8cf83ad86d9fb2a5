//! Dispatch code emission.
//!
//! Compiles a `DispatchCatalog` into a `DispatchModule`:
//! - `dispatch` over multi-value targets
//! - `dispatch_one` over single-value targets
//! - `target_method`, the reflective-fallback locator over method targets

mod emitter;
mod error;
mod options;
mod targets;
mod writer;

#[cfg(test)]
mod emit_tests;

pub use emitter::emit;
pub use error::EmitError;
pub use options::EmitOptions;
