//! Dispatch target catalog.
//!
//! The catalog is the single source of truth for dispatch indices: emission
//! and the runtime facade both read indices from it.

mod table;
mod target;

#[cfg(test)]
mod catalog_tests;

pub use table::{CatalogError, DispatchCatalog};
pub use target::{DispatchStyle, DispatchTarget, FieldTarget, InterceptedTarget, MethodTarget};
