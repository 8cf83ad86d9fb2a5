//! beanidx compiler: dispatch target catalog and dispatch code emission.
//!
//! This crate provides the build-time half of index-based dispatch:
//! - `catalog` - ordered registry assigning stable indices to members
//! - `emit` - compiles a catalog into a `DispatchModule`

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod catalog;
pub mod emit;

pub use catalog::{
    CatalogError, DispatchCatalog, DispatchStyle, DispatchTarget, FieldTarget, InterceptedTarget,
    MethodTarget,
};
pub use emit::{EmitError, EmitOptions, emit};
