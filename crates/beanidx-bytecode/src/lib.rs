#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Dispatch bytecode for beanidx.
//!
//! This crate contains:
//! - The instruction set executed by the VM (`Instruction`)
//! - Index-keyed branch tables (`Routine`, `Case`)
//! - The emitted unit for one generated type (`DispatchModule`)
//! - A human-readable disassembler (`dump`)

mod dump;
mod instructions;
mod module;
mod routine;

#[cfg(test)]
mod routine_tests;

pub use dump::dump;
pub use instructions::{Instruction, InvokeKind, ParamTypes, StepAddr};
pub use module::DispatchModule;
pub use routine::{Case, ModuleError, Routine, RoutineKind};
