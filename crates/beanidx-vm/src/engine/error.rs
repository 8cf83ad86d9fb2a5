//! Errors that can occur while dispatching.

/// Faults raised by routines, the class table and reflective calls.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    /// Default branch of a routine, or a routine that was never emitted.
    #[error("Unknown dispatch at index: {0}")]
    UnknownDispatchIndex(u32),

    #[error("class {from} cannot be cast to {to}")]
    ClassCast { from: String, to: String },

    #[error("null pointer: {0}")]
    NullPointer(String),

    #[error("argument {index} requested but only {count} supplied")]
    MissingArgument { index: u16, count: usize },

    #[error("no field {field} on {class}")]
    NoSuchField { class: String, field: String },

    #[error("no method {method} on {class}")]
    NoSuchMethod { class: String, method: String },

    #[error("incompatible class change: {0}")]
    IncompatibleClassChange(String),

    #[error("unknown class {0}")]
    UnknownClass(String),

    #[error("class {0} is already defined")]
    DuplicateClass(String),

    #[error("cannot instantiate {0}")]
    NotInstantiable(String),

    #[error("{method} expects {expected} arguments, got {found}")]
    ArgumentCount {
        method: String,
        expected: usize,
        found: usize,
    },

    /// Operand stack or frame content does not fit the instruction.
    #[error("invalid operand: {0}")]
    InvalidOperand(String),

    #[error("{method} returned {found}, expected {expected}")]
    InvalidReturn {
        method: String,
        expected: String,
        found: String,
    },

    /// Failure reported by a native method body.
    #[error("{0}")]
    Native(String),
}
