//! Error types for dispatch emission.

use beanidx_bytecode::ModuleError;

/// Error during dispatch emission.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EmitError {
    /// A method marked for single-value dispatch takes more than one argument.
    #[error(
        "method `{method}` at index {index} takes {arity} arguments; single-value dispatch passes at most one"
    )]
    OneDispatchArity {
        index: u32,
        method: String,
        arity: usize,
    },

    /// An intercepted target gated by another generated type's flag.
    #[error("intercepted method at index {index} belongs to `{found}`, not `{expected}`")]
    ForeignInterceptedTarget {
        index: u32,
        expected: String,
        found: String,
    },

    /// Too many parameters to address positionally (exceeds u16 max).
    #[error("method at index {index} has too many parameters: {arity} (max 65535)")]
    TooManyParameters { index: u32, arity: usize },

    /// Case code too long to address (exceeds u16 max).
    #[error("case {index} is too large: {len} instructions (max 65535)")]
    CaseTooLarge { index: u32, len: usize },

    /// Jump to a label that was never placed.
    #[error("case {index} jumps to unplaced label {label}")]
    UnplacedLabel { index: u32, label: u32 },

    #[error(transparent)]
    Module(#[from] ModuleError),
}
