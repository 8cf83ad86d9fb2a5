//! Dispatch instruction set.
//!
//! Instructions operate on an operand stack of `Slot`s. Each routine case is a
//! short straight-line sequence; the only branch is `IfFalse`, used by the
//! interception bridge.

use std::fmt;

use beanidx_core::{MethodSignature, PrimitiveType, TypeRef};

/// Position of an instruction within a case's code.
pub type StepAddr = u16;

/// Method resolution strategy of an `Invoke`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InvokeKind {
    /// Resolve through the receiver's class chain.
    Virtual,
    /// Resolve through the receiver's implemented interfaces.
    Interface,
}

/// Parameter list of a reflective method lookup.
///
/// Zero-parameter lookups use the shared `Empty` sentinel instead of an empty
/// list, so no per-lookup allocation happens.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParamTypes {
    Empty,
    List(Vec<TypeRef>),
}

impl ParamTypes {
    pub fn from_params(params: &[TypeRef]) -> Self {
        if params.is_empty() {
            ParamTypes::Empty
        } else {
            ParamTypes::List(params.to_vec())
        }
    }

    pub fn as_slice(&self) -> &[TypeRef] {
        match self {
            ParamTypes::Empty => &[],
            ParamTypes::List(list) => list,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    /// Push the dispatch target.
    LoadTarget,
    /// Push the single argument of a one-value dispatch.
    LoadArg,
    /// Push a positional argument of a multi-value dispatch.
    LoadArgAt(u16),
    /// Push the generated type's interceptable flag as a boolean.
    LoadInterceptable,
    PushNull,
    /// Pop a reference, check it against the type and push it back. Primitive
    /// types unbox the matching wrapper. Null passes reference casts.
    CheckCast(TypeRef),
    /// Pop a reference, push whether it is a non-null instance of the type.
    InstanceOf(TypeRef),
    /// Pop a boolean, jump when it is false.
    IfFalse(StepAddr),
    /// Pop an object, push the field's value.
    GetField {
        owner: String,
        name: String,
        ty: TypeRef,
    },
    /// Pop a value and an object, store the value into the field.
    PutField {
        owner: String,
        name: String,
        ty: TypeRef,
    },
    /// Pop the arguments and the receiver, call the method. Pushes the result
    /// unless the method returns void.
    Invoke {
        kind: InvokeKind,
        owner: String,
        method: MethodSignature,
    },
    /// Pop a primitive, push its wrapper.
    Box(PrimitiveType),
    /// Pop the result and finish the case.
    Return,
    /// Finish the case with a reflective handle to the named method.
    ResolveMethod {
        owner: String,
        name: String,
        params: ParamTypes,
    },
    /// Fail with an unknown-index fault naming the dispatched index.
    UnknownIndex,
}

impl Instruction {
    /// Whether execution never continues past this instruction.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Instruction::Return | Instruction::ResolveMethod { .. } | Instruction::UnknownIndex
        )
    }

    pub fn jump_target(&self) -> Option<StepAddr> {
        match self {
            Instruction::IfFalse(addr) => Some(*addr),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::LoadTarget => f.write_str("load.target"),
            Instruction::LoadArg => f.write_str("load.arg"),
            Instruction::LoadArgAt(i) => write!(f, "load.arg {i}"),
            Instruction::LoadInterceptable => f.write_str("load.interceptable"),
            Instruction::PushNull => f.write_str("push.null"),
            Instruction::CheckCast(ty) => write!(f, "checkcast {ty}"),
            Instruction::InstanceOf(ty) => write!(f, "instanceof {ty}"),
            Instruction::IfFalse(addr) => write!(f, "if.false {addr:02}"),
            Instruction::GetField { owner, name, ty } => {
                write!(f, "getfield {owner}.{name}: {ty}")
            }
            Instruction::PutField { owner, name, ty } => {
                write!(f, "putfield {owner}.{name}: {ty}")
            }
            Instruction::Invoke {
                kind,
                owner,
                method,
            } => {
                let op = match kind {
                    InvokeKind::Virtual => "invoke.virtual",
                    InvokeKind::Interface => "invoke.interface",
                };
                write!(f, "{op} {owner}.{method}")
            }
            Instruction::Box(p) => write!(f, "box {}", p.name()),
            Instruction::Return => f.write_str("return"),
            Instruction::ResolveMethod {
                owner,
                name,
                params,
            } => {
                write!(f, "resolve {owner}.{name}(")?;
                match params {
                    ParamTypes::Empty => f.write_str("EMPTY")?,
                    ParamTypes::List(list) => {
                        for (i, p) in list.iter().enumerate() {
                            if i > 0 {
                                f.write_str(", ")?;
                            }
                            write!(f, "{p}")?;
                        }
                    }
                }
                f.write_str(")")
            }
            Instruction::UnknownIndex => f.write_str("throw.unknown_index"),
        }
    }
}
