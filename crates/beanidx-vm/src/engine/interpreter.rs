//! Dispatch routine interpreter.

use std::fmt;

use beanidx_bytecode::{DispatchModule, Instruction, RoutineKind, StepAddr};
use beanidx_core::{Slot, Value};
use smallvec::SmallVec;

use super::class_table::ClassTable;
use super::error::RuntimeError;
use super::reflect::ReflectedMethod;
use super::trace::{NoopTracer, Tracer};

/// Arguments of a dispatch call.
#[derive(Clone, Copy, Debug)]
pub enum Args<'a> {
    /// Single-value dispatch argument (`Null` when the target takes none).
    One(&'a Value),
    /// Multi-value dispatch arguments, positional.
    Multi(&'a [Value]),
}

/// Inputs of one routine execution.
#[derive(Clone, Copy, Debug)]
pub struct Call<'a> {
    pub target: &'a Value,
    pub args: Args<'a>,
    /// Interceptable flag of the generated type, read once per call.
    pub interceptable: bool,
}

/// Outcome of a routine case.
#[derive(Clone, Debug, PartialEq)]
pub enum Completion {
    Value(Value),
    Method(ReflectedMethod),
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Completion::Value(v) => write!(f, "{v}"),
            Completion::Method(m) => write!(f, "method {m}"),
        }
    }
}

/// Runs routines of one dispatch module against a class table.
pub struct Interpreter<'m> {
    module: &'m DispatchModule,
    classes: &'m ClassTable,
}

impl<'m> Interpreter<'m> {
    pub fn new(module: &'m DispatchModule, classes: &'m ClassTable) -> Self {
        Self { module, classes }
    }

    /// Multi-value dispatch.
    pub fn dispatch(
        &self,
        index: u32,
        target: &Value,
        args: &[Value],
        interceptable: bool,
    ) -> Result<Value, RuntimeError> {
        let call = Call {
            target,
            args: Args::Multi(args),
            interceptable,
        };
        self.execute(RoutineKind::Dispatch, index, call)
            .and_then(expect_value)
    }

    /// Single-value dispatch.
    pub fn dispatch_one(
        &self,
        index: u32,
        target: &Value,
        arg: &Value,
    ) -> Result<Value, RuntimeError> {
        let call = Call {
            target,
            args: Args::One(arg),
            interceptable: false,
        };
        self.execute(RoutineKind::DispatchOne, index, call)
            .and_then(expect_value)
    }

    /// Reflective handle for the method target at `index`.
    pub fn target_method(&self, index: u32) -> Result<ReflectedMethod, RuntimeError> {
        let call = Call {
            target: &Value::Null,
            args: Args::Multi(&[]),
            interceptable: false,
        };
        match self.execute(RoutineKind::TargetMethod, index, call)? {
            Completion::Method(m) => Ok(m),
            Completion::Value(v) => Err(RuntimeError::InvalidOperand(format!(
                "locator produced value {v}"
            ))),
        }
    }

    /// Execute the case for `index` of routine `kind`.
    pub fn execute(
        &self,
        kind: RoutineKind,
        index: u32,
        call: Call<'_>,
    ) -> Result<Completion, RuntimeError> {
        self.execute_with(kind, index, call, &mut NoopTracer)
    }

    /// Execute with a tracer for debugging.
    pub fn execute_with<T: Tracer>(
        &self,
        kind: RoutineKind,
        index: u32,
        call: Call<'_>,
        tracer: &mut T,
    ) -> Result<Completion, RuntimeError> {
        let Some(routine) = self.module.routine(kind) else {
            tracer.trace_enter(kind, index, false);
            let err = RuntimeError::UnknownDispatchIndex(index);
            tracer.trace_fault(&err);
            return Err(err);
        };

        tracer.trace_enter(kind, index, routine.case(index).is_some());
        let mut frame = Frame {
            index,
            call,
            stack: SmallVec::new(),
        };
        let result = self.run(&mut frame, routine.code_for(index), tracer);
        match &result {
            Ok(completion) => tracer.trace_complete(completion),
            Err(err) => tracer.trace_fault(err),
        }
        result
    }

    fn run<T: Tracer>(
        &self,
        frame: &mut Frame<'_>,
        code: &[Instruction],
        tracer: &mut T,
    ) -> Result<Completion, RuntimeError> {
        let mut ip: usize = 0;
        while let Some(instr) = code.get(ip) {
            tracer.trace_instruction(ip as StepAddr, instr);
            ip += 1;

            match instr {
                Instruction::LoadTarget => {
                    let target = frame.call.target.clone();
                    frame.push(Slot::Ref(target));
                }
                Instruction::LoadArg => match frame.call.args {
                    Args::One(arg) => frame.push(Slot::Ref(arg.clone())),
                    Args::Multi(_) => {
                        return Err(RuntimeError::InvalidOperand(
                            "single argument requested in multi-value dispatch".to_owned(),
                        ));
                    }
                },
                Instruction::LoadArgAt(i) => {
                    let arg = match frame.call.args {
                        Args::Multi(args) => args.get(*i as usize).ok_or(
                            RuntimeError::MissingArgument {
                                index: *i,
                                count: args.len(),
                            },
                        )?,
                        Args::One(_) => {
                            return Err(RuntimeError::InvalidOperand(
                                "positional argument requested in single-value dispatch"
                                    .to_owned(),
                            ));
                        }
                    };
                    frame.push(Slot::Ref(arg.clone()));
                }
                Instruction::LoadInterceptable => {
                    let flag = frame.call.interceptable;
                    frame.push(Slot::Bool(flag));
                }
                Instruction::PushNull => frame.push(Slot::null()),
                Instruction::CheckCast(ty) => {
                    let value = frame.pop_ref()?;
                    frame.push(self.classes.cast(&value, ty)?);
                }
                Instruction::InstanceOf(ty) => {
                    let value = frame.pop_ref()?;
                    frame.push(Slot::Bool(self.classes.is_instance(&value, ty)));
                }
                Instruction::IfFalse(target) => {
                    let cond = frame.pop()?.as_bool().ok_or_else(|| {
                        RuntimeError::InvalidOperand("branch on non-boolean".to_owned())
                    })?;
                    if !cond {
                        tracer.trace_jump(*target);
                        ip = *target as usize;
                    }
                }
                Instruction::GetField { owner, name, .. } => {
                    let obj = match frame.pop_ref()? {
                        Value::Object(obj) => obj,
                        other => return Err(null_or_invalid(&other, owner, name)),
                    };
                    let slot = obj.field(name).ok_or_else(|| RuntimeError::NoSuchField {
                        class: owner.clone(),
                        field: name.clone(),
                    })?;
                    frame.push(slot);
                }
                Instruction::PutField { owner, name, .. } => {
                    let value = frame.pop()?;
                    let obj = match frame.pop_ref()? {
                        Value::Object(obj) => obj,
                        other => return Err(null_or_invalid(&other, owner, name)),
                    };
                    if !obj.set_field(name, value) {
                        return Err(RuntimeError::NoSuchField {
                            class: owner.clone(),
                            field: name.clone(),
                        });
                    }
                }
                Instruction::Invoke {
                    kind,
                    owner,
                    method,
                } => {
                    let args = frame.pop_n(method.arity())?;
                    let receiver = frame.pop_ref()?;
                    tracer.trace_invoke(owner, method);
                    let result = self.classes.invoke(*kind, owner, method, &receiver, &args)?;
                    if let Some(result) = result {
                        frame.push(result);
                    }
                }
                Instruction::Box(prim) => {
                    let slot = frame.pop()?;
                    if slot.primitive_type() != Some(*prim) {
                        return Err(RuntimeError::InvalidOperand(format!(
                            "box {} of non-{} operand",
                            prim.name(),
                            prim.name()
                        )));
                    }
                    frame.push(Slot::Ref(slot.into_value()));
                }
                Instruction::Return => return Ok(Completion::Value(frame.pop_ref()?)),
                Instruction::ResolveMethod {
                    owner,
                    name,
                    params,
                } => {
                    let method = self.classes.get_required_method(owner, name, params)?;
                    return Ok(Completion::Method(method));
                }
                Instruction::UnknownIndex => {
                    return Err(RuntimeError::UnknownDispatchIndex(frame.index));
                }
            }
        }

        Err(RuntimeError::InvalidOperand(format!(
            "case {} ended without a result",
            frame.index
        )))
    }
}

/// Operand stack of one case. Case code is short, so it rarely spills.
type Stack = SmallVec<[Slot; 8]>;

/// Popped call arguments.
type Operands = SmallVec<[Slot; 4]>;

struct Frame<'a> {
    index: u32,
    call: Call<'a>,
    stack: Stack,
}

impl Frame<'_> {
    fn push(&mut self, slot: Slot) {
        self.stack.push(slot);
    }

    fn pop(&mut self) -> Result<Slot, RuntimeError> {
        self.stack
            .pop()
            .ok_or_else(|| RuntimeError::InvalidOperand("operand stack underflow".to_owned()))
    }

    fn pop_ref(&mut self) -> Result<Value, RuntimeError> {
        match self.pop()? {
            Slot::Ref(v) => Ok(v),
            other => Err(RuntimeError::InvalidOperand(format!(
                "expected a reference, found {other:?}"
            ))),
        }
    }

    /// Pop `n` slots, returned in push order.
    fn pop_n(&mut self, n: usize) -> Result<Operands, RuntimeError> {
        let Some(at) = self.stack.len().checked_sub(n) else {
            return Err(RuntimeError::InvalidOperand(
                "operand stack underflow".to_owned(),
            ));
        };
        Ok(self.stack.drain(at..).collect())
    }
}

fn null_or_invalid(value: &Value, owner: &str, field: &str) -> RuntimeError {
    if value.is_null() {
        RuntimeError::NullPointer(format!("field {owner}.{field} of null"))
    } else {
        RuntimeError::InvalidOperand(format!(
            "field {owner}.{field} of a {}",
            value.class_name()
        ))
    }
}

fn expect_value(completion: Completion) -> Result<Value, RuntimeError> {
    match completion {
        Completion::Value(v) => Ok(v),
        Completion::Method(m) => Err(RuntimeError::InvalidOperand(format!(
            "dispatch produced method handle {m}"
        ))),
    }
}
