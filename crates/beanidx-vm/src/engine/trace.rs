//! Tracing infrastructure for debugging dispatch execution.
//!
//! `NoopTracer` methods are empty `#[inline(always)]` functions, so the
//! default `execute` path carries no tracing cost. `PrintTracer` collects
//! human-readable lines for tests and debugging.

use beanidx_bytecode::{Instruction, RoutineKind, StepAddr};
use beanidx_core::MethodSignature;

use super::error::RuntimeError;
use super::interpreter::Completion;

/// Verbosity level for trace output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Routine entry, calls, results and faults.
    #[default]
    Default,
    /// Every instruction and taken branch as well.
    Verbose,
}

/// Tracer trait for interpreter instrumentation.
pub trait Tracer {
    /// Called when a routine is entered. `matched` is false when the index
    /// falls to the default branch.
    fn trace_enter(&mut self, kind: RoutineKind, index: u32, matched: bool);

    /// Called before executing an instruction.
    fn trace_instruction(&mut self, addr: StepAddr, instr: &Instruction);

    /// Called when a conditional jump is taken.
    fn trace_jump(&mut self, target: StepAddr);

    /// Called before a method body runs.
    fn trace_invoke(&mut self, owner: &str, method: &MethodSignature);

    /// Called when the case completes normally.
    fn trace_complete(&mut self, completion: &Completion);

    /// Called when the case fails.
    fn trace_fault(&mut self, error: &RuntimeError);
}

/// No-op tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_enter(&mut self, _kind: RoutineKind, _index: u32, _matched: bool) {}

    #[inline(always)]
    fn trace_instruction(&mut self, _addr: StepAddr, _instr: &Instruction) {}

    #[inline(always)]
    fn trace_jump(&mut self, _target: StepAddr) {}

    #[inline(always)]
    fn trace_invoke(&mut self, _owner: &str, _method: &MethodSignature) {}

    #[inline(always)]
    fn trace_complete(&mut self, _completion: &Completion) {}

    #[inline(always)]
    fn trace_fault(&mut self, _error: &RuntimeError) {}
}

/// Tracer that collects an execution trace.
#[derive(Debug, Default)]
pub struct PrintTracer {
    verbosity: Verbosity,
    lines: Vec<String>,
}

impl PrintTracer {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Collected lines joined with newlines.
    pub fn dump(&self) -> String {
        self.lines.join("\n")
    }

    fn verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }
}

impl Tracer for PrintTracer {
    fn trace_enter(&mut self, kind: RoutineKind, index: u32, matched: bool) {
        let suffix = if matched { "" } else { " (default)" };
        self.lines.push(format!("{kind} #{index}{suffix}"));
    }

    fn trace_instruction(&mut self, addr: StepAddr, instr: &Instruction) {
        if self.verbose() {
            self.lines.push(format!("  {addr:02}  {instr}"));
        }
    }

    fn trace_jump(&mut self, target: StepAddr) {
        if self.verbose() {
            self.lines.push(format!("      -> {target:02}"));
        }
    }

    fn trace_invoke(&mut self, owner: &str, method: &MethodSignature) {
        self.lines.push(format!("  call {owner}.{method}"));
    }

    fn trace_complete(&mut self, completion: &Completion) {
        self.lines.push(format!("  => {completion}"));
    }

    fn trace_fault(&mut self, error: &RuntimeError) {
        self.lines.push(format!("  !! {error}"));
    }
}
