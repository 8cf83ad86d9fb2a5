//! Instruction writer for a single routine case.
//!
//! Jumps are written against symbolic labels and patched when the case is
//! finished, so forward branches need no address bookkeeping by callers.

use beanidx_bytecode::{Instruction, StepAddr};
use beanidx_core::TypeRef;

use super::EmitError;

/// Symbolic jump target, resolved when the case is finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct Label(u32);

pub(super) struct CaseWriter {
    index: u32,
    code: Vec<Instruction>,
    labels: Vec<Option<usize>>,
    /// (instruction position, label) pairs awaiting a resolved address.
    fixups: Vec<(usize, Label)>,
}

impl CaseWriter {
    /// Writer for the case handling dispatch index `index`.
    pub(super) fn new(index: u32) -> Self {
        Self {
            index,
            code: Vec::new(),
            labels: Vec::new(),
            fixups: Vec::new(),
        }
    }

    pub(super) fn push(&mut self, instr: Instruction) {
        self.code.push(instr);
    }

    pub(super) fn new_label(&mut self) -> Label {
        let label = Label(self.labels.len() as u32);
        self.labels.push(None);
        label
    }

    /// Bind `label` to the next instruction written.
    pub(super) fn place(&mut self, label: Label) {
        self.labels[label.0 as usize] = Some(self.code.len());
    }

    pub(super) fn if_false(&mut self, label: Label) {
        self.fixups.push((self.code.len(), label));
        self.code.push(Instruction::IfFalse(0));
    }

    pub(super) fn cast(&mut self, ty: &TypeRef) {
        self.code.push(Instruction::CheckCast(ty.clone()));
    }

    /// Turn the value just produced into a dispatch result: void yields null,
    /// primitives are boxed.
    pub(super) fn normalize_result(&mut self, return_type: &TypeRef) {
        if return_type.is_void() {
            self.code.push(Instruction::PushNull);
        } else if let Some(prim) = return_type.as_primitive() {
            self.code.push(Instruction::Box(prim));
        }
    }

    pub(super) fn finish(mut self) -> Result<Vec<Instruction>, EmitError> {
        let len = self.code.len();
        if len > StepAddr::MAX as usize {
            return Err(EmitError::CaseTooLarge {
                index: self.index,
                len,
            });
        }

        for (pos, label) in std::mem::take(&mut self.fixups) {
            let Some(addr) = self.labels[label.0 as usize] else {
                return Err(EmitError::UnplacedLabel {
                    index: self.index,
                    label: label.0,
                });
            };
            self.code[pos] = Instruction::IfFalse(addr as StepAddr);
        }

        Ok(self.code)
    }
}
