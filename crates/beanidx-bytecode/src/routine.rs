//! Index-keyed branch tables.

use std::fmt;

use crate::instructions::Instruction;

/// The three entry points a dispatch module can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoutineKind {
    /// Multi-value dispatch: target plus an argument slice.
    Dispatch,
    /// Single-value dispatch: target plus at most one argument.
    DispatchOne,
    /// Reflective-fallback locator.
    TargetMethod,
}

impl RoutineKind {
    pub fn name(self) -> &'static str {
        match self {
            RoutineKind::Dispatch => "dispatch",
            RoutineKind::DispatchOne => "dispatch_one",
            RoutineKind::TargetMethod => "target_method",
        }
    }
}

impl fmt::Display for RoutineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors from assembling a routine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ModuleError {
    #[error("{kind}: case keys must be strictly increasing, got {key} after {prev}")]
    UnorderedCase { kind: RoutineKind, prev: u32, key: u32 },

    #[error("{kind}: case {key} has no code")]
    EmptyCase { kind: RoutineKind, key: u32 },

    #[error("{kind}: case {key} falls off the end of its code")]
    Unterminated { kind: RoutineKind, key: u32 },

    #[error("{kind}: case {key} jumps to {addr}, past its {len} instructions")]
    JumpOutOfRange {
        kind: RoutineKind,
        key: u32,
        addr: u16,
        len: usize,
    },
}

/// One branch of a routine. `key` is the dispatch index it handles.
#[derive(Clone, Debug, PartialEq)]
pub struct Case {
    pub key: u32,
    pub code: Vec<Instruction>,
}

impl Case {
    pub fn new(key: u32, code: Vec<Instruction>) -> Self {
        Self { key, code }
    }
}

/// A branch table over dispatch indices.
///
/// Keys are the catalog indices of the targets handled, never renumbered, so
/// the table may be sparse. Any other index runs the default branch.
#[derive(Clone, Debug, PartialEq)]
pub struct Routine {
    kind: RoutineKind,
    cases: Vec<Case>,
    default: Vec<Instruction>,
}

impl Routine {
    /// Assemble a routine from cases in ascending key order.
    pub fn new(kind: RoutineKind, cases: Vec<Case>) -> Result<Self, ModuleError> {
        let mut prev: Option<u32> = None;
        for case in &cases {
            if let Some(prev) = prev
                && case.key <= prev
            {
                return Err(ModuleError::UnorderedCase {
                    kind,
                    prev,
                    key: case.key,
                });
            }
            prev = Some(case.key);
            validate_code(kind, case)?;
        }

        Ok(Self {
            kind,
            cases,
            default: vec![Instruction::UnknownIndex],
        })
    }

    pub fn kind(&self) -> RoutineKind {
        self.kind
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    pub fn keys(&self) -> impl Iterator<Item = u32> + '_ {
        self.cases.iter().map(|c| c.key)
    }

    pub fn case(&self, index: u32) -> Option<&Case> {
        self.cases
            .binary_search_by_key(&index, |c| c.key)
            .ok()
            .map(|pos| &self.cases[pos])
    }

    /// Code to run for `index`: its case, or the default branch.
    pub fn code_for(&self, index: u32) -> &[Instruction] {
        match self.case(index) {
            Some(case) => &case.code,
            None => &self.default,
        }
    }

    pub fn default_code(&self) -> &[Instruction] {
        &self.default
    }
}

fn validate_code(kind: RoutineKind, case: &Case) -> Result<(), ModuleError> {
    let Some(last) = case.code.last() else {
        return Err(ModuleError::EmptyCase { kind, key: case.key });
    };
    if !last.is_terminal() {
        return Err(ModuleError::Unterminated { kind, key: case.key });
    }
    for instr in &case.code {
        if let Some(addr) = instr.jump_target()
            && addr as usize >= case.code.len()
        {
            return Err(ModuleError::JumpOutOfRange {
                kind,
                key: case.key,
                addr,
                len: case.code.len(),
            });
        }
    }
    Ok(())
}
