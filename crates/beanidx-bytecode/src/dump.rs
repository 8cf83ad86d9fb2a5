//! Human-readable dump of a dispatch module for debugging and snapshots.

use std::fmt::Write as _;

use crate::instructions::Instruction;
use crate::module::DispatchModule;
use crate::routine::{Routine, RoutineKind};

const ROUTINES: [RoutineKind; 3] = [
    RoutineKind::Dispatch,
    RoutineKind::DispatchOne,
    RoutineKind::TargetMethod,
];

/// Generate a human-readable dump of the dispatch module.
pub fn dump(module: &DispatchModule) -> String {
    let mut out = String::new();

    out.push_str("[module]\n");
    writeln!(out, "this = {}", module.this_type()).unwrap();
    writeln!(out, "intercepted = {}", module.has_intercepted()).unwrap();

    for kind in ROUTINES {
        out.push('\n');
        writeln!(out, "[{kind}]").unwrap();
        match module.routine(kind) {
            Some(routine) => dump_routine(&mut out, routine),
            None => out.push_str("  (absent)\n"),
        }
    }

    out
}

fn dump_routine(out: &mut String, routine: &Routine) {
    for case in routine.cases() {
        writeln!(out, "case {}:", case.key).unwrap();
        dump_code(out, &case.code);
    }
    out.push_str("default:\n");
    dump_code(out, routine.default_code());
}

fn dump_code(out: &mut String, code: &[Instruction]) {
    for (addr, instr) in code.iter().enumerate() {
        writeln!(out, "  {addr:02}  {instr}").unwrap();
    }
}
