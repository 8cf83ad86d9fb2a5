//! Core dispatch emission logic.

use beanidx_bytecode::{Case, DispatchModule, Instruction, Routine, RoutineKind};
use tracing::debug;

use crate::catalog::{DispatchCatalog, DispatchTarget};

use super::EmitError;
use super::options::EmitOptions;
use super::targets::{dispatch_case, dispatch_one_case, locator_case};

/// Emit the dispatch module for a catalog.
///
/// Case keys are the catalog indices. A routine with no qualifying target is
/// left out of the module.
pub fn emit(catalog: &DispatchCatalog, options: &EmitOptions) -> Result<DispatchModule, EmitError> {
    let this_type = catalog.this_type();
    let mut module = DispatchModule::new(this_type, catalog.has_intercepted());

    let dispatch = build_routine(
        RoutineKind::Dispatch,
        catalog.targets_supporting_multi(),
        |index, target| dispatch_case(index, target, this_type),
    )?;
    let dispatch_one = build_routine(
        RoutineKind::DispatchOne,
        catalog.targets_supporting_one(),
        dispatch_one_case,
    )?;
    let target_method = if options.target_method_locator {
        build_routine(
            RoutineKind::TargetMethod,
            catalog.method_targets(),
            locator_case,
        )?
    } else {
        debug!(this = this_type, "target method locator disabled");
        None
    };

    for routine in [dispatch, dispatch_one, target_method].into_iter().flatten() {
        module = module.with_routine(routine);
    }

    debug!(
        this = this_type,
        targets = catalog.len(),
        intercepted = module.has_intercepted(),
        "emitted dispatch module"
    );
    Ok(module)
}

fn build_routine<'a>(
    kind: RoutineKind,
    targets: impl Iterator<Item = (u32, &'a DispatchTarget)>,
    mut emit_case: impl FnMut(u32, &DispatchTarget) -> Result<Vec<Instruction>, EmitError>,
) -> Result<Option<Routine>, EmitError> {
    let mut cases = Vec::new();
    for (index, target) in targets {
        cases.push(Case::new(index, emit_case(index, target)?));
    }

    if cases.is_empty() {
        debug!(routine = %kind, "no cases, routine omitted");
        return Ok(None);
    }

    debug!(routine = %kind, cases = cases.len(), "emitted routine");
    Ok(Some(Routine::new(kind, cases)?))
}
