//! The emitted dispatch unit of one generated type.

use crate::routine::{Routine, RoutineKind};

/// Routines emitted for one generated type.
///
/// A routine is absent when no target qualified for it; callers treat every
/// index of an absent routine as unknown.
#[derive(Clone, Debug, PartialEq)]
pub struct DispatchModule {
    this_type: String,
    dispatch: Option<Routine>,
    dispatch_one: Option<Routine>,
    target_method: Option<Routine>,
    has_intercepted: bool,
}

impl DispatchModule {
    pub fn new(this_type: impl Into<String>, has_intercepted: bool) -> Self {
        Self {
            this_type: this_type.into(),
            dispatch: None,
            dispatch_one: None,
            target_method: None,
            has_intercepted,
        }
    }

    /// Install a routine in the slot matching its kind.
    pub fn with_routine(mut self, routine: Routine) -> Self {
        let slot = match routine.kind() {
            RoutineKind::Dispatch => &mut self.dispatch,
            RoutineKind::DispatchOne => &mut self.dispatch_one,
            RoutineKind::TargetMethod => &mut self.target_method,
        };
        *slot = Some(routine);
        self
    }

    /// Name of the generated type that owns these routines.
    pub fn this_type(&self) -> &str {
        &self.this_type
    }

    /// Whether any case consults the interceptable flag.
    pub fn has_intercepted(&self) -> bool {
        self.has_intercepted
    }

    pub fn routine(&self, kind: RoutineKind) -> Option<&Routine> {
        match kind {
            RoutineKind::Dispatch => self.dispatch.as_ref(),
            RoutineKind::DispatchOne => self.dispatch_one.as_ref(),
            RoutineKind::TargetMethod => self.target_method.as_ref(),
        }
    }

    pub fn dispatch(&self) -> Option<&Routine> {
        self.dispatch.as_ref()
    }

    pub fn dispatch_one(&self) -> Option<&Routine> {
        self.dispatch_one.as_ref()
    }

    pub fn target_method(&self) -> Option<&Routine> {
        self.target_method.as_ref()
    }
}
