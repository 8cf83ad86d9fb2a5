use crate::instructions::Instruction;
use crate::routine::{Case, ModuleError, Routine, RoutineKind};

fn ret_null(key: u32) -> Case {
    Case::new(key, vec![Instruction::PushNull, Instruction::Return])
}

#[test]
fn sparse_keys_lookup() {
    let routine = Routine::new(RoutineKind::Dispatch, vec![ret_null(1), ret_null(4)]).unwrap();

    assert_eq!(routine.keys().collect::<Vec<_>>(), vec![1, 4]);
    assert!(routine.case(4).is_some());
    assert!(routine.case(2).is_none());
    assert_eq!(routine.code_for(2), &[Instruction::UnknownIndex]);
    assert_eq!(routine.code_for(1).len(), 2);
}

#[test]
fn rejects_unordered_keys() {
    let err = Routine::new(RoutineKind::DispatchOne, vec![ret_null(3), ret_null(3)]).unwrap_err();
    assert_eq!(
        err,
        ModuleError::UnorderedCase {
            kind: RoutineKind::DispatchOne,
            prev: 3,
            key: 3
        }
    );
    assert_eq!(
        err.to_string(),
        "dispatch_one: case keys must be strictly increasing, got 3 after 3"
    );
}

#[test]
fn rejects_unterminated_case() {
    let err = Routine::new(
        RoutineKind::Dispatch,
        vec![Case::new(0, vec![Instruction::LoadTarget])],
    )
    .unwrap_err();
    assert_eq!(
        err,
        ModuleError::Unterminated {
            kind: RoutineKind::Dispatch,
            key: 0
        }
    );
}

#[test]
fn rejects_empty_case() {
    let err = Routine::new(RoutineKind::TargetMethod, vec![Case::new(5, vec![])]).unwrap_err();
    assert_eq!(
        err,
        ModuleError::EmptyCase {
            kind: RoutineKind::TargetMethod,
            key: 5
        }
    );
}

#[test]
fn rejects_jump_past_end() {
    let code = vec![
        Instruction::LoadInterceptable,
        Instruction::IfFalse(9),
        Instruction::PushNull,
        Instruction::Return,
    ];
    let err = Routine::new(RoutineKind::Dispatch, vec![Case::new(0, code)]).unwrap_err();
    assert_eq!(err.to_string(), "dispatch: case 0 jumps to 9, past its 4 instructions");
}
