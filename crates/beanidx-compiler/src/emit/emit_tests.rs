use beanidx_bytecode::{RoutineKind, dump};
use beanidx_core::{MethodSignature, TypeRef};

use crate::catalog::{DispatchCatalog, DispatchStyle, DispatchTarget, InterceptedTarget};

use super::{EmitError, EmitOptions, emit};

fn person_catalog() -> DispatchCatalog {
    let mut catalog = DispatchCatalog::new("Person$Introspection");
    catalog.add_get_field("Person", "name", TypeRef::string());
    catalog.add_method(
        "Person",
        MethodSignature::new("greet", vec![], TypeRef::string()),
        false,
        DispatchStyle::Both,
    );
    catalog.add_set_field("Person", "age", TypeRef::int());
    catalog.add_method(
        "Named",
        MethodSignature::new("rename", vec![TypeRef::string()], TypeRef::Void),
        true,
        DispatchStyle::Multi,
    );
    catalog.add_intercepted_method(
        "Person",
        MethodSignature::new("shout", vec![TypeRef::string(), TypeRef::int()], TypeRef::string()),
        false,
        "Person$Intercepted",
        "$$access$shout",
    );
    catalog
}

#[test]
fn emit_all_target_kinds() {
    let module = emit(&person_catalog(), &EmitOptions::default()).unwrap();

    insta::assert_snapshot!(dump(&module), @r#"
    [module]
    this = Person$Introspection
    intercepted = true

    [dispatch]
    case 1:
      00  load.target
      01  checkcast Person
      02  invoke.virtual Person.greet(): String
      03  return
    case 3:
      00  load.target
      01  checkcast Named
      02  load.arg 0
      03  checkcast String
      04  invoke.interface Named.rename(String): void
      05  push.null
      06  return
    case 4:
      00  load.interceptable
      01  if.false 13
      02  load.target
      03  instanceof Person$Intercepted
      04  if.false 13
      05  load.target
      06  checkcast Person$Intercepted
      07  load.arg 0
      08  checkcast String
      09  load.arg 1
      10  checkcast int
      11  invoke.virtual Person$Intercepted.$$access$shout(String, int): String
      12  return
      13  load.target
      14  checkcast Person
      15  load.arg 0
      16  checkcast String
      17  load.arg 1
      18  checkcast int
      19  invoke.virtual Person.shout(String, int): String
      20  return
    default:
      00  throw.unknown_index

    [dispatch_one]
    case 0:
      00  load.target
      01  checkcast Person
      02  getfield Person.name: String
      03  return
    case 1:
      00  load.target
      01  checkcast Person
      02  invoke.virtual Person.greet(): String
      03  return
    case 2:
      00  load.target
      01  checkcast Person
      02  load.arg
      03  checkcast int
      04  putfield Person.age: int
      05  push.null
      06  return
    default:
      00  throw.unknown_index

    [target_method]
    case 1:
      00  resolve Person.greet(EMPTY)
    case 3:
      00  resolve Named.rename(String)
    case 4:
      00  resolve Person.shout(String, int)
    default:
      00  throw.unknown_index
    "#);
}

#[test]
fn primitive_getter_boxes() {
    let mut catalog = DispatchCatalog::new("Counter$Introspection");
    catalog.add_get_field("Counter", "hits", TypeRef::long());
    catalog.add_method(
        "Counter",
        MethodSignature::new("setEnabled", vec![TypeRef::boolean()], TypeRef::Void),
        false,
        DispatchStyle::One,
    );

    let module = emit(&catalog, &EmitOptions::new().target_method_locator(false)).unwrap();

    insta::assert_snapshot!(dump(&module), @r#"
    [module]
    this = Counter$Introspection
    intercepted = false

    [dispatch]
      (absent)

    [dispatch_one]
    case 0:
      00  load.target
      01  checkcast Counter
      02  getfield Counter.hits: long
      03  box long
      04  return
    case 1:
      00  load.target
      01  checkcast Counter
      02  load.arg
      03  checkcast boolean
      04  invoke.virtual Counter.setEnabled(boolean): void
      05  push.null
      06  return
    default:
      00  throw.unknown_index

    [target_method]
      (absent)
    "#);
}

#[test]
fn empty_catalog_emits_no_routines() {
    let module = emit(&DispatchCatalog::new("Empty$Introspection"), &EmitOptions::default()).unwrap();
    assert!(module.dispatch().is_none());
    assert!(module.dispatch_one().is_none());
    assert!(module.target_method().is_none());
    assert!(!module.has_intercepted());
}

#[test]
fn case_keys_are_catalog_indices() {
    let module = emit(&person_catalog(), &EmitOptions::default()).unwrap();
    let keys = |kind| {
        module
            .routine(kind)
            .map(|r| r.keys().collect::<Vec<_>>())
            .unwrap_or_default()
    };
    assert_eq!(keys(RoutineKind::Dispatch), vec![1, 3, 4]);
    assert_eq!(keys(RoutineKind::DispatchOne), vec![0, 1, 2]);
    assert_eq!(keys(RoutineKind::TargetMethod), vec![1, 3, 4]);
}

#[test]
fn one_dispatch_rejects_two_arguments() {
    let mut catalog = DispatchCatalog::new("Person$Introspection");
    catalog.add_get_field("Person", "name", TypeRef::string());
    catalog.add_method(
        "Person",
        MethodSignature::new("move", vec![TypeRef::int(), TypeRef::int()], TypeRef::Void),
        false,
        DispatchStyle::One,
    );

    let err = emit(&catalog, &EmitOptions::default()).unwrap_err();
    assert_eq!(
        err,
        EmitError::OneDispatchArity {
            index: 1,
            method: "Person.move".into(),
            arity: 2,
        }
    );
    assert_eq!(
        err.to_string(),
        "method `Person.move` at index 1 takes 2 arguments; single-value dispatch passes at most one"
    );
}

#[test]
fn foreign_intercepted_target_is_rejected() {
    let mut catalog = DispatchCatalog::new("Person$Introspection");
    catalog.append(DispatchTarget::InterceptedMethod(InterceptedTarget {
        declaring: "Person".into(),
        signature: MethodSignature::new("greet", vec![], TypeRef::string()),
        interface: false,
        proxy_type: "Person$Intercepted".into(),
        bridge_method: "$$access$greet".into(),
        this_type: "Other$Introspection".into(),
    }));

    let err = emit(&catalog, &EmitOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        EmitError::ForeignInterceptedTarget { index: 0, .. }
    ));
}
