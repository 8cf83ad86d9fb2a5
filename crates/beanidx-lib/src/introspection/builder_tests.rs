use std::sync::Arc;

use beanidx_compiler::{DispatchStyle, DispatchTarget, EmitOptions};
use beanidx_core::{Argument, TypeRef, Value};
use beanidx_vm::RuntimeError;

use super::test_utils::{PERSON, new_person, person_builder, person_classes};
use super::{Accessors, GeneratedType, IntrospectionBuilder, MethodDecl};
use crate::Error;

#[test]
fn indices_follow_registration_order() {
    let builder = person_builder();
    let catalog = builder.catalog();

    let summary: Vec<String> = catalog
        .targets()
        .iter()
        .enumerate()
        .map(|(i, target)| match target {
            DispatchTarget::FieldGet(f) => format!("{i} get {}", f.name),
            DispatchTarget::FieldSet(f) => format!("{i} set {}", f.name),
            DispatchTarget::Method(m) => format!("{i} {:?} {}", m.style, m.signature.name),
            DispatchTarget::InterceptedMethod(m) => format!("{i} intercepted {}", m.signature.name),
        })
        .collect();

    assert_eq!(
        summary,
        [
            "0 get name",
            "1 One getAge",
            "2 One withAge",
            "3 One getEmail",
            "4 One setEmail",
            "5 One setNickname",
            "6 intercepted greet",
            "7 Multi introduce",
        ]
    );
    assert_eq!(catalog.this_type(), "Person$Introspection");
}

#[test]
fn property_and_method_refs_carry_catalog_indices() {
    let introspection = person_builder().build(Arc::new(person_classes())).unwrap();

    let email = introspection.property("email").unwrap();
    assert_eq!(email.argument().name(), "email");
    assert!(email.argument().is_declared_nullable());
    let methods: Vec<_> = introspection
        .methods()
        .map(|m| (m.name(), m.index()))
        .collect();
    assert_eq!(methods, [("greet", 6), ("introduce", 7)]);
}

#[test]
fn field_get_and_method_share_one_catalog() {
    let introspection = IntrospectionBuilder::new(PERSON)
        .read_only_field(Argument::new("name", TypeRef::string()))
        .method(MethodDecl::new("greet", TypeRef::string()).style(DispatchStyle::Both))
        .build(Arc::new(person_classes()))
        .unwrap();
    let bean = new_person(&introspection, PERSON, "Alice", 30);
    let generated = introspection.generated();

    assert_eq!(
        generated.dispatch_one(0, &bean, &Value::Null).unwrap(),
        Value::from("Alice")
    );
    assert_eq!(
        generated.dispatch(1, &bean, &[]).unwrap(),
        Value::from("Hello, Alice")
    );
    assert_eq!(
        generated.dispatch_one(1, &bean, &Value::Null).unwrap(),
        Value::from("Hello, Alice")
    );
    assert_eq!(
        generated.dispatch(2, &bean, &[]).unwrap_err(),
        RuntimeError::UnknownDispatchIndex(2)
    );
}

#[test]
fn field_property_round_trips_primitives() {
    let introspection = IntrospectionBuilder::new(PERSON)
        .field(Argument::new("age", TypeRef::int()))
        .field(Argument::new("name", TypeRef::string()))
        .build(Arc::new(person_classes()))
        .unwrap();
    let bean = new_person(&introspection, PERSON, "Alice", 30);
    let age = introspection.property("age").unwrap();
    let name = introspection.property("name").unwrap();

    age.set(&bean, Value::Int(45)).unwrap();
    name.set(&bean, Value::from("Alicia")).unwrap();

    assert_eq!(age.get(&bean).unwrap(), Value::Int(45));
    assert_eq!(name.get(&bean).unwrap(), Value::from("Alicia"));
    assert!(!age.is_read_only());
    assert!(age.has_setter_or_constructor_argument());
}

#[test]
fn null_into_primitive_field_faults() {
    let introspection = IntrospectionBuilder::new(PERSON)
        .field(Argument::new("age", TypeRef::int()))
        .build(Arc::new(person_classes()))
        .unwrap();
    let bean = new_person(&introspection, PERSON, "Alice", 30);
    let age = introspection.property("age").unwrap();

    let err = age.set(&bean, Value::Null).unwrap_err();

    assert!(matches!(err, Error::Dispatch(RuntimeError::NullPointer(_))));
    assert_eq!(age.get(&bean).unwrap(), Value::Int(30));
}

#[test]
fn read_only_non_constructor_property_cannot_be_copied() {
    let introspection = IntrospectionBuilder::new(PERSON)
        .constructor(vec![Argument::new("name", TypeRef::string())])
        .read_only_field(Argument::new("name", TypeRef::string()))
        .read_only_field(Argument::new("email", TypeRef::string()))
        .build(Arc::new(person_classes()))
        .unwrap();
    let bean = new_person(&introspection, PERSON, "Alice", 30);
    let email = introspection.property("email").unwrap();

    assert!(!email.has_setter_or_constructor_argument());
    let err = email.with_value(&bean, Value::from("x@y.z")).unwrap_err();

    assert_eq!(
        err,
        Error::UnsupportedOperation(
            "Cannot create copy of type [Person]. Property of type [String] is not a constructor argument and is read-only"
                .to_owned()
        )
    );
}

#[test]
fn default_constructor() {
    let introspection = IntrospectionBuilder::new(PERSON)
        .default_constructor()
        .field(Argument::new("age", TypeRef::int()))
        .build(Arc::new(person_classes()))
        .unwrap();

    let bean = introspection.instantiate(&[]).unwrap();

    assert_eq!(bean.class_name(), PERSON);
    let age = introspection.property("age").unwrap();
    assert_eq!(age.get(&bean).unwrap(), Value::Int(0));
}

#[test]
fn parameterless_constructor_is_the_default() {
    let introspection = IntrospectionBuilder::new(PERSON)
        .constructor(vec![])
        .field(Argument::new("age", TypeRef::int()))
        .build(Arc::new(person_classes()))
        .unwrap();

    let bean = introspection.instantiate(&[]).unwrap();

    assert_eq!(bean.class_name(), PERSON);
    assert!(introspection.constructor_arguments().is_empty());
    assert_eq!(
        introspection.instantiate(&[Value::Int(1)]).unwrap_err(),
        Error::Instantiation(
            "Argument count [1] doesn't match required argument count: 0".to_owned()
        )
    );
}

#[test]
fn custom_constructor_body() {
    let introspection = IntrospectionBuilder::new(PERSON)
        .constructor_with(
            vec![Argument::new("name", TypeRef::string())],
            |classes, args| {
                let obj = classes.new_instance(PERSON)?;
                let upper = args[0].as_str().unwrap_or_default().to_uppercase();
                obj.set_field("name", Value::from(upper).into());
                Ok(Value::Object(obj))
            },
        )
        .read_only_field(Argument::new("name", TypeRef::string()))
        .build(Arc::new(person_classes()))
        .unwrap();

    let bean = introspection.instantiate(&[Value::from("zoe")]).unwrap();

    let name = introspection.property("name").unwrap();
    assert_eq!(name.get(&bean).unwrap(), Value::from("ZOE"));
}

#[test]
fn unknown_bean_type() {
    let result = IntrospectionBuilder::new("Ghost").build(Arc::new(person_classes()));

    assert_eq!(
        result.err(),
        Some(Error::Dispatch(RuntimeError::UnknownClass("Ghost".to_owned())))
    );
}

#[test]
fn emit_error_surfaces_from_build() {
    let result = IntrospectionBuilder::new(PERSON)
        .method(
            MethodDecl::new("introduce", TypeRef::string())
                .argument(Argument::new("a", TypeRef::string()))
                .argument(Argument::new("b", TypeRef::string()))
                .style(DispatchStyle::One),
        )
        .build(Arc::new(person_classes()));

    assert!(matches!(result, Err(Error::Emit(_))));
}

#[test]
fn locator_disabled() {
    let introspection = person_builder()
        .emit_options(EmitOptions::new().target_method_locator(false))
        .build(Arc::new(person_classes()))
        .unwrap();
    let introduce = introspection
        .methods()
        .find(|m| m.name() == "introduce")
        .unwrap();

    assert_eq!(
        introduce.reflect().unwrap_err(),
        Error::Dispatch(RuntimeError::UnknownDispatchIndex(7))
    );
    assert!(!introspection.generated().dump().contains("[target_method]\ncase"));
}

#[test]
fn compiled_type_dump_lists_routines() {
    let introspection = person_builder().build(Arc::new(person_classes())).unwrap();
    let dump = introspection.generated().dump();

    assert!(dump.starts_with("[module]\nthis = Person$Introspection\nintercepted = true\n"));
    for section in ["[dispatch]", "[dispatch_one]", "[target_method]"] {
        assert!(dump.contains(section), "missing {section}");
    }
}

#[test]
fn accessors_emit_single_value_cases() {
    let introspection = IntrospectionBuilder::new(PERSON)
        .property(
            Argument::new("age", TypeRef::int()),
            Accessors::new().getter("getAge").wither("withAge"),
        )
        .emit_options(EmitOptions::new().target_method_locator(false))
        .build(Arc::new(person_classes()))
        .unwrap();

    insta::assert_snapshot!(introspection.generated().dump(), @r"
    [module]
    this = Person$Introspection
    intercepted = false

    [dispatch]
      (absent)

    [dispatch_one]
    case 0:
      00  load.target
      01  checkcast Person
      02  invoke.virtual Person.getAge(): int
      03  box int
      04  return
    case 1:
      00  load.target
      01  checkcast Person
      02  load.arg
      03  checkcast int
      04  invoke.virtual Person.withAge(int): Person
      05  return
    default:
      00  throw.unknown_index

    [target_method]
      (absent)
    ");
}

#[test]
fn single_value_method_invokes_through_dispatch_one() {
    let introspection = IntrospectionBuilder::new(PERSON)
        .method(
            MethodDecl::new("introduce", TypeRef::string())
                .argument(Argument::new("other", TypeRef::string()))
                .style(DispatchStyle::One),
        )
        .build(Arc::new(person_classes()))
        .unwrap();
    let bean = new_person(&introspection, PERSON, "Alice", 30);
    let introduce = introspection.methods().next().unwrap();

    let dump = introspection.generated().dump();
    assert!(dump.contains("[dispatch]\n  (absent)"));
    assert_eq!(
        introduce.invoke(&bean, &[Value::from("Bob")]).unwrap(),
        Value::from("Hi Bob, I'm Alice")
    );
    assert!(matches!(
        introduce.invoke(&bean, &[Value::from("Bob"), Value::from("Eve")]),
        Err(Error::UnsupportedOperation(_))
    ));
}
