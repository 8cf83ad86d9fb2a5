//! Shared fixtures: a `Person` class hierarchy and its dispatch catalog.

use beanidx_bytecode::DispatchModule;
use beanidx_compiler::{DispatchCatalog, DispatchStyle, EmitOptions, emit};
use beanidx_core::{MethodSignature, ObjRef, Slot, TypeRef, Value};

use super::class_table::{ClassDef, ClassTable};

pub const PERSON: &str = "Person";
pub const PROXY: &str = "Person$Intercepted";

pub fn greet() -> MethodSignature {
    MethodSignature::new("greet", vec![], TypeRef::string())
}

pub fn shout() -> MethodSignature {
    MethodSignature::new("shout", vec![TypeRef::string(), TypeRef::int()], TypeRef::string())
}

pub fn describe() -> MethodSignature {
    MethodSignature::new("describe", vec![], TypeRef::string())
}

pub fn reset() -> MethodSignature {
    MethodSignature::new("reset", vec![], TypeRef::Void)
}

fn str_field(obj: &ObjRef, name: &str) -> String {
    obj.field(name)
        .and_then(|slot| slot.as_value().and_then(Value::as_str).map(str::to_owned))
        .unwrap_or_default()
}

pub fn person_classes() -> ClassTable {
    let mut classes = ClassTable::new();
    classes
        .define(ClassDef::interface("Named").abstract_method(describe()))
        .unwrap();
    classes
        .define(
            ClassDef::class(PERSON)
                .implements("Named")
                .field("name", TypeRef::string())
                .field("age", TypeRef::int())
                .method(greet(), |this, _| {
                    Ok(Slot::Ref(Value::from(format!("Hello, {}", str_field(this, "name")))))
                })
                .method(describe(), |this, _| {
                    let age = this.field("age").and_then(|s| s.as_int()).unwrap_or_default();
                    Ok(Slot::Ref(Value::from(format!("{} ({age})", str_field(this, "name")))))
                })
                .method(shout(), |_, args| {
                    let text = args[0].as_value().and_then(Value::as_str).unwrap_or_default();
                    let times = args[1].as_int().unwrap_or_default() as usize;
                    Ok(Slot::Ref(Value::from(format!(
                        "{}{}",
                        text.to_uppercase(),
                        "!".repeat(times)
                    ))))
                })
                .method(reset(), |this, _| {
                    this.set_field("age", Slot::Int(0));
                    Ok(Slot::null())
                }),
        )
        .unwrap();
    classes
        .define(
            ClassDef::class(PROXY)
                .extends(PERSON)
                .method(shout().renamed("$$access$shout"), |_, args| {
                    let text = args[0].as_value().and_then(Value::as_str).unwrap_or_default();
                    let times = args[1].as_int().unwrap_or_default();
                    Ok(Slot::Ref(Value::from(format!("bridge:{text}:{times}"))))
                }),
        )
        .unwrap();
    classes
}

/// Indices:
/// 0 get name, 1 greet (both), 2 set age, 3 describe (interface),
/// 4 shout (intercepted), 5 reset, 6 get age.
pub fn person_catalog() -> DispatchCatalog {
    let mut catalog = DispatchCatalog::new("Person$Introspection");
    catalog.add_get_field(PERSON, "name", TypeRef::string());
    catalog.add_method(PERSON, greet(), false, DispatchStyle::Both);
    catalog.add_set_field(PERSON, "age", TypeRef::int());
    catalog.add_method("Named", describe(), true, DispatchStyle::Multi);
    catalog.add_intercepted_method(PERSON, shout(), false, PROXY, "$$access$shout");
    catalog.add_method(PERSON, reset(), false, DispatchStyle::Multi);
    catalog.add_get_field(PERSON, "age", TypeRef::int());
    catalog
}

pub fn person_module() -> DispatchModule {
    emit(&person_catalog(), &EmitOptions::default()).unwrap()
}

pub fn new_person(classes: &ClassTable, class: &str, name: &str, age: i32) -> Value {
    let obj = classes.new_instance(class).unwrap();
    obj.set_field("name", Slot::Ref(Value::from(name)));
    obj.set_field("age", Slot::Int(age));
    Value::Object(obj)
}
