//! `Person` bean fixtures for facade tests.

use std::sync::Arc;

use beanidx_core::{AnnotationMetadata, Argument, MethodSignature, ObjRef, Slot, TypeRef, Value};
use beanidx_vm::{ClassDef, ClassTable, RuntimeError};

use super::{Accessors, Introspection, IntrospectionBuilder, MethodDecl};

pub const PERSON: &str = "Person";
pub const PROXY: &str = "Person$Intercepted";

fn str_field(obj: &ObjRef, name: &str) -> String {
    obj.field(name)
        .and_then(|slot| slot.as_value().and_then(Value::as_str).map(str::to_owned))
        .unwrap_or_default()
}

fn copy_of(obj: &ObjRef) -> ObjRef {
    let fields = obj
        .field_names()
        .into_iter()
        .filter_map(|name| obj.field(&name).map(|slot| (name, slot)))
        .collect();
    ObjRef::new(obj.class_name(), fields)
}

fn field_getter(
    field: &'static str,
) -> impl Fn(&ObjRef, &[Slot]) -> Result<Slot, RuntimeError> + Send + Sync + 'static {
    move |this, _| Ok(this.field(field).unwrap_or_else(Slot::null))
}

fn field_setter(
    field: &'static str,
) -> impl Fn(&ObjRef, &[Slot]) -> Result<Slot, RuntimeError> + Send + Sync + 'static {
    move |this, args| {
        this.set_field(field, args[0].clone());
        Ok(Slot::null())
    }
}

pub fn person_classes() -> ClassTable {
    let string = TypeRef::string;
    let mut classes = ClassTable::new();
    classes
        .define(
            ClassDef::class(PERSON)
                .field("name", string())
                .field("age", TypeRef::int())
                .field("email", string())
                .field("nickname", string())
                .method(
                    MethodSignature::new("getAge", vec![], TypeRef::int()),
                    field_getter("age"),
                )
                .method(
                    MethodSignature::new("withAge", vec![TypeRef::int()], TypeRef::class(PERSON)),
                    |this, args| {
                        let copy = copy_of(this);
                        copy.set_field("age", args[0].clone());
                        Ok(Slot::Ref(Value::Object(copy)))
                    },
                )
                .method(
                    MethodSignature::new("getEmail", vec![], string()),
                    field_getter("email"),
                )
                .method(
                    MethodSignature::new("setEmail", vec![string()], TypeRef::Void),
                    field_setter("email"),
                )
                .method(
                    MethodSignature::new("setNickname", vec![string()], TypeRef::Void),
                    field_setter("nickname"),
                )
                .method(MethodSignature::new("greet", vec![], string()), |this, _| {
                    Ok(Slot::Ref(Value::from(format!("Hello, {}", str_field(this, "name")))))
                })
                .method(
                    MethodSignature::new("introduce", vec![string()], string()),
                    |this, args| {
                        let other = args[0].as_value().and_then(Value::as_str).unwrap_or_default();
                        Ok(Slot::Ref(Value::from(format!(
                            "Hi {other}, I'm {}",
                            str_field(this, "name")
                        ))))
                    },
                ),
        )
        .unwrap();
    classes
        .define(ClassDef::class(PROXY).extends(PERSON).method(
            MethodSignature::new("$$access$greet", vec![], string()),
            |_, _| Ok(Slot::Ref(Value::from("intercepted"))),
        ))
        .unwrap();
    classes
}

/// Indices:
/// 0 name (field, read-only), 1 getAge, 2 withAge, 3 getEmail, 4 setEmail,
/// 5 setNickname, 6 greet (intercepted), 7 introduce.
pub fn person_builder() -> IntrospectionBuilder {
    IntrospectionBuilder::new(PERSON)
        .constructor(vec![
            Argument::new("name", TypeRef::string()),
            Argument::new("age", TypeRef::int()),
        ])
        .read_only_field(Argument::new("name", TypeRef::string()))
        .property(
            Argument::new("age", TypeRef::int()),
            Accessors::new().getter("getAge").wither("withAge"),
        )
        .property(
            Argument::new("email", TypeRef::string()).nullable(),
            Accessors::new().getter("getEmail").setter("setEmail"),
        )
        .property(
            Argument::new("nickname", TypeRef::string()),
            Accessors::new().setter("setNickname"),
        )
        .method(MethodDecl::new("greet", TypeRef::string()).intercepted(PROXY, "$$access$greet"))
        .method(
            MethodDecl::new("introduce", TypeRef::string())
                .argument(Argument::new("other", TypeRef::string()))
                .annotated(AnnotationMetadata::new().with("Executable", [("processOnStartup", "false")])),
        )
}

pub fn person_introspection() -> Introspection {
    person_builder().build(Arc::new(person_classes())).unwrap()
}

pub fn new_person(introspection: &Introspection, class: &str, name: &str, age: i32) -> Value {
    let obj = introspection.generated().classes().new_instance(class).unwrap();
    obj.set_field("name", Slot::Ref(Value::from(name)));
    obj.set_field("age", Slot::Int(age));
    Value::Object(obj)
}
