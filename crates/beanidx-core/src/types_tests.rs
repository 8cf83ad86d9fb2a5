use super::types::{MethodSignature, PrimitiveType, TypeRef, builtin};

#[test]
fn parse_keywords_and_classes() {
    assert_eq!(TypeRef::parse("void"), TypeRef::Void);
    assert_eq!(TypeRef::parse("int"), TypeRef::int());
    assert_eq!(TypeRef::parse("boolean"), TypeRef::boolean());
    assert_eq!(TypeRef::parse("String"), TypeRef::string());
    assert_eq!(TypeRef::parse("Integer"), TypeRef::class(builtin::INTEGER));
}

#[test]
fn wrapper_boxes_primitives_only() {
    assert_eq!(TypeRef::int().wrapper(), TypeRef::class("Integer"));
    assert_eq!(TypeRef::double().wrapper(), TypeRef::class("Double"));
    assert_eq!(TypeRef::string().wrapper(), TypeRef::string());
    assert_eq!(TypeRef::Void.wrapper(), TypeRef::Void);
}

#[test]
fn primitive_names() {
    assert_eq!(PrimitiveType::Long.name(), "long");
    assert_eq!(PrimitiveType::Boolean.wrapper_name(), "Boolean");
}

#[test]
fn type_ref_serializes_as_name() {
    let json = serde_json::to_string(&vec![TypeRef::int(), TypeRef::class("Person")]).unwrap();
    assert_eq!(json, r#"["int","Person"]"#);

    let back: Vec<TypeRef> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, vec![TypeRef::int(), TypeRef::class("Person")]);
}

#[test]
fn signature_display() {
    let sig = MethodSignature::new("greet", vec![TypeRef::string(), TypeRef::int()], TypeRef::string());
    assert_eq!(sig.to_string(), "greet(String, int): String");
    assert_eq!(sig.arity(), 2);
    assert!(!sig.returns_void());
}

#[test]
fn signature_defaults_from_json() {
    let sig: MethodSignature = serde_json::from_str(r#"{"name":"reset"}"#).unwrap();
    assert_eq!(sig.arity(), 0);
    assert!(sig.returns_void());
}

#[test]
fn renamed_keeps_shape() {
    let sig = MethodSignature::new("greet", vec![TypeRef::int()], TypeRef::string());
    let bridge = sig.renamed("$$access$greet");
    assert_eq!(bridge.name, "$$access$greet");
    assert_eq!(bridge.params, sig.params);
    assert_eq!(bridge.return_type, sig.return_type);
}
