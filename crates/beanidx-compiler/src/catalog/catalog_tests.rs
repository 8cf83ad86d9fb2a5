use beanidx_core::{MethodSignature, TypeRef};
use indoc::indoc;

use super::{DispatchCatalog, DispatchStyle, DispatchTarget};

fn greet() -> MethodSignature {
    MethodSignature::new("greet", vec![], TypeRef::string())
}

#[test]
fn append_returns_position() {
    let mut catalog = DispatchCatalog::new("Person$Introspection");
    assert_eq!(catalog.add_get_field("Person", "name", TypeRef::string()), 0);
    assert_eq!(catalog.add_set_field("Person", "name", TypeRef::string()), 1);
    assert_eq!(
        catalog.add_method("Person", greet(), false, DispatchStyle::Multi),
        2
    );
    // No deduplication.
    assert_eq!(
        catalog.add_method("Person", greet(), false, DispatchStyle::Multi),
        3
    );
    assert_eq!(catalog.len(), 4);
}

#[test]
fn capability_queries_keep_order() {
    let mut catalog = DispatchCatalog::new("Person$Introspection");
    catalog.add_get_field("Person", "name", TypeRef::string());
    catalog.add_method("Person", greet(), false, DispatchStyle::Both);
    catalog.add_method(
        "Person",
        MethodSignature::new("getAge", vec![], TypeRef::int()),
        false,
        DispatchStyle::One,
    );
    catalog.add_intercepted_method("Person", greet(), false, "Person$Proxy", "$$access$greet");

    let multi: Vec<u32> = catalog.targets_supporting_multi().map(|(i, _)| i).collect();
    let one: Vec<u32> = catalog.targets_supporting_one().map(|(i, _)| i).collect();
    let methods: Vec<u32> = catalog.method_targets().map(|(i, _)| i).collect();

    assert_eq!(multi, vec![1, 3]);
    assert_eq!(one, vec![0, 1, 2]);
    assert_eq!(methods, vec![1, 2, 3]);
    assert!(catalog.has_intercepted());
}

#[test]
fn intercepted_target_records_generated_type() {
    let mut catalog = DispatchCatalog::new("Person$Introspection");
    let index =
        catalog.add_intercepted_method("Person", greet(), false, "Person$Proxy", "$$access$greet");

    let Some(DispatchTarget::InterceptedMethod(m)) = catalog.get(index) else {
        panic!("expected intercepted target");
    };
    assert_eq!(m.this_type, "Person$Introspection");
    assert_eq!(m.bridge_signature().name, "$$access$greet");
    assert_eq!(m.bridge_signature().return_type, TypeRef::string());
}

#[test]
fn catalog_from_json() {
    let json = indoc! {r#"
        {
          "this_type": "Person$Introspection",
          "targets": [
            { "kind": "field_get", "owner": "Person", "name": "age", "type": "int" },
            {
              "kind": "method",
              "declaring": "Person",
              "signature": { "name": "greet", "return_type": "String" },
              "style": "both"
            }
          ]
        }
    "#};

    let catalog = DispatchCatalog::from_json(json).unwrap();
    assert_eq!(catalog.this_type(), "Person$Introspection");
    assert_eq!(catalog.len(), 2);
    assert!(catalog.get(0).unwrap().supports_one());
    let method = catalog.get(1).unwrap();
    assert!(method.supports_one() && method.supports_multi());
    assert_eq!(method.owner(), "Person");

    let back = DispatchCatalog::from_json(&catalog.to_json().unwrap()).unwrap();
    assert_eq!(back, catalog);
}

#[test]
fn invalid_json_is_reported() {
    let err = DispatchCatalog::from_json(r#"{"targets": [{"kind": "nope"}]}"#).unwrap_err();
    assert!(err.to_string().starts_with("invalid catalog description"));
}
