//! Field classification, `allEntitiesAndEnums` and the symbol table.

use rstest::rstest;
use zdl::{SymbolKind, Value, ZdlModel, post_process};

use crate::helpers::model_helpers::model_from;
use crate::helpers::source_fixtures::*;

fn flag(model: &ZdlModel, path: &str) -> Option<bool> {
    model.get(path).and_then(Value::as_bool)
}

#[test]
fn test_enum_typed_field_is_complex() {
    let model = model_from(ENUM_FIELD);
    let status = "entities.Order.fields.status";
    assert_eq!(flag(&model, &format!("{status}.isEnum")), Some(true));
    assert_eq!(flag(&model, &format!("{status}.isComplexType")), Some(true));
    assert_eq!(flag(&model, &format!("{status}.isEntity")), Some(false));
    assert_eq!(flag(&model, &format!("{status}.isEvent")), Some(false));
}

#[rstest]
#[case("isEntity")]
#[case("isEnum")]
#[case("isInput")]
#[case("isOutput")]
#[case("isEvent")]
#[case("isComplexType")]
fn test_standard_type_flags_are_false(#[case] name: &str) {
    let model = model_from(ENUM_FIELD);
    assert_eq!(
        flag(&model, &format!("entities.Order.fields.total.{name}")),
        Some(false)
    );
}

#[rstest]
#[case("entities.Order.fields.customer", "isEntity")]
#[case("entities.Order.fields.items", "isEntity")]
#[case("inputs.CustomerFilter.fields.status", "isEnum")]
#[case("outputs.CustomerPage.fields.filter", "isInput")]
#[case("events.CustomerCreated.fields.customer", "isEntity")]
fn test_field_classified_by_declaration(#[case] field: &str, #[case] expected: &str) {
    let model = model_from(ORDERS_MODEL);
    assert_eq!(flag(&model, &format!("{field}.{expected}")), Some(true));
    assert_eq!(flag(&model, &format!("{field}.isComplexType")), Some(true));
}

#[test]
fn test_complex_type_is_any_flag() {
    let model = model_from(ORDERS_MODEL);
    let symbols = model.symbols().unwrap();

    for collection in ["entities", "inputs", "outputs", "events"] {
        for (path, field) in model.paths(&format!("{collection}.*.fields.*")) {
            let type_name = field.get_str("type").unwrap_or_default();
            let mut any = false;
            for kind in SymbolKind::ALL {
                let Some(name) = kind.field_flag() else {
                    continue;
                };
                let expected = symbols.contains(kind, type_name);
                assert_eq!(
                    field.get(name).and_then(Value::as_bool),
                    Some(expected),
                    "{}.{}",
                    path,
                    name
                );
                any |= expected;
            }
            assert_eq!(
                field.get("isComplexType").and_then(Value::as_bool),
                Some(any),
                "{}",
                path
            );
        }
    }
}

#[test]
fn test_all_entities_and_enums() {
    let model = model_from(ORDERS_MODEL);
    let all = model
        .get("allEntitiesAndEnums")
        .and_then(Value::as_map)
        .unwrap();
    let names: Vec<_> = all.keys().map(String::as_str).collect();
    assert_eq!(
        names,
        vec![
            "CustomerAggregate",
            "Customer",
            "Address",
            "Order",
            "OrderItem",
            "CustomerStatus",
            "CustomerFilter",
            "CustomerPage",
        ]
    );
    assert!(!all.contains_key("CustomerCreated"));
    assert_eq!(
        all.get("CustomerAggregate").and_then(|a| a.get_str("aggregateRoot")),
        Some("Customer")
    );
    assert_eq!(
        all.get("CustomerStatus").and_then(|e| e.get_str("type")),
        Some("enums")
    );
}

#[test]
fn test_symbol_table_attached() {
    let model = model_from(ORDERS_MODEL);
    let symbols = model.symbols().unwrap();
    assert!(symbols.is_entity("Address"));
    assert!(symbols.is_enum("CustomerStatus"));
    assert!(symbols.is_event("CustomerDeleted"));
    assert!(symbols.is_aggregate("Customer"));
    assert!(symbols.is_aggregate("CustomerAggregate"));
    assert!(!symbols.is_aggregate("OrderItem"));
    assert_eq!(symbols.lookup("CustomerPage"), Some(SymbolKind::Output));
    assert_eq!(symbols.lookup("Unknown"), None);
}

#[test]
fn test_post_process_twice_is_stable() {
    let mut model = model_from(ORDERS_MODEL);
    let before = model.clone();
    post_process(&mut model);
    assert_eq!(model, before);
}
