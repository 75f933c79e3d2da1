//! Location recording and innermost-path resolution.

use rstest::rstest;

use crate::helpers::model_helpers::{model_from, position_of};
use crate::helpers::source_fixtures::*;

#[test]
fn test_resolve_inside_validation() {
    let model = model_from(SIMPLE_ENTITY);
    let (line, column) = position_of(SIMPLE_ENTITY, "required");
    assert_eq!(
        model.resolve_location(line, column + 2),
        Some("entities.Customer.fields.customerId.validations.required")
    );
    assert!(
        model
            .get("entities.Customer.fields.customerId.validations.required")
            .is_some()
    );
}

#[test]
fn test_single_token_span_end_column() {
    let model = model_from(SIMPLE_ENTITY);
    let span = model.location("entities.Customer.fields.customerId.name").unwrap();
    assert_eq!(span.start.line, 1);
    assert_eq!(span.start.column, 18);
    assert_eq!(span.end.column, 18 + "customerId".len());
}

#[test]
fn test_resolve_outside_any_span() {
    let model = model_from("\n\nentity A { }");
    assert_eq!(model.resolve_location(1, 0), None);
    assert_eq!(model.resolve_location(3, 0), Some("entities.A"));
}

#[rstest]
#[case("orderNumber String", "entities.Order.fields.orderNumber.name")]
#[case("BigDecimal\n    items", "entities.Order.fields.total.type")]
#[case("maxlength(100)", "entities.Customer.fields.email.validations.maxlength")]
#[case("openapi(provider)", "apis.default.type")]
#[case("provider)", "apis.default.role")]
#[case("inherit: false", "plugins.BackendPlugin.options")]
#[case("false)", "plugins.BackendPlugin.options.inherit")]
#[case("CustomerAggregate(", "aggregates.CustomerAggregate.name")]
#[case("Customer) {\n    register", "aggregates.CustomerAggregate.aggregateRoot")]
#[case("CustomerFilter) CustomerPage", "services.CustomerService.methods.searchCustomers.parameter")]
#[case("CustomerPage[]", "services.CustomerService.methods.searchCustomers.returnType")]
#[case("CustomerDeleted |", "services.CustomerService.methods.deleteCustomer.withEvents.0.0")]
#[case("LegacyOrders", "services.LegacyOrders.name")]
#[case("orders(", "relationships.OneToMany.OneToMany_Customer{orders}_Order{customer}.injectedFieldInFrom")]
#[case("Address {", "entities.Address.name")]
fn test_resolve_paths(#[case] needle: &str, #[case] expected: &str) {
    let model = model_from(ORDERS_MODEL);
    let (line, column) = position_of(ORDERS_MODEL, needle);
    assert_eq!(model.resolve_location(line, column + 1), Some(expected));
}

#[test]
fn test_nested_entity_spans() {
    let model = model_from(NESTED_ENTITY);
    let nested = model.location("entities.Address").unwrap();
    let type_span = model.location("entities.Customer.fields.address.type").unwrap();
    let body = model.location("entities.Address.body").unwrap();
    assert_eq!(nested.start, type_span.start);
    assert_eq!(nested.end, body.end);
    assert!(model.location("entities.Address.tableName").is_some());
    assert!(
        model
            .location("entities.Customer.fields.address.validations.unique")
            .is_some()
    );
}

#[test]
fn test_with_events_aliases() {
    let model = model_from(ORDERS_MODEL);
    let method = "services.CustomerService.methods.deleteCustomer";
    let by_index = model.location(&format!("{method}.withEvents.0.1")).unwrap();
    let by_name = model
        .location(&format!("{method}.withEvents.CustomerCreated"))
        .unwrap();
    assert_eq!(by_index, by_name);
    assert!(model.location(&format!("{method}.withEvents")).is_some());
}

#[test]
fn test_every_span_resolves_to_itself_or_nested_path() {
    let model = model_from(ORDERS_MODEL);
    assert!(!model.locations().is_empty());

    for (path, span) in model.locations().iter() {
        for position in [span.start, span.end] {
            let resolved = model
                .resolve_location(position.line, position.column)
                .unwrap_or_else(|| panic!("{} does not resolve", path));
            let inner = model.location(resolved).unwrap();
            assert!(
                inner.range.start() >= span.range.start() && inner.range.end() <= span.range.end(),
                "{} at {:?} resolved to {} outside it",
                path,
                position,
                resolved
            );
        }
    }
}
