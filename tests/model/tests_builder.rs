//! Document contents produced by the builder.

use zdl::Value;

use crate::helpers::model_helpers::model_from;
use crate::helpers::source_fixtures::*;

// ============================================================================
// Root sections
// ============================================================================

#[test]
fn test_root_keys_always_present() {
    let model = model_from("");
    for key in [
        "imports",
        "config",
        "apis",
        "plugins",
        "policies",
        "aggregates",
        "entities",
        "enums",
        "relationships",
        "services",
        "inputs",
        "outputs",
        "events",
        "constants",
    ] {
        assert!(
            model.document().get(key).is_some(),
            "missing root key {}",
            key
        );
    }
}

#[test]
fn test_globals() {
    let model = model_from(ORDERS_MODEL);
    assert_eq!(model.get_str("javadoc"), Some("Orders domain"));
    assert_eq!(model.get_str("constants.MAX_ITEMS"), Some("100"));
    assert_eq!(model.imports(), &[Value::from("common.zdl")]);
    assert_eq!(model.get_str("config.title"), Some("Orders"));
    assert_eq!(model.get_str("config.persistence"), Some("mongodb"));
    assert_eq!(model.get("policies.retention.value"), Some(&Value::Int(30)));
    assert_eq!(model.get_str("policies.retention.aggregate"), Some("Order"));
}

#[test]
fn test_apis_and_plugins() {
    let model = model_from(ORDERS_MODEL);
    assert_eq!(model.get_str("apis.default.type"), Some("openapi"));
    assert_eq!(model.get_str("apis.default.role"), Some("provider"));
    assert_eq!(model.get("apis.default.options.rest"), Some(&Value::Bool(true)));
    assert_eq!(model.get_str("apis.default.config.uri"), Some("openapi.yml"));
    assert_eq!(model.get_str("apis.payments.role"), Some("client"));

    assert_eq!(
        model.get_str("plugins.BackendPlugin.javadoc"),
        Some("Generates the backend")
    );
    assert_eq!(
        model.get("plugins.BackendPlugin.options.inherit"),
        Some(&Value::Bool(false))
    );
    assert_eq!(
        model.get_str("plugins.BackendPlugin.config.targetFolder"),
        Some("backend")
    );
    assert!(model.get("plugins.BackendPlugin.cliOptions").is_some());
    assert_eq!(
        model.get("plugins.BackendPlugin.disabled"),
        Some(&Value::Bool(false))
    );
    assert_eq!(model.get("plugins.DocsPlugin.disabled"), Some(&Value::Bool(true)));
    assert_eq!(
        model.get("plugins.DocsPlugin.options.inherit"),
        Some(&Value::Bool(true))
    );
}

// ============================================================================
// Declarations and fields
// ============================================================================

#[test]
fn test_entity_node() {
    let model = model_from(ORDERS_MODEL);
    let customer = "entities.Customer";
    assert_eq!(model.get_str(&format!("{customer}.type")), Some("entities"));
    assert_eq!(model.get_str(&format!("{customer}.tableName")), Some("customer_table"));
    assert_eq!(model.get_str(&format!("{customer}.javadoc")), Some("Customer entity"));
    assert_eq!(
        model.get(&format!("{customer}.options.aggregate")),
        Some(&Value::Bool(true))
    );
    assert_eq!(model.get_str(&format!("{customer}.classNamePlural")), Some("Customers"));

    let email = "entities.Customer.fields.email";
    assert_eq!(model.get_str(&format!("{email}.javadoc")), Some("the email"));
    assert_eq!(model.get_str(&format!("{email}.comment")), Some("the email"));
    assert_eq!(
        model.get_str(&format!("{email}.validations.maxlength.value")),
        Some("100")
    );
    assert_eq!(
        model.get_str(&format!("{email}.validations.pattern.value")),
        Some("^.+@.+$")
    );
    assert_eq!(
        model.get_str("entities.Customer.fields.status.initialValue"),
        Some("CustomerStatus.ACTIVE")
    );
    assert_eq!(
        model.get("entities.Order.fields.items.isArray"),
        Some(&Value::Bool(true))
    );
}

#[test]
fn test_fields_keep_declaration_order() {
    let model = model_from(ORDERS_MODEL);
    let fields = model
        .get("entities.Order.fields")
        .and_then(Value::as_map)
        .unwrap();
    let names: Vec<_> = fields.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["orderNumber", "total", "items", "customer"]);
}

#[test]
fn test_nested_entity() {
    let model = model_from(NESTED_ENTITY);
    let names: Vec<_> = model.entities().keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Customer", "Address"]);

    assert_eq!(
        model.get("entities.Address.options.embedded"),
        Some(&Value::Bool(true))
    );
    assert_eq!(model.get("entities.Address.options.json"), Some(&Value::Bool(true)));
    assert_eq!(model.get_str("entities.Address.javadoc"), Some("home address"));
    assert_eq!(
        model.get_str("entities.Address.tableName"),
        Some("customer_address")
    );
    assert!(
        model
            .get("entities.Address.fields.street.validations.required")
            .is_some()
    );

    let owner = "entities.Customer.fields.address";
    assert_eq!(model.get_str(&format!("{owner}.type")), Some("Address"));
    assert!(model.get(&format!("{owner}.validations.required")).is_some());
    assert!(model.get(&format!("{owner}.validations.unique")).is_some());
}

#[test]
fn test_enum_node() {
    let model = model_from(ORDERS_MODEL);
    assert_eq!(model.get_str("enums.CustomerStatus.type"), Some("enums"));
    assert_eq!(model.get("enums.CustomerStatus.hasValue"), Some(&Value::Bool(true)));
    assert_eq!(
        model.get("enums.CustomerStatus.values.ACTIVE.value"),
        Some(&Value::Int(1))
    );
    assert_eq!(
        model.get_str("enums.CustomerStatus.values.INACTIVE.javadoc"),
        Some("no longer active")
    );

    let plain = model_from(ENUM_FIELD);
    assert_eq!(plain.get("enums.OrderStatus.hasValue"), Some(&Value::Bool(false)));
}

#[test]
fn test_inputs_outputs_events() {
    let model = model_from(ORDERS_MODEL);
    assert_eq!(model.get_str("inputs.CustomerFilter.type"), Some("inputs"));
    assert_eq!(model.get_str("outputs.CustomerPage.type"), Some("outputs"));
    assert_eq!(model.get_str("events.CustomerCreated.type"), Some("events"));
    assert_eq!(
        model.get_str("events.CustomerCreated.kebabCase"),
        Some("customer-created")
    );
}

// ============================================================================
// Relationships
// ============================================================================

#[test]
fn test_relationship_with_injected_field() {
    let model = model_from(RELATIONSHIP_WITH_FIELD);
    let path = "relationships.ManyToOne.ManyToOne_Address{customer}_Customer";
    assert_eq!(model.get_str(&format!("{path}.type")), Some("ManyToOne"));
    assert_eq!(model.get_str(&format!("{path}.from")), Some("Address"));
    assert_eq!(model.get_str(&format!("{path}.to")), Some("Customer"));
    assert_eq!(
        model.get_str(&format!("{path}.injectedFieldInFrom")),
        Some("customer")
    );
    assert_eq!(model.get(&format!("{path}.injectedFieldInTo")), None);
    assert_eq!(
        model.get(&format!("{path}.isInjectedFieldInFromRequired")),
        Some(&Value::Bool(false))
    );
}

#[test]
fn test_relationship_options_and_validations() {
    let model = model_from(ORDERS_MODEL);
    let path = "relationships.OneToMany.OneToMany_Customer{orders}_Order{customer}";
    assert_eq!(
        model.get_str(&format!("{path}.commentInFrom")),
        Some("orders of a customer")
    );
    assert_eq!(
        model.get_str(&format!("{path}.injectedFieldInFromDescription")),
        Some("orderNumber")
    );
    assert_eq!(
        model.get(&format!("{path}.toOptions.eager")),
        Some(&Value::Bool(true))
    );
    assert_eq!(
        model.get(&format!("{path}.isInjectedFieldInToRequired")),
        Some(&Value::Bool(true))
    );
    assert_eq!(
        model.get(&format!("{path}.toValidations.required.value")),
        Some(&Value::Bool(true))
    );
}

// ============================================================================
// Services and aggregates
// ============================================================================

#[test]
fn test_service_methods() {
    let model = model_from(ORDERS_MODEL);
    let service = "services.CustomerService";
    assert_eq!(model.get_str(&format!("{service}.options.rest")), Some("/customers"));
    assert_eq!(model.get_all(&format!("{service}.aggregates.*")).len(), 2);

    let get = format!("{service}.methods.getCustomer");
    assert_eq!(model.get_str(&format!("{get}.paramId")), Some("id"));
    assert_eq!(model.get(&format!("{get}.naturalId")), None);
    assert_eq!(model.get(&format!("{get}.parameter")), None);
    assert_eq!(
        model.get(&format!("{get}.returnTypeIsOptional")),
        Some(&Value::Bool(true))
    );
    assert_eq!(model.get_str(&format!("{get}.options.get")), Some("/{id}"));

    let search = format!("{service}.methods.searchCustomers");
    assert_eq!(model.get_str(&format!("{search}.parameter")), Some("CustomerFilter"));
    assert_eq!(
        model.get(&format!("{search}.returnTypeIsArray")),
        Some(&Value::Bool(true))
    );

    let delete = format!("{service}.methods.deleteCustomer");
    assert_eq!(model.get(&format!("{delete}.returnType")), None);
    assert_eq!(
        model.get(&format!("{delete}.withEvents.0")),
        Some(&Value::List(vec![
            Value::from("CustomerDeleted"),
            Value::from("CustomerCreated")
        ]))
    );
}

#[test]
fn test_legacy_service_crud_methods() {
    let model = model_from(LEGACY_SERVICE);
    let service = "services.LegacyService";
    assert_eq!(model.get(&format!("{service}.isLegacy")), Some(&Value::Bool(true)));
    assert_eq!(model.get(&format!("{service}.options.rest")), Some(&Value::Bool(true)));

    let methods = model
        .get(&format!("{service}.methods"))
        .and_then(Value::as_map)
        .unwrap();
    let names: Vec<_> = methods.keys().map(String::as_str).collect();
    assert_eq!(
        names,
        vec![
            "createCustomer",
            "updateCustomer",
            "getCustomer",
            "listCustomers",
            "deleteCustomer",
            "createOrderItem",
            "updateOrderItem",
            "getOrderItem",
            "listOrderItems",
            "deleteOrderItem",
        ]
    );
    assert_eq!(
        model.get_str(&format!("{service}.methods.deleteOrderItem.options.delete")),
        Some("/orderitems/{orderItemId}")
    );
    assert_eq!(
        model.get(&format!("{service}.methods.listCustomers.paginated")),
        Some(&Value::Bool(true))
    );
    assert!(model.problems().is_empty());
}

#[test]
fn test_aggregate_node() {
    let model = model_from(ORDERS_MODEL);
    let aggregate = "aggregates.CustomerAggregate";
    assert_eq!(model.get_str(&format!("{aggregate}.aggregateRoot")), Some("Customer"));
    let register = format!("{aggregate}.commands.register");
    assert_eq!(
        model.get_str(&format!("{register}.aggregateName")),
        Some("CustomerAggregate")
    );
    assert_eq!(model.get_str(&format!("{register}.parameter")), Some("Customer"));
    assert_eq!(
        model.get_str(&format!("{register}.withEvents.0")),
        Some("CustomerCreated")
    );
}

#[test]
fn test_duplicate_declaration_last_write_wins() {
    let model = model_from("entity A { x String }\nentity B { }\nentity A { y Long }");
    let names: Vec<_> = model.entities().keys().map(String::as_str).collect();
    assert_eq!(names, vec!["A", "B"]);
    assert!(model.get("entities.A.fields.y").is_some());
    assert_eq!(model.get("entities.A.fields.x"), None);
}
