//! Derived names on declarations and a pluggable name transform.

use rstest::rstest;
use zdl::{Inflector, NameTransform, ZdlParser};

use crate::helpers::model_helpers::model_from;
use crate::helpers::source_fixtures::LEGACY_SERVICE;

#[rstest]
#[case("Customer", "customer", "Customers", "customers", "customer", "customers", "customer")]
#[case("OrderItem", "orderItem", "OrderItems", "orderItems", "order-item", "order-items", "order_item")]
#[case("Address", "address", "Addresses", "addresses", "address", "addresses", "address")]
#[case("Category", "category", "Categories", "categories", "category", "categories", "category")]
#[case("OrderV2", "orderV2", "OrderV2s", "orderV2s", "order-v2", "order-v2s", "order_v2")]
#[case("Address2", "address2", "Address2s", "address2s", "address2", "address2s", "address2")]
#[case("HTTPClient", "hTTPClient", "HTTPClients", "hTTPClients", "http-client", "http-clients", "http_client")]
fn test_entity_derived_names(
    #[case] name: &str,
    #[case] instance: &str,
    #[case] class_plural: &str,
    #[case] instance_plural: &str,
    #[case] kebab: &str,
    #[case] kebab_plural: &str,
    #[case] table: &str,
) {
    let model = model_from(&format!("entity {name} {{ }}"));
    let path = format!("entities.{name}");
    assert_eq!(model.get_str(&format!("{path}.className")), Some(name));
    assert_eq!(model.get_str(&format!("{path}.instanceName")), Some(instance));
    assert_eq!(model.get_str(&format!("{path}.classNamePlural")), Some(class_plural));
    assert_eq!(
        model.get_str(&format!("{path}.instanceNamePlural")),
        Some(instance_plural)
    );
    assert_eq!(model.get_str(&format!("{path}.kebabCase")), Some(kebab));
    assert_eq!(model.get_str(&format!("{path}.kebabCasePlural")), Some(kebab_plural));
    assert_eq!(model.get_str(&format!("{path}.tableName")), Some(table));
}

#[test]
fn test_explicit_table_name_wins() {
    let model = model_from("entity OrderItem(items) { }");
    assert_eq!(model.get_str("entities.OrderItem.tableName"), Some("items"));
    assert_eq!(model.get_str("entities.OrderItem.kebabCase"), Some("order-item"));
}

/// Pluralizes by appending `List`, casing like the default.
struct ListSuffix;

impl NameTransform for ListSuffix {
    fn pluralize(&self, word: &str) -> String {
        format!("{}List", word)
    }

    fn class_name(&self, name: &str) -> String {
        Inflector.class_name(name)
    }

    fn instance_name(&self, name: &str) -> String {
        Inflector.instance_name(name)
    }

    fn kebab_case(&self, name: &str) -> String {
        Inflector.kebab_case(name)
    }

    fn snake_case(&self, name: &str) -> String {
        Inflector.snake_case(name)
    }
}

#[test]
fn test_custom_name_transform() {
    let parser = ZdlParser::new().with_name_transform(ListSuffix);
    let (model, errors) = parser.parse_model_with_errors(LEGACY_SERVICE);
    assert!(errors.is_empty(), "Parse errors: {:?}", errors);

    assert_eq!(
        model.get_str("entities.Customer.classNamePlural"),
        Some("CustomerList")
    );
    assert!(
        model
            .get("services.LegacyService.methods.listCustomerList")
            .is_some()
    );
    assert_eq!(model.get("services.LegacyService.methods.listCustomers"), None);
}
