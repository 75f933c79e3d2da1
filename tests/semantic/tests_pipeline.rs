//! End-to-end pipeline: determinism, batches and syntax error tolerance.

use zdl::{Value, ZdlParser, parse_models};

use crate::helpers::model_helpers::model_from;
use crate::helpers::source_fixtures::*;

#[test]
fn test_same_source_same_model() {
    let parser = ZdlParser::new();
    let first = parser.parse_model(ORDERS_MODEL);
    let second = parser.parse_model(ORDERS_MODEL);
    assert_eq!(first, second);
    assert_eq!(first.to_value(), second.to_value());
}

#[test]
fn test_parse_models_keeps_source_order() {
    let parser = ZdlParser::new();
    let sources = [SIMPLE_ENTITY, ORDERS_MODEL, BROKEN_MODEL, ENUM_FIELD];
    let models = parse_models(&parser, &sources);

    assert_eq!(models.len(), sources.len());
    for (model, source) in models.iter().zip(sources) {
        assert_eq!(model, &parser.parse_model(source));
    }
    assert_eq!(models[2].problems().len(), 10);
}

#[test]
fn test_parse_models_empty_batch() {
    let sources: Vec<String> = Vec::new();
    assert!(parse_models(&ZdlParser::new(), &sources).is_empty());
}

#[test]
fn test_syntax_errors_do_not_stop_modeling() {
    let (model, errors) = ZdlParser::new().parse_model_with_errors(SYNTAX_ERRORS);
    assert!(!errors.is_empty());
    assert!(model.get("entities.Broken.fields.name").is_some());
    assert_eq!(model.get_str("entities.Valid.fields.code.type"), Some("String"));
    assert!(
        model
            .get("entities.Valid.fields.code.validations.required")
            .is_some()
    );
    assert!(model.problems().is_empty());
}

#[test]
fn test_to_value_materializes_locations_and_problems() {
    let value = model_from(SERVICE_WITHOUT_AGGREGATE).to_value();
    let span = value
        .get("locations")
        .and_then(|l| l.get("services.OrderService.aggregates"))
        .and_then(Value::as_list)
        .unwrap();
    assert_eq!(span.len(), 6);

    let problems = value.get("problems").and_then(Value::as_list).unwrap();
    assert_eq!(problems.len(), 1);
    assert_eq!(
        problems[0].get_str("message"),
        Some("Order is not an aggregate")
    );
    assert_eq!(problems[0].get("location"), Some(&Value::List(span.clone())));
}

#[cfg(feature = "json")]
#[test]
fn test_to_json() {
    let json = model_from(SIMPLE_ENTITY).to_json().unwrap();
    assert!(json.contains("\"locations\""));
    assert!(json.contains("\"problems\""));
    assert!(json.contains("\"customerId\""));
}
