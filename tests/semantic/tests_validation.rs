//! Reference validation and problem reporting.

use rstest::rstest;
use zdl::{ParseOptions, Validator, ZdlParser, codes};

use crate::helpers::model_helpers::{model_from, problems_of};
use crate::helpers::source_fixtures::*;

fn expected(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(path, value)| (path.to_string(), value.to_string()))
        .collect()
}

#[test]
fn test_valid_model_has_no_problems() {
    let model = model_from(ORDERS_MODEL);
    assert_eq!(problems_of(&model), expected(&[]));
}

#[test]
fn test_broken_model_problems_in_order() {
    let model = model_from(BROKEN_MODEL);
    assert_eq!(
        problems_of(&model),
        expected(&[
            ("apis.default.role", "server"),
            ("entities.Customer.fields.address.type", "Location"),
            ("inputs.Filter.fields.page.type", "Page"),
            ("events.Created.fields.payload.type", "Filter"),
            ("aggregates.CustomerAggregate.aggregateRoot", "Phantom"),
            (
                "aggregates.CustomerAggregate.commands.register.withEvents.0",
                "Missing"
            ),
            ("services.CustomerService.aggregates", "Customer"),
            ("services.CustomerService.methods.find.parameter", "Ghost"),
            ("services.CustomerService.methods.find.returnType", "Filter"),
            ("relationships.OneToOne.OneToOne_Customer_Ghost.to", "Ghost"),
        ])
    );
}

#[rstest]
#[case(0, codes::INVALID_API_ROLE, "server is not a valid API role [provider|client]")]
#[case(1, codes::INVALID_FIELD_TYPE, "Location is not a valid type")]
#[case(4, codes::INVALID_AGGREGATE_ROOT, "Phantom is not an entity")]
#[case(5, codes::NOT_AN_EVENT, "Missing is not an event")]
#[case(6, codes::NOT_AN_AGGREGATE, "Customer is not an aggregate")]
#[case(7, codes::INVALID_PARAMETER, "Ghost is not an entity or input")]
#[case(8, codes::INVALID_RETURN_TYPE, "Filter is not an entity or output")]
#[case(9, codes::INVALID_RELATIONSHIP_ENTITY, "Ghost is not a valid entity")]
fn test_problem_codes_and_messages(
    #[case] index: usize,
    #[case] code: &str,
    #[case] message: &str,
) {
    let model = model_from(BROKEN_MODEL);
    let problem = &model.problems()[index];
    assert_eq!(problem.code, code);
    assert_eq!(problem.message, message);
}

#[test]
fn test_every_problem_has_a_location() {
    let model = model_from(BROKEN_MODEL);
    for problem in model.problems() {
        assert_eq!(
            problem.location,
            model.location(&problem.path),
            "{}",
            problem.path
        );
        assert!(problem.location.is_some(), "{} has no location", problem.path);
    }
}

#[test]
fn test_service_aggregate_must_be_aggregate() {
    let model = model_from(SERVICE_WITHOUT_AGGREGATE);
    assert_eq!(
        problems_of(&model),
        expected(&[("services.OrderService.aggregates", "Order")])
    );
}

#[test]
fn test_unknown_event_in_alternatives() {
    let model = model_from(SERVICE_WITH_UNKNOWN_EVENT);
    assert_eq!(
        problems_of(&model),
        expected(&[(
            "services.OrderService.methods.placeOrder.withEvents.0.1",
            "EventB"
        )])
    );
}

#[test]
fn test_validate_again_replaces_problems() {
    let mut model = model_from(BROKEN_MODEL);
    let before = model.problems().to_vec();
    let validator = Validator::new(ParseOptions::default());
    validator.validate(&mut model);
    validator.validate(&mut model);
    assert_eq!(model.problems(), before.as_slice());
}

#[test]
fn test_extra_field_types() {
    let source = "entity Payment { amount Money currency String }";
    assert_eq!(
        problems_of(&model_from(source)),
        expected(&[("entities.Payment.fields.amount.type", "Money")])
    );

    let model = ZdlParser::new()
        .with_extra_field_types(["Money"])
        .parse_model(source);
    assert!(model.problems().is_empty());
}

#[test]
fn test_standard_field_types_replaced() {
    let source = "entity Payment { amount Money currency String }";
    let model = ZdlParser::new()
        .with_standard_field_types(["Money"])
        .parse_model(source);
    assert_eq!(
        problems_of(&model),
        expected(&[("entities.Payment.fields.currency.type", "String")])
    );
}

#[rstest]
#[case("input Filter { owner Customer }")]
#[case("input Filter { other Query }\ninput Query { q String }")]
#[case("output Page { query Filter }\ninput Filter { q String }")]
#[case("output Page { next Page }")]
#[case("event Created { cause Updated }\nevent Updated { id Long }")]
fn test_allowed_field_references(#[case] declarations: &str) {
    let model = model_from(&format!("entity Customer {{ }}\n{declarations}"));
    assert_eq!(problems_of(&model), expected(&[]));
}

#[rstest]
#[case("entity Order { filter Filter }\ninput Filter { q String }", "entities.Order.fields.filter.type")]
#[case("input Filter { page Page }\noutput Page { n Long }", "inputs.Filter.fields.page.type")]
#[case("entity Order { created Created }\nevent Created { id Long }", "entities.Order.fields.created.type")]
fn test_rejected_field_references(#[case] source: &str, #[case] path: &str) {
    let model = model_from(source);
    let paths: Vec<_> = problems_of(&model).into_iter().map(|(p, _)| p).collect();
    assert_eq!(paths, vec![path.to_string()]);
}

#[test]
fn test_self_relationship_is_valid() {
    let model = model_from("entity A { }\nrelationship ManyToOne {\n    A{b} to A\n}");
    assert!(model.problems().is_empty());
}
