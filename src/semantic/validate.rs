//! Cross-reference checks over a post-processed document.
//!
//! Every check reads the document and the [`SymbolTable`] and appends
//! [`Problem`](crate::model::Problem)s; nothing here aborts. Checks run in a
//! fixed order so the problem list is deterministic:
//!
//! 1. API roles
//! 2. field types of entities, inputs, outputs and events
//! 3. aggregate roots and aggregate commands
//! 4. service aggregates and service methods
//! 5. relationship endpoints

use tracing::debug;

use super::symbols::SymbolTable;
use crate::config::ParseOptions;
use crate::model::{Map, Value, ZdlModel, codes};

const API_ROLES: &[&str] = &["provider", "client"];

/// A problem found while the document is borrowed.
struct Finding {
    code: &'static str,
    path: String,
    value: String,
    template: &'static str,
}

/// Validates references in a [`ZdlModel`].
#[derive(Debug, Clone, Default)]
pub struct Validator {
    options: ParseOptions,
}

impl Validator {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Replace the problems of `model` with the result of every check.
    ///
    /// Uses the symbol table left by post-processing, or collects one when
    /// the model has not been post-processed.
    pub fn validate(&self, model: &mut ZdlModel) {
        model.clear_problems();

        let collected;
        let symbols = match model.symbols() {
            Some(symbols) => symbols,
            None => {
                collected = SymbolTable::from_model(model);
                &collected
            }
        };

        let mut checks = Checks {
            options: &self.options,
            symbols,
            findings: Vec::new(),
        };
        checks.apis(model.apis());
        for collection in ["entities", "inputs", "outputs", "events"] {
            checks.fields(collection, model.collection(collection));
        }
        checks.aggregates(model.aggregates());
        checks.services(model.services());
        checks.relationships(model.relationships());

        let findings = checks.findings;
        debug!("[VALIDATE] {} problems", findings.len());
        for finding in findings {
            model.add_problem(
                finding.code,
                &finding.path,
                Some(&finding.value),
                finding.template,
            );
        }
    }
}

struct Checks<'a> {
    options: &'a ParseOptions,
    symbols: &'a SymbolTable,
    findings: Vec<Finding>,
}

impl Checks<'_> {
    fn report(&mut self, code: &'static str, path: String, value: &str, template: &'static str) {
        debug!("[VALIDATE] {} {}: {}", code, path, value);
        self.findings.push(Finding {
            code,
            path,
            value: value.to_string(),
            template,
        });
    }

    fn apis(&mut self, apis: &Map) {
        for (name, api) in apis {
            let role = api.get_str("role").unwrap_or_default();
            if !API_ROLES.contains(&role) {
                self.report(
                    codes::INVALID_API_ROLE,
                    format!("apis.{}.role", name),
                    role,
                    "%s is not a valid API role [provider|client]",
                );
            }
        }
    }

    fn is_valid_field_type(&self, collection: &str, type_name: &str) -> bool {
        let symbols = self.symbols;
        if self.options.is_standard_type(type_name)
            || symbols.is_entity(type_name)
            || symbols.is_enum(type_name)
        {
            return true;
        }
        match collection {
            "inputs" => symbols.is_input(type_name),
            "outputs" => symbols.is_input(type_name) || symbols.is_output(type_name),
            "events" => symbols.is_event(type_name),
            _ => false,
        }
    }

    fn fields(&mut self, collection: &str, declarations: &Map) {
        for (decl_name, declaration) in declarations {
            let Some(fields) = declaration.get("fields").and_then(Value::as_map) else {
                continue;
            };
            for (field_name, field) in fields {
                let Some(type_name) = field.get_str("type") else {
                    continue;
                };
                if !self.is_valid_field_type(collection, type_name) {
                    self.report(
                        codes::INVALID_FIELD_TYPE,
                        format!("{}.{}.fields.{}.type", collection, decl_name, field_name),
                        type_name,
                        "%s is not a valid type",
                    );
                }
            }
        }
    }

    fn aggregates(&mut self, aggregates: &Map) {
        for (name, aggregate) in aggregates {
            let root = aggregate.get_str("aggregateRoot").unwrap_or_default();
            if !self.symbols.is_entity(root) {
                self.report(
                    codes::INVALID_AGGREGATE_ROOT,
                    format!("aggregates.{}.aggregateRoot", name),
                    root,
                    "%s is not an entity",
                );
            }
            let commands = aggregate.get("commands").and_then(Value::as_map);
            for (command_name, command) in commands.into_iter().flatten() {
                let path = format!("aggregates.{}.commands.{}", name, command_name);
                self.parameter(&path, command);
                self.with_events(&path, command);
            }
        }
    }

    fn services(&mut self, services: &Map) {
        for (name, service) in services {
            let aggregates = service.get("aggregates").and_then(Value::as_list);
            for aggregate in aggregates.into_iter().flatten().filter_map(Value::as_str) {
                if !aggregate.is_empty() && !self.symbols.is_aggregate(aggregate) {
                    self.report(
                        codes::NOT_AN_AGGREGATE,
                        format!("services.{}.aggregates", name),
                        aggregate,
                        "%s is not an aggregate",
                    );
                }
            }

            let methods = service.get("methods").and_then(Value::as_map);
            for (method_name, method) in methods.into_iter().flatten() {
                let path = format!("services.{}.methods.{}", name, method_name);
                self.parameter(&path, method);
                if let Some(return_type) = method.get_str("returnType")
                    && !self.symbols.is_entity(return_type)
                    && !self.symbols.is_output(return_type)
                {
                    self.report(
                        codes::INVALID_RETURN_TYPE,
                        format!("{}.returnType", path),
                        return_type,
                        "%s is not an entity or output",
                    );
                }
                self.with_events(&path, method);
            }
        }
    }

    fn parameter(&mut self, path: &str, method: &Value) {
        if let Some(parameter) = method.get_str("parameter")
            && !self.symbols.is_entity(parameter)
            && !self.symbols.is_input(parameter)
        {
            self.report(
                codes::INVALID_PARAMETER,
                format!("{}.parameter", path),
                parameter,
                "%s is not an entity or input",
            );
        }
    }

    fn with_events(&mut self, path: &str, method: &Value) {
        let events = method.get("withEvents").and_then(Value::as_list);
        for (i, event) in events.into_iter().flatten().enumerate() {
            match event {
                Value::List(group) => {
                    for (j, inner) in group.iter().enumerate() {
                        self.event(format!("{}.withEvents.{}.{}", path, i, j), inner);
                    }
                }
                single => self.event(format!("{}.withEvents.{}", path, i), single),
            }
        }
    }

    fn event(&mut self, path: String, event: &Value) {
        let name = event.as_str().unwrap_or_default();
        if !self.symbols.is_event(name) {
            self.report(codes::NOT_AN_EVENT, path, name, "%s is not an event");
        }
    }

    fn relationships(&mut self, relationships: &Map) {
        for (relationship_type, group) in relationships {
            for (name, relationship) in group.as_map().into_iter().flatten() {
                for side in ["from", "to"] {
                    let Some(entity) = relationship.get_str(side) else {
                        continue;
                    };
                    if !self.symbols.is_entity(entity) {
                        self.report(
                            codes::INVALID_RELATIONSHIP_ENTITY,
                            format!("relationships.{}.{}.{}", relationship_type, name, side),
                            entity,
                            "%s is not a valid entity",
                        );
                    }
                }
            }
        }
    }
}
