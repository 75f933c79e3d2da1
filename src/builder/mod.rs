//! Syntax tree → semantic document.
//!
//! [`ModelBuilder`] implements [`ZdlListener`]: [`walk`] delivers flat
//! enter/exit events and the builder keeps a [`ContextStack`] of the nodes
//! under construction. While building it records a [`Span`] for every
//! logical path it creates.
//!
//! ## Architecture
//!
//! ```text
//! enter_entity  → push Frame { path: "entities.A", attach: Root }
//!   enter_field → push Frame { path: "entities.A.fields.x", attach: Parent }
//!   exit_field  → pop, store into entities.A.fields
//! exit_entity   → pop, store into entities
//! ```
//!
//! The key of every scoped node is reserved on enter, so an entity always
//! precedes the nested entities declared inside it.

mod coerce;
mod context;
mod crud;

pub use coerce::{LiteralError, complex_value, javadoc_text, literal_value, parse_literal, unquote};
pub use context::{Attach, ContextStack, Frame, FrameKind};
pub use crud::crud_methods;

use std::sync::Arc;

use tracing::trace;

use crate::base::{LineIndex, Span};
use crate::model::{Map, Value, ZdlModel};
use crate::names::NameTransform;
use crate::parser::{
    Aggregate, Annotation, Api, AstNode, ConfigOption, Declaration, Documented, Enum, EnumValue,
    EventItem, Field, GlobalJavadoc, Import, LegacyConstant, LegacyService, Method, Name,
    NestedField, Plugin, PluginCliOption, Policy, Relationship, RelationshipEnd, Service,
    ServiceAggregates, SyntaxKind, SyntaxNode, SyntaxToken, Validation, WithEvents, ZdlListener, walk,
};
use coerce::{any_javadoc_of, javadoc_of, literal_text, option_value};

/// Builds a [`ZdlModel`] from one syntax tree.
///
/// Single use: [`build`](Self::build) walks the tree and consumes the
/// builder.
pub struct ModelBuilder {
    names: Arc<dyn NameTransform>,
    line_index: LineIndex,
    model: ZdlModel,
    stack: ContextStack,
}

impl ModelBuilder {
    pub fn new(line_index: LineIndex, names: Arc<dyn NameTransform>) -> Self {
        Self {
            names,
            line_index,
            model: ZdlModel::new(),
            stack: ContextStack::new(),
        }
    }

    /// Walk `root` and return the finished document.
    pub fn build(mut self, root: &SyntaxNode) -> ZdlModel {
        walk(&mut self, root);
        self.finish()
    }

    /// Return the document. Every opened scope must have been closed.
    pub fn finish(self) -> ZdlModel {
        if let Some(frame) = self.stack.top() {
            panic!("unclosed {:?} `{}` at end of input", frame.kind, frame.path);
        }
        self.model
    }

    // ========================================================================
    // Spans
    // ========================================================================

    fn node_span(&self, node: &SyntaxNode) -> Option<Span> {
        let range = node.text_range();
        (!range.is_empty()).then(|| self.line_index.span(range))
    }

    fn span_of(&self, node: &impl AstNode) -> Option<Span> {
        self.node_span(node.syntax())
    }

    fn token_span(&self, token: &SyntaxToken) -> Span {
        self.line_index.span(token.text_range())
    }

    fn record(&mut self, path: impl Into<String>, span: Option<Span>) {
        if let Some(span) = span {
            self.model.set_location(path, span);
        }
    }

    // ========================================================================
    // Frames
    // ========================================================================

    fn push(&mut self, frame: Frame) {
        match &frame.attach {
            Attach::Root { collection, name } => {
                self.model
                    .collection_mut(collection)
                    .entry(name.clone())
                    .or_insert(Value::Null);
            }
            Attach::Parent { key, name } => {
                if let Some(parent) = self.stack.top_mut() {
                    parent.map_mut(key).entry(name.clone()).or_insert(Value::Null);
                }
            }
        }
        trace!("[BUILDER] push {:?} {}", frame.kind, frame.path);
        self.stack.push(frame);
    }

    fn pop(&mut self, kind: FrameKind) {
        let frame = self.stack.pop(kind);
        trace!("[BUILDER] pop {:?} {}", frame.kind, frame.path);
        match frame.attach {
            Attach::Root { collection, name } => {
                self.model
                    .collection_mut(&collection)
                    .insert(name, Value::Map(frame.node));
            }
            Attach::Parent { key, name } => match self.stack.top_mut() {
                Some(parent) => {
                    parent.map_mut(key).insert(name, Value::Map(frame.node));
                }
                None => panic!("{:?} `{}` has no parent frame", frame.kind, frame.path),
            },
        }
    }

    /// Path of the innermost open frame of one of `kinds`.
    fn owner_path(&self, kinds: &[FrameKind], what: &str) -> String {
        match self.stack.top() {
            Some(frame) if kinds.contains(&frame.kind) => frame.path.clone(),
            Some(frame) => panic!("{} inside {:?} `{}`", what, frame.kind, frame.path),
            None => panic!("{} outside of any scope", what),
        }
    }

    // ========================================================================
    // Node construction
    // ========================================================================

    fn declaration_node(
        &self,
        name: &str,
        collection: &str,
        javadoc: Option<String>,
        table_name: Option<String>,
    ) -> Map {
        let derived = self.names.derive(name);
        let mut node = Map::new();
        node.insert("name".to_string(), Value::from(name));
        node.insert("type".to_string(), Value::from(collection));
        node.insert("className".to_string(), Value::from(derived.class_name));
        node.insert(
            "tableName".to_string(),
            Value::from(table_name.unwrap_or(derived.snake_case)),
        );
        node.insert("instanceName".to_string(), Value::from(derived.instance_name));
        node.insert("classNamePlural".to_string(), Value::from(derived.class_name_plural));
        node.insert(
            "instanceNamePlural".to_string(),
            Value::from(derived.instance_name_plural),
        );
        node.insert("kebabCase".to_string(), Value::from(derived.kebab_case));
        node.insert("kebabCasePlural".to_string(), Value::from(derived.kebab_case_plural));
        node.insert("javadoc".to_string(), Value::from(javadoc));
        node.insert("options".to_string(), Value::map());
        node.insert("optionsList".to_string(), Value::list());
        node.insert("fields".to_string(), Value::map());
        node
    }

    fn enter_declaration(&mut self, decl: &Declaration, collection: &'static str) {
        let name = name_text(decl.name());
        let path = format!("{}.{}", collection, name);
        trace!("[BUILDER] enter {} {}", collection, name);

        let table_name = decl.table_name().and_then(|t| t.text());
        let node = self.declaration_node(&name, collection, javadoc_of(decl), table_name);

        self.record(path.clone(), self.span_of(decl));
        self.record(format!("{}.name", path), decl.name().and_then(|n| self.span_of(&n)));
        self.record(
            format!("{}.tableName", path),
            decl.table_name().and_then(|t| self.span_of(&t)),
        );
        self.record(format!("{}.body", path), decl.body().and_then(|b| self.span_of(&b)));

        self.push(Frame::new(
            FrameKind::Declaration,
            path,
            node,
            Attach::Root {
                collection: collection.to_string(),
                name,
            },
        ));
    }

    fn validations(&mut self, path: &str, validations: impl Iterator<Item = Validation>) -> Map {
        let mut map = Map::new();
        for validation in validations {
            let Some(name) = validation.name() else { continue };
            let mut value = validation.value_text().unwrap_or_default();
            if name == "pattern" {
                value = unquote(&value);
            }
            let mut entry = Map::new();
            entry.insert("name".to_string(), Value::from(name.as_str()));
            entry.insert("value".to_string(), Value::from(value));
            self.record(
                format!("{}.validations.{}", path, name),
                self.span_of(&validation),
            );
            map.insert(name, Value::Map(entry));
        }
        map
    }

    fn with_events(&mut self, path: &str, with_events: Option<WithEvents>) -> Value {
        let Some(with_events) = with_events else {
            return Value::list();
        };
        let base = format!("{}.withEvents", path);
        self.record(base.clone(), self.span_of(&with_events));

        // Name aliases are recorded first so index paths win span ties
        let mut events = Vec::new();
        for (i, item) in with_events.items().enumerate() {
            let span = self.span_of(&item);
            match item {
                EventItem::Single(event) => {
                    let name = event.text().unwrap_or_default();
                    self.record(format!("{}.{}", base, name), span);
                    self.record(format!("{}.{}", base, i), span);
                    events.push(Value::from(name));
                }
                EventItem::Group(group) => {
                    self.record(format!("{}.{}", base, i), span);
                    let mut alternatives = Vec::new();
                    for (j, event) in group.events().enumerate() {
                        let name = event.text().unwrap_or_default();
                        let span = self.span_of(&event);
                        self.record(format!("{}.{}", base, name), span);
                        self.record(format!("{}.{}.{}", base, i, j), span);
                        alternatives.push(Value::from(name));
                    }
                    events.push(Value::List(alternatives));
                }
            }
        }
        Value::List(events)
    }

    fn service_aggregates(&self, aggregates: Option<ServiceAggregates>) -> Vec<String> {
        aggregates
            .map(|a| a.names().filter_map(|n| n.text()).collect())
            .unwrap_or_default()
    }

    fn relationship_side(&mut self, node: &mut Map, path: &str, side: &str, end: &RelationshipEnd) {
        let upper = if side == "from" { "From" } else { "To" };
        let entity = end.entity();
        let field = end.field();

        let mut options = Map::new();
        for annotation in end.annotations() {
            if let Some(name) = annotation.name() {
                options.insert(name, option_value(annotation.value()));
            }
        }

        let mut validations = Map::new();
        let mut required = false;
        let mut first_span: Option<Span> = None;
        let mut last_span: Option<Span> = None;
        for validation in field.iter().flat_map(|f| f.validations()) {
            let (name, value) = match validation.name().as_deref() {
                Some("required") => {
                    required = true;
                    ("required", Value::Bool(true))
                }
                Some("min" | "minlength") => (
                    "minlength",
                    Value::from(validation.value_text().unwrap_or_default()),
                ),
                Some("max" | "maxlength") => (
                    "maxlength",
                    Value::from(validation.value_text().unwrap_or_default()),
                ),
                _ => continue,
            };
            let span = self.span_of(&validation);
            first_span = first_span.or(span);
            last_span = span.or(last_span);
            self.record(format!("{}.{}Validations.{}", path, side, name), span);

            let mut entry = Map::new();
            entry.insert("name".to_string(), Value::from(name));
            entry.insert("value".to_string(), value);
            validations.insert(name.to_string(), Value::Map(entry));
        }
        if let (Some(first), Some(last)) = (first_span, last_span) {
            self.record(format!("{}.{}Validations", path, side), Some(first.cover(&last)));
        }

        self.record(format!("{}.{}", path, side), entity.as_ref().and_then(|e| self.span_of(e)));
        self.record(
            format!("{}.injectedFieldIn{}", path, upper),
            field.as_ref().and_then(|f| f.name()).and_then(|n| self.span_of(&n)),
        );

        node.insert(side.to_string(), Value::from(name_text(entity)));
        node.insert(format!("commentIn{}", upper), Value::from(javadoc_of(end)));
        node.insert(
            format!("injectedFieldIn{}", upper),
            Value::from(field.as_ref().and_then(|f| f.name()).and_then(|n| n.text())),
        );
        node.insert(format!("{}Options", side), Value::Map(options));
        node.insert(format!("{}Validations", side), Value::Map(validations));
        node.insert(
            format!("injectedFieldIn{}Description", upper),
            Value::from(field.as_ref().and_then(|f| f.description()).and_then(|n| n.text())),
        );
        node.insert(
            format!("isInjectedFieldIn{}Required", upper),
            Value::Bool(required),
        );
    }

    fn enter_method_like(&mut self, method: &Method, kind: FrameKind) {
        let (owner_kind, collection_key, owner_key) = match kind {
            FrameKind::Method => (FrameKind::Service, "methods", "serviceName"),
            _ => (FrameKind::Aggregate, "commands", "aggregateName"),
        };
        let owner_path = self.owner_path(&[owner_kind], collection_key);
        let name = name_text(method.name());
        let path = format!("{}.{}.{}", owner_path, collection_key, name);
        trace!("[BUILDER] enter {} {}", collection_key, path);

        let params = method.params();
        let parameter = params.as_ref().and_then(|p| p.parameter());

        let mut node = Map::new();
        node.insert("name".to_string(), Value::from(name.as_str()));
        node.insert(
            owner_key.to_string(),
            Value::from(method.owner_name().unwrap_or_default()),
        );
        if kind == FrameKind::Method {
            let natural_id = params.as_ref().and_then(|p| p.natural_id()).map(|_| true);
            let param_id = params.as_ref().and_then(|p| p.param_id()).map(|_| "id");
            node.insert("naturalId".to_string(), Value::from(natural_id));
            node.insert("paramId".to_string(), Value::from(param_id));
        }
        node.insert(
            "parameter".to_string(),
            Value::from(parameter.as_ref().and_then(|p| p.text())),
        );
        if kind == FrameKind::Method {
            let ret = method.return_type();
            node.insert(
                "returnType".to_string(),
                Value::from(ret.as_ref().and_then(|r| r.type_name())),
            );
            node.insert(
                "returnTypeIsArray".to_string(),
                Value::Bool(ret.as_ref().is_some_and(|r| r.is_array())),
            );
            node.insert(
                "returnTypeIsOptional".to_string(),
                Value::Bool(ret.as_ref().is_some_and(|r| r.is_optional())),
            );
            self.record(
                format!("{}.returnType", path),
                ret.as_ref().and_then(|r| self.span_of(r)),
            );
        }
        let events = self.with_events(&path, method.with_events());
        node.insert("withEvents".to_string(), events);
        node.insert("options".to_string(), Value::map());
        node.insert("optionsList".to_string(), Value::list());
        node.insert("javadoc".to_string(), Value::from(any_javadoc_of(method)));

        self.record(path.clone(), self.span_of(method));
        self.record(format!("{}.name", path), method.name().and_then(|n| self.span_of(&n)));
        self.record(
            format!("{}.parameter", path),
            parameter.as_ref().and_then(|p| self.span_of(p)),
        );

        self.push(Frame::new(
            kind,
            path,
            node,
            Attach::Parent {
                key: collection_key,
                name,
            },
        ));
    }
}

fn name_text(name: Option<Name>) -> String {
    name.and_then(|n| n.text()).unwrap_or_default()
}

fn options_entry(name: &str, value: Value) -> Value {
    let mut entry = Map::new();
    entry.insert("name".to_string(), Value::from(name));
    entry.insert("value".to_string(), value);
    Value::Map(entry)
}

// ============================================================================
// Listener
// ============================================================================

impl ZdlListener for ModelBuilder {
    fn enter_global_javadoc(&mut self, node: &GlobalJavadoc) {
        if let Some(text) = node.text() {
            self.model.set_root("javadoc", Value::from(javadoc_text(&text)));
        }
    }

    fn enter_legacy_constant(&mut self, node: &LegacyConstant) {
        let name = name_text(node.name());
        let value = node.value().map(|v| v.text()).unwrap_or_default();
        trace!("[BUILDER] constant {} = {}", name, value);
        self.model
            .collection_mut("constants")
            .insert(name, Value::from(value));
    }

    fn enter_import(&mut self, node: &Import) {
        if let Some(value) = node.value() {
            self.model.push_import(Value::from(literal_text(&value)));
        }
    }

    fn enter_config_option(&mut self, node: &ConfigOption) {
        let name = name_text(node.name());
        let value = node.value().map(|v| complex_value(&v)).unwrap_or(Value::Null);
        self.model.collection_mut("config").insert(name, value);
    }

    // ------------------------------------------------------------------------
    // APIs and plugins
    // ------------------------------------------------------------------------

    fn enter_api(&mut self, node: &Api) {
        let name = name_text(node.name());
        let path = format!("apis.{}", name);
        trace!("[BUILDER] enter api {}", name);

        let mut api = Map::new();
        api.insert("name".to_string(), Value::from(name.as_str()));
        api.insert(
            "type".to_string(),
            Value::from(node.api_type().and_then(|t| t.text())),
        );
        api.insert(
            "role".to_string(),
            Value::from(
                node.role()
                    .and_then(|r| r.text())
                    .unwrap_or_else(|| "provider".to_string()),
            ),
        );
        api.insert("javadoc".to_string(), Value::from(javadoc_of(node)));
        api.insert("options".to_string(), Value::map());
        api.insert("optionsList".to_string(), Value::list());
        api.insert("config".to_string(), Value::map());

        self.record(path.clone(), self.span_of(node));
        self.record(format!("{}.name", path), node.name().and_then(|n| self.span_of(&n)));
        self.record(format!("{}.type", path), node.api_type().and_then(|t| self.span_of(&t)));
        self.record(format!("{}.role", path), node.role().and_then(|r| self.span_of(&r)));

        self.push(Frame::new(
            FrameKind::Api,
            path,
            api,
            Attach::Root {
                collection: "apis".to_string(),
                name,
            },
        ));
    }

    fn exit_api(&mut self, _node: &Api) {
        self.pop(FrameKind::Api);
    }

    fn enter_api_config(&mut self, node: &ConfigOption) {
        let name = name_text(node.name());
        let value = node.value().map(|v| complex_value(&v)).unwrap_or(Value::Null);
        if let Some(frame) = self.stack.top_mut() {
            frame.map_mut("config").insert(name, value);
        }
    }

    fn enter_plugin(&mut self, node: &Plugin) {
        let name = name_text(node.name());
        let path = format!("plugins.{}", name);
        trace!("[BUILDER] enter plugin {}", name);

        let inherit = node
            .options()
            .and_then(|o| o.inherit())
            .map(|l| literal_value(&l))
            .unwrap_or(Value::Bool(true));
        let mut options = Map::new();
        options.insert("inherit".to_string(), inherit);

        let mut plugin = Map::new();
        plugin.insert("name".to_string(), Value::from(name.as_str()));
        plugin.insert("javadoc".to_string(), Value::from(javadoc_of(node)));
        plugin.insert("disabled".to_string(), Value::Bool(node.disabled().is_some()));
        plugin.insert("options".to_string(), Value::Map(options));
        plugin.insert("config".to_string(), Value::map());
        plugin.insert("cliOptions".to_string(), Value::map());

        self.record(path.clone(), self.span_of(node));
        self.record(format!("{}.name", path), node.name().and_then(|n| self.span_of(&n)));
        self.record(
            format!("{}.javadoc", path),
            node.javadoc().map(|t| self.token_span(&t)),
        );
        self.record(
            format!("{}.disabled", path),
            node.disabled().and_then(|d| self.span_of(&d)),
        );
        if let Some(plugin_options) = node.options() {
            self.record(format!("{}.options", path), self.span_of(&plugin_options));
            self.record(
                format!("{}.options.inherit", path),
                plugin_options.inherit().and_then(|l| self.span_of(&l)),
            );
        }

        self.push(Frame::new(
            FrameKind::Plugin,
            path,
            plugin,
            Attach::Root {
                collection: "plugins".to_string(),
                name,
            },
        ));
    }

    fn exit_plugin(&mut self, _node: &Plugin) {
        self.pop(FrameKind::Plugin);
    }

    fn enter_plugin_config_option(&mut self, node: &ConfigOption) {
        let name = name_text(node.name());
        let value = node.value().map(|v| complex_value(&v)).unwrap_or(Value::Null);
        if let Some(frame) = self.stack.top_mut() {
            frame.map_mut("config").insert(name, value);
        }
    }

    fn enter_plugin_cli_option(&mut self, node: &PluginCliOption) {
        let name = name_text(node.name());
        let value = node.value().map(|l| literal_text(&l));
        if let Some(frame) = self.stack.top_mut() {
            frame.map_mut("cliOptions").insert(name, Value::from(value));
        }
    }

    fn enter_policy(&mut self, node: &Policy) {
        let name = name_text(node.name());
        let mut policy = Map::new();
        policy.insert("name".to_string(), Value::from(name.as_str()));
        policy.insert(
            "value".to_string(),
            node.value().map(|l| literal_value(&l)).unwrap_or(Value::Null),
        );
        policy.insert(
            "aggregate".to_string(),
            Value::from(node.policies().and_then(|p| p.aggregate()).and_then(|n| n.text())),
        );
        self.model
            .collection_mut("policies")
            .insert(name, Value::Map(policy));
    }

    // ------------------------------------------------------------------------
    // Declarations and fields
    // ------------------------------------------------------------------------

    fn enter_entity(&mut self, node: &Declaration) {
        self.enter_declaration(node, "entities");
    }

    fn exit_entity(&mut self, _node: &Declaration) {
        self.pop(FrameKind::Declaration);
    }

    fn enter_input(&mut self, node: &Declaration) {
        self.enter_declaration(node, "inputs");
    }

    fn exit_input(&mut self, _node: &Declaration) {
        self.pop(FrameKind::Declaration);
    }

    fn enter_output(&mut self, node: &Declaration) {
        self.enter_declaration(node, "outputs");
    }

    fn exit_output(&mut self, _node: &Declaration) {
        self.pop(FrameKind::Declaration);
    }

    fn enter_event(&mut self, node: &Declaration) {
        self.enter_declaration(node, "events");
    }

    fn exit_event(&mut self, _node: &Declaration) {
        self.pop(FrameKind::Declaration);
    }

    fn enter_annotation(&mut self, node: &Annotation) {
        let Some(name) = node.name() else { return };
        // Relationship endpoints read their own annotations
        let Some(frame) = self.stack.top_mut() else {
            return;
        };
        let value = option_value(node.value());
        trace!("[BUILDER] option @{} on {}", name, frame.path);
        frame.map_mut("options").insert(name.clone(), value.clone());
        frame.list_mut("optionsList").push(options_entry(&name, value));
    }

    fn enter_field(&mut self, node: &Field) {
        let owner_path = self.owner_path(
            &[FrameKind::Declaration, FrameKind::NestedField],
            "field",
        );
        let name = name_text(node.name());
        let path = format!("{}.fields.{}", owner_path, name);
        trace!("[BUILDER] enter field {}", path);

        let field_type = node.field_type();
        let mut type_name = field_type.as_ref().and_then(|t| t.type_name());
        let mut is_array = field_type.as_ref().is_some_and(|t| t.is_array());
        if is_array && type_name.as_deref() == Some("byte") {
            type_name = Some("byte[]".to_string());
            is_array = false;
        }
        let initial_value = node
            .initial_value()
            .map(|iv| match iv.literal() {
                Some(literal) => literal_value(&literal),
                None => parse_literal(SyntaxKind::IDENT, iv.text().trim())
                    .unwrap_or_else(|_| Value::from(iv.text())),
            })
            .unwrap_or(Value::Null);
        let javadoc = any_javadoc_of(node);
        let validations = self.validations(&path, node.validations());

        let mut field = Map::new();
        field.insert("name".to_string(), Value::from(name.as_str()));
        field.insert("type".to_string(), Value::from(type_name));
        field.insert("initialValue".to_string(), initial_value);
        field.insert("javadoc".to_string(), Value::from(javadoc.clone()));
        field.insert("comment".to_string(), Value::from(javadoc));
        for flag in ["isEnum", "isEntity", "isInput", "isOutput", "isEvent"] {
            field.insert(flag.to_string(), Value::Bool(false));
        }
        field.insert("isArray".to_string(), Value::Bool(is_array));
        field.insert("isComplexType".to_string(), Value::Bool(false));
        field.insert("options".to_string(), Value::map());
        field.insert("optionsList".to_string(), Value::list());
        field.insert("validations".to_string(), Value::Map(validations));

        self.record(path.clone(), self.span_of(node));
        self.record(format!("{}.name", path), node.name().and_then(|n| self.span_of(&n)));
        self.record(format!("{}.type", path), field_type.as_ref().and_then(|t| self.span_of(t)));
        self.record(
            format!("{}.javadoc", path),
            node.javadoc()
                .or_else(|| node.suffix_javadoc())
                .map(|t| self.token_span(&t)),
        );

        self.push(Frame::new(
            FrameKind::Field,
            path,
            field,
            Attach::Parent {
                key: "fields",
                name,
            },
        ));
    }

    fn exit_field(&mut self, _node: &Field) {
        self.pop(FrameKind::Field);
    }

    fn enter_nested_field(&mut self, node: &NestedField) {
        let field_path = self.owner_path(&[FrameKind::Field], "nested field");
        let Some(owner) = node.owner() else {
            panic!("nested field without an owning field at {}", field_path);
        };

        let validations = self.validations(&field_path, node.validations());
        let Some(field_frame) = self.stack.top_mut() else {
            unreachable!();
        };
        field_frame.map_mut("validations").extend(validations);
        let owner_options = field_frame.map_mut("options").clone();
        let collection = field_frame.collection().to_string();

        let field_type = owner.field_type();
        let name = field_type
            .as_ref()
            .and_then(|t| t.type_name())
            .unwrap_or_default();
        let path = format!("{}.{}", collection, name);
        trace!("[BUILDER] enter nested {} from {}", path, field_path);

        let table_name = owner.table_name();
        let mut entity = self.declaration_node(
            &name,
            &collection,
            javadoc_of(&owner),
            table_name.as_ref().and_then(|t| t.text()),
        );
        if let Some(Value::Map(options)) = entity.get_mut("options") {
            options.insert("embedded".to_string(), Value::Bool(true));
            options.extend(owner_options);
        }

        let type_span = field_type.as_ref().and_then(|t| self.span_of(t));
        let body_span = self.span_of(node);
        let whole = match (type_span, body_span) {
            (Some(start), Some(end)) => Some(start.cover(&end)),
            _ => None,
        };
        self.record(path.clone(), whole);
        self.record(format!("{}.name", path), type_span);
        self.record(
            format!("{}.tableName", path),
            table_name.as_ref().and_then(|t| self.span_of(t)),
        );
        self.record(format!("{}.body", path), body_span);

        self.push(Frame::new(
            FrameKind::NestedField,
            path,
            entity,
            Attach::Root { collection, name },
        ));
    }

    fn exit_nested_field(&mut self, _node: &NestedField) {
        self.pop(FrameKind::NestedField);
    }

    // ------------------------------------------------------------------------
    // Enums
    // ------------------------------------------------------------------------

    fn enter_enum(&mut self, node: &Enum) {
        let name = name_text(node.name());
        let path = format!("enums.{}", name);
        trace!("[BUILDER] enter enum {}", name);

        let javadoc = javadoc_of(node);
        let mut item = Map::new();
        item.insert("name".to_string(), Value::from(name.as_str()));
        item.insert("type".to_string(), Value::from("enums"));
        item.insert(
            "className".to_string(),
            Value::from(self.names.class_name(&name)),
        );
        item.insert("javadoc".to_string(), Value::from(javadoc.clone()));
        item.insert("comment".to_string(), Value::from(javadoc));
        item.insert("options".to_string(), Value::map());
        item.insert("optionsList".to_string(), Value::list());
        item.insert("hasValue".to_string(), Value::Bool(false));
        item.insert("values".to_string(), Value::map());

        self.record(path.clone(), self.span_of(node));
        self.record(format!("{}.name", path), node.name().and_then(|n| self.span_of(&n)));
        self.record(format!("{}.body", path), node.body().and_then(|b| self.span_of(&b)));

        self.push(Frame::new(
            FrameKind::Enum,
            path,
            item,
            Attach::Root {
                collection: "enums".to_string(),
                name,
            },
        ));
    }

    fn exit_enum(&mut self, _node: &Enum) {
        self.pop(FrameKind::Enum);
    }

    fn enter_enum_value(&mut self, node: &EnumValue) {
        let name = name_text(node.name());
        let javadoc = any_javadoc_of(node);
        let value = node.value().map(|l| literal_value(&l));

        let Some(frame) = self.stack.top_mut() else {
            return;
        };
        if value.is_some() {
            frame.node.insert("hasValue".to_string(), Value::Bool(true));
        }
        let mut entry = Map::new();
        entry.insert("name".to_string(), Value::from(name.as_str()));
        entry.insert("javadoc".to_string(), Value::from(javadoc.clone()));
        entry.insert("comment".to_string(), Value::from(javadoc));
        entry.insert("value".to_string(), Value::from(value));
        frame.map_mut("values").insert(name, Value::Map(entry));
    }

    // ------------------------------------------------------------------------
    // Relationships
    // ------------------------------------------------------------------------

    fn enter_relationship(&mut self, node: &Relationship) {
        let relationship_type = node
            .group()
            .and_then(|g| g.relationship_type())
            .and_then(|n| n.text())
            .unwrap_or_default();
        let from = node.from().filter(|end| end.entity().is_some());
        let to = node.to().filter(|end| end.entity().is_some());

        let describe = |end: &Option<RelationshipEnd>| -> String {
            let Some(end) = end else {
                return String::new();
            };
            let entity = name_text(end.entity());
            match end.field().and_then(|f| f.name()).and_then(|n| n.text()) {
                Some(field) => format!("{}{{{}}}", entity, field),
                None => entity,
            }
        };
        let name = format!("{}_{}_{}", relationship_type, describe(&from), describe(&to));
        let path = format!("relationships.{}.{}", relationship_type, name);
        trace!("[BUILDER] relationship {}", path);

        let mut relationship = Map::new();
        relationship.insert("type".to_string(), Value::from(relationship_type.as_str()));
        relationship.insert("name".to_string(), Value::from(name.as_str()));
        self.record(path.clone(), self.span_of(node));
        if let Some(end) = &from {
            self.relationship_side(&mut relationship, &path, "from", end);
        }
        if let Some(end) = &to {
            self.relationship_side(&mut relationship, &path, "to", end);
        }

        let group = self
            .model
            .collection_mut("relationships")
            .entry(relationship_type)
            .or_insert_with(Value::map);
        if let Value::Map(group) = group {
            group.insert(name, Value::Map(relationship));
        }
    }

    // ------------------------------------------------------------------------
    // Services, aggregates and methods
    // ------------------------------------------------------------------------

    fn enter_service(&mut self, node: &Service) {
        let name = name_text(node.name());
        let path = format!("services.{}", name);
        trace!("[BUILDER] enter service {}", name);

        let aggregates = self.service_aggregates(node.aggregates());
        let mut service = Map::new();
        service.insert("name".to_string(), Value::from(name.as_str()));
        service.insert(
            "className".to_string(),
            Value::from(self.names.class_name(&name)),
        );
        service.insert("javadoc".to_string(), Value::from(javadoc_of(node)));
        service.insert(
            "aggregates".to_string(),
            Value::List(aggregates.into_iter().map(Value::from).collect()),
        );
        service.insert("options".to_string(), Value::map());
        service.insert("optionsList".to_string(), Value::list());
        service.insert("methods".to_string(), Value::map());

        self.record(path.clone(), self.span_of(node));
        self.record(format!("{}.name", path), node.name().and_then(|n| self.span_of(&n)));
        self.record(
            format!("{}.aggregates", path),
            node.aggregates().and_then(|a| self.span_of(&a)),
        );

        self.push(Frame::new(
            FrameKind::Service,
            path,
            service,
            Attach::Root {
                collection: "services".to_string(),
                name,
            },
        ));
    }

    fn exit_service(&mut self, _node: &Service) {
        self.pop(FrameKind::Service);
    }

    fn enter_legacy_service(&mut self, node: &LegacyService) {
        let name = name_text(node.name());
        let path = format!("services.{}", name);
        trace!("[BUILDER] enter legacy service {}", name);

        let aggregates = self.service_aggregates(node.aggregates());
        let methods = crud_methods(self.names.as_ref(), &name, &aggregates);

        let mut options = Map::new();
        options.insert("rest".to_string(), Value::Bool(true));
        let mut service = Map::new();
        service.insert("name".to_string(), Value::from(name.as_str()));
        service.insert("isLegacy".to_string(), Value::Bool(true));
        service.insert(
            "className".to_string(),
            Value::from(self.names.class_name(&name)),
        );
        service.insert("javadoc".to_string(), Value::from("Legacy service"));
        service.insert(
            "aggregates".to_string(),
            Value::List(aggregates.into_iter().map(Value::from).collect()),
        );
        service.insert("options".to_string(), Value::Map(options));
        service.insert(
            "optionsList".to_string(),
            Value::List(vec![options_entry("rest", Value::Bool(true))]),
        );
        service.insert("methods".to_string(), Value::Map(methods));

        self.record(path.clone(), self.span_of(node));
        self.record(format!("{}.name", path), node.name().and_then(|n| self.span_of(&n)));
        self.record(
            format!("{}.aggregates", path),
            node.aggregates().and_then(|a| self.span_of(&a)),
        );

        self.push(Frame::new(
            FrameKind::LegacyService,
            path,
            service,
            Attach::Root {
                collection: "services".to_string(),
                name,
            },
        ));
    }

    fn exit_legacy_service(&mut self, _node: &LegacyService) {
        self.pop(FrameKind::LegacyService);
    }

    fn enter_service_method(&mut self, node: &Method) {
        self.enter_method_like(node, FrameKind::Method);
    }

    fn exit_service_method(&mut self, _node: &Method) {
        self.pop(FrameKind::Method);
    }

    fn enter_aggregate(&mut self, node: &Aggregate) {
        let name = name_text(node.name());
        let path = format!("aggregates.{}", name);
        trace!("[BUILDER] enter aggregate {}", name);

        let mut aggregate = Map::new();
        aggregate.insert("name".to_string(), Value::from(name.as_str()));
        aggregate.insert("type".to_string(), Value::from("aggregates"));
        aggregate.insert(
            "className".to_string(),
            Value::from(self.names.class_name(&name)),
        );
        aggregate.insert("javadoc".to_string(), Value::from(javadoc_of(node)));
        aggregate.insert(
            "aggregateRoot".to_string(),
            Value::from(node.root().and_then(|r| r.text())),
        );
        aggregate.insert("options".to_string(), Value::map());
        aggregate.insert("optionsList".to_string(), Value::list());
        aggregate.insert("commands".to_string(), Value::map());

        self.record(path.clone(), self.span_of(node));
        self.record(format!("{}.name", path), node.name().and_then(|n| self.span_of(&n)));
        self.record(
            format!("{}.aggregateRoot", path),
            node.root().and_then(|r| self.span_of(&r)),
        );

        self.push(Frame::new(
            FrameKind::Aggregate,
            path,
            aggregate,
            Attach::Root {
                collection: "aggregates".to_string(),
                name,
            },
        ));
    }

    fn exit_aggregate(&mut self, _node: &Aggregate) {
        self.pop(FrameKind::Aggregate);
    }

    fn enter_aggregate_command(&mut self, node: &Method) {
        self.enter_method_like(node, FrameKind::Command);
    }

    fn exit_aggregate_command(&mut self, _node: &Method) {
        self.pop(FrameKind::Command);
    }
}
