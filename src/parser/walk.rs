//! Pre-order enter/exit traversal of a ZDL syntax tree.
//!
//! [`walk`] visits every node once and reports the constructs a model builder
//! cares about to a [`ZdlListener`]. Scope-bearing constructs get a matching
//! `exit_*` call after all of their children have been visited.

use rowan::WalkEvent;

use super::ast::*;
use super::syntax_kind::SyntaxKind;
use super::SyntaxNode;

/// Callbacks fired by [`walk`]. Every method defaults to a no-op.
#[allow(unused_variables)]
pub trait ZdlListener {
    fn enter_global_javadoc(&mut self, node: &GlobalJavadoc) {}
    fn enter_legacy_constant(&mut self, node: &LegacyConstant) {}
    fn enter_import(&mut self, node: &Import) {}
    fn enter_config_option(&mut self, node: &ConfigOption) {}

    fn enter_api(&mut self, node: &Api) {}
    fn exit_api(&mut self, node: &Api) {}
    fn enter_api_config(&mut self, node: &ConfigOption) {}

    fn enter_plugin(&mut self, node: &Plugin) {}
    fn exit_plugin(&mut self, node: &Plugin) {}
    fn enter_plugin_config_option(&mut self, node: &ConfigOption) {}
    fn enter_plugin_cli_option(&mut self, node: &PluginCliOption) {}

    fn enter_policy(&mut self, node: &Policy) {}

    fn enter_entity(&mut self, node: &Declaration) {}
    fn exit_entity(&mut self, node: &Declaration) {}
    fn enter_input(&mut self, node: &Declaration) {}
    fn exit_input(&mut self, node: &Declaration) {}
    fn enter_output(&mut self, node: &Declaration) {}
    fn exit_output(&mut self, node: &Declaration) {}
    fn enter_event(&mut self, node: &Declaration) {}
    fn exit_event(&mut self, node: &Declaration) {}

    fn enter_annotation(&mut self, node: &Annotation) {}

    fn enter_field(&mut self, node: &Field) {}
    fn exit_field(&mut self, node: &Field) {}
    fn enter_nested_field(&mut self, node: &NestedField) {}
    fn exit_nested_field(&mut self, node: &NestedField) {}

    fn enter_enum(&mut self, node: &Enum) {}
    fn exit_enum(&mut self, node: &Enum) {}
    fn enter_enum_value(&mut self, node: &EnumValue) {}

    fn enter_relationship(&mut self, node: &Relationship) {}

    fn enter_service(&mut self, node: &Service) {}
    fn exit_service(&mut self, node: &Service) {}
    fn enter_legacy_service(&mut self, node: &LegacyService) {}
    fn exit_legacy_service(&mut self, node: &LegacyService) {}
    fn enter_service_method(&mut self, node: &Method) {}
    fn exit_service_method(&mut self, node: &Method) {}

    fn enter_aggregate(&mut self, node: &Aggregate) {}
    fn exit_aggregate(&mut self, node: &Aggregate) {}
    fn enter_aggregate_command(&mut self, node: &Method) {}
    fn exit_aggregate_command(&mut self, node: &Method) {}
}

/// Walk `root` in pre-order, firing listener callbacks.
pub fn walk<L: ZdlListener + ?Sized>(listener: &mut L, root: &SyntaxNode) {
    for event in root.preorder() {
        match event {
            WalkEvent::Enter(node) => enter(listener, node),
            WalkEvent::Leave(node) => leave(listener, node),
        }
    }
}

macro_rules! dispatch {
    ($listener:ident, $node:ident, $ty:ty, $method:ident) => {
        if let Some(n) = <$ty>::cast($node) {
            $listener.$method(&n);
        }
    };
}

fn enter<L: ZdlListener + ?Sized>(listener: &mut L, node: SyntaxNode) {
    match node.kind() {
        SyntaxKind::GLOBAL_JAVADOC => dispatch!(listener, node, GlobalJavadoc, enter_global_javadoc),
        SyntaxKind::LEGACY_CONSTANT => dispatch!(listener, node, LegacyConstant, enter_legacy_constant),
        SyntaxKind::IMPORT => dispatch!(listener, node, Import, enter_import),
        SyntaxKind::CONFIG_OPTION => dispatch!(listener, node, ConfigOption, enter_config_option),
        SyntaxKind::API => dispatch!(listener, node, Api, enter_api),
        SyntaxKind::API_CONFIG => dispatch!(listener, node, ConfigOption, enter_api_config),
        SyntaxKind::PLUGIN => dispatch!(listener, node, Plugin, enter_plugin),
        SyntaxKind::PLUGIN_CONFIG_OPTION => {
            dispatch!(listener, node, ConfigOption, enter_plugin_config_option)
        }
        SyntaxKind::PLUGIN_CLI_OPTION => {
            dispatch!(listener, node, PluginCliOption, enter_plugin_cli_option)
        }
        SyntaxKind::POLICY => dispatch!(listener, node, Policy, enter_policy),
        SyntaxKind::ENTITY => dispatch!(listener, node, Declaration, enter_entity),
        SyntaxKind::INPUT => dispatch!(listener, node, Declaration, enter_input),
        SyntaxKind::OUTPUT => dispatch!(listener, node, Declaration, enter_output),
        SyntaxKind::EVENT => dispatch!(listener, node, Declaration, enter_event),
        SyntaxKind::ANNOTATION => dispatch!(listener, node, Annotation, enter_annotation),
        SyntaxKind::FIELD => dispatch!(listener, node, Field, enter_field),
        SyntaxKind::NESTED_FIELD => dispatch!(listener, node, NestedField, enter_nested_field),
        SyntaxKind::ENUM => dispatch!(listener, node, Enum, enter_enum),
        SyntaxKind::ENUM_VALUE => dispatch!(listener, node, EnumValue, enter_enum_value),
        SyntaxKind::RELATIONSHIP => dispatch!(listener, node, Relationship, enter_relationship),
        SyntaxKind::SERVICE => dispatch!(listener, node, Service, enter_service),
        SyntaxKind::LEGACY_SERVICE => dispatch!(listener, node, LegacyService, enter_legacy_service),
        SyntaxKind::SERVICE_METHOD => dispatch!(listener, node, Method, enter_service_method),
        SyntaxKind::AGGREGATE => dispatch!(listener, node, Aggregate, enter_aggregate),
        SyntaxKind::AGGREGATE_COMMAND => dispatch!(listener, node, Method, enter_aggregate_command),
        _ => {}
    }
}

fn leave<L: ZdlListener + ?Sized>(listener: &mut L, node: SyntaxNode) {
    match node.kind() {
        SyntaxKind::API => dispatch!(listener, node, Api, exit_api),
        SyntaxKind::PLUGIN => dispatch!(listener, node, Plugin, exit_plugin),
        SyntaxKind::ENTITY => dispatch!(listener, node, Declaration, exit_entity),
        SyntaxKind::INPUT => dispatch!(listener, node, Declaration, exit_input),
        SyntaxKind::OUTPUT => dispatch!(listener, node, Declaration, exit_output),
        SyntaxKind::EVENT => dispatch!(listener, node, Declaration, exit_event),
        SyntaxKind::FIELD => dispatch!(listener, node, Field, exit_field),
        SyntaxKind::NESTED_FIELD => dispatch!(listener, node, NestedField, exit_nested_field),
        SyntaxKind::ENUM => dispatch!(listener, node, Enum, exit_enum),
        SyntaxKind::SERVICE => dispatch!(listener, node, Service, exit_service),
        SyntaxKind::LEGACY_SERVICE => dispatch!(listener, node, LegacyService, exit_legacy_service),
        SyntaxKind::SERVICE_METHOD => dispatch!(listener, node, Method, exit_service_method),
        SyntaxKind::AGGREGATE => dispatch!(listener, node, Aggregate, exit_aggregate),
        SyntaxKind::AGGREGATE_COMMAND => dispatch!(listener, node, Method, exit_aggregate_command),
        _ => {}
    }
}
