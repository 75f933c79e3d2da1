//! Typed AST wrappers over the untyped rowan CST.
//!
//! This module provides strongly-typed accessors for ZDL syntax nodes.
//! Each struct wraps a SyntaxNode and provides methods to access children.

use super::syntax_kind::SyntaxKind;
use super::{SyntaxNode, SyntaxToken};

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

/// Nodes that may carry a leading doc comment and annotations
pub trait Documented: AstNode {
    /// The leading `/** ... */` token
    fn javadoc(&self) -> Option<SyntaxToken> {
        token(self.syntax(), SyntaxKind::JAVADOC)
    }

    /// A `/** ... */` on the same line, after the node
    fn suffix_javadoc(&self) -> Option<SyntaxToken> {
        self.syntax()
            .children()
            .find(|n| n.kind() == SyntaxKind::SUFFIX_JAVADOC)
            .and_then(|n| token(&n, SyntaxKind::JAVADOC))
    }

    fn annotations(&self) -> impl Iterator<Item = Annotation> {
        self.syntax().children().filter_map(Annotation::cast)
    }
}

// ============================================================================
// Helper macros
// ============================================================================

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident, $($kind:ident)|+) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                matches!(kind, $(SyntaxKind::$kind)|+)
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

/// A node wrapping a single meaningful token
macro_rules! token_node {
    ($(#[$meta:meta])* $name:ident, $kind:ident) => {
        ast_node!($(#[$meta])* $name, $kind);

        impl $name {
            pub fn text(&self) -> Option<String> {
                self.0
                    .children_with_tokens()
                    .filter_map(|e| e.into_token())
                    .find(|t| !t.kind().is_trivia())
                    .map(|t| t.text().to_string())
            }
        }
    };
}

fn token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

fn child<N: AstNode>(node: &SyntaxNode) -> Option<N> {
    node.children().find_map(N::cast)
}

fn children<N: AstNode>(node: &SyntaxNode) -> impl Iterator<Item = N> {
    node.children().filter_map(N::cast)
}

// ============================================================================
// Root
// ============================================================================

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    pub fn global_javadoc(&self) -> Option<GlobalJavadoc> {
        child(&self.0)
    }

    pub fn declarations(&self) -> impl Iterator<Item = Declaration> + '_ {
        children(&self.0)
    }
}

token_node!(Name, NAME);
token_node!(GlobalJavadoc, GLOBAL_JAVADOC);

ast_node!(LegacyConstant, LEGACY_CONSTANT);

impl LegacyConstant {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn value(&self) -> Option<Literal> {
        child(&self.0)
    }
}

ast_node!(Import, IMPORT);

impl Import {
    pub fn value(&self) -> Option<Literal> {
        child(&self.0)
    }
}

// ============================================================================
// Config, APIs, plugins, policies
// ============================================================================

ast_node!(
    /// A `key value` entry of a config block, an api body or a plugin body
    ConfigOption,
    CONFIG_OPTION | API_CONFIG | PLUGIN_CONFIG_OPTION
);

impl ConfigOption {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn value(&self) -> Option<ComplexValue> {
        child(&self.0)
    }
}

ast_node!(Api, API);
impl Documented for Api {}

token_node!(ApiType, API_TYPE);
token_node!(ApiRole, API_ROLE);

impl Api {
    pub fn api_type(&self) -> Option<ApiType> {
        child(&self.0)
    }

    pub fn role(&self) -> Option<ApiRole> {
        child(&self.0)
    }

    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn config(&self) -> impl Iterator<Item = ConfigOption> + '_ {
        children(&self.0)
    }
}

ast_node!(Plugin, PLUGIN);
impl Documented for Plugin {}

token_node!(PluginDisabled, PLUGIN_DISABLED);

impl Plugin {
    pub fn disabled(&self) -> Option<PluginDisabled> {
        child(&self.0)
    }

    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn options(&self) -> Option<PluginOptions> {
        child(&self.0)
    }
}

ast_node!(PluginOptions, PLUGIN_OPTIONS);

impl PluginOptions {
    pub fn inherit(&self) -> Option<Literal> {
        child(&self.0)
    }
}

ast_node!(PluginCliOption, PLUGIN_CLI_OPTION);

impl PluginCliOption {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn value(&self) -> Option<Literal> {
        child(&self.0)
    }
}

ast_node!(Policies, POLICIES);

impl Policies {
    pub fn aggregate(&self) -> Option<Name> {
        child(&self.0)
    }
}

ast_node!(Policy, POLICY);

impl Policy {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn value(&self) -> Option<Literal> {
        child(&self.0)
    }

    pub fn policies(&self) -> Option<Policies> {
        self.0.parent().and_then(Policies::cast)
    }
}

// ============================================================================
// Declarations
// ============================================================================

ast_node!(
    /// Entity, input, output or event
    Declaration,
    ENTITY | INPUT | OUTPUT | EVENT
);
impl Documented for Declaration {}

token_node!(TableName, TABLE_NAME);

impl Declaration {
    pub fn kind(&self) -> SyntaxKind {
        self.0.kind()
    }

    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn table_name(&self) -> Option<TableName> {
        child(&self.0)
    }

    pub fn body(&self) -> Option<DeclBody> {
        child(&self.0)
    }
}

ast_node!(DeclBody, DECL_BODY);

impl DeclBody {
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        children(&self.0)
    }
}

ast_node!(Field, FIELD);
impl Documented for Field {}

impl Field {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn field_type(&self) -> Option<FieldType> {
        child(&self.0)
    }

    pub fn table_name(&self) -> Option<TableName> {
        child(&self.0)
    }

    pub fn initial_value(&self) -> Option<InitialValue> {
        child(&self.0)
    }

    pub fn validations(&self) -> impl Iterator<Item = Validation> + '_ {
        children(&self.0)
    }

    pub fn nested(&self) -> Option<NestedField> {
        child(&self.0)
    }
}

ast_node!(FieldType, FIELD_TYPE);

impl FieldType {
    pub fn type_name(&self) -> Option<String> {
        token(&self.0, SyntaxKind::IDENT).map(|t| t.text().to_string())
    }

    pub fn is_array(&self) -> bool {
        token(&self.0, SyntaxKind::L_BRACKET).is_some()
    }
}

ast_node!(InitialValue, INITIAL_VALUE);

impl InitialValue {
    /// The literal, when the initial value is a plain string or number
    pub fn literal(&self) -> Option<Literal> {
        child(&self.0)
    }

    pub fn text(&self) -> String {
        self.0.text().to_string()
    }
}

ast_node!(Validation, VALIDATION);

impl Validation {
    pub fn name(&self) -> Option<String> {
        token(&self.0, SyntaxKind::IDENT).map(|t| t.text().to_string())
    }

    /// Source text between the parentheses, if any
    pub fn value_text(&self) -> Option<String> {
        let mut inside = false;
        let mut text = String::new();
        for token in self.0.children_with_tokens().filter_map(|e| e.into_token()) {
            match token.kind() {
                SyntaxKind::L_PAREN if !inside => inside = true,
                SyntaxKind::R_PAREN if inside => return Some(text.trim().to_string()),
                _ if inside => text.push_str(token.text()),
                _ => {}
            }
        }
        inside.then(|| text.trim().to_string())
    }
}

ast_node!(NestedField, NESTED_FIELD);

impl NestedField {
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        children(&self.0)
    }

    pub fn validations(&self) -> impl Iterator<Item = Validation> + '_ {
        children(&self.0)
    }

    /// The field whose type this block declares
    pub fn owner(&self) -> Option<Field> {
        self.0.parent().and_then(Field::cast)
    }
}

ast_node!(Enum, ENUM);
impl Documented for Enum {}

impl Enum {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn body(&self) -> Option<EnumBody> {
        child(&self.0)
    }
}

ast_node!(EnumBody, ENUM_BODY);

impl EnumBody {
    pub fn values(&self) -> impl Iterator<Item = EnumValue> + '_ {
        children(&self.0)
    }
}

ast_node!(EnumValue, ENUM_VALUE);
impl Documented for EnumValue {}

impl EnumValue {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn value(&self) -> Option<Literal> {
        child(&self.0)
    }
}

// ============================================================================
// Relationships
// ============================================================================

ast_node!(RelationshipGroup, RELATIONSHIP_GROUP);

impl RelationshipGroup {
    pub fn relationship_type(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn relationships(&self) -> impl Iterator<Item = Relationship> + '_ {
        children(&self.0)
    }
}

ast_node!(Relationship, RELATIONSHIP);

impl Relationship {
    pub fn group(&self) -> Option<RelationshipGroup> {
        self.0.parent().and_then(RelationshipGroup::cast)
    }

    pub fn from(&self) -> Option<RelationshipEnd> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::RELATIONSHIP_FROM)
            .and_then(RelationshipEnd::cast)
    }

    pub fn to(&self) -> Option<RelationshipEnd> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::RELATIONSHIP_TO)
            .and_then(RelationshipEnd::cast)
    }
}

ast_node!(RelationshipEnd, RELATIONSHIP_FROM | RELATIONSHIP_TO);
impl Documented for RelationshipEnd {}

impl RelationshipEnd {
    pub fn entity(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn field(&self) -> Option<RelationshipField> {
        child(&self.0)
    }
}

ast_node!(RelationshipField, RELATIONSHIP_FIELD);

impl RelationshipField {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn description(&self) -> Option<Name> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::RELATIONSHIP_DESCRIPTION)
            .and_then(|n| child(&n))
    }

    pub fn validations(&self) -> impl Iterator<Item = Validation> + '_ {
        children(&self.0)
    }
}

// ============================================================================
// Services and aggregates
// ============================================================================

ast_node!(Service, SERVICE);
impl Documented for Service {}

impl Service {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn aggregates(&self) -> Option<ServiceAggregates> {
        child(&self.0)
    }

    pub fn methods(&self) -> impl Iterator<Item = Method> + '_ {
        children(&self.0)
    }
}

ast_node!(LegacyService, LEGACY_SERVICE);

impl LegacyService {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn aggregates(&self) -> Option<ServiceAggregates> {
        child(&self.0)
    }
}

ast_node!(ServiceAggregates, SERVICE_AGGREGATES);

impl ServiceAggregates {
    pub fn names(&self) -> impl Iterator<Item = Name> + '_ {
        children(&self.0)
    }
}

ast_node!(Aggregate, AGGREGATE);
impl Documented for Aggregate {}

token_node!(AggregateRoot, AGGREGATE_ROOT);

impl Aggregate {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn root(&self) -> Option<AggregateRoot> {
        child(&self.0)
    }

    pub fn commands(&self) -> impl Iterator<Item = Method> + '_ {
        children(&self.0)
    }
}

ast_node!(
    /// A service method or an aggregate command
    Method,
    SERVICE_METHOD | AGGREGATE_COMMAND
);
impl Documented for Method {}

impl Method {
    pub fn kind(&self) -> SyntaxKind {
        self.0.kind()
    }

    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    /// Name of the enclosing service or aggregate
    pub fn owner_name(&self) -> Option<String> {
        self.0
            .parent()
            .and_then(|parent| child::<Name>(&parent))
            .and_then(|name| name.text())
    }

    pub fn params(&self) -> Option<MethodParams> {
        child(&self.0)
    }

    pub fn return_type(&self) -> Option<MethodReturn> {
        child(&self.0)
    }

    pub fn with_events(&self) -> Option<WithEvents> {
        child(&self.0)
    }
}

ast_node!(MethodParams, METHOD_PARAMS);

token_node!(NaturalId, NATURAL_ID);
token_node!(ParamId, PARAM_ID);
token_node!(MethodParameter, METHOD_PARAMETER);

impl MethodParams {
    pub fn natural_id(&self) -> Option<NaturalId> {
        child(&self.0)
    }

    pub fn param_id(&self) -> Option<ParamId> {
        child(&self.0)
    }

    pub fn parameter(&self) -> Option<MethodParameter> {
        child(&self.0)
    }
}

ast_node!(MethodReturn, METHOD_RETURN);

impl MethodReturn {
    pub fn type_name(&self) -> Option<String> {
        token(&self.0, SyntaxKind::IDENT).map(|t| t.text().to_string())
    }

    pub fn is_array(&self) -> bool {
        token(&self.0, SyntaxKind::L_BRACKET).is_some()
    }

    pub fn is_optional(&self) -> bool {
        token(&self.0, SyntaxKind::QUESTION).is_some()
    }
}

ast_node!(WithEvents, WITH_EVENTS);

impl WithEvents {
    pub fn items(&self) -> impl Iterator<Item = EventItem> + '_ {
        children(&self.0)
    }
}

token_node!(EventRef, EVENT_REF);
ast_node!(EventGroup, EVENT_GROUP);

impl EventGroup {
    pub fn events(&self) -> impl Iterator<Item = EventRef> + '_ {
        children(&self.0)
    }
}

/// One entry of a `withEvents` list: an event or an alternative group
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventItem {
    Single(EventRef),
    Group(EventGroup),
}

impl AstNode for EventItem {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(kind, SyntaxKind::EVENT_REF | SyntaxKind::EVENT_GROUP)
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::EVENT_REF => Some(Self::Single(EventRef(node))),
            SyntaxKind::EVENT_GROUP => Some(Self::Group(EventGroup(node))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Single(n) => n.syntax(),
            Self::Group(n) => n.syntax(),
        }
    }
}

// ============================================================================
// Annotations and values
// ============================================================================

ast_node!(Annotation, ANNOTATION);

impl Annotation {
    pub fn name(&self) -> Option<String> {
        token(&self.0, SyntaxKind::IDENT).map(|t| t.text().to_string())
    }

    pub fn value(&self) -> Option<ComplexValue> {
        child(&self.0)
    }
}

ast_node!(ComplexValue, COMPLEX_VALUE);

impl ComplexValue {
    pub fn value(&self) -> Option<ValueNode> {
        child(&self.0)
    }

    pub fn array_plain(&self) -> Option<ArrayPlain> {
        child(&self.0)
    }

    pub fn pairs(&self) -> Option<Pairs> {
        child(&self.0)
    }
}

/// A value: literal, `{ ... }` object or `[ ... ]` array
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueNode {
    Literal(Literal),
    Object(Object),
    Array(Array),
}

impl AstNode for ValueNode {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(kind, SyntaxKind::LITERAL | SyntaxKind::OBJECT | SyntaxKind::ARRAY)
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::LITERAL => Some(Self::Literal(Literal(node))),
            SyntaxKind::OBJECT => Some(Self::Object(Object(node))),
            SyntaxKind::ARRAY => Some(Self::Array(Array(node))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Literal(n) => n.syntax(),
            Self::Object(n) => n.syntax(),
            Self::Array(n) => n.syntax(),
        }
    }
}

ast_node!(Literal, LITERAL);

impl Literal {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind().is_literal())
    }

    pub fn text(&self) -> String {
        self.token().map(|t| t.text().to_string()).unwrap_or_default()
    }
}

ast_node!(Object, OBJECT);

impl Object {
    pub fn pairs(&self) -> impl Iterator<Item = Pair> + '_ {
        children(&self.0)
    }
}

ast_node!(Array, ARRAY);

impl Array {
    pub fn values(&self) -> impl Iterator<Item = ValueNode> + '_ {
        children(&self.0)
    }
}

ast_node!(Pair, PAIR);

impl Pair {
    pub fn key(&self) -> Option<Literal> {
        self.0.children().next().and_then(Literal::cast)
    }

    pub fn value(&self) -> Option<ValueNode> {
        self.0.children().nth(1).and_then(ValueNode::cast)
    }
}

ast_node!(ArrayPlain, ARRAY_PLAIN);

impl ArrayPlain {
    pub fn literals(&self) -> impl Iterator<Item = Literal> + '_ {
        children(&self.0)
    }
}

ast_node!(Pairs, PAIRS);

impl Pairs {
    pub fn pairs(&self) -> impl Iterator<Item = Pair> + '_ {
        children(&self.0)
    }
}
