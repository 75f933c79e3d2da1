//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible node and token kinds in the ZDL syntax tree.
//! Keywords are contextual: they are lexed as `IDENT` and recognized by the
//! parser from their text, so `entity` or `service` stay usable as names.

/// All syntax kinds (tokens and nodes) in ZDL
///
/// Tokens are leaf nodes (identifiers, literals, punctuation).
/// Nodes are composite (declarations, fields, values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace and comments - preserved but not semantically meaningful)
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,

    // =========================================================================
    // LITERALS
    // =========================================================================
    JAVADOC,            // /** doc */
    IDENT,              // identifier or contextual keyword
    INTEGER,            // 42, -1
    DECIMAL,            // 3.14
    STRING,             // "hello" or 'hello'

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_BRACE,            // {
    R_BRACE,            // }
    L_BRACKET,          // [
    R_BRACKET,          // ]
    L_PAREN,            // (
    R_PAREN,            // )
    SEMICOLON,          // ;
    COLON,              // :
    COMMA,              // ,
    DOT,                // .
    EQ,                 // =
    AT,                 // @
    PIPE,               // |
    QUESTION,           // ?
    MINUS_MINUS,        // --

    // =========================================================================
    // SPECIAL
    // =========================================================================
    ERROR,

    // =========================================================================
    // NODES - Root and global constructs
    // =========================================================================
    SOURCE_FILE,
    GLOBAL_JAVADOC,
    SUFFIX_JAVADOC,
    LEGACY_CONSTANT,
    IMPORT,
    CONFIG,
    CONFIG_OPTION,
    NAME,

    // =========================================================================
    // NODES - APIs, plugins, policies
    // =========================================================================
    API_LIST,
    API,
    API_TYPE,
    API_ROLE,
    API_CONFIG,
    PLUGIN_LIST,
    PLUGIN,
    PLUGIN_DISABLED,
    PLUGIN_OPTIONS,
    PLUGIN_CONFIG_OPTION,
    PLUGIN_CLI_OPTION,
    POLICIES,
    POLICY,

    // =========================================================================
    // NODES - Declarations
    // =========================================================================
    ENTITY,
    INPUT,
    OUTPUT,
    EVENT,
    TABLE_NAME,
    DECL_BODY,
    FIELD,
    FIELD_TYPE,
    INITIAL_VALUE,
    VALIDATION,
    NESTED_FIELD,
    ENUM,
    ENUM_BODY,
    ENUM_VALUE,

    // =========================================================================
    // NODES - Relationships
    // =========================================================================
    RELATIONSHIP_GROUP,
    RELATIONSHIP,
    RELATIONSHIP_FROM,
    RELATIONSHIP_TO,
    RELATIONSHIP_FIELD,
    RELATIONSHIP_DESCRIPTION,

    // =========================================================================
    // NODES - Services and aggregates
    // =========================================================================
    SERVICE,
    LEGACY_SERVICE,
    SERVICE_AGGREGATES,
    SERVICE_METHOD,
    METHOD_PARAMS,
    NATURAL_ID,
    PARAM_ID,
    METHOD_PARAMETER,
    METHOD_RETURN,
    WITH_EVENTS,
    EVENT_REF,
    EVENT_GROUP,
    AGGREGATE,
    AGGREGATE_ROOT,
    AGGREGATE_COMMAND,

    // =========================================================================
    // NODES - Annotations and values
    // =========================================================================
    ANNOTATION,
    COMPLEX_VALUE,
    LITERAL,
    OBJECT,
    ARRAY,
    PAIR,
    ARRAY_PLAIN,
    PAIRS,

    // Must be last
    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::LINE_COMMENT | Self::BLOCK_COMMENT)
    }

    /// Check if this is a punctuation token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::L_BRACE as u16) && (self as u16) <= (Self::MINUS_MINUS as u16)
    }

    /// Check if this is a literal
    pub fn is_literal(self) -> bool {
        matches!(self, Self::IDENT | Self::INTEGER | Self::DECIMAL | Self::STRING)
    }

    /// Check if this is a composite node kind
    pub fn is_node(self) -> bool {
        (self as u16) >= (Self::SOURCE_FILE as u16) && (self as u16) < (Self::__LAST as u16)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ZdlLanguage {}

impl rowan::Language for ZdlLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<ZdlLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<ZdlLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<ZdlLanguage>;
