//! Recursive descent parser for ZDL
//!
//! Builds a rowan GreenNode tree from tokens.
//! Supports error recovery and produces a lossless CST.
//!
//! Trivia is only consumed right before a real token is bumped, and nodes are
//! opened after the pending trivia, so every node's range starts at its first
//! token and ends at its last one.

use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;
use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};

/// Validation names accepted after a field type.
pub const VALIDATION_NAMES: &[&str] = &[
    "required",
    "unique",
    "min",
    "max",
    "minlength",
    "maxlength",
    "pattern",
];

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Parse ZDL source code into a CST
pub fn parse(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens);
    parser.parse_source_file();
    parser.finish()
}

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection (trivia is skipped by every lookahead)
    // =========================================================================

    fn nth_index(&self, n: usize) -> Option<usize> {
        let mut count = 0;
        for idx in self.pos..self.tokens.len() {
            if !self.tokens[idx].kind.is_trivia() {
                if count == n {
                    return Some(idx);
                }
                count += 1;
            }
        }
        None
    }

    fn nth_token(&self, n: usize) -> Option<&Token<'a>> {
        self.nth_index(n).map(|idx| &self.tokens[idx])
    }

    fn nth(&self, n: usize) -> SyntaxKind {
        self.nth_token(n).map(|t| t.kind).unwrap_or(SyntaxKind::ERROR)
    }

    fn nth_text(&self, n: usize) -> &str {
        self.nth_token(n).map(|t| t.text).unwrap_or("")
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.nth_token(0).is_some_and(|t| t.kind == kind)
    }

    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        self.nth_token(0).is_some_and(|t| kinds.contains(&t.kind))
    }

    /// Check for a contextual keyword
    fn at_kw(&self, keyword: &str) -> bool {
        self.at(SyntaxKind::IDENT) && self.nth_text(0) == keyword
    }

    fn nth_kw(&self, n: usize, keyword: &str) -> bool {
        self.nth(n) == SyntaxKind::IDENT && self.nth_text(n) == keyword
    }

    fn at_eof(&self) -> bool {
        self.nth_token(0).is_none()
    }

    fn at_simple(&self) -> bool {
        self.at_any(&[
            SyntaxKind::IDENT,
            SyntaxKind::STRING,
            SyntaxKind::INTEGER,
            SyntaxKind::DECIMAL,
        ])
    }

    fn at_validation(&self) -> bool {
        self.at(SyntaxKind::IDENT) && VALIDATION_NAMES.contains(&self.nth_text(0))
    }

    /// Does the trivia before the next real token contain a line break?
    fn newline_before_next(&self) -> bool {
        self.tokens[self.pos..]
            .iter()
            .take_while(|t| t.kind.is_trivia())
            .any(|t| t.text.contains('\n'))
    }

    /// Count line breaks in the whitespace that follows the next real token.
    fn newlines_after_next(&self) -> usize {
        let Some(idx) = self.nth_index(0) else {
            return 0;
        };
        self.tokens[idx + 1..]
            .iter()
            .take_while(|t| t.kind.is_trivia())
            .map(|t| t.text.matches('\n').count())
            .sum()
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn skip_trivia(&mut self) {
        while self.tokens.get(self.pos).is_some_and(|t| t.kind.is_trivia()) {
            self.bump_raw();
        }
    }

    fn bump_raw(&mut self) {
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    /// Consume pending trivia and the next real token
    fn bump(&mut self) {
        self.skip_trivia();
        self.bump_raw();
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("expected {:?}", kind));
            false
        }
    }

    fn expect_kw(&mut self, keyword: &str) -> bool {
        if self.at_kw(keyword) {
            self.bump();
            true
        } else {
            self.error(format!("expected '{}'", keyword));
            false
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn error(&mut self, message: impl Into<String>) {
        let range = self
            .nth_token(0)
            .map(|t| TextRange::at(t.offset, TextSize::of(t.text)))
            .or_else(|| {
                self.tokens
                    .last()
                    .map(|t| TextRange::empty(t.offset + TextSize::of(t.text)))
            })
            .unwrap_or_else(|| TextRange::empty(TextSize::new(0)));
        self.errors.push(SyntaxError::new(message, range));
    }

    /// Report an error and wrap the next token in an ERROR node
    fn error_bump(&mut self, message: impl Into<String>) {
        self.error(message);
        if !self.at_eof() {
            self.start_node(SyntaxKind::ERROR);
            self.bump();
            self.finish_node();
        }
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    fn start_node(&mut self, kind: SyntaxKind) {
        self.skip_trivia();
        self.builder.start_node(kind.into());
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.skip_trivia();
        self.builder.checkpoint()
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    /// Wrap the next token in a single-token node
    fn token_node(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.finish_node();
    }

    fn parse_name(&mut self) {
        if self.at(SyntaxKind::IDENT) {
            self.token_node(SyntaxKind::NAME);
        } else {
            self.error("expected a name");
        }
    }

    fn parse_suffix_javadoc(&mut self) {
        if self.at(SyntaxKind::JAVADOC) && !self.newline_before_next() {
            self.token_node(SyntaxKind::SUFFIX_JAVADOC);
        }
    }

    // =========================================================================
    // Source file
    // =========================================================================

    fn parse_source_file(&mut self) {
        self.builder.start_node(SyntaxKind::SOURCE_FILE.into());

        if self.at(SyntaxKind::JAVADOC)
            && (self.newlines_after_next() >= 2 || self.nth_token(1).is_none())
        {
            self.token_node(SyntaxKind::GLOBAL_JAVADOC);
        }

        while !self.at_eof() {
            self.parse_member();
        }

        self.skip_trivia();
        self.builder.finish_node();
    }

    fn parse_member(&mut self) {
        match self.nth(0) {
            SyntaxKind::IDENT if self.nth(1) == SyntaxKind::EQ => self.parse_legacy_constant(),
            SyntaxKind::AT if self.nth_kw(1, "import") => self.parse_import(),
            SyntaxKind::IDENT if self.at_kw("config") && self.nth(1) == SyntaxKind::L_BRACE => {
                self.parse_config()
            }
            SyntaxKind::IDENT if self.at_kw("apis") && self.nth(1) == SyntaxKind::L_BRACE => {
                self.parse_api_list()
            }
            SyntaxKind::IDENT if self.at_kw("plugins") && self.nth(1) == SyntaxKind::L_BRACE => {
                self.parse_plugin_list()
            }
            SyntaxKind::IDENT if self.at_kw("policies") && self.nth(1) == SyntaxKind::L_PAREN => {
                self.parse_policies()
            }
            SyntaxKind::IDENT if self.at_kw("relationship") => self.parse_relationship_group(),
            SyntaxKind::IDENT
                if self.at_kw("service")
                    && (self.nth(2) == SyntaxKind::COMMA || self.nth_kw(2, "with")) =>
            {
                self.parse_legacy_service()
            }
            SyntaxKind::JAVADOC | SyntaxKind::AT | SyntaxKind::IDENT => self.parse_declaration(),
            _ => self.error_bump("expected a declaration"),
        }
    }

    fn parse_legacy_constant(&mut self) {
        self.start_node(SyntaxKind::LEGACY_CONSTANT);
        self.parse_name();
        self.expect(SyntaxKind::EQ);
        self.parse_literal();
        self.finish_node();
    }

    fn parse_import(&mut self) {
        self.start_node(SyntaxKind::IMPORT);
        self.bump(); // @
        self.bump(); // import
        self.expect(SyntaxKind::L_PAREN);
        self.parse_literal();
        self.expect(SyntaxKind::R_PAREN);
        self.finish_node();
    }

    // =========================================================================
    // Config, APIs, plugins, policies
    // =========================================================================

    fn parse_config(&mut self) {
        self.start_node(SyntaxKind::CONFIG);
        self.bump(); // config
        self.expect(SyntaxKind::L_BRACE);
        while !self.at(SyntaxKind::R_BRACE) && !self.at_eof() {
            if self.at_kw("plugins") && self.nth(1) == SyntaxKind::L_BRACE {
                self.parse_plugin_list();
            } else if self.at(SyntaxKind::IDENT) {
                self.parse_config_option(SyntaxKind::CONFIG_OPTION);
            } else {
                self.error_bump("expected a config option");
            }
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    fn parse_config_option(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.parse_name();
        self.parse_complex_value();
        self.eat(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    fn parse_api_list(&mut self) {
        self.start_node(SyntaxKind::API_LIST);
        self.bump(); // apis
        self.expect(SyntaxKind::L_BRACE);
        while !self.at(SyntaxKind::R_BRACE) && !self.at_eof() {
            if self.at_any(&[SyntaxKind::JAVADOC, SyntaxKind::AT, SyntaxKind::IDENT]) {
                self.parse_api();
            } else {
                self.error_bump("expected an api");
            }
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    fn parse_api(&mut self) {
        self.start_node(SyntaxKind::API);
        self.eat(SyntaxKind::JAVADOC);
        self.parse_annotations();
        if self.at(SyntaxKind::IDENT) {
            self.token_node(SyntaxKind::API_TYPE);
        } else {
            self.error("expected api type");
        }
        if self.eat(SyntaxKind::L_PAREN) {
            if self.at(SyntaxKind::IDENT) {
                self.token_node(SyntaxKind::API_ROLE);
            }
            self.expect(SyntaxKind::R_PAREN);
        }
        self.parse_name();
        if self.expect(SyntaxKind::L_BRACE) {
            while !self.at(SyntaxKind::R_BRACE) && !self.at_eof() {
                if self.at(SyntaxKind::IDENT) {
                    self.parse_config_option(SyntaxKind::API_CONFIG);
                } else {
                    self.error_bump("expected an api config option");
                }
            }
            self.expect(SyntaxKind::R_BRACE);
        }
        self.finish_node();
    }

    fn parse_plugin_list(&mut self) {
        self.start_node(SyntaxKind::PLUGIN_LIST);
        self.bump(); // plugins
        self.expect(SyntaxKind::L_BRACE);
        while !self.at(SyntaxKind::R_BRACE) && !self.at_eof() {
            if self.at_any(&[SyntaxKind::JAVADOC, SyntaxKind::IDENT]) {
                self.parse_plugin();
            } else {
                self.error_bump("expected a plugin");
            }
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    fn parse_plugin(&mut self) {
        self.start_node(SyntaxKind::PLUGIN);
        self.eat(SyntaxKind::JAVADOC);
        if self.at_kw("disabled") && self.nth(1) == SyntaxKind::IDENT {
            self.token_node(SyntaxKind::PLUGIN_DISABLED);
        }
        self.parse_name();
        if self.at(SyntaxKind::L_PAREN) {
            self.start_node(SyntaxKind::PLUGIN_OPTIONS);
            self.bump(); // (
            self.expect_kw("inherit");
            self.expect(SyntaxKind::COLON);
            self.parse_literal();
            self.expect(SyntaxKind::R_PAREN);
            self.finish_node();
        }
        if self.expect(SyntaxKind::L_BRACE) {
            while !self.at(SyntaxKind::R_BRACE) && !self.at_eof() {
                if self.at(SyntaxKind::MINUS_MINUS) {
                    self.parse_plugin_cli_option();
                } else if self.at(SyntaxKind::IDENT) {
                    self.parse_config_option(SyntaxKind::PLUGIN_CONFIG_OPTION);
                } else {
                    self.error_bump("expected a plugin option");
                }
            }
            self.expect(SyntaxKind::R_BRACE);
        }
        self.finish_node();
    }

    fn parse_plugin_cli_option(&mut self) {
        self.start_node(SyntaxKind::PLUGIN_CLI_OPTION);
        self.bump(); // --
        self.parse_name();
        let has_value = self.at_any(&[SyntaxKind::STRING, SyntaxKind::INTEGER, SyntaxKind::DECIMAL])
            || (self.at(SyntaxKind::IDENT)
                && matches!(self.nth(1), SyntaxKind::MINUS_MINUS | SyntaxKind::R_BRACE));
        if has_value {
            self.parse_literal();
        }
        self.finish_node();
    }

    fn parse_policies(&mut self) {
        self.start_node(SyntaxKind::POLICIES);
        self.bump(); // policies
        self.expect(SyntaxKind::L_PAREN);
        self.parse_name();
        self.expect(SyntaxKind::R_PAREN);
        self.expect(SyntaxKind::L_BRACE);
        while !self.at(SyntaxKind::R_BRACE) && !self.at_eof() {
            if self.at(SyntaxKind::IDENT) {
                self.start_node(SyntaxKind::POLICY);
                self.parse_name();
                self.parse_literal();
                self.eat(SyntaxKind::SEMICOLON);
                self.finish_node();
            } else {
                self.error_bump("expected a policy");
            }
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn parse_declaration(&mut self) {
        let checkpoint = self.checkpoint();
        let has_javadoc = self.eat(SyntaxKind::JAVADOC);
        let has_annotations = self.at(SyntaxKind::AT);
        self.parse_annotations();

        let kind = match self.nth_text(0) {
            _ if !self.at(SyntaxKind::IDENT) => None,
            "entity" => Some(SyntaxKind::ENTITY),
            "input" => Some(SyntaxKind::INPUT),
            "output" => Some(SyntaxKind::OUTPUT),
            "event" => Some(SyntaxKind::EVENT),
            "enum" => Some(SyntaxKind::ENUM),
            "service" => Some(SyntaxKind::SERVICE),
            "aggregate" => Some(SyntaxKind::AGGREGATE),
            _ => None,
        };

        let Some(kind) = kind else {
            // A lone doc comment between declarations is left at the root
            if has_javadoc && !has_annotations {
                return;
            }
            self.start_node_at(checkpoint, SyntaxKind::ERROR);
            self.error("expected a declaration");
            if !has_javadoc && !has_annotations {
                self.bump();
            }
            self.finish_node();
            return;
        };

        self.start_node_at(checkpoint, kind);
        self.bump(); // keyword
        match kind {
            SyntaxKind::ENTITY => {
                self.parse_name();
                self.parse_table_name();
                self.parse_decl_body();
            }
            SyntaxKind::INPUT | SyntaxKind::OUTPUT | SyntaxKind::EVENT => {
                self.parse_name();
                self.parse_decl_body();
            }
            SyntaxKind::ENUM => {
                self.parse_name();
                self.parse_enum_body();
            }
            SyntaxKind::SERVICE => self.parse_service_rest(),
            SyntaxKind::AGGREGATE => self.parse_aggregate_rest(),
            _ => unreachable!("unhandled declaration kind {:?}", kind),
        }
        self.finish_node();
    }

    fn parse_table_name(&mut self) {
        if self.eat(SyntaxKind::L_PAREN) {
            if self.at(SyntaxKind::IDENT) {
                self.token_node(SyntaxKind::TABLE_NAME);
            } else {
                self.error("expected a table name");
            }
            self.expect(SyntaxKind::R_PAREN);
        }
    }

    fn parse_decl_body(&mut self) {
        self.start_node(SyntaxKind::DECL_BODY);
        if self.expect(SyntaxKind::L_BRACE) {
            self.parse_fields();
            self.expect(SyntaxKind::R_BRACE);
        }
        self.finish_node();
    }

    fn parse_fields(&mut self) {
        while !self.at(SyntaxKind::R_BRACE) && !self.at_eof() {
            if self.at_any(&[SyntaxKind::JAVADOC, SyntaxKind::AT, SyntaxKind::IDENT]) {
                self.parse_field();
            } else {
                self.error_bump("expected a field");
            }
        }
    }

    fn parse_field(&mut self) {
        self.start_node(SyntaxKind::FIELD);
        self.eat(SyntaxKind::JAVADOC);
        self.parse_annotations();
        self.parse_name();

        if self.at(SyntaxKind::IDENT) {
            self.start_node(SyntaxKind::FIELD_TYPE);
            self.bump();
            if self.at(SyntaxKind::L_BRACKET) && self.nth(1) == SyntaxKind::R_BRACKET {
                self.bump();
                self.bump();
            }
            self.finish_node();
        } else {
            self.error("expected a field type");
        }

        self.parse_table_name();

        if self.eat(SyntaxKind::EQ) {
            self.parse_initial_value();
        }

        while self.at_validation() {
            self.parse_validation();
        }
        self.parse_suffix_javadoc();

        if self.at(SyntaxKind::L_BRACE) {
            self.start_node(SyntaxKind::NESTED_FIELD);
            self.bump(); // {
            self.parse_fields();
            self.expect(SyntaxKind::R_BRACE);
            while self.at_validation() {
                self.parse_validation();
            }
            self.finish_node();
        }

        self.eat(SyntaxKind::COMMA);
        self.parse_suffix_javadoc();
        self.finish_node();
    }

    fn parse_initial_value(&mut self) {
        self.start_node(SyntaxKind::INITIAL_VALUE);
        if self.at_any(&[SyntaxKind::STRING, SyntaxKind::INTEGER, SyntaxKind::DECIMAL]) {
            self.parse_literal();
        } else if self.at(SyntaxKind::IDENT) {
            // `true`, `Status.ACTIVE`, `LocalDate.now()`
            self.bump();
            while self.at(SyntaxKind::DOT) && self.nth(1) == SyntaxKind::IDENT {
                self.bump();
                self.bump();
            }
            if self.at(SyntaxKind::L_PAREN) && self.nth(1) == SyntaxKind::R_PAREN {
                self.bump();
                self.bump();
            }
        } else {
            self.error("expected an initial value");
        }
        self.finish_node();
    }

    fn parse_validation(&mut self) {
        self.start_node(SyntaxKind::VALIDATION);
        self.bump(); // name
        if self.eat(SyntaxKind::L_PAREN) {
            while !self.at_any(&[SyntaxKind::R_PAREN, SyntaxKind::R_BRACE]) && !self.at_eof() {
                self.bump();
            }
            self.expect(SyntaxKind::R_PAREN);
        }
        self.finish_node();
    }

    fn parse_enum_body(&mut self) {
        self.start_node(SyntaxKind::ENUM_BODY);
        if self.expect(SyntaxKind::L_BRACE) {
            while !self.at(SyntaxKind::R_BRACE) && !self.at_eof() {
                if self.at_any(&[SyntaxKind::JAVADOC, SyntaxKind::IDENT]) {
                    self.parse_enum_value();
                } else {
                    self.error_bump("expected an enum value");
                }
            }
            self.expect(SyntaxKind::R_BRACE);
        }
        self.finish_node();
    }

    fn parse_enum_value(&mut self) {
        self.start_node(SyntaxKind::ENUM_VALUE);
        self.eat(SyntaxKind::JAVADOC);
        self.parse_name();
        if self.eat(SyntaxKind::L_PAREN) {
            self.parse_literal();
            self.expect(SyntaxKind::R_PAREN);
        }
        self.eat(SyntaxKind::COMMA);
        self.parse_suffix_javadoc();
        self.finish_node();
    }

    // =========================================================================
    // Relationships
    // =========================================================================

    fn parse_relationship_group(&mut self) {
        self.start_node(SyntaxKind::RELATIONSHIP_GROUP);
        self.bump(); // relationship
        self.parse_name();
        self.expect(SyntaxKind::L_BRACE);
        while !self.at(SyntaxKind::R_BRACE) && !self.at_eof() {
            let start = self.pos;
            self.parse_relationship();
            if self.pos == start {
                self.error_bump("expected a relationship");
            }
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    fn at_relationship_end(&self) -> bool {
        self.at_any(&[SyntaxKind::JAVADOC, SyntaxKind::AT])
            || (self.at(SyntaxKind::IDENT) && !self.at_kw("to"))
    }

    fn parse_relationship(&mut self) {
        if !self.at_relationship_end() && !self.at_kw("to") {
            return;
        }
        self.start_node(SyntaxKind::RELATIONSHIP);
        if self.at_relationship_end() {
            self.parse_relationship_end(SyntaxKind::RELATIONSHIP_FROM);
        }
        if self.expect_kw("to") && self.at_relationship_end() {
            self.parse_relationship_end(SyntaxKind::RELATIONSHIP_TO);
        }
        self.eat(SyntaxKind::COMMA);
        self.finish_node();
    }

    fn parse_relationship_end(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.eat(SyntaxKind::JAVADOC);
        self.parse_annotations();
        self.parse_name();
        if self.at(SyntaxKind::L_BRACE) {
            self.start_node(SyntaxKind::RELATIONSHIP_FIELD);
            self.bump(); // {
            self.parse_name();
            if self.at(SyntaxKind::L_PAREN) {
                self.start_node(SyntaxKind::RELATIONSHIP_DESCRIPTION);
                self.bump(); // (
                self.parse_name();
                self.expect(SyntaxKind::R_PAREN);
                self.finish_node();
            }
            while self.at_validation() {
                self.parse_validation();
            }
            self.expect(SyntaxKind::R_BRACE);
            self.finish_node();
        }
        self.finish_node();
    }

    // =========================================================================
    // Services and aggregates
    // =========================================================================

    fn parse_service_rest(&mut self) {
        self.parse_name();
        if self.at_kw("for") {
            self.bump(); // for
            self.expect(SyntaxKind::L_PAREN);
            self.parse_service_aggregates();
            self.expect(SyntaxKind::R_PAREN);
        }
        if self.expect(SyntaxKind::L_BRACE) {
            self.parse_methods(SyntaxKind::SERVICE_METHOD);
            self.expect(SyntaxKind::R_BRACE);
        }
    }

    fn parse_legacy_service(&mut self) {
        self.start_node(SyntaxKind::LEGACY_SERVICE);
        self.bump(); // service
        self.parse_service_aggregates();
        self.expect_kw("with");
        self.parse_name();
        self.finish_node();
    }

    fn parse_service_aggregates(&mut self) {
        self.start_node(SyntaxKind::SERVICE_AGGREGATES);
        self.parse_name();
        while self.at(SyntaxKind::COMMA) && self.nth(1) == SyntaxKind::IDENT {
            self.bump(); // ,
            self.parse_name();
        }
        self.finish_node();
    }

    fn parse_aggregate_rest(&mut self) {
        self.parse_name();
        if self.expect(SyntaxKind::L_PAREN) {
            if self.at(SyntaxKind::IDENT) {
                self.token_node(SyntaxKind::AGGREGATE_ROOT);
            } else {
                self.error("expected an aggregate root");
            }
            self.expect(SyntaxKind::R_PAREN);
        }
        if self.expect(SyntaxKind::L_BRACE) {
            self.parse_methods(SyntaxKind::AGGREGATE_COMMAND);
            self.expect(SyntaxKind::R_BRACE);
        }
    }

    fn parse_methods(&mut self, kind: SyntaxKind) {
        while !self.at(SyntaxKind::R_BRACE) && !self.at_eof() {
            if self.at_any(&[SyntaxKind::JAVADOC, SyntaxKind::AT, SyntaxKind::IDENT]) {
                self.parse_method(kind);
            } else {
                self.error_bump("expected a method");
            }
        }
    }

    fn parse_method(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.eat(SyntaxKind::JAVADOC);
        self.parse_annotations();
        self.parse_name();

        self.start_node(SyntaxKind::METHOD_PARAMS);
        if self.expect(SyntaxKind::L_PAREN) {
            if self.at(SyntaxKind::AT) && self.nth_kw(1, "natural") {
                self.start_node(SyntaxKind::NATURAL_ID);
                self.bump();
                self.bump();
                self.finish_node();
            }
            if self.at_kw("id") {
                self.token_node(SyntaxKind::PARAM_ID);
                self.eat(SyntaxKind::COMMA);
            }
            if self.at(SyntaxKind::IDENT) {
                self.token_node(SyntaxKind::METHOD_PARAMETER);
            }
            self.expect(SyntaxKind::R_PAREN);
        }
        self.finish_node();

        if kind == SyntaxKind::SERVICE_METHOD
            && self.at(SyntaxKind::IDENT)
            && !self.at_kw("withEvents")
            && self.nth(1) != SyntaxKind::L_PAREN
        {
            self.start_node(SyntaxKind::METHOD_RETURN);
            self.bump();
            if self.at(SyntaxKind::L_BRACKET) && self.nth(1) == SyntaxKind::R_BRACKET {
                self.bump();
                self.bump();
            } else {
                self.eat(SyntaxKind::QUESTION);
            }
            self.finish_node();
        }

        if self.at_kw("withEvents") {
            self.parse_with_events();
        }
        self.parse_suffix_javadoc();
        self.finish_node();
    }

    fn parse_with_events(&mut self) {
        self.start_node(SyntaxKind::WITH_EVENTS);
        self.bump(); // withEvents
        loop {
            if self.at(SyntaxKind::IDENT) && self.nth(1) != SyntaxKind::L_PAREN {
                self.token_node(SyntaxKind::EVENT_REF);
            } else if self.at(SyntaxKind::L_BRACKET) {
                self.start_node(SyntaxKind::EVENT_GROUP);
                self.bump(); // [
                while self.at(SyntaxKind::IDENT) {
                    self.token_node(SyntaxKind::EVENT_REF);
                    if !self.eat(SyntaxKind::PIPE) && !self.eat(SyntaxKind::COMMA) {
                        break;
                    }
                }
                self.expect(SyntaxKind::R_BRACKET);
                self.finish_node();
            } else {
                break;
            }
        }
        self.finish_node();
    }

    // =========================================================================
    // Annotations and values
    // =========================================================================

    fn parse_annotations(&mut self) {
        while self.at(SyntaxKind::AT) {
            self.parse_annotation();
        }
    }

    fn parse_annotation(&mut self) {
        self.start_node(SyntaxKind::ANNOTATION);
        self.bump(); // @
        self.expect(SyntaxKind::IDENT);
        if self.eat(SyntaxKind::L_PAREN) {
            self.parse_complex_value();
            self.expect(SyntaxKind::R_PAREN);
        }
        self.finish_node();
    }

    fn at_pair(&self) -> bool {
        self.at_any(&[SyntaxKind::IDENT, SyntaxKind::STRING]) && self.nth(1) == SyntaxKind::COLON
    }

    fn parse_complex_value(&mut self) {
        self.start_node(SyntaxKind::COMPLEX_VALUE);
        if self.at_pair() {
            self.start_node(SyntaxKind::PAIRS);
            loop {
                self.parse_pair();
                if self.at(SyntaxKind::COMMA) && self.nth(2) == SyntaxKind::COLON {
                    self.bump(); // ,
                } else {
                    break;
                }
            }
            self.finish_node();
        } else if self.at_simple() && self.nth(1) == SyntaxKind::COMMA {
            self.start_node(SyntaxKind::ARRAY_PLAIN);
            self.parse_literal();
            while self.at(SyntaxKind::COMMA) {
                self.bump(); // ,
                self.parse_literal();
            }
            self.finish_node();
        } else {
            self.parse_value();
        }
        self.finish_node();
    }

    fn parse_value(&mut self) {
        if self.at(SyntaxKind::L_BRACE) {
            self.start_node(SyntaxKind::OBJECT);
            self.bump(); // {
            while self.at_pair() {
                self.parse_pair();
                self.eat(SyntaxKind::COMMA);
            }
            self.expect(SyntaxKind::R_BRACE);
            self.finish_node();
        } else if self.at(SyntaxKind::L_BRACKET) {
            self.start_node(SyntaxKind::ARRAY);
            self.bump(); // [
            while !self.at(SyntaxKind::R_BRACKET) && !self.at_eof() {
                if self.at_simple() || self.at_any(&[SyntaxKind::L_BRACE, SyntaxKind::L_BRACKET]) {
                    self.parse_value();
                    self.eat(SyntaxKind::COMMA);
                } else {
                    self.error_bump("expected a value");
                }
            }
            self.expect(SyntaxKind::R_BRACKET);
            self.finish_node();
        } else {
            self.parse_literal();
        }
    }

    fn parse_pair(&mut self) {
        self.start_node(SyntaxKind::PAIR);
        self.parse_literal();
        self.expect(SyntaxKind::COLON);
        self.parse_value();
        self.finish_node();
    }

    fn parse_literal(&mut self) {
        if self.at_simple() {
            self.token_node(SyntaxKind::LITERAL);
        } else {
            self.error("expected a value");
        }
    }
}
