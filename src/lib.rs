//! # zdl
//!
//! Semantic model builder and validator for the ZDL domain modeling language.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! semantic  → post-processing (field classification, symbols), validation
//!   ↓
//! builder   → syntax tree walk → semantic document + locations
//!   ↓
//! model     → Value tree, ZdlModel, path queries, problems
//!   ↓
//! parser    → Logos lexer, rowan CST, typed AST, listener walk
//!   ↓
//! base      → Primitives (Position, Span, LineIndex, TextRange)
//! ```
//!
//! ## Usage
//!
//! ```
//! let model = zdl::ZdlParser::new().parse_model("entity Customer { name String required }");
//! assert_eq!(model.get_str("entities.Customer.tableName"), Some("customer"));
//! assert!(model.problems().is_empty());
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → model → builder → semantic)
// ============================================================================

/// Foundation types: Position, Span, LineIndex, TextRange
pub mod base;

/// Parser: Logos lexer, rowan CST, typed AST, listener walk
pub mod parser;

/// Semantic document: Value, ZdlModel, LocationIndex, Problem
pub mod model;

/// Name derivation: NameTransform, Inflector
pub mod names;

/// Parse options: standard and extra field types
pub mod config;

/// Model builder: syntax tree → document
pub mod builder;

/// Post-processing and validation
pub mod semantic;

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, warn};

pub use base::{LineIndex, Position, Span, TextRange, TextSize};
pub use builder::ModelBuilder;
pub use config::{ParseOptions, STANDARD_FIELD_TYPES};
pub use model::{LocationIndex, Map, Problem, Value, ZdlModel, codes};
pub use names::{DerivedNames, Inflector, NameTransform};
pub use parser::SyntaxError;
pub use semantic::{SymbolKind, SymbolTable, Validator, post_process};

// ============================================================================
// PIPELINE
// ============================================================================

/// Runs the full pipeline: parse, build, post-process, validate.
///
/// Cheap to clone and safe to share between threads.
#[derive(Clone)]
pub struct ZdlParser {
    options: ParseOptions,
    names: Arc<dyn NameTransform>,
}

impl Default for ZdlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ZdlParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZdlParser")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl ZdlParser {
    pub fn new() -> Self {
        Self {
            options: ParseOptions::default(),
            names: Arc::new(Inflector),
        }
    }

    /// Replace the built-in field types.
    pub fn with_standard_field_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.standard_field_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Accept additional field types on top of the standard ones.
    pub fn with_extra_field_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.extra_field_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Use a custom name transform for derived names and CRUD paths.
    pub fn with_name_transform(mut self, names: impl NameTransform + 'static) -> Self {
        self.names = Arc::new(names);
        self
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Build, post-process and validate one source document.
    pub fn parse_model(&self, source: &str) -> ZdlModel {
        self.parse_model_with_errors(source).0
    }

    /// Like [`parse_model`](Self::parse_model), also returning syntax errors.
    ///
    /// Syntax errors never stop modeling: the constructs that did parse are
    /// still built and validated.
    pub fn parse_model_with_errors(&self, source: &str) -> (ZdlModel, Vec<SyntaxError>) {
        let parsed = parser::parse(source);
        for error in &parsed.errors {
            warn!("[PARSE] {:?}: {}", error.range, error.message);
        }

        let line_index = LineIndex::new(source);
        let mut model =
            ModelBuilder::new(line_index, Arc::clone(&self.names)).build(&parsed.syntax());
        post_process(&mut model);
        Validator::new(self.options.clone()).validate(&mut model);

        debug!(
            "[PIPELINE] {} locations, {} problems, {} syntax errors",
            model.locations().len(),
            model.problems().len(),
            parsed.errors.len()
        );
        (model, parsed.errors)
    }
}

/// Run the pipeline over independent documents in parallel.
///
/// Results are in the same order as `sources`.
pub fn parse_models<S>(parser: &ZdlParser, sources: &[S]) -> Vec<ZdlModel>
where
    S: AsRef<str> + Sync,
{
    sources
        .par_iter()
        .map(|source| parser.parse_model(source.as_ref()))
        .collect()
}
