//! The semantic document.
//!
//! [`ZdlModel`] owns the generic [`Value`] tree built from a ZDL source, the
//! [`LocationIndex`] recorded while building it, the [`Problem`]s found by
//! the validator and, after post-processing, a typed [`SymbolTable`].
//!
//! The root mapping always carries the same top-level keys, created once and
//! only ever appended to.

mod location;
pub mod path;
mod problem;
mod value;

pub use location::LocationIndex;
pub use problem::{Problem, codes};
pub use value::{Map, Value};

use crate::base::Span;
use crate::semantic::SymbolTable;

/// Top-level keys of every document, in order.
pub const ROOT_KEYS: &[&str] = &[
    "imports",
    "config",
    "apis",
    "plugins",
    "policies",
    "aggregates",
    "entities",
    "enums",
    "relationships",
    "services",
    "inputs",
    "outputs",
    "events",
    "constants",
];

/// Collections holding entity-like declarations with `fields`.
pub const FIELD_COLLECTIONS: &[&str] = &["entities", "inputs", "outputs", "events"];

#[derive(Debug, Clone, PartialEq)]
pub struct ZdlModel {
    document: Value,
    locations: LocationIndex,
    problems: Vec<Problem>,
    symbols: Option<SymbolTable>,
}

impl Default for ZdlModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ZdlModel {
    pub fn new() -> Self {
        let mut root = Map::new();
        for key in ROOT_KEYS {
            let empty = if *key == "imports" {
                Value::list()
            } else {
                Value::map()
            };
            root.insert(key.to_string(), empty);
        }
        Self {
            document: Value::Map(root),
            locations: LocationIndex::new(),
            problems: Vec::new(),
            symbols: None,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// The document tree, without `locations` and `problems`.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Value at a dotted path; `None` when missing or null.
    pub fn get(&self, path: &str) -> Option<&Value> {
        path::lookup(&self.document, path).filter(|v| !v.is_null())
    }

    pub fn get_or<'a>(&'a self, path: &str, default: &'a Value) -> &'a Value {
        self.get(path).unwrap_or(default)
    }

    /// String at a dotted path
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Every value matched by a query with `*` and `..` segments.
    pub fn get_all(&self, pattern: &str) -> Vec<&Value> {
        path::select(&self.document, pattern)
            .into_iter()
            .map(|(_, value)| value)
            .collect()
    }

    /// Non-null matches of `pattern`, each distinct value once, in match order.
    pub fn get_unique(&self, pattern: &str) -> Vec<&Value> {
        let mut unique: Vec<&Value> = Vec::new();
        for value in self.get_all(pattern) {
            if !value.is_null() && !unique.contains(&value) {
                unique.push(value);
            }
        }
        unique
    }

    /// Like [`get_all`](Self::get_all), with the concrete path of each match.
    pub fn paths(&self, pattern: &str) -> Vec<(String, &Value)> {
        path::select(&self.document, pattern)
    }

    pub(crate) fn get_mut(&mut self, path: &str) -> Option<&mut Value> {
        path::lookup_mut(&mut self.document, path)
    }

    /// A top-level mapping such as `entities` or `services`.
    pub fn collection(&self, key: &str) -> &Map {
        match self.document.get(key) {
            Some(Value::Map(map)) => map,
            _ => unreachable!("`{}` is not a top-level mapping", key),
        }
    }

    pub(crate) fn collection_mut(&mut self, key: &str) -> &mut Map {
        let slot = self
            .root_mut()
            .entry(key.to_string())
            .or_insert_with(Value::map);
        match slot {
            Value::Map(map) => map,
            _ => unreachable!("`{}` is not a top-level mapping", key),
        }
    }

    pub fn entities(&self) -> &Map {
        self.collection("entities")
    }

    pub fn enums(&self) -> &Map {
        self.collection("enums")
    }

    pub fn inputs(&self) -> &Map {
        self.collection("inputs")
    }

    pub fn outputs(&self) -> &Map {
        self.collection("outputs")
    }

    pub fn events(&self) -> &Map {
        self.collection("events")
    }

    pub fn aggregates(&self) -> &Map {
        self.collection("aggregates")
    }

    pub fn services(&self) -> &Map {
        self.collection("services")
    }

    pub fn relationships(&self) -> &Map {
        self.collection("relationships")
    }

    pub fn apis(&self) -> &Map {
        self.collection("apis")
    }

    pub fn imports(&self) -> &[Value] {
        match self.document.get("imports") {
            Some(Value::List(items)) => items,
            _ => &[],
        }
    }

    pub(crate) fn push_import(&mut self, value: Value) {
        let slot = self
            .root_mut()
            .entry("imports".to_string())
            .or_insert_with(Value::list);
        if let Value::List(items) = slot {
            items.push(value);
        }
    }

    /// Set a top-level key outside the fixed collections
    pub(crate) fn set_root(&mut self, key: &str, value: Value) {
        self.root_mut().insert(key.to_string(), value);
    }

    fn root_mut(&mut self) -> &mut Map {
        match &mut self.document {
            Value::Map(map) => map,
            _ => unreachable!("document root is always a mapping"),
        }
    }

    // ========================================================================
    // Locations
    // ========================================================================

    pub fn locations(&self) -> &LocationIndex {
        &self.locations
    }

    pub fn set_location(&mut self, path: impl Into<String>, span: Span) {
        self.locations.record(path, span);
    }

    pub fn location(&self, path: &str) -> Option<Span> {
        self.locations.get(path)
    }

    /// Innermost recorded path at a 1-based line and 0-based column.
    pub fn resolve_location(&self, line: usize, column: usize) -> Option<&str> {
        self.locations.resolve(line, column)
    }

    // ========================================================================
    // Problems
    // ========================================================================

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn clear_problems(&mut self) {
        self.problems.clear();
    }

    /// Record a problem at `path`, with the location recorded for that path.
    pub fn add_problem(&mut self, code: &'static str, path: &str, value: Option<&str>, template: &str) {
        let location = self.location(path);
        self.problems
            .push(Problem::new(code, path, value, template, location));
    }

    // ========================================================================
    // Symbols
    // ========================================================================

    /// Symbol table built by post-processing
    pub fn symbols(&self) -> Option<&SymbolTable> {
        self.symbols.as_ref()
    }

    pub(crate) fn set_symbols(&mut self, symbols: SymbolTable) {
        self.symbols = Some(symbols);
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// The full document with `locations` and `problems` materialized.
    ///
    /// A location is `[startOffset, endOffset, startLine, startCol, endLine, endCol]`.
    pub fn to_value(&self) -> Value {
        let mut root = self.document.as_map().cloned().unwrap_or_default();

        let mut locations = Map::new();
        for (path, span) in self.locations.iter() {
            locations.insert(path.to_string(), span_value(&span));
        }
        root.insert("locations".to_string(), Value::Map(locations));

        let problems = self
            .problems
            .iter()
            .map(|problem| {
                let mut map = Map::new();
                map.insert("path".to_string(), Value::from(problem.path.as_str()));
                map.insert(
                    "location".to_string(),
                    problem.location.as_ref().map(span_value).into(),
                );
                map.insert("value".to_string(), Value::from(problem.value.as_str()));
                map.insert("message".to_string(), Value::from(problem.message.as_str()));
                map.insert("code".to_string(), Value::from(problem.code));
                Value::Map(map)
            })
            .collect::<Vec<_>>();
        root.insert("problems".to_string(), Value::List(problems));

        Value::Map(root)
    }

    #[cfg(feature = "json")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.to_value())
    }
}

fn span_value(span: &Span) -> Value {
    let numbers = [
        u32::from(span.start_offset()) as i64,
        u32::from(span.end_offset()) as i64,
        span.start.line as i64,
        span.start.column as i64,
        span.end.line as i64,
        span.end.column as i64,
    ];
    Value::List(numbers.into_iter().map(Value::Int).collect())
}
