//! Conversion of syntax leaves into document values.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::model::{Map, Value};
use crate::parser::{ComplexValue, Documented, Literal, Pair, SyntaxKind, ValueNode};

/// A literal token that cannot be represented as its typed value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LiteralError {
    #[error("integer literal out of range: {0}")]
    IntegerOverflow(String),

    #[error("invalid decimal literal `{text}`: {message}")]
    InvalidDecimal { text: String, message: String },
}

/// Typed value of a single literal token.
pub fn parse_literal(kind: SyntaxKind, text: &str) -> Result<Value, LiteralError> {
    match kind {
        SyntaxKind::STRING => Ok(Value::String(unquote(text))),
        SyntaxKind::INTEGER => text
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| LiteralError::IntegerOverflow(text.to_string())),
        SyntaxKind::DECIMAL => Decimal::from_str(text)
            .map(Value::Decimal)
            .map_err(|e| LiteralError::InvalidDecimal {
                text: text.to_string(),
                message: e.to_string(),
            }),
        _ => Ok(match text {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::String(text.to_string()),
        }),
    }
}

/// Coerce a literal node; malformed literals fall back to their raw text.
pub fn literal_value(literal: &Literal) -> Value {
    let Some(token) = literal.token() else {
        return Value::Null;
    };
    match parse_literal(token.kind(), token.text()) {
        Ok(value) => value,
        Err(err) => {
            debug!("keeping raw literal text: {}", err);
            Value::String(token.text().to_string())
        }
    }
}

/// The literal as plain text, with quotes removed from strings.
pub fn literal_text(literal: &Literal) -> String {
    match literal.token() {
        Some(token) if token.kind() == SyntaxKind::STRING => unquote(token.text()),
        Some(token) => token.text().to_string(),
        None => String::new(),
    }
}

pub fn value_node(node: &ValueNode) -> Value {
    match node {
        ValueNode::Literal(literal) => literal_value(literal),
        ValueNode::Object(object) => Value::Map(pairs_map(object.pairs())),
        ValueNode::Array(array) => Value::List(array.values().map(|v| value_node(&v)).collect()),
    }
}

/// Coerce an option, config or annotation value.
pub fn complex_value(value: &ComplexValue) -> Value {
    if let Some(node) = value.value() {
        value_node(&node)
    } else if let Some(array) = value.array_plain() {
        Value::List(array.literals().map(|l| literal_value(&l)).collect())
    } else if let Some(pairs) = value.pairs() {
        Value::Map(pairs_map(pairs.pairs()))
    } else {
        Value::Bool(true)
    }
}

/// Value of an annotation; a bare `@name` means `true`.
pub fn option_value(value: Option<ComplexValue>) -> Value {
    value.map(|v| complex_value(&v)).unwrap_or(Value::Bool(true))
}

fn pairs_map(pairs: impl Iterator<Item = Pair>) -> Map {
    let mut map = Map::new();
    for pair in pairs {
        let Some(key) = pair.key() else { continue };
        let value = pair.value().map(|v| value_node(&v)).unwrap_or(Value::Bool(true));
        map.insert(literal_text(&key), value);
    }
    map
}

/// Strip quotes and resolve backslash escapes.
pub fn unquote(text: &str) -> String {
    let mut chars = text.chars();
    let quote = match chars.next() {
        Some(q @ ('"' | '\'')) => q,
        _ => return text.to_string(),
    };
    let inner = chars.as_str();
    let inner = inner.strip_suffix(quote).unwrap_or(inner);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other @ ('"' | '\'' | '\\')) => out.push(other),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Text of a `/** ... */` comment without delimiters and leading `*`.
pub fn javadoc_text(raw: &str) -> String {
    let body = raw.trim();
    let body = body.strip_prefix("/**").unwrap_or(body);
    let body = body.strip_suffix("*/").unwrap_or(body);
    body.lines()
        .map(|line| {
            let line = line.trim_start();
            let line = line.strip_prefix('*').unwrap_or(line);
            line.strip_prefix(' ').unwrap_or(line).trim_end()
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Leading javadoc of a node
pub fn javadoc_of(node: &impl Documented) -> Option<String> {
    node.javadoc().map(|t| javadoc_text(t.text()))
}

/// Leading javadoc, or the same-line javadoc that follows the node
pub fn any_javadoc_of(node: &impl Documented) -> Option<String> {
    node.javadoc()
        .or_else(|| node.suffix_javadoc())
        .map(|t| javadoc_text(t.text()))
}
