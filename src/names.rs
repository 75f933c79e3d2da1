//! Name derivation for declarations.
//!
//! The model builder never cases or pluralizes identifiers itself; it asks a
//! [`NameTransform`]. [`Inflector`] is the default implementation.

use convert_case::{Boundary, Case, Casing, Converter, Pattern};

/// Every name derived from one declaration identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedNames {
    pub class_name: String,
    pub instance_name: String,
    pub class_name_plural: String,
    pub instance_name_plural: String,
    pub kebab_case: String,
    pub kebab_case_plural: String,
    pub snake_case: String,
}

/// Pure string transforms used to derive generated names.
///
/// Implementations must be stateless: the same input always yields the same
/// output, from any thread.
pub trait NameTransform: Send + Sync {
    fn pluralize(&self, word: &str) -> String;

    /// `order item` / `orderItem` → `OrderItem`
    fn class_name(&self, name: &str) -> String;

    /// `OrderItem` → `orderItem`
    fn instance_name(&self, name: &str) -> String;

    /// `OrderItem` → `order-item`
    fn kebab_case(&self, name: &str) -> String;

    /// `OrderItem` → `order_item`
    fn snake_case(&self, name: &str) -> String;

    fn derive(&self, name: &str) -> DerivedNames {
        let class_name = self.class_name(name);
        let instance_name = self.instance_name(&class_name);
        let kebab_case = self.kebab_case(name);
        DerivedNames {
            class_name_plural: self.pluralize(name),
            instance_name_plural: self.pluralize(&instance_name),
            kebab_case_plural: self.pluralize(&kebab_case),
            snake_case: self.snake_case(name),
            class_name,
            instance_name,
            kebab_case,
        }
    }
}

/// Word breaks inside an identifier. Digits stay attached to the word they
/// follow, and an acronym ends before its last capital when a word follows.
const IDENTIFIER_WORDS: &[Boundary] = &[
    Boundary::Underscore,
    Boundary::Hyphen,
    Boundary::LowerUpper,
    Boundary::DigitUpper,
    Boundary::Acronym,
];

/// Explicit separators between the words of a camel-cased name.
const SEPARATORS: &[Boundary] = &[
    Boundary::Underscore,
    Boundary::Hyphen,
    Boundary::Space,
    Boundary::Custom {
        condition: starts_with_dot,
        start: 0,
        len: 1,
    },
];

/// English pluralization plus `convert_case` casing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inflector;

impl NameTransform for Inflector {
    fn pluralize(&self, word: &str) -> String {
        let word = word.trim();
        if word.is_empty() {
            return String::new();
        }
        if ["s", "x", "z", "ch", "sh"].iter().any(|end| word.ends_with(end)) {
            return format!("{}es", word);
        }
        let mut chars = word.chars().rev();
        if let (Some('y'), Some(before)) = (chars.next(), chars.next())
            && !is_vowel(before)
        {
            return format!("{}ies", &word[..word.len() - 1]);
        }
        format!("{}s", word)
    }

    fn class_name(&self, name: &str) -> String {
        camel_case(name, Pattern::Custom(upper_camel_words))
    }

    fn instance_name(&self, name: &str) -> String {
        camel_case(name, Pattern::Custom(lower_camel_words))
    }

    fn kebab_case(&self, name: &str) -> String {
        name.trim().set_boundaries(IDENTIFIER_WORDS).to_case(Case::Kebab)
    }

    fn snake_case(&self, name: &str) -> String {
        name.trim().set_boundaries(IDENTIFIER_WORDS).to_case(Case::Snake)
    }
}

/// Join separated words, recasing only the first character of each.
fn camel_case(name: &str, pattern: Pattern) -> String {
    Converter::new()
        .set_boundaries(SEPARATORS)
        .set_pattern(pattern)
        .set_delimiter("")
        .convert(name.trim())
}

fn upper_camel_words(words: &[&str]) -> Vec<String> {
    words
        .iter()
        .filter(|word| !word.is_empty())
        .map(|word| recase_first(word, char::to_uppercase))
        .collect()
}

fn lower_camel_words(words: &[&str]) -> Vec<String> {
    words
        .iter()
        .filter(|word| !word.is_empty())
        .enumerate()
        .map(|(i, word)| match i {
            0 => recase_first(word, char::to_lowercase),
            _ => recase_first(word, char::to_uppercase),
        })
        .collect()
}

fn recase_first<I>(word: &str, recase: impl Fn(char) -> I) -> String
where
    I: Iterator<Item = char>,
{
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => recase(first).chain(chars).collect(),
        None => String::new(),
    }
}

fn starts_with_dot(graphemes: &[&str]) -> bool {
    graphemes.first() == Some(&".")
}

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}
