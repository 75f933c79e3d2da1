//! Parser configuration.

/// Field types accepted without a matching declaration.
pub const STANDARD_FIELD_TYPES: &[&str] = &[
    "String",
    "Integer",
    "Long",
    "int",
    "long",
    "BigDecimal",
    "Float",
    "float",
    "Double",
    "double",
    "Enum",
    "Boolean",
    "boolean",
    "Map",
    "LocalDate",
    "LocalDateTime",
    "ZonedDate",
    "ZonedDateTime",
    "Instant",
    "Duration",
    "UUID",
    "byte",
    "byte[]",
    "Blob",
    "AnyBlob",
    "ImageBlob",
    "TextBlob",
];

/// Options controlling how a model is validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Built-in field types; replaces [`STANDARD_FIELD_TYPES`] when set
    pub standard_field_types: Vec<String>,
    /// Additional field types accepted on top of the standard ones
    pub extra_field_types: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            standard_field_types: STANDARD_FIELD_TYPES.iter().map(|s| s.to_string()).collect(),
            extra_field_types: Vec::new(),
        }
    }
}

impl ParseOptions {
    /// Is `type_name` a standard or extra field type?
    pub fn is_standard_type(&self, type_name: &str) -> bool {
        self.standard_field_types.iter().any(|t| t == type_name)
            || self.extra_field_types.iter().any(|t| t == type_name)
    }
}
