//! Helpers for building models and locating source positions.

use zdl::{ZdlModel, ZdlParser};

/// Runs the default pipeline and asserts the source has no syntax errors.
pub fn model_from(source: &str) -> ZdlModel {
    let (model, errors) = ZdlParser::new().parse_model_with_errors(source);
    assert!(errors.is_empty(), "Parse errors: {:?}", errors);
    model
}

/// `(path, value)` of every problem, in report order.
pub fn problems_of(model: &ZdlModel) -> Vec<(String, String)> {
    model
        .problems()
        .iter()
        .map(|p| (p.path.clone(), p.value.clone()))
        .collect()
}

/// 1-based line and 0-based column of the first occurrence of `needle`.
pub fn position_of(source: &str, needle: &str) -> (usize, usize) {
    let offset = source
        .find(needle)
        .unwrap_or_else(|| panic!("'{}' not found in source", needle));
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let column = before.rfind('\n').map_or(offset, |nl| offset - nl - 1);
    (line, column)
}
