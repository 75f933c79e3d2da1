//! Field classification and symbol collection over a built document.

use tracing::debug;

use super::symbols::{SymbolKind, SymbolTable};
use crate::model::{FIELD_COLLECTIONS, Map, Value, ZdlModel};

/// Classify every field's type and attach the symbol table.
///
/// Sets `isEntity`, `isEnum`, `isInput`, `isOutput`, `isEvent` and
/// `isComplexType` on each field of every entity-like declaration, stores the
/// [`SymbolTable`] on the model and adds `allEntitiesAndEnums`. Running it
/// again recomputes the same result.
pub fn post_process(model: &mut ZdlModel) {
    let symbols = SymbolTable::from_model(model);

    let field_paths: Vec<String> = FIELD_COLLECTIONS
        .iter()
        .flat_map(|collection| model.paths(&format!("{}.*.fields.*", collection)))
        .map(|(path, _)| path)
        .collect();

    for path in &field_paths {
        let Some(Value::Map(field)) = model.get_mut(path) else {
            continue;
        };
        classify(field, &symbols);
    }
    debug!(
        "[POSTPROCESS] classified {} fields against {} symbols",
        field_paths.len(),
        symbols.len()
    );

    let mut all = Map::new();
    for kind in [
        SymbolKind::Aggregate,
        SymbolKind::Entity,
        SymbolKind::Enum,
        SymbolKind::Input,
        SymbolKind::Output,
    ] {
        for (name, node) in model.collection(kind.collection()) {
            all.insert(name.clone(), node.clone());
        }
    }
    model.set_root("allEntitiesAndEnums", Value::Map(all));
    model.set_symbols(symbols);
}

fn classify(field: &mut Map, symbols: &SymbolTable) {
    let type_name = field.get("type").and_then(Value::as_str).map(str::to_string);
    let mut complex = false;
    for kind in SymbolKind::ALL {
        let Some(flag) = kind.field_flag() else { continue };
        let matches = type_name
            .as_deref()
            .is_some_and(|name| symbols.contains(kind, name));
        complex |= matches;
        field.insert(flag.to_string(), Value::Bool(matches));
    }
    field.insert("isComplexType".to_string(), Value::Bool(complex));
}
