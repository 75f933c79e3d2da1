//! Declared names, grouped by kind.

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use crate::model::{Value, ZdlModel};

/// Kind of a named top-level declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolKind {
    Entity,
    Enum,
    Input,
    Output,
    Event,
    Aggregate,
}

impl SymbolKind {
    pub const ALL: [SymbolKind; 6] = [
        SymbolKind::Entity,
        SymbolKind::Enum,
        SymbolKind::Input,
        SymbolKind::Output,
        SymbolKind::Event,
        SymbolKind::Aggregate,
    ];

    /// Document collection holding declarations of this kind
    pub fn collection(self) -> &'static str {
        match self {
            SymbolKind::Entity => "entities",
            SymbolKind::Enum => "enums",
            SymbolKind::Input => "inputs",
            SymbolKind::Output => "outputs",
            SymbolKind::Event => "events",
            SymbolKind::Aggregate => "aggregates",
        }
    }

    /// Field flag set when a field's type names a declaration of this kind
    pub fn field_flag(self) -> Option<&'static str> {
        match self {
            SymbolKind::Entity => Some("isEntity"),
            SymbolKind::Enum => Some("isEnum"),
            SymbolKind::Input => Some("isInput"),
            SymbolKind::Output => Some("isOutput"),
            SymbolKind::Event => Some("isEvent"),
            SymbolKind::Aggregate => None,
        }
    }
}

/// Name sets of every declaration kind, plus the combined
/// entities/enums/inputs/outputs lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    by_kind: FxHashMap<SymbolKind, FxHashSet<SmolStr>>,
    /// Entities marked `@aggregate`
    aggregate_entities: FxHashSet<SmolStr>,
    /// Name → kind, entities then enums, inputs and outputs; later kinds win
    combined: FxHashMap<SmolStr, SymbolKind>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the declarations currently present in `model`.
    pub fn from_model(model: &ZdlModel) -> Self {
        let mut table = Self::new();
        for kind in SymbolKind::ALL {
            for (name, node) in model.collection(kind.collection()) {
                table.insert(kind, name);
                if kind == SymbolKind::Entity
                    && node
                        .get("options")
                        .and_then(|o| o.get("aggregate"))
                        .is_some_and(Value::is_true)
                {
                    table.aggregate_entities.insert(SmolStr::new(name));
                }
            }
        }
        table
    }

    pub fn insert(&mut self, kind: SymbolKind, name: &str) {
        let name = SmolStr::new(name);
        if matches!(
            kind,
            SymbolKind::Entity | SymbolKind::Enum | SymbolKind::Input | SymbolKind::Output
        ) {
            self.combined.insert(name.clone(), kind);
        }
        self.by_kind.entry(kind).or_default().insert(name);
    }

    pub fn contains(&self, kind: SymbolKind, name: &str) -> bool {
        self.by_kind.get(&kind).is_some_and(|names| names.contains(name))
    }

    /// Kinds declaring `name`, in [`SymbolKind::ALL`] order
    pub fn kinds_of(&self, name: &str) -> Vec<SymbolKind> {
        SymbolKind::ALL
            .into_iter()
            .filter(|kind| self.contains(*kind, name))
            .collect()
    }

    pub fn is_entity(&self, name: &str) -> bool {
        self.contains(SymbolKind::Entity, name)
    }

    pub fn is_enum(&self, name: &str) -> bool {
        self.contains(SymbolKind::Enum, name)
    }

    pub fn is_input(&self, name: &str) -> bool {
        self.contains(SymbolKind::Input, name)
    }

    pub fn is_output(&self, name: &str) -> bool {
        self.contains(SymbolKind::Output, name)
    }

    pub fn is_event(&self, name: &str) -> bool {
        self.contains(SymbolKind::Event, name)
    }

    /// A declared aggregate, or an entity marked `@aggregate`.
    pub fn is_aggregate(&self, name: &str) -> bool {
        self.contains(SymbolKind::Aggregate, name) || self.aggregate_entities.contains(name)
    }

    /// Kind recorded for `name` in the combined lookup.
    pub fn lookup(&self, name: &str) -> Option<SymbolKind> {
        self.combined.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_kind.values().map(FxHashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
