//! Construction context for the model builder.
//!
//! Every scope-bearing construct pushes a [`Frame`] on enter and pops it on
//! exit. Children write into the top frame; a popped frame is stored where
//! its [`Attach`] says.

use crate::model::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Api,
    Plugin,
    Declaration,
    Enum,
    Field,
    NestedField,
    Service,
    LegacyService,
    Aggregate,
    Method,
    Command,
}

/// Where a finished node goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attach {
    /// `<collection>.<name>` at the document root
    Root { collection: String, name: String },
    /// `<key>.<name>` inside the node of the frame below
    Parent { key: &'static str, name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub kind: FrameKind,
    /// Document path of the node, e.g. `entities.Customer.fields.name`
    pub path: String,
    pub node: Map,
    pub attach: Attach,
}

impl Frame {
    pub fn new(kind: FrameKind, path: impl Into<String>, node: Map, attach: Attach) -> Self {
        Self {
            kind,
            path: path.into(),
            node,
            attach,
        }
    }

    /// Top-level collection the node lives under
    pub fn collection(&self) -> &str {
        self.path.split('.').next().unwrap_or_default()
    }

    /// Mutable mapping at `key`, created on first use
    pub fn map_mut(&mut self, key: &str) -> &mut Map {
        let slot = self.node.entry(key.to_string()).or_insert_with(Value::map);
        if !matches!(slot, Value::Map(_)) {
            *slot = Value::map();
        }
        match slot {
            Value::Map(map) => map,
            _ => unreachable!(),
        }
    }

    /// Mutable list at `key`, created on first use
    pub fn list_mut(&mut self, key: &str) -> &mut Vec<Value> {
        let slot = self.node.entry(key.to_string()).or_insert_with(Value::list);
        if !matches!(slot, Value::List(_)) {
            *slot = Value::list();
        }
        match slot {
            Value::List(items) => items,
            _ => unreachable!(),
        }
    }
}

/// Stack of open frames. Misuse is a programming error and panics.
#[derive(Debug, Default)]
pub struct ContextStack {
    frames: Vec<Frame>,
}

impl ContextStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Pop the top frame, which must be of `kind`.
    pub fn pop(&mut self, kind: FrameKind) -> Frame {
        match self.frames.pop() {
            Some(frame) if frame.kind == kind => frame,
            Some(frame) => panic!(
                "exit of {:?} while {:?} `{}` is open",
                kind, frame.kind, frame.path
            ),
            None => panic!("exit of {:?} with no open frame", kind),
        }
    }

    pub fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(kind: FrameKind, path: &str) -> Frame {
        Frame::new(
            kind,
            path,
            Map::new(),
            Attach::Root {
                collection: "entities".to_string(),
                name: "A".to_string(),
            },
        )
    }

    #[test]
    fn test_push_pop_matching_kinds() {
        let mut stack = ContextStack::new();
        stack.push(frame(FrameKind::Declaration, "entities.A"));
        stack.push(frame(FrameKind::Field, "entities.A.fields.name"));
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.top().unwrap().collection(), "entities");

        assert_eq!(stack.pop(FrameKind::Field).path, "entities.A.fields.name");
        assert_eq!(stack.pop(FrameKind::Declaration).path, "entities.A");
        assert!(stack.is_empty());
    }

    #[test]
    #[should_panic(expected = "exit of Field while Declaration")]
    fn test_mismatched_pop_panics() {
        let mut stack = ContextStack::new();
        stack.push(frame(FrameKind::Declaration, "entities.A"));
        stack.pop(FrameKind::Field);
    }

    #[test]
    #[should_panic(expected = "no open frame")]
    fn test_underflow_panics() {
        ContextStack::new().pop(FrameKind::Enum);
    }

    #[test]
    fn test_map_and_list_are_created_on_demand() {
        let mut f = frame(FrameKind::Declaration, "entities.A");
        f.map_mut("options").insert("aggregate".to_string(), Value::Bool(true));
        f.list_mut("optionsList").push(Value::from("x"));
        assert_eq!(f.node["options"].get("aggregate"), Some(&Value::Bool(true)));
        assert_eq!(f.node["optionsList"].as_list().map(Vec::len), Some(1));
    }
}
