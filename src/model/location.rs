//! Path → span index with innermost-span resolution.

use std::cmp::Reverse;

use indexmap::IndexMap;

use crate::base::{Position, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Recorded {
    span: Span,
    seq: u64,
}

/// Spans recorded per logical document path.
///
/// Re-recording a path overwrites its span and makes it the most recent
/// entry for tie-breaking, while keeping its original position in
/// iteration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationIndex {
    entries: IndexMap<String, Recorded>,
    next_seq: u64,
}

impl LocationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, path: impl Into<String>, span: Span) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(path.into(), Recorded { span, seq });
    }

    pub fn get(&self, path: &str) -> Option<Span> {
        self.entries.get(path).map(|r| r.span)
    }

    /// Innermost path whose span contains `(line, column)`.
    ///
    /// Lines are 1-based, columns 0-based. Among containing spans the one
    /// with the smallest extent wins; equal extents go to the path recorded
    /// last.
    pub fn resolve(&self, line: usize, column: usize) -> Option<&str> {
        self.entries
            .iter()
            .filter(|(_, r)| r.span.contains(Position::new(line, column)))
            .min_by_key(|(_, r)| (r.span.len(), Reverse(r.seq)))
            .map(|(path, _)| path.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Span)> {
        self.entries.iter().map(|(path, r)| (path.as_str(), r.span))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::TextRange;

    fn span(sl: usize, sc: usize, el: usize, ec: usize, start: u32, end: u32) -> Span {
        Span::from_coords(sl, sc, el, ec, TextRange::new(start.into(), end.into()))
    }

    #[test]
    fn test_resolve_picks_smallest_enclosing() {
        let mut index = LocationIndex::new();
        index.record("entities.A", span(1, 0, 3, 1, 0, 40));
        index.record("entities.A.fields.name", span(2, 2, 2, 20, 12, 30));
        index.record("entities.A.fields.name.type", span(2, 7, 2, 13, 17, 23));

        assert_eq!(index.resolve(2, 9), Some("entities.A.fields.name.type"));
        assert_eq!(index.resolve(2, 3), Some("entities.A.fields.name"));
        assert_eq!(index.resolve(3, 0), Some("entities.A"));
        assert_eq!(index.resolve(5, 0), None);
    }

    #[test]
    fn test_resolve_tie_goes_to_most_recent() {
        let mut index = LocationIndex::new();
        index.record("a", span(1, 0, 1, 5, 0, 5));
        index.record("b", span(1, 0, 1, 5, 0, 5));
        assert_eq!(index.resolve(1, 2), Some("b"));

        index.record("a", span(1, 0, 1, 5, 0, 5));
        assert_eq!(index.resolve(1, 2), Some("a"));
        // overwrite keeps the first insertion position
        let paths: Vec<_> = index.iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["a", "b"]);
    }

    #[test]
    fn test_resolve_boundaries_are_inclusive() {
        let mut index = LocationIndex::new();
        index.record("x", span(1, 4, 1, 8, 4, 8));
        assert_eq!(index.resolve(1, 4), Some("x"));
        assert_eq!(index.resolve(1, 8), Some("x"));
        assert_eq!(index.resolve(1, 9), None);
    }
}
