//! Byte offset to line/column conversion.

use rustc_hash::FxHashMap;
use text_size::{TextRange, TextSize};

use super::{Position, Span};

/// Maps byte offsets of one source text to 1-based lines and 0-based
/// character columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Offset of the first byte of every line.
    line_starts: Vec<TextSize>,
    /// Multi-byte characters per line, keyed by 0-based line number.
    wide_chars: FxHashMap<u32, Vec<WideChar>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WideChar {
    /// Start offset relative to the line start.
    start: TextSize,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        let mut wide_chars: FxHashMap<u32, Vec<WideChar>> = FxHashMap::default();
        let mut line = 0u32;
        let mut line_start = TextSize::new(0);
        let mut offset = TextSize::new(0);

        for c in text.chars() {
            let len = TextSize::of(c);
            if c == '\n' {
                line += 1;
                line_start = offset + len;
                line_starts.push(line_start);
            } else if c.len_utf8() > 1 {
                wide_chars.entry(line).or_default().push(WideChar {
                    start: offset - line_start,
                    len,
                });
            }
            offset += len;
        }

        Self {
            line_starts,
            wide_chars,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a byte offset into a line/column position
    pub fn position(&self, offset: TextSize) -> Position {
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let byte_col = offset - self.line_starts[line];
        Position::new(line + 1, self.char_column(line as u32, byte_col))
    }

    /// Convert a byte range into a [`Span`]
    pub fn span(&self, range: TextRange) -> Span {
        Span::new(self.position(range.start()), self.position(range.end()), range)
    }

    fn char_column(&self, line: u32, byte_col: TextSize) -> usize {
        let mut col = u32::from(byte_col);
        if let Some(chars) = self.wide_chars.get(&line) {
            for c in chars {
                if c.start >= byte_col {
                    break;
                }
                col -= u32::from(c.len) - 1;
            }
        }
        col as usize
    }
}
