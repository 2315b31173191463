//! Mapping between byte offsets and line/column positions.
//!
//! The index is built once per compilation from the source text and shared
//! by every stage that needs to report positions.

use text_size::{TextRange, TextSize};

use super::position::{Position, Span};

/// A 0-indexed line/column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCol {
    /// 0-indexed line number
    pub line: u32,
    /// 0-indexed column (byte offset within the line)
    pub col: u32,
}

/// Newline table over a source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Offset of the first character of each line (line 0 starts at 0)
    line_starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(TextSize::new(i as u32 + 1));
            }
        }
        Self {
            line_starts,
            len: TextSize::of(text),
        }
    }

    /// Convert a byte offset to a 0-indexed line/column pair.
    ///
    /// Offsets past the end of the text clamp to the last position.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let col = offset - self.line_starts[line];
        LineCol {
            line: line as u32,
            col: col.into(),
        }
    }

    /// Convert a 0-indexed line/column pair back to a byte offset.
    pub fn offset(&self, line_col: LineCol) -> Option<TextSize> {
        let start = *self.line_starts.get(line_col.line as usize)?;
        Some(start + TextSize::new(line_col.col))
    }

    /// Convert a byte range to a line/column [`Span`].
    pub fn span(&self, range: TextRange) -> Span {
        let start = self.line_col(range.start());
        let end = self.line_col(range.end());
        Span::new(
            Position::new(start.line as usize, start.col as usize),
            Position::new(end.line as usize, end.col as usize),
        )
    }

    /// Number of lines in the indexed text.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_single_line() {
        let index = LineIndex::new("hello");
        assert_eq!(index.line_col(TextSize::new(0)), LineCol { line: 0, col: 0 });
        assert_eq!(index.line_col(TextSize::new(3)), LineCol { line: 0, col: 3 });
    }

    #[test]
    fn test_line_col_multi_line() {
        let index = LineIndex::new("ab\ncd\nef");
        assert_eq!(index.line_col(TextSize::new(2)), LineCol { line: 0, col: 2 });
        assert_eq!(index.line_col(TextSize::new(3)), LineCol { line: 1, col: 0 });
        assert_eq!(index.line_col(TextSize::new(7)), LineCol { line: 2, col: 1 });
    }

    #[test]
    fn test_offset_round_trip() {
        let index = LineIndex::new("PROGRAM P\nBEGIN\nEND\n");
        for off in [0u32, 5, 10, 15, 19] {
            let offset = TextSize::new(off);
            let lc = index.line_col(offset);
            assert_eq!(index.offset(lc), Some(offset));
        }
    }

    #[test]
    fn test_clamps_past_end() {
        let index = LineIndex::new("ab");
        assert_eq!(index.line_col(TextSize::new(99)), LineCol { line: 0, col: 2 });
    }
}
