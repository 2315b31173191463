//! Line/column coordinates for AST nodes and diagnostics.
//!
//! Everything here is 0-indexed; the driver shifts to the 1-based
//! external convention at the reporting boundary.

use serde::Serialize;

/// A 0-indexed line/column location in a source file.
///
/// The derived ordering is lexicographic (line first, then column),
/// which is exactly source order; the containment checks on [`Span`]
/// lean on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// An inclusive region of source between two positions.
///
/// `Span::default()` is the zero-width span at the start of the file,
/// used by diagnostics that concern the file as a whole.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Whether `position` lies within this span (boundaries included).
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }

    /// Whether `other` lies entirely within this span. Every AST node's
    /// span encloses the spans of all of its children.
    pub fn encloses(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_order_like_source() {
        let early = Position::new(1, 30);
        let late = Position::new(2, 0);
        assert!(early < late);
        assert!(Position::new(2, 0) < Position::new(2, 1));
    }

    #[test]
    fn test_contains_includes_boundaries() {
        let span = Span::new(Position::new(1, 4), Position::new(3, 2));
        assert!(span.contains(Position::new(1, 4)));
        assert!(span.contains(Position::new(2, 99)));
        assert!(span.contains(Position::new(3, 2)));
        assert!(!span.contains(Position::new(1, 3)));
        assert!(!span.contains(Position::new(3, 3)));
    }

    #[test]
    fn test_encloses() {
        let outer = Span::new(Position::new(0, 0), Position::new(10, 0));
        let inner = Span::new(Position::new(2, 1), Position::new(4, 7));
        assert!(outer.encloses(&inner));
        assert!(!inner.encloses(&outer));
        assert!(outer.encloses(&outer));
    }
}
