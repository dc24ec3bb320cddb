//! # Source Spans
//!
//! Position and span types shared by the lexer, parser and CST.
//! Spans track byte offsets plus line/column for diagnostics.

use serde::{Deserialize, Serialize};

// =============================================================================
// POSITION
// =============================================================================

/// A position in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Byte offset into the source.
    pub byte: usize,
    /// Line (0-indexed).
    pub line: usize,
    /// Column (0-indexed).
    pub column: usize,
}

impl Position {
    /// Create a new position.
    pub const fn new(byte: usize, line: usize, column: usize) -> Self {
        Self { byte, line, column }
    }
}

// =============================================================================
// SPAN
// =============================================================================

/// A half-open source range `[start, end)`.
///
/// ## Example
///
/// ```rust
/// use spelldesc_parser::Span;
///
/// let span = Span::from_bytes(0, 3);
/// assert_eq!(span.len(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start position (inclusive).
    pub start: Position,
    /// End position (exclusive).
    pub end: Position,
}

impl Span {
    /// Create a new span.
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Create a span from byte offsets only (line/column zeroed).
    pub const fn from_bytes(start: usize, end: usize) -> Self {
        Self {
            start: Position::new(start, 0, 0),
            end: Position::new(end, 0, 0),
        }
    }

    /// Zero-width span at the origin.
    pub const fn zero() -> Self {
        Self::from_bytes(0, 0)
    }

    /// Length in bytes.
    pub const fn len(&self) -> usize {
        self.end.byte.saturating_sub(self.start.byte)
    }

    /// Check if the span is empty.
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Smallest span covering both `self` and `other`.
    pub fn join(self, other: Span) -> Span {
        let start = if self.start.byte <= other.start.byte {
            self.start
        } else {
            other.start
        };
        let end = if self.end.byte >= other.end.byte {
            self.end
        } else {
            other.end
        };
        Span::new(start, end)
    }
}

// =============================================================================
// SPANNED
// =============================================================================

/// Anything that knows its source location.
pub trait Spanned {
    fn span(&self) -> Span;
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_len() {
        let span = Span::from_bytes(2, 7);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
    }

    #[test]
    fn test_span_zero() {
        assert!(Span::zero().is_empty());
    }

    #[test]
    fn test_span_join() {
        let a = Span::from_bytes(2, 5);
        let b = Span::from_bytes(4, 9);
        let joined = a.join(b);
        assert_eq!(joined.start.byte, 2);
        assert_eq!(joined.end.byte, 9);
    }
}
