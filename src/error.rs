//! # Diagnostics
//!
//! Error types for the spell description lexer and parser.
//!
//! Both channels are non-fatal: malformed tooltip text comes straight out of
//! an imperfectly curated game-data table, so errors are collected into lists
//! alongside a best-effort result instead of aborting.

use crate::span::Span;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// LEX ERROR
// =============================================================================

/// An error produced while tokenizing.
///
/// The lexer skips the offending span and resumes at the next plausible token
/// boundary, so a single typo degrades one fragment rather than the whole
/// tooltip.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message} at byte {offset}")]
pub struct LexError {
    /// Byte offset where scanning failed.
    pub offset: usize,
    /// Human-readable description.
    pub message: String,
}

impl LexError {
    /// Create a new lex error.
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

// =============================================================================
// PARSE ERROR
// =============================================================================

/// A parse error with location information.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{kind} at byte {}", span.start.byte)]
pub struct ParseError {
    /// Error kind with details.
    pub kind: ParseErrorKind,
    /// Source location of the error.
    pub span: Span,
}

impl ParseError {
    /// Create a new parse error.
    pub const fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Create an unexpected token error.
    pub fn unexpected_token(found: &str, expected: &str) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedToken {
                found: found.to_string(),
                expected: expected.to_string(),
            },
            Span::zero(),
        )
    }

    /// Create an unexpected end-of-input error.
    pub fn unexpected_eof(expected: &str) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedEof {
                expected: expected.to_string(),
            },
            Span::zero(),
        )
    }

    /// Attach a span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

// =============================================================================
// PARSE ERROR KIND
// =============================================================================

/// Kinds of parse errors.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ParseErrorKind {
    /// Found a token the grammar does not allow here. `found` is the
    /// token's display form, quotes included.
    #[error("unexpected token {found}, expected {expected}")]
    UnexpectedToken { found: String, expected: String },

    /// Token stream ended mid-rule.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },

    /// Conditional / bracket nesting exceeded the configured limit.
    #[error("nesting depth limit exceeded")]
    DepthExceeded,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_error_display() {
        let error = LexError::new(12, "unterminated custom variable");
        assert_eq!(error.to_string(), "unterminated custom variable at byte 12");
    }

    #[test]
    fn test_unexpected_token_display() {
        let error = ParseError::unexpected_token("']'", "branch content");
        let msg = error.to_string();
        assert!(msg.contains("unexpected token ']'"));
        assert!(msg.contains("branch content"));
    }

    #[test]
    fn test_error_with_span() {
        let error = ParseError::unexpected_eof("']'").with_span(Span::from_bytes(10, 10));
        assert_eq!(error.span.start.byte, 10);
    }
}
