//! # Tokens
//!
//! Token types produced by the spell description lexer.
//!
//! The micro-language is context sensitive, so the token set is split into
//! parallel vocabularies: top-level text, condition predicates, expression
//! blocks and bracketed branch content. The lexer's mode stack decides which
//! vocabulary each character is scanned against, and the parser dispatches on
//! vocabulary membership when it decides how a bracket nests.

use crate::span::{Span, Spanned};
use serde::{Deserialize, Serialize};

// =============================================================================
// TOKEN KIND
// =============================================================================

/// Types of tokens.
///
/// Grouped by the lexer mode that emits them. A `[` at top level and a `[`
/// inside a branch are different kinds on purpose: the parser treats the
/// former as a literal bracket segment and the latter as the opening of a
/// nested bracket group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenKind {
    // Top-level vocabulary
    /// Plain tooltip text.
    Text,
    /// A `$` that starts no recognizable variable.
    Dollar,
    /// Simple variable like `$s1`, `$d`, `$SP` or `$ctrmax1`.
    SimpleVariable,
    /// Custom variable reference like `$<mult>`.
    CustomVariable,
    /// At-variable like `$@spelldesc123` or `$@spellname456`.
    AtVariable,
    /// Cross-spell reference like `$424509s1`.
    CrossSpellRef,
    /// Pluralization like `$lword:words;`.
    Pluralization,
    /// Gender form like `$ghis:her;`.
    Gender,
    /// Color code `|cFFFFFFFF` or reset `|r`.
    ColorCode,
    /// A `|` that is not part of a color code.
    Pipe,
    /// Literal `[` outside any conditional.
    LBracket,
    /// Literal `]` outside any conditional.
    RBracket,
    /// `$?` opening a top-level conditional.
    ConditionalStart,
    /// `${` opening an expression block.
    ExpressionBlockStart,

    // Condition predicate vocabulary
    /// Condition type like `a410673`, `s424509`, `c7` or `pc999`.
    CondType,
    /// Condition function call like `$owb(137219,0)`.
    CondFuncCall,
    /// `|` joining alternative conditions.
    CondPipe,
    /// `[` opening a conditional branch.
    CondLBracket,
    /// `?` chaining a new predicate after an outer conditional branch.
    ChainCondQuestion,
    /// `?` chaining a new predicate after a nested conditional branch.
    CondQuestion,

    // Expression vocabulary
    /// Number literal like `3` or `0.5`.
    ExprNumber,
    /// Bare identifier, only meaningful as a function name.
    ExprIdentifier,
    /// Built-in function like `$cond`, `$gt` or `$max`.
    ExprDollarFunc,
    /// Custom variable inside an expression.
    ExprCustomVar,
    /// At-variable inside an expression.
    ExprAtVar,
    /// Cross-spell reference inside an expression.
    ExprCrossSpellRef,
    /// Simple variable inside an expression.
    ExprSimpleVar,
    /// `+`
    ExprPlus,
    /// `-`
    ExprMinus,
    /// `*`
    ExprStar,
    /// `/`
    ExprSlash,
    /// `(`
    ExprLParen,
    /// `)`
    ExprRParen,
    /// `,`
    ExprComma,
    /// `}` closing an expression block.
    ExpressionBlockEnd,

    // Branch content vocabulary
    /// Plain text inside a branch.
    BranchText,
    /// `[` opening a nested bracket group inside a branch.
    BranchLBracket,
    /// `]` closing a branch or nested bracket group.
    BranchRBracket,
    /// `$?` opening a nested conditional inside a branch.
    BranchConditionalStart,
    /// Custom variable inside a branch.
    BranchCustomVar,
    /// At-variable inside a branch.
    BranchAtVar,
    /// Cross-spell reference inside a branch.
    BranchCrossSpellRef,
    /// Simple variable inside a branch.
    BranchSimpleVar,
    /// Color code inside a branch.
    BranchColorCode,
    /// Stray `|` inside a branch.
    BranchPipe,
    /// Pluralization inside a branch.
    BranchPluralization,
    /// Gender form inside a branch.
    BranchGender,
    /// `${` opening an expression block inside a branch.
    BranchExprBlockStart,

    /// End of input.
    Eof,
}

impl TokenKind {
    /// Check if this kind belongs to the top-level vocabulary.
    pub const fn is_top_level(&self) -> bool {
        matches!(
            self,
            Self::Text
                | Self::Dollar
                | Self::SimpleVariable
                | Self::CustomVariable
                | Self::AtVariable
                | Self::CrossSpellRef
                | Self::Pluralization
                | Self::Gender
                | Self::ColorCode
                | Self::Pipe
                | Self::LBracket
                | Self::RBracket
                | Self::ConditionalStart
                | Self::ExpressionBlockStart
        )
    }

    /// Check if this kind belongs to the branch content vocabulary.
    pub const fn is_branch_content(&self) -> bool {
        matches!(
            self,
            Self::BranchText
                | Self::BranchLBracket
                | Self::BranchRBracket
                | Self::BranchConditionalStart
                | Self::BranchCustomVar
                | Self::BranchAtVar
                | Self::BranchCrossSpellRef
                | Self::BranchSimpleVar
                | Self::BranchColorCode
                | Self::BranchPipe
                | Self::BranchPluralization
                | Self::BranchGender
                | Self::BranchExprBlockStart
        )
    }

}

// =============================================================================
// TOKEN
// =============================================================================

/// A lexical token.
///
/// ## Example
///
/// ```rust
/// use spelldesc_parser::lexer::{Token, TokenKind};
/// use spelldesc_parser::Span;
///
/// let token = Token::new(TokenKind::SimpleVariable, Span::from_bytes(0, 3), "$s1");
/// assert_eq!(token.kind, TokenKind::SimpleVariable);
/// assert_eq!(token.text, "$s1");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Token type.
    pub kind: TokenKind,
    /// Source location.
    pub span: Span,
    /// Original source text.
    pub text: String,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span, text: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            text: text.into(),
        }
    }

    /// Human-readable display for error messages.
    pub fn display(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("'{}'", self.text),
        }
    }
}

impl Spanned for Token {
    fn span(&self) -> Span {
        self.span
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_new() {
        let token = Token::new(TokenKind::CrossSpellRef, Span::from_bytes(0, 9), "$424509s1");
        assert_eq!(token.kind, TokenKind::CrossSpellRef);
        assert_eq!(token.text, "$424509s1");
        assert_eq!(token.span.len(), 9);
    }

    #[test]
    fn test_token_display() {
        let token = Token::new(TokenKind::CondType, Span::from_bytes(2, 9), "a410673");
        assert_eq!(token.display(), "'a410673'");

        let eof = Token::new(TokenKind::Eof, Span::zero(), "");
        assert_eq!(eof.display(), "end of input");
    }

    #[test]
    fn test_vocabulary_membership() {
        assert!(TokenKind::LBracket.is_top_level());
        assert!(!TokenKind::BranchLBracket.is_top_level());
        assert!(TokenKind::BranchLBracket.is_branch_content());
        assert!(TokenKind::BranchRBracket.is_branch_content());
        assert!(!TokenKind::Eof.is_top_level());
    }
}
