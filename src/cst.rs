//! # Concrete Syntax Tree (CST)
//!
//! Typed CST for parsed spell descriptions. One type per grammar rule;
//! grammar alternatives are enum variants. Token leaves keep their source
//! text, so the original description is recoverable from the tree.
//!
//! Enums serialize with a `"type"` tag and camelCase variant names, matching
//! the wire shape tooltip renderers consume.
//!
//! ## Example
//!
//! ```rust
//! let result = spelldesc_parser::parse("Deals $s1 damage.");
//! assert!(result.is_ok());
//! assert_eq!(result.root.segments.len(), 3);
//! ```

use crate::error::{LexError, ParseError};
use crate::lexer::Token;
use crate::span::{Span, Spanned};
use serde::{Deserialize, Serialize};

// =============================================================================
// PARSE RESULT
// =============================================================================

/// Result of parsing a description.
///
/// Contains the root node plus any lex and parse errors. With recovery
/// enabled the root is always present, possibly covering only part of the
/// input.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Root node of the syntax tree.
    pub root: Description,
    /// Parse errors encountered.
    pub errors: Vec<ParseError>,
    /// Lex errors encountered before parsing.
    pub lex_errors: Vec<LexError>,
}

impl ParseResult {
    /// Create a new parse result.
    pub fn new(root: Description, errors: Vec<ParseError>, lex_errors: Vec<LexError>) -> Self {
        Self {
            root,
            errors,
            lex_errors,
        }
    }

    /// Check if parsing was successful (no errors on either channel).
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty() && self.lex_errors.is_empty()
    }
}

// =============================================================================
// DESCRIPTION
// =============================================================================

/// Root node: a whole tooltip description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Description {
    /// Source span.
    pub span: Span,
    /// Top-level segments in source order.
    pub segments: Vec<Segment>,
}

/// A top-level segment of a description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Segment {
    /// `${...}` arithmetic block.
    ExpressionBlock(ExpressionBlock),
    /// `$<name>` reference to a spell-defined variable.
    CustomVariable(Token),
    /// `$@spelldesc123` style embed.
    AtVariable(Token),
    /// `$?...[...]...` conditional.
    Conditional(Conditional),
    /// `$lword:words;`
    Pluralization(Token),
    /// `$ghis:her;`
    Gender(Token),
    /// `$424509s1` reference into another spell.
    CrossSpellRef(Token),
    /// `$s1`, `$d`, `$SP` and friends.
    SimpleVariable(Token),
    /// Lone `$`.
    Dollar(Token),
    /// `|cFFFFFFFF` or `|r`.
    ColorCode(Token),
    /// Stray `|`.
    Pipe(Token),
    /// Literal `[`.
    LBracket(Token),
    /// Literal `]`.
    RBracket(Token),
    /// Plain text.
    Text(Token),
}

// =============================================================================
// CONDITIONALS
// =============================================================================

/// A top-level conditional.
///
/// `tail` preserves source order: zero or more chained `?predicate[branch]`
/// arms followed by at most one unmarked `[else]`. First matching predicate
/// wins at render time, so order matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conditional {
    pub span: Span,
    pub predicate: ConditionPredicate,
    pub true_branch: ConditionalBranch,
    pub tail: Vec<ConditionalTail>,
}

/// A continuation of a conditional after its first branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ConditionalTail {
    /// `?predicate[branch]`
    Chained(ChainedBranch),
    /// `[fallback]`
    Else(ElseBranch),
}

/// A chained `?predicate[branch]` arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainedBranch {
    pub span: Span,
    pub predicate: ConditionPredicate,
    pub branch: ConditionalBranch,
}

/// A predicate: one or more atoms joined by `|` (logical OR).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionPredicate {
    pub span: Span,
    pub conditions: Vec<PredicateAtom>,
}

/// A single condition inside a predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PredicateAtom {
    /// `$owb(137219,0)` style function check.
    FuncCall(Token),
    /// `a410673`, `s424509`, `c7`, `pc999` style typed check.
    CondType(Token),
}

/// The `[...]` branch taken when a predicate holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalBranch {
    pub span: Span,
    pub content: Vec<BranchContent>,
}

/// The unmarked `[...]` fallback of a top-level conditional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElseBranch {
    pub span: Span,
    pub content: Vec<BranchContent>,
}

/// Content allowed inside a branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BranchContent {
    /// Plain text.
    Text(Token),
    /// `$<name>`
    CustomVariable(Token),
    /// `$@name`
    AtVariable(Token),
    /// `$424509s1`
    CrossSpellRef(Token),
    /// `$s1` and friends.
    SimpleVariable(Token),
    /// `|cFFFFFFFF` or `|r`.
    ColorCode(Token),
    /// Stray `|`.
    Pipe(Token),
    /// `$lword:words;`
    Pluralization(Token),
    /// `$ghis:her;`
    Gender(Token),
    /// `${...}`
    ExpressionBlock(ExpressionBlock),
    /// A nested `$?...` conditional.
    Conditional(NestedConditional),
    /// Plain nested `[...]` group.
    NestedBrackets(NestedBrackets),
}

/// A `[...]` group inside a branch with no predicate attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedBrackets {
    pub span: Span,
    pub content: Vec<BranchContent>,
}

/// A conditional nested inside branch content.
///
/// Unlike the top-level form its trailing fallback reuses the conditional
/// branch shape rather than a distinct else node; the grammar marks the two
/// positions with different bracket tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedConditional {
    pub span: Span,
    pub predicate: ConditionPredicate,
    pub true_branch: ConditionalBranch,
    pub tail: Vec<NestedTail>,
}

/// A continuation of a nested conditional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NestedTail {
    /// `?predicate[branch]`
    Chained(ChainedBranch),
    /// Unmarked trailing `[branch]`.
    Trailing(ConditionalBranch),
}

// =============================================================================
// EXPRESSIONS
// =============================================================================

/// A `${...}` block wrapping one arithmetic expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionBlock {
    pub span: Span,
    pub expression: Expression,
}

/// An arithmetic expression inside `${...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Expression {
    /// `a + b`, `a * b`, ...
    Binary(BinaryExpression),
    /// `-a`
    Unary(UnaryExpression),
    /// `$cond(...)`, `$gt(...)`, ...
    DollarFunctionCall(FunctionCall),
    /// Bare-identifier call like `abs(...)`.
    FunctionCall(FunctionCall),
    /// `(...)`
    Paren(ParenExpression),
    /// `$<name>`
    CustomVariable(Token),
    /// `$@name`
    AtVariable(Token),
    /// `$424509s1`
    CrossSpellRef(Token),
    /// `$s1` and friends.
    SimpleVariable(Token),
    /// Numeric literal.
    Number(NumberLiteral),
}

/// A binary operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpression {
    pub span: Span,
    pub left: Box<Expression>,
    pub operator: BinaryOperator,
    pub right: Box<Expression>,
}

/// Binary operators, conventional precedence (`*` `/` over `+` `-`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
}

/// A unary operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpression {
    pub span: Span,
    pub operator: UnaryOperator,
    pub operand: Box<Expression>,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnaryOperator {
    Neg,
}

/// A function call, either `$func(...)` or `name(...)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub span: Span,
    pub name: Token,
    pub args: Vec<Expression>,
}

/// A parenthesized expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParenExpression {
    pub span: Span,
    pub expression: Box<Expression>,
}

/// A numeric literal with its parsed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberLiteral {
    pub span: Span,
    pub value: f64,
}

// =============================================================================
// SPANNED IMPLS
// =============================================================================

impl Spanned for Description {
    fn span(&self) -> Span {
        self.span
    }
}

impl Spanned for Segment {
    fn span(&self) -> Span {
        match self {
            Self::ExpressionBlock(n) => n.span,
            Self::Conditional(n) => n.span,
            Self::CustomVariable(t)
            | Self::AtVariable(t)
            | Self::Pluralization(t)
            | Self::Gender(t)
            | Self::CrossSpellRef(t)
            | Self::SimpleVariable(t)
            | Self::Dollar(t)
            | Self::ColorCode(t)
            | Self::Pipe(t)
            | Self::LBracket(t)
            | Self::RBracket(t)
            | Self::Text(t) => t.span,
        }
    }
}

impl Spanned for Conditional {
    fn span(&self) -> Span {
        self.span
    }
}

impl Spanned for BranchContent {
    fn span(&self) -> Span {
        match self {
            Self::ExpressionBlock(n) => n.span,
            Self::Conditional(n) => n.span,
            Self::NestedBrackets(n) => n.span,
            Self::Text(t)
            | Self::CustomVariable(t)
            | Self::AtVariable(t)
            | Self::CrossSpellRef(t)
            | Self::SimpleVariable(t)
            | Self::ColorCode(t)
            | Self::Pipe(t)
            | Self::Pluralization(t)
            | Self::Gender(t) => t.span,
        }
    }
}

impl Spanned for Expression {
    fn span(&self) -> Span {
        match self {
            Self::Binary(n) => n.span,
            Self::Unary(n) => n.span,
            Self::DollarFunctionCall(n) | Self::FunctionCall(n) => n.span,
            Self::Paren(n) => n.span,
            Self::Number(n) => n.span,
            Self::CustomVariable(t)
            | Self::AtVariable(t)
            | Self::CrossSpellRef(t)
            | Self::SimpleVariable(t) => t.span,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind;

    fn token(kind: TokenKind, text: &str) -> Token {
        Token::new(kind, Span::from_bytes(0, text.len()), text)
    }

    #[test]
    fn test_segment_serializes_type_tagged() {
        let segment = Segment::Text(token(TokenKind::Text, "Deals "));
        let json = serde_json::to_value(&segment).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["text"], "Deals ");
    }

    #[test]
    fn test_enum_variants_camel_cased() {
        let segment = Segment::CrossSpellRef(token(TokenKind::CrossSpellRef, "$424509s1"));
        let json = serde_json::to_value(&segment).unwrap();
        assert_eq!(json["type"], "crossSpellRef");

        let atom = PredicateAtom::FuncCall(token(TokenKind::CondFuncCall, "$owb(1,0)"));
        let json = serde_json::to_value(&atom).unwrap();
        assert_eq!(json["type"], "funcCall");
    }

    #[test]
    fn test_segment_span() {
        let segment = Segment::SimpleVariable(token(TokenKind::SimpleVariable, "$s1"));
        assert_eq!(segment.span().len(), 3);
    }

    #[test]
    fn test_parse_result_is_ok() {
        let root = Description {
            span: Span::zero(),
            segments: Vec::new(),
        };
        assert!(ParseResult::new(root.clone(), Vec::new(), Vec::new()).is_ok());

        let with_lex_error = ParseResult::new(
            root,
            Vec::new(),
            vec![crate::error::LexError::new(0, "boom")],
        );
        assert!(!with_lex_error.is_ok());
    }
}
