//! # Spell Description Parser (Pure Rust)
//!
//! A pure Rust parser for WoW spell description tooltip text.
//! No game-data dependencies - parsing never touches spell tables.
//!
//! Descriptions mix plain text with a `$`-prefixed micro-language:
//! variables (`$s1`, `$d`, `$SP`), cross-spell references (`$424509s1`),
//! conditionals (`$?a123[...][...]`), arithmetic blocks (`${$s1*2}`),
//! pluralization (`$lpoint:points;`) and color codes (`|cFFFFFFFF`).
//! The parser produces a typed CST with full source spans and collects
//! errors instead of failing, since live game data contains malformed
//! strings.
//!
//! ## Example
//!
//! ```rust
//! use spelldesc_parser::{parse, Segment};
//!
//! let result = parse("Deals $s1 Arcane damage over $d.");
//! assert!(result.is_ok());
//! assert!(matches!(result.root.segments[1], Segment::SimpleVariable(_)));
//! ```
//!
//! Each call to [`parse`] builds its own lexer and parser, so calls are
//! independent and can run concurrently over different inputs.

pub mod analysis;
pub mod cst;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod span;

pub use analysis::{analyze, Dependencies};
pub use cst::{
    BinaryExpression, BinaryOperator, BranchContent, ChainedBranch, ConditionPredicate,
    Conditional, ConditionalBranch, ConditionalTail, Description, ElseBranch, Expression,
    ExpressionBlock, FunctionCall, NestedBrackets, NestedConditional, NestedTail, NumberLiteral,
    ParenExpression, ParseResult, PredicateAtom, Segment, UnaryExpression, UnaryOperator,
};
pub use error::{LexError, ParseError, ParseErrorKind};
pub use lexer::{LexResult, Lexer, Token, TokenKind};
pub use parser::{ParseOptions, Parser};
pub use span::{Position, Span, Spanned};

/// Tokenize description text without parsing it.
///
/// ## Example
///
/// ```rust
/// let result = spelldesc_parser::tokenize("$?a123[x][y]");
/// assert!(result.errors.is_empty());
/// ```
pub fn tokenize(input: &str) -> LexResult {
    Lexer::new(input).tokenize()
}

/// Parse description text with default options.
pub fn parse(input: &str) -> ParseResult {
    parse_with_options(input, ParseOptions::default())
}

/// Parse description text with explicit options.
///
/// ## Example
///
/// ```rust
/// use spelldesc_parser::ParseOptions;
///
/// let options = ParseOptions { recovery: false, max_depth: 8 };
/// let result = spelldesc_parser::parse_with_options("${1+2}", options);
/// assert!(result.is_ok());
/// ```
pub fn parse_with_options(input: &str, options: ParseOptions) -> ParseResult {
    let lexed = Lexer::new(input).tokenize();
    let (root, errors) = Parser::with_options(lexed.tokens, options).parse();
    ParseResult::new(root, errors, lexed.errors)
}

// =============================================================================
// TESTS
// =============================================================================
