//! # Spell Description Parser
//!
//! Recursive descent parser for spell description tokens.
//! Produces a typed Concrete Syntax Tree (CST).
//!
//! Every parse consumes its own `Parser` value; nothing is shared between
//! calls, so parsing different descriptions concurrently needs no locking.
//! The grammar is written so no alternative needs more than three tokens of
//! lookahead, and recursion is bounded by a configurable depth limit rather
//! than a backtracking budget.
//!
//! ## Example
//!
//! ```rust
//! let result = spelldesc_parser::parse("Deals $s1 Arcane damage.");
//! assert!(result.is_ok());
//! ```

mod conditionals;
mod expressions;

use crate::cst::{Description, Segment};
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{Token, TokenKind};
use crate::span::Span;

// =============================================================================
// PARSE OPTIONS
// =============================================================================

/// Knobs controlling parser behavior.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Record errors and resynchronize instead of stopping at the first one.
    pub recovery: bool,
    /// Maximum nesting depth for conditionals, bracket groups and
    /// expressions before a `DepthExceeded` error is reported.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            recovery: true,
            max_depth: 64,
        }
    }
}

// =============================================================================
// PARSER
// =============================================================================

/// Recursive descent parser over a token stream.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    errors: Vec<ParseError>,
    options: ParseOptions,
    depth: usize,
}

impl Parser {
    /// Create a parser with default options.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_options(tokens, ParseOptions::default())
    }

    /// Create a parser with explicit options.
    ///
    /// The token list normally ends with the lexer's `Eof` token; if it does
    /// not (hand-built or truncated lists), a sentinel is appended so token
    /// access never runs off the end.
    pub fn with_options(mut tokens: Vec<Token>, options: ParseOptions) -> Self {
        if tokens.last().map_or(true, |t| t.kind != TokenKind::Eof) {
            let end = tokens.last().map_or(Span::zero(), |t| {
                Span::new(t.span.end, t.span.end)
            });
            tokens.push(Token::new(TokenKind::Eof, end, ""));
        }
        Self {
            tokens,
            current: 0,
            errors: Vec::new(),
            options,
            depth: 0,
        }
    }

    /// Parse the token stream into a description.
    ///
    /// Always returns a root node; with recovery enabled it covers as much
    /// of the input as could be understood.
    pub fn parse(mut self) -> (Description, Vec<ParseError>) {
        let start = self.peek().span;
        let mut segments = Vec::new();

        while !self.at_eof() {
            match self.parse_segment() {
                Ok(segment) => segments.push(segment),
                Err(error) => {
                    self.errors.push(error);
                    if self.options.recovery {
                        self.synchronize();
                    } else {
                        break;
                    }
                }
            }
        }

        let span = self.span_from(start);
        (Description { span, segments }, self.errors)
    }

    // =========================================================================
    // SEGMENTS
    // =========================================================================

    fn parse_segment(&mut self) -> Result<Segment, ParseError> {
        match self.peek().kind {
            TokenKind::Text => Ok(Segment::Text(self.advance())),
            TokenKind::Dollar => Ok(Segment::Dollar(self.advance())),
            TokenKind::SimpleVariable => Ok(Segment::SimpleVariable(self.advance())),
            TokenKind::CustomVariable => Ok(Segment::CustomVariable(self.advance())),
            TokenKind::AtVariable => Ok(Segment::AtVariable(self.advance())),
            TokenKind::CrossSpellRef => Ok(Segment::CrossSpellRef(self.advance())),
            TokenKind::Pluralization => Ok(Segment::Pluralization(self.advance())),
            TokenKind::Gender => Ok(Segment::Gender(self.advance())),
            TokenKind::ColorCode => Ok(Segment::ColorCode(self.advance())),
            TokenKind::Pipe => Ok(Segment::Pipe(self.advance())),
            TokenKind::LBracket => Ok(Segment::LBracket(self.advance())),
            TokenKind::RBracket => Ok(Segment::RBracket(self.advance())),
            TokenKind::ConditionalStart => {
                Ok(Segment::Conditional(self.parse_conditional()?))
            }
            TokenKind::ExpressionBlockStart => {
                Ok(Segment::ExpressionBlock(self.parse_expression_block()?))
            }
            _ => Err(self.unexpected("a description segment")),
        }
    }

    // =========================================================================
    // TOKEN ACCESS
    // =========================================================================

    /// Current token without consuming it.
    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    /// Token one ahead of current.
    pub(crate) fn peek_next(&self) -> &Token {
        &self.tokens[(self.current + 1).min(self.tokens.len() - 1)]
    }

    /// Check the current token's kind.
    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// Consume and return the current token.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.at_eof() {
            self.current += 1;
        }
        token
    }

    /// The most recently consumed token.
    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    /// Consume a token of the given kind or report what was expected.
    pub(crate) fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        Err(self.unexpected(expected))
    }

    /// Error for the current token, worded via its display form so end of
    /// input never reads as an empty token.
    pub(crate) fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        if token.kind == TokenKind::Eof {
            ParseError::unexpected_eof(expected).with_span(token.span)
        } else {
            ParseError::unexpected_token(&token.display(), expected).with_span(token.span)
        }
    }

    /// Span from a start point through the last consumed token.
    pub(crate) fn span_from(&self, start: Span) -> Span {
        if self.current == 0 {
            start
        } else {
            start.join(self.previous().span)
        }
    }

    // =========================================================================
    // RECOVERY
    // =========================================================================

    /// Skip ahead to the next token usable at top level.
    ///
    /// Always makes progress, so the parse loop terminates even on garbage.
    /// The depth counter resets since every open construct was abandoned.
    fn synchronize(&mut self) {
        if !self.at_eof() {
            self.current += 1;
        }
        while !self.at_eof() && !self.peek().kind.is_top_level() {
            self.current += 1;
        }
        self.depth = 0;
    }

    // =========================================================================
    // DEPTH GUARD
    // =========================================================================

    /// Enter a nested construct, failing once the depth limit is hit.
    ///
    /// Callers pair this with `exit` on their success path; error paths
    /// abandon the construct entirely and `synchronize` resets the counter.
    pub(crate) fn enter(&mut self, span: Span) -> Result<(), ParseError> {
        if self.depth >= self.options.max_depth {
            return Err(ParseError::new(ParseErrorKind::DepthExceeded, span));
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::BranchContent;
    use crate::lexer::Lexer;

    fn parse(source: &str) -> (Description, Vec<ParseError>) {
        let lexed = Lexer::new(source).tokenize();
        assert!(lexed.errors.is_empty(), "lex errors: {:?}", lexed.errors);
        Parser::new(lexed.tokens).parse()
    }

    #[test]
    fn test_parse_empty() {
        let (root, errors) = parse("");
        assert!(errors.is_empty());
        assert!(root.segments.is_empty());
    }

    #[test]
    fn test_empty_token_vector() {
        let (root, errors) = Parser::new(Vec::new()).parse();
        assert!(errors.is_empty());
        assert!(root.segments.is_empty());
    }

    #[test]
    fn test_tokens_without_eof_sentinel() {
        let tokens = vec![Token::new(
            TokenKind::Text,
            Span::from_bytes(0, 5),
            "Deals",
        )];
        let (root, errors) = Parser::new(tokens).parse();
        assert!(errors.is_empty());
        assert_eq!(root.segments.len(), 1);
    }

    #[test]
    fn test_parse_text_and_variables() {
        let (root, errors) = parse("Deals $s1 damage to $424509s2 targets.");
        assert!(errors.is_empty());
        assert_eq!(root.segments.len(), 5);
        assert!(matches!(root.segments[1], Segment::SimpleVariable(_)));
        assert!(matches!(root.segments[3], Segment::CrossSpellRef(_)));
    }

    #[test]
    fn test_parse_literal_brackets() {
        let (root, errors) = parse("Casting [Moonfire] helps.");
        assert!(errors.is_empty());
        assert!(matches!(root.segments[1], Segment::LBracket(_)));
        assert!(matches!(root.segments[3], Segment::RBracket(_)));
    }

    #[test]
    fn test_parse_conditional_with_else() {
        let (root, errors) = parse("$?a123[with aura][without]");
        assert!(errors.is_empty());
        assert_eq!(root.segments.len(), 1);
        let Segment::Conditional(cond) = &root.segments[0] else {
            panic!("expected conditional");
        };
        assert_eq!(cond.predicate.conditions.len(), 1);
        assert_eq!(cond.tail.len(), 1);
    }

    #[test]
    fn test_parse_nested_conditional() {
        let (root, errors) = parse("$?a1[x$?a2[y][z]][e]");
        assert!(errors.is_empty());
        let Segment::Conditional(cond) = &root.segments[0] else {
            panic!("expected conditional");
        };
        let nested = cond
            .true_branch
            .content
            .iter()
            .any(|c| matches!(c, BranchContent::Conditional(_)));
        assert!(nested);
    }

    #[test]
    fn test_recovery_produces_partial_tree() {
        // An empty expression block cannot parse, but the trailing text
        // survives after resynchronization.
        let lexed = Lexer::new("${} tail").tokenize();
        let (root, errors) = Parser::new(lexed.tokens).parse();
        assert!(!errors.is_empty());
        assert!(root
            .segments
            .iter()
            .any(|s| matches!(s, Segment::Text(_))));
    }

    #[test]
    fn test_no_recovery_stops_at_first_error() {
        let lexed = Lexer::new("${} tail").tokenize();
        let options = ParseOptions {
            recovery: false,
            max_depth: 64,
        };
        let (root, errors) = Parser::with_options(lexed.tokens, options).parse();
        assert_eq!(errors.len(), 1);
        assert!(root.segments.is_empty());
    }

    #[test]
    fn test_depth_limit() {
        let depth = 80;
        let mut source = String::new();
        for _ in 0..depth {
            source.push_str("$?a1[");
        }
        source.push('x');
        for _ in 0..depth {
            source.push(']');
        }
        let lexed = Lexer::new(&source).tokenize();
        let (_, errors) = Parser::new(lexed.tokens).parse();
        assert!(errors
            .iter()
            .any(|e| matches!(e.kind, ParseErrorKind::DepthExceeded)));
    }

    #[test]
    fn test_description_span_covers_input() {
        let source = "Deals $s1 damage.";
        let (root, _) = parse(source);
        assert_eq!(root.span.start.byte, 0);
        assert_eq!(root.span.end.byte, source.len());
    }
}
