//! # Spell Description Lexer
//!
//! Tokenizes WoW spell description text into tokens.
//!
//! The language switches vocabulary depending on context: `$?` opens a
//! condition predicate, `[` after a predicate opens branch content, `${`
//! opens an arithmetic expression. The lexer models this with an explicit
//! mode stack. Every `tokenize` call owns its cursor and stack, so calls are
//! independent and safe to run concurrently over different inputs.
//!
//! ## Example
//!
//! ```rust
//! use spelldesc_parser::lexer::{Lexer, TokenKind};
//!
//! let result = Lexer::new("Deals $s1 damage.").tokenize();
//! assert!(result.errors.is_empty());
//! assert_eq!(result.tokens[1].kind, TokenKind::SimpleVariable);
//! ```

pub mod cursor;
pub mod token;

pub use cursor::Cursor;
pub use token::{Token, TokenKind};

use crate::error::LexError;
use crate::span::{Position, Span};

/// Built-in expression functions, matched against the full letter run after
/// `$` inside an expression block.
const DOLLAR_FUNCS: &[&str] = &[
    "cond", "gte", "gt", "lte", "lt", "max", "min", "clamp", "floor",
];

// =============================================================================
// LEX RESULT
// =============================================================================

/// Result of tokenizing a description.
///
/// Tokenization never fails outright: malformed input produces error entries
/// plus best-effort tokens for the rest of the text.
#[derive(Debug, Clone)]
pub struct LexResult {
    /// Tokens, terminated by an `Eof` token.
    pub tokens: Vec<Token>,
    /// Errors encountered while scanning.
    pub errors: Vec<LexError>,
}

// =============================================================================
// LEXER MODES
// =============================================================================

/// Why a bracket group was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BranchKind {
    /// Branch of a conditional. `nested` distinguishes a conditional that
    /// itself sits inside branch content from a top-level one; the two emit
    /// different follow-up tokens after their closing `]`.
    Conditional { nested: bool },
    /// Else branch of a top-level conditional.
    Else,
    /// Plain `[...]` group inside a branch, no predicate attached.
    Nested,
}

/// A frame on the lexer's mode stack. Empty stack means top-level text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Between `$?` and the `[` that opens the branch.
    Predicate { nested: bool },
    /// Inside a `[...]` group.
    Branch(BranchKind),
    /// Inside `${...}`.
    Expression,
}

// =============================================================================
// LEXER
// =============================================================================

/// Multi-mode tokenizer for spell description text.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    modes: Vec<Mode>,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer for source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            modes: Vec::new(),
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire input.
    pub fn tokenize(mut self) -> LexResult {
        while !self.cursor.is_eof() {
            match self.modes.last().copied() {
                None => self.scan_top_level(),
                Some(Mode::Predicate { .. }) => self.scan_predicate(),
                Some(Mode::Branch(_)) => self.scan_branch(),
                Some(Mode::Expression) => self.scan_expression(),
            }
        }

        // Every frame still open at end of input is an unterminated construct.
        let end = self.cursor.position().byte;
        while let Some(mode) = self.modes.pop() {
            let message = match mode {
                Mode::Predicate { .. } => "unterminated condition predicate",
                Mode::Branch(_) => "unterminated conditional branch",
                Mode::Expression => "unterminated expression block",
            };
            self.errors.push(LexError::new(end, message));
        }

        let pos = self.cursor.position();
        self.tokens
            .push(Token::new(TokenKind::Eof, Span::new(pos, pos), ""));

        LexResult {
            tokens: self.tokens,
            errors: self.errors,
        }
    }

    // =========================================================================
    // TOP-LEVEL MODE
    // =========================================================================

    fn scan_top_level(&mut self) {
        let start = self.cursor.position();
        match self.cursor.peek() {
            Some('$') => self.scan_dollar(false),
            Some('|') => self.scan_pipe(false),
            Some('[') => {
                self.cursor.advance();
                self.emit(TokenKind::LBracket, start);
            }
            Some(']') => {
                self.cursor.advance();
                self.emit(TokenKind::RBracket, start);
            }
            Some(_) => {
                self.cursor
                    .advance_while(|c| !matches!(c, '$' | '|' | '[' | ']'));
                self.emit(TokenKind::Text, start);
            }
            None => {}
        }
    }

    /// Scan `|cAARRGGBB`, `|r` or a stray pipe.
    fn scan_pipe(&mut self, in_branch: bool) {
        let start = self.cursor.position();
        let rest = self.cursor.rest();

        let (kind, stray) = if in_branch {
            (TokenKind::BranchColorCode, TokenKind::BranchPipe)
        } else {
            (TokenKind::ColorCode, TokenKind::Pipe)
        };

        // Byte-level check: localized text after a stray `|c` may not have a
        // char boundary at offset 10.
        if rest.starts_with("|c")
            && rest.len() >= 10
            && rest.as_bytes()[2..10].iter().all(|b| b.is_ascii_hexdigit())
        {
            for _ in 0..10 {
                self.cursor.advance();
            }
            self.emit(kind, start);
        } else if rest.starts_with("|r") {
            self.cursor.advance();
            self.cursor.advance();
            self.emit(kind, start);
        } else {
            self.cursor.advance();
            self.emit(stray, start);
        }
    }

    // =========================================================================
    // DOLLAR FORMS (shared by top-level and branch modes)
    // =========================================================================

    /// Scan the variable forms starting with `$`, emitting the vocabulary
    /// that matches the current mode.
    fn scan_dollar(&mut self, in_branch: bool) {
        let start = self.cursor.position();
        self.cursor.advance(); // '$'

        match self.cursor.peek() {
            Some('?') => {
                self.cursor.advance();
                self.modes.push(Mode::Predicate { nested: in_branch });
                let kind = if in_branch {
                    TokenKind::BranchConditionalStart
                } else {
                    TokenKind::ConditionalStart
                };
                self.emit(kind, start);
            }
            Some('{') => {
                self.cursor.advance();
                self.modes.push(Mode::Expression);
                let kind = if in_branch {
                    TokenKind::BranchExprBlockStart
                } else {
                    TokenKind::ExpressionBlockStart
                };
                self.emit(kind, start);
            }
            Some('<') => {
                let kind = if in_branch {
                    TokenKind::BranchCustomVar
                } else {
                    TokenKind::CustomVariable
                };
                self.scan_custom_variable(start, kind, in_branch);
            }
            Some('@') => {
                self.cursor.advance();
                let name_start = self.cursor.position().byte;
                self.cursor.advance_while(|c| c.is_ascii_alphabetic());
                if self.cursor.position().byte == name_start {
                    self.errors
                        .push(LexError::new(start.byte, "expected name after '$@'"));
                    self.emit_fallback_text(start, in_branch);
                    return;
                }
                self.cursor.advance_while(|c| c.is_ascii_digit());
                let kind = if in_branch {
                    TokenKind::BranchAtVar
                } else {
                    TokenKind::AtVariable
                };
                self.emit(kind, start);
            }
            Some(c) if c.is_ascii_digit() => {
                let kind = if in_branch {
                    TokenKind::BranchCrossSpellRef
                } else {
                    TokenKind::CrossSpellRef
                };
                self.scan_cross_spell_ref(start, kind, in_branch);
            }
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                if matches!(c, 'l' | 'L' | 'g' | 'G')
                    && self.try_plural_gender(start, c, in_branch)
                {
                    return;
                }
                self.cursor
                    .advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
                let kind = if in_branch {
                    TokenKind::BranchSimpleVar
                } else {
                    TokenKind::SimpleVariable
                };
                self.emit(kind, start);
            }
            _ => {
                // A bare dollar sign. At top level it is its own token;
                // branch content has no equivalent, so it degrades to text.
                let kind = if in_branch {
                    TokenKind::BranchText
                } else {
                    TokenKind::Dollar
                };
                self.emit(kind, start);
            }
        }
    }

    /// Scan `$<name>`. Cursor is on `<`.
    fn scan_custom_variable(&mut self, start: Position, kind: TokenKind, in_branch: bool) {
        self.cursor.advance(); // '<'
        self.cursor
            .advance_while(|c| c != '>' && c != '\n');
        if self.cursor.peek() == Some('>') {
            self.cursor.advance();
            self.emit(kind, start);
        } else {
            self.errors
                .push(LexError::new(start.byte, "unterminated custom variable"));
            self.emit_fallback_text(start, in_branch);
        }
    }

    /// Scan `$<spellId><varType>[index]`. Cursor is on the first digit.
    fn scan_cross_spell_ref(&mut self, start: Position, kind: TokenKind, in_branch: bool) {
        self.cursor.advance_while(|c| c.is_ascii_digit());
        let letters_start = self.cursor.position().byte;
        self.cursor.advance_while(|c| c.is_ascii_alphabetic());
        if self.cursor.position().byte == letters_start {
            self.errors.push(LexError::new(
                start.byte,
                "cross-spell reference missing variable suffix",
            ));
            self.emit_fallback_text(start, in_branch);
            return;
        }
        self.cursor.advance_while(|c| c.is_ascii_digit());
        self.emit(kind, start);
    }

    /// Try to scan `$l.../$g...` pluralization or gender form.
    ///
    /// The form is `$l<singular>:<plural>;` with the scan running greedily to
    /// the `;`. Interior spaces and punctuation are fine, but the scan fails
    /// rather than cross `[`, `]` or a newline, since that would desync the
    /// bracket structure. On failure the caller falls back to a simple
    /// variable. Returns true if a token was emitted.
    fn try_plural_gender(&mut self, start: Position, marker: char, in_branch: bool) -> bool {
        // Lookahead over the remainder, past the marker character.
        let rest = self.cursor.rest();
        // Up to ':' then up to ';'.
        let mut seen_colon = false;
        let mut end = None;
        for (i, c) in rest.char_indices().skip(1) {
            match c {
                '[' | ']' | '\n' => break,
                ':' if !seen_colon => seen_colon = true,
                ';' if seen_colon => {
                    end = Some(i + 1);
                    break;
                }
                ';' => break,
                _ => {}
            }
        }

        let Some(end) = end else { return false };

        for _ in rest[..end].chars() {
            self.cursor.advance();
        }

        let plural = matches!(marker, 'l' | 'L');
        let kind = match (plural, in_branch) {
            (true, false) => TokenKind::Pluralization,
            (true, true) => TokenKind::BranchPluralization,
            (false, false) => TokenKind::Gender,
            (false, true) => TokenKind::BranchGender,
        };
        self.emit(kind, start);
        true
    }

    /// Emit everything consumed since `start` as plain text after a failed
    /// variable scan.
    fn emit_fallback_text(&mut self, start: Position, in_branch: bool) {
        let kind = if in_branch {
            TokenKind::BranchText
        } else {
            TokenKind::Text
        };
        self.emit(kind, start);
    }

    // =========================================================================
    // PREDICATE MODE
    // =========================================================================

    fn scan_predicate(&mut self) {
        let start = self.cursor.position();
        match self.cursor.peek() {
            Some(' ' | '\t') => {
                self.cursor.advance_while(|c| c == ' ' || c == '\t');
            }
            Some('[') => {
                self.cursor.advance();
                self.emit(TokenKind::CondLBracket, start);
                // The branch inherits the predicate's nesting level.
                let nested = match self.modes.pop() {
                    Some(Mode::Predicate { nested }) => nested,
                    _ => false,
                };
                self.modes.push(Mode::Branch(BranchKind::Conditional { nested }));
            }
            Some('|') => {
                self.cursor.advance();
                self.emit(TokenKind::CondPipe, start);
            }
            Some('$') => self.scan_cond_func_call(start),
            Some(c) if c.is_ascii_alphabetic() => {
                self.cursor.advance_while(|c| c.is_ascii_alphanumeric());
                self.emit(TokenKind::CondType, start);
            }
            Some(c) => {
                self.errors.push(LexError::new(
                    start.byte,
                    format!("unexpected character '{c}' in condition"),
                ));
                self.cursor.advance();
                self.modes.pop();
            }
            None => {}
        }
    }

    /// Scan `$name(args)` inside a predicate. Parens must balance before a
    /// bracket or end of input.
    fn scan_cond_func_call(&mut self, start: Position) {
        self.cursor.advance(); // '$'
        self.cursor.advance_while(|c| c.is_ascii_alphabetic());

        if self.cursor.peek() != Some('(') {
            self.errors.push(LexError::new(
                start.byte,
                "expected '(' in condition function call",
            ));
            return;
        }

        let mut depth = 0usize;
        loop {
            match self.cursor.peek() {
                Some('(') => {
                    depth += 1;
                    self.cursor.advance();
                }
                Some(')') => {
                    depth -= 1;
                    self.cursor.advance();
                    if depth == 0 {
                        break;
                    }
                }
                Some('[' | ']') | None => {
                    self.errors.push(LexError::new(
                        start.byte,
                        "unterminated condition function call",
                    ));
                    self.modes.pop();
                    return;
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }

        self.emit(TokenKind::CondFuncCall, start);
    }

    // =========================================================================
    // BRANCH MODE
    // =========================================================================

    fn scan_branch(&mut self) {
        let start = self.cursor.position();
        match self.cursor.peek() {
            Some('$') => self.scan_dollar(true),
            Some('|') => self.scan_pipe(true),
            Some('[') => {
                self.cursor.advance();
                self.emit(TokenKind::BranchLBracket, start);
                self.modes.push(Mode::Branch(BranchKind::Nested));
            }
            Some(']') => {
                self.cursor.advance();
                self.emit(TokenKind::BranchRBracket, start);
                let popped = self.modes.pop();
                if let Some(Mode::Branch(kind)) = popped {
                    self.after_branch_close(kind);
                }
            }
            Some(_) => {
                self.cursor
                    .advance_while(|c| !matches!(c, '$' | '|' | '[' | ']'));
                self.emit(TokenKind::BranchText, start);
            }
            None => {}
        }
    }

    /// Handle what immediately follows the `]` of a conditional branch.
    ///
    /// A top-level conditional may continue with `?` (chained predicate) or
    /// `[` (else branch). A nested conditional continues with `?` or `[` as
    /// well, but its trailing branch keeps the branch-side bracket kind, so
    /// the parser never confuses it with a literal top-level bracket.
    fn after_branch_close(&mut self, kind: BranchKind) {
        let nested = match kind {
            BranchKind::Conditional { nested } => nested,
            BranchKind::Else | BranchKind::Nested => return,
        };

        let start = self.cursor.position();
        match self.cursor.peek() {
            Some('?') => {
                self.cursor.advance();
                let question = if nested {
                    TokenKind::CondQuestion
                } else {
                    TokenKind::ChainCondQuestion
                };
                self.emit(question, start);
                self.modes.push(Mode::Predicate { nested });
            }
            Some('[') => {
                self.cursor.advance();
                if nested {
                    self.emit(TokenKind::CondLBracket, start);
                    self.modes
                        .push(Mode::Branch(BranchKind::Conditional { nested: true }));
                } else {
                    self.emit(TokenKind::LBracket, start);
                    self.modes.push(Mode::Branch(BranchKind::Else));
                }
            }
            _ => {}
        }
    }

    // =========================================================================
    // EXPRESSION MODE
    // =========================================================================

    fn scan_expression(&mut self) {
        let start = self.cursor.position();
        match self.cursor.peek() {
            Some(' ' | '\t') => {
                self.cursor.advance_while(|c| c == ' ' || c == '\t');
            }
            Some('}') => {
                self.cursor.advance();
                self.emit(TokenKind::ExpressionBlockEnd, start);
                self.modes.pop();
            }
            Some('(') => self.scan_expr_op(start, TokenKind::ExprLParen),
            Some(')') => self.scan_expr_op(start, TokenKind::ExprRParen),
            Some('+') => self.scan_expr_op(start, TokenKind::ExprPlus),
            Some('-') => self.scan_expr_op(start, TokenKind::ExprMinus),
            Some('*') => self.scan_expr_op(start, TokenKind::ExprStar),
            Some('/') => self.scan_expr_op(start, TokenKind::ExprSlash),
            Some(',') => self.scan_expr_op(start, TokenKind::ExprComma),
            Some(c) if c.is_ascii_digit() => {
                self.cursor.advance_while(|c| c.is_ascii_digit());
                if self.cursor.peek() == Some('.')
                    && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
                {
                    self.cursor.advance();
                    self.cursor.advance_while(|c| c.is_ascii_digit());
                }
                self.emit(TokenKind::ExprNumber, start);
            }
            Some(c) if c.is_ascii_alphabetic() => {
                self.cursor.advance_while(|c| c.is_ascii_alphanumeric());
                self.emit(TokenKind::ExprIdentifier, start);
            }
            Some('$') => self.scan_expr_dollar(start),
            Some('.') if self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit()) => {
                // Decimal-places suffix belongs after the closing `}`, where
                // it is ordinary text. Inside the block it is malformed.
                self.errors.push(LexError::new(
                    start.byte,
                    "decimal format inside expression block",
                ));
                self.cursor.advance();
                self.cursor.advance_while(|c| c.is_ascii_digit());
            }
            Some(c) => {
                self.errors.push(LexError::new(
                    start.byte,
                    format!("unexpected character '{c}' in expression"),
                ));
                self.cursor.advance();
            }
            None => {}
        }
    }

    fn scan_expr_op(&mut self, start: Position, kind: TokenKind) {
        self.cursor.advance();
        self.emit(kind, start);
    }

    /// Scan a `$` form inside an expression block.
    fn scan_expr_dollar(&mut self, start: Position) {
        self.cursor.advance(); // '$'
        match self.cursor.peek() {
            Some('<') => self.scan_custom_variable(start, TokenKind::ExprCustomVar, false),
            Some('@') => {
                self.cursor.advance();
                self.cursor.advance_while(|c| c.is_ascii_alphabetic());
                self.cursor.advance_while(|c| c.is_ascii_digit());
                self.emit(TokenKind::ExprAtVar, start);
            }
            Some(c) if c.is_ascii_digit() => {
                self.scan_cross_spell_ref(start, TokenKind::ExprCrossSpellRef, false)
            }
            Some(c) if c.is_ascii_alphabetic() => {
                let letters_start = self.cursor.position().byte;
                self.cursor.advance_while(|c| c.is_ascii_alphabetic());
                let letters = self
                    .cursor
                    .slice(letters_start, self.cursor.position().byte);
                if DOLLAR_FUNCS.contains(&letters) {
                    self.emit(TokenKind::ExprDollarFunc, start);
                } else {
                    self.cursor.advance_while(|c| c.is_ascii_digit());
                    self.emit(TokenKind::ExprSimpleVar, start);
                }
            }
            _ => {
                self.errors.push(LexError::new(
                    start.byte,
                    "unexpected '$' in expression",
                ));
            }
        }
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    fn emit(&mut self, kind: TokenKind, start: Position) {
        let end = self.cursor.position();
        let text = self.cursor.slice(start.byte, end.byte);
        self.tokens
            .push(Token::new(kind, Span::new(start, end), text));
    }
}

// =============================================================================
// TESTS
// =============================================================================
