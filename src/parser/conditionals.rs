//! # Conditional Parsing
//!
//! Rules for `$?predicate[branch]...` conditionals and bracketed branch
//! content.
//!
//! Top-level and nested conditionals differ in how their trailing branch is
//! marked: after a top-level chain the unmarked `[...]` is a distinct else
//! node, while a nested conditional's trailing `[...]` reuses the regular
//! branch shape. The lexer encodes the distinction in the bracket token
//! kinds, so each rule here only ever sees its own vocabulary.

use super::Parser;
use crate::cst::{
    BranchContent, ChainedBranch, ConditionPredicate, Conditional, ConditionalBranch,
    ConditionalTail, ElseBranch, NestedBrackets, NestedConditional, NestedTail, PredicateAtom,
};
use crate::error::ParseError;
use crate::lexer::TokenKind;

impl Parser {
    // =========================================================================
    // TOP-LEVEL CONDITIONAL
    // =========================================================================

    /// Parse `$?predicate[true] (?predicate[chained])* ([else])?`.
    pub(crate) fn parse_conditional(&mut self) -> Result<Conditional, ParseError> {
        let start = self.expect(TokenKind::ConditionalStart, "'$?'")?.span;
        let predicate = self.parse_condition_predicate()?;
        let true_branch = self.parse_conditional_branch()?;

        let mut tail = Vec::new();
        loop {
            if self.check(TokenKind::ChainCondQuestion) {
                let arm_start = self.advance().span;
                let predicate = self.parse_condition_predicate()?;
                let branch = self.parse_conditional_branch()?;
                tail.push(ConditionalTail::Chained(ChainedBranch {
                    span: self.span_from(arm_start),
                    predicate,
                    branch,
                }));
            } else if self.at_else_branch() {
                tail.push(ConditionalTail::Else(self.parse_else_branch()?));
                break;
            } else {
                break;
            }
        }

        Ok(Conditional {
            span: self.span_from(start),
            predicate,
            true_branch,
            tail,
        })
    }

    /// Decide whether the upcoming `[` opens an else branch.
    ///
    /// A literal top-level bracket is followed by top-level tokens; an else
    /// bracket is always followed by branch vocabulary, its own closing `]`
    /// included. Two tokens of lookahead settle it.
    fn at_else_branch(&self) -> bool {
        self.check(TokenKind::LBracket) && self.peek_next().kind.is_branch_content()
    }

    fn parse_else_branch(&mut self) -> Result<ElseBranch, ParseError> {
        let start = self.expect(TokenKind::LBracket, "'['")?.span;
        let content = self.parse_branch_contents()?;
        self.expect(TokenKind::BranchRBracket, "']'")?;
        Ok(ElseBranch {
            span: self.span_from(start),
            content,
        })
    }

    // =========================================================================
    // PREDICATES
    // =========================================================================

    /// Parse `atom ('|' atom)*`.
    fn parse_condition_predicate(&mut self) -> Result<ConditionPredicate, ParseError> {
        let start = self.peek().span;
        let mut conditions = vec![self.parse_predicate_atom()?];
        while self.check(TokenKind::CondPipe) {
            self.advance();
            conditions.push(self.parse_predicate_atom()?);
        }
        Ok(ConditionPredicate {
            span: self.span_from(start),
            conditions,
        })
    }

    fn parse_predicate_atom(&mut self) -> Result<PredicateAtom, ParseError> {
        match self.peek().kind {
            TokenKind::CondFuncCall => Ok(PredicateAtom::FuncCall(self.advance())),
            TokenKind::CondType => Ok(PredicateAtom::CondType(self.advance())),
            _ => Err(self.unexpected("a condition")),
        }
    }

    // =========================================================================
    // BRANCHES
    // =========================================================================

    /// Parse `'[' content* ']'` where the `[` is a conditional bracket.
    fn parse_conditional_branch(&mut self) -> Result<ConditionalBranch, ParseError> {
        let start = self.expect(TokenKind::CondLBracket, "'['")?.span;
        let content = self.parse_branch_contents()?;
        self.expect(TokenKind::BranchRBracket, "']'")?;
        Ok(ConditionalBranch {
            span: self.span_from(start),
            content,
        })
    }

    /// Parse branch content until something that cannot continue it.
    fn parse_branch_contents(&mut self) -> Result<Vec<BranchContent>, ParseError> {
        let mut content = Vec::new();
        loop {
            let item = match self.peek().kind {
                TokenKind::BranchText => BranchContent::Text(self.advance()),
                TokenKind::BranchCustomVar => BranchContent::CustomVariable(self.advance()),
                TokenKind::BranchAtVar => BranchContent::AtVariable(self.advance()),
                TokenKind::BranchCrossSpellRef => BranchContent::CrossSpellRef(self.advance()),
                TokenKind::BranchSimpleVar => BranchContent::SimpleVariable(self.advance()),
                TokenKind::BranchColorCode => BranchContent::ColorCode(self.advance()),
                TokenKind::BranchPipe => BranchContent::Pipe(self.advance()),
                TokenKind::BranchPluralization => BranchContent::Pluralization(self.advance()),
                TokenKind::BranchGender => BranchContent::Gender(self.advance()),
                TokenKind::BranchExprBlockStart => {
                    BranchContent::ExpressionBlock(self.parse_expression_block()?)
                }
                TokenKind::BranchConditionalStart => {
                    BranchContent::Conditional(self.parse_nested_conditional()?)
                }
                TokenKind::BranchLBracket => {
                    BranchContent::NestedBrackets(self.parse_nested_brackets()?)
                }
                _ => break,
            };
            content.push(item);
        }
        Ok(content)
    }

    /// Parse a plain `[...]` group inside a branch.
    fn parse_nested_brackets(&mut self) -> Result<NestedBrackets, ParseError> {
        let start = self.expect(TokenKind::BranchLBracket, "'['")?.span;
        self.enter(start)?;
        let content = self.parse_branch_contents()?;
        self.expect(TokenKind::BranchRBracket, "']'")?;
        self.exit();
        Ok(NestedBrackets {
            span: self.span_from(start),
            content,
        })
    }

    // =========================================================================
    // NESTED CONDITIONAL
    // =========================================================================

    /// Parse a conditional inside branch content.
    ///
    /// Same grammar as the top-level form except the trailing branch reuses
    /// the conditional bracket kind, so it parses as a regular branch rather
    /// than an else node.
    fn parse_nested_conditional(&mut self) -> Result<NestedConditional, ParseError> {
        let start = self
            .expect(TokenKind::BranchConditionalStart, "'$?'")?
            .span;
        self.enter(start)?;
        let predicate = self.parse_condition_predicate()?;
        let true_branch = self.parse_conditional_branch()?;

        let mut tail = Vec::new();
        loop {
            if self.check(TokenKind::CondQuestion) {
                let arm_start = self.advance().span;
                let predicate = self.parse_condition_predicate()?;
                let branch = self.parse_conditional_branch()?;
                tail.push(NestedTail::Chained(ChainedBranch {
                    span: self.span_from(arm_start),
                    predicate,
                    branch,
                }));
            } else if self.check(TokenKind::CondLBracket) {
                tail.push(NestedTail::Trailing(self.parse_conditional_branch()?));
                break;
            } else {
                break;
            }
        }

        self.exit();
        Ok(NestedConditional {
            span: self.span_from(start),
            predicate,
            true_branch,
            tail,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::{Description, Segment};
    use crate::lexer::Lexer;

    fn parse(source: &str) -> Description {
        let lexed = Lexer::new(source).tokenize();
        assert!(lexed.errors.is_empty(), "lex errors: {:?}", lexed.errors);
        let (root, errors) = Parser::new(lexed.tokens).parse();
        assert!(errors.is_empty(), "parse errors: {errors:?}");
        root
    }

    fn conditional(source: &str) -> Conditional {
        let root = parse(source);
        match root.segments.into_iter().next() {
            Some(Segment::Conditional(c)) => c,
            other => panic!("expected conditional, got {other:?}"),
        }
    }

    #[test]
    fn test_predicate_or_chain() {
        let cond = conditional("$?a1|s2|c3[x][y]");
        assert_eq!(cond.predicate.conditions.len(), 3);
        assert!(matches!(
            cond.predicate.conditions[0],
            PredicateAtom::CondType(_)
        ));
    }

    #[test]
    fn test_predicate_function_call() {
        let cond = conditional("$?$owb(137219,0)[x][y]");
        let PredicateAtom::FuncCall(token) = &cond.predicate.conditions[0] else {
            panic!("expected function call");
        };
        assert_eq!(token.text, "$owb(137219,0)");
    }

    #[test]
    fn test_truncated_predicate_reports_end_of_input() {
        let lexed = Lexer::new("$?").tokenize();
        let (_, errors) = Parser::new(lexed.tokens).parse();
        assert!(!errors.is_empty());
        assert!(errors[0].to_string().contains("end of input"));
    }

    #[test]
    fn test_conditional_without_else() {
        let cond = conditional("$?a1[only this]");
        assert!(cond.tail.is_empty());
    }

    #[test]
    fn test_chained_then_else() {
        let cond = conditional("$?s137[a]?s138[b][c]");
        assert_eq!(cond.tail.len(), 2);
        assert!(matches!(cond.tail[0], ConditionalTail::Chained(_)));
        assert!(matches!(cond.tail[1], ConditionalTail::Else(_)));
    }

    #[test]
    fn test_empty_branches() {
        let cond = conditional("$?a1[][]");
        assert!(cond.true_branch.content.is_empty());
        let Some(ConditionalTail::Else(else_branch)) = cond.tail.first() else {
            panic!("expected else branch");
        };
        assert!(else_branch.content.is_empty());
    }

    #[test]
    fn test_literal_bracket_after_conditional_is_not_else() {
        // "[Moonfire]" after the conditional is top-level text in brackets.
        let root = parse("$?a1[x] [Moonfire]");
        assert_eq!(root.segments.len(), 5);
        let Segment::Conditional(cond) = &root.segments[0] else {
            panic!("expected conditional first");
        };
        assert!(cond.tail.is_empty());
        assert!(matches!(root.segments[2], Segment::LBracket(_)));
    }

    #[test]
    fn test_nested_conditional_trailing_branch() {
        let cond = conditional("$?a1[$?a2[y][z]][e]");
        let BranchContent::Conditional(nested) = &cond.true_branch.content[0] else {
            panic!("expected nested conditional");
        };
        assert_eq!(nested.tail.len(), 1);
        assert!(matches!(nested.tail[0], NestedTail::Trailing(_)));
    }

    #[test]
    fn test_nested_conditional_chain() {
        let cond = conditional("$?a1[$?a2[x]?a3[y][z]][e]");
        let BranchContent::Conditional(nested) = &cond.true_branch.content[0] else {
            panic!("expected nested conditional");
        };
        assert_eq!(nested.tail.len(), 2);
        assert!(matches!(nested.tail[0], NestedTail::Chained(_)));
        assert!(matches!(nested.tail[1], NestedTail::Trailing(_)));
    }

    #[test]
    fn test_nested_plain_brackets() {
        let cond = conditional("$?a1[see [Starfall] now][x]");
        let nested = cond
            .true_branch
            .content
            .iter()
            .find(|c| matches!(c, BranchContent::NestedBrackets(_)));
        assert!(nested.is_some());
    }

    #[test]
    fn test_branch_with_variables_and_colors() {
        let cond = conditional("$?a1[|cFF00FF00$s1|r damage][none]");
        let kinds: Vec<_> = cond
            .true_branch
            .content
            .iter()
            .map(std::mem::discriminant)
            .collect();
        assert_eq!(kinds.len(), 4);
        assert!(matches!(
            cond.true_branch.content[1],
            BranchContent::SimpleVariable(_)
        ));
    }

    #[test]
    fn test_branch_expression_block() {
        let cond = conditional("$?a1[${$s1*2} damage][none]");
        assert!(matches!(
            cond.true_branch.content[0],
            BranchContent::ExpressionBlock(_)
        ));
    }
}
