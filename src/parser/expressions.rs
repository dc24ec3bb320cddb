//! # Expression Parsing
//!
//! Rules for `${...}` arithmetic blocks.
//!
//! Precedence climbing with two binary levels (`+ -` below `* /`), a prefix
//! minus, and an atomic level of literals, variables, parens and calls. Bare
//! identifiers are only valid as function names, so `abs` without a `(` is
//! an error rather than a variable reference.

use super::Parser;
use crate::cst::{
    BinaryExpression, BinaryOperator, Expression, ExpressionBlock, FunctionCall, NumberLiteral,
    ParenExpression, UnaryExpression, UnaryOperator,
};
use crate::error::ParseError;
use crate::lexer::TokenKind;

impl Parser {
    // =========================================================================
    // EXPRESSION BLOCK
    // =========================================================================

    /// Parse `'${' expression '}'`, from either the top level or a branch.
    pub(crate) fn parse_expression_block(&mut self) -> Result<ExpressionBlock, ParseError> {
        let start = match self.peek().kind {
            TokenKind::ExpressionBlockStart | TokenKind::BranchExprBlockStart => {
                self.advance().span
            }
            _ => return Err(self.unexpected("'${'")),
        };
        let expression = self.parse_expression()?;
        self.expect(TokenKind::ExpressionBlockEnd, "'}'")?;
        Ok(ExpressionBlock {
            span: self.span_from(start),
            expression,
        })
    }

    // =========================================================================
    // PRECEDENCE LEVELS
    // =========================================================================

    fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        self.parse_additive()
    }

    /// `multiplicative (('+' | '-') multiplicative)*`
    fn parse_additive(&mut self) -> Result<Expression, ParseError> {
        let start = self.peek().span;
        let mut left = self.parse_multiplicative()?;

        loop {
            let operator = match self.peek().kind {
                TokenKind::ExprPlus => BinaryOperator::Add,
                TokenKind::ExprMinus => BinaryOperator::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expression::Binary(BinaryExpression {
                span: self.span_from(start),
                left: Box::new(left),
                operator,
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    /// `unary (('*' | '/') unary)*`
    fn parse_multiplicative(&mut self) -> Result<Expression, ParseError> {
        let start = self.peek().span;
        let mut left = self.parse_unary()?;

        loop {
            let operator = match self.peek().kind {
                TokenKind::ExprStar => BinaryOperator::Mul,
                TokenKind::ExprSlash => BinaryOperator::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expression::Binary(BinaryExpression {
                span: self.span_from(start),
                left: Box::new(left),
                operator,
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    /// `'-' unary | atomic`
    fn parse_unary(&mut self) -> Result<Expression, ParseError> {
        if self.check(TokenKind::ExprMinus) {
            let start = self.advance().span;
            self.enter(start)?;
            let operand = self.parse_unary()?;
            self.exit();
            return Ok(Expression::Unary(UnaryExpression {
                span: self.span_from(start),
                operator: UnaryOperator::Neg,
                operand: Box::new(operand),
            }));
        }
        self.parse_atomic()
    }

    // =========================================================================
    // ATOMS
    // =========================================================================

    fn parse_atomic(&mut self) -> Result<Expression, ParseError> {
        match self.peek().kind {
            TokenKind::ExprLParen => {
                let start = self.advance().span;
                self.enter(start)?;
                let expression = self.parse_expression()?;
                self.expect(TokenKind::ExprRParen, "')'")?;
                self.exit();
                Ok(Expression::Paren(ParenExpression {
                    span: self.span_from(start),
                    expression: Box::new(expression),
                }))
            }
            TokenKind::ExprDollarFunc => {
                let name = self.advance();
                let call = self.parse_call(name)?;
                Ok(Expression::DollarFunctionCall(call))
            }
            TokenKind::ExprIdentifier => {
                let name = self.advance();
                let call = self.parse_call(name)?;
                Ok(Expression::FunctionCall(call))
            }
            TokenKind::ExprCustomVar => Ok(Expression::CustomVariable(self.advance())),
            TokenKind::ExprAtVar => Ok(Expression::AtVariable(self.advance())),
            TokenKind::ExprCrossSpellRef => Ok(Expression::CrossSpellRef(self.advance())),
            TokenKind::ExprSimpleVar => Ok(Expression::SimpleVariable(self.advance())),
            TokenKind::ExprNumber => {
                let token = self.advance();
                // The lexer only emits digit runs, so this cannot fail in
                // practice; degrade to zero rather than panic if it somehow
                // does.
                let value = token.text.parse::<f64>().unwrap_or(0.0);
                Ok(Expression::Number(NumberLiteral {
                    span: token.span,
                    value,
                }))
            }
            _ => Err(self.unexpected("an expression")),
        }
    }

    /// Parse `'(' (expression (',' expression)*)? ')'` after a call name.
    fn parse_call(&mut self, name: crate::lexer::Token) -> Result<FunctionCall, ParseError> {
        let start = name.span;
        self.expect(TokenKind::ExprLParen, "'('")?;
        self.enter(start)?;

        let mut args = Vec::new();
        if !self.check(TokenKind::ExprRParen) {
            args.push(self.parse_expression()?);
            while self.check(TokenKind::ExprComma) {
                self.advance();
                args.push(self.parse_expression()?);
            }
        }

        self.expect(TokenKind::ExprRParen, "')'")?;
        self.exit();
        Ok(FunctionCall {
            span: self.span_from(start),
            name,
            args,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
