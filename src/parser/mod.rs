//! # Parser
//!
//! LL(1) recursive descent over the token stream: one method per
//! nonterminal, a single token of lookahead, fail-fast on the first
//! mismatch. Left-associative binary operators are parsed with a
//! head-then-loop pattern that builds the tree left-leaning.

pub mod ast;

use std::{error::Error, fmt::Display};

use crate::lexer::{Lexer, Token, TokenKind};
use crate::symbol_table::ValueType;

use self::ast::{
    ArithmeticOp, Assignment, Block, Expression, Method, MethodCall, Parameter, Program,
    RelationalOp, Statement, Update, VariableDeclaration,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub line: usize,
}

impl ParseError {
    fn unexpected(expected: impl Display, found: &Token) -> ParseError {
        let found_text = if found.kind == TokenKind::Eoi {
            "end of input".to_string()
        } else {
            format!("'{}'", found.lexeme)
        };
        ParseError {
            message: format!("expected {expected}, found {found_text}"),
            line: found.line,
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl Error for ParseError {}

pub type ParseResult<T> = Result<T, ParseError>;

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    token: Token,
}

impl<'a> Parser<'a> {
    pub fn new(mut lexer: Lexer<'a>) -> Parser<'a> {
        let token = lexer.next_token();
        Parser { lexer, token }
    }

    /// Parser over `input` using the builtin Decaf rule set.
    pub fn decaf(input: &str) -> Parser<'static> {
        Parser::new(Lexer::decaf(input))
    }

    pub fn parse(mut self) -> ParseResult<Program> {
        self.program()
    }

    /// Consume the current token and pull in the next one.
    fn advance(&mut self) -> Token {
        let next = self.lexer.next_token();
        std::mem::replace(&mut self.token, next)
    }

    fn match_token(&mut self, expected: TokenKind) -> ParseResult<Token> {
        if self.token.kind == expected {
            Ok(self.advance())
        } else {
            Err(ParseError::unexpected(expected, &self.token))
        }
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.token.kind == kind
    }

    fn program(&mut self) -> ParseResult<Program> {
        self.match_token(TokenKind::Class)?;
        let name = self.match_token(TokenKind::Identifier)?.lexeme;
        self.match_token(TokenKind::LBrace)?;
        let declarations = self.variable_declarations()?;
        let methods = self.method_declarations()?;
        self.match_token(TokenKind::RBrace)?;
        self.match_token(TokenKind::Eoi)?;
        Ok(Program {
            name,
            declarations,
            methods,
        })
    }

    fn variable_declarations(&mut self) -> ParseResult<Vec<VariableDeclaration>> {
        let mut declarations = Vec::new();
        while self.at(TokenKind::Int) || self.at(TokenKind::Real) {
            let value_type = self.type_name()?;
            let names = self.variable_list()?;
            declarations.push(VariableDeclaration { value_type, names });
        }
        Ok(declarations)
    }

    fn type_name(&mut self) -> ParseResult<ValueType> {
        if self.at(TokenKind::Int) {
            self.advance();
            Ok(ValueType::Int)
        } else if self.at(TokenKind::Real) {
            self.advance();
            Ok(ValueType::Real)
        } else {
            Err(ParseError::unexpected("a type", &self.token))
        }
    }

    fn variable_list(&mut self) -> ParseResult<Vec<String>> {
        let mut names = vec![self.match_token(TokenKind::Identifier)?.lexeme];
        while self.at(TokenKind::Comma) {
            self.advance();
            names.push(self.match_token(TokenKind::Identifier)?.lexeme);
        }
        self.match_token(TokenKind::Semicolon)?;
        Ok(names)
    }

    fn method_declarations(&mut self) -> ParseResult<Vec<Method>> {
        // a program has at least one method
        let mut methods = vec![self.method_declaration()?];
        while self.at(TokenKind::Static) {
            methods.push(self.method_declaration()?);
        }
        Ok(methods)
    }

    fn method_declaration(&mut self) -> ParseResult<Method> {
        self.match_token(TokenKind::Static)?;
        let return_type = self.return_type()?;
        let name = self.match_token(TokenKind::Identifier)?.lexeme;
        self.match_token(TokenKind::LParen)?;
        let parameters = self.parameters()?;
        self.match_token(TokenKind::RParen)?;
        self.match_token(TokenKind::LBrace)?;
        let declarations = self.variable_declarations()?;
        let body = self.statement_list()?;
        self.match_token(TokenKind::RBrace)?;
        Ok(Method {
            return_type,
            name,
            parameters,
            declarations,
            body,
        })
    }

    fn return_type(&mut self) -> ParseResult<ValueType> {
        if self.at(TokenKind::Void) {
            self.advance();
            Ok(ValueType::Void)
        } else {
            self.type_name()
        }
    }

    fn parameters(&mut self) -> ParseResult<Vec<Parameter>> {
        if self.at(TokenKind::Int) || self.at(TokenKind::Real) {
            self.parameter_list()
        } else {
            Ok(Vec::new())
        }
    }

    fn parameter_list(&mut self) -> ParseResult<Vec<Parameter>> {
        let mut parameters = vec![self.parameter()?];
        while self.at(TokenKind::Comma) {
            self.advance();
            parameters.push(self.parameter()?);
        }
        Ok(parameters)
    }

    fn parameter(&mut self) -> ParseResult<Parameter> {
        let value_type = self.type_name()?;
        let name = self.match_token(TokenKind::Identifier)?.lexeme;
        Ok(Parameter { value_type, name })
    }

    fn statement_list(&mut self) -> ParseResult<Vec<Statement>> {
        let mut statements = Vec::new();
        loop {
            match self.token.kind {
                TokenKind::If
                | TokenKind::For
                | TokenKind::Return
                | TokenKind::Break
                | TokenKind::Continue
                | TokenKind::LBrace
                | TokenKind::Identifier => statements.push(self.statement()?),
                _ => return Ok(statements),
            }
        }
    }

    fn statement(&mut self) -> ParseResult<Statement> {
        match self.token.kind {
            TokenKind::If => self.if_statement(),
            TokenKind::For => self.for_statement(),
            TokenKind::Return => self.return_statement(),
            TokenKind::Break => {
                self.advance();
                self.match_token(TokenKind::Semicolon)?;
                Ok(Statement::Break)
            }
            TokenKind::Continue => {
                self.advance();
                self.match_token(TokenKind::Semicolon)?;
                Ok(Statement::Continue)
            }
            TokenKind::LBrace => Ok(Statement::Block(self.statement_block()?)),
            TokenKind::Identifier => self.id_statement(),
            _ => Err(ParseError::unexpected("a statement", &self.token)),
        }
    }

    fn if_statement(&mut self) -> ParseResult<Statement> {
        self.match_token(TokenKind::If)?;
        self.match_token(TokenKind::LParen)?;
        let condition = self.expression()?;
        self.match_token(TokenKind::RParen)?;
        let then_block = self.statement_block()?;
        let else_block = if self.at(TokenKind::Else) {
            self.advance();
            Some(self.statement_block()?)
        } else {
            None
        };
        Ok(Statement::If {
            condition,
            then_block,
            else_block,
        })
    }

    fn for_statement(&mut self) -> ParseResult<Statement> {
        self.match_token(TokenKind::For)?;
        self.match_token(TokenKind::LParen)?;
        let target = self.match_token(TokenKind::Identifier)?.lexeme;
        self.match_token(TokenKind::Assign)?;
        let value = self.expression()?;
        self.match_token(TokenKind::Semicolon)?;
        let condition = self.expression()?;
        self.match_token(TokenKind::Semicolon)?;
        let counter = self.match_token(TokenKind::Identifier)?.lexeme;
        let update = if self.at(TokenKind::Increment) {
            self.advance();
            Update::Increment(counter)
        } else if self.at(TokenKind::Decrement) {
            self.advance();
            Update::Decrement(counter)
        } else {
            return Err(ParseError::unexpected("'++' or '--'", &self.token));
        };
        self.match_token(TokenKind::RParen)?;
        let body = self.statement_block()?;
        Ok(Statement::For {
            init: Assignment { target, value },
            condition,
            update,
            body,
        })
    }

    fn return_statement(&mut self) -> ParseResult<Statement> {
        self.match_token(TokenKind::Return)?;
        let value = if self.at(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.match_token(TokenKind::Semicolon)?;
        Ok(Statement::Return(value))
    }

    /// Statements opening with an identifier: call, assignment, `++`, `--`.
    fn id_statement(&mut self) -> ParseResult<Statement> {
        let id = self.match_token(TokenKind::Identifier)?.lexeme;
        let statement = match self.token.kind {
            TokenKind::LParen => {
                self.advance();
                let arguments = self.argument_list()?;
                self.match_token(TokenKind::RParen)?;
                Statement::Call(MethodCall {
                    name: id,
                    arguments,
                })
            }
            TokenKind::Assign => {
                self.advance();
                let value = self.expression()?;
                Statement::Assign(Assignment { target: id, value })
            }
            TokenKind::Increment => {
                self.advance();
                Statement::Update(Update::Increment(id))
            }
            TokenKind::Decrement => {
                self.advance();
                Statement::Update(Update::Decrement(id))
            }
            _ => {
                return Err(ParseError::unexpected(
                    "'(', '=', '++' or '--'",
                    &self.token,
                ))
            }
        };
        self.match_token(TokenKind::Semicolon)?;
        Ok(statement)
    }

    fn statement_block(&mut self) -> ParseResult<Block> {
        self.match_token(TokenKind::LBrace)?;
        let statements = self.statement_list()?;
        self.match_token(TokenKind::RBrace)?;
        Ok(Block { statements })
    }

    /// Possibly empty, comma-separated argument list.
    fn argument_list(&mut self) -> ParseResult<Vec<Expression>> {
        if self.at(TokenKind::RParen) {
            return Ok(Vec::new());
        }
        let mut arguments = vec![self.expression()?];
        while self.at(TokenKind::Comma) {
            self.advance();
            arguments.push(self.expression()?);
        }
        Ok(arguments)
    }

    fn expression(&mut self) -> ParseResult<Expression> {
        self.expr_or()
    }

    fn expr_or(&mut self) -> ParseResult<Expression> {
        let mut lhs = self.expr_and()?;
        while self.at(TokenKind::Or) {
            self.advance();
            let rhs = self.expr_and()?;
            lhs = Expression::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn expr_and(&mut self) -> ParseResult<Expression> {
        let mut lhs = self.expr_eq()?;
        while self.at(TokenKind::And) {
            self.advance();
            let rhs = self.expr_eq()?;
            lhs = Expression::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn expr_eq(&mut self) -> ParseResult<Expression> {
        let mut lhs = self.expr_rel()?;
        loop {
            let op = match self.token.kind {
                TokenKind::Eq => RelationalOp::Eq,
                TokenKind::Neq => RelationalOp::Neq,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.expr_rel()?;
            lhs = Expression::Relational {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn expr_rel(&mut self) -> ParseResult<Expression> {
        let mut lhs = self.expr_add()?;
        loop {
            let op = match self.token.kind {
                TokenKind::Lt => RelationalOp::Lt,
                TokenKind::Le => RelationalOp::Le,
                TokenKind::Gt => RelationalOp::Gt,
                TokenKind::Ge => RelationalOp::Ge,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.expr_add()?;
            lhs = Expression::Relational {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn expr_add(&mut self) -> ParseResult<Expression> {
        let mut lhs = self.expr_mul()?;
        loop {
            let op = match self.token.kind {
                TokenKind::Plus => ArithmeticOp::Add,
                TokenKind::Minus => ArithmeticOp::Subtract,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.expr_mul()?;
            lhs = Expression::Arithmetic {
                op,
                lhs: Some(Box::new(lhs)),
                rhs: Box::new(rhs),
            };
        }
    }

    fn expr_mul(&mut self) -> ParseResult<Expression> {
        let mut lhs = self.expr_unary()?;
        loop {
            let op = match self.token.kind {
                TokenKind::Star => ArithmeticOp::Multiply,
                TokenKind::Slash => ArithmeticOp::Divide,
                TokenKind::Percent => ArithmeticOp::Modulus,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.expr_unary()?;
            lhs = Expression::Arithmetic {
                op,
                lhs: Some(Box::new(lhs)),
                rhs: Box::new(rhs),
            };
        }
    }

    fn expr_unary(&mut self) -> ParseResult<Expression> {
        match self.token.kind {
            TokenKind::Plus => {
                self.advance();
                let rhs = self.expr_unary()?;
                Ok(Expression::Arithmetic {
                    op: ArithmeticOp::Add,
                    lhs: None,
                    rhs: Box::new(rhs),
                })
            }
            TokenKind::Minus => {
                self.advance();
                let rhs = self.expr_unary()?;
                Ok(Expression::Arithmetic {
                    op: ArithmeticOp::Subtract,
                    lhs: None,
                    rhs: Box::new(rhs),
                })
            }
            TokenKind::Not => {
                self.advance();
                let rhs = self.expr_unary()?;
                Ok(Expression::Not(Box::new(rhs)))
            }
            _ => self.factor(),
        }
    }

    fn factor(&mut self) -> ParseResult<Expression> {
        match self.token.kind {
            TokenKind::Number => {
                let value = self.advance().lexeme;
                Ok(Expression::Number(value))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.expr_or()?;
                self.match_token(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Identifier => {
                let name = self.advance().lexeme;
                if self.at(TokenKind::LParen) {
                    self.advance();
                    let arguments = self.argument_list()?;
                    self.match_token(TokenKind::RParen)?;
                    Ok(Expression::Call(MethodCall { name, arguments }))
                } else {
                    Ok(Expression::Variable(name))
                }
            }
            _ => Err(ParseError::unexpected("an expression", &self.token)),
        }
    }
}
