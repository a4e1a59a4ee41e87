//! # decafc
//!
//! Compiler front-end for the Decaf programming language. Source text is
//! tokenized by a regex-driven lexer, parsed into an AST by recursive
//! descent, and lowered to three-address code while a scoped symbol table is
//! populated and checked.

pub mod analyzer;
pub mod lexer;
pub mod parser;
pub mod regex;
pub mod symbol_table;

use std::{error::Error, fmt::Display};

use analyzer::{Analyzer, SemanticError, Tac};
use parser::{ast::Program, ParseError, Parser};
use symbol_table::SymbolTable;

/// Everything one compile produces.
#[derive(Debug)]
pub struct Compilation {
    pub program: Program,
    pub table: SymbolTable,
    pub tac: Tac,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    Parse(ParseError),
    Semantic(SemanticError),
}

impl Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Parse(error) => error.fmt(f),
            CompileError::Semantic(error) => error.fmt(f),
        }
    }
}

impl Error for CompileError {}

impl From<ParseError> for CompileError {
    fn from(error: ParseError) -> CompileError {
        CompileError::Parse(error)
    }
}

impl From<SemanticError> for CompileError {
    fn from(error: SemanticError) -> CompileError {
        CompileError::Semantic(error)
    }
}

/// Run the whole front-end over `source`.
pub fn compile(source: &str) -> Result<Compilation, CompileError> {
    let program = Parser::decaf(source).parse()?;
    let mut table = SymbolTable::new();
    let analysis = Analyzer::new(&mut table).analyze(&program)?;
    Ok(Compilation {
        program,
        table,
        tac: analysis.tac,
        warnings: analysis.warnings,
    })
}
