//! Declaration-level nodes: the program (class), its variable declarations
//! and its methods.

use std::fmt::{self, Display, Formatter};

use crate::symbol_table::ValueType;

use super::statement::Statement;

/// One `type name, name, …;` declaration line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDeclaration {
    pub value_type: ValueType,
    pub names: Vec<String>,
}

impl Display for VariableDeclaration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "(DECLARE {}", self.value_type)?;
        for name in &self.names {
            write!(f, " (VAR {name})")?;
        }
        f.write_str(")")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub value_type: ValueType,
    pub name: String,
}

impl Display for Parameter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "(PARAM {}(VAR {}))", self.value_type, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub return_type: ValueType,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub declarations: Vec<VariableDeclaration>,
    pub body: Vec<Statement>,
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "(METHOD {} {} ", self.return_type, self.name)?;
        for parameter in &self.parameters {
            parameter.fmt(f)?;
        }
        for declaration in &self.declarations {
            declaration.fmt(f)?;
        }
        for statement in &self.body {
            statement.fmt(f)?;
        }
        f.write_str(")")
    }
}

/// Root of the tree: class name, class variables and methods, in source
/// order. Owns the whole program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub name: String,
    pub declarations: Vec<VariableDeclaration>,
    pub methods: Vec<Method>,
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "(CLASS {}", self.name)?;
        for declaration in &self.declarations {
            write!(f, " {declaration}")?;
        }
        for method in &self.methods {
            write!(f, " {method}")?;
        }
        f.write_str(")")
    }
}
