//! Statement nodes. A statement never stands for a value.

use std::fmt::{self, Display, Formatter};

use super::expression::{Expression, MethodCall};

/// Assignment of an expression to a named variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub target: String,
    pub value: Expression,
}

impl Display for Assignment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "(= (VAR {}) {})", self.target, self.value)
    }
}

/// `++` or `--` on a named variable. Used standalone and as the step of a
/// `for` loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    Increment(String),
    Decrement(String),
}

impl Display for Update {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Update::Increment(name) => write!(f, "(++ (VAR {name}))"),
            Update::Decrement(name) => write!(f, "(-- (VAR {name}))"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    pub statements: Vec<Statement>,
}

impl Display for Block {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("(BLOCK")?;
        for statement in &self.statements {
            write!(f, " {statement}")?;
        }
        f.write_str(")")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Assign(Assignment),
    Update(Update),
    Call(MethodCall),
    Return(Option<Expression>),
    Break,
    Continue,
    Block(Block),
    If {
        condition: Expression,
        then_block: Block,
        else_block: Option<Block>,
    },
    For {
        init: Assignment,
        condition: Expression,
        update: Update,
        body: Block,
    },
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Assign(assignment) => assignment.fmt(f),
            Statement::Update(update) => update.fmt(f),
            Statement::Call(call) => call.fmt(f),
            Statement::Return(Some(value)) => write!(f, "(RET {value})"),
            Statement::Return(None) => f.write_str("(RET)"),
            Statement::Break => f.write_str("(BREAK)"),
            Statement::Continue => f.write_str("(CONTINUE)"),
            Statement::Block(block) => block.fmt(f),
            Statement::If {
                condition,
                then_block,
                else_block: Some(else_block),
            } => write!(f, "(IF {condition}{then_block}{else_block})"),
            Statement::If {
                condition,
                then_block,
                else_block: None,
            } => write!(f, "(IF {condition}{then_block})"),
            Statement::For {
                init,
                condition,
                update,
                body,
            } => write!(f, "(FOR {init}{condition}{update}{body})"),
        }
    }
}
