//! Expression nodes. An expression always stands for a typed value.

use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulus,
}

impl ArithmeticOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Subtract => "-",
            ArithmeticOp::Multiply => "*",
            ArithmeticOp::Divide => "/",
            ArithmeticOp::Modulus => "%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationalOp {
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl RelationalOp {
    pub fn symbol(self) -> &'static str {
        match self {
            RelationalOp::Eq => "==",
            RelationalOp::Neq => "!=",
            RelationalOp::Lt => "<",
            RelationalOp::Le => "<=",
            RelationalOp::Gt => ">",
            RelationalOp::Ge => ">=",
        }
    }
}

/// A call of a named method. Appears both as an expression and, followed by
/// `;`, as a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub name: String,
    pub arguments: Vec<Expression>,
}

impl Display for MethodCall {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "(CALL {}", self.name)?;
        for argument in &self.arguments {
            write!(f, " {argument}")?;
        }
        f.write_str(")")
    }
}

/// The expression variants. A unary `+` or `-` is an arithmetic node with an
/// absent left operand; number literals keep their source spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Number(String),
    Variable(String),
    Call(MethodCall),
    Arithmetic {
        op: ArithmeticOp,
        lhs: Option<Box<Expression>>,
        rhs: Box<Expression>,
    },
    Relational {
        op: RelationalOp,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),
    Not(Box<Expression>),
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Number(value) => write!(f, "(NUM {value})"),
            Expression::Variable(name) => write!(f, "(VAR {name})"),
            Expression::Call(call) => call.fmt(f),
            Expression::Arithmetic {
                op,
                lhs: Some(lhs),
                rhs,
            } => write!(f, "({} {lhs} {rhs})", op.symbol()),
            Expression::Arithmetic { op, lhs: None, rhs } => {
                write!(f, "({} {rhs})", op.symbol())
            }
            Expression::Relational { op, lhs, rhs } => {
                write!(f, "({} {lhs} {rhs})", op.symbol())
            }
            Expression::And(lhs, rhs) => write!(f, "(&& {lhs} {rhs})"),
            Expression::Or(lhs, rhs) => write!(f, "(|| {lhs} {rhs})"),
            Expression::Not(rhs) => write!(f, "(! {rhs})"),
        }
    }
}
