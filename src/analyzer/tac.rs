//! Three-address instruction listing.

use std::fmt::{self, Display, Formatter};

/// One three-address instruction. Assignments name the source first and the
/// target second; conditional branches carry their target label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Var(String),
    FormalParam(String),
    ActualParam(String),
    Assign(String, String),
    Add(String, String, String),
    Sub(String, String, String),
    Mult(String, String, String),
    Divide(String, String, String),
    Mod(String, String, String),
    UMinus(String, String),
    IfEq(String, String, String),
    IfNe(String, String, String),
    IfLt(String, String, String),
    IfLe(String, String, String),
    IfGt(String, String, String),
    IfGe(String, String, String),
    Goto(String),
    Call(String),
    Return,
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Var(name) => write!(f, "VAR {name}"),
            Instruction::FormalParam(name) => write!(f, "FPARAM {name}"),
            Instruction::ActualParam(name) => write!(f, "APARAM {name}"),
            Instruction::Assign(source, target) => write!(f, "{target} = {source}"),
            Instruction::Add(lhs, rhs, target) => write!(f, "{target} = {lhs} + {rhs}"),
            Instruction::Sub(lhs, rhs, target) => write!(f, "{target} = {lhs} - {rhs}"),
            Instruction::Mult(lhs, rhs, target) => write!(f, "{target} = {lhs} * {rhs}"),
            Instruction::Divide(lhs, rhs, target) => write!(f, "{target} = {lhs} / {rhs}"),
            Instruction::Mod(lhs, rhs, target) => write!(f, "{target} = {lhs} % {rhs}"),
            Instruction::UMinus(source, target) => write!(f, "UMINUS {source} {target}"),
            Instruction::IfEq(lhs, rhs, label) => write!(f, "if {lhs} == {rhs} goto {label}"),
            Instruction::IfNe(lhs, rhs, label) => write!(f, "if {lhs} != {rhs} goto {label}"),
            Instruction::IfLt(lhs, rhs, label) => write!(f, "if {lhs} < {rhs} goto {label}"),
            Instruction::IfLe(lhs, rhs, label) => write!(f, "if {lhs} <= {rhs} goto {label}"),
            Instruction::IfGt(lhs, rhs, label) => write!(f, "if {lhs} > {rhs} goto {label}"),
            Instruction::IfGe(lhs, rhs, label) => write!(f, "if {lhs} >= {rhs} goto {label}"),
            Instruction::Goto(label) => write!(f, "GOTO {label}"),
            Instruction::Call(name) => write!(f, "CALL {name}"),
            Instruction::Return => f.write_str("RETURN"),
        }
    }
}

/// The ordered listing. A label attaches to the *next* emitted instruction;
/// nested constructs can leave more than one label pending at once, and each
/// prints as `label:` on its own line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tac {
    instructions: Vec<(Vec<String>, Instruction)>,
    pending: Vec<String>,
}

impl Tac {
    pub fn new() -> Tac {
        Tac::default()
    }

    pub fn emit(&mut self, instruction: Instruction) {
        let labels = std::mem::take(&mut self.pending);
        self.instructions.push((labels, instruction));
    }

    /// Attach `label` to the next emitted instruction.
    pub fn label_next(&mut self, label: String) {
        self.pending.push(label);
    }

    /// Kind of the most recently appended instruction.
    pub fn last(&self) -> Option<&Instruction> {
        self.instructions.last().map(|(_, instruction)| instruction)
    }

    pub fn has_pending_label(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter().map(|(_, instruction)| instruction)
    }
}

impl Display for Tac {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (labels, instruction) in &self.instructions {
            for label in labels {
                writeln!(f, "{label}:")?;
            }
            writeln!(f, "{instruction}")?;
        }
        for label in &self.pending {
            writeln!(f, "{label}:")?;
        }
        Ok(())
    }
}
