//! # Semantic analyzer
//!
//! One post-order walk over the AST that populates the symbol table, checks
//! declaration, typing and flow rules, and lowers the program to
//! three-address code. Errors abort the walk; warnings are collected and the
//! walk continues. Two runs over the same tree produce identical TAC.

mod tac;

pub use tac::{Instruction, Tac};

use std::{error::Error, fmt::Display};

use crate::parser::ast::{
    ArithmeticOp, Assignment, Block, Expression, Method, MethodCall, Program, RelationalOp,
    Statement, Update,
};
use crate::symbol_table::{Entry, EntryKind, SymbolTable, ValueType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
    Undeclared { name: String },
    Redeclared { name: String, scope: String },
    NotAMethod { name: String },
    MissingMain,
    BreakOutsideLoop,
    ContinueOutsideLoop,
    MissingReturnValue { method: String },
    UnexpectedReturnValue { method: String },
}

impl Display for SemanticError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SemanticError::Undeclared { name } => {
                write!(f, "identifier '{name}' is not declared")
            }
            SemanticError::Redeclared { name, scope } if scope.is_empty() => {
                write!(f, "identifier '{name}' is already declared")
            }
            SemanticError::Redeclared { name, scope } => {
                write!(f, "identifier '{name}' is already declared in '{scope}'")
            }
            SemanticError::NotAMethod { name } => write!(f, "'{name}' is not a method"),
            SemanticError::MissingMain => f.write_str("program has no 'main' method"),
            SemanticError::BreakOutsideLoop => f.write_str("'break' used outside of a loop"),
            SemanticError::ContinueOutsideLoop => {
                f.write_str("'continue' used outside of a loop")
            }
            SemanticError::MissingReturnValue { method } => {
                write!(f, "method '{method}' must return a value")
            }
            SemanticError::UnexpectedReturnValue { method } => {
                write!(f, "method '{method}' does not return a value")
            }
        }
    }
}

impl Error for SemanticError {}

pub type SemanticResult<T> = Result<T, SemanticError>;

/// Output of a successful analysis.
#[derive(Debug)]
pub struct Analysis {
    pub tac: Tac,
    pub warnings: Vec<String>,
}

pub struct Analyzer<'a> {
    table: &'a mut SymbolTable,
    tac: Tac,
    temps: usize,
    labels: usize,
    /// Name of the enclosing method, empty at class scope.
    scope: String,
    /// Label numbers of the enclosing `for` loops, innermost last.
    loops: Vec<usize>,
    warnings: Vec<String>,
}

impl<'a> Analyzer<'a> {
    pub fn new(table: &'a mut SymbolTable) -> Analyzer<'a> {
        Analyzer {
            table,
            tac: Tac::new(),
            temps: 0,
            labels: 0,
            scope: String::new(),
            loops: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn analyze(mut self, program: &Program) -> SemanticResult<Analysis> {
        self.program(program)?;
        Ok(Analysis {
            tac: self.tac,
            warnings: self.warnings,
        })
    }

    fn fresh_temp(&mut self) -> String {
        let temp = format!("t{}", self.temps);
        self.temps += 1;
        temp
    }

    /// One number per construct; every label base of the construct shares it.
    fn fresh_label(&mut self) -> usize {
        let label = self.labels;
        self.labels += 1;
        label
    }

    fn warn(&mut self, message: String) {
        self.warnings.push(message);
    }

    fn declare(&mut self, entry: Entry) -> SemanticResult<()> {
        if self.table.lookup(&entry.scope, &entry.name).is_some() {
            return Err(SemanticError::Redeclared {
                name: entry.name,
                scope: entry.scope,
            });
        }
        self.table.add(entry);
        Ok(())
    }

    /// Resolve an identifier: method scope first, then the class scope.
    fn resolve(&self, name: &str) -> SemanticResult<&Entry> {
        if !self.scope.is_empty() {
            if let Some(entry) = self.table.lookup(&self.scope, name) {
                return Ok(entry);
            }
        }
        self.table
            .lookup("", name)
            .ok_or_else(|| SemanticError::Undeclared {
                name: name.to_string(),
            })
    }

    fn program(&mut self, program: &Program) -> SemanticResult<()> {
        for declaration in &program.declarations {
            for name in &declaration.names {
                self.declare(Entry::variable("", name, declaration.value_type))?;
                self.tac.emit(Instruction::Var(name.clone()));
            }
        }
        self.tac.emit(Instruction::Goto("main".to_string()));
        for method in &program.methods {
            self.method(method)?;
        }
        match self.table.lookup("", "main") {
            Some(entry) if entry.kind == EntryKind::Method => Ok(()),
            _ => Err(SemanticError::MissingMain),
        }
    }

    fn method(&mut self, method: &Method) -> SemanticResult<()> {
        let signature = method
            .parameters
            .iter()
            .map(|parameter| parameter.value_type.to_string())
            .collect::<Vec<_>>()
            .join("::");

        self.tac.label_next(method.name.clone());
        self.declare(Entry::method(
            "",
            &method.name,
            method.return_type,
            &signature,
        ))?;
        // shadow entry so a local cannot take the enclosing method's name
        self.table.add(Entry::method(
            &method.name,
            &method.name,
            method.return_type,
            &signature,
        ));
        self.scope = method.name.clone();

        for parameter in &method.parameters {
            self.declare(Entry::variable(
                &method.name,
                &parameter.name,
                parameter.value_type,
            ))?;
            self.tac
                .emit(Instruction::FormalParam(parameter.name.clone()));
        }
        for declaration in &method.declarations {
            for name in &declaration.names {
                self.declare(Entry::variable(&method.name, name, declaration.value_type))?;
                self.tac.emit(Instruction::Var(name.clone()));
            }
        }
        for statement in &method.body {
            self.statement(statement)?;
        }

        // close the method; a pending label still needs an instruction to
        // bind to
        if !matches!(self.tac.last(), Some(Instruction::Return)) || self.tac.has_pending_label() {
            self.tac.emit(Instruction::Return);
        }

        self.scope.clear();
        Ok(())
    }

    fn statement(&mut self, statement: &Statement) -> SemanticResult<()> {
        match statement {
            Statement::Assign(assignment) => self.assign(assignment),
            Statement::Update(update) => self.update(update),
            Statement::Call(call) => {
                self.method_call(call)?;
                Ok(())
            }
            Statement::Return(value) => self.return_statement(value.as_ref()),
            Statement::Break => match self.loops.last() {
                Some(label) => {
                    self.tac.emit(Instruction::Goto(format!("for_end_{label}")));
                    Ok(())
                }
                None => Err(SemanticError::BreakOutsideLoop),
            },
            Statement::Continue => match self.loops.last() {
                Some(label) => {
                    self.tac
                        .emit(Instruction::Goto(format!("for_incr_{label}")));
                    Ok(())
                }
                None => Err(SemanticError::ContinueOutsideLoop),
            },
            Statement::Block(block) => self.block(block),
            Statement::If {
                condition,
                then_block,
                else_block,
            } => self.if_statement(condition, then_block, else_block.as_ref()),
            Statement::For {
                init,
                condition,
                update,
                body,
            } => self.for_statement(init, condition, update, body),
        }
    }

    fn block(&mut self, block: &Block) -> SemanticResult<()> {
        for statement in &block.statements {
            self.statement(statement)?;
        }
        Ok(())
    }

    fn assign(&mut self, assignment: &Assignment) -> SemanticResult<()> {
        let target_type = self.resolve(&assignment.target)?.value_type;
        let (value, value_type) = self.expression(&assignment.value)?;
        if value_type != target_type {
            self.warn(format!(
                "assignment to '{}' mixes {} and {}",
                assignment.target, target_type, value_type
            ));
        }
        self.tac
            .emit(Instruction::Assign(value, assignment.target.clone()));
        Ok(())
    }

    fn update(&mut self, update: &Update) -> SemanticResult<()> {
        let (name, increment) = match update {
            Update::Increment(name) => (name, true),
            Update::Decrement(name) => (name, false),
        };
        let value_type = self.resolve(name)?.value_type;
        let one = if value_type == ValueType::Real {
            "1.0"
        } else {
            "1"
        };
        let instruction = if increment {
            Instruction::Add(name.clone(), one.to_string(), name.clone())
        } else {
            Instruction::Sub(name.clone(), one.to_string(), name.clone())
        };
        self.tac.emit(instruction);
        Ok(())
    }

    fn return_statement(&mut self, value: Option<&Expression>) -> SemanticResult<()> {
        let method = self.scope.clone();
        let declared = self
            .table
            .lookup("", &method)
            .map(|entry| entry.value_type)
            .unwrap_or(ValueType::Void);

        match value {
            Some(expression) => {
                if declared == ValueType::Void {
                    return Err(SemanticError::UnexpectedReturnValue { method });
                }
                let (result, result_type) = self.expression(expression)?;
                if result_type != declared {
                    self.warn(format!(
                        "method '{method}' returns {declared} but the value is {result_type}"
                    ));
                }
                self.tac.emit(Instruction::Assign(result, method));
                self.tac.emit(Instruction::Return);
            }
            None => {
                if declared != ValueType::Void {
                    return Err(SemanticError::MissingReturnValue { method });
                }
                self.tac.emit(Instruction::Return);
            }
        }
        Ok(())
    }

    fn if_statement(
        &mut self,
        condition: &Expression,
        then_block: &Block,
        else_block: Option<&Block>,
    ) -> SemanticResult<()> {
        let (value, value_type) = self.expression(condition)?;
        if value_type != ValueType::Int {
            self.warn(format!("condition of 'if' is {value_type}, not int"));
        }
        let label = self.fresh_label();
        self.tac.emit(Instruction::IfNe(
            value,
            "0".to_string(),
            format!("true_block_{label}"),
        ));
        if let Some(block) = else_block {
            self.block(block)?;
        }
        self.tac.emit(Instruction::Goto(format!("if_end_{label}")));
        self.tac.label_next(format!("true_block_{label}"));
        self.block(then_block)?;
        self.tac.label_next(format!("if_end_{label}"));
        Ok(())
    }

    fn for_statement(
        &mut self,
        init: &Assignment,
        condition: &Expression,
        update: &Update,
        body: &Block,
    ) -> SemanticResult<()> {
        self.assign(init)?;
        let label = self.fresh_label();
        self.tac.label_next(format!("for_expr_{label}"));
        let (value, value_type) = self.expression(condition)?;
        if value_type != ValueType::Int {
            self.warn(format!("condition of 'for' is {value_type}, not int"));
        }
        self.tac.emit(Instruction::IfEq(
            value,
            "0".to_string(),
            format!("for_end_{label}"),
        ));
        self.loops.push(label);
        self.block(body)?;
        self.loops.pop();
        self.tac.label_next(format!("for_incr_{label}"));
        self.update(update)?;
        self.tac
            .emit(Instruction::Goto(format!("for_expr_{label}")));
        self.tac.label_next(format!("for_end_{label}"));
        Ok(())
    }

    /// Lower one expression; the returned pair is the result variable and its
    /// declared type.
    fn expression(&mut self, expression: &Expression) -> SemanticResult<(String, ValueType)> {
        match expression {
            Expression::Number(value) => {
                let value_type = if value.bytes().all(|byte| byte.is_ascii_digit()) {
                    ValueType::Int
                } else {
                    ValueType::Real
                };
                Ok((value.clone(), value_type))
            }
            Expression::Variable(name) => {
                let value_type = self.resolve(name)?.value_type;
                Ok((name.clone(), value_type))
            }
            Expression::Call(call) => self.method_call(call),
            Expression::Arithmetic {
                op,
                lhs: Some(lhs),
                rhs,
            } => self.arithmetic(*op, lhs, rhs),
            Expression::Arithmetic { op, lhs: None, rhs } => self.unary(*op, rhs),
            Expression::Relational { op, lhs, rhs } => self.relational(*op, lhs, rhs),
            Expression::And(lhs, rhs) => self.and(lhs, rhs),
            Expression::Or(lhs, rhs) => self.or(lhs, rhs),
            Expression::Not(rhs) => self.not(rhs),
        }
    }

    fn arithmetic(
        &mut self,
        op: ArithmeticOp,
        lhs: &Expression,
        rhs: &Expression,
    ) -> SemanticResult<(String, ValueType)> {
        let (left, left_type) = self.expression(lhs)?;
        let (right, right_type) = self.expression(rhs)?;
        if left_type != right_type {
            self.warn(format!(
                "arithmetic '{}' mixes {left_type} and {right_type}",
                op.symbol()
            ));
        }
        let result = self.fresh_temp();
        self.tac.emit(Instruction::Var(result.clone()));
        let instruction = match op {
            ArithmeticOp::Add => Instruction::Add(left, right, result.clone()),
            ArithmeticOp::Subtract => Instruction::Sub(left, right, result.clone()),
            ArithmeticOp::Multiply => Instruction::Mult(left, right, result.clone()),
            ArithmeticOp::Divide => Instruction::Divide(left, right, result.clone()),
            ArithmeticOp::Modulus => Instruction::Mod(left, right, result.clone()),
        };
        self.tac.emit(instruction);
        // the left operand decides the result type
        Ok((result, left_type))
    }

    fn unary(&mut self, op: ArithmeticOp, rhs: &Expression) -> SemanticResult<(String, ValueType)> {
        let (value, value_type) = self.expression(rhs)?;
        match op {
            ArithmeticOp::Add => Ok((value, value_type)),
            ArithmeticOp::Subtract => {
                let result = self.fresh_temp();
                self.tac.emit(Instruction::Var(result.clone()));
                self.tac.emit(Instruction::UMinus(value, result.clone()));
                Ok((result, value_type))
            }
            _ => unreachable!("only '+' and '-' appear as unary operators"),
        }
    }

    fn relational(
        &mut self,
        op: RelationalOp,
        lhs: &Expression,
        rhs: &Expression,
    ) -> SemanticResult<(String, ValueType)> {
        let (left, left_type) = self.expression(lhs)?;
        let (right, right_type) = self.expression(rhs)?;
        if left_type != right_type {
            self.warn(format!(
                "comparison '{}' mixes {left_type} and {right_type}",
                op.symbol()
            ));
        }
        let label = self.fresh_label();
        let result = self.fresh_temp();
        let rel_true = format!("rel_true_{label}");
        let branch = match op {
            RelationalOp::Eq => Instruction::IfEq(left, right, rel_true.clone()),
            RelationalOp::Neq => Instruction::IfNe(left, right, rel_true.clone()),
            RelationalOp::Lt => Instruction::IfLt(left, right, rel_true.clone()),
            RelationalOp::Le => Instruction::IfLe(left, right, rel_true.clone()),
            RelationalOp::Gt => Instruction::IfGt(left, right, rel_true.clone()),
            RelationalOp::Ge => Instruction::IfGe(left, right, rel_true.clone()),
        };
        self.tac.emit(branch);
        self.tac
            .emit(Instruction::Assign("0".to_string(), result.clone()));
        self.tac.emit(Instruction::Goto(format!("rel_end_{label}")));
        self.tac.label_next(rel_true);
        self.tac
            .emit(Instruction::Assign("1".to_string(), result.clone()));
        self.tac.label_next(format!("rel_end_{label}"));
        Ok((result, ValueType::Int))
    }

    fn and(&mut self, lhs: &Expression, rhs: &Expression) -> SemanticResult<(String, ValueType)> {
        let label = self.fresh_label();
        let result = self.fresh_temp();
        let and_false = format!("and_false_{label}");

        let (left, _) = self.expression(lhs)?;
        self.tac
            .emit(Instruction::IfEq(left, "0".to_string(), and_false.clone()));
        let (right, _) = self.expression(rhs)?;
        self.tac
            .emit(Instruction::IfEq(right, "0".to_string(), and_false.clone()));
        self.tac
            .emit(Instruction::Assign("1".to_string(), result.clone()));
        self.tac.emit(Instruction::Goto(format!("and_end_{label}")));
        self.tac.label_next(and_false);
        self.tac
            .emit(Instruction::Assign("0".to_string(), result.clone()));
        self.tac.label_next(format!("and_end_{label}"));
        Ok((result, ValueType::Int))
    }

    fn or(&mut self, lhs: &Expression, rhs: &Expression) -> SemanticResult<(String, ValueType)> {
        let label = self.fresh_label();
        let result = self.fresh_temp();
        let or_true = format!("or_true_{label}");

        let (left, _) = self.expression(lhs)?;
        self.tac
            .emit(Instruction::IfNe(left, "0".to_string(), or_true.clone()));
        let (right, _) = self.expression(rhs)?;
        self.tac
            .emit(Instruction::IfNe(right, "0".to_string(), or_true.clone()));
        self.tac
            .emit(Instruction::Assign("0".to_string(), result.clone()));
        self.tac.emit(Instruction::Goto(format!("or_end_{label}")));
        self.tac.label_next(or_true);
        self.tac
            .emit(Instruction::Assign("1".to_string(), result.clone()));
        self.tac.label_next(format!("or_end_{label}"));
        Ok((result, ValueType::Int))
    }

    fn not(&mut self, rhs: &Expression) -> SemanticResult<(String, ValueType)> {
        let (value, value_type) = self.expression(rhs)?;
        if value_type != ValueType::Int {
            self.warn(format!("'!' applied to {value_type}, not int"));
        }
        let label = self.fresh_label();
        let result = self.fresh_temp();
        self.tac.emit(Instruction::IfNe(
            value,
            "0".to_string(),
            format!("not_true_{label}"),
        ));
        self.tac
            .emit(Instruction::Assign("1".to_string(), result.clone()));
        self.tac.emit(Instruction::Goto(format!("not_end_{label}")));
        self.tac.label_next(format!("not_true_{label}"));
        self.tac
            .emit(Instruction::Assign("0".to_string(), result.clone()));
        self.tac.label_next(format!("not_end_{label}"));
        Ok((result, ValueType::Int))
    }

    fn method_call(&mut self, call: &MethodCall) -> SemanticResult<(String, ValueType)> {
        if call.name == "write" || call.name == "writeln" {
            if call.arguments.len() > 1 {
                self.warn(format!(
                    "'{}' takes one argument, {} given",
                    call.name,
                    call.arguments.len()
                ));
            }
            if let Some(argument) = call.arguments.first() {
                let (value, _) = self.expression(argument)?;
                self.tac.emit(Instruction::ActualParam(value));
            }
            self.tac.emit(Instruction::Call(call.name.clone()));
            return Ok((call.name.clone(), ValueType::Void));
        }

        let entry = self
            .table
            .lookup("", &call.name)
            .ok_or_else(|| SemanticError::Undeclared {
                name: call.name.clone(),
            })?;
        if entry.kind != EntryKind::Method {
            return Err(SemanticError::NotAMethod {
                name: call.name.clone(),
            });
        }
        let return_type = entry.value_type;
        let signature = entry.signature.clone();
        let expected: Vec<&str> = if signature.is_empty() {
            Vec::new()
        } else {
            signature.split("::").collect()
        };

        if expected.len() != call.arguments.len() {
            self.warn(format!(
                "method '{}' takes {} arguments, {} given",
                call.name,
                expected.len(),
                call.arguments.len()
            ));
        }

        let mut values = Vec::with_capacity(call.arguments.len());
        for (index, argument) in call.arguments.iter().enumerate() {
            let (value, value_type) = self.expression(argument)?;
            if let Some(declared) = expected.get(index) {
                if *declared != value_type.to_string() {
                    self.warn(format!(
                        "argument {} of '{}' is {value_type}, expected {declared}",
                        index + 1,
                        call.name
                    ));
                }
            }
            values.push(value);
        }
        for value in values {
            self.tac.emit(Instruction::ActualParam(value));
        }
        self.tac.emit(Instruction::Call(call.name.clone()));
        Ok((call.name.clone(), return_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn analyze(source: &str) -> (Analysis, SymbolTable) {
        let program = Parser::decaf(source).parse().unwrap();
        let mut table = SymbolTable::new();
        let analysis = Analyzer::new(&mut table).analyze(&program).unwrap();
        (analysis, table)
    }

    fn analyze_err(source: &str) -> SemanticError {
        let program = Parser::decaf(source).parse().unwrap();
        let mut table = SymbolTable::new();
        Analyzer::new(&mut table).analyze(&program).unwrap_err()
    }

    #[test]
    fn test_minimal_listing() {
        let (analysis, table) =
            analyze("class C { int x; static int main() { x = 1; return x; } }");

        assert_eq!(
            "VAR x\nGOTO main\nmain:\nx = 1\nmain = x\nRETURN\n",
            analysis.tac.to_string()
        );
        assert!(analysis.warnings.is_empty());

        let entries: Vec<String> = table.entries().map(|entry| entry.to_string()).collect();
        assert_eq!(
            vec![
                "(main,,Method,int,)".to_string(),
                "(x,,Variable,int,)".to_string(),
                "(main,main,Method,int,)".to_string(),
            ],
            entries
        );
    }

    #[test]
    fn test_void_method_gets_a_trailing_return() {
        let (analysis, _) = analyze("class C { static void main() { } }");
        assert_eq!("GOTO main\nmain:\nRETURN\n", analysis.tac.to_string());
    }

    #[test]
    fn test_arithmetic_declares_its_temporaries() {
        let (analysis, _) = analyze(
            "class C { int x; static void main() { x = 1 + 2 * 3; } }",
        );
        assert_eq!(
            "VAR x\nGOTO main\nmain:\nVAR t0\nt0 = 2 * 3\nVAR t1\nt1 = 1 + t0\nx = t1\nRETURN\n",
            analysis.tac.to_string()
        );
    }

    #[test]
    fn test_unary_minus() {
        let (analysis, _) = analyze("class C { int x; static void main() { x = -x; } }");
        assert_eq!(
            "VAR x\nGOTO main\nmain:\nVAR t0\nUMINUS x t0\nx = t0\nRETURN\n",
            analysis.tac.to_string()
        );
    }

    #[test]
    fn test_unary_plus_passes_through() {
        let (analysis, _) = analyze("class C { int x; static void main() { x = +x; } }");
        assert_eq!(
            "VAR x\nGOTO main\nmain:\nx = x\nRETURN\n",
            analysis.tac.to_string()
        );
    }

    #[test]
    fn test_relational_lowering() {
        let (analysis, _) =
            analyze("class C { int x; static void main() { x = x < 3; } }");
        assert_eq!(
            "VAR x\n\
             GOTO main\n\
             main:\n\
             if x < 3 goto rel_true_0\n\
             t0 = 0\n\
             GOTO rel_end_0\n\
             rel_true_0:\n\
             t0 = 1\n\
             rel_end_0:\n\
             x = t0\n\
             RETURN\n",
            analysis.tac.to_string()
        );
    }

    #[test]
    fn test_short_circuit_and() {
        let (analysis, _) = analyze(
            "class C { int a, b, x; static void main() { x = a && b; } }",
        );
        assert_eq!(
            "VAR a\n\
             VAR b\n\
             VAR x\n\
             GOTO main\n\
             main:\n\
             if a == 0 goto and_false_0\n\
             if b == 0 goto and_false_0\n\
             t0 = 1\n\
             GOTO and_end_0\n\
             and_false_0:\n\
             t0 = 0\n\
             and_end_0:\n\
             x = t0\n\
             RETURN\n",
            analysis.tac.to_string()
        );
    }

    #[test]
    fn test_short_circuit_or() {
        let (analysis, _) = analyze(
            "class C { int a, b, x; static void main() { x = a || b; } }",
        );
        assert_eq!(
            "VAR a\n\
             VAR b\n\
             VAR x\n\
             GOTO main\n\
             main:\n\
             if a != 0 goto or_true_0\n\
             if b != 0 goto or_true_0\n\
             t0 = 0\n\
             GOTO or_end_0\n\
             or_true_0:\n\
             t0 = 1\n\
             or_end_0:\n\
             x = t0\n\
             RETURN\n",
            analysis.tac.to_string()
        );
    }

    #[test]
    fn test_not_lowering() {
        let (analysis, _) = analyze("class C { int x; static void main() { x = !x; } }");
        assert_eq!(
            "VAR x\n\
             GOTO main\n\
             main:\n\
             if x != 0 goto not_true_0\n\
             t0 = 1\n\
             GOTO not_end_0\n\
             not_true_0:\n\
             t0 = 0\n\
             not_end_0:\n\
             x = t0\n\
             RETURN\n",
            analysis.tac.to_string()
        );
    }

    #[test]
    fn test_if_else_lowering() {
        let (analysis, _) = analyze(
            "class C { int x; static void main() {
               if (x) { x = 1; } else { x = 2; }
             } }",
        );
        assert_eq!(
            "VAR x\n\
             GOTO main\n\
             main:\n\
             if x != 0 goto true_block_0\n\
             x = 2\n\
             GOTO if_end_0\n\
             true_block_0:\n\
             x = 1\n\
             if_end_0:\n\
             RETURN\n",
            analysis.tac.to_string()
        );
    }

    #[test]
    fn test_return_inside_if_still_closes_the_method() {
        let (analysis, _) = analyze(
            "class C { int x; static void main() { if (x) { return; } } }",
        );
        assert_eq!(
            "VAR x\n\
             GOTO main\n\
             main:\n\
             if x != 0 goto true_block_0\n\
             GOTO if_end_0\n\
             true_block_0:\n\
             RETURN\n\
             if_end_0:\n\
             RETURN\n",
            analysis.tac.to_string()
        );
    }

    #[test]
    fn test_for_break_continue_lowering() {
        let (analysis, _) = analyze(
            "class C { int i, s; static void main() {
               for (i = 0; i < 3; i++) { s = s + i; break; continue; }
             } }",
        );
        assert_eq!(
            "VAR i\n\
             VAR s\n\
             GOTO main\n\
             main:\n\
             i = 0\n\
             for_expr_0:\n\
             if i < 3 goto rel_true_1\n\
             t0 = 0\n\
             GOTO rel_end_1\n\
             rel_true_1:\n\
             t0 = 1\n\
             rel_end_1:\n\
             if t0 == 0 goto for_end_0\n\
             VAR t1\n\
             t1 = s + i\n\
             s = t1\n\
             GOTO for_end_0\n\
             GOTO for_incr_0\n\
             for_incr_0:\n\
             i = i + 1\n\
             GOTO for_expr_0\n\
             for_end_0:\n\
             RETURN\n",
            analysis.tac.to_string()
        );
    }

    #[test]
    fn test_increment_uses_the_declared_type() {
        let (analysis, _) = analyze(
            "class C { int i; real r; static void main() { i++; r--; } }",
        );
        assert_eq!(
            "VAR i\nVAR r\nGOTO main\nmain:\ni = i + 1\nr = r - 1.0\nRETURN\n",
            analysis.tac.to_string()
        );
    }

    #[test]
    fn test_method_calls_collect_params_then_call() {
        let (analysis, _) = analyze(
            "class C { int x;
               static int sum(int a, int b) { return a; }
               static void main() { x = sum(x, 2); }
             }",
        );
        assert_eq!(
            "VAR x\n\
             GOTO main\n\
             sum:\n\
             FPARAM a\n\
             FPARAM b\n\
             sum = a\n\
             RETURN\n\
             main:\n\
             APARAM x\n\
             APARAM 2\n\
             CALL sum\n\
             x = sum\n\
             RETURN\n",
            analysis.tac.to_string()
        );
    }

    #[test]
    fn test_write_takes_only_the_first_argument() {
        let (analysis, _) = analyze(
            "class C { int x; static void main() { write(x, 2); writeln(); } }",
        );
        assert_eq!(
            "VAR x\nGOTO main\nmain:\nAPARAM x\nCALL write\nCALL writeln\nRETURN\n",
            analysis.tac.to_string()
        );
        assert_eq!(
            vec!["'write' takes one argument, 2 given".to_string()],
            analysis.warnings
        );
    }

    #[test]
    fn test_arity_and_type_mismatches_warn() {
        let (analysis, _) = analyze(
            "class C { int x; real r;
               static int sum(int a, real b) { return a; }
               static void main() { x = sum(r); }
             }",
        );
        assert_eq!(
            vec![
                "method 'sum' takes 2 arguments, 1 given".to_string(),
                "argument 1 of 'sum' is real, expected int".to_string(),
            ],
            analysis.warnings
        );
    }

    #[test]
    fn test_mixed_types_warn() {
        let (analysis, _) = analyze(
            "class C { int x; real r; static void main() { x = x + r; x = r; } }",
        );
        assert_eq!(
            vec![
                "arithmetic '+' mixes int and real".to_string(),
                "assignment to 'x' mixes int and real".to_string(),
            ],
            analysis.warnings
        );
    }

    #[test]
    fn test_number_literal_types() {
        let (analysis, _) = analyze(
            "class C { real r; static void main() { r = 1.5; r = 13E+9; } }",
        );
        assert!(analysis.warnings.is_empty());
        let (analysis, _) = analyze("class C { real r; static void main() { r = 2; } }");
        assert_eq!(
            vec!["assignment to 'r' mixes real and int".to_string()],
            analysis.warnings
        );
    }

    #[test]
    fn test_parameters_resolve_in_method_scope() {
        let (analysis, _) = analyze(
            "class C { static int id(int a) { return a; } static void main() { } }",
        );
        assert!(analysis.warnings.is_empty());
    }

    #[test]
    fn test_local_shadows_class_variable() {
        let (analysis, table) = analyze(
            "class C { int x; static void main() { real x; x = 1.0; } }",
        );
        assert!(analysis.warnings.is_empty());
        assert_eq!(
            ValueType::Real,
            table.lookup("main", "x").unwrap().value_type
        );
    }

    #[test]
    fn test_undeclared_identifier_errors() {
        assert_eq!(
            SemanticError::Undeclared {
                name: "y".to_string()
            },
            analyze_err("class C { static void main() { y = 1; } }")
        );
    }

    #[test]
    fn test_redeclaration_errors() {
        assert_eq!(
            SemanticError::Redeclared {
                name: "x".to_string(),
                scope: "".to_string()
            },
            analyze_err("class C { int x; real x; static void main() { } }")
        );
        assert_eq!(
            SemanticError::Redeclared {
                name: "a".to_string(),
                scope: "f".to_string()
            },
            analyze_err(
                "class C { static void f(int a) { int a; } static void main() { } }"
            )
        );
    }

    #[test]
    fn test_local_cannot_take_the_method_name() {
        assert_eq!(
            SemanticError::Redeclared {
                name: "main".to_string(),
                scope: "main".to_string()
            },
            analyze_err("class C { static void main() { int main; } }")
        );
    }

    #[test]
    fn test_missing_main_errors() {
        assert_eq!(
            SemanticError::MissingMain,
            analyze_err("class C { static void helper() { } }")
        );
    }

    #[test]
    fn test_break_and_continue_need_a_loop() {
        assert_eq!(
            SemanticError::BreakOutsideLoop,
            analyze_err("class C { static void main() { break; } }")
        );
        assert_eq!(
            SemanticError::ContinueOutsideLoop,
            analyze_err("class C { static void main() { continue; } }")
        );
    }

    #[test]
    fn test_return_value_mismatches_error() {
        assert_eq!(
            SemanticError::MissingReturnValue {
                method: "f".to_string()
            },
            analyze_err("class C { static int f() { return; } static void main() { } }")
        );
        assert_eq!(
            SemanticError::UnexpectedReturnValue {
                method: "main".to_string()
            },
            analyze_err("class C { static void main() { return 1; } }")
        );
    }

    #[test]
    fn test_calling_a_variable_errors() {
        assert_eq!(
            SemanticError::NotAMethod {
                name: "x".to_string()
            },
            analyze_err("class C { int x; static void main() { x(); } }")
        );
    }

    #[test]
    fn test_calling_an_undeclared_method_errors() {
        assert_eq!(
            SemanticError::Undeclared {
                name: "nope".to_string()
            },
            analyze_err("class C { static void main() { nope(); } }")
        );
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let source = "class C { int a, b, x; static void main() {
            for (a = 0; a < 10 && b; a++) { if (x == 2) { continue; } }
        } }";
        let (first, _) = analyze(source);
        let (second, _) = analyze(source);
        assert_eq!(first.tac.to_string(), second.tac.to_string());
    }
}
