//! # Symbol table
//!
//! Maps `(scope, name)` pairs to entries. The empty scope string is the
//! global (class) scope; every method owns a scope named after itself.
//! Insertion is last-writer-wins, iteration is in key order.

use std::collections::BTreeMap;
use std::fmt::Display;

/// Types a Decaf value can have. `Void` is only valid as a method return type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Void,
    Int,
    Real,
}

impl Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ValueType::Void => "void",
            ValueType::Int => "int",
            ValueType::Real => "real",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Variable,
    Method,
}

impl Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            EntryKind::Variable => "Variable",
            EntryKind::Method => "Method",
        })
    }
}

/// One symbol table entry. For methods the signature encodes the parameter
/// types joined by `::`, e.g. `int::real`; for variables it stays empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub scope: String,
    pub kind: EntryKind,
    pub value_type: ValueType,
    pub signature: String,
}

impl Entry {
    pub fn variable(scope: &str, name: &str, value_type: ValueType) -> Entry {
        Entry {
            name: name.to_string(),
            scope: scope.to_string(),
            kind: EntryKind::Variable,
            value_type,
            signature: String::new(),
        }
    }

    pub fn method(scope: &str, name: &str, return_type: ValueType, signature: &str) -> Entry {
        Entry {
            name: name.to_string(),
            scope: scope.to_string(),
            kind: EntryKind::Method,
            value_type: return_type,
            signature: signature.to_string(),
        }
    }

    /// Placeholder entry created when the lexer interns an identifier or
    /// number lexeme. Lives in the global scope of the lexer's own table.
    pub fn interned(name: &str) -> Entry {
        Entry::variable("", name, ValueType::Void)
    }
}

impl Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({},{},{},{},{})",
            self.name, self.scope, self.kind, self.value_type, self.signature
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    data: BTreeMap<(String, String), Entry>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Entry for `name` in `scope`, if any. No scope fallback happens here;
    /// the analyzer decides how lookups cascade.
    pub fn lookup(&self, scope: &str, name: &str) -> Option<&Entry> {
        self.data.get(&(scope.to_string(), name.to_string()))
    }

    /// Insert an entry, replacing an existing one under the same key.
    pub fn add(&mut self, entry: Entry) {
        self.data
            .insert((entry.scope.clone(), entry.name.clone()), entry);
    }

    /// All entries in `(scope, name)` order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.data.values()
    }
}
