use std::collections::HashMap;

use crate::{ast::types::Type, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Parameter,
    Function,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub ty: Type,
    pub kind: SymbolKind,
    pub declared_at: Position,
}

/// A stack of lexical scopes. The bottom scope holds globals and is never popped.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<HashMap<String, Symbol>>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![HashMap::new()],
        }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Pops the innermost scope, dropping everything declared in it.
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Number of active scopes, including the global one.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Declares a symbol in the innermost scope.
    ///
    /// Fails with the position of the earlier declaration when the name is
    /// already taken in that scope. Shadowing an outer declaration is allowed.
    pub fn declare(&mut self, symbol: Symbol) -> Result<(), Position> {
        if let Some(existing) = self.lookup_current(&symbol.name) {
            return Err(existing.declared_at);
        }

        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(symbol.name.clone(), symbol);
        }
        Ok(())
    }

    /// Finds the nearest declaration of `name`, innermost scope first.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn lookup_current(&self, name: &str) -> Option<&Symbol> {
        self.scopes.last().and_then(|scope| scope.get(name))
    }
}
