use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{ast::types::Type, errors::errors::ErrorImpl};

use super::value::Value;

pub type EnvironmentLink = Rc<RefCell<Environment>>;

/// One variable slot. `declared` is `None` until an unannotated variable
/// receives its first value.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub declared: Option<Type>,
    pub value: Option<Value>,
}

impl Binding {
    /// Stores a value, converting it to the slot's type first.
    fn store(&mut self, value: Value) -> Result<Value, ErrorImpl> {
        let value = match &self.declared {
            Some(declared) => value.coerce(declared)?,
            None => {
                self.declared = Some(value.type_of());
                value
            }
        };

        self.value = Some(value.clone());
        Ok(value)
    }
}

/// A lexical scope at runtime, chained to the scope that encloses it.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Binding>,
    parent: Option<EnvironmentLink>,
}

impl Environment {
    pub fn new_global() -> EnvironmentLink {
        Rc::new(RefCell::new(Environment::default()))
    }

    pub fn new_child(parent: &EnvironmentLink) -> EnvironmentLink {
        Rc::new(RefCell::new(Environment {
            values: HashMap::new(),
            parent: Some(Rc::clone(parent)),
        }))
    }

    /// Declares `name` in this scope, replacing any binding of the same name here.
    pub fn declare(
        &mut self,
        name: &str,
        declared: Option<Type>,
        value: Option<Value>,
    ) -> Result<(), ErrorImpl> {
        let mut binding = Binding {
            declared,
            value: None,
        };

        if let Some(value) = value {
            binding.store(value)?;
        }

        self.values.insert(name.to_string(), binding);
        Ok(())
    }

    /// Reads the nearest binding of `name`.
    pub fn get(&self, name: &str) -> Result<Value, ErrorImpl> {
        match self.values.get(name) {
            Some(binding) => binding
                .value
                .clone()
                .ok_or_else(|| ErrorImpl::UninitializedVariable {
                    variable: name.to_string(),
                }),
            None => match &self.parent {
                Some(parent) => parent.borrow().get(name),
                None => Err(ErrorImpl::UndefinedVariable {
                    variable: name.to_string(),
                }),
            },
        }
    }

    /// Replaces the value of the nearest binding of `name` and returns the
    /// value as stored.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<Value, ErrorImpl> {
        match self.values.get_mut(name) {
            Some(binding) => binding.store(value),
            None => match &self.parent {
                Some(parent) => parent.borrow_mut().assign(name, value),
                None => Err(ErrorImpl::UndefinedVariable {
                    variable: name.to_string(),
                }),
            },
        }
    }

    /// The binding declared directly in this scope, if any.
    pub fn binding(&self, name: &str) -> Option<&Binding> {
        self.values.get(name)
    }
}
