use crate::string::IdentName;
use crate::value::Value;
use std::{cell::RefCell, collections::HashMap, rc::Rc};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EnvironmentError {
    #[error("Undefined variable `{0}`.")]
    UndefinedVariable(IdentName),
}

/// A handle to one scope frame.
///
/// Frames only point outward to their parent, so a chain can never form a cycle.
/// A parent stays alive for as long as any child still holds it.
#[derive(Debug, Clone)]
pub struct Environment {
    inner: Rc<RefCell<EnvironmentImpl>>,
}

#[derive(Debug)]
struct EnvironmentImpl {
    values: HashMap<IdentName, Value>,
    parent: Option<Environment>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Creates a root frame with no parent.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(EnvironmentImpl {
                values: HashMap::new(),
                parent: None,
            })),
        }
    }

    pub fn new_scope(&self) -> Self {
        Self {
            inner: Rc::new(RefCell::new(EnvironmentImpl {
                values: HashMap::new(),
                parent: Some(self.clone()),
            })),
        }
    }

    pub fn get(&self, name: &str) -> Result<Value, EnvironmentError> {
        let inner = self.inner.borrow();
        inner.get(name)
    }

    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), EnvironmentError> {
        let mut inner = self.inner.borrow_mut();
        inner.assign(name, value)
    }

    /// Binds `name` in this frame only, shadowing any outer binding.
    pub fn define(&mut self, name: &str, value: Value) {
        let mut inner = self.inner.borrow_mut();
        inner.define(name, value)
    }

    pub fn exists_local(&self, name: &str) -> bool {
        self.inner.borrow().values.contains_key(name)
    }

    /// Number of ancestors above this frame. The root frame has depth zero.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut parent = self.inner.borrow().parent.clone();
        while let Some(frame) = parent {
            depth += 1;
            parent = frame.inner.borrow().parent.clone();
        }
        depth
    }

    /// Whether both handles refer to the same frame.
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl EnvironmentImpl {
    fn get(&self, name: &str) -> Result<Value, EnvironmentError> {
        if let Some(value) = self.values.get(name) {
            Ok(value.clone())
        } else if let Some(ref parent) = self.parent {
            parent.get(name)
        } else {
            Err(EnvironmentError::UndefinedVariable(name.into()))
        }
    }

    fn assign(&mut self, name: &str, value: Value) -> Result<(), EnvironmentError> {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
            Ok(())
        } else if let Some(mut parent) = self.parent.clone() {
            parent.assign(name, value)
        } else {
            Err(EnvironmentError::UndefinedVariable(name.into()))
        }
    }

    fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.into(), value);
    }
}
