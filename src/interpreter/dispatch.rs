use compact_str::CompactString;
use std::collections::HashMap;
use thiserror::Error;

/// The host-side representation of an argument passed to an extended function.
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    Int(i64),
    Float(f64),
    Str(CompactString),
    Bool(bool),
    None,
}

impl std::fmt::Display for HostValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::None => write!(f, "none"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DispatchError {
    #[error("Unknown extended function `{0}`.")]
    UnknownFunction(CompactString),
    #[error("Extended function `{name}` failed: {reason}")]
    Failed { name: CompactString, reason: String },
}

/// Executes `AUTO_CALL` statements on behalf of the interpreter.
pub trait Dispatcher {
    fn invoke(&mut self, name: &str, arguments: &[HostValue]) -> Result<(), DispatchError>;
}

impl<D: Dispatcher + ?Sized> Dispatcher for &mut D {
    fn invoke(&mut self, name: &str, arguments: &[HostValue]) -> Result<(), DispatchError> {
        (**self).invoke(name, arguments)
    }
}

/// A dispatcher with no functions at all.
#[derive(Debug, Default)]
pub struct RejectAll;

impl Dispatcher for RejectAll {
    fn invoke(&mut self, name: &str, _arguments: &[HostValue]) -> Result<(), DispatchError> {
        Err(DispatchError::UnknownFunction(name.into()))
    }
}

pub type Handler = Box<dyn FnMut(&[HostValue]) -> Result<(), String>>;

/// A registry of host functions, each reachable under one or more names.
#[derive(Default)]
pub struct FunctionTable {
    handlers: Vec<Handler>,
    names: HashMap<CompactString, usize>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under every name in `names`. A later registration
    /// under an existing name replaces the earlier one for that name.
    pub fn register<F>(&mut self, names: &[&str], handler: F) -> &mut Self
    where
        F: FnMut(&[HostValue]) -> Result<(), String> + 'static,
    {
        let index = self.handlers.len();
        self.handlers.push(Box::new(handler));
        for name in names {
            self.names.insert((*name).into(), index);
        }
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(CompactString::as_str)
    }
}

impl std::fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionTable")
            .field("names", &self.names)
            .finish_non_exhaustive()
    }
}

impl Dispatcher for FunctionTable {
    fn invoke(&mut self, name: &str, arguments: &[HostValue]) -> Result<(), DispatchError> {
        let index = *self
            .names
            .get(name)
            .ok_or_else(|| DispatchError::UnknownFunction(name.into()))?;
        let handler = &mut self.handlers[index];
        handler(arguments).map_err(|reason| DispatchError::Failed {
            name: name.into(),
            reason,
        })
    }
}
