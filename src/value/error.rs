use crate::ast::error::AstError;
use crate::interpreter::environment::EnvironmentError;
use crate::string::IdentName;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeErrorKind {
    #[error("错误：变量 '{0}' 未定义")]
    UndefinedVariable(IdentName),
    #[error(transparent)]
    MalformedNode(#[from] AstError),
}

impl From<EnvironmentError> for RuntimeErrorKind {
    fn from(error: EnvironmentError) -> Self {
        match error {
            EnvironmentError::UndefinedVariable(name) => Self::UndefinedVariable(name),
        }
    }
}

/// A fatal fault, tagged with the kind of statement that was executing when it happened.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}")]
pub struct RuntimeError {
    #[source]
    pub kind: RuntimeErrorKind,
    pub statement: &'static str,
}

impl RuntimeError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            RuntimeErrorKind::UndefinedVariable(_) => "RT001",
            RuntimeErrorKind::MalformedNode(_) => "RT002",
        }
    }
}
