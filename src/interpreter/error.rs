use crate::ast::error::AstError;
use crate::value::error::RuntimeError;
use thiserror::Error;

/// A fault that aborts an `execute` call.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExecutionError {
    #[error(transparent)]
    Ast(#[from] AstError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
