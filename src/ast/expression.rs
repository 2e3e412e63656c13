use super::error::AstError;
use crate::string::IdentName;
use compact_str::CompactString;

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Number(f64),
    String(CompactString),
    Bool(bool),
    Null,
    Identifier(IdentName),
    Binary {
        operator: InfixOperator,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    /// An expression type the runtime does not know. It evaluates to `Null`.
    Unsupported(CompactString),
    /// A node whose fields could not be read. It faults only when evaluated.
    Malformed(AstError),
}

impl Expression {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Number(_) => "NUMBER",
            Self::String(_) => "STRING",
            Self::Bool(_) => "BOOL",
            Self::Null => "NULL",
            Self::Identifier(_) => "IDENTIFIER",
            Self::Binary { .. } => "BINARY_OP",
            Self::Unsupported(_) => "<unsupported>",
            Self::Malformed(_) => "<malformed>",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfixOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    GreaterThan,
    LessThan,
    EqualEqual,
    /// An operator token the runtime has no rule for. Kept verbatim; it evaluates to `Null`.
    Unsupported(CompactString),
}

impl InfixOperator {
    pub fn from_symbol(symbol: &str) -> Self {
        match symbol {
            "+" => Self::Add,
            "-" => Self::Subtract,
            "*" => Self::Multiply,
            "/" => Self::Divide,
            ">" => Self::GreaterThan,
            "<" => Self::LessThan,
            "==" => Self::EqualEqual,
            other => Self::Unsupported(other.into()),
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::GreaterThan => ">",
            Self::LessThan => "<",
            Self::EqualEqual => "==",
            Self::Unsupported(symbol) => symbol,
        }
    }
}
