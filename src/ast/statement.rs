use super::{error::AstError, expression::Expression};
use compact_str::CompactString;
use crate::string::IdentName;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Block(Block),
    If(IfStatement),
    Loop(LoopStatement),
    Print(PrintStatement),
    Assignment(AssignmentStatement),
    AutoCall(AutoCallStatement),
    /// A statement type the runtime does not know. Executing it does nothing.
    Unsupported(CompactString),
    /// A node whose fields could not be read. It faults only when executed.
    Malformed(AstError),
}

impl Statement {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Block(_) => "BLOCK",
            Self::If(_) => "IF",
            Self::Loop(_) => "LOOP",
            Self::Print(_) => "PRINT",
            Self::Assignment(_) => "ASSIGNMENT",
            Self::AutoCall(_) => "AUTO_CALL",
            Self::Unsupported(_) => "<unsupported>",
            Self::Malformed(_) => "<malformed>",
        }
    }
}

/// The body of an `IF` branch or a `LOOP`.
///
/// A block body is unwrapped: its statements run directly in the frame the
/// owning statement pushes, rather than in a second nested frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Block(Block),
    Single(Box<Statement>),
}

impl Body {
    pub fn statements(&self) -> &[Statement] {
        match self {
            Body::Block(block) => &block.statements,
            Body::Single(statement) => std::slice::from_ref(&**statement),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub condition: Expression,
    pub body: Body,
    pub else_body: Option<Body>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoopStatement {
    pub condition: Expression,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrintStatement {
    pub expr: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentStatement {
    pub target: IdentName,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AutoCallStatement {
    pub function: IdentName,
    pub arguments: Vec<Expression>,
}
