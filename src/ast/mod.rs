pub mod error;
pub mod expression;
pub mod formatter;
pub mod statement;

use error::AstError;
use expression::{Expression, InfixOperator};
use serde_json::{Map, Value as JsonValue};
use statement::{
    AssignmentStatement, AutoCallStatement, Block, Body, IfStatement, LoopStatement,
    PrintStatement, Statement,
};

/// A lowered program: the statements of the root `BLOCK`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    root: Block,
}

impl Program {
    pub fn new(root: Block) -> Self {
        Self { root }
    }

    /// Lowers a JSON syntax tree into typed nodes.
    ///
    /// Returns `Ok(None)` when the root is not a `BLOCK` node; such input is not
    /// a program and executing it does nothing. Only a malformed root is an
    /// error here. A malformed node further down is kept in the tree as a
    /// `Malformed` node and faults when execution reaches it.
    pub fn lower(root: &JsonValue) -> Result<Option<Self>, AstError> {
        let Some(fields) = root.as_object() else {
            return Ok(None);
        };
        match fields.get("type") {
            None => return Ok(None),
            Some(JsonValue::String(tag)) if tag == "BLOCK" => {}
            Some(JsonValue::String(_)) => return Ok(None),
            Some(_) => {
                return Err(AstError::WrongType {
                    node: "<root>".into(),
                    key: "type",
                    expected: "a string",
                })
            }
        }
        let node = Node {
            tag: "BLOCK",
            fields,
        };
        Ok(Some(Self::new(lower_block(&node)?)))
    }

    pub fn statements(&self) -> &[Statement] {
        &self.root.statements
    }

    pub fn root(&self) -> &Block {
        &self.root
    }

    /// Every malformed node in the program, in source order, whether or not
    /// execution would reach it.
    pub fn faults(&self) -> Vec<&AstError> {
        let mut faults = Vec::new();
        collect_statement_faults(&self.root.statements, &mut faults);
        faults
    }
}

/// A borrowed view of one JSON node with typed field accessors.
struct Node<'a> {
    tag: &'a str,
    fields: &'a Map<String, JsonValue>,
}

impl<'a> Node<'a> {
    fn from_json(value: &'a JsonValue) -> Result<Self, AstError> {
        let fields = value
            .as_object()
            .ok_or_else(|| AstError::NotANode(json_kind(value)))?;
        let tag = match fields.get("type") {
            Some(JsonValue::String(tag)) => tag.as_str(),
            Some(_) => {
                return Err(AstError::WrongType {
                    node: "<node>".into(),
                    key: "type",
                    expected: "a string",
                })
            }
            None => {
                return Err(AstError::MissingKey {
                    node: "<node>".into(),
                    key: "type",
                })
            }
        };
        Ok(Self { tag, fields })
    }

    fn field(&self, key: &'static str) -> Result<&'a JsonValue, AstError> {
        self.fields.get(key).ok_or_else(|| AstError::MissingKey {
            node: self.tag.into(),
            key,
        })
    }

    fn wrong_type(&self, key: &'static str, expected: &'static str) -> AstError {
        AstError::WrongType {
            node: self.tag.into(),
            key,
            expected,
        }
    }

    fn string(&self, key: &'static str) -> Result<&'a str, AstError> {
        self.field(key)?
            .as_str()
            .ok_or_else(|| self.wrong_type(key, "a string"))
    }

    fn number(&self, key: &'static str) -> Result<f64, AstError> {
        self.field(key)?
            .as_f64()
            .ok_or_else(|| self.wrong_type(key, "a number"))
    }

    fn boolean(&self, key: &'static str) -> Result<bool, AstError> {
        self.field(key)?
            .as_bool()
            .ok_or_else(|| self.wrong_type(key, "a boolean"))
    }

    fn child(&self, key: &'static str) -> Result<&'a JsonValue, AstError> {
        let value = self.field(key)?;
        if value.is_object() {
            Ok(value)
        } else {
            Err(self.wrong_type(key, "a node"))
        }
    }

    fn list(&self, key: &'static str) -> Result<&'a [JsonValue], AstError> {
        self.field(key)?
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| self.wrong_type(key, "a list of nodes"))
    }

    fn expression(&self, key: &'static str) -> Expression {
        match self.child(key) {
            Ok(value) => lower_expression(value),
            Err(error) => Expression::Malformed(error),
        }
    }

    fn body(&self, key: &'static str) -> Body {
        match self.child(key) {
            Ok(value) => lower_body(value),
            Err(error) => Body::Single(Box::new(Statement::Malformed(error))),
        }
    }

    /// An absent key and an explicit `null` are both treated as "no body".
    fn optional_body(&self, key: &'static str) -> Option<Body> {
        match self.fields.get(key) {
            None | Some(JsonValue::Null) => None,
            Some(_) => Some(self.body(key)),
        }
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "a list",
        JsonValue::Object(_) => "an object",
    }
}

fn lower_block(node: &Node<'_>) -> Result<Block, AstError> {
    let statements = node
        .list("statements")?
        .iter()
        .map(lower_statement)
        .collect();
    Ok(Block { statements })
}

fn lower_body(value: &JsonValue) -> Body {
    match Node::from_json(value) {
        Ok(node) if node.tag == "BLOCK" => match lower_block(&node) {
            Ok(block) => Body::Block(block),
            Err(error) => Body::Single(Box::new(Statement::Malformed(error))),
        },
        _ => Body::Single(Box::new(lower_statement(value))),
    }
}

/// Lowers one statement. Faults in its own fields make the whole statement
/// [`Statement::Malformed`]; faults in child nodes stay with the child.
fn lower_statement(value: &JsonValue) -> Statement {
    Node::from_json(value)
        .and_then(|node| lower_statement_node(&node))
        .unwrap_or_else(Statement::Malformed)
}

fn lower_statement_node(node: &Node<'_>) -> Result<Statement, AstError> {
    let statement = match node.tag {
        "BLOCK" => Statement::Block(lower_block(node)?),
        "IF" => Statement::If(IfStatement {
            condition: node.expression("condition"),
            body: node.body("body"),
            else_body: node.optional_body("else_body"),
        }),
        "LOOP" => Statement::Loop(LoopStatement {
            condition: node.expression("condition"),
            body: node.body("body"),
        }),
        "PRINT" => Statement::Print(PrintStatement {
            expr: node.expression("expr"),
        }),
        "ASSIGNMENT" => Statement::Assignment(AssignmentStatement {
            target: node.string("target")?.into(),
            value: node.expression("value"),
        }),
        "AUTO_CALL" => Statement::AutoCall(AutoCallStatement {
            function: node.string("function")?.into(),
            arguments: node.list("args")?.iter().map(lower_expression).collect(),
        }),
        other => Statement::Unsupported(other.into()),
    };
    Ok(statement)
}

fn lower_expression(value: &JsonValue) -> Expression {
    Node::from_json(value)
        .and_then(|node| lower_expression_node(&node))
        .unwrap_or_else(Expression::Malformed)
}

fn lower_expression_node(node: &Node<'_>) -> Result<Expression, AstError> {
    let expression = match node.tag {
        "NUMBER" => Expression::Number(node.number("value")?),
        "STRING" => Expression::String(node.string("value")?.into()),
        "BOOL" => Expression::Bool(node.boolean("value")?),
        "NULL" => Expression::Null,
        "IDENTIFIER" => Expression::Identifier(node.string("name")?.into()),
        "BINARY_OP" => Expression::Binary {
            operator: InfixOperator::from_symbol(node.string("op")?),
            lhs: Box::new(node.expression("left")),
            rhs: Box::new(node.expression("right")),
        },
        other => Expression::Unsupported(other.into()),
    };
    Ok(expression)
}

fn collect_statement_faults<'a>(statements: &'a [Statement], faults: &mut Vec<&'a AstError>) {
    for statement in statements {
        match statement {
            Statement::Block(block) => collect_statement_faults(&block.statements, faults),
            Statement::If(stmt) => {
                collect_expression_faults(&stmt.condition, faults);
                collect_statement_faults(stmt.body.statements(), faults);
                if let Some(ref else_body) = stmt.else_body {
                    collect_statement_faults(else_body.statements(), faults);
                }
            }
            Statement::Loop(stmt) => {
                collect_expression_faults(&stmt.condition, faults);
                collect_statement_faults(stmt.body.statements(), faults);
            }
            Statement::Print(stmt) => collect_expression_faults(&stmt.expr, faults),
            Statement::Assignment(stmt) => collect_expression_faults(&stmt.value, faults),
            Statement::AutoCall(stmt) => {
                for argument in stmt.arguments.iter() {
                    collect_expression_faults(argument, faults);
                }
            }
            Statement::Unsupported(_) => {}
            Statement::Malformed(error) => faults.push(error),
        }
    }
}

fn collect_expression_faults<'a>(expr: &'a Expression, faults: &mut Vec<&'a AstError>) {
    match expr {
        Expression::Binary { lhs, rhs, .. } => {
            collect_expression_faults(lhs, faults);
            collect_expression_faults(rhs, faults);
        }
        Expression::Malformed(error) => faults.push(error),
        _ => {}
    }
}
