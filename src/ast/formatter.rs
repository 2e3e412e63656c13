use super::{
    error::AstError,
    expression::Expression,
    statement::{Block, Body, Statement},
    Program,
};
use std::fmt::Write;

const WRITE_FMT_MSG: &str = "Writing into a String buffer can not fail.";

pub trait ProgramFormatter {
    fn format(&self, program: &Program) -> String;
    fn format_error(&self, error: &AstError) -> String;
}

pub struct DebugFormatter;

impl ProgramFormatter for DebugFormatter {
    fn format(&self, program: &Program) -> String {
        format!("{program:#?}")
    }

    fn format_error(&self, error: &AstError) -> String {
        format!("{error:?}")
    }
}

/// Renders a program as indented S-expressions, one statement per line.
pub struct SExpressionFormatter;

impl SExpressionFormatter {
    pub fn format_expression(expr: &Expression) -> String {
        match expr {
            Expression::Number(v) => format!("{v:?}"),
            Expression::String(v) => format!("{v:?}"),
            Expression::Bool(v) => format!("{v}"),
            Expression::Null => "null".into(),
            Expression::Identifier(name) => format!("{name}"),
            Expression::Binary { operator, lhs, rhs } => format!(
                "({} {} {})",
                operator.symbol(),
                Self::format_expression(lhs),
                Self::format_expression(rhs),
            ),
            Expression::Unsupported(tag) => format!("(unsupported {tag})"),
            Expression::Malformed(error) => format!("(malformed {:?})", error.to_string()),
        }
    }

    fn format_block(buffer: &mut String, block: &Block, depth: usize) {
        Self::write_line(buffer, depth, "(block");
        for stmt in block.statements.iter() {
            Self::format_statement(buffer, stmt, depth + 1);
        }
        Self::write_line(buffer, depth, ")");
    }

    fn format_body(buffer: &mut String, label: &str, body: &Body, depth: usize) {
        Self::write_line(buffer, depth, &format!("({label}"));
        for stmt in body.statements() {
            Self::format_statement(buffer, stmt, depth + 1);
        }
        Self::write_line(buffer, depth, ")");
    }

    fn format_statement(buffer: &mut String, stmt: &Statement, depth: usize) {
        match stmt {
            Statement::Block(block) => Self::format_block(buffer, block, depth),
            Statement::If(stmt) => {
                let condition = Self::format_expression(&stmt.condition);
                Self::write_line(buffer, depth, &format!("(if {condition}"));
                Self::format_body(buffer, "then", &stmt.body, depth + 1);
                if let Some(ref else_body) = stmt.else_body {
                    Self::format_body(buffer, "else", else_body, depth + 1);
                }
                Self::write_line(buffer, depth, ")");
            }
            Statement::Loop(stmt) => {
                let condition = Self::format_expression(&stmt.condition);
                Self::write_line(buffer, depth, &format!("(loop {condition}"));
                Self::format_body(buffer, "do", &stmt.body, depth + 1);
                Self::write_line(buffer, depth, ")");
            }
            Statement::Print(stmt) => {
                let expr = Self::format_expression(&stmt.expr);
                Self::write_line(buffer, depth, &format!("(print {expr})"));
            }
            Statement::Assignment(stmt) => {
                let value = Self::format_expression(&stmt.value);
                Self::write_line(buffer, depth, &format!("(= {} {value})", stmt.target));
            }
            Statement::AutoCall(stmt) => {
                let mut line = format!("(auto {}", stmt.function);
                for argument in stmt.arguments.iter() {
                    write!(line, " {}", Self::format_expression(argument)).expect(WRITE_FMT_MSG);
                }
                line.push(')');
                Self::write_line(buffer, depth, &line);
            }
            Statement::Unsupported(tag) => {
                Self::write_line(buffer, depth, &format!("(unsupported {tag})"));
            }
            Statement::Malformed(error) => {
                let message = error.to_string();
                Self::write_line(buffer, depth, &format!("(malformed {message:?})"));
            }
        }
    }

    fn write_line(buffer: &mut String, depth: usize, text: &str) {
        writeln!(buffer, "{:indent$}{text}", "", indent = depth * 2).expect(WRITE_FMT_MSG);
    }
}

impl ProgramFormatter for SExpressionFormatter {
    fn format(&self, program: &Program) -> String {
        let mut buffer = String::new();
        Self::format_block(&mut buffer, program.root(), 0);
        buffer
    }

    fn format_error(&self, error: &AstError) -> String {
        format!("Malformed syntax tree: {error}")
    }
}
