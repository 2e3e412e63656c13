use super::{
    dispatch::Dispatcher,
    environment::{Environment, EnvironmentError},
    error::ExecutionError,
    SystemContext,
};
use crate::ast::{
    expression::{Expression, InfixOperator},
    statement::{
        AssignmentStatement, AutoCallStatement, Block, Body, IfStatement, LoopStatement,
        PrintStatement, Statement,
    },
    Program,
};
use crate::value::{
    error::{RuntimeError, RuntimeErrorKind},
    Value,
};
use serde_json::Value as JsonValue;

/// Prefix of every fatal diagnostic.
pub const FATAL_PREFIX: &str = "Runtime Error";
/// Prefix of every recovered extended-call diagnostic.
pub const EXTENDED_CALL_PREFIX: &str = "Extended Call Error";

/// Owns the global frame and the two collaborators, and runs whole programs.
///
/// The statements of a root block run directly in the global frame, so bindings
/// made at the top level survive across successive `execute` calls.
pub struct TreeWalkInterpreter<C: SystemContext, D: Dispatcher> {
    globals: Environment,
    context: C,
    dispatcher: D,
    interpreter: TreeWalkStatementInterpreter,
}

impl<C, D> TreeWalkInterpreter<C, D>
where
    C: SystemContext,
    D: Dispatcher,
{
    pub fn new(context: C, dispatcher: D) -> Self {
        Self {
            globals: Environment::new(),
            context,
            dispatcher,
            interpreter: TreeWalkStatementInterpreter::create(),
        }
    }

    /// Lowers and runs `root`. Faults are reported on the diagnostic stream, never returned.
    pub fn execute(&mut self, root: &JsonValue) {
        if let Err(error) = self.try_execute(root) {
            self.report(&error);
        }
    }

    /// Lowers and runs `root`, returning the first fatal fault. Output written
    /// before the fault stays in the context.
    pub fn try_execute(&mut self, root: &JsonValue) -> Result<(), ExecutionError> {
        let Some(program) = Program::lower(root)? else {
            tracing::debug!("root node is not a block; nothing to execute");
            return Ok(());
        };
        self.run(&program)?;
        Ok(())
    }

    pub fn run(&mut self, program: &Program) -> Result<(), RuntimeError> {
        let mut environment = self.globals.clone();
        for stmt in program.statements() {
            self.interpreter.interpret_statement(
                &mut environment,
                &mut self.context,
                &mut self.dispatcher,
                stmt,
            )?;
        }
        Ok(())
    }

    /// Writes a fatal fault to the diagnostic stream.
    pub fn report(&mut self, error: &ExecutionError) {
        tracing::error!(%error, "execution aborted");
        self.context.report(&format!("{FATAL_PREFIX}: {error}"));
    }

    pub fn globals(&self) -> &Environment {
        &self.globals
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn into_context(self) -> C {
        self.context
    }
}

/// Stateless statement executor and expression evaluator. The active frame is
/// always passed in explicitly.
#[derive(Debug, Default)]
pub struct TreeWalkStatementInterpreter;

impl TreeWalkStatementInterpreter {
    fn create() -> Self {
        Self {}
    }

    pub fn interpret_statement<C: SystemContext, D: Dispatcher>(
        &self,
        environment: &mut Environment,
        context: &mut C,
        dispatcher: &mut D,
        statement: &Statement,
    ) -> Result<(), RuntimeError> {
        tracing::trace!(statement = statement.tag(), depth = environment.depth());
        match statement {
            Statement::Block(block) => {
                self.interpret_block_statement(environment, context, dispatcher, block)
            }
            Statement::If(stmt) => self.interpret_if_statement(environment, context, dispatcher, stmt),
            Statement::Loop(stmt) => {
                self.interpret_loop_statement(environment, context, dispatcher, stmt)
            }
            Statement::Print(stmt) => self.interpret_print_statement(environment, context, stmt),
            Statement::Assignment(stmt) => self.interpret_assignment_statement(environment, stmt),
            Statement::AutoCall(stmt) => {
                self.interpret_auto_call_statement(environment, context, dispatcher, stmt)
            }
            Statement::Unsupported(tag) => {
                tracing::debug!(%tag, "skipping unsupported statement");
                Ok(())
            }
            Statement::Malformed(error) => Err(RuntimeError {
                kind: RuntimeErrorKind::MalformedNode(error.clone()),
                statement: statement.tag(),
            }),
        }
    }

    pub fn evaluate(
        &self,
        environment: &Environment,
        expr: &Expression,
    ) -> Result<Value, RuntimeErrorKind> {
        let result = match expr {
            Expression::Number(v) => Value::from_number(*v),
            Expression::String(v) => Value::Text(v.clone()),
            Expression::Bool(v) => Value::Boolean(*v),
            Expression::Null => Value::Null,
            Expression::Identifier(name) => environment.get(name)?,
            Expression::Binary { operator, lhs, rhs } => {
                let lhs = self.evaluate(environment, lhs)?;
                let rhs = self.evaluate(environment, rhs)?;
                self.evaluate_infix(operator, &lhs, &rhs)
            }
            Expression::Unsupported(tag) => {
                tracing::debug!(%tag, "unsupported expression evaluates to null");
                Value::Null
            }
            Expression::Malformed(error) => return Err(error.clone().into()),
        };
        Ok(result)
    }
}

// Statement interpreter
impl TreeWalkStatementInterpreter {
    fn interpret_block_statement<C: SystemContext, D: Dispatcher>(
        &self,
        environment: &mut Environment,
        context: &mut C,
        dispatcher: &mut D,
        block: &Block,
    ) -> Result<(), RuntimeError> {
        self.interpret_in_scope(environment, context, dispatcher, &block.statements)
    }

    fn interpret_body<C: SystemContext, D: Dispatcher>(
        &self,
        environment: &mut Environment,
        context: &mut C,
        dispatcher: &mut D,
        body: &Body,
    ) -> Result<(), RuntimeError> {
        self.interpret_in_scope(environment, context, dispatcher, body.statements())
    }

    /// Runs `statements` in a fresh child of `environment`. The child frame is
    /// dropped on return, however the statements end.
    fn interpret_in_scope<C: SystemContext, D: Dispatcher>(
        &self,
        environment: &Environment,
        context: &mut C,
        dispatcher: &mut D,
        statements: &[Statement],
    ) -> Result<(), RuntimeError> {
        let mut environment = environment.new_scope();
        tracing::debug!(depth = environment.depth(), "entered scope");
        for stmt in statements.iter() {
            self.interpret_statement(&mut environment, context, dispatcher, stmt)?;
        }
        tracing::debug!(depth = environment.depth(), "left scope");
        Ok(())
    }

    fn interpret_if_statement<C: SystemContext, D: Dispatcher>(
        &self,
        environment: &mut Environment,
        context: &mut C,
        dispatcher: &mut D,
        stmt: &IfStatement,
    ) -> Result<(), RuntimeError> {
        let condition = self
            .evaluate(environment, &stmt.condition)
            .map_err(|kind| RuntimeError {
                kind,
                statement: "IF",
            })?;
        if condition.is_truthy() {
            self.interpret_body(environment, context, dispatcher, &stmt.body)
        } else if let Some(ref else_body) = stmt.else_body {
            self.interpret_body(environment, context, dispatcher, else_body)
        } else {
            Ok(())
        }
    }

    fn interpret_loop_statement<C: SystemContext, D: Dispatcher>(
        &self,
        environment: &mut Environment,
        context: &mut C,
        dispatcher: &mut D,
        stmt: &LoopStatement,
    ) -> Result<(), RuntimeError> {
        while self
            .evaluate(environment, &stmt.condition)
            .map_err(|kind| RuntimeError {
                kind,
                statement: "LOOP",
            })?
            .is_truthy()
        {
            self.interpret_body(environment, context, dispatcher, &stmt.body)?;
        }
        Ok(())
    }

    fn interpret_print_statement<C: SystemContext>(
        &self,
        environment: &mut Environment,
        context: &mut C,
        stmt: &PrintStatement,
    ) -> Result<(), RuntimeError> {
        let result = self
            .evaluate(environment, &stmt.expr)
            .map_err(|kind| RuntimeError {
                kind,
                statement: "PRINT",
            })?;
        context.writeln(&result.to_string());
        Ok(())
    }

    /// Updates the nearest visible binding, or defines a new one in the innermost frame.
    fn interpret_assignment_statement(
        &self,
        environment: &mut Environment,
        stmt: &AssignmentStatement,
    ) -> Result<(), RuntimeError> {
        let value = self
            .evaluate(environment, &stmt.value)
            .map_err(|kind| RuntimeError {
                kind,
                statement: "ASSIGNMENT",
            })?;
        match environment.assign(&stmt.target, value.clone()) {
            Ok(()) => {}
            Err(EnvironmentError::UndefinedVariable(_)) => {
                tracing::trace!(name = %stmt.target, "implicitly declaring variable");
                environment.define(&stmt.target, value);
            }
        }
        Ok(())
    }

    /// Failures of the call itself are reported and swallowed; argument evaluation
    /// faults are not.
    fn interpret_auto_call_statement<C: SystemContext, D: Dispatcher>(
        &self,
        environment: &mut Environment,
        context: &mut C,
        dispatcher: &mut D,
        stmt: &AutoCallStatement,
    ) -> Result<(), RuntimeError> {
        let mut arguments = Vec::with_capacity(stmt.arguments.len());
        for argument in stmt.arguments.iter() {
            let argument = self
                .evaluate(environment, argument)
                .map_err(|kind| RuntimeError {
                    kind,
                    statement: "AUTO_CALL",
                })?;
            arguments.push(argument.to_host());
        }

        tracing::debug!(function = %stmt.function, arity = arguments.len(), "dispatching extended call");
        if let Err(error) = dispatcher.invoke(&stmt.function, &arguments) {
            tracing::warn!(function = %stmt.function, %error, "extended call failed");
            context.report(&format!("{EXTENDED_CALL_PREFIX}: {error}"));
        }
        Ok(())
    }
}

// Expression evaluator
impl TreeWalkStatementInterpreter {
    fn evaluate_infix(&self, operator: &InfixOperator, lhs: &Value, rhs: &Value) -> Value {
        type Operator = InfixOperator;
        match operator {
            Operator::Add => lhs.add(rhs),
            Operator::Subtract => lhs.subtract(rhs),
            Operator::Multiply => lhs.multiply(rhs),
            Operator::Divide => lhs.divide(rhs),
            Operator::GreaterThan => lhs.greater_than(rhs),
            Operator::LessThan => lhs.less_than(rhs),
            Operator::EqualEqual => lhs.is_equal(rhs),
            Operator::Unsupported(symbol) => {
                tracing::trace!(%symbol, "unsupported operator evaluates to null");
                Value::Null
            }
        }
    }
}
