pub mod context;
pub mod dispatch;
pub mod environment;
pub mod error;
mod tree;

pub use tree::{
    TreeWalkInterpreter, TreeWalkStatementInterpreter, EXTENDED_CALL_PREFIX, FATAL_PREFIX,
};

/// The output sink and diagnostic stream of an interpreter.
pub trait SystemContext {
    fn writeln(&mut self, text: &str);

    /// No statement reads input yet; this exists for a future input statement.
    fn read_line(&mut self, prompt: &str) -> String;

    fn report(&mut self, diagnostic: &str);
}

impl<C: SystemContext + ?Sized> SystemContext for &mut C {
    fn writeln(&mut self, text: &str) {
        (**self).writeln(text)
    }

    fn read_line(&mut self, prompt: &str) -> String {
        (**self).read_line(prompt)
    }

    fn report(&mut self, diagnostic: &str) {
        (**self).report(diagnostic)
    }
}
