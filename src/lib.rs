pub mod ast;
pub mod interpreter;
pub mod string;
pub mod value;
