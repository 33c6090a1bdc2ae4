extern crate lexers;

macro_rules! debug {
    ($($args:tt)*) => (if cfg!(feature="debug") { eprintln!($($args)*); })
}

mod parser;
mod env;
mod eval;
mod procedure;
mod builtin;
pub mod repl;

pub use parser::{Parser, LispExpr, ParseError};
pub use env::Environment;
pub use eval::{eval, eval_str, EvalErr};
pub use procedure::{Procedure, Fp};
pub use builtin::builtins;

/// Read a single expression. Tokens after the first complete expression
/// are ignored.
pub fn parse(source: &str) -> Result<LispExpr, ParseError> {
    Parser::parse_str(source)
}

#[cfg(test)]
mod eval_test;
