use crate::env::Environment;
use crate::eval::eval;
use crate::parser::Parser;
use std::rc::Rc;

/// Typing this on a line of its own ends the read loop.
pub const EXIT: &str = "exit";

pub fn is_exit(line: &str) -> bool {
    line.trim() == EXIT
}

/// Parse and evaluate one line within `env`, returning what the read loop
/// should print. Errors come back as text so the loop can carry on; blank
/// lines and void results print nothing.
pub fn rep(line: &str, env: &Rc<Environment>) -> Option<String> {
    if line.trim().is_empty() {
        return None;
    }
    match Parser::parse_str(line) {
        Err(e) => Some(format!("Parse error: {}", e)),
        Ok(expr) => match eval(&expr, env) {
            Err(e) => Some(format!("Eval error: {}", e)),
            Ok(result) if result.is_void() => None,
            Ok(result) => Some(result.to_string()),
        }
    }
}

///////////////////////////////////////////////////////////////////////////////
