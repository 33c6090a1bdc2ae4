use crate::builtin::builtins;
use crate::eval::EvalErr;
use crate::parser::LispExpr;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A binding scope. Lookups walk outwards through `outer` until some scope
/// defines the symbol. Scopes are shared through `Rc` since closures keep
/// their defining scope alive for as long as they exist.
pub struct Environment {
    syms: RefCell<HashMap<String, LispExpr>>,
    outer: Option<Rc<Environment>>,
}

impl Environment {
    /// The global scope, pre-populated with the builtins table.
    pub fn new() -> Environment {
        Environment{syms: RefCell::new(builtins()), outer: None}
    }

    /// A scope for a procedure call, binding params to args positionally.
    pub fn nested(params: &[String], args: Vec<LispExpr>,
                  outer: Option<Rc<Environment>>) -> Result<Environment, EvalErr> {
        if params.len() != args.len() {
            return Err(EvalErr::ArityMismatch{expected: params.len(), got: args.len()});
        }
        Ok(Environment{
            syms: RefCell::new(params.iter().cloned().zip(args).collect()),
            outer,
        })
    }

    /// The nearest scope, self included, that binds `sym`.
    pub fn find(&self, sym: &str) -> Result<&Environment, EvalErr> {
        if self.syms.borrow().contains_key(sym) {
            Ok(self)
        } else if let Some(ref otx) = self.outer {
            otx.find(sym)
        } else {
            Err(EvalErr::UnboundSymbol(sym.to_string()))
        }
    }

    pub fn get(&self, sym: &str) -> Result<LispExpr, EvalErr> {
        let owner = self.find(sym)?;
        let value = owner.syms.borrow().get(sym).cloned();
        value.ok_or_else(|| EvalErr::UnboundSymbol(sym.to_string()))
    }

    /// Bind in this scope only, shadowing any outer binding.
    pub fn define(&self, sym: &str, value: LispExpr) {
        debug!("define {} = {}", sym, value);
        self.syms.borrow_mut().insert(sym.to_string(), value);
    }

    /// Overwrite the binding in the nearest scope that already has one.
    pub fn set(&self, sym: &str, value: LispExpr) -> Result<(), EvalErr> {
        debug!("set! {} = {}", sym, value);
        self.find(sym)?.syms.borrow_mut().insert(sym.to_string(), value);
        Ok(())
    }

    #[cfg(test)]
    fn binds(&self, sym: &str) -> bool {
        self.syms.borrow().contains_key(sym)
    }
}

impl Default for Environment {
    fn default() -> Self { Self::new() }
}

///////////////////////////////////////////////////////////////////////////////
