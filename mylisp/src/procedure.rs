use crate::env::Environment;
use crate::eval::{eval, EvalErr};
use crate::parser::LispExpr;
use std::{fmt, ptr};
use std::rc::Rc;

pub type Fp = Rc<dyn Fn(&[LispExpr]) -> Result<LispExpr, EvalErr>>;

enum Body {
    Lisp(LispExpr),
    Builtin(&'static str, Fp),
}

/// A callable value: either a closure made by `lambda`, holding on to the
/// environment it was created in, or a native builtin.
pub struct Procedure {
    params: Vec<String>,
    body: Body,
    env: Option<Rc<Environment>>,
}

// procedures are only ever equal to themselves
impl PartialEq for Procedure {
    fn eq(&self, other: &Procedure) -> bool { ptr::eq(self, other) }
}

impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.body {
            Body::Builtin(name, _) => write!(f, "#<builtin {}>", name),
            Body::Lisp(ref body) =>
                write!(f, "(lambda ({}) {})", self.params.join(" "), body),
        }
    }
}

impl Procedure {
    pub fn new(params: Vec<String>, body: LispExpr, env: Rc<Environment>) -> Procedure {
        Procedure{params, body: Body::Lisp(body), env: Some(env)}
    }

    pub fn builtin(name: &'static str, fp: Fp) -> Procedure {
        Procedure{params: Vec::new(), body: Body::Builtin(name, fp), env: None}
    }

    /// Registered name of a builtin, `None` for closures.
    pub fn name(&self) -> Option<&str> {
        match self.body {
            Body::Builtin(name, _) => Some(name),
            Body::Lisp(_) => None,
        }
    }

    pub fn call(&self, args: Vec<LispExpr>) -> Result<LispExpr, EvalErr> {
        match self.body {
            Body::Builtin(_, ref fp) => fp(&args[..]),
            Body::Lisp(ref expr) => {
                let env = Environment::nested(&self.params, args, self.env.clone())?;
                eval(expr, &Rc::new(env))
            }
        }
    }
}
