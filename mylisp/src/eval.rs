use crate::env::Environment;
use crate::parser::{LispExpr, ParseError, Parser};
use crate::procedure::Procedure;

use std::rc::Rc;

macro_rules! check {
    ($argcheck:expr, $err:expr) => {
        if ! $argcheck { return Err($err); }
    }
}

#[derive(PartialEq, Debug, thiserror::Error)]
pub enum EvalErr {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("unbound symbol: {0}")]
    UnboundSymbol(String),
    #[error("malformed special form: {0}")]
    MalformedSpecialForm(String),
    #[error("not callable: {0}")]
    NotCallable(String),
    #[error("expected {expected} arguments, got {got}")]
    ArityMismatch { expected: usize, got: usize },
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("division by zero")]
    DivisionByZero,
}

fn malformed(form: &[LispExpr]) -> EvalErr {
    EvalErr::MalformedSpecialForm(LispExpr::List(form.to_vec()).to_string())
}

/// Evaluate every expression in `source` within `env`, returning the
/// value of the last one.
pub fn eval_str(source: &str, env: &Rc<Environment>) -> Result<LispExpr, EvalErr> {
    let mut last = LispExpr::Void;
    for expr in Parser::parse_all(source)? {
        last = eval(&expr, env)?;
    }
    Ok(last)
}

pub fn eval(expr: &LispExpr, env: &Rc<Environment>) -> Result<LispExpr, EvalErr> {
    match expr {
        LispExpr::Symbol(sym) => env.get(sym),
        LispExpr::List(list) => match list.first() {
            None => Err(EvalErr::NotCallable(expr.to_string())),
            Some(LispExpr::Symbol(head)) => match &head[..] {
                "quote"  => eval_quote(list),
                "if"     => eval_if(list, env),
                "define" => eval_define(list, env),
                "set!"   => eval_set(list, env),
                "lambda" => eval_lambda(list, env),
                _        => eval_call(list, env),
            },
            Some(_) => eval_call(list, env),
        },
        literal => Ok(literal.clone()),
    }
}

fn eval_quote(list: &[LispExpr]) -> Result<LispExpr, EvalErr> {
    check!(list.len() == 2, malformed(list));
    Ok(list[1].clone())
}

fn eval_if(list: &[LispExpr], env: &Rc<Environment>) -> Result<LispExpr, EvalErr> {
    check!(list.len() == 4, malformed(list));
    let (test, conseq, alt) = (&list[1], &list[2], &list[3]);
    let branch = if eval(test, env)?.is_truthy() { conseq } else { alt };
    eval(branch, env)
}

fn eval_define(list: &[LispExpr], env: &Rc<Environment>) -> Result<LispExpr, EvalErr> {
    check!(list.len() == 3, malformed(list));
    match &list[1] {
        LispExpr::Symbol(var) => {
            let value = eval(&list[2], env)?;
            env.define(var, value);
            Ok(LispExpr::Void)
        },
        _ => Err(malformed(list))
    }
}

fn eval_set(list: &[LispExpr], env: &Rc<Environment>) -> Result<LispExpr, EvalErr> {
    check!(list.len() == 3, malformed(list));
    match &list[1] {
        LispExpr::Symbol(var) => {
            let value = eval(&list[2], env)?;
            env.set(var, value)?;
            Ok(LispExpr::Void)
        },
        _ => Err(malformed(list))
    }
}

fn eval_lambda(list: &[LispExpr], env: &Rc<Environment>) -> Result<LispExpr, EvalErr> {
    check!(list.len() == 3, malformed(list));
    let mut vars = Vec::new();
    match &list[1] {
        LispExpr::List(varlist) => for var in varlist.iter() {
            match var {
                LispExpr::Symbol(v) => vars.push(v.clone()),
                _ => return Err(malformed(list))
            }
        },
        _ => return Err(malformed(list))
    };
    let body = &list[2];
    Ok(LispExpr::Proc(Rc::new(Procedure::new(vars, body.clone(), env.clone()))))
}

// head first, then arguments left to right, then apply
fn eval_call(list: &[LispExpr], env: &Rc<Environment>) -> Result<LispExpr, EvalErr> {
    let head = eval(&list[0], env)?;
    let args = list.iter().skip(1)
        .map(|arg| eval(arg, env))
        .collect::<Result<Vec<_>, _>>()?;
    match head {
        LispExpr::Proc(pr) => {
            // void is only a statement result, `begin` is the one place it may flow
            if pr.name() != Some("begin") && args.iter().any(LispExpr::is_void) {
                return Err(EvalErr::InvalidArgs(format!("{}: void is not a value", pr)));
            }
            debug!("apply {} to {:?}", pr, args);
            pr.call(args)
        },
        other => Err(EvalErr::NotCallable(other.to_string())),
    }
}
