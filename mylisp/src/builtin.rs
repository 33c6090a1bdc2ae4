use crate::eval::EvalErr;
use crate::parser::LispExpr;
use crate::procedure::Procedure;

use std::cmp::Ordering;
use std::collections::HashMap;
use std::f64::consts;
use std::rc::Rc;

#[derive(Clone, Copy, Debug)]
enum Num {
    Int(i64),
    Real(f64),
}

impl Num {
    fn as_f64(self) -> f64 {
        match self {
            Num::Int(n) => n as f64,
            Num::Real(x) => x,
        }
    }

    fn into_expr(self) -> LispExpr {
        match self {
            Num::Int(n) => LispExpr::Integer(n),
            Num::Real(x) => LispExpr::Real(x),
        }
    }

    fn partial_cmp(self, other: Num) -> Option<Ordering> {
        match (self, other) {
            (Num::Int(a), Num::Int(b)) => Some(a.cmp(&b)),
            (Num::Int(a), Num::Real(x)) => cmp_int_real(a, x),
            (Num::Real(x), Num::Int(b)) => cmp_int_real(b, x).map(Ordering::reverse),
            (Num::Real(x), Num::Real(y)) => x.partial_cmp(&y),
        }
    }
}

// Exact comparison, casting a large i64 to f64 would lose precision
fn cmp_int_real(a: i64, x: f64) -> Option<Ordering> {
    const TWO_63: f64 = 9_223_372_036_854_775_808.0;
    if x.is_nan() {
        None
    } else if x >= TWO_63 {
        Some(Ordering::Less)
    } else if x < -TWO_63 {
        Some(Ordering::Greater)
    } else {
        // floor(x) fits in an i64 here
        let fl = x.floor();
        match a.cmp(&(fl as i64)) {
            Ordering::Equal if fl < x => Some(Ordering::Less),
            ord => Some(ord),
        }
    }
}

fn invalid(name: &str, why: &str) -> EvalErr {
    EvalErr::InvalidArgs(format!("{}: {}", name, why))
}

fn num(name: &str, arg: &LispExpr) -> Result<Num, EvalErr> {
    match *arg {
        LispExpr::Integer(n) => Ok(Num::Int(n)),
        LispExpr::Real(x) => Ok(Num::Real(x)),
        ref other => Err(invalid(name, &format!("expected a number, got {}", other.type_name()))),
    }
}

fn int(name: &str, arg: &LispExpr) -> Result<i64, EvalErr> {
    match *arg {
        LispExpr::Integer(n) => Ok(n),
        ref other => Err(invalid(name, &format!("expected an integer, got {}", other.type_name()))),
    }
}

fn list<'a>(name: &str, arg: &'a LispExpr) -> Result<&'a Vec<LispExpr>, EvalErr> {
    match *arg {
        LispExpr::List(ref l) => Ok(l),
        ref other => Err(invalid(name, &format!("expected a list, got {}", other.type_name()))),
    }
}

fn procedure<'a>(name: &str, arg: &'a LispExpr) -> Result<&'a Rc<Procedure>, EvalErr> {
    match *arg {
        LispExpr::Proc(ref p) => Ok(p),
        ref other => Err(EvalErr::NotCallable(format!("{}: {}", name, other))),
    }
}

fn nargs(name: &str, args: &[LispExpr], n: usize) -> Result<(), EvalErr> {
    if args.len() != n {
        return Err(invalid(name, &format!("takes {} arguments, {} given", n, args.len())));
    }
    Ok(())
}

// Fold numbers keeping integers exact until a real shows up
fn foldop(name: &str, init: Num, args: &[LispExpr],
          iop: fn(i64, i64) -> Option<i64>, rop: fn(f64, f64) -> f64) -> Result<Num, EvalErr> {
    args.iter().try_fold(init, |acc, arg| {
        Ok(match (acc, num(name, arg)?) {
            (Num::Int(a), Num::Int(b)) =>
                Num::Int(iop(a, b).ok_or_else(|| invalid(name, "integer overflow"))?),
            (a, b) => Num::Real(rop(a.as_f64(), b.as_f64())),
        })
    })
}

fn sub(args: &[LispExpr]) -> Result<LispExpr, EvalErr> {
    let diff = match args.len() {
        0 => return Err(invalid("-", "takes at least 1 argument")),
        // special handling of negation
        1 => foldop("-", Num::Int(0), args, i64::checked_sub, |a, b| a - b)?,
        _ => foldop("-", num("-", &args[0])?, &args[1..], i64::checked_sub, |a, b| a - b)?,
    };
    Ok(diff.into_expr())
}

// true division, always real
fn div(args: &[LispExpr]) -> Result<LispExpr, EvalErr> {
    let (base, divisors) = match args.len() {
        0 => return Err(invalid("/", "takes at least 1 argument")),
        1 => (1.0, args),
        _ => (num("/", &args[0])?.as_f64(), &args[1..]),
    };
    let mut acc = base;
    for d in divisors.iter() {
        let d = num("/", d)?.as_f64();
        if d == 0.0 {
            return Err(EvalErr::DivisionByZero);
        }
        acc /= d;
    }
    Ok(LispExpr::Real(acc))
}

fn foldcmp(name: &str, args: &[LispExpr], op: fn(Ordering) -> bool) -> Result<LispExpr, EvalErr> {
    if args.len() < 2 {
        return Err(invalid(name, "takes at least 2 arguments"));
    }
    let nums = args.iter().map(|a| num(name, a)).collect::<Result<Vec<_>, _>>()?;
    Ok(LispExpr::from_bool(nums.windows(2)
        .all(|win| win[0].partial_cmp(win[1]).map_or(false, op))))
}

/// Structural equality where numbers compare by value across int/real.
pub(crate) fn equal(a: &LispExpr, b: &LispExpr) -> bool {
    match (a, b) {
        (LispExpr::Integer(_) | LispExpr::Real(_), LispExpr::Integer(_) | LispExpr::Real(_)) =>
            num("=", a).ok().zip(num("=", b).ok())
                .and_then(|(x, y)| x.partial_cmp(y)) == Some(Ordering::Equal),
        (LispExpr::List(x), LispExpr::List(y)) =>
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(i, j)| equal(i, j)),
        (x, y) => x == y,
    }
}

// Identity. Lists are values here, so only empty lists are eq?
fn identical(a: &LispExpr, b: &LispExpr) -> bool {
    match (a, b) {
        (LispExpr::Proc(x), LispExpr::Proc(y)) => Rc::ptr_eq(x, y),
        (LispExpr::List(x), LispExpr::List(y)) => x.is_empty() && y.is_empty(),
        (x, y) => x == y,
    }
}

fn extremum(name: &str, args: &[LispExpr], pick: Ordering) -> Result<LispExpr, EvalErr> {
    // either (max 1 2 3) or (max (list 1 2 3))
    let items = match args {
        [LispExpr::List(l)] => &l[..],
        _ => args,
    };
    let mut best = match items.first() {
        Some(first) => (first, num(name, first)?),
        None => return Err(invalid(name, "no arguments")),
    };
    for item in items.iter().skip(1) {
        let n = num(name, item)?;
        if n.partial_cmp(best.1) == Some(pick) {
            best = (item, n);
        }
    }
    Ok(best.0.clone())
}

fn to_integer(name: &str, x: f64) -> Result<LispExpr, EvalErr> {
    if !x.is_finite() || x < i64::MIN as f64 || x >= i64::MAX as f64 {
        return Err(invalid(name, "cannot convert to integer"));
    }
    Ok(LispExpr::Integer(x as i64))
}

// round to a negative number of digits, ie: to tens, hundreds...
fn round_int(n: i64, digits: i64) -> i64 {
    let p = match digits.checked_neg()
            .and_then(|d| u32::try_from(d).ok())
            .and_then(|d| 10i64.checked_pow(d)) {
        Some(p) => p,
        None => return 0,
    };
    let (q, r) = (n.div_euclid(p), n.rem_euclid(p));
    // ties go away from zero
    let up = 2 * (r as i128) > p as i128 || 2 * (r as i128) == p as i128 && n >= 0;
    (if up { q + 1 } else { q }).saturating_mul(p)
}

fn round(args: &[LispExpr]) -> Result<LispExpr, EvalErr> {
    match args {
        [x] => match num("round", x)? {
            Num::Int(n) => Ok(LispExpr::Integer(n)),
            Num::Real(x) => to_integer("round", x.round()),
        },
        [x, digits] => {
            let digits = int("round", digits)?;
            match num("round", x)? {
                Num::Int(n) if digits >= 0 => Ok(LispExpr::Integer(n)),
                Num::Int(n) => Ok(LispExpr::Integer(round_int(n, digits))),
                Num::Real(x) => {
                    let scale = 10f64.powi(digits.clamp(-308, 308) as i32);
                    Ok(LispExpr::Real((x * scale).round() / scale))
                },
            }
        },
        _ => Err(invalid("round", "takes 1 or 2 arguments")),
    }
}

// Wrap a float function, a finite input giving a non-finite result is a domain error
fn mathfn(name: &'static str, args: &[LispExpr], arity: usize,
          f: fn(&[f64]) -> f64) -> Result<LispExpr, EvalErr> {
    nargs(name, args, arity)?;
    let xs = args.iter().map(|a| num(name, a).map(Num::as_f64))
        .collect::<Result<Vec<_>, _>>()?;
    let r = f(&xs);
    if !r.is_finite() && xs.iter().all(|x| x.is_finite()) {
        return Err(invalid(name, "math domain error"));
    }
    Ok(LispExpr::Real(r))
}

fn map(args: &[LispExpr]) -> Result<LispExpr, EvalErr> {
    if args.len() < 2 {
        return Err(invalid("map", "takes a procedure and at least one list"));
    }
    let pr = procedure("map", &args[0])?;
    let lists = args[1..].iter().map(|l| list("map", l)).collect::<Result<Vec<_>, _>>()?;
    let shortest = lists.iter().map(|l| l.len()).min().unwrap_or(0);
    (0..shortest)
        .map(|i| pr.call(lists.iter().map(|l| l[i].clone()).collect()))
        .collect::<Result<Vec<_>, _>>()
        .map(LispExpr::List)
}

fn factorial(args: &[LispExpr]) -> Result<LispExpr, EvalErr> {
    nargs("factorial", args, 1)?;
    let n = int("factorial", &args[0])?;
    if n < 0 {
        return Err(invalid("factorial", "not defined for negative values"));
    }
    (1..=n).try_fold(1i64, |acc, k| acc.checked_mul(k))
        .map(LispExpr::Integer)
        .ok_or_else(|| invalid("factorial", "integer overflow"))
}

fn gcd(args: &[LispExpr]) -> Result<LispExpr, EvalErr> {
    let mut acc = 0i64;
    for arg in args.iter() {
        let mut b = int("gcd", arg)?.checked_abs()
            .ok_or_else(|| invalid("gcd", "integer overflow"))?;
        while b != 0 {
            let t = acc % b;
            acc = b;
            b = t;
        }
    }
    Ok(LispExpr::Integer(acc))
}

fn builtin<F>(procs: &mut HashMap<String, LispExpr>, name: &'static str, f: F)
        where F: Fn(&[LispExpr]) -> Result<LispExpr, EvalErr> + 'static {
    procs.insert(name.to_string(), LispExpr::Proc(Rc::new(Procedure::builtin(name, Rc::new(f)))));
}

fn unary(procs: &mut HashMap<String, LispExpr>, name: &'static str, f: fn(f64) -> f64) {
    builtin(procs, name, move |args| {
        nargs(name, args, 1)?;
        let x = num(name, &args[0])?.as_f64();
        let r = f(x);
        if r.is_nan() && !x.is_nan() || r.is_infinite() && x.is_finite() {
            return Err(invalid(name, "math domain error"));
        }
        Ok(LispExpr::Real(r))
    });
}

fn rounding(procs: &mut HashMap<String, LispExpr>, name: &'static str, f: fn(f64) -> f64) {
    builtin(procs, name, move |args| {
        nargs(name, args, 1)?;
        match num(name, &args[0])? {
            Num::Int(n) => Ok(LispExpr::Integer(n)),
            Num::Real(x) => to_integer(name, f(x)),
        }
    });
}

pub fn builtins() -> HashMap<String, LispExpr> {
    let mut procs: HashMap<String, LispExpr> = HashMap::new();

    // math constants and functions
    procs.insert(format!("pi"), LispExpr::Real(consts::PI));
    procs.insert(format!("e"), LispExpr::Real(consts::E));
    procs.insert(format!("tau"), LispExpr::Real(consts::TAU));
    procs.insert(format!("inf"), LispExpr::Real(f64::INFINITY));
    procs.insert(format!("nan"), LispExpr::Real(f64::NAN));
    unary(&mut procs, "sin", f64::sin);
    unary(&mut procs, "cos", f64::cos);
    unary(&mut procs, "tan", f64::tan);
    unary(&mut procs, "asin", f64::asin);
    unary(&mut procs, "acos", f64::acos);
    unary(&mut procs, "atan", f64::atan);
    unary(&mut procs, "sinh", f64::sinh);
    unary(&mut procs, "cosh", f64::cosh);
    unary(&mut procs, "tanh", f64::tanh);
    unary(&mut procs, "sqrt", f64::sqrt);
    unary(&mut procs, "exp", f64::exp);
    unary(&mut procs, "log10", f64::log10);
    unary(&mut procs, "log2", f64::log2);
    unary(&mut procs, "fabs", f64::abs);
    unary(&mut procs, "degrees", f64::to_degrees);
    unary(&mut procs, "radians", f64::to_radians);
    rounding(&mut procs, "floor", f64::floor);
    rounding(&mut procs, "ceil", f64::ceil);
    rounding(&mut procs, "trunc", f64::trunc);
    builtin(&mut procs, "atan2", |args| mathfn("atan2", args, 2, |x| x[0].atan2(x[1])));
    builtin(&mut procs, "pow", |args| mathfn("pow", args, 2, |x| x[0].powf(x[1])));
    builtin(&mut procs, "hypot", |args| mathfn("hypot", args, 2, |x| x[0].hypot(x[1])));
    builtin(&mut procs, "fmod", |args| mathfn("fmod", args, 2, |x| x[0] % x[1]));
    builtin(&mut procs, "log", |args| match args.len() {
        2 => mathfn("log", args, 2, |x| x[0].ln() / x[1].ln()),
        _ => mathfn("log", args, 1, |x| x[0].ln()),
    });
    builtin(&mut procs, "isnan", |args| {
        nargs("isnan", args, 1)?;
        Ok(LispExpr::from_bool(num("isnan", &args[0])?.as_f64().is_nan()))
    });
    builtin(&mut procs, "isinf", |args| {
        nargs("isinf", args, 1)?;
        Ok(LispExpr::from_bool(num("isinf", &args[0])?.as_f64().is_infinite()))
    });
    builtin(&mut procs, "factorial", factorial);
    builtin(&mut procs, "gcd", gcd);

    // arithmetic
    builtin(&mut procs, "+", |args|
        foldop("+", Num::Int(0), args, i64::checked_add, |a, b| a + b).map(Num::into_expr));
    builtin(&mut procs, "*", |args|
        foldop("*", Num::Int(1), args, i64::checked_mul, |a, b| a * b).map(Num::into_expr));
    builtin(&mut procs, "-", sub);
    builtin(&mut procs, "/", div);
    builtin(&mut procs, "abs", |args| {
        nargs("abs", args, 1)?;
        match num("abs", &args[0])? {
            Num::Int(n) => n.checked_abs().map(LispExpr::Integer)
                .ok_or_else(|| invalid("abs", "integer overflow")),
            Num::Real(x) => Ok(LispExpr::Real(x.abs())),
        }
    });
    builtin(&mut procs, "round", round);
    builtin(&mut procs, "max", |args| extremum("max", args, Ordering::Greater));
    builtin(&mut procs, "min", |args| extremum("min", args, Ordering::Less));

    // comparison
    builtin(&mut procs, "<", |args| foldcmp("<", args, Ordering::is_lt));
    builtin(&mut procs, "<=", |args| foldcmp("<=", args, Ordering::is_le));
    builtin(&mut procs, ">", |args| foldcmp(">", args, Ordering::is_gt));
    builtin(&mut procs, ">=", |args| foldcmp(">=", args, Ordering::is_ge));
    builtin(&mut procs, "=", |args| {
        if args.len() < 2 {
            return Err(invalid("=", "takes at least 2 arguments"));
        }
        Ok(LispExpr::from_bool(args.windows(2).all(|win| equal(&win[0], &win[1]))))
    });
    builtin(&mut procs, "eq?", |args| {
        nargs("eq?", args, 2)?;
        Ok(LispExpr::from_bool(identical(&args[0], &args[1])))
    });
    builtin(&mut procs, "equal?", |args| {
        nargs("equal?", args, 2)?;
        Ok(LispExpr::from_bool(equal(&args[0], &args[1])))
    });
    builtin(&mut procs, "not", |args| {
        nargs("not", args, 1)?;
        Ok(LispExpr::from_bool(!args[0].is_truthy()))
    });

    // lists
    builtin(&mut procs, "list", |args| Ok(LispExpr::List(args.to_vec())));
    builtin(&mut procs, "car", |args| {
        nargs("car", args, 1)?;
        list("car", &args[0])?.first().cloned()
            .ok_or_else(|| invalid("car", "empty list"))
    });
    builtin(&mut procs, "cdr", |args| {
        nargs("cdr", args, 1)?;
        Ok(LispExpr::List(list("cdr", &args[0])?.iter().skip(1).cloned().collect()))
    });
    builtin(&mut procs, "cons", |args| {
        nargs("cons", args, 2)?;
        let mut l = vec![args[0].clone()];
        l.extend(list("cons", &args[1])?.iter().cloned());
        Ok(LispExpr::List(l))
    });
    builtin(&mut procs, "append", |args| {
        let mut l = Vec::new();
        for arg in args.iter() {
            l.extend(list("append", arg)?.iter().cloned());
        }
        Ok(LispExpr::List(l))
    });
    builtin(&mut procs, "length", |args| {
        nargs("length", args, 1)?;
        Ok(LispExpr::Integer(list("length", &args[0])?.len() as i64))
    });
    builtin(&mut procs, "map", map);
    builtin(&mut procs, "apply", |args| {
        nargs("apply", args, 2)?;
        procedure("apply", &args[0])?.call(list("apply", &args[1])?.clone())
    });
    // arguments were already evaluated in order, keep the last one
    builtin(&mut procs, "begin", |args| {
        args.last().cloned().ok_or_else(|| invalid("begin", "takes at least 1 argument"))
    });

    // predicates
    builtin(&mut procs, "list?", |args| {
        nargs("list?", args, 1)?;
        Ok(LispExpr::from_bool(matches!(args[0], LispExpr::List(_))))
    });
    builtin(&mut procs, "null?", |args| {
        nargs("null?", args, 1)?;
        Ok(LispExpr::from_bool(matches!(args[0], LispExpr::List(ref l) if l.is_empty())))
    });
    builtin(&mut procs, "number?", |args| {
        nargs("number?", args, 1)?;
        Ok(LispExpr::from_bool(matches!(args[0], LispExpr::Integer(_) | LispExpr::Real(_))))
    });
    builtin(&mut procs, "procedure?", |args| {
        nargs("procedure?", args, 1)?;
        Ok(LispExpr::from_bool(matches!(args[0], LispExpr::Proc(_))))
    });
    builtin(&mut procs, "symbol?", |args| {
        nargs("symbol?", args, 1)?;
        Ok(LispExpr::from_bool(matches!(args[0], LispExpr::Symbol(_))))
    });

    procs
}

///////////////////////////////////////////////////////////////////////////////
