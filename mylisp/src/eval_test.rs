use crate::env::Environment;
use crate::eval::{eval, eval_str, EvalErr};
use crate::parser::{LispExpr, ParseError, Parser};
use std::rc::Rc;

macro_rules! fuzzy_eq {
    ($lhs:expr, $rhs:expr) => {
        match $lhs {
            LispExpr::Real(x) => assert!((x - $rhs).abs() < 1.0e-10),
            other => panic!("expected a real, got {:?}", other),
        }
    }
}

fn global() -> Rc<Environment> {
    Rc::new(Environment::new())
}

fn run(env: &Rc<Environment>, source: &str) -> Result<LispExpr, EvalErr> {
    eval(&Parser::parse_str(source)?, env)
}

#[test]
fn arithmetic() {
    let env = global();
    assert_eq!(run(&env, "(+ 1 2)"), Ok(LispExpr::Integer(3)));
    assert_eq!(run(&env, "(* 2 (- 10 4))"), Ok(LispExpr::Integer(12)));
    assert_eq!(run(&env, "(+ 1 2.5)"), Ok(LispExpr::Real(3.5)));
    assert_eq!(run(&env, "(/ 1 0)"), Err(EvalErr::DivisionByZero));
    fuzzy_eq!(run(&env, "(* pi (* 10 10))").unwrap(), 314.1592653589793);
    fuzzy_eq!(run(&env, "(+ (* (sin 0.345) (sin 0.345)) (* (cos 0.345) (cos 0.345)))").unwrap(), 1.0);
}

#[test]
fn self_evaluating_literals() {
    let env = global();
    assert_eq!(run(&env, "7"), Ok(LispExpr::Integer(7)));
    assert_eq!(run(&env, "7.5"), Ok(LispExpr::Real(7.5)));
    assert_eq!(run(&env, "#t"), Ok(LispExpr::True));
    assert_eq!(run(&env, "#f"), Ok(LispExpr::False));
}

#[test]
fn booleans_cannot_be_rebound() {
    let env = global();
    assert!(matches!(run(&env, "(define #t 0)"), Err(EvalErr::MalformedSpecialForm(_))));
    assert!(matches!(run(&env, "(set! #f 1)"), Err(EvalErr::MalformedSpecialForm(_))));
    assert_eq!(run(&env, "(if #f 1 2)"), Ok(LispExpr::Integer(2)));
}

#[test]
fn define_persists() {
    let env = global();
    assert_eq!(run(&env, "(define x 10)"), Ok(LispExpr::Void));
    assert_eq!(run(&env, "x"), Ok(LispExpr::Integer(10)));
    assert_eq!(run(&env, "(define x (+ x 1))"), Ok(LispExpr::Void));
    assert_eq!(run(&env, "x"), Ok(LispExpr::Integer(11)));
}

#[test]
fn environments_are_independent() {
    let (a, b) = (global(), global());
    run(&a, "(define x 1)").unwrap();
    assert_eq!(run(&b, "x"), Err(EvalErr::UnboundSymbol(format!("x"))));
}

#[test]
fn closure_application() {
    let env = global();
    assert_eq!(run(&env, "((lambda (x) (* x x)) 5)"), Ok(LispExpr::Integer(25)));
    run(&env, "(define square (lambda (x) (* x x)))").unwrap();
    assert_eq!(run(&env, "(square 12)"), Ok(LispExpr::Integer(144)));
    assert_eq!(run(&env, "((lambda () 3))"), Ok(LispExpr::Integer(3)));
}

#[test]
fn if_takes_one_branch() {
    let env = global();
    assert_eq!(run(&env, "(if (> 3 2) 1 2)"), Ok(LispExpr::Integer(1)));
    assert_eq!(run(&env, "(if (> 2 3) 1 2)"), Ok(LispExpr::Integer(2)));
    run(&env, "(define hits 0)").unwrap();
    run(&env, "(if (> 3 2) (set! hits (+ hits 1)) (set! hits (+ hits 100)))").unwrap();
    assert_eq!(run(&env, "hits"), Ok(LispExpr::Integer(1)));
    run(&env, "(if (> 2 3) (set! hits (+ hits 1)) (set! hits (+ hits 100)))").unwrap();
    assert_eq!(run(&env, "hits"), Ok(LispExpr::Integer(101)));
    // the untaken branch is not even looked up
    assert_eq!(run(&env, "(if 0 undefined-symbol 5)"), Ok(LispExpr::Integer(5)));
    assert_eq!(run(&env, "(if (quote ()) 1 2)"), Ok(LispExpr::Integer(2)));
}

#[test]
fn unbound_symbol() {
    let env = global();
    assert_eq!(run(&env, "undefined-symbol"),
               Err(EvalErr::UnboundSymbol(format!("undefined-symbol"))));
    assert_eq!(run(&env, "(set! nope 1)"), Err(EvalErr::UnboundSymbol(format!("nope"))));
}

#[test]
fn parse_errors_propagate() {
    let env = global();
    assert_eq!(run(&env, "(1 2"), Err(EvalErr::Parse(ParseError::UnexpectedEOF)));
    assert_eq!(run(&env, ")"), Err(EvalErr::Parse(ParseError::UnexpectedCloseParen)));
}

#[test]
fn quote_returns_unevaluated() {
    let env = global();
    assert_eq!(run(&env, "(quote (+ 1 2))").unwrap().to_string(), "(+ 1 2)");
    assert_eq!(run(&env, "(quote abc)"), Ok(LispExpr::Symbol(format!("abc"))));
}

#[test]
fn malformed_special_forms() {
    let env = global();
    for form in &["(quote)", "(quote a b)", "(if 1 2)", "(define x)", "(define 1 2)",
                  "(set! x)", "(lambda (x))", "(lambda x x)", "(lambda (1) 1)"] {
        match run(&env, form) {
            Err(EvalErr::MalformedSpecialForm(_)) => {},
            other => panic!("{} gave {:?}", form, other),
        }
    }
}

#[test]
fn not_callable() {
    let env = global();
    assert!(matches!(run(&env, "()"), Err(EvalErr::NotCallable(_))));
    assert!(matches!(run(&env, "(1 2 3)"), Err(EvalErr::NotCallable(_))));
    run(&env, "(define n 3)").unwrap();
    assert_eq!(run(&env, "(n)"), Err(EvalErr::NotCallable(format!("3"))));
}

#[test]
fn closure_arity_is_strict() {
    let env = global();
    assert_eq!(run(&env, "((lambda (x y) x) 1)"),
               Err(EvalErr::ArityMismatch{expected: 2, got: 1}));
}

#[test]
fn sibling_closures_capture_their_own_scope() {
    let env = global();
    run(&env, "(define make-adder (lambda (x) (lambda (y) (+ x y))))").unwrap();
    run(&env, "(define add2 (make-adder 2))").unwrap();
    run(&env, "(define add10 (make-adder 10))").unwrap();
    assert_eq!(run(&env, "(add2 1)"), Ok(LispExpr::Integer(3)));
    assert_eq!(run(&env, "(add10 1)"), Ok(LispExpr::Integer(11)));
    assert_eq!(run(&env, "(add2 5)"), Ok(LispExpr::Integer(7)));
}

#[test]
fn closures_see_later_mutations() {
    let env = global();
    run(&env, "(define k 1)").unwrap();
    run(&env, "(define get-k (lambda () k))").unwrap();
    run(&env, "(set! k 42)").unwrap();
    assert_eq!(run(&env, "(get-k)"), Ok(LispExpr::Integer(42)));
}

#[test]
fn set_in_closure_updates_captured_scope() {
    let env = global();
    let counter = "(define make-counter (lambda () \
                     ((lambda (n) (lambda () (begin (set! n (+ n 1)) n))) 0)))";
    run(&env, counter).unwrap();
    run(&env, "(define c1 (make-counter))").unwrap();
    run(&env, "(define c2 (make-counter))").unwrap();
    assert_eq!(run(&env, "(c1)"), Ok(LispExpr::Integer(1)));
    assert_eq!(run(&env, "(c1)"), Ok(LispExpr::Integer(2)));
    assert_eq!(run(&env, "(c2)"), Ok(LispExpr::Integer(1)));
}

#[test]
fn define_inside_procedure_is_local() {
    let env = global();
    run(&env, "(define f (lambda (a) (begin (define local (* a 2)) local)))").unwrap();
    assert_eq!(run(&env, "(f 4)"), Ok(LispExpr::Integer(8)));
    assert_eq!(run(&env, "local"), Err(EvalErr::UnboundSymbol(format!("local"))));
}

#[test]
fn recursion() {
    let env = global();
    run(&env, "(define fact (lambda (n) (if (<= n 1) 1 (* n (fact (- n 1))))))").unwrap();
    assert_eq!(run(&env, "(fact 10)"), Ok(LispExpr::Integer(3628800)));
    run(&env, "(define fib (lambda (n) (if (< n 2) n (+ (fib (- n 1)) (fib (- n 2))))))").unwrap();
    assert_eq!(run(&env, "(fib 15)"), Ok(LispExpr::Integer(610)));
}

#[test]
fn higher_order_builtins() {
    let env = global();
    assert_eq!(run(&env, "(map (lambda (x) (* x x)) (list 1 2 3))").unwrap().to_string(),
               "(1 4 9)");
    assert_eq!(run(&env, "(map + (list 1 2 3) (list 10 20))").unwrap().to_string(),
               "(11 22)");
    assert_eq!(run(&env, "(apply + (list 1 2 3))"), Ok(LispExpr::Integer(6)));
    assert_eq!(run(&env, "(procedure? car)"), Ok(LispExpr::True));
    assert_eq!(run(&env, "(procedure? (lambda () 1))"), Ok(LispExpr::True));
    assert_eq!(run(&env, "(procedure? 1)"), Ok(LispExpr::False));
}

#[test]
fn list_operations() {
    let env = global();
    assert_eq!(run(&env, "(car (quote (1 2 3)))"), Ok(LispExpr::Integer(1)));
    assert_eq!(run(&env, "(cdr (quote (1 2 3)))").unwrap().to_string(), "(2 3)");
    assert_eq!(run(&env, "(cons 0 (list 1 2))").unwrap().to_string(), "(0 1 2)");
    assert_eq!(run(&env, "(append (list 1) (list 2 3))").unwrap().to_string(), "(1 2 3)");
    assert_eq!(run(&env, "(length (list 1 2 3))"), Ok(LispExpr::Integer(3)));
    assert_eq!(run(&env, "(null? (list))"), Ok(LispExpr::True));
    assert_eq!(run(&env, "(list? (list))"), Ok(LispExpr::True));
    assert_eq!(run(&env, "(symbol? (quote a))"), Ok(LispExpr::True));
    assert_eq!(run(&env, "(number? 1.5)"), Ok(LispExpr::True));
    assert_eq!(run(&env, "(equal? (list 1 2) (list 1 2))"), Ok(LispExpr::True));
    assert_eq!(run(&env, "(eq? (quote a) (quote a))"), Ok(LispExpr::True));
    assert_eq!(run(&env, "(not 0)"), Ok(LispExpr::True));
    assert_eq!(run(&env, "(max 1 5 3)"), Ok(LispExpr::Integer(5)));
    assert_eq!(run(&env, "(abs -4)"), Ok(LispExpr::Integer(4)));
}

#[test]
fn begin_keeps_last_value() {
    let env = global();
    assert_eq!(run(&env, "(begin (define r 10) (* r r))"), Ok(LispExpr::Integer(100)));
    assert_eq!(run(&env, "r"), Ok(LispExpr::Integer(10)));
}

#[test]
fn void_is_not_a_value() {
    let env = global();
    assert!(matches!(run(&env, "(list (define z 1))"), Err(EvalErr::InvalidArgs(_))));
    assert!(matches!(run(&env, "(+ 1 (set! z 2))"), Err(EvalErr::InvalidArgs(_))));
    run(&env, "(define f (lambda (v) v))").unwrap();
    assert!(matches!(run(&env, "(f (define w 0))"), Err(EvalErr::InvalidArgs(_))));
    // the define inside ran before the call was refused
    assert_eq!(run(&env, "z"), Ok(LispExpr::Integer(2)));
    assert_eq!(run(&env, "(begin (define q 4) q)"), Ok(LispExpr::Integer(4)));
}

#[test]
fn errors_abort_the_whole_expression() {
    let env = global();
    run(&env, "(define x 1)").unwrap();
    assert!(run(&env, "(begin (set! x 2) (car (list)) (set! x 3))").is_err());
    assert_eq!(run(&env, "x"), Ok(LispExpr::Integer(2)));
}

#[test]
fn eval_str_runs_a_program() {
    let env = global();
    let program = "
        (define area (lambda (r) (* pi (* r r))))
        (define r 3)
        (round (area r))";
    assert_eq!(eval_str(program, &env), Ok(LispExpr::Integer(28)));
    assert_eq!(eval_str("", &env), Ok(LispExpr::Void));
}

#[test]
fn procedures_print() {
    let env = global();
    assert_eq!(run(&env, "(lambda (a b) (+ a b))").unwrap().to_string(),
               "(lambda (a b) (+ a b))");
    assert_eq!(run(&env, "car").unwrap().to_string(), "#<builtin car>");
    assert_eq!(LispExpr::Void.to_string(), "");
}
