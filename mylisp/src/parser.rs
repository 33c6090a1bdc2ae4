use lexers::{LispToken, LispTokenizer, Scanner};
use crate::procedure::Procedure;
use std::fmt;
use std::rc::Rc;

#[derive(Clone, Copy, PartialEq, Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected EOF while reading")]
    UnexpectedEOF,
    #[error("unexpected )")]
    UnexpectedCloseParen,
}

/// Both the syntax tree and the runtime values. A `List` straight out of
/// the parser is the syntax of a compound form; after evaluation it is
/// plain data.
#[derive(Clone, PartialEq, Debug)]
pub enum LispExpr {
    Integer(i64),
    Real(f64),
    Symbol(String),
    List(Vec<LispExpr>),
    True, False,
    Proc(Rc<Procedure>),
    /// Result of `define` and `set!`. Never produced by the parser.
    Void,
}

impl LispExpr {
    /// Classify a token: booleans, integer, then real, else a symbol.
    pub fn atom(token: &str) -> LispExpr {
        if token == "#t" {
            LispExpr::True
        } else if token == "#f" {
            LispExpr::False
        } else if let Ok(n) = token.parse::<i64>() {
            LispExpr::Integer(n)
        } else if let Ok(x) = token.parse::<f64>() {
            LispExpr::Real(x)
        } else {
            LispExpr::Symbol(token.to_string())
        }
    }

    pub fn from_bool(b: bool) -> LispExpr {
        if b { LispExpr::True } else { LispExpr::False }
    }

    // #f, zero, the empty list and void are false, anything else is true
    pub fn is_truthy(&self) -> bool {
        match self {
            LispExpr::False | LispExpr::Void => false,
            LispExpr::Integer(n) => *n != 0,
            LispExpr::Real(x) => *x != 0.0,
            LispExpr::List(l) => !l.is_empty(),
            _ => true,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, LispExpr::Void)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            LispExpr::Integer(_) => "integer",
            LispExpr::Real(_) => "real",
            LispExpr::Symbol(_) => "symbol",
            LispExpr::List(_) => "list",
            LispExpr::True | LispExpr::False => "boolean",
            LispExpr::Proc(_) => "procedure",
            LispExpr::Void => "void",
        }
    }
}

impl fmt::Display for LispExpr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LispExpr::Integer(n) => write!(f, "{}", n),
            // Debug keeps the decimal point, so 3.0 reads back as a real
            LispExpr::Real(x) => write!(f, "{:?}", x),
            LispExpr::Symbol(s) => write!(f, "{}", s),
            LispExpr::List(v) => {
                write!(f, "(")?;
                for (i, item) in v.iter().enumerate() {
                    if i > 0 { write!(f, " ")?; }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            },
            LispExpr::True => write!(f, "#t"),
            LispExpr::False => write!(f, "#f"),
            LispExpr::Proc(p) => write!(f, "{}", p),
            LispExpr::Void => Ok(()),
        }
    }
}


pub struct Parser;

impl Parser {
    pub fn parse_str(source: &str) -> Result<LispExpr, ParseError> {
        Self::parse(&mut LispTokenizer::scanner(source))
    }

    /// Read every top-level expression in the source.
    pub fn parse_all(source: &str) -> Result<Vec<LispExpr>, ParseError> {
        let mut tokens = LispTokenizer::scanner(source);
        let mut exprs = Vec::new();
        while tokens.peek().is_some() {
            exprs.push(Self::parse(&mut tokens)?);
        }
        Ok(exprs)
    }

    fn parse<I>(tokens: &mut Scanner<I>) -> Result<LispExpr, ParseError>
            where I: Iterator<Item=LispToken> {
        let token = tokens.next();
        tokens.ignore(); // consumed tokens are never revisited
        match token {
            None                        => Err(ParseError::UnexpectedEOF),
            Some(LispToken::CParen)     => Err(ParseError::UnexpectedCloseParen),
            Some(LispToken::Atom(atom)) => Ok(LispExpr::atom(&atom)),
            Some(LispToken::OParen)     => {
                let mut list = Vec::new();
                while tokens.peek() != Some(LispToken::CParen) { // even when None
                    list.push(Self::parse(tokens)?);
                }
                tokens.next(); // get over that CParen
                tokens.ignore();
                Ok(LispExpr::List(list))
            },
        }
    }
}
