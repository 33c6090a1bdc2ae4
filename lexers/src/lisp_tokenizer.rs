#![deny(warnings)]

use crate::scanner::Scanner;
use std::fmt;
use std::str::Chars;

/// Tokens of an s-expression. Parenthesis are always tokens of their own,
/// any other run of non-blank characters is an `Atom`, taken verbatim.
#[derive(Clone, PartialEq, Debug)]
pub enum LispToken {
    OParen,
    CParen,
    Atom(String),
}

impl fmt::Display for LispToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LispToken::OParen => write!(f, "("),
            LispToken::CParen => write!(f, ")"),
            LispToken::Atom(atom) => write!(f, "{}", atom),
        }
    }
}

pub struct LispTokenizer<'a>(Scanner<Chars<'a>>);

impl<'a> LispTokenizer<'a> {
    pub fn scanner(source: &'a str) -> Scanner<LispTokenizer<'a>> {
        Scanner::new(LispTokenizer(Scanner::from_str(source)))
    }
}

impl<'a> Iterator for LispTokenizer<'a> {
    type Item = LispToken;
    fn next(&mut self) -> Option<Self::Item> {
        self.0.ignore_ws();
        if let Some(paren) = self.0.accept_any_char("()") {
            self.0.ignore();
            Some(if paren == '(' { LispToken::OParen } else { LispToken::CParen })
        } else if self.0.until_ws_or_any("()") {
            Some(LispToken::Atom(self.0.extract_string()))
        } else {
            None
        }
    }
}

/// Split the whole source into tokens.
pub fn tokenize(source: &str) -> Vec<LispToken> {
    LispTokenizer::scanner(source).collect()
}

///////////////////////////////////////////////////////////////////////////////
