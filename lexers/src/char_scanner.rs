#![deny(warnings)]

use crate::scanner::Scanner;
use std::str::Chars;

impl<'a> Scanner<Chars<'a>> {
    pub fn from_str(source: &'a str) -> Scanner<Chars<'a>> {
        Scanner::new(source.chars())
    }
}

impl<I: Iterator<Item=char>> Scanner<I> {
    pub fn extract_string(&mut self) -> String {
        self.extract().into_iter().collect()
    }

    pub fn accept_char(&mut self, c: char) -> bool {
        self.accept(&c).is_some()
    }

    pub fn accept_any_char(&mut self, any: &str) -> Option<char> {
        self.accept_if(|c| any.contains(*c))
    }

    pub fn skip_ws(&mut self) -> bool {
        self.skip_all_if(|c| c.is_whitespace())
    }

    // skip whitespace and forget about it
    pub fn ignore_ws(&mut self) {
        self.skip_ws();
        self.ignore();
    }

    // advance until whitespace or any of the delimiters (or EOF)
    pub fn until_ws_or_any(&mut self, delims: &str) -> bool {
        self.until_if(|c| c.is_whitespace() || delims.contains(*c))
    }
}

///////////////////////////////////////////////////////////////////////////////
