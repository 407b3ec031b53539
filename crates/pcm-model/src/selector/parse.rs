//! Lexer and recursive-descent parser for the label selector string syntax.
//!
//! ```text
//! selector    := "" | requirement ("," requirement)*
//! requirement := "!" key
//!              | key
//!              | key ("=" | "==" | "!=") value
//!              | key ("in" | "notin") "(" value ("," value)* ")"
//!              | key (">" | "<") integer
//! ```
//!
//! Empty slots in a value set (`in ()`, `in (a,)`) stand for the empty value.
use std::{collections::BTreeSet, fmt, iter::Peekable, str::Chars};

use super::requirement::{Operator, Requirement, validate_key, validate_value};

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Ident(String),
    Comma,
    Open,
    Close,
    Eq,
    DoubleEq,
    NotEq,
    Bang,
    In,
    NotIn,
    Gt,
    Lt,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(s) => write!(f, "{s:?}"),
            Token::Comma => f.write_str("','"),
            Token::Open => f.write_str("'('"),
            Token::Close => f.write_str("')'"),
            Token::Eq => f.write_str("'='"),
            Token::DoubleEq => f.write_str("'=='"),
            Token::NotEq => f.write_str("'!='"),
            Token::Bang => f.write_str("'!'"),
            Token::In => f.write_str("'in'"),
            Token::NotIn => f.write_str("'notin'"),
            Token::Gt => f.write_str("'>'"),
            Token::Lt => f.write_str("'<'"),
        }
    }
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | '(' | ')' | '=' | '!' | '<' | '>')
}

fn lex(input: &str) -> Vec<Token> {
    let mut out = Vec::new();
    let mut chars: Peekable<Chars<'_>> = input.chars().peekable();

    while let Some(c) = chars.next() {
        let token = match c {
            c if c.is_whitespace() => continue,
            ',' => Token::Comma,
            '(' => Token::Open,
            ')' => Token::Close,
            '>' => Token::Gt,
            '<' => Token::Lt,
            '=' => {
                if chars.next_if_eq(&'=').is_some() {
                    Token::DoubleEq
                } else {
                    Token::Eq
                }
            }
            '!' => {
                if chars.next_if_eq(&'=').is_some() {
                    Token::NotEq
                } else {
                    Token::Bang
                }
            }
            first => {
                let mut word = String::from(first);
                while let Some(c) = chars.next_if(|c| !is_delimiter(*c)) {
                    word.push(c);
                }
                match word.as_str() {
                    "in" => Token::In,
                    "notin" => Token::NotIn,
                    _ => Token::Ident(word),
                }
            }
        };
        out.push(token);
    }
    out
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn requirements(&mut self) -> Result<Vec<Requirement>, String> {
        let mut out = Vec::new();
        if self.tokens.is_empty() {
            return Ok(out);
        }
        loop {
            out.push(self.requirement()?);
            match self.next() {
                None => return Ok(out),
                Some(Token::Comma) => continue,
                Some(t) => return Err(format!("expected ',' after requirement, found {t}")),
            }
        }
    }

    fn requirement(&mut self) -> Result<Requirement, String> {
        match self.next() {
            Some(Token::Bang) => {
                let key = self.key()?;
                Ok(Requirement::new(key, Operator::DoesNotExist, BTreeSet::new()))
            }
            Some(Token::Ident(key)) => {
                validate_key(&key)?;
                self.operator(key)
            }
            Some(t) => Err(format!("expected a label key, found {t}")),
            None => Err("expected a label key, found end of input".to_string()),
        }
    }

    fn key(&mut self) -> Result<String, String> {
        match self.next() {
            Some(Token::Ident(key)) => {
                validate_key(&key)?;
                Ok(key)
            }
            Some(t) => Err(format!("expected a label key after '!', found {t}")),
            None => Err("expected a label key after '!', found end of input".to_string()),
        }
    }

    fn operator(&mut self, key: String) -> Result<Requirement, String> {
        let op = match self.peek() {
            None | Some(Token::Comma) => {
                return Ok(Requirement::new(key, Operator::Exists, BTreeSet::new()));
            }
            Some(Token::Eq | Token::DoubleEq) => Operator::Equals,
            Some(Token::NotEq) => Operator::NotEquals,
            Some(Token::In) => Operator::In,
            Some(Token::NotIn) => Operator::NotIn,
            Some(Token::Gt) => Operator::GreaterThan,
            Some(Token::Lt) => Operator::LessThan,
            Some(t) => return Err(format!("expected an operator after key {key:?}, found {t}")),
        };
        self.pos += 1;

        let values = match op {
            Operator::In | Operator::NotIn => self.value_set()?,
            Operator::GreaterThan | Operator::LessThan => BTreeSet::from([self.integer(&key)?]),
            _ => BTreeSet::from([self.value()?]),
        };
        Ok(Requirement::new(key, op, values))
    }

    fn value(&mut self) -> Result<String, String> {
        match self.peek().cloned() {
            None | Some(Token::Comma) => Ok(String::new()),
            Some(Token::Ident(v)) => {
                self.pos += 1;
                validate_value(&v)?;
                Ok(v)
            }
            Some(t) => Err(format!("expected a label value, found {t}")),
        }
    }

    fn integer(&mut self, key: &str) -> Result<String, String> {
        match self.next() {
            Some(Token::Ident(v)) => match v.parse::<i64>() {
                Ok(_) => Ok(v),
                Err(_) => Err(format!("bound for {key:?} must be an integer, found {v:?}")),
            },
            Some(t) => Err(format!("expected an integer bound for {key:?}, found {t}")),
            None => Err(format!(
                "expected an integer bound for {key:?}, found end of input"
            )),
        }
    }

    fn value_set(&mut self) -> Result<BTreeSet<String>, String> {
        match self.next() {
            Some(Token::Open) => {}
            Some(t) => return Err(format!("expected '(' to open a value set, found {t}")),
            None => return Err("expected '(' to open a value set, found end of input".to_string()),
        }

        let mut values = BTreeSet::new();
        loop {
            match self.peek().cloned() {
                Some(Token::Ident(v)) => {
                    self.pos += 1;
                    validate_value(&v)?;
                    values.insert(v);
                }
                Some(Token::Comma | Token::Close) => {
                    values.insert(String::new());
                }
                Some(t) => return Err(format!("expected a label value in set, found {t}")),
                None => return Err("unterminated value set".to_string()),
            }
            match self.next() {
                Some(Token::Comma) => continue,
                Some(Token::Close) => return Ok(values),
                Some(t) => return Err(format!("expected ',' or ')' in value set, found {t}")),
                None => return Err("unterminated value set".to_string()),
            }
        }
    }
}

/// Parse a selector string into its requirements.
pub(crate) fn requirements(input: &str) -> Result<Vec<Requirement>, String> {
    Parser {
        tokens: lex(input),
        pos: 0,
    }
    .requirements()
}
