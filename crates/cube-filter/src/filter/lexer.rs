//! Lexer (tokenizer) for filter clauses.
//!
//! A clause is a single `field<op>value` unit. The lexer only checks the
//! shape of the clause; whether the field exists and accepts the operator is
//! decided by the compiler against the field table.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use super::error::{FilterError, FilterResult};

/// A comparison operator as written in a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `:` - equality, or case-insensitive substring match for text fields.
    Eq,
    /// `>` - numeric greater-than.
    Gt,
    /// `<` - numeric less-than.
    Lt,
}

impl Operator {
    /// Returns the operator written as `c`, if any.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            ':' => Some(Operator::Eq),
            '>' => Some(Operator::Gt),
            '<' => Some(Operator::Lt),
            _ => None,
        }
    }

    /// Returns the symbol used to write this operator.
    pub fn symbol(self) -> char {
        match self {
            Operator::Eq => ':',
            Operator::Gt => '>',
            Operator::Lt => '<',
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A clause split into its three parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedClause {
    /// The field name as written.
    pub field: String,
    /// The operator.
    pub operator: Operator,
    /// The value with quotes and escapes removed.
    pub raw_value: String,
}

/// Splits a clause into `(field, operator, value)`.
///
/// Surrounding whitespace is ignored. Values containing spaces must be
/// quoted with `"` or `'`; a backslash escapes the next character inside
/// quotes.
///
/// # Errors
///
/// Returns `FilterError::EmptyExpression` for blank input and
/// `FilterError::Parse` when the clause does not have the `field<op>value`
/// shape.
///
/// # Example
///
/// ```
/// use cube_filter::filter::{tokenize, Operator};
///
/// let clause = tokenize("decks>5").unwrap();
/// assert_eq!(clause.field, "decks");
/// assert_eq!(clause.operator, Operator::Gt);
/// assert_eq!(clause.raw_value, "5");
/// ```
pub fn tokenize(clause: &str) -> FilterResult<ParsedClause> {
    let trimmed = clause.trim();
    if trimmed.is_empty() {
        return Err(FilterError::EmptyExpression);
    }
    Lexer::new(trimmed).tokenize()
}

/// Lexer for a single filter clause.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    /// Current byte position in the input string.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    /// Consumes and returns the next character, updating position.
    fn next_char(&mut self) -> Option<char> {
        let c = self.chars.next();
        if let Some(ch) = c {
            self.position += ch.len_utf8();
        }
        c
    }

    /// Reads a field name (ASCII letters, digits and underscores).
    fn read_identifier(&mut self) -> String {
        let mut ident = String::new();
        while let Some(&c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                ident.push(c);
                self.next_char();
            } else {
                break;
            }
        }
        ident
    }

    /// Reads a quoted value. The opening quote has not been consumed yet.
    fn read_quoted_string(&mut self, quote_char: char) -> FilterResult<String> {
        let start = self.position;
        self.next_char();

        let mut result = String::new();
        loop {
            match self.next_char() {
                Some(c) if c == quote_char => return Ok(result),
                Some('\\') => match self.next_char() {
                    Some(escaped) => result.push(escaped),
                    None => break,
                },
                Some(c) => result.push(c),
                None => break,
            }
        }
        Err(FilterError::parse(
            format!("unterminated {} quote", quote_char),
            start,
        ))
    }

    /// Reads an unquoted value up to the end of the clause.
    fn read_bare_value(&mut self) -> FilterResult<String> {
        let mut value = String::new();
        while let Some(&c) = self.peek() {
            if c.is_whitespace() {
                return Err(FilterError::parse(
                    "unexpected whitespace in value (quote values containing spaces; \
                     only one clause is supported)",
                    self.position,
                ));
            }
            value.push(c);
            self.next_char();
        }
        Ok(value)
    }

    /// Consumes the whole input and returns the parsed clause.
    pub fn tokenize(mut self) -> FilterResult<ParsedClause> {
        let field = self.read_identifier();
        if field.is_empty() {
            let message = match self.peek().copied() {
                Some(c) if Operator::from_char(c).is_some() => {
                    format!("missing field name before '{}'", c)
                }
                Some(c) => format!("expected a field name, found '{}'", c),
                None => "expected a field name".to_string(),
            };
            return Err(FilterError::parse(message, self.position));
        }

        let op_position = self.position;
        let operator = match self.next_char() {
            Some(c) => Operator::from_char(c).ok_or_else(|| {
                FilterError::parse(
                    format!(
                        "expected one of ':', '>', '<' after '{}', found '{}'",
                        field, c
                    ),
                    op_position,
                )
            })?,
            None => {
                return Err(FilterError::parse(
                    format!("expected an operator after '{}'", field),
                    op_position,
                ))
            }
        };

        let value_position = self.position;
        let raw_value = match self.peek().copied() {
            Some(q) if q == '"' || q == '\'' => {
                let value = self.read_quoted_string(q)?;
                if self.peek().is_some() {
                    return Err(FilterError::parse(
                        "unexpected text after quoted value",
                        self.position,
                    ));
                }
                value
            }
            Some(_) => self.read_bare_value()?,
            None => String::new(),
        };

        if raw_value.is_empty() {
            return Err(FilterError::parse(
                format!("missing value after '{}{}'", field, operator),
                value_position,
            ));
        }

        Ok(ParsedClause {
            field,
            operator,
            raw_value,
        })
    }
}
