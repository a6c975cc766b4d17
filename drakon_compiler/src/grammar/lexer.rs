//! Statement-level tokenizer for criterion and action grammars
//!
//! Systematic single-pass tokenization over one trimmed statement string.
//! Whitespace separates tokens and is discarded; `true`/`false` classify as
//! boolean literals during word classification.

use crate::config::constants::MAX_IDENTIFIER_LENGTH;
use crate::grammar::value::Number;

/// Lexical errors for a single statement
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexError {
    #[error("Invalid character '{character}'")]
    InvalidCharacter { character: char },

    #[error("Unterminated string literal")]
    UnterminatedString,

    #[error("Invalid number format: '{text}'")]
    InvalidNumber { text: String },

    #[error("Identifier too long: {length} characters (max {MAX_IDENTIFIER_LENGTH})")]
    IdentifierTooLong { length: usize },
}

/// Tokens of the criterion/action statement grammar
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Identifier(String),
    Number(Number),
    Str(String),
    Boolean(bool),
    Dot,
    Comma,
    LBracket,
    RBracket,
    Bang,
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PlusPlus,
    MinusMinus,
}

impl Token {
    /// Short description used in error messages
    pub fn describe(&self) -> String {
        match self {
            Token::Identifier(name) => format!("identifier '{}'", name),
            Token::Number(n) => format!("number {}", n),
            Token::Str(s) => format!("string \"{}\"", s),
            Token::Boolean(b) => format!("boolean {}", b),
            Token::Dot => "'.'".to_string(),
            Token::Comma => "','".to_string(),
            Token::LBracket => "'['".to_string(),
            Token::RBracket => "']'".to_string(),
            Token::Bang => "'!'".to_string(),
            Token::Eq => "'='".to_string(),
            Token::Neq => "'!='".to_string(),
            Token::Lt => "'<'".to_string(),
            Token::Le => "'<='".to_string(),
            Token::Gt => "'>'".to_string(),
            Token::Ge => "'>='".to_string(),
            Token::PlusEq => "'+='".to_string(),
            Token::MinusEq => "'-='".to_string(),
            Token::StarEq => "'*='".to_string(),
            Token::SlashEq => "'/='".to_string(),
            Token::PlusPlus => "'++'".to_string(),
            Token::MinusMinus => "'--'".to_string(),
        }
    }
}

/// Tokenize one statement.
pub fn tokenize(text: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            c if c.is_whitespace() => {}

            '"' => tokens.push(scan_string(&mut chars)?),

            '0'..='9' => tokens.push(scan_number(ch, false, &mut chars)?),

            '-' => match chars.peek() {
                Some('=') => {
                    chars.next();
                    tokens.push(Token::MinusEq);
                }
                Some('-') => {
                    chars.next();
                    tokens.push(Token::MinusMinus);
                }
                Some(c) if c.is_ascii_digit() => {
                    let first = chars.next().unwrap_or('0');
                    tokens.push(scan_number(first, true, &mut chars)?);
                }
                _ => return Err(LexError::InvalidCharacter { character: ch }),
            },

            '+' => match chars.peek() {
                Some('=') => {
                    chars.next();
                    tokens.push(Token::PlusEq);
                }
                Some('+') => {
                    chars.next();
                    tokens.push(Token::PlusPlus);
                }
                _ => return Err(LexError::InvalidCharacter { character: ch }),
            },

            '*' => match chars.peek() {
                Some('=') => {
                    chars.next();
                    tokens.push(Token::StarEq);
                }
                _ => return Err(LexError::InvalidCharacter { character: ch }),
            },

            '/' => match chars.peek() {
                Some('=') => {
                    chars.next();
                    tokens.push(Token::SlashEq);
                }
                _ => return Err(LexError::InvalidCharacter { character: ch }),
            },

            '!' => match chars.peek() {
                Some('=') => {
                    chars.next();
                    tokens.push(Token::Neq);
                }
                _ => tokens.push(Token::Bang),
            },

            '<' => match chars.peek() {
                Some('=') => {
                    chars.next();
                    tokens.push(Token::Le);
                }
                _ => tokens.push(Token::Lt),
            },

            '>' => match chars.peek() {
                Some('=') => {
                    chars.next();
                    tokens.push(Token::Ge);
                }
                _ => tokens.push(Token::Gt),
            },

            '=' => tokens.push(Token::Eq),
            '.' => tokens.push(Token::Dot),
            ',' => tokens.push(Token::Comma),
            '[' => tokens.push(Token::LBracket),
            ']' => tokens.push(Token::RBracket),

            'a'..='z' | 'A'..='Z' | '_' => tokens.push(scan_word(ch, &mut chars)?),

            _ => return Err(LexError::InvalidCharacter { character: ch }),
        }
    }

    Ok(tokens)
}

fn scan_word(
    first: char,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Result<Token, LexError> {
    let mut word = String::new();
    word.push(first);
    while let Some(ch) = chars.peek() {
        match ch {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' => {
                word.push(*ch);
                chars.next();
            }
            _ => break,
        }
    }

    if word.len() > MAX_IDENTIFIER_LENGTH {
        return Err(LexError::IdentifierTooLong { length: word.len() });
    }

    Ok(match word.as_str() {
        "true" => Token::Boolean(true),
        "false" => Token::Boolean(false),
        _ => Token::Identifier(word),
    })
}

fn scan_number(
    first: char,
    negative: bool,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Result<Token, LexError> {
    let mut text = String::new();
    if negative {
        text.push('-');
    }
    text.push(first);
    let mut has_dot = false;

    while let Some(ch) = chars.peek() {
        match ch {
            '0'..='9' => {
                text.push(*ch);
                chars.next();
            }
            '.' if !has_dot => {
                has_dot = true;
                text.push('.');
                chars.next();
            }
            _ => break,
        }
    }

    let number = if has_dot {
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Number::Float(value),
            _ => return Err(LexError::InvalidNumber { text }),
        }
    } else {
        match text.parse::<i64>() {
            Ok(value) => Number::Integer(value),
            Err(_) => return Err(LexError::InvalidNumber { text }),
        }
    };

    Ok(Token::Number(number))
}

fn scan_string(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Result<Token, LexError> {
    let mut content = String::new();
    loop {
        match chars.next() {
            Some('"') => return Ok(Token::Str(content)),
            Some('\\') => match chars.next() {
                Some('n') => content.push('\n'),
                Some('t') => content.push('\t'),
                Some('r') => content.push('\r'),
                Some(other) => content.push(other),
                None => return Err(LexError::UnterminatedString),
            },
            Some(ch) => content.push(ch),
            None => return Err(LexError::UnterminatedString),
        }
    }
}
