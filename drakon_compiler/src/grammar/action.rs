//! Action grammar
//!
//! Context-mutation statements inside a rule body. Statements are matched
//! against an ordered pattern table like the criterion grammar; a statement
//! whose head word is not an action keyword at all is reported as
//! "not an action" so the rule compiler can surface the original text.

use crate::diagnostics::Diagnostics;
use crate::document::Action;
use crate::grammar::context::ContextKey;
use crate::grammar::lexer::{tokenize, LexError, Token};
use crate::grammar::value::{Number, Scalar};

/// Action parse errors. All are hard errors that abort the compilation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActionError {
    #[error("Malformed action statement \"{text}\"")]
    Malformed { text: String },

    #[error("Malformed action statement \"{text}\": {source}")]
    Lex { text: String, source: LexError },

    #[error("Cannot divide by zero in \"{text}\"")]
    DivisionByZero { text: String },

    #[error("Value must be a number for '{op}' in \"{text}\"")]
    ValueNotNumber { op: &'static str, text: String },

    #[error("'{op}' must not carry a value: \"{text}\"")]
    UnexpectedValue { op: &'static str, text: String },

    #[error("Lists should contain only strings and integers: \"{text}\"")]
    InvalidListItem { text: String },
}

type MatchResult = Result<Action, ActionError>;

pub(crate) struct MatchInput<'a> {
    tokens: &'a [Token],
    text: &'a str,
}

/// One entry of the ordered action grammar table.
pub struct ActionPattern {
    pub name: &'static str,
    pub rationale: &'static str,
    matcher: fn(&MatchInput<'_>) -> Option<MatchResult>,
}

/// The ordered action grammar. Within the `set` family the value shapes are
/// disjoint, but the table order is still the documented contract.
pub static ACTION_PATTERNS: &[ActionPattern] = &[
    ActionPattern {
        name: "set_static_string",
        rationale: "quoted RHS is unambiguous",
        matcher: m_set_static_string,
    },
    ActionPattern {
        name: "set_static_number",
        rationale: "bare numeric literal",
        matcher: m_set_static_number,
    },
    ActionPattern {
        name: "set_static_boolean",
        rationale: "true/false would otherwise read as a context field",
        matcher: m_set_static_boolean,
    },
    ActionPattern {
        name: "set_list",
        rationale: "bracketed list of strings and integers",
        matcher: m_set_list,
    },
    ActionPattern {
        name: "set_dynamic",
        rationale: "dotted RHS names another context key, after every literal form",
        matcher: m_set_dynamic,
    },
    ActionPattern {
        name: "add_assign",
        rationale: "'+=' maps to add",
        matcher: m_add_assign,
    },
    ActionPattern {
        name: "sub_assign",
        rationale: "'-=' rewritten as add with the value negated",
        matcher: m_sub_assign,
    },
    ActionPattern {
        name: "mult_assign",
        rationale: "'*=' maps to mult",
        matcher: m_mult_assign,
    },
    ActionPattern {
        name: "div_assign",
        rationale: "'/=' rewritten as mult with the reciprocal; zero divides are caught first",
        matcher: m_div_assign,
    },
    ActionPattern {
        name: "increment",
        rationale: "'++' is sugar for add 1",
        matcher: m_increment,
    },
    ActionPattern {
        name: "decrement",
        rationale: "'--' is sugar for add -1",
        matcher: m_decrement,
    },
    ActionPattern {
        name: "remove",
        rationale: "value-less; a trailing value is an error, not another pattern",
        matcher: m_remove,
    },
    ActionPattern {
        name: "invert",
        rationale: "value-less; a trailing value is an error, not another pattern",
        matcher: m_invert,
    },
    ActionPattern {
        name: "trigger",
        rationale: "event trigger, carries only the event name",
        matcher: m_trigger,
    },
];

const ACTION_KEYWORDS: &[&str] = &["set", "remove", "invert", "trigger"];

/// Parse one rule-body statement as an action.
///
/// Returns `Ok(None)` when the statement is not an action at all, so the
/// caller can report the full statement in its own error.
pub fn parse_action(text: &str, _diag: &Diagnostics<'_>) -> Result<Option<Action>, ActionError> {
    let is_action = head_word(text)
        .map(|word| ACTION_KEYWORDS.contains(&word))
        .unwrap_or(false);

    let tokens = match tokenize(text) {
        Ok(tokens) => tokens,
        Err(source) => {
            if is_action {
                return Err(ActionError::Lex {
                    text: text.to_string(),
                    source,
                });
            }
            return Ok(None);
        }
    };

    if !is_action {
        return Ok(None);
    }

    let input = MatchInput {
        tokens: &tokens,
        text,
    };
    for pattern in ACTION_PATTERNS {
        if let Some(result) = (pattern.matcher)(&input) {
            return result.map(Some);
        }
    }

    Err(ActionError::Malformed {
        text: text.to_string(),
    })
}

fn head_word(text: &str) -> Option<&str> {
    let trimmed = text.trim_start();
    let end = trimmed
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_alphanumeric() && *ch != '_')
        .map(|(idx, _)| idx)
        .unwrap_or(trimmed.len());
    if end == 0 {
        None
    } else {
        Some(&trimmed[..end])
    }
}

// ======================================================================
// Shape helpers
// ======================================================================

fn key_at(tokens: &[Token]) -> Option<(ContextKey, &[Token])> {
    match tokens {
        [Token::Identifier(table), Token::Dot, Token::Identifier(field), rest @ ..] => {
            Some((ContextKey::qualified(table, field), rest))
        }
        [Token::Identifier(field), rest @ ..] => Some((ContextKey::unqualified(field), rest)),
        _ => None,
    }
}

/// Match `set <key> <op-token> ...` and hand back the key and the value
/// tokens after the operator.
fn set_head<'t>(tokens: &'t [Token], op: &Token) -> Option<(ContextKey, &'t [Token])> {
    let rest = match tokens {
        [Token::Identifier(head), rest @ ..] if head == "set" => rest,
        _ => return None,
    };
    let (key, rest) = key_at(rest)?;
    let (found, value) = rest.split_first()?;
    if found != op {
        return None;
    }
    Some((key, value))
}

fn arithmetic(
    input: &MatchInput<'_>,
    op_token: Token,
    op_name: &'static str,
    build: fn(ContextKey, Number) -> MatchResult,
) -> Option<MatchResult> {
    let (key, value) = set_head(input.tokens, &op_token)?;
    match value {
        [Token::Number(number)] => Some(build(key, *number)),
        _ => Some(Err(ActionError::ValueNotNumber {
            op: op_name,
            text: input.text.to_string(),
        })),
    }
}

fn value_less(
    input: &MatchInput<'_>,
    keyword: &'static str,
    build: fn(ContextKey) -> Action,
) -> Option<MatchResult> {
    let rest = match input.tokens {
        [Token::Identifier(head), rest @ ..] if head == keyword => rest,
        _ => return None,
    };
    let (key, rest) = key_at(rest)?;
    if rest.is_empty() {
        Some(Ok(build(key)))
    } else {
        Some(Err(ActionError::UnexpectedValue {
            op: keyword,
            text: input.text.to_string(),
        }))
    }
}

// ======================================================================
// Matchers, in table order
// ======================================================================

fn m_set_static_string(input: &MatchInput<'_>) -> Option<MatchResult> {
    let (key, value) = set_head(input.tokens, &Token::Eq)?;
    match value {
        [Token::Str(text)] => Some(Ok(Action::SetStatic {
            key,
            value: Scalar::String(text.clone()),
        })),
        _ => None,
    }
}

fn m_set_static_number(input: &MatchInput<'_>) -> Option<MatchResult> {
    let (key, value) = set_head(input.tokens, &Token::Eq)?;
    match value {
        [Token::Number(number)] => Some(Ok(Action::SetStatic {
            key,
            value: Scalar::from(*number),
        })),
        _ => None,
    }
}

fn m_set_static_boolean(input: &MatchInput<'_>) -> Option<MatchResult> {
    let (key, value) = set_head(input.tokens, &Token::Eq)?;
    match value {
        [Token::Boolean(flag)] => Some(Ok(Action::SetStatic {
            key,
            value: Scalar::Boolean(*flag),
        })),
        _ => None,
    }
}

fn m_set_list(input: &MatchInput<'_>) -> Option<MatchResult> {
    let (key, value) = set_head(input.tokens, &Token::Eq)?;
    let items = match value {
        [Token::LBracket, items @ .., Token::RBracket] => items,
        _ => return None,
    };

    let mut list = Vec::new();
    for item in items {
        match item {
            Token::Comma => {}
            Token::Str(text) => list.push(Scalar::String(text.clone())),
            Token::Number(number) => match number.as_integer() {
                Some(int) => list.push(Scalar::Integer(int)),
                None => {
                    return Some(Err(ActionError::InvalidListItem {
                        text: input.text.to_string(),
                    }))
                }
            },
            _ => {
                return Some(Err(ActionError::InvalidListItem {
                    text: input.text.to_string(),
                }))
            }
        }
    }
    Some(Ok(Action::SetList { key, value: list }))
}

fn m_set_dynamic(input: &MatchInput<'_>) -> Option<MatchResult> {
    let (key, value) = set_head(input.tokens, &Token::Eq)?;
    match value {
        [Token::Identifier(table), Token::Dot, Token::Identifier(field)] => {
            Some(Ok(Action::SetDynamic {
                key,
                other_table: table.clone(),
                other_field: field.clone(),
            }))
        }
        _ => None,
    }
}

fn m_add_assign(input: &MatchInput<'_>) -> Option<MatchResult> {
    arithmetic(input, Token::PlusEq, "+=", |key, value| {
        Ok(Action::Add { key, value })
    })
}

fn m_sub_assign(input: &MatchInput<'_>) -> Option<MatchResult> {
    arithmetic(input, Token::MinusEq, "-=", |key, value| {
        Ok(Action::Add {
            key,
            value: value.negated(),
        })
    })
}

fn m_mult_assign(input: &MatchInput<'_>) -> Option<MatchResult> {
    arithmetic(input, Token::StarEq, "*=", |key, value| {
        Ok(Action::Mult { key, value })
    })
}

fn m_div_assign(input: &MatchInput<'_>) -> Option<MatchResult> {
    let (key, value) = set_head(input.tokens, &Token::SlashEq)?;
    match value {
        [Token::Number(number)] => {
            if number.as_f64() == 0.0 {
                Some(Err(ActionError::DivisionByZero {
                    text: input.text.to_string(),
                }))
            } else {
                Some(Ok(Action::Mult {
                    key,
                    value: Number::Float(1.0 / number.as_f64()),
                }))
            }
        }
        _ => Some(Err(ActionError::ValueNotNumber {
            op: "/=",
            text: input.text.to_string(),
        })),
    }
}

fn m_increment(input: &MatchInput<'_>) -> Option<MatchResult> {
    let (key, value) = set_head(input.tokens, &Token::PlusPlus)?;
    if value.is_empty() {
        Some(Ok(Action::Add {
            key,
            value: Number::Integer(1),
        }))
    } else {
        Some(Err(ActionError::Malformed {
            text: input.text.to_string(),
        }))
    }
}

fn m_decrement(input: &MatchInput<'_>) -> Option<MatchResult> {
    let (key, value) = set_head(input.tokens, &Token::MinusMinus)?;
    if value.is_empty() {
        Some(Ok(Action::Add {
            key,
            value: Number::Integer(-1),
        }))
    } else {
        Some(Err(ActionError::Malformed {
            text: input.text.to_string(),
        }))
    }
}

fn m_remove(input: &MatchInput<'_>) -> Option<MatchResult> {
    value_less(input, "remove", |key| Action::Remove { key })
}

fn m_invert(input: &MatchInput<'_>) -> Option<MatchResult> {
    value_less(input, "invert", |key| Action::Invert { key })
}

fn m_trigger(input: &MatchInput<'_>) -> Option<MatchResult> {
    match input.tokens {
        [Token::Identifier(head), Token::Identifier(event)] if head == "trigger" => {
            Some(Ok(Action::Trigger {
                value: event.clone(),
            }))
        }
        _ => None,
    }
}
