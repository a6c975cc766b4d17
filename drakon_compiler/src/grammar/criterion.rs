//! Criterion grammar
//!
//! One criterion string compiles to a canonical [`Criterion`] record or a
//! bare preset reference. The grammar is an ordered table of
//! `(name, rationale, matcher)` entries; the first matching entry wins.
//! The order is part of the language contract: several surface forms are
//! lexical subsets of others, and the bare-identifier preset form is only
//! reachable because every more specific pattern is tried first.

use crate::diagnostics::{codes, Diagnostics};
use crate::document::Criterion;
use crate::grammar::context::ContextKey;
use crate::grammar::lexer::{tokenize, LexError, Token};
use crate::grammar::value::{Number, Scalar};

/// Criterion parse errors. All are hard errors that abort the compilation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CriterionError {
    #[error("Malformed criterion \"{text}\"")]
    Malformed { text: String },

    #[error("Malformed criterion \"{text}\": {source}")]
    Lex { text: String, source: LexError },

    #[error("Equals should not be used with floating-point numbers: \"{text}\"")]
    EqualsFloat { text: String },

    #[error("Impossible criterion \"{text}\": minimum {min} exceeds maximum {max}")]
    ImpossibleRange {
        text: String,
        min: Number,
        max: Number,
    },

    #[error("'dummy' requires a non-zero integer weight: \"{text}\"")]
    DummyNotInteger { text: String },

    #[error("'dummy 0' is redundant")]
    DummyZero,

    #[error("'fail {value}' will always fail")]
    FailAlwaysFails { value: f64 },

    #[error("'fail {value}' will always succeed")]
    FailAlwaysSucceeds { value: f64 },

    #[error("Cannot invert criterion of type {kind}")]
    CannotInvert { kind: &'static str },

    #[error("Cannot invert a preset reference \"{name}\"")]
    CannotInvertPreset { name: String },

    #[error("'includes' requires an integer or quoted string value: \"{text}\"")]
    InvalidIncludesValue { text: String },
}

/// Result of parsing one criterion string. Bare identifiers are preset
/// references and must be hoisted by the caller into the rule's preset
/// list, never left among the criteria.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedCriterion {
    Criterion(Criterion),
    Preset(String),
}

type MatchResult = Result<ParsedCriterion, CriterionError>;

/// Everything a matcher may look at.
pub(crate) struct MatchInput<'a> {
    tokens: &'a [Token],
    text: &'a str,
    diag: Diagnostics<'a>,
}

/// One entry of the ordered grammar table.
pub struct CriterionPattern {
    pub name: &'static str,
    pub rationale: &'static str,
    matcher: fn(&MatchInput<'_>) -> Option<MatchResult>,
}

/// The ordered criterion grammar. First match wins; reordering entries
/// changes the language.
pub static CRITERION_PATTERNS: &[CriterionPattern] = &[
    CriterionPattern {
        name: "equals_string",
        rationale: "quoted RHS is unambiguous; tried before dynamic '=' forms",
        matcher: m_equals_string,
    },
    CriterionPattern {
        name: "equals_number",
        rationale: "numeric RHS; floats are rejected here rather than misread",
        matcher: m_equals_number,
    },
    CriterionPattern {
        name: "equals_boolean",
        rationale: "true/false would otherwise read as a context field",
        matcher: m_equals_boolean,
    },
    CriterionPattern {
        name: "not_equals_string",
        rationale: "'!=' sugar for equals + inverse",
        matcher: m_not_equals_string,
    },
    CriterionPattern {
        name: "not_equals_number",
        rationale: "'!=' sugar for equals + inverse",
        matcher: m_not_equals_number,
    },
    CriterionPattern {
        name: "not_equals_boolean",
        rationale: "'!=' sugar for equals + inverse",
        matcher: m_not_equals_boolean,
    },
    CriterionPattern {
        name: "greater_than",
        rationale: "strict bound, normalized to an inclusive min",
        matcher: m_greater_than,
    },
    CriterionPattern {
        name: "greater_equal",
        rationale: "inclusive min",
        matcher: m_greater_equal,
    },
    CriterionPattern {
        name: "less_than",
        rationale: "strict bound, normalized to an inclusive max",
        matcher: m_less_than,
    },
    CriterionPattern {
        name: "less_equal",
        rationale: "inclusive max",
        matcher: m_less_equal,
    },
    CriterionPattern {
        name: "lt_lt",
        rationale: "three-term range, both bounds strict",
        matcher: m_lt_lt,
    },
    CriterionPattern {
        name: "lt_le",
        rationale: "three-term range, low bound strict",
        matcher: m_lt_le,
    },
    CriterionPattern {
        name: "le_lt",
        rationale: "three-term range, high bound strict",
        matcher: m_le_lt,
    },
    CriterionPattern {
        name: "le_le",
        rationale: "three-term range, both bounds inclusive",
        matcher: m_le_le,
    },
    CriterionPattern {
        name: "exists",
        rationale: "presence check, no value",
        matcher: m_exists,
    },
    CriterionPattern {
        name: "empty",
        rationale: "emptiness check, no value",
        matcher: m_empty,
    },
    CriterionPattern {
        name: "nonempty",
        rationale: "sugar for empty + inverse",
        matcher: m_nonempty,
    },
    CriterionPattern {
        name: "dummy",
        rationale: "fixed-function stub; 'dummy' as a key is shadowed on purpose",
        matcher: m_dummy,
    },
    CriterionPattern {
        name: "fail",
        rationale: "fixed-function random pass; 'fail' as a key is shadowed on purpose",
        matcher: m_fail,
    },
    CriterionPattern {
        name: "includes",
        rationale: "membership test over a list-valued field",
        matcher: m_includes,
    },
    CriterionPattern {
        name: "excludes",
        rationale: "sugar for includes + inverse",
        matcher: m_excludes,
    },
    CriterionPattern {
        name: "dynamic_equals",
        rationale: "'=' against a qualified key, after every literal '=' form",
        matcher: m_dynamic_equals,
    },
    CriterionPattern {
        name: "dynamic_not_equals",
        rationale: "equals_dynamic + inverse",
        matcher: m_dynamic_not_equals,
    },
    CriterionPattern {
        name: "dynamic_greater",
        rationale: "strict dynamic bound; no literal to normalize, kept exclusive",
        matcher: m_dynamic_greater,
    },
    CriterionPattern {
        name: "dynamic_greater_equal",
        rationale: "inclusive dynamic min",
        matcher: m_dynamic_greater_equal,
    },
    CriterionPattern {
        name: "dynamic_less",
        rationale: "strict dynamic bound; no literal to normalize, kept exclusive",
        matcher: m_dynamic_less,
    },
    CriterionPattern {
        name: "dynamic_less_equal",
        rationale: "inclusive dynamic max",
        matcher: m_dynamic_less_equal,
    },
    CriterionPattern {
        name: "preset",
        rationale: "bare identifier; only reachable after every criterion form failed",
        matcher: m_preset,
    },
];

/// Parse one trimmed criterion string.
///
/// A leading `!` is parsed once, stripped, and the remainder matched
/// against the pattern table.
pub fn parse_criterion(
    text: &str,
    diag: &Diagnostics<'_>,
) -> Result<ParsedCriterion, CriterionError> {
    let tokens = tokenize(text).map_err(|source| CriterionError::Lex {
        text: text.to_string(),
        source,
    })?;

    let (inverted, tokens) = match tokens.split_first() {
        Some((Token::Bang, rest)) => (true, rest),
        _ => (false, &tokens[..]),
    };

    if tokens.is_empty() {
        return Err(CriterionError::Malformed {
            text: text.to_string(),
        });
    }

    let input = MatchInput {
        tokens,
        text,
        diag: *diag,
    };

    for pattern in CRITERION_PATTERNS {
        if let Some(result) = (pattern.matcher)(&input) {
            let parsed = result?;
            if !inverted {
                return Ok(parsed);
            }
            return match parsed {
                ParsedCriterion::Preset(name) => Err(CriterionError::CannotInvertPreset { name }),
                ParsedCriterion::Criterion(criterion) => Ok(ParsedCriterion::Criterion(
                    invert_criterion(criterion, text, diag)?,
                )),
            };
        }
    }

    Err(CriterionError::Malformed {
        text: text.to_string(),
    })
}

/// Toggle a criterion's inverse flag. Double inversion toggles the flag
/// back off with a warning; the pseudo-criteria reject inversion outright.
pub fn invert_criterion(
    mut criterion: Criterion,
    text: &str,
    diag: &Diagnostics<'_>,
) -> Result<Criterion, CriterionError> {
    let kind = criterion.kind();
    match criterion.inverse_mut() {
        None => Err(CriterionError::CannotInvert { kind }),
        Some(flag) => {
            if *flag {
                diag.warn(
                    codes::criterion::REDUNDANT_INVERSION,
                    format!(
                        "Redundant double inversion on criterion of type {} in \"{}\"",
                        kind, text
                    ),
                );
                *flag = false;
            } else {
                *flag = true;
            }
            Ok(criterion)
        }
    }
}

// ======================================================================
// Shared shape helpers
// ======================================================================

/// Match a context key at the head of the token slice.
fn key_at(tokens: &[Token]) -> Option<(ContextKey, &[Token])> {
    match tokens {
        [Token::Identifier(table), Token::Dot, Token::Identifier(field), rest @ ..] => {
            Some((ContextKey::qualified(table, field), rest))
        }
        [Token::Identifier(field), rest @ ..] => Some((ContextKey::unqualified(field), rest)),
        _ => None,
    }
}

/// Match a fully-qualified key consuming the whole slice.
fn qualified_key(tokens: &[Token]) -> Option<ContextKey> {
    match tokens {
        [Token::Identifier(table), Token::Dot, Token::Identifier(field)] => {
            Some(ContextKey::qualified(table, field))
        }
        _ => None,
    }
}

fn criterion(criterion: Criterion) -> Option<MatchResult> {
    Some(Ok(ParsedCriterion::Criterion(criterion)))
}

/// Normalize a strict low bound: `x > 3` becomes `min = 4`; non-integer
/// bounds degrade to inclusive with a warning.
fn strict_min(bound: Number, input: &MatchInput<'_>) -> Number {
    match bound.as_integer() {
        Some(value) => Number::Integer(value.saturating_add(1)),
        None => {
            input.diag.warn(
                codes::criterion::STRICT_FLOAT_BOUND,
                format!(
                    "Strict comparison against non-integer {} treated as inclusive in \"{}\"",
                    bound, input.text
                ),
            );
            bound
        }
    }
}

/// Normalize a strict high bound: `x < 3` becomes `max = 2`.
fn strict_max(bound: Number, input: &MatchInput<'_>) -> Number {
    match bound.as_integer() {
        Some(value) => Number::Integer(value.saturating_sub(1)),
        None => {
            input.diag.warn(
                codes::criterion::STRICT_FLOAT_BOUND,
                format!(
                    "Strict comparison against non-integer {} treated as inclusive in \"{}\"",
                    bound, input.text
                ),
            );
            bound
        }
    }
}

fn equals_value(token: &Token, input: &MatchInput<'_>) -> Option<Result<Scalar, CriterionError>> {
    match token {
        Token::Str(value) => Some(Ok(Scalar::String(value.clone()))),
        Token::Number(number) => match number.as_integer() {
            Some(value) => Some(Ok(Scalar::Integer(value))),
            None => Some(Err(CriterionError::EqualsFloat {
                text: input.text.to_string(),
            })),
        },
        Token::Boolean(value) => Some(Ok(Scalar::Boolean(*value))),
        _ => None,
    }
}

enum ValueShape {
    Str,
    Num,
    Bool,
}

fn literal_equals(
    input: &MatchInput<'_>,
    negated: bool,
    shape: ValueShape,
) -> Option<MatchResult> {
    let (key, rest) = key_at(input.tokens)?;
    let op = if negated { &Token::Neq } else { &Token::Eq };
    let value = match rest {
        [found, value] if found == op => value,
        _ => return None,
    };
    let shape_matches = matches!(
        (&shape, value),
        (ValueShape::Str, Token::Str(_))
            | (ValueShape::Num, Token::Number(_))
            | (ValueShape::Bool, Token::Boolean(_))
    );
    if !shape_matches {
        return None;
    }
    match equals_value(value, input)? {
        Ok(value) => criterion(Criterion::Equals {
            key,
            value,
            inverse: negated,
        }),
        Err(error) => Some(Err(error)),
    }
}

enum BoundKind {
    Min,
    Max,
}

fn comparison(
    input: &MatchInput<'_>,
    op: Token,
    kind: BoundKind,
    strict: bool,
) -> Option<MatchResult> {
    let (key, rest) = key_at(input.tokens)?;
    let bound = match rest {
        [found, Token::Number(bound)] if *found == op => *bound,
        _ => return None,
    };
    let criterion_record = match kind {
        BoundKind::Min => {
            let value = if strict {
                strict_min(bound, input)
            } else {
                bound.normalized()
            };
            Criterion::Min {
                key,
                value,
                inverse: false,
            }
        }
        BoundKind::Max => {
            let value = if strict {
                strict_max(bound, input)
            } else {
                bound.normalized()
            };
            Criterion::Max {
                key,
                value,
                inverse: false,
            }
        }
    };
    criterion(criterion_record)
}

fn range(
    input: &MatchInput<'_>,
    low_strict: bool,
    high_strict: bool,
) -> Option<MatchResult> {
    let (low, low_op) = match input.tokens {
        [Token::Number(low), op, ..] => (*low, op),
        _ => return None,
    };
    let expected_low = if low_strict { Token::Lt } else { Token::Le };
    if *low_op != expected_low {
        return None;
    }
    let (key, rest) = key_at(&input.tokens[2..])?;
    let expected_high = if high_strict { Token::Lt } else { Token::Le };
    let high = match rest {
        [found, Token::Number(high)] if *found == expected_high => *high,
        _ => return None,
    };

    // The +-1 normalization needs both literals to be integers; otherwise
    // strict boundaries degrade to inclusive.
    let both_integers = low.as_integer().is_some() && high.as_integer().is_some();
    let (min, max) = if both_integers {
        let min = match (low_strict, low.as_integer()) {
            (true, Some(value)) => Number::Integer(value.saturating_add(1)),
            _ => low.normalized(),
        };
        let max = match (high_strict, high.as_integer()) {
            (true, Some(value)) => Number::Integer(value.saturating_sub(1)),
            _ => high.normalized(),
        };
        (min, max)
    } else {
        if low_strict || high_strict {
            input.diag.warn(
                codes::criterion::STRICT_FLOAT_BOUND,
                format!(
                    "Strict bounds treated as inclusive against non-integer limits in \"{}\"",
                    input.text
                ),
            );
        }
        (low, high)
    };

    if min.as_f64() > max.as_f64() {
        return Some(Err(CriterionError::ImpossibleRange {
            text: input.text.to_string(),
            min,
            max,
        }));
    }
    if min.as_f64() == max.as_f64() {
        // 1 <= x <= 1 is just an equality test.
        return criterion(Criterion::Equals {
            key,
            value: Scalar::from(min),
            inverse: false,
        });
    }
    criterion(Criterion::Range {
        key,
        value: (min, max),
        inverse: false,
    })
}

fn keyword_only(input: &MatchInput<'_>, keyword: &str) -> Option<ContextKey> {
    let (key, rest) = key_at(input.tokens)?;
    match rest {
        [Token::Identifier(word)] if word == keyword => Some(key),
        _ => None,
    }
}

fn membership(input: &MatchInput<'_>, keyword: &str, negated: bool) -> Option<MatchResult> {
    let (key, rest) = key_at(input.tokens)?;
    let value = match rest {
        [Token::Identifier(word), value] if word == keyword => value,
        _ => return None,
    };
    let value = match value {
        Token::Str(value) => Scalar::String(value.clone()),
        Token::Number(number) => match number.as_integer() {
            Some(value) => Scalar::Integer(value),
            None => {
                return Some(Err(CriterionError::InvalidIncludesValue {
                    text: input.text.to_string(),
                }))
            }
        },
        _ => {
            return Some(Err(CriterionError::InvalidIncludesValue {
                text: input.text.to_string(),
            }))
        }
    };
    criterion(Criterion::Includes {
        key,
        value,
        inverse: negated,
    })
}

fn dynamic_equals(input: &MatchInput<'_>, negated: bool) -> Option<MatchResult> {
    let (key, rest) = key_at(input.tokens)?;
    let op = if negated { &Token::Neq } else { &Token::Eq };
    let (found, other_tokens) = rest.split_first()?;
    if found != op {
        return None;
    }
    let other = qualified_key(other_tokens)?;
    let (other_table, other_field) = match other.table {
        Some(table) => (table, other.field),
        None => return None,
    };
    criterion(Criterion::EqualsDynamic {
        key,
        other_table,
        other_field,
        inverse: negated,
    })
}

fn dynamic_comparison(
    input: &MatchInput<'_>,
    op: Token,
    kind: BoundKind,
    exclusive: bool,
) -> Option<MatchResult> {
    let (key, rest) = key_at(input.tokens)?;
    let (found, other_tokens) = rest.split_first()?;
    if *found != op {
        return None;
    }
    let other = qualified_key(other_tokens)?;
    let (other_table, other_field) = match other.table {
        Some(table) => (table, other.field),
        None => return None,
    };
    let record = match kind {
        BoundKind::Min => Criterion::MinDynamic {
            key,
            other_table,
            other_field,
            exclusive,
            inverse: false,
        },
        BoundKind::Max => Criterion::MaxDynamic {
            key,
            other_table,
            other_field,
            exclusive,
            inverse: false,
        },
    };
    criterion(record)
}

// ======================================================================
// Matchers, in table order
// ======================================================================

fn m_equals_string(input: &MatchInput<'_>) -> Option<MatchResult> {
    literal_equals(input, false, ValueShape::Str)
}

fn m_equals_number(input: &MatchInput<'_>) -> Option<MatchResult> {
    literal_equals(input, false, ValueShape::Num)
}

fn m_equals_boolean(input: &MatchInput<'_>) -> Option<MatchResult> {
    literal_equals(input, false, ValueShape::Bool)
}

fn m_not_equals_string(input: &MatchInput<'_>) -> Option<MatchResult> {
    literal_equals(input, true, ValueShape::Str)
}

fn m_not_equals_number(input: &MatchInput<'_>) -> Option<MatchResult> {
    literal_equals(input, true, ValueShape::Num)
}

fn m_not_equals_boolean(input: &MatchInput<'_>) -> Option<MatchResult> {
    literal_equals(input, true, ValueShape::Bool)
}

fn m_greater_than(input: &MatchInput<'_>) -> Option<MatchResult> {
    comparison(input, Token::Gt, BoundKind::Min, true)
}

fn m_greater_equal(input: &MatchInput<'_>) -> Option<MatchResult> {
    comparison(input, Token::Ge, BoundKind::Min, false)
}

fn m_less_than(input: &MatchInput<'_>) -> Option<MatchResult> {
    comparison(input, Token::Lt, BoundKind::Max, true)
}

fn m_less_equal(input: &MatchInput<'_>) -> Option<MatchResult> {
    comparison(input, Token::Le, BoundKind::Max, false)
}

fn m_lt_lt(input: &MatchInput<'_>) -> Option<MatchResult> {
    range(input, true, true)
}

fn m_lt_le(input: &MatchInput<'_>) -> Option<MatchResult> {
    range(input, true, false)
}

fn m_le_lt(input: &MatchInput<'_>) -> Option<MatchResult> {
    range(input, false, true)
}

fn m_le_le(input: &MatchInput<'_>) -> Option<MatchResult> {
    range(input, false, false)
}

fn m_exists(input: &MatchInput<'_>) -> Option<MatchResult> {
    let key = keyword_only(input, "exists")?;
    criterion(Criterion::Exists {
        key,
        inverse: false,
    })
}

fn m_empty(input: &MatchInput<'_>) -> Option<MatchResult> {
    let key = keyword_only(input, "empty")?;
    criterion(Criterion::Empty {
        key,
        inverse: false,
    })
}

fn m_nonempty(input: &MatchInput<'_>) -> Option<MatchResult> {
    let key = keyword_only(input, "nonempty")?;
    criterion(Criterion::Empty { key, inverse: true })
}

fn m_dummy(input: &MatchInput<'_>) -> Option<MatchResult> {
    let number = match input.tokens {
        [Token::Identifier(word), Token::Number(number)] if word == "dummy" => *number,
        _ => return None,
    };
    let value = match number.as_integer() {
        Some(value) => value,
        None => {
            return Some(Err(CriterionError::DummyNotInteger {
                text: input.text.to_string(),
            }))
        }
    };
    if value == 0 {
        return Some(Err(CriterionError::DummyZero));
    }
    criterion(Criterion::Dummy { value })
}

fn m_fail(input: &MatchInput<'_>) -> Option<MatchResult> {
    let number = match input.tokens {
        [Token::Identifier(word), Token::Number(number)] if word == "fail" => *number,
        _ => return None,
    };
    let value = number.as_f64();
    if value >= 1.0 {
        return Some(Err(CriterionError::FailAlwaysFails { value }));
    }
    if value <= 0.0 {
        return Some(Err(CriterionError::FailAlwaysSucceeds { value }));
    }
    criterion(Criterion::Fail { value })
}

fn m_includes(input: &MatchInput<'_>) -> Option<MatchResult> {
    membership(input, "includes", false)
}

fn m_excludes(input: &MatchInput<'_>) -> Option<MatchResult> {
    membership(input, "excludes", true)
}

fn m_dynamic_equals(input: &MatchInput<'_>) -> Option<MatchResult> {
    dynamic_equals(input, false)
}

fn m_dynamic_not_equals(input: &MatchInput<'_>) -> Option<MatchResult> {
    dynamic_equals(input, true)
}

fn m_dynamic_greater(input: &MatchInput<'_>) -> Option<MatchResult> {
    dynamic_comparison(input, Token::Gt, BoundKind::Min, true)
}

fn m_dynamic_greater_equal(input: &MatchInput<'_>) -> Option<MatchResult> {
    dynamic_comparison(input, Token::Ge, BoundKind::Min, false)
}

fn m_dynamic_less(input: &MatchInput<'_>) -> Option<MatchResult> {
    dynamic_comparison(input, Token::Lt, BoundKind::Max, true)
}

fn m_dynamic_less_equal(input: &MatchInput<'_>) -> Option<MatchResult> {
    dynamic_comparison(input, Token::Le, BoundKind::Max, false)
}

fn m_preset(input: &MatchInput<'_>) -> Option<MatchResult> {
    match input.tokens {
        [Token::Identifier(name)] => Some(Ok(ParsedCriterion::Preset(name.clone()))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemorySink;
    use assert_matches::assert_matches;

    fn parse(text: &str) -> (MatchResult, Vec<&'static str>) {
        let sink = MemorySink::new();
        let diag = Diagnostics::new(&sink, true);
        let result = parse_criterion(text, &diag);
        (result, sink.codes())
    }

    fn parse_ok(text: &str) -> Criterion {
        match parse(text).0.unwrap() {
            ParsedCriterion::Criterion(criterion) => criterion,
            ParsedCriterion::Preset(name) => panic!("unexpected preset {}", name),
        }
    }

    #[test]
    fn pattern_order_is_the_documented_precedence() {
        let names: Vec<&str> = CRITERION_PATTERNS.iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec![
                "equals_string",
                "equals_number",
                "equals_boolean",
                "not_equals_string",
                "not_equals_number",
                "not_equals_boolean",
                "greater_than",
                "greater_equal",
                "less_than",
                "less_equal",
                "lt_lt",
                "lt_le",
                "le_lt",
                "le_le",
                "exists",
                "empty",
                "nonempty",
                "dummy",
                "fail",
                "includes",
                "excludes",
                "dynamic_equals",
                "dynamic_not_equals",
                "dynamic_greater",
                "dynamic_greater_equal",
                "dynamic_less",
                "dynamic_less_equal",
                "preset",
            ]
        );
    }

    #[test]
    fn strict_integer_bounds_normalize_inclusively() {
        assert_eq!(
            parse_ok("x > 3"),
            Criterion::Min {
                key: ContextKey::unqualified("x"),
                value: Number::Integer(4),
                inverse: false,
            }
        );
        assert_eq!(
            parse_ok("x >= 3"),
            Criterion::Min {
                key: ContextKey::unqualified("x"),
                value: Number::Integer(3),
                inverse: false,
            }
        );
        assert_eq!(
            parse_ok("x < 3"),
            Criterion::Max {
                key: ContextKey::unqualified("x"),
                value: Number::Integer(2),
                inverse: false,
            }
        );
        // A float with zero fraction counts as an integer.
        assert_eq!(
            parse_ok("x > 3.0"),
            Criterion::Min {
                key: ContextKey::unqualified("x"),
                value: Number::Integer(4),
                inverse: false,
            }
        );
    }

    #[test]
    fn strict_float_bounds_degrade_with_one_warning() {
        let (result, warnings) = parse("x > 2.5");
        assert_eq!(
            result.unwrap(),
            ParsedCriterion::Criterion(Criterion::Min {
                key: ContextKey::unqualified("x"),
                value: Number::Float(2.5),
                inverse: false,
            })
        );
        assert_eq!(warnings, vec!["W020"]);
    }

    #[test]
    fn degenerate_range_collapses_to_equals() {
        let (result, warnings) = parse("1 <= x <= 1");
        assert_eq!(
            result.unwrap(),
            ParsedCriterion::Criterion(Criterion::Equals {
                key: ContextKey::unqualified("x"),
                value: Scalar::Integer(1),
                inverse: false,
            })
        );
        assert!(warnings.is_empty());
        // 0 < x < 2 also pins x to exactly 1 after normalization.
        assert_eq!(
            parse_ok("0 < x < 2"),
            Criterion::Equals {
                key: ContextKey::unqualified("x"),
                value: Scalar::Integer(1),
                inverse: false,
            }
        );
    }

    #[test]
    fn impossible_range_is_a_hard_error() {
        let (result, _) = parse("3 < x < 2");
        assert_matches!(result, Err(CriterionError::ImpossibleRange { .. }));
    }

    #[test]
    fn ranges_normalize_per_boundary() {
        assert_eq!(
            parse_ok("1 < x <= 5"),
            Criterion::Range {
                key: ContextKey::unqualified("x"),
                value: (Number::Integer(2), Number::Integer(5)),
                inverse: false,
            }
        );
        // A non-integer limit disables the +-1 trick for the whole range:
        // both strict bounds degrade to inclusive, with one warning.
        let (result, warnings) = parse("1.5 < points.score < 9");
        assert_eq!(
            result.unwrap(),
            ParsedCriterion::Criterion(Criterion::Range {
                key: ContextKey::qualified("points", "score"),
                value: (Number::Float(1.5), Number::Integer(9)),
                inverse: false,
            })
        );
        assert_eq!(warnings, vec!["W020"]);
    }

    #[test]
    fn double_inversion_round_trips_with_one_warning() {
        let (result, warnings) = parse("!x != 5");
        assert_eq!(
            result.unwrap(),
            ParsedCriterion::Criterion(Criterion::Equals {
                key: ContextKey::unqualified("x"),
                value: Scalar::Integer(5),
                inverse: false,
            })
        );
        assert_eq!(warnings, vec!["W021"]);
    }

    #[test]
    fn single_inversions_set_the_flag() {
        assert_eq!(
            parse_ok("x != 5"),
            Criterion::Equals {
                key: ContextKey::unqualified("x"),
                value: Scalar::Integer(5),
                inverse: true,
            }
        );
        assert_eq!(
            parse_ok("!x exists"),
            Criterion::Exists {
                key: ContextKey::unqualified("x"),
                inverse: true,
            }
        );
    }

    #[test]
    fn pseudo_criteria_validate_their_values() {
        assert_matches!(parse("dummy 0").0, Err(CriterionError::DummyZero));
        assert_matches!(
            parse("dummy 2.5").0,
            Err(CriterionError::DummyNotInteger { .. })
        );
        assert_matches!(
            parse("fail 1").0,
            Err(CriterionError::FailAlwaysFails { .. })
        );
        assert_matches!(
            parse("fail 0").0,
            Err(CriterionError::FailAlwaysSucceeds { .. })
        );
        assert_eq!(parse_ok("fail 0.3"), Criterion::Fail { value: 0.3 });
        assert_eq!(parse_ok("dummy 5"), Criterion::Dummy { value: 5 });
    }

    #[test]
    fn pseudo_criteria_and_presets_reject_inversion() {
        assert_matches!(
            parse("!dummy 5").0,
            Err(CriterionError::CannotInvert { kind: "dummy" })
        );
        assert_matches!(
            parse("!fail 0.5").0,
            Err(CriterionError::CannotInvert { kind: "fail" })
        );
        assert_matches!(
            parse("!friendly_vendor").0,
            Err(CriterionError::CannotInvertPreset { .. })
        );
    }

    #[test]
    fn membership_checks_value_types() {
        assert_eq!(
            parse_ok("tags includes \"hero\""),
            Criterion::Includes {
                key: ContextKey::unqualified("tags"),
                value: Scalar::String("hero".into()),
                inverse: false,
            }
        );
        assert_eq!(
            parse_ok("scores excludes 7"),
            Criterion::Includes {
                key: ContextKey::unqualified("scores"),
                value: Scalar::Integer(7),
                inverse: true,
            }
        );
        assert_matches!(
            parse("tags includes true").0,
            Err(CriterionError::InvalidIncludesValue { .. })
        );
        assert_matches!(
            parse("tags includes 0.5").0,
            Err(CriterionError::InvalidIncludesValue { .. })
        );
    }

    #[test]
    fn dynamic_comparisons_carry_the_other_key() {
        assert_eq!(
            parse_ok("mood = listener.mood"),
            Criterion::EqualsDynamic {
                key: ContextKey::unqualified("mood"),
                other_table: "listener".into(),
                other_field: "mood".into(),
                inverse: false,
            }
        );
        assert_eq!(
            parse_ok("speaker.gold != listener.gold"),
            Criterion::EqualsDynamic {
                key: ContextKey::qualified("speaker", "gold"),
                other_table: "listener".into(),
                other_field: "gold".into(),
                inverse: true,
            }
        );
        assert_eq!(
            parse_ok("gold > listener.gold"),
            Criterion::MinDynamic {
                key: ContextKey::unqualified("gold"),
                other_table: "listener".into(),
                other_field: "gold".into(),
                exclusive: true,
                inverse: false,
            }
        );
        assert_eq!(
            parse_ok("gold <= listener.gold"),
            Criterion::MaxDynamic {
                key: ContextKey::unqualified("gold"),
                other_table: "listener".into(),
                other_field: "gold".into(),
                exclusive: false,
                inverse: false,
            }
        );
    }

    #[test]
    fn equals_rejects_true_floats() {
        assert_matches!(parse("x = 2.5").0, Err(CriterionError::EqualsFloat { .. }));
        assert_eq!(
            parse_ok("x = 3.0"),
            Criterion::Equals {
                key: ContextKey::unqualified("x"),
                value: Scalar::Integer(3),
                inverse: false,
            }
        );
    }

    #[test]
    fn bare_identifiers_are_presets() {
        assert_eq!(
            parse("friendly_vendor").0.unwrap(),
            ParsedCriterion::Preset("friendly_vendor".into())
        );
    }

    #[test]
    fn garbage_is_malformed() {
        assert_matches!(parse("x = ").0, Err(CriterionError::Malformed { .. }));
        assert_matches!(parse("= 5").0, Err(CriterionError::Malformed { .. }));
        assert_matches!(parse("x ~ 5").0, Err(CriterionError::Lex { .. }));
        assert_matches!(parse("!").0, Err(CriterionError::Malformed { .. }));
        // Unqualified RHS is not a context key; nothing matches.
        assert_matches!(parse("x = y").0, Err(CriterionError::Malformed { .. }));
    }
}
