//! Rule and rule-body compilation
//!
//! A rule statement is `rule [label] ( criteria ) { body }`. Criteria are
//! parsed through the criterion grammar with bare identifiers hoisted into
//! the preset list. Body statements dispatch to exactly one of: a lines
//! block or label reference, a rule-local list, a symbol declaration, or an
//! action; anything else is a hard error naming the statement.

use crate::compiler::error::{CompileError, CompileResult};
use crate::compiler::lines::{parse_lines_block, parse_string_list};
use crate::compiler::{head_word, take_identifier, Session};
use crate::document::{CompiledRule, RuleLines};
use crate::grammar::action::parse_action;
use crate::grammar::context::ContextKey;
use crate::grammar::criterion::{parse_criterion, ParsedCriterion};
use crate::grammar::lexer::{tokenize, Token};
use crate::splitter;
use crate::validation;
use std::collections::BTreeSet;

pub(crate) fn parse_rule(statement: &str, session: &mut Session<'_>) -> CompileResult<CompiledRule> {
    let malformed = || CompileError::MalformedRule {
        text: statement.to_string(),
    };

    let rest = statement.strip_prefix("rule").ok_or_else(malformed)?;
    if rest.chars().next().is_some_and(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
        return Err(malformed());
    }

    // Optional label between the keyword and the criteria clause.
    let rest = rest.trim_start();
    let (label, rest) = if rest.starts_with('(') {
        (None, rest)
    } else {
        let (label, rest) = take_identifier(rest).ok_or_else(malformed)?;
        (Some(label.to_string()), rest.trim_start())
    };

    let (criteria_text, rest) =
        splitter::extract_delimited(rest, '(', ')').ok_or_else(malformed)?;
    let (body, tail) = splitter::extract_delimited(rest, '{', '}').ok_or_else(malformed)?;
    if !tail.trim().is_empty() {
        return Err(CompileError::TrailingText {
            text: tail.trim().to_string(),
        });
    }

    let mut rule = CompiledRule::default();

    if let Some(label) = label {
        if session.preferences.validate_naming_conventions {
            validation::check_lower_snake("label", &label, &session.diag);
        }
        if !session.labels.insert(label.clone()) {
            return Err(CompileError::DuplicateLabel { name: label });
        }
        rule.label = Some(label);
    }

    // Criteria first: presets and criteria keep their relative order.
    for item in splitter::split_items(criteria_text, false) {
        match parse_criterion(&item, &session.diag)? {
            ParsedCriterion::Criterion(criterion) => rule.criteria.push(criterion),
            ParsedCriterion::Preset(name) => rule.presets.push(name),
        }
    }

    for statement in splitter::split_rule_body(body) {
        match head_word(&statement) {
            Some("lines") => parse_lines_statement(&statement, session, &mut rule)?,
            Some("list") => {
                let (name, items) = parse_list_declaration(&statement)?;
                if session.preferences.validate_naming_conventions {
                    validation::check_upper_snake("list", &name, &session.diag);
                }
                if rule.lists.contains_key(&name) {
                    return Err(CompileError::DuplicateList { name });
                }
                rule.lists.insert(name, items);
            }
            Some("predefined") => {
                let name = parse_predefined_symbol(&statement)?;
                if session.preferences.validate_naming_conventions {
                    validation::check_upper_snake("symbol", &name, &session.diag);
                }
                if rule.symbols.contains_key(&name) || rule.predefined_symbols.contains(&name) {
                    return Err(CompileError::DuplicateSymbol { name });
                }
                rule.predefined_symbols.push(name);
            }
            Some("symbol") => {
                let (name, key) = parse_symbol_binding(&statement)?;
                if session.preferences.validate_naming_conventions {
                    validation::check_upper_snake("symbol", &name, &session.diag);
                }
                if rule.symbols.contains_key(&name) || rule.predefined_symbols.contains(&name) {
                    return Err(CompileError::DuplicateSymbol { name });
                }
                rule.symbols.insert(name, key);
            }
            _ => match parse_action(&statement, &session.diag)? {
                Some(action) => rule.actions.push(action),
                None => {
                    return Err(CompileError::UnknownStatement {
                        scope: "rule body",
                        text: statement,
                    })
                }
            },
        }
    }

    if session.preferences.validate_line_references {
        validate_line_references(&rule, session);
    }

    Ok(rule)
}

fn parse_lines_statement(
    statement: &str,
    session: &Session<'_>,
    rule: &mut CompiledRule,
) -> CompileResult<()> {
    if rule.lines.is_some() {
        return Err(CompileError::LinesAlreadyDefined {
            text: statement.to_string(),
        });
    }

    let malformed = || CompileError::MalformedLines {
        text: statement.to_string(),
    };

    let rest = statement
        .strip_prefix("lines")
        .ok_or_else(malformed)?
        .trim_start();
    let rest = rest.strip_prefix('=').ok_or_else(malformed)?.trim_start();

    if rest.starts_with('[') {
        let (inner, tail) = splitter::extract_delimited(rest, '[', ']').ok_or_else(malformed)?;
        if !tail.trim().is_empty() {
            return Err(malformed());
        }
        let entries = parse_lines_block(inner)?;
        if entries.is_empty() {
            return Err(CompileError::EmptyLines);
        }
        rule.lines = Some(RuleLines::Entries(entries));
        return Ok(());
    }

    // A quoted value references another rule's lines by label.
    match tokenize(rest) {
        Ok(tokens) => match tokens.as_slice() {
            [Token::Str(label)] => {
                if !session.labels.contains(label.as_str()) {
                    return Err(CompileError::UnknownLinesLabel {
                        name: label.clone(),
                    });
                }
                rule.lines = Some(RuleLines::LabelRef(label.clone()));
                Ok(())
            }
            _ => Err(malformed()),
        },
        Err(_) => Err(malformed()),
    }
}

fn validate_line_references(rule: &CompiledRule, session: &Session<'_>) {
    let entries = match &rule.lines {
        Some(RuleLines::Entries(entries)) => entries,
        _ => return,
    };

    let mut scope: BTreeSet<String> = session.bank_scope.clone();
    scope.extend(rule.lists.keys().cloned());
    scope.extend(rule.symbols.keys().cloned());
    scope.extend(rule.predefined_symbols.iter().cloned());

    for entry in entries {
        for phrasing in entry.phrasings() {
            validation::check_line_references(phrasing, &scope, &session.diag);
        }
    }
}

/// `list NAME = [ ... ]`, shared between rule bodies and speechbank bodies.
pub(crate) fn parse_list_declaration(statement: &str) -> CompileResult<(String, Vec<String>)> {
    let malformed = || CompileError::MalformedList {
        text: statement.to_string(),
    };

    let rest = statement.strip_prefix("list").ok_or_else(malformed)?;
    let (name, rest) = take_identifier(rest.trim_start()).ok_or_else(malformed)?;
    let rest = rest.trim_start().strip_prefix('=').ok_or_else(malformed)?;
    let (inner, tail) =
        splitter::extract_delimited(rest.trim_start(), '[', ']').ok_or_else(malformed)?;
    if !tail.trim().is_empty() {
        return Err(malformed());
    }
    Ok((name.to_string(), parse_string_list(inner)?))
}

/// `predefined symbol NAME`
pub(crate) fn parse_predefined_symbol(statement: &str) -> CompileResult<String> {
    let words: Vec<&str> = statement.split_whitespace().collect();
    match words.as_slice() {
        ["predefined", "symbol", name] if validation::is_valid_identifier(name) => {
            Ok(name.to_string())
        }
        _ => Err(CompileError::MalformedSymbol {
            text: statement.to_string(),
        }),
    }
}

/// `symbol NAME = "table.field"` (the table may be omitted in rule bodies)
pub(crate) fn parse_symbol_binding(statement: &str) -> CompileResult<(String, ContextKey)> {
    let malformed = || CompileError::MalformedSymbol {
        text: statement.to_string(),
    };

    let tokens = tokenize(statement).map_err(|_| malformed())?;
    match tokens.as_slice() {
        [Token::Identifier(keyword), Token::Identifier(name), Token::Eq, Token::Str(binding)]
            if keyword == "symbol" =>
        {
            let key = ContextKey::parse(binding).ok_or_else(malformed)?;
            Ok((name.clone(), key))
        }
        _ => Err(malformed()),
    }
}
