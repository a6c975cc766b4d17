//! Speechbank and category compilation
//!
//! Exactly one top-level form per document: `group NAME { ... }`,
//! `group NAME extends PARENT { ... }`, or `preset { ... }`. The body is
//! split into top-level statements; lists, symbols and predefined symbols
//! are collected before categories are compiled so line references see the
//! whole speechbank scope regardless of declaration order. Category order
//! and rule order are preserved exactly as written.

use crate::compiler::error::{CompileError, CompileResult};
use crate::compiler::rule::{
    parse_list_declaration, parse_predefined_symbol, parse_rule, parse_symbol_binding,
};
use crate::compiler::{head_word, take_identifier, CompiledSpeechbank, Session};
use crate::config::constants::RESERVED_PRESET_NAME;
use crate::diagnostics::codes;
use crate::document::SpeechbankDocument;
use crate::splitter;
use crate::validation;

pub(crate) fn compile_source(
    session: &mut Session<'_>,
    source: &str,
) -> CompileResult<CompiledSpeechbank> {
    let stripped = splitter::strip_comments(source);
    let text = stripped.trim();
    if text.is_empty() {
        return Err(CompileError::EmptyDocument);
    }

    let (name, parent, rest) = parse_header(text, session)?;

    let (body, tail) =
        splitter::extract_delimited(rest, '{', '}').ok_or_else(|| CompileError::MalformedHeader {
            text: snippet(text),
        })?;
    if !tail.trim().is_empty() {
        return Err(CompileError::TrailingText {
            text: snippet(tail.trim()),
        });
    }

    let mut document = SpeechbankDocument {
        parent,
        ..Default::default()
    };

    let statements = splitter::split_statements(body);

    // Declarations first, so rules compiled below see the whole bank scope.
    for statement in &statements {
        match head_word(statement) {
            Some("list") => {
                let (name, items) = parse_list_declaration(statement)?;
                if session.preferences.validate_naming_conventions {
                    validation::check_upper_snake("list", &name, &session.diag);
                }
                if document.lists.contains_key(&name) {
                    return Err(CompileError::DuplicateList { name });
                }
                document.lists.insert(name, items);
            }
            Some("predefined") => {
                let name = parse_predefined_symbol(statement)?;
                if session.preferences.validate_naming_conventions {
                    validation::check_upper_snake("symbol", &name, &session.diag);
                }
                if document.symbols.contains_key(&name)
                    || document.predefined_symbols.contains(&name)
                {
                    return Err(CompileError::DuplicateSymbol { name });
                }
                document.predefined_symbols.push(name);
            }
            Some("symbol") => {
                let (name, key) = parse_symbol_binding(statement)?;
                // Speechbank-level symbols must name their table explicitly.
                if !key.is_qualified() {
                    return Err(CompileError::UnqualifiedSymbol { name });
                }
                if session.preferences.validate_naming_conventions {
                    validation::check_upper_snake("symbol", &name, &session.diag);
                }
                if document.symbols.contains_key(&name)
                    || document.predefined_symbols.contains(&name)
                {
                    return Err(CompileError::DuplicateSymbol { name });
                }
                document.symbols.insert(name, key);
            }
            _ => {}
        }
    }

    session.bank_scope = document
        .lists
        .keys()
        .chain(document.symbols.keys())
        .cloned()
        .chain(document.predefined_symbols.iter().cloned())
        .collect();

    for statement in &statements {
        match head_word(statement) {
            Some("category") => {
                let (name, rules) = compile_category(statement, session)?;
                if document.speechbank.contains_key(&name) {
                    return Err(CompileError::DuplicateCategory { name });
                }
                document.speechbank.insert(name, rules);
            }
            Some("list") | Some("symbol") | Some("predefined") => {}
            _ => {
                return Err(CompileError::UnknownStatement {
                    scope: "speechbank",
                    text: statement.clone(),
                })
            }
        }
    }

    Ok(CompiledSpeechbank { name, document })
}

fn parse_header<'t>(
    text: &'t str,
    session: &Session<'_>,
) -> CompileResult<(String, Option<String>, &'t str)> {
    let malformed = || CompileError::MalformedHeader {
        text: snippet(text),
    };

    let (keyword, rest) = take_identifier(text).ok_or_else(malformed)?;
    let (name, parent, rest) = match keyword {
        "preset" => (RESERVED_PRESET_NAME.to_string(), None, rest),
        "group" => {
            let (name, rest) = take_identifier(rest.trim_start()).ok_or_else(malformed)?;
            let rest = rest.trim_start();
            match take_identifier(rest) {
                Some(("extends", rest)) => {
                    let (parent, rest) =
                        take_identifier(rest.trim_start()).ok_or_else(malformed)?;
                    (name.to_string(), Some(parent.to_string()), rest)
                }
                Some(_) => return Err(malformed()),
                None => (name.to_string(), None, rest),
            }
        }
        _ => return Err(malformed()),
    };

    if keyword == "group" && name == RESERVED_PRESET_NAME {
        session.diag.warn(
            codes::speechbank::RESERVED_GROUP_NAME,
            format!("Group name \"{}\" is reserved for preset blocks", name),
        );
    }
    if let Some(parent) = &parent {
        if *parent == name {
            session.diag.warn(
                codes::speechbank::SELF_PARENT,
                format!("Group \"{}\" declares itself as its own parent", name),
            );
        } else if parent == RESERVED_PRESET_NAME {
            session.diag.warn(
                codes::speechbank::RESERVED_PARENT,
                format!(
                    "Group \"{}\" extends the reserved preset name; presets are not inherited this way",
                    name
                ),
            );
        }
        if session.preferences.validate_naming_conventions {
            validation::check_lower_snake("group", parent, &session.diag);
        }
    }
    if session.preferences.validate_naming_conventions && name != RESERVED_PRESET_NAME {
        validation::check_lower_snake("group", &name, &session.diag);
    }

    Ok((name, parent, rest))
}

fn compile_category(
    statement: &str,
    session: &mut Session<'_>,
) -> CompileResult<(String, Vec<crate::document::CompiledRule>)> {
    let malformed = || CompileError::UnknownStatement {
        scope: "speechbank",
        text: statement.to_string(),
    };

    let rest = statement.strip_prefix("category").ok_or_else(malformed)?;
    let (name, rest) = take_identifier(rest.trim_start()).ok_or_else(malformed)?;
    if session.preferences.validate_naming_conventions {
        validation::check_lower_snake("category", name, &session.diag);
    }

    let (body, tail) =
        splitter::extract_delimited(rest.trim_start(), '{', '}').ok_or_else(malformed)?;
    if !tail.trim().is_empty() {
        return Err(CompileError::TrailingText {
            text: tail.trim().to_string(),
        });
    }

    let mut rules = Vec::new();
    for rule_statement in splitter::split_statements(body) {
        match head_word(&rule_statement) {
            Some("rule") => rules.push(parse_rule(&rule_statement, session)?),
            _ => {
                return Err(CompileError::UnknownStatement {
                    scope: "category",
                    text: rule_statement,
                })
            }
        }
    }

    Ok((name.to_string(), rules))
}

fn snippet(text: &str) -> String {
    text.lines().next().unwrap_or("").trim().to_string()
}
