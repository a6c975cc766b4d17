//! Lines and list-body parsing
//!
//! A `lines = [ ... ]` block holds quoted strings and, one level deep,
//! bracketed groups of quoted strings. A `/` inside a phrasing splits it
//! into alternates, and a bracketed group is itself an ordered alternate
//! set, so both surface forms land in the same record.

use crate::compiler::error::{CompileError, CompileResult};
use crate::document::LineEntry;
use crate::grammar::lexer::{tokenize, Token};
use crate::splitter;

/// Parse the inner text of a `lines = [ ... ]` block.
pub fn parse_lines_block(inner: &str) -> CompileResult<Vec<LineEntry>> {
    let mut entries = Vec::new();
    for item in splitter::split_items(inner, true) {
        entries.push(parse_line_item(&item)?);
    }
    Ok(entries)
}

fn parse_line_item(item: &str) -> CompileResult<LineEntry> {
    if item.starts_with('[') {
        let (nested, rest) =
            splitter::extract_delimited(item, '[', ']').ok_or_else(|| invalid(item))?;
        if !rest.trim().is_empty() {
            return Err(invalid(item));
        }
        let mut alternates = Vec::new();
        for part in splitter::split_items(nested, false) {
            // Only one level of grouping: a bracket in here is malformed.
            alternates.extend(expand_alternates(&parse_quoted(&part)?));
        }
        if alternates.is_empty() {
            return Err(invalid(item));
        }
        return Ok(collapse(alternates));
    }

    Ok(collapse(expand_alternates(&parse_quoted(item)?)))
}

fn collapse(mut alternates: Vec<String>) -> LineEntry {
    if alternates.len() == 1 {
        LineEntry::Single(alternates.remove(0))
    } else {
        LineEntry::Alternates(alternates)
    }
}

/// Split `a/b/c` phrasing alternates. A line without `/` stays whole.
fn expand_alternates(line: &str) -> Vec<String> {
    if !line.contains('/') {
        return vec![line.to_string()];
    }
    line.split('/')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// A line item must be exactly one quoted string.
fn parse_quoted(item: &str) -> CompileResult<String> {
    match tokenize(item) {
        Ok(tokens) => match tokens.as_slice() {
            [Token::Str(text)] => Ok(text.clone()),
            _ => Err(invalid(item)),
        },
        Err(_) => Err(invalid(item)),
    }
}

fn invalid(item: &str) -> CompileError {
    CompileError::InvalidLineItem {
        text: item.to_string(),
    }
}

/// Parse the inner text of a `list NAME = [ ... ]` body: quoted strings only.
pub fn parse_string_list(inner: &str) -> CompileResult<Vec<String>> {
    let mut items = Vec::new();
    for item in splitter::split_items(inner, false) {
        match tokenize(&item) {
            Ok(tokens) => match tokens.as_slice() {
                [Token::Str(text)] => items.push(text.clone()),
                _ => {
                    return Err(CompileError::InvalidListItem {
                        text: item.to_string(),
                    })
                }
            },
            Err(_) => {
                return Err(CompileError::InvalidListItem {
                    text: item.to_string(),
                })
            }
        }
    }
    Ok(items)
}
