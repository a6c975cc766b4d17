//! Bracket-aware statement splitting and text preprocessing
//!
//! Every compiler stage works on statement strings carved out of a larger
//! block of text. A delimiter inside an unclosed `{...}` or `[...]` pair, or
//! inside a double-quoted string, must not split the statement. Unterminated
//! brackets and strings at end of input are accepted permissively; the
//! structural parsers downstream reject statements that make no sense.

/// Controls which delimiters split and which constructs are opaque.
#[derive(Debug, Clone, Copy)]
pub struct SplitOptions {
    /// Split on commas in addition to newlines
    pub split_on_comma: bool,
    /// Treat `{...}` as opaque
    pub escape_braces: bool,
    /// Treat `[...]` as opaque
    pub escape_brackets: bool,
    /// Treat double-quoted strings (with backslash escapes) as opaque
    pub escape_strings: bool,
}

impl SplitOptions {
    /// Top-level statement splitting: category, list and symbol declarations.
    /// Both bracket pairs are opaque so whole blocks stay glued.
    pub fn top_level() -> Self {
        Self {
            split_on_comma: false,
            escape_braces: true,
            escape_brackets: true,
            escape_strings: false,
        }
    }

    /// Rule-body statement splitting. Curly braces cannot recur inside a
    /// rule body, so only `[...]` is opaque.
    pub fn rule_body() -> Self {
        Self {
            split_on_comma: false,
            escape_braces: false,
            escape_brackets: true,
            escape_strings: false,
        }
    }

    /// Comma/newline item splitting for criteria clauses and list bodies.
    /// Quoted strings are opaque; `nested` additionally protects one level
    /// of `[...]` groups for inline nested lists.
    pub fn items(nested: bool) -> Self {
        Self {
            split_on_comma: true,
            escape_braces: false,
            escape_brackets: nested,
            escape_strings: true,
        }
    }
}

/// Split `text` into trimmed, non-empty statements under `options`.
pub fn split_with(text: &str, options: SplitOptions) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut brace_depth: usize = 0;
    let mut bracket_depth: usize = 0;
    let mut in_string = false;
    let mut escaped = false;

    for ch in text.chars() {
        if in_string {
            current.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' if options.escape_strings => {
                in_string = true;
                current.push(ch);
            }
            '{' if options.escape_braces => {
                brace_depth += 1;
                current.push(ch);
            }
            '}' if options.escape_braces => {
                brace_depth = brace_depth.saturating_sub(1);
                current.push(ch);
            }
            '[' if options.escape_brackets => {
                bracket_depth += 1;
                current.push(ch);
            }
            ']' if options.escape_brackets => {
                bracket_depth = bracket_depth.saturating_sub(1);
                current.push(ch);
            }
            '\n' | ',' if brace_depth == 0
                && bracket_depth == 0
                && (ch == '\n' || options.split_on_comma) =>
            {
                flush(&mut statements, &mut current);
            }
            _ => current.push(ch),
        }
    }

    flush(&mut statements, &mut current);
    statements
}

fn flush(statements: &mut Vec<String>, current: &mut String) {
    let statement = current.trim();
    if !statement.is_empty() {
        statements.push(statement.to_string());
    }
    current.clear();
}

/// Top-level statement splitting (speechbank and category bodies).
pub fn split_statements(text: &str) -> Vec<String> {
    split_with(text, SplitOptions::top_level())
}

/// Rule-body statement splitting.
pub fn split_rule_body(text: &str) -> Vec<String> {
    split_with(text, SplitOptions::rule_body())
}

/// Comma/newline item splitting (criteria clauses, list and lines bodies).
pub fn split_items(text: &str, nested: bool) -> Vec<String> {
    split_with(text, SplitOptions::items(nested))
}

/// Strip `// line` and `/* block */` comments from `source`.
///
/// Stripping is string-aware: comment markers inside double-quoted strings
/// are left alone. Newlines inside block comments are preserved so statement
/// boundaries survive the strip.
pub fn strip_comments(source: &str) -> String {
    #[derive(PartialEq)]
    enum State {
        Normal,
        InString,
        LineComment,
        BlockComment,
    }

    let mut out = String::with_capacity(source.len());
    let mut state = State::Normal;
    let mut escaped = false;
    let mut chars = source.chars().peekable();

    while let Some(ch) = chars.next() {
        match state {
            State::Normal => match ch {
                '"' => {
                    state = State::InString;
                    out.push(ch);
                }
                '/' => match chars.peek() {
                    Some('/') => {
                        chars.next();
                        state = State::LineComment;
                    }
                    Some('*') => {
                        chars.next();
                        state = State::BlockComment;
                    }
                    _ => out.push(ch),
                },
                _ => out.push(ch),
            },
            State::InString => {
                out.push(ch);
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == '"' {
                    state = State::Normal;
                }
            }
            State::LineComment => {
                if ch == '\n' {
                    out.push('\n');
                    state = State::Normal;
                }
            }
            State::BlockComment => {
                if ch == '\n' {
                    out.push('\n');
                } else if ch == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = State::Normal;
                }
            }
        }
    }

    out
}

/// Extract a matched `open`...`close` block from the start of `text`.
///
/// `text` must begin (after leading whitespace) with `open`. Returns the
/// inner text and the remainder after the matching `close`. Tracks nesting
/// of the same pair and skips double-quoted strings. An unterminated block
/// consumes the rest of the input.
pub fn extract_delimited(text: &str, open: char, close: char) -> Option<(&str, &str)> {
    let trimmed = text.trim_start();
    let mut indices = trimmed.char_indices();
    match indices.next() {
        Some((_, ch)) if ch == open => {}
        _ => return None,
    }

    let mut depth = 1usize;
    let mut in_string = false;
    let mut escaped = false;
    let inner_start = open.len_utf8();

    for (idx, ch) in indices {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        if ch == '"' {
            in_string = true;
        } else if ch == open {
            depth += 1;
        } else if ch == close {
            depth -= 1;
            if depth == 0 {
                let inner = &trimmed[inner_start..idx];
                let rest = &trimmed[idx + close.len_utf8()..];
                return Some((inner, rest));
            }
        }
    }

    // Unterminated: legacy tolerance, hand back everything after the opener.
    Some((&trimmed[inner_start..], ""))
}
