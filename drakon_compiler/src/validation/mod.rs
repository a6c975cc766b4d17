//! Naming-convention and symbol-reference validation
//!
//! Everything here is advisory: mismatches are warnings routed through the
//! diagnostic sink, never hard errors. Conventions follow the written
//! corpus: groups, categories and labels in lower_snake_case; list and
//! symbol names in UPPER_SNAKE_CASE.

use crate::diagnostics::{codes, Diagnostics};
use std::collections::BTreeSet;

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_valid_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

fn is_lower_snake(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_')
}

fn is_upper_snake(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit() || ch == '_')
}

/// Groups, categories and rule labels read as lower_snake_case.
pub fn check_lower_snake(kind: &str, name: &str, diag: &Diagnostics<'_>) {
    if !is_lower_snake(name) {
        diag.warn(
            codes::validation::NAMING_CONVENTION,
            format!("{} name \"{}\" should be lower_snake_case", kind, name),
        );
    }
}

/// Lists and symbols read as UPPER_SNAKE_CASE.
pub fn check_upper_snake(kind: &str, name: &str, diag: &Diagnostics<'_>) {
    if !is_upper_snake(name) {
        diag.warn(
            codes::validation::NAMING_CONVENTION,
            format!("{} name \"{}\" should be UPPER_SNAKE_CASE", kind, name),
        );
    }
}

/// Validate `@NAME` references inside one speech line.
///
/// References are resolved at generation time, not compile time, so an
/// unknown name is only a warning; the name may be inherited from a parent
/// speechbank. `@name(...)` generator calls are skipped entirely.
pub fn check_line_references(line: &str, scope: &BTreeSet<String>, diag: &Diagnostics<'_>) {
    let bytes = line.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] != b'@' {
            idx += 1;
            continue;
        }
        let start = idx + 1;
        let mut end = start;
        while end < bytes.len()
            && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_')
        {
            end += 1;
        }
        if end == start {
            diag.warn(
                codes::validation::MALFORMED_SYMBOL_REFERENCE,
                format!("Dangling '@' in line \"{}\"", line),
            );
            idx = start;
            continue;
        }
        let name = &line[start..end];
        let is_call = bytes.get(end) == Some(&b'(');
        if !is_call && !scope.contains(name) {
            diag.warn(
                codes::validation::UNKNOWN_SYMBOL_REFERENCE,
                format!(
                    "Line references unknown symbol \"@{}\" in \"{}\"",
                    name, line
                ),
            );
        }
        idx = end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemorySink;

    fn scope(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn identifier_shapes() {
        assert!(is_valid_identifier("fruit_vendor"));
        assert!(is_valid_identifier("_x9"));
        assert!(!is_valid_identifier("9x"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("a-b"));
    }

    #[test]
    fn naming_conventions_warn_once_per_mismatch() {
        let sink = MemorySink::new();
        let diag = Diagnostics::new(&sink, true);
        check_lower_snake("group", "fruit_vendor", &diag);
        check_upper_snake("list", "FRUIT", &diag);
        assert!(sink.is_empty());

        check_lower_snake("category", "Greeting", &diag);
        check_upper_snake("symbol", "name", &diag);
        assert_eq!(sink.codes(), vec!["W060", "W060"]);
    }

    #[test]
    fn known_references_are_silent() {
        let sink = MemorySink::new();
        let diag = Diagnostics::new(&sink, true);
        check_line_references(
            "Hello, @NAME! Care for some @FRUIT?",
            &scope(&["NAME", "FRUIT"]),
            &diag,
        );
        assert!(sink.is_empty());
    }

    #[test]
    fn unknown_and_dangling_references_warn() {
        let sink = MemorySink::new();
        let diag = Diagnostics::new(&sink, true);
        check_line_references("Howdy, @STRANGER! @", &scope(&["NAME"]), &diag);
        assert_eq!(sink.codes(), vec!["W061", "W062"]);
    }

    #[test]
    fn generator_calls_are_skipped() {
        let sink = MemorySink::new();
        let diag = Diagnostics::new(&sink, true);
        check_line_references(
            "@capitalize(@FRUIT) are in season",
            &scope(&["FRUIT"]),
            &diag,
        );
        assert!(sink.is_empty());
    }
}
