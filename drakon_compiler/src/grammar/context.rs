//! Context keys
//!
//! A context key addresses one piece of external state as `table.field`, or
//! as a bare `field` when the table is left to the evaluation engine.

use crate::validation::is_valid_identifier;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextKey {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    pub field: String,
}

impl ContextKey {
    pub fn qualified(table: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            field: field.into(),
        }
    }

    pub fn unqualified(field: impl Into<String>) -> Self {
        Self {
            table: None,
            field: field.into(),
        }
    }

    pub fn is_qualified(&self) -> bool {
        self.table.is_some()
    }

    /// Parse `table.field` or `field` from text, as written in symbol
    /// bindings. Both parts must be valid identifiers.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        match text.split_once('.') {
            Some((table, field)) => {
                if is_valid_identifier(table) && is_valid_identifier(field) {
                    Some(Self::qualified(table, field))
                } else {
                    None
                }
            }
            None => {
                if is_valid_identifier(text) {
                    Some(Self::unqualified(text))
                } else {
                    None
                }
            }
        }
    }
}

impl std::fmt::Display for ContextKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{}.{}", table, self.field),
            None => write!(f, "{}", self.field),
        }
    }
}
