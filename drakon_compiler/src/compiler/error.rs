//! Top-level compile errors
//!
//! Aggregates the grammar-stage errors and adds the structural failures the
//! rule and speechbank compilers detect themselves. Any of these aborts the
//! compilation of the current document; no partial output is produced.

use crate::grammar::action::ActionError;
use crate::grammar::criterion::CriterionError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error("Empty document: expected a 'group' or 'preset' block")]
    EmptyDocument,

    #[error("Expected 'group NAME {{ ... }}', 'group NAME extends PARENT {{ ... }}' or 'preset {{ ... }}', found \"{text}\"")]
    MalformedHeader { text: String },

    #[error("Unexpected text after the closing brace: \"{text}\"")]
    TrailingText { text: String },

    #[error("Invalid identifier \"{name}\"")]
    InvalidIdentifier { name: String },

    #[error("Unknown statement in {scope}: \"{text}\"")]
    UnknownStatement { scope: &'static str, text: String },

    #[error("Duplicate category \"{name}\"")]
    DuplicateCategory { name: String },

    #[error("Duplicate list \"{name}\"")]
    DuplicateList { name: String },

    #[error("Duplicate symbol \"{name}\"")]
    DuplicateSymbol { name: String },

    #[error("Duplicate rule label \"{name}\"")]
    DuplicateLabel { name: String },

    #[error("Malformed rule statement \"{text}\"")]
    MalformedRule { text: String },

    #[error("Lines are already defined for this rule: \"{text}\"")]
    LinesAlreadyDefined { text: String },

    #[error("Lines block cannot be empty")]
    EmptyLines,

    #[error("Malformed lines statement \"{text}\"")]
    MalformedLines { text: String },

    #[error("Unknown lines label \"{name}\": no earlier rule declares it")]
    UnknownLinesLabel { name: String },

    #[error("Invalid line item \"{text}\": expected a quoted string or one nested group")]
    InvalidLineItem { text: String },

    #[error("Malformed list declaration \"{text}\": expected list NAME = [ ... ]")]
    MalformedList { text: String },

    #[error("Invalid list item \"{text}\": expected a quoted string")]
    InvalidListItem { text: String },

    #[error("Malformed symbol declaration \"{text}\"")]
    MalformedSymbol { text: String },

    #[error("Symbol \"{name}\" must be bound to a fully-qualified \"table.field\" key at speechbank level")]
    UnqualifiedSymbol { name: String },

    #[error(transparent)]
    Criterion(#[from] CriterionError),

    #[error(transparent)]
    Action(#[from] ActionError),
}

pub type CompileResult<T> = Result<T, CompileError>;
