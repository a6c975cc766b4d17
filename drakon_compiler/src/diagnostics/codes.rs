//! Warning codes for advisory diagnostics
//!
//! Single source of truth for the stable code strings attached to every
//! non-fatal diagnostic. Hard errors do not carry codes; they abort the
//! compilation through `Result` instead.

/// Stable code wrapper for diagnostic identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Criterion grammar warnings
pub mod criterion {
    use super::Code;

    /// Strict `<`/`>` against a non-integer bound degrades to inclusive
    pub const STRICT_FLOAT_BOUND: Code = Code::new("W020");

    /// `!` applied to a criterion whose inverse flag is already set
    pub const REDUNDANT_INVERSION: Code = Code::new("W021");
}

/// Speechbank structure warnings
pub mod speechbank {
    use super::Code;

    /// A group declared with the reserved preset name
    pub const RESERVED_GROUP_NAME: Code = Code::new("W040");

    /// A group declared as its own parent
    pub const SELF_PARENT: Code = Code::new("W041");

    /// The reserved preset name used as a literal parent reference
    pub const RESERVED_PARENT: Code = Code::new("W042");
}

/// Naming and reference validation warnings
pub mod validation {
    use super::Code;

    pub const NAMING_CONVENTION: Code = Code::new("W060");
    pub const UNKNOWN_SYMBOL_REFERENCE: Code = Code::new("W061");
    pub const MALFORMED_SYMBOL_REFERENCE: Code = Code::new("W062");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let all = [
            criterion::STRICT_FLOAT_BOUND,
            criterion::REDUNDANT_INVERSION,
            speechbank::RESERVED_GROUP_NAME,
            speechbank::SELF_PARENT,
            speechbank::RESERVED_PARENT,
            validation::NAMING_CONVENTION,
            validation::UNKNOWN_SYMBOL_REFERENCE,
            validation::MALFORMED_SYMBOL_REFERENCE,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.as_str(), b.as_str());
            }
        }
    }
}
