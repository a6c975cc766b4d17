//! Diagnostic event records

use super::codes::Code;
use std::time::SystemTime;

/// A single advisory diagnostic produced during compilation.
///
/// The sink only ever receives non-fatal warnings; hard errors travel
/// through `Result` and never reach it.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub timestamp: SystemTime,
    pub code: Code,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(code: Code, message: impl Into<String>) -> Self {
        Self {
            timestamp: SystemTime::now(),
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "warning[{}]: {}", self.code, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::codes;

    #[test]
    fn display_is_cargo_style() {
        let diag = Diagnostic::warning(codes::criterion::REDUNDANT_INVERSION, "double inversion");
        assert_eq!(diag.to_string(), "warning[W021]: double inversion");
    }
}
