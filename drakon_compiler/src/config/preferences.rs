// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;

/// Runtime-configurable compiler preferences.
///
/// None of these flags alter the compiled document; they only control which
/// advisory diagnostics are produced along the way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerPreferences {
    /// Whether non-fatal warnings are routed to the diagnostic sink at all
    pub emit_warnings: bool,

    /// Whether to check naming conventions (lower_snake_case groups,
    /// categories and labels; UPPER_SNAKE_CASE lists and symbols)
    pub validate_naming_conventions: bool,

    /// Whether to check `@NAME` references in speech lines against the
    /// lists and symbols visible to the rule
    pub validate_line_references: bool,
}

impl Default for CompilerPreferences {
    fn default() -> Self {
        Self {
            emit_warnings: env::var("DRAKON_EMIT_WARNINGS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            validate_naming_conventions: env::var("DRAKON_VALIDATE_NAMING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            validate_line_references: env::var("DRAKON_VALIDATE_LINE_REFERENCES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

impl CompilerPreferences {
    /// Preferences with every advisory check switched off.
    pub fn silent() -> Self {
        Self {
            emit_warnings: false,
            validate_naming_conventions: false,
            validate_line_references: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_disables_everything() {
        let prefs = CompilerPreferences::silent();
        assert!(!prefs.emit_warnings);
        assert!(!prefs.validate_naming_conventions);
        assert!(!prefs.validate_line_references);
    }
}
