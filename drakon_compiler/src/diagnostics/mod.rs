//! Diagnostics for the DrakonScript compiler
//!
//! Warnings are advisory and never abort a compilation. They are routed
//! through an injected [`DiagnosticSink`] threaded explicitly through every
//! compiler entry point; there is no global logger state to swap.

pub mod codes;
pub mod events;
pub mod sink;

pub use codes::Code;
pub use events::Diagnostic;
pub use sink::{ConsoleSink, DiagnosticSink, MemorySink, NullSink};

/// Handle combining the injected sink with the warning-suppression flag.
///
/// Copyable so sub-parsers can carry it by value. Suppression only silences
/// the sink; compiled output is identical either way.
#[derive(Clone, Copy)]
pub struct Diagnostics<'a> {
    sink: &'a dyn DiagnosticSink,
    warnings_enabled: bool,
}

impl<'a> Diagnostics<'a> {
    pub fn new(sink: &'a dyn DiagnosticSink, warnings_enabled: bool) -> Self {
        Self {
            sink,
            warnings_enabled,
        }
    }

    pub fn warn(&self, code: Code, message: impl Into<String>) {
        if self.warnings_enabled {
            self.sink.report(&Diagnostic::warning(code, message));
        }
    }
}

impl std::fmt::Debug for Diagnostics<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagnostics")
            .field("warnings_enabled", &self.warnings_enabled)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suppressed_warnings_never_reach_the_sink() {
        let sink = MemorySink::new();
        let diag = Diagnostics::new(&sink, false);
        diag.warn(codes::criterion::REDUNDANT_INVERSION, "ignored");
        assert!(sink.is_empty());

        let diag = Diagnostics::new(&sink, true);
        diag.warn(codes::criterion::REDUNDANT_INVERSION, "kept");
        assert_eq!(sink.len(), 1);
    }
}
