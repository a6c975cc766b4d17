//! Pluggable diagnostic sinks

use super::events::Diagnostic;
use std::sync::Mutex;

/// Receiver for advisory diagnostics.
///
/// Implementations must be cheap to call; the compiler invokes the sink
/// inline from the middle of parsing.
pub trait DiagnosticSink {
    fn report(&self, diagnostic: &Diagnostic);
}

/// Sink that prints cargo-style warnings to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl DiagnosticSink for ConsoleSink {
    fn report(&self, diagnostic: &Diagnostic) {
        eprintln!("{}", diagnostic);
    }
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _diagnostic: &Diagnostic) {}
}

/// Sink that records diagnostics in memory, primarily for tests and for
/// interactive callers that render warnings themselves.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain all recorded diagnostics.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.records.lock().expect("sink poisoned"))
    }

    /// Code strings of the recorded diagnostics, in order.
    pub fn codes(&self) -> Vec<&'static str> {
        self.records
            .lock()
            .expect("sink poisoned")
            .iter()
            .map(|d| d.code.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().expect("sink poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for MemorySink {
    fn report(&self, diagnostic: &Diagnostic) {
        self.records
            .lock()
            .expect("sink poisoned")
            .push(diagnostic.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::codes;

    #[test]
    fn memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.report(&Diagnostic::warning(
            codes::criterion::STRICT_FLOAT_BOUND,
            "first",
        ));
        sink.report(&Diagnostic::warning(
            codes::validation::NAMING_CONVENTION,
            "second",
        ));
        assert_eq!(sink.codes(), vec!["W020", "W060"]);
        assert_eq!(sink.take().len(), 2);
        assert!(sink.is_empty());
    }
}
