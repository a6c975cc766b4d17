// Internal modules
pub mod compiler;
pub mod config;
pub mod diagnostics;
pub mod document;
pub mod grammar;
pub mod splitter;
pub mod validation;

// Re-export key types for library consumers
pub use compiler::{compile_speechbank, peek_name, CompiledSpeechbank, Compiler};
pub use compiler::{CompileError, CompileResult};
pub use config::CompilerPreferences;
pub use diagnostics::{ConsoleSink, Diagnostic, DiagnosticSink, MemorySink, NullSink};
pub use document::SpeechbankDocument;
