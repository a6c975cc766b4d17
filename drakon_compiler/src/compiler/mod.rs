//! Compiler entry points
//!
//! [`Compiler`] binds the injected diagnostic sink and preferences to the
//! pure compilation pipeline: source text in, `(name, document)` out. The
//! compiler performs no file or network I/O; path handling, directory
//! walking and minification belong to the caller.

pub mod error;
pub mod lines;
pub mod rule;
pub mod speechbank;

pub use error::{CompileError, CompileResult};

use crate::config::constants::RESERVED_PRESET_NAME;
use crate::config::preferences::CompilerPreferences;
use crate::diagnostics::{ConsoleSink, DiagnosticSink, Diagnostics};
use crate::document::SpeechbankDocument;
use crate::splitter;
use std::collections::BTreeSet;

/// The `(name, document)` pair produced by one successful compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSpeechbank {
    pub name: String,
    pub document: SpeechbankDocument,
}

impl CompiledSpeechbank {
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(&self.document)
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.document)
    }

    pub fn to_json_string_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.document)
    }
}

/// Per-compilation state threaded through the rule and speechbank parsers:
/// the diagnostics handle, the speechbank-wide label registry, and the
/// names visible to `@` references in lines.
pub(crate) struct Session<'a> {
    pub diag: Diagnostics<'a>,
    pub preferences: CompilerPreferences,
    pub labels: BTreeSet<String>,
    pub bank_scope: BTreeSet<String>,
}

static CONSOLE_SINK: ConsoleSink = ConsoleSink;

/// DrakonScript compiler with an injected diagnostic sink.
pub struct Compiler<'a> {
    sink: &'a dyn DiagnosticSink,
    preferences: CompilerPreferences,
}

impl Compiler<'static> {
    /// Compiler reporting warnings to stderr.
    pub fn new() -> Self {
        Self {
            sink: &CONSOLE_SINK,
            preferences: CompilerPreferences::default(),
        }
    }
}

impl Default for Compiler<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Compiler<'a> {
    pub fn with_sink(sink: &'a dyn DiagnosticSink) -> Self {
        Self {
            sink,
            preferences: CompilerPreferences::default(),
        }
    }

    pub fn with_preferences(mut self, preferences: CompilerPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Compile one DrakonScript document.
    pub fn compile(&self, source: &str) -> CompileResult<CompiledSpeechbank> {
        let mut session = Session {
            diag: Diagnostics::new(self.sink, self.preferences.emit_warnings),
            preferences: self.preferences.clone(),
            labels: BTreeSet::new(),
            bank_scope: BTreeSet::new(),
        };
        speechbank::compile_source(&mut session, source)
    }
}

/// Compile with the default console sink.
pub fn compile_speechbank(source: &str) -> CompileResult<CompiledSpeechbank> {
    Compiler::new().compile(source)
}

/// Extract the speechbank name from source without compiling, for callers
/// constructing output paths before (or instead of) a full compile.
pub fn peek_name(source: &str) -> Option<String> {
    let stripped = splitter::strip_comments(source);
    let text = stripped.trim_start();
    let (keyword, rest) = take_identifier(text)?;
    match keyword {
        "preset" => Some(RESERVED_PRESET_NAME.to_string()),
        "group" => take_identifier(rest.trim_start()).map(|(name, _)| name.to_string()),
        _ => None,
    }
}

/// Leading identifier of `text` and the remainder, if it starts with one.
pub(crate) fn take_identifier(text: &str) -> Option<(&str, &str)> {
    let end = text
        .char_indices()
        .find(|(idx, ch)| {
            if *idx == 0 {
                !(ch.is_ascii_alphabetic() || *ch == '_')
            } else {
                !(ch.is_ascii_alphanumeric() || *ch == '_')
            }
        })
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    if end == 0 {
        None
    } else {
        Some((&text[..end], &text[end..]))
    }
}

/// First word of a statement, used for statement dispatch.
pub(crate) fn head_word(text: &str) -> Option<&str> {
    take_identifier(text.trim_start()).map(|(word, _)| word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemorySink;
    use serde_json::json;

    fn compile_quiet(source: &str) -> CompileResult<CompiledSpeechbank> {
        let sink = MemorySink::new();
        Compiler::with_sink(&sink)
            .with_preferences(CompilerPreferences {
                emit_warnings: true,
                validate_naming_conventions: true,
                validate_line_references: true,
            })
            .compile(source)
    }

    #[test]
    fn minimal_document_round_trips() {
        let compiled =
            compile_quiet("group g { category c { rule () { lines = [\"hi\"] } } }").unwrap();
        assert_eq!(compiled.name, "g");
        assert_eq!(
            compiled.to_json().unwrap(),
            json!({ "speechbank": { "c": [ { "line": ["hi"] } ] } })
        );
    }

    #[test]
    fn child_groups_carry_their_parent() {
        let compiled = compile_quiet("group fruit_vendor extends townsfolk { }").unwrap();
        assert_eq!(compiled.name, "fruit_vendor");
        assert_eq!(
            compiled.to_json().unwrap(),
            json!({ "parent": "townsfolk" })
        );
    }

    #[test]
    fn a_realistic_speechbank_compiles() {
        let source = r#"
group fruit_vendor extends townsfolk {
  list FRUIT = [ "apples", "oranges", "mangoes" ]
  symbol NAME = "listener.name"

  category greeting {
    rule () {
      lines = [
        "Hello! Would you like to buy some @FRUIT?"
        "Hello there! I have @FRUIT for a lucky customer!"
      ]
    }
    rule (is_friend = true, dummy 2) {
      set listener.conversation += 1
      lines = [
        "Hello, @NAME! Would you like some @FRUIT today?"
      ]
    }
    rule (time = "morning", fail 0.5) {
      list TOPIC = [ "weather", "tv show", "news" ]
      lines = [
        "Good morning, @NAME!"
        [
          "Hey, @NAME!"
          "Did you see the @TOPIC last night?"
        ]
      ]
    }
  }

  category farewell {
    rule () {
      lines = [ "Goodbye!/See you soon!" ]
    }
  }
}
"#;
        let sink = MemorySink::new();
        let compiled = Compiler::with_sink(&sink).compile(source).unwrap();
        assert_eq!(compiled.name, "fruit_vendor");
        assert!(sink.is_empty());

        let document = compiled.to_json().unwrap();
        assert_eq!(document["parent"], json!("townsfolk"));
        assert_eq!(document["lists"]["FRUIT"][0], json!("apples"));
        assert_eq!(
            document["symbols"]["NAME"],
            json!({ "table": "listener", "field": "name" })
        );

        let greeting = &document["speechbank"]["greeting"];
        assert_eq!(greeting[0]["line"][0], json!("Hello! Would you like to buy some @FRUIT?"));
        assert_eq!(
            greeting[1]["rule"][0],
            json!({ "type": "equals", "field": "is_friend", "value": true })
        );
        assert_eq!(greeting[1]["rule"][1], json!({ "type": "dummy", "value": 2 }));
        assert_eq!(
            greeting[1]["actions"][0],
            json!({ "type": "add", "table": "listener", "field": "conversation", "value": 1 })
        );
        assert_eq!(greeting[2]["lists"]["TOPIC"][1], json!("tv show"));
        assert_eq!(
            greeting[2]["line"][1],
            json!(["Hey, @NAME!", "Did you see the @TOPIC last night?"])
        );

        let farewell = &document["speechbank"]["farewell"];
        assert_eq!(
            farewell[0]["line"][0],
            json!(["Goodbye!", "See you soon!"])
        );
    }

    #[test]
    fn comments_are_stripped_string_aware() {
        let compiled = compile_quiet(
            "group g { // vendor chatter\n\
             /* whole\n block */\n\
             category c { rule () { lines = [\"see http://example//x\"] } } }",
        )
        .unwrap();
        assert_eq!(
            compiled.to_json().unwrap()["speechbank"]["c"][0]["line"][0],
            json!("see http://example//x")
        );
    }

    #[test]
    fn warning_suppression_does_not_change_output() {
        let source = "group Loud extends Loud { category c { rule () { lines = [\"@GHOST\"] } } }";

        let noisy_sink = MemorySink::new();
        let noisy = Compiler::with_sink(&noisy_sink)
            .with_preferences(CompilerPreferences {
                emit_warnings: true,
                validate_naming_conventions: true,
                validate_line_references: true,
            })
            .compile(source)
            .unwrap();
        assert!(!noisy_sink.is_empty());

        let quiet_sink = MemorySink::new();
        let quiet = Compiler::with_sink(&quiet_sink)
            .with_preferences(CompilerPreferences::silent())
            .compile(source)
            .unwrap();
        assert!(quiet_sink.is_empty());

        assert_eq!(noisy.document, quiet.document);
    }

    #[test]
    fn peek_name_reads_the_header_only() {
        assert_eq!(
            peek_name("// banner\ngroup fruit_vendor extends townsfolk { garbage }"),
            Some("fruit_vendor".to_string())
        );
        assert_eq!(peek_name("preset { }"), Some("preset".to_string()));
        assert_eq!(peek_name("not a speechbank"), None);
        assert_eq!(peek_name(""), None);
    }

    #[test]
    fn compile_speechbank_uses_the_console_sink() {
        let compiled =
            compile_speechbank("group g { category c { rule () { lines = [\"hi\"] } } }").unwrap();
        assert_eq!(compiled.name, "g");
    }
}
