//! Compiled speechbank document records
//!
//! Immutable value records assembled once per compilation and serialized as
//! the output JSON. Keys are present only when non-empty; named collections
//! serialize from sorted maps so output is deterministic, while rule order
//! inside a category is preserved exactly as written.

use crate::grammar::context::ContextKey;
use crate::grammar::value::{Number, Scalar};
use serde::Serialize;
use std::collections::BTreeMap;

fn is_false(value: &bool) -> bool {
    !*value
}

/// One guard condition over a single context field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Criterion {
    Equals {
        #[serde(flatten)]
        key: ContextKey,
        value: Scalar,
        #[serde(skip_serializing_if = "is_false")]
        inverse: bool,
    },
    EqualsDynamic {
        #[serde(flatten)]
        key: ContextKey,
        other_table: String,
        other_field: String,
        #[serde(skip_serializing_if = "is_false")]
        inverse: bool,
    },
    Min {
        #[serde(flatten)]
        key: ContextKey,
        value: Number,
        #[serde(skip_serializing_if = "is_false")]
        inverse: bool,
    },
    Max {
        #[serde(flatten)]
        key: ContextKey,
        value: Number,
        #[serde(skip_serializing_if = "is_false")]
        inverse: bool,
    },
    MinDynamic {
        #[serde(flatten)]
        key: ContextKey,
        other_table: String,
        other_field: String,
        #[serde(skip_serializing_if = "is_false")]
        exclusive: bool,
        #[serde(skip_serializing_if = "is_false")]
        inverse: bool,
    },
    MaxDynamic {
        #[serde(flatten)]
        key: ContextKey,
        other_table: String,
        other_field: String,
        #[serde(skip_serializing_if = "is_false")]
        exclusive: bool,
        #[serde(skip_serializing_if = "is_false")]
        inverse: bool,
    },
    Range {
        #[serde(flatten)]
        key: ContextKey,
        value: (Number, Number),
        #[serde(skip_serializing_if = "is_false")]
        inverse: bool,
    },
    Exists {
        #[serde(flatten)]
        key: ContextKey,
        #[serde(skip_serializing_if = "is_false")]
        inverse: bool,
    },
    Empty {
        #[serde(flatten)]
        key: ContextKey,
        #[serde(skip_serializing_if = "is_false")]
        inverse: bool,
    },
    Includes {
        #[serde(flatten)]
        key: ContextKey,
        value: Scalar,
        #[serde(skip_serializing_if = "is_false")]
        inverse: bool,
    },
    Dummy {
        value: i64,
    },
    Fail {
        value: f64,
    },
}

impl Criterion {
    pub fn kind(&self) -> &'static str {
        match self {
            Criterion::Equals { .. } => "equals",
            Criterion::EqualsDynamic { .. } => "equals_dynamic",
            Criterion::Min { .. } => "min",
            Criterion::Max { .. } => "max",
            Criterion::MinDynamic { .. } => "min_dynamic",
            Criterion::MaxDynamic { .. } => "max_dynamic",
            Criterion::Range { .. } => "range",
            Criterion::Exists { .. } => "exists",
            Criterion::Empty { .. } => "empty",
            Criterion::Includes { .. } => "includes",
            Criterion::Dummy { .. } => "dummy",
            Criterion::Fail { .. } => "fail",
        }
    }

    /// The inverse flag, for every kind that supports inversion.
    /// `dummy` and `fail` are fixed-function and cannot be inverted.
    pub fn inverse_mut(&mut self) -> Option<&mut bool> {
        match self {
            Criterion::Equals { inverse, .. }
            | Criterion::EqualsDynamic { inverse, .. }
            | Criterion::Min { inverse, .. }
            | Criterion::Max { inverse, .. }
            | Criterion::MinDynamic { inverse, .. }
            | Criterion::MaxDynamic { inverse, .. }
            | Criterion::Range { inverse, .. }
            | Criterion::Exists { inverse, .. }
            | Criterion::Empty { inverse, .. }
            | Criterion::Includes { inverse, .. } => Some(inverse),
            Criterion::Dummy { .. } | Criterion::Fail { .. } => None,
        }
    }

    pub fn is_inverted(&self) -> bool {
        match self {
            Criterion::Equals { inverse, .. }
            | Criterion::EqualsDynamic { inverse, .. }
            | Criterion::Min { inverse, .. }
            | Criterion::Max { inverse, .. }
            | Criterion::MinDynamic { inverse, .. }
            | Criterion::MaxDynamic { inverse, .. }
            | Criterion::Range { inverse, .. }
            | Criterion::Exists { inverse, .. }
            | Criterion::Empty { inverse, .. }
            | Criterion::Includes { inverse, .. } => *inverse,
            Criterion::Dummy { .. } | Criterion::Fail { .. } => false,
        }
    }
}

/// One context mutation applied when a rule is selected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    SetStatic {
        #[serde(flatten)]
        key: ContextKey,
        value: Scalar,
    },
    SetDynamic {
        #[serde(flatten)]
        key: ContextKey,
        other_table: String,
        other_field: String,
    },
    SetList {
        #[serde(flatten)]
        key: ContextKey,
        value: Vec<Scalar>,
    },
    Add {
        #[serde(flatten)]
        key: ContextKey,
        value: Number,
    },
    Mult {
        #[serde(flatten)]
        key: ContextKey,
        value: Number,
    },
    Remove {
        #[serde(flatten)]
        key: ContextKey,
    },
    Invert {
        #[serde(flatten)]
        key: ContextKey,
    },
    Trigger {
        value: String,
    },
}

/// One speech line: a single phrasing, or alternates chosen at random.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LineEntry {
    Single(String),
    Alternates(Vec<String>),
}

impl LineEntry {
    /// All phrasings carried by this entry.
    pub fn phrasings(&self) -> impl Iterator<Item = &str> {
        match self {
            LineEntry::Single(line) => std::slice::from_ref(line).iter(),
            LineEntry::Alternates(lines) => lines.iter(),
        }
        .map(String::as_str)
    }
}

/// The `line` value of a rule: literal entries, or a label reference to
/// another rule's lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RuleLines {
    Entries(Vec<LineEntry>),
    LabelRef(String),
}

/// One compiled rule.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CompiledRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub presets: Vec<String>,
    #[serde(rename = "rule", skip_serializing_if = "Vec::is_empty")]
    pub criteria: Vec<Criterion>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub lists: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub symbols: BTreeMap<String, ContextKey>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub predefined_symbols: Vec<String>,
    #[serde(rename = "line", skip_serializing_if = "Option::is_none")]
    pub lines: Option<RuleLines>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
}

/// One compiled speechbank document, the unit written per source file.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SpeechbankDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub lists: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub symbols: BTreeMap<String, ContextKey>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub predefined_symbols: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub speechbank: BTreeMap<String, Vec<CompiledRule>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn criterion_records_match_the_wire_shape() {
        let min = Criterion::Min {
            key: ContextKey::qualified("listener", "conversation"),
            value: Number::Integer(4),
            inverse: false,
        };
        assert_eq!(
            serde_json::to_value(&min).unwrap(),
            json!({
                "type": "min",
                "table": "listener",
                "field": "conversation",
                "value": 4
            })
        );

        let inverted = Criterion::Exists {
            key: ContextKey::unqualified("conversation"),
            inverse: true,
        };
        assert_eq!(
            serde_json::to_value(&inverted).unwrap(),
            json!({ "type": "exists", "field": "conversation", "inverse": true })
        );

        let range = Criterion::Range {
            key: ContextKey::unqualified("x"),
            value: (Number::Integer(2), Number::Integer(4)),
            inverse: false,
        };
        assert_eq!(
            serde_json::to_value(&range).unwrap(),
            json!({ "type": "range", "field": "x", "value": [2, 4] })
        );

        let dynamic = Criterion::EqualsDynamic {
            key: ContextKey::qualified("speaker", "mood"),
            other_table: "listener".into(),
            other_field: "mood".into(),
            inverse: false,
        };
        assert_eq!(
            serde_json::to_value(&dynamic).unwrap(),
            json!({
                "type": "equals_dynamic",
                "table": "speaker",
                "field": "mood",
                "other_table": "listener",
                "other_field": "mood"
            })
        );
    }

    #[test]
    fn pseudo_criteria_have_no_key() {
        assert_eq!(
            serde_json::to_value(Criterion::Dummy { value: 5 }).unwrap(),
            json!({ "type": "dummy", "value": 5 })
        );
        assert_eq!(
            serde_json::to_value(Criterion::Fail { value: 0.3 }).unwrap(),
            json!({ "type": "fail", "value": 0.3 })
        );
    }

    #[test]
    fn action_records_match_the_wire_shape() {
        let action = Action::Mult {
            key: ContextKey::unqualified("x"),
            value: Number::Float(0.25),
        };
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({ "type": "mult", "field": "x", "value": 0.25 })
        );

        let trigger = Action::Trigger {
            value: "door_slam".into(),
        };
        assert_eq!(
            serde_json::to_value(&trigger).unwrap(),
            json!({ "type": "trigger", "value": "door_slam" })
        );
    }

    #[test]
    fn lines_serialize_untagged() {
        let lines = RuleLines::Entries(vec![
            LineEntry::Single("hi".into()),
            LineEntry::Alternates(vec!["a".into(), "b".into()]),
        ]);
        assert_eq!(
            serde_json::to_value(&lines).unwrap(),
            json!(["hi", ["a", "b"]])
        );
        assert_eq!(
            serde_json::to_value(RuleLines::LabelRef("greet".into())).unwrap(),
            json!("greet")
        );
    }

    #[test]
    fn empty_collections_are_omitted() {
        let document = SpeechbankDocument {
            speechbank: BTreeMap::from([(
                "c".to_string(),
                vec![CompiledRule {
                    lines: Some(RuleLines::Entries(vec![LineEntry::Single("hi".into())])),
                    ..Default::default()
                }],
            )]),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&document).unwrap(),
            json!({ "speechbank": { "c": [ { "line": ["hi"] } ] } })
        );
    }
}
