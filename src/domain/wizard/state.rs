//! Wizard state and collected values.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::registry::{steps_for, StepDefinition, WizardKind};

/// A coerced answer to one wizard step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            FieldValue::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Answers keyed by step key.
pub type Collected = BTreeMap<String, FieldValue>;

/// Progress through one active wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardState {
    pub kind: WizardKind,
    pub step_index: usize,
    pub collected: Collected,
    pub multi_select_buffer: BTreeSet<String>,
}

impl WizardState {
    /// Fresh state positioned on the first step.
    pub fn new(kind: WizardKind) -> Self {
        Self {
            kind,
            step_index: 0,
            collected: Collected::new(),
            multi_select_buffer: BTreeSet::new(),
        }
    }

    pub fn steps(&self) -> &'static [StepDefinition] {
        steps_for(self.kind)
    }

    /// The step awaiting an answer, if any.
    pub fn current_step(&self) -> Option<&'static StepDefinition> {
        self.steps().get(self.step_index)
    }

    /// Steps that apply given what has been collected so far, used for
    /// progress display. Later answers can still change the total.
    pub fn applicable_step_count(&self) -> usize {
        self.steps()
            .iter()
            .filter(|s| s.applies(&self.collected))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_starts_at_first_step() {
        let state = WizardState::new(WizardKind::PostGig);
        assert_eq!(state.step_index, 0);
        assert!(state.collected.is_empty());
        assert!(state.multi_select_buffer.is_empty());
        assert_eq!(state.current_step().map(|s| s.key), Some("title"));
    }

    #[test]
    fn applicable_count_grows_when_other_is_chosen() {
        let mut state = WizardState::new(WizardKind::PostGig);
        assert_eq!(state.applicable_step_count(), 10);

        state
            .collected
            .insert("category".into(), FieldValue::Text("Other".into()));
        assert_eq!(state.applicable_step_count(), 11);
    }

    #[test]
    fn field_value_serializes_untagged() {
        assert_eq!(serde_json::to_string(&FieldValue::Bool(true)).unwrap(), "true");
        assert_eq!(serde_json::to_string(&FieldValue::Null).unwrap(), "null");
        assert_eq!(
            serde_json::to_string(&FieldValue::List(vec!["a".into()])).unwrap(),
            "[\"a\"]"
        );
    }

    #[test]
    fn numeric_accessors_convert() {
        assert_eq!(FieldValue::Integer(2).as_f64(), Some(2.0));
        assert_eq!(FieldValue::Number(2.9).as_i64(), Some(2));
        assert_eq!(FieldValue::Text("2".into()).as_f64(), None);
    }
}
