//! Conversational tone.
//!
//! The assistant mirrors the register the user writes in. Detection is a
//! lexicon lookup; adaptation is a literal phrase-substitution table applied
//! to every assistant-authored template.

mod adapter;
mod detector;

pub use adapter::{adapt, rules_for, ToneRule, FORMAL_RULES, GENZ_RULES};
pub use detector::{ToneDetector, FORMAL_MARKERS, GENZ_MARKERS};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse register classification applied to assistant phrasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Casual,
    Genz,
    Formal,
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tone::Casual => "casual",
            Tone::Genz => "genz",
            Tone::Formal => "formal",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tone_is_casual() {
        assert_eq!(Tone::default(), Tone::Casual);
    }

    #[test]
    fn tone_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Tone::Genz).unwrap(), "\"genz\"");
        assert_eq!(serde_json::to_string(&Tone::Formal).unwrap(), "\"formal\"");
    }
}
