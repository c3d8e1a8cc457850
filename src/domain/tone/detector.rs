//! Lexicon-based tone detection.

use super::Tone;

/// Slang markers. Checked before the formal lexicon.
pub const GENZ_MARKERS: &[&str] = &[
    "no cap",
    "fr fr",
    "bussin",
    "slay",
    "bestie",
    "lowkey",
    "highkey",
    "ngl",
    "deadass",
    "bruh",
    "sheesh",
    "periodt",
    "it's giving",
    "rizz",
    "yeet",
    "vibe check",
];

/// Phrases typical of formal written requests.
pub const FORMAL_MARKERS: &[&str] = &[
    "please",
    "kindly",
    "would you",
    "could you",
    "i would like",
    "thank you",
    "regards",
    "dear",
    "appreciate",
    "assist me",
    "greetings",
    "good morning",
    "good afternoon",
];

/// Classifies a user utterance into a [`Tone`].
///
/// Stateless: the same text always yields the same tone.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToneDetector;

impl ToneDetector {
    /// Detect the tone of a message.
    pub fn detect(&self, text: &str) -> Tone {
        let lowercase = text.to_lowercase();

        if GENZ_MARKERS.iter().any(|marker| lowercase.contains(marker)) {
            return Tone::Genz;
        }

        if FORMAL_MARKERS.iter().any(|marker| lowercase.contains(marker)) {
            return Tone::Formal;
        }

        Tone::Casual
    }
}
