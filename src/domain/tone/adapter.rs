//! Tone-specific phrase substitution.
//!
//! Each tone owns an ordered table of literal `(pattern, replacement)` pairs.
//! Every pattern is matched once against the *original* template; matches
//! that overlap a region already claimed by an earlier rule are ignored, so
//! substituted text is never re-scanned.

use super::Tone;

/// A single literal substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneRule {
    pub pattern: &'static str,
    pub replacement: &'static str,
}

const fn rule(pattern: &'static str, replacement: &'static str) -> ToneRule {
    ToneRule {
        pattern,
        replacement,
    }
}

/// Casual to genz substitutions, in application order.
pub const GENZ_RULES: &[ToneRule] = &[
    rule("Great!", "Yoo that's fire!"),
    rule("Got it!", "Bet!"),
    rule("Awesome!", "Sheesh, awesome!"),
    rule("Perfect!", "Slay!"),
    rule("Hey!", "Yooo!"),
    rule("No worries", "No cap, all good"),
    rule("Sorry", "My bad"),
    rule("Thanks", "Thx fam"),
    rule("Sounds good", "Vibes"),
];

/// Casual to formal substitutions, in application order.
pub const FORMAL_RULES: &[ToneRule] = &[
    rule("Got it!", "Understood."),
    rule("Great!", "Excellent."),
    rule("Awesome!", "Very well."),
    rule("Perfect!", "Thank you."),
    rule("Hey!", "Hello."),
    rule("No worries", "No problem at all"),
    rule("Oops", "Apologies"),
    rule("Thanks", "Thank you"),
    rule("Let's", "Let us"),
    rule("What's", "What is"),
];

/// Returns the substitution table for a tone. Casual has none.
pub fn rules_for(tone: Tone) -> &'static [ToneRule] {
    match tone {
        Tone::Casual => &[],
        Tone::Genz => GENZ_RULES,
        Tone::Formal => FORMAL_RULES,
    }
}

/// Rewrites an assistant template for the given tone.
pub fn adapt(template: &str, tone: Tone) -> String {
    let rules = rules_for(tone);
    if rules.is_empty() {
        return template.to_string();
    }

    // (start, end, replacement) over byte offsets of the original template.
    let mut claimed: Vec<(usize, usize, &'static str)> = Vec::new();

    for rule in rules {
        let Some(start) = template.find(rule.pattern) else {
            continue;
        };
        let end = start + rule.pattern.len();
        let overlaps = claimed.iter().any(|&(s, e, _)| start < e && s < end);
        if !overlaps {
            claimed.push((start, end, rule.replacement));
        }
    }

    if claimed.is_empty() {
        return template.to_string();
    }

    claimed.sort_by_key(|&(start, _, _)| start);

    let mut out = String::with_capacity(template.len() + 16);
    let mut cursor = 0;
    for (start, end, replacement) in claimed {
        out.push_str(&template[cursor..start]);
        out.push_str(replacement);
        cursor = end;
    }
    out.push_str(&template[cursor..]);
    out
}
