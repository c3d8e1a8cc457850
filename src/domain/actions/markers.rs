//! Extraction of `[ACTION]` markers from assistant replies.
//!
//! The remote model is instructed to suggest actions as a bracketed marker
//! followed by `Key: value` lines, e.g.
//!
//! ```text
//! [SEARCH_GIGS]
//! Category: Web Development
//! Location: Dhaka
//! ```

use serde_json::{Map, Value};

use super::token::{ActionKind, ActionToken};

/// Markers recognised in replies, in precedence order.
const MARKER_PRECEDENCE: &[ActionKind] = &[
    ActionKind::SearchGigs,
    ActionKind::PostGig,
    ActionKind::UpdateProfile,
    ActionKind::ApplyGig,
    ActionKind::RegisterFreelancer,
];

/// Finds the highest-precedence marker in `text` and parses its payload.
pub fn extract_action(text: &str) -> Option<ActionToken> {
    MARKER_PRECEDENCE.iter().find_map(|kind| {
        let marker = format!("[{}]", kind.as_str());
        text.find(&marker).map(|at| {
            let body = &text[at + marker.len()..];
            ActionToken::new(*kind, Value::Object(parse_marker_body(body)))
        })
    })
}

/// Parses `Key: value` lines up to the next `[`.
///
/// Keys are lowercased with spaces replaced by underscores; lines without a
/// colon and entries with an empty value are skipped.
pub fn parse_marker_body(body: &str) -> Map<String, Value> {
    let section = match body.find('[') {
        Some(end) => &body[..end],
        None => body,
    };

    section
        .trim()
        .lines()
        .filter_map(|line| line.split_once(':'))
        .filter_map(|(key, value)| {
            let key = key.trim().to_lowercase().replace(' ', "_");
            let value = value.trim();
            (!value.is_empty()).then(|| (key, Value::String(value.to_string())))
        })
        .collect()
}
