//! Structured actions emitted alongside assistant messages.

mod dispatcher;
mod markers;
mod token;

pub use dispatcher::{ActionDispatcher, HostOperation};
pub use markers::{extract_action, parse_marker_body};
pub use token::{ActionKind, ActionToken};
