//! Guided data-collection wizards.
//!
//! A wizard is a named, ordered sequence of steps that ends in a single
//! marketplace call. The registry holds the static step data, the engine
//! moves a [`WizardState`] through it.

mod coercion;
mod engine;
mod payload;
mod registry;
mod state;

pub use coercion::{coerce, match_option};
pub use engine::{next_applicable, StepOutcome, WizardEngine};
pub use payload::{FreelancerDraft, GigDraft, GigSearchQuery, WizardPayload};
pub use registry::{
    steps_for, InputType, StepCondition, StepDefinition, StepInputSpec, WizardKind, ANY_CATEGORY,
    GIG_CATEGORIES,
};
pub use state::{Collected, FieldValue, WizardState};
