//! Wizard Engine - step progression for one active wizard.
//!
//! Pure logic over [`WizardState`]. Every operation validates before it
//! mutates, so a rejected answer leaves the state exactly as it was.

use crate::domain::foundation::ValidationError;

use super::coercion::{coerce, match_option};
use super::payload::WizardPayload;
use super::registry::{steps_for, InputType, StepDefinition, WizardKind};
use super::state::{Collected, FieldValue, WizardState};

/// Result of feeding one input into the wizard.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The wizard now waits on this step.
    Prompt(&'static StepDefinition),
    /// The multi-select buffer changed; the step did not advance.
    Toggled { selected: Vec<String> },
    /// Every applicable step is answered.
    Complete(WizardPayload),
}

/// Drives step progression, coercion and completion.
#[derive(Debug, Clone, Copy)]
pub struct WizardEngine {
    numeric_fallback: f64,
}

impl Default for WizardEngine {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl WizardEngine {
    pub fn new(numeric_fallback: f64) -> Self {
        Self { numeric_fallback }
    }

    /// Fresh wizard state plus the first step to prompt.
    pub fn start(&self, kind: WizardKind) -> (WizardState, &'static StepDefinition) {
        let state = WizardState::new(kind);
        let steps = steps_for(kind);
        let first = &steps[next_applicable(steps, None, &state.collected)];
        (state, first)
    }

    /// Answers the current step with raw text.
    pub fn submit(
        &self,
        state: &mut WizardState,
        raw: &str,
    ) -> Result<StepOutcome, ValidationError> {
        let step = current(state)?;
        let value = coerce(step, raw, self.numeric_fallback)?;
        Ok(self.store_and_advance(state, step, value))
    }

    /// Adds or removes an option from the multi-select buffer.
    pub fn toggle(
        &self,
        state: &mut WizardState,
        item: &str,
    ) -> Result<StepOutcome, ValidationError> {
        let step = current_multi_select(state)?;
        let option = match_option(step, item)
            .ok_or_else(|| ValidationError::not_an_option(step.key, step.options))?;

        if !state.multi_select_buffer.remove(option) {
            state.multi_select_buffer.insert(option.to_string());
        }

        Ok(StepOutcome::Toggled {
            selected: ordered_selection(step, state),
        })
    }

    /// Commits the multi-select buffer as the step's answer.
    pub fn commit_selection(
        &self,
        state: &mut WizardState,
    ) -> Result<StepOutcome, ValidationError> {
        let step = current_multi_select(state)?;
        if state.multi_select_buffer.is_empty() {
            return Err(ValidationError::nothing_selected(step.key));
        }

        let selected = ordered_selection(step, state);
        state.multi_select_buffer.clear();
        Ok(self.store_and_advance(state, step, FieldValue::List(selected)))
    }

    fn store_and_advance(
        &self,
        state: &mut WizardState,
        step: &'static StepDefinition,
        value: FieldValue,
    ) -> StepOutcome {
        state.collected.insert(step.key.to_string(), value);

        let steps = state.steps();
        let next = next_applicable(steps, Some(state.step_index), &state.collected);
        state.step_index = next;

        match steps.get(next) {
            Some(step) => StepOutcome::Prompt(step),
            None => StepOutcome::Complete(WizardPayload::build(
                state.kind,
                &state.collected,
                self.numeric_fallback,
            )),
        }
    }
}

/// Smallest index after `from` whose step applies, or `steps.len()`.
pub fn next_applicable(
    steps: &[StepDefinition],
    from: Option<usize>,
    collected: &Collected,
) -> usize {
    let start = from.map_or(0, |i| i + 1);
    (start..steps.len())
        .find(|&i| steps[i].applies(collected))
        .unwrap_or(steps.len())
}

fn current(state: &WizardState) -> Result<&'static StepDefinition, ValidationError> {
    state
        .current_step()
        .ok_or_else(|| ValidationError::invalid_format(state.kind.as_str(), "wizard is complete"))
}

fn current_multi_select(state: &WizardState) -> Result<&'static StepDefinition, ValidationError> {
    let step = current(state)?;
    if step.input_type != InputType::MultiSelect {
        return Err(ValidationError::invalid_format(
            step.key,
            "this step does not take a selection",
        ));
    }
    Ok(step)
}

/// Buffer contents in the step's option order.
fn ordered_selection(step: &StepDefinition, state: &WizardState) -> Vec<String> {
    step.options
        .iter()
        .filter(|o| state.multi_select_buffer.contains(**o))
        .map(|o| o.to_string())
        .collect()
}
