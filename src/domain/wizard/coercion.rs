//! Value coercion for wizard answers.

use chrono::NaiveDate;

use crate::domain::foundation::ValidationError;

use super::registry::{InputType, StepDefinition};
use super::state::FieldValue;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Resolves raw input to one of the step's options, case-insensitively.
pub fn match_option(step: &StepDefinition, raw: &str) -> Option<&'static str> {
    let wanted = raw.trim();
    step.options
        .iter()
        .copied()
        .find(|option| option.eq_ignore_ascii_case(wanted))
}

/// Coerces a raw answer according to the step's input type.
///
/// Numeric steps never reject input: unparsable values become
/// `numeric_fallback`, and a blank answer to an optional numeric step is
/// stored as `Null`. Multi-select steps only accept a committed buffer, so a
/// bare scalar is rejected here.
pub fn coerce(
    step: &StepDefinition,
    raw: &str,
    numeric_fallback: f64,
) -> Result<FieldValue, ValidationError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() && step.optional {
        return Ok(FieldValue::Null);
    }

    match step.input_type {
        InputType::Text | InputType::Textarea => {
            if trimmed.is_empty() {
                return Err(ValidationError::empty_field(step.key));
            }
            Ok(FieldValue::Text(trimmed.to_string()))
        }
        InputType::Number => Ok(coerce_number(step, trimmed, numeric_fallback)),
        InputType::Date => {
            if trimmed.is_empty() {
                return Err(ValidationError::empty_field(step.key));
            }
            let date = NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| {
                ValidationError::invalid_format(step.key, "expected a date like 2025-03-01")
            })?;
            Ok(FieldValue::Text(date.format(DATE_FORMAT).to_string()))
        }
        InputType::SingleSelect => {
            if trimmed.is_empty() {
                return Err(ValidationError::empty_field(step.key));
            }
            let option = match_option(step, trimmed)
                .ok_or_else(|| ValidationError::not_an_option(step.key, step.options))?;
            if step.yes_no {
                Ok(FieldValue::Bool(option == "Yes"))
            } else {
                Ok(FieldValue::Text(option.to_string()))
            }
        }
        InputType::MultiSelect => Err(ValidationError::invalid_format(
            step.key,
            "choose options and press done",
        )),
    }
}

fn coerce_number(step: &StepDefinition, trimmed: &str, fallback: f64) -> FieldValue {
    let parsed = trimmed.parse::<f64>().ok().filter(|n| n.is_finite());

    if step.integer {
        let whole = trimmed
            .parse::<i64>()
            .ok()
            .or_else(|| parsed.map(|n| n.trunc() as i64))
            .unwrap_or(fallback as i64);
        FieldValue::Integer(whole)
    } else {
        FieldValue::Number(parsed.unwrap_or(fallback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::wizard::registry::{steps_for, WizardKind};

    fn step(kind: WizardKind, key: &str) -> &'static StepDefinition {
        steps_for(kind)
            .iter()
            .find(|s| s.key == key)
            .expect("step exists")
    }

    #[test]
    fn text_is_trimmed() {
        let s = step(WizardKind::PostGig, "title");
        assert_eq!(coerce(s, "  Logo  ", 1.0), Ok(FieldValue::Text("Logo".into())));
    }

    #[test]
    fn blank_required_text_is_rejected() {
        let s = step(WizardKind::PostGig, "title");
        assert_eq!(
            coerce(s, "   ", 1.0),
            Err(ValidationError::empty_field("title"))
        );
    }

    #[test]
    fn number_parses_float() {
        let s = step(WizardKind::PostGig, "budget_min");
        assert_eq!(coerce(s, "50", 1.0), Ok(FieldValue::Number(50.0)));
        assert_eq!(coerce(s, "12.5", 1.0), Ok(FieldValue::Number(12.5)));
    }

    #[test]
    fn unparsable_number_falls_back() {
        let s = step(WizardKind::PostGig, "budget_max");
        assert_eq!(coerce(s, "lots", 1.0), Ok(FieldValue::Number(1.0)));
        assert_eq!(coerce(s, "", 1.0), Ok(FieldValue::Number(1.0)));
    }

    #[test]
    fn integer_step_stores_whole_number() {
        let s = step(WizardKind::PostGig, "people_needed");
        assert_eq!(coerce(s, "2", 1.0), Ok(FieldValue::Integer(2)));
        assert_eq!(coerce(s, "3.7", 1.0), Ok(FieldValue::Integer(3)));
        assert_eq!(coerce(s, "a few", 1.0), Ok(FieldValue::Integer(1)));
    }

    #[test]
    fn blank_optional_number_is_null() {
        let s = step(WizardKind::RegisterFreelancer, "hourly_rate");
        assert_eq!(coerce(s, " ", 1.0), Ok(FieldValue::Null));
        assert_eq!(coerce(s, "40", 1.0), Ok(FieldValue::Number(40.0)));
    }

    #[test]
    fn yes_no_becomes_bool() {
        let s = step(WizardKind::PostGig, "is_urgent");
        assert_eq!(coerce(s, "Yes", 1.0), Ok(FieldValue::Bool(true)));
        assert_eq!(coerce(s, "no", 1.0), Ok(FieldValue::Bool(false)));
        assert!(coerce(s, "maybe", 1.0).is_err());
    }

    #[test]
    fn single_select_is_canonicalized() {
        let s = step(WizardKind::PostGig, "category");
        assert_eq!(
            coerce(s, "web development", 1.0),
            Ok(FieldValue::Text("Web Development".into()))
        );
        assert!(matches!(
            coerce(s, "Plumbing", 1.0),
            Err(ValidationError::NotAnOption { .. })
        ));
    }

    #[test]
    fn date_must_be_iso() {
        let s = step(WizardKind::PostGig, "duration_start");
        assert_eq!(
            coerce(s, "2025-03-01", 1.0),
            Ok(FieldValue::Text("2025-03-01".into()))
        );
        assert!(matches!(
            coerce(s, "next week", 1.0),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn multi_select_rejects_scalar() {
        let s = step(WizardKind::RegisterFreelancer, "categories");
        assert!(coerce(s, "Tutoring", 1.0).is_err());
    }
}
