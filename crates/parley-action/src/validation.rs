//! Slot validators.
//!
//! A validator sees the raw candidate text for one slot and either accepts
//! it (normalised) or rejects it with a prompt for the user. The built-in
//! date and time validators keep the raw text unchanged on acceptance: no
//! calendar parsing happens here, downstream display treats the value as
//! free text.

use std::collections::HashMap;

use parley_core::types::{slots, SlotValue};

/// Outcome of validating one candidate value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Accepted(String),
    Rejected(String),
}

impl ValidationResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationResult::Accepted(_))
    }
}

/// Validation rule for a single slot.
pub trait Validator: Send + Sync {
    /// Slot this validator guards.
    fn slot(&self) -> &str;

    /// Message shown when a value is rejected.
    fn prompt(&self) -> &str;

    fn validate(&self, raw: &str) -> ValidationResult;
}

const WEEKDAYS: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// True when `raw` contains a digit or any of `keywords` (case-insensitive).
fn has_keyword_or_digit(raw: &str, keywords: &[&str]) -> bool {
    let lower = raw.to_lowercase();
    keywords.iter().any(|k| lower.contains(k)) || raw.chars().any(|c| c.is_ascii_digit())
}

fn accept_or_prompt(raw: &str, ok: bool, prompt: &str) -> ValidationResult {
    if ok && !raw.trim().is_empty() {
        ValidationResult::Accepted(raw.to_string())
    } else {
        ValidationResult::Rejected(prompt.to_string())
    }
}

// =============================================================================
// Date
// =============================================================================

/// Accepts relative-day words, weekday names, or anything with a digit.
pub struct DateValidator;

impl DateValidator {
    pub const PROMPT: &'static str =
        "Please provide a valid date (e.g., 'tomorrow', 'Monday', or '2024-01-15').";
}

impl Validator for DateValidator {
    fn slot(&self) -> &str {
        slots::APPOINTMENT_DATE
    }

    fn prompt(&self) -> &str {
        Self::PROMPT
    }

    fn validate(&self, raw: &str) -> ValidationResult {
        let ok = has_keyword_or_digit(raw, &["today", "tomorrow"])
            || has_keyword_or_digit(raw, WEEKDAYS);
        accept_or_prompt(raw, ok, Self::PROMPT)
    }
}

// =============================================================================
// Time
// =============================================================================

/// Accepts meridiem markers, a colon, time-of-day words, or anything with a digit.
pub struct TimeValidator;

impl TimeValidator {
    pub const PROMPT: &'static str =
        "Please provide a valid time (e.g., '2:00 PM', '14:30', or 'morning').";
}

impl Validator for TimeValidator {
    fn slot(&self) -> &str {
        slots::APPOINTMENT_TIME
    }

    fn prompt(&self) -> &str {
        Self::PROMPT
    }

    fn validate(&self, raw: &str) -> ValidationResult {
        let ok = has_keyword_or_digit(raw, &["am", "pm", ":", "morning", "afternoon", "evening"]);
        accept_or_prompt(raw, ok, Self::PROMPT)
    }
}

// =============================================================================
// ValidatorSet
// =============================================================================

/// Validators keyed by the slot they guard.
#[derive(Default)]
pub struct ValidatorSet {
    validators: HashMap<String, Box<dyn Validator>>,
}

impl ValidatorSet {
    /// An empty set: no slot requires validation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Date and time validators for the appointment slots.
    pub fn with_defaults() -> Self {
        let mut set = Self::new();
        set.register(Box::new(DateValidator));
        set.register(Box::new(TimeValidator));
        set
    }

    pub fn register(&mut self, validator: Box<dyn Validator>) {
        self.validators.insert(validator.slot().to_string(), validator);
    }

    pub fn requires_validation(&self, slot: &str) -> bool {
        self.validators.contains_key(slot)
    }

    /// Validate a value for `slot`. `None` when the slot has no validator.
    ///
    /// Only text can pass a validator; a flag written to a guarded slot is
    /// rejected with that slot's prompt.
    pub fn validate(&self, slot: &str, value: &SlotValue) -> Option<ValidationResult> {
        let validator = self.validators.get(slot)?;
        Some(match value.as_text() {
            Some(text) => validator.validate(text),
            None => ValidationResult::Rejected(validator.prompt().to_string()),
        })
    }

    /// Validate a raw entity value against the slot its name maps to.
    ///
    /// Returns the slot name with the result, or `None` when the entity does
    /// not fill a guarded slot.
    pub fn validate_entity(&self, entity: &str, raw: &str) -> Option<(&'static str, ValidationResult)> {
        let slot = slots::for_entity(entity)?;
        let validator = self.validators.get(slot)?;
        Some((slot, validator.validate(raw)))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted(raw: &str) -> ValidationResult {
        ValidationResult::Accepted(raw.to_string())
    }

    #[test]
    fn test_date_accepts_keywords_case_insensitive() {
        for raw in ["today", "Tomorrow", "next MONDAY", "sunday afternoon"] {
            assert_eq!(DateValidator.validate(raw), accepted(raw), "input: {}", raw);
        }
    }

    #[test]
    fn test_date_accepts_any_digit() {
        for raw in ["2024-01-15", "the 3rd", "1/2"] {
            assert_eq!(DateValidator.validate(raw), accepted(raw), "input: {}", raw);
        }
    }

    #[test]
    fn test_date_rejects_without_keyword_or_digit() {
        for raw in ["soon", "whenever", "", "   ", "next week"] {
            assert_eq!(
                DateValidator.validate(raw),
                ValidationResult::Rejected(DateValidator::PROMPT.to_string()),
                "input: {}",
                raw
            );
        }
    }

    #[test]
    fn test_date_keeps_raw_value_unchanged() {
        assert_eq!(DateValidator.validate("  Friday "), accepted("  Friday "));
    }

    #[test]
    fn test_time_accepts_markers_keywords_and_digits() {
        for raw in ["3pm", "10 AM", "noon:ish", "Morning", "late evening", "1430"] {
            assert!(TimeValidator.validate(raw).is_accepted(), "input: {}", raw);
        }
    }

    #[test]
    fn test_time_rejects_without_marker_or_digit() {
        for raw in ["later", "soonish", ""] {
            assert_eq!(
                TimeValidator.validate(raw),
                ValidationResult::Rejected(TimeValidator::PROMPT.to_string()),
                "input: {}",
                raw
            );
        }
    }

    #[test]
    fn test_prompts_carry_examples() {
        assert!(DateValidator::PROMPT.contains("tomorrow"));
        assert!(TimeValidator::PROMPT.contains("14:30"));
    }

    #[test]
    fn test_set_only_guards_registered_slots() {
        let set = ValidatorSet::with_defaults();
        assert!(set.requires_validation("appointment_date"));
        assert!(set.requires_validation("appointment_time"));
        assert!(!set.requires_validation("location"));
        assert!(set.validate("location", &SlotValue::from("anything")).is_none());
    }

    #[test]
    fn test_set_rejects_flag_on_guarded_slot() {
        let set = ValidatorSet::with_defaults();
        let result = set.validate("appointment_time", &SlotValue::from(true)).unwrap();
        assert_eq!(result, ValidationResult::Rejected(TimeValidator::PROMPT.to_string()));
    }

    #[test]
    fn test_set_validates_entities_through_aliases() {
        let set = ValidatorSet::with_defaults();
        let (slot, result) = set.validate_entity("time", "3pm").unwrap();
        assert_eq!(slot, "appointment_time");
        assert!(result.is_accepted());

        let (slot, result) = set.validate_entity("date", "someday").unwrap();
        assert_eq!(slot, "appointment_date");
        assert!(!result.is_accepted());

        assert!(set.validate_entity("location", "Paris").is_none());
        assert!(set.validate_entity("question", "hours?").is_none());
    }

    #[test]
    fn test_empty_set_guards_nothing() {
        let set = ValidatorSet::new();
        assert!(set.validate_entity("time", "later").is_none());
    }
}
