//! Shared value types for the conversation layer.
//!
//! Slots, entities, per-turn input and the slot mutations that actions emit.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Well-known slot names
// =============================================================================

/// Names of the slots the built-in actions read and write.
pub mod slots {
    pub const LOCATION: &str = "location";
    pub const APPOINTMENT_DATE: &str = "appointment_date";
    pub const APPOINTMENT_TIME: &str = "appointment_time";
    pub const APPOINTMENT_PERSON: &str = "appointment_person";
    pub const APPOINTMENT_CONFIRMED: &str = "appointment_confirmed";
    pub const BOOKING_ID: &str = "booking_id";

    /// Map an NLU entity name onto the slot it fills.
    ///
    /// Short entity names (`date`, `time`, `person`) are aliases for the
    /// appointment slots; an entity named exactly like a slot fills that slot.
    pub fn for_entity(entity: &str) -> Option<&'static str> {
        match entity {
            "location" => Some(LOCATION),
            "date" | "appointment_date" => Some(APPOINTMENT_DATE),
            "time" | "appointment_time" => Some(APPOINTMENT_TIME),
            "person" | "appointment_person" => Some(APPOINTMENT_PERSON),
            "booking_id" => Some(BOOKING_ID),
            _ => None,
        }
    }
}

// =============================================================================
// Temporal
// =============================================================================

/// Unix timestamp in seconds since epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp())
    }

    /// Reads a naive clock value as UTC.
    pub fn from_naive(dt: NaiveDateTime) -> Self {
        Self(dt.and_utc().timestamp())
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.0, 0).unwrap_or_default()
    }
}

// =============================================================================
// Slots
// =============================================================================

/// A value held by a slot.
///
/// Serialised untagged, so a mutation log reads as plain JSON values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlotValue {
    Flag(bool),
    Text(String),
}

impl SlotValue {
    /// Borrow the text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SlotValue::Text(s) => Some(s),
            SlotValue::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            SlotValue::Flag(b) => Some(*b),
            SlotValue::Text(_) => None,
        }
    }
}

impl fmt::Display for SlotValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotValue::Flag(b) => write!(f, "{}", b),
            SlotValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for SlotValue {
    fn from(s: &str) -> Self {
        SlotValue::Text(s.to_string())
    }
}

impl From<String> for SlotValue {
    fn from(s: String) -> Self {
        SlotValue::Text(s)
    }
}

impl From<bool> for SlotValue {
    fn from(b: bool) -> Self {
        SlotValue::Flag(b)
    }
}

/// A named conversational value.
///
/// Created implicitly on first reference with no value; never removed,
/// only reset back to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub name: String,
    pub value: Option<SlotValue>,
    /// Name of the action that last wrote this slot.
    pub set_by: Option<String>,
    pub updated_at: Option<Timestamp>,
}

impl Slot {
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            set_by: None,
            updated_at: None,
        }
    }
}

/// One slot change requested by an action, applied in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SlotMutation {
    Set { slot: String, value: SlotValue },
    Reset { slot: String },
    ResetAll,
}

impl SlotMutation {
    pub fn set(slot: impl Into<String>, value: impl Into<SlotValue>) -> Self {
        SlotMutation::Set {
            slot: slot.into(),
            value: value.into(),
        }
    }

    pub fn reset(slot: impl Into<String>) -> Self {
        SlotMutation::Reset { slot: slot.into() }
    }

    /// The slot this mutation targets, `None` for `ResetAll`.
    pub fn slot(&self) -> Option<&str> {
        match self {
            SlotMutation::Set { slot, .. } | SlotMutation::Reset { slot } => Some(slot),
            SlotMutation::ResetAll => None,
        }
    }
}

impl fmt::Display for SlotMutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotMutation::Set { slot, value } => write!(f, "{} = {}", slot, value),
            SlotMutation::Reset { slot } => write!(f, "{} = <unset>", slot),
            SlotMutation::ResetAll => write!(f, "<reset all>"),
        }
    }
}

// =============================================================================
// Per-turn input
// =============================================================================

/// A single NLU extraction for one turn. Consumed once, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub value: String,
}

impl Entity {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Everything the external NLU layer hands over for one turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnInput {
    pub intent: String,
    #[serde(default)]
    pub entities: Vec<Entity>,
    /// Raw user text, used by keyword-matching actions.
    #[serde(default)]
    pub utterance: Option<String>,
}

impl TurnInput {
    pub fn new(intent: impl Into<String>) -> Self {
        Self {
            intent: intent.into(),
            entities: Vec::new(),
            utterance: None,
        }
    }

    pub fn with_entity(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entities.push(Entity::new(name, value));
        self
    }

    pub fn with_utterance(mut self, utterance: impl Into<String>) -> Self {
        self.utterance = Some(utterance.into());
        self
    }
}

// =============================================================================
// Tests
// =============================================================================
