//! Inputs and outputs of a single action run.

use std::collections::BTreeMap;

use parley_core::types::{slots, Entity, SlotMutation, SlotValue};
use serde::{Deserialize, Serialize};

// =============================================================================
// SlotSnapshot
// =============================================================================

/// Read-only copy of the slots that currently hold a value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSnapshot {
    values: BTreeMap<String, SlotValue>,
}

impl SlotSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used mostly by tests and hosts seeding a conversation.
    pub fn with(mut self, slot: impl Into<String>, value: impl Into<SlotValue>) -> Self {
        self.values.insert(slot.into(), value.into());
        self
    }

    pub fn get(&self, slot: &str) -> Option<&SlotValue> {
        self.values.get(slot)
    }

    /// Text value of a slot, as stored; blank strings count as unset.
    pub fn text(&self, slot: &str) -> Option<&str> {
        self.get(slot)
            .and_then(SlotValue::as_text)
            .filter(|s| !s.trim().is_empty())
    }

    pub fn is_set(&self, slot: &str) -> bool {
        self.values.contains_key(slot)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SlotValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, SlotValue)> for SlotSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, SlotValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// ActionContext
// =============================================================================

/// What an action sees for one turn.
#[derive(Debug, Clone, Copy)]
pub struct ActionContext<'a> {
    pub slots: &'a SlotSnapshot,
    pub entities: &'a [Entity],
    pub utterance: Option<&'a str>,
}

impl<'a> ActionContext<'a> {
    pub fn new(slots: &'a SlotSnapshot, entities: &'a [Entity], utterance: Option<&'a str>) -> Self {
        Self {
            slots,
            entities,
            utterance,
        }
    }

    /// First non-blank entity with exactly this name, value untouched.
    pub fn entity(&self, name: &str) -> Option<&'a str> {
        self.entities
            .iter()
            .filter(|e| e.name == name)
            .map(|e| e.value.as_str())
            .find(|v| !v.trim().is_empty())
    }

    /// First non-blank entity that fills `slot`, under any of its aliases.
    pub fn entity_for_slot(&self, slot: &str) -> Option<&'a str> {
        self.entities
            .iter()
            .filter(|e| slots::for_entity(&e.name) == Some(slot))
            .map(|e| e.value.as_str())
            .find(|v| !v.trim().is_empty())
    }

    pub fn slot_text(&self, slot: &str) -> Option<&'a str> {
        self.slots.text(slot)
    }
}

// =============================================================================
// ActionOutcome
// =============================================================================

/// Reply text plus the ordered slot mutations an action asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// `None` means the host framework should carry on with its own flow.
    pub response: Option<String>,
    pub mutations: Vec<SlotMutation>,
}

impl ActionOutcome {
    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            response: Some(text.into()),
            mutations: Vec::new(),
        }
    }

    pub fn silent() -> Self {
        Self::default()
    }

    pub fn with_mutation(mut self, mutation: SlotMutation) -> Self {
        self.mutations.push(mutation);
        self
    }
}

// =============================================================================
// Tests
// =============================================================================
