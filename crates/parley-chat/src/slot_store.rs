//! Per-session slot storage.
//!
//! The store performs no validation. Callers write only values that have
//! already passed their validator, and supply the time of each write.

use std::collections::BTreeMap;

use parley_action::SlotSnapshot;
use parley_core::types::{Slot, SlotMutation, SlotValue, Timestamp};

/// Named conversational values for one session.
#[derive(Debug, Clone, Default)]
pub struct SlotStore {
    slots: BTreeMap<String, Slot>,
}

impl SlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of `name`; `None` when unset or never referenced.
    pub fn get(&self, name: &str) -> Option<&SlotValue> {
        self.slots.get(name).and_then(|slot| slot.value.as_ref())
    }

    pub fn set(&mut self, name: &str, value: SlotValue, set_by: &str, at: Timestamp) {
        let slot = self.entry(name);
        slot.value = Some(value);
        slot.set_by = Some(set_by.to_string());
        slot.updated_at = Some(at);
    }

    /// Clear `name` back to unset. The slot itself is kept.
    pub fn reset(&mut self, name: &str, at: Timestamp) {
        let slot = self.entry(name);
        slot.value = None;
        slot.set_by = None;
        slot.updated_at = Some(at);
    }

    pub fn reset_all(&mut self, at: Timestamp) {
        for slot in self.slots.values_mut() {
            slot.value = None;
            slot.set_by = None;
            slot.updated_at = Some(at);
        }
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Full slot record, including who wrote it last.
    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.get(name)
    }

    /// Every slot ever referenced, set or not.
    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.values()
    }

    /// Read-only copy of the slots that currently hold a value.
    pub fn snapshot(&self) -> SlotSnapshot {
        self.slots
            .values()
            .filter_map(|slot| slot.value.clone().map(|v| (slot.name.clone(), v)))
            .collect()
    }

    /// Apply `mutations` in order, attributing writes to `set_by` at `at`.
    pub fn apply(&mut self, mutations: &[SlotMutation], set_by: &str, at: Timestamp) {
        for mutation in mutations {
            match mutation {
                SlotMutation::Set { slot, value } => self.set(slot, value.clone(), set_by, at),
                SlotMutation::Reset { slot } => self.reset(slot, at),
                SlotMutation::ResetAll => self.reset_all(at),
            }
        }
    }

    fn entry(&mut self, name: &str) -> &mut Slot {
        self.slots
            .entry(name.to_string())
            .or_insert_with(|| Slot::empty(name))
    }
}
