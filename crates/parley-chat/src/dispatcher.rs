//! Turn dispatcher.
//!
//! Resolves the action for an intent, runs it against a snapshot of the
//! slots and commits the returned mutations. A turn commits all of its
//! mutations or none of them: any validation failure discards the lot and
//! answers with the validator's prompt instead.

use std::sync::Arc;

use parley_action::{
    ActionContext, ActionError, ActionRegistry, Clock, SystemClock, ValidationResult, ValidatorSet,
};
use parley_core::types::{Entity, SlotMutation, SlotValue, Timestamp, TurnInput};
use serde::{Deserialize, Serialize};

use crate::slot_store::SlotStore;

/// How a turn was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnResolution {
    /// The intent's own action ran and its mutations were committed.
    Completed,
    /// No action matched; the fallback answered.
    Fallback,
    /// A value for `slot` failed validation; nothing was committed.
    Rejected { slot: String },
    /// The action needed `slot` and asked for it instead.
    MissingSlot { slot: String },
    /// A collaborator failed; the action's apology was returned.
    Failed,
}

/// Everything that happened during one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    pub intent: String,
    /// Name of the action that handled the turn.
    pub action: String,
    pub response: Option<String>,
    /// Mutations applied to the store, in order. Empty unless committed.
    pub committed: Vec<SlotMutation>,
    pub resolution: TurnResolution,
}

impl TurnReport {
    /// Reply text, or the empty string for a silent action.
    pub fn response_text(&self) -> &str {
        self.response.as_deref().unwrap_or("")
    }
}

pub struct Dispatcher {
    registry: Arc<ActionRegistry>,
    validators: Arc<ValidatorSet>,
    clock: Arc<dyn Clock>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ActionRegistry>, validators: Arc<ValidatorSet>) -> Self {
        Self {
            registry,
            validators,
            clock: Arc::new(SystemClock),
        }
    }

    /// Stamp committed slot writes with `clock` instead of the wall clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Handle one turn and return only the reply text.
    pub fn handle(&self, store: &mut SlotStore, intent: &str, entities: &[Entity]) -> String {
        let turn = TurnInput {
            intent: intent.to_string(),
            entities: entities.to_vec(),
            utterance: None,
        };
        self.handle_turn(store, &turn).response.unwrap_or_default()
    }

    /// Handle one turn, reporting the committed mutations and how the turn ended.
    pub fn handle_turn(&self, store: &mut SlotStore, turn: &TurnInput) -> TurnReport {
        let action = self.registry.resolve(&turn.intent);
        let action_name = action.name().to_string();
        let fell_back = !self.registry.contains(&turn.intent);
        if fell_back {
            tracing::warn!(intent = %turn.intent, "Unknown intent, using fallback");
        }

        let report = |response: Option<String>,
                      committed: Vec<SlotMutation>,
                      resolution: TurnResolution| TurnReport {
            intent: turn.intent.clone(),
            action: action_name.clone(),
            response,
            committed,
            resolution,
        };

        // Entities the action copies into guarded slots are checked before it runs.
        let guarded = action.validated_slots();
        for entity in &turn.entities {
            let Some((slot, result)) = self.validators.validate_entity(&entity.name, &entity.value)
            else {
                continue;
            };
            if !guarded.contains(&slot) {
                continue;
            }
            if let ValidationResult::Rejected(prompt) = result {
                tracing::warn!(intent = %turn.intent, slot = %slot, "Entity rejected by validator");
                return report(
                    Some(prompt),
                    Vec::new(),
                    TurnResolution::Rejected {
                        slot: slot.to_string(),
                    },
                );
            }
        }

        let snapshot = store.snapshot();
        let ctx = ActionContext::new(&snapshot, &turn.entities, turn.utterance.as_deref());
        let outcome = match action.run(&ctx) {
            Ok(outcome) => outcome,
            Err(ActionError::MissingRequiredSlot { slot, prompt }) => {
                tracing::debug!(action = %action_name, slot = %slot, "Required slot missing");
                return report(Some(prompt), Vec::new(), TurnResolution::MissingSlot { slot });
            }
            Err(err) => {
                tracing::warn!(action = %action_name, error = %err, "Action failed");
                return report(Some(action.failure_message()), Vec::new(), TurnResolution::Failed);
            }
        };

        let mut committed = Vec::with_capacity(outcome.mutations.len());
        for mutation in outcome.mutations {
            match self.check(mutation) {
                Ok(mutation) => committed.push(mutation),
                Err((slot, prompt)) => {
                    tracing::warn!(action = %action_name, slot = %slot, "Mutation rejected, discarding turn");
                    return report(Some(prompt), Vec::new(), TurnResolution::Rejected { slot });
                }
            }
        }

        store.apply(&committed, &action_name, Timestamp::from_naive(self.clock.now()));
        tracing::debug!(
            intent = %turn.intent,
            action = %action_name,
            mutations = committed.len(),
            "Turn committed"
        );

        let resolution = if fell_back {
            TurnResolution::Fallback
        } else {
            TurnResolution::Completed
        };
        report(outcome.response, committed, resolution)
    }

    /// Validate a `Set` on a guarded slot, swapping in the normalised value.
    fn check(&self, mutation: SlotMutation) -> Result<SlotMutation, (String, String)> {
        let (slot, value) = match mutation {
            SlotMutation::Set { slot, value } => (slot, value),
            other => return Ok(other),
        };
        match self.validators.validate(&slot, &value) {
            None => Ok(SlotMutation::Set { slot, value }),
            Some(ValidationResult::Accepted(normalised)) => Ok(SlotMutation::Set {
                slot,
                value: SlotValue::Text(normalised),
            }),
            Some(ValidationResult::Rejected(prompt)) => Err((slot, prompt)),
        }
    }
}
