//! Session start: wipe the slots and stay silent.
//!
//! No reply is produced so the host can run its own greeting flow.

use parley_core::types::SlotMutation;

use crate::error::ActionError;
use crate::handler::{intents, Action};
use crate::types::{ActionContext, ActionOutcome};

pub struct SessionStartAction;

impl Action for SessionStartAction {
    fn name(&self) -> &str {
        intents::SESSION_START
    }

    fn run(&self, _ctx: &ActionContext<'_>) -> Result<ActionOutcome, ActionError> {
        Ok(ActionOutcome::silent().with_mutation(SlotMutation::ResetAll))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SlotSnapshot;

    #[test]
    fn test_session_start_resets_everything_silently() {
        let snap = SlotSnapshot::new().with("location", "Oslo");
        let outcome = SessionStartAction
            .run(&ActionContext::new(&snap, &[], None))
            .unwrap();
        assert!(outcome.response.is_none());
        assert_eq!(outcome.mutations, vec![SlotMutation::ResetAll]);
    }
}
