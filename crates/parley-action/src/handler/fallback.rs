//! Default fallback: the registry's answer for every unknown intent.

use std::sync::Arc;

use crate::error::ActionError;
use crate::handler::{intents, Action};
use crate::services::{choose, Chooser};
use crate::types::{ActionContext, ActionOutcome};

pub const FALLBACK_RESPONSES: &[&str] = &[
    "I'm sorry, I didn't understand that. Could you rephrase?",
    "I'm not sure what you mean. Can you try asking differently?",
    "I'm still learning. Could you try asking that differently?",
    "I'd love to help! Could you clarify what you're looking for? You can also ask me for help.",
];

pub struct DefaultFallbackAction {
    chooser: Arc<dyn Chooser>,
}

impl DefaultFallbackAction {
    pub fn new(chooser: Arc<dyn Chooser>) -> Self {
        Self { chooser }
    }
}

impl Action for DefaultFallbackAction {
    fn name(&self) -> &str {
        intents::DEFAULT_FALLBACK
    }

    fn run(&self, _ctx: &ActionContext<'_>) -> Result<ActionOutcome, ActionError> {
        let reply = choose(self.chooser.as_ref(), FALLBACK_RESPONSES)
            .copied()
            .unwrap_or(FALLBACK_RESPONSES[0]);
        Ok(ActionOutcome::reply(reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{FixedChooser, RandomChooser};
    use crate::types::SlotSnapshot;

    #[test]
    fn test_fallback_picks_with_chooser() {
        let snap = SlotSnapshot::new();
        for i in 0..FALLBACK_RESPONSES.len() {
            let action = DefaultFallbackAction::new(Arc::new(FixedChooser(i)));
            let outcome = action.run(&ActionContext::new(&snap, &[], None)).unwrap();
            assert_eq!(outcome.response.as_deref(), Some(FALLBACK_RESPONSES[i]));
            assert!(outcome.mutations.is_empty());
        }
    }

    #[test]
    fn test_fallback_random_stays_in_fixed_set() {
        let action = DefaultFallbackAction::new(Arc::new(RandomChooser::new(Some(3))));
        let snap = SlotSnapshot::new();
        for _ in 0..20 {
            let reply = action
                .run(&ActionContext::new(&snap, &[], None))
                .unwrap()
                .response
                .unwrap();
            assert!(FALLBACK_RESPONSES.contains(&reply.as_str()));
        }
    }
}
