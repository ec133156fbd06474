//! Current time action.

use std::sync::Arc;

use crate::error::ActionError;
use crate::handler::{intents, Action};
use crate::services::Clock;
use crate::types::{ActionContext, ActionOutcome};

pub struct TimeAction {
    clock: Arc<dyn Clock>,
}

impl TimeAction {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl Action for TimeAction {
    fn name(&self) -> &str {
        intents::GET_TIME
    }

    fn run(&self, _ctx: &ActionContext<'_>) -> Result<ActionOutcome, ActionError> {
        let now = self.clock.now();
        Ok(ActionOutcome::reply(format!(
            "The current time is {} on {}.",
            now.format("%I:%M %p"),
            now.format("%A, %B %d, %Y")
        )))
    }
}
