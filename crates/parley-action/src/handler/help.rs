//! Capability overview.

use crate::error::ActionError;
use crate::handler::{intents, Action};
use crate::types::{ActionContext, ActionOutcome};

pub const HELP_TEXT: &str = "I can help you with:\n\
- Weather information (\"What's the weather in Paris?\")\n\
- The current time\n\
- Booking an appointment (\"Book me in tomorrow at 3pm\")\n\
- Cancelling an appointment\n\
- Questions about our hours, prices and location\n\
- General conversation\n\n\
What would you like to do?";

pub struct HelpAction;

impl Action for HelpAction {
    fn name(&self) -> &str {
        intents::HELP
    }

    fn run(&self, _ctx: &ActionContext<'_>) -> Result<ActionOutcome, ActionError> {
        Ok(ActionOutcome::reply(HELP_TEXT))
    }
}
