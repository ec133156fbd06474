//! Appointment cancellation action.
//!
//! Only asks for the booking reference; there is no cancellation backend yet.

use crate::error::ActionError;
use crate::handler::{intents, Action};
use crate::types::{ActionContext, ActionOutcome};

pub const CANCEL_PROMPT: &str = "I'd be happy to help you cancel your appointment. Could you please provide your booking ID or the appointment details?";

pub struct CancelAppointmentAction;

impl Action for CancelAppointmentAction {
    fn name(&self) -> &str {
        intents::CANCEL_APPOINTMENT
    }

    fn run(&self, _ctx: &ActionContext<'_>) -> Result<ActionOutcome, ActionError> {
        Ok(ActionOutcome::reply(CANCEL_PROMPT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SlotSnapshot;
    use parley_core::types::Entity;

    #[test]
    fn test_cancel_always_asks_for_booking_id() {
        let snap = SlotSnapshot::new().with("booking_id", "BOOK-0001");
        let entities = vec![Entity::new("booking_id", "BOOK-0001")];
        let outcome = CancelAppointmentAction
            .run(&ActionContext::new(&snap, &entities, None))
            .unwrap();
        assert_eq!(outcome.response.as_deref(), Some(CANCEL_PROMPT));
        assert!(outcome.mutations.is_empty());
    }
}
