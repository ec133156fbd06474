//! Appointment booking actions.
//!
//! Two policies exist side by side under different intent names:
//!
//! - `book_appointment` needs only a time; date and person are optional and
//!   a successful booking raises the `appointment_confirmed` flag.
//! - `book_dated_appointment` needs both a date and a time and records the
//!   generated booking identifier in the `booking_id` slot.
//!
//! For both, a value extracted this turn takes precedence over the stored slot.

use std::sync::Arc;

use parley_core::types::{slots, SlotMutation};

use crate::error::ActionError;
use crate::handler::{intents, Action};
use crate::services::IdGenerator;
use crate::types::{ActionContext, ActionOutcome};

pub const TIME_PROMPT: &str = "What time would you like to book your appointment for?";
pub const DATE_AND_TIME_PROMPT: &str = "I need both date and time to book your appointment.";

/// Where a booking value came from. Only values new this turn are written back,
/// apart from the required time which is always confirmed into its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Entity,
    Slot,
}

/// Slots both booking actions take from entities.
const BOOKING_SLOTS: &[&str] = &[slots::APPOINTMENT_DATE, slots::APPOINTMENT_TIME];

fn lookup<'a>(ctx: &ActionContext<'a>, slot: &str) -> Option<(&'a str, Source)> {
    ctx.entity_for_slot(slot)
        .map(|v| (v, Source::Entity))
        .or_else(|| ctx.slot_text(slot).map(|v| (v, Source::Slot)))
}

// =============================================================================
// book_appointment
// =============================================================================

pub struct BookAppointmentAction {
    ids: Arc<dyn IdGenerator>,
}

impl BookAppointmentAction {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self { ids }
    }
}

impl Action for BookAppointmentAction {
    fn name(&self) -> &str {
        intents::BOOK_APPOINTMENT
    }

    fn validated_slots(&self) -> &[&str] {
        BOOKING_SLOTS
    }

    fn run(&self, ctx: &ActionContext<'_>) -> Result<ActionOutcome, ActionError> {
        let (time, _) = lookup(ctx, slots::APPOINTMENT_TIME)
            .ok_or_else(|| ActionError::missing(slots::APPOINTMENT_TIME, TIME_PROMPT))?;
        let date = lookup(ctx, slots::APPOINTMENT_DATE);
        let person = lookup(ctx, slots::APPOINTMENT_PERSON);

        let booking_id = self.ids.next_id();

        let mut response = format!("Your appointment is confirmed for {}", time);
        if let Some((date, _)) = date {
            response.push_str(&format!(" on {}", date));
        }
        if let Some((person, _)) = person {
            response.push_str(&format!(" with {}", person));
        }
        response.push_str(&format!(". Your booking ID is {}.", booking_id));

        let mut outcome =
            ActionOutcome::reply(response).with_mutation(SlotMutation::set(slots::APPOINTMENT_TIME, time));
        if let Some((date, Source::Entity)) = date {
            outcome = outcome.with_mutation(SlotMutation::set(slots::APPOINTMENT_DATE, date));
        }
        if let Some((person, Source::Entity)) = person {
            outcome = outcome.with_mutation(SlotMutation::set(slots::APPOINTMENT_PERSON, person));
        }

        tracing::info!(booking_id = %booking_id, time = %time, "Appointment booked");
        Ok(outcome.with_mutation(SlotMutation::set(slots::APPOINTMENT_CONFIRMED, true)))
    }
}

// =============================================================================
// book_dated_appointment
// =============================================================================

pub struct BookDatedAppointmentAction {
    ids: Arc<dyn IdGenerator>,
}

impl BookDatedAppointmentAction {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self { ids }
    }
}

impl Action for BookDatedAppointmentAction {
    fn name(&self) -> &str {
        intents::BOOK_DATED_APPOINTMENT
    }

    fn validated_slots(&self) -> &[&str] {
        BOOKING_SLOTS
    }

    fn run(&self, ctx: &ActionContext<'_>) -> Result<ActionOutcome, ActionError> {
        let date = lookup(ctx, slots::APPOINTMENT_DATE);
        let time = lookup(ctx, slots::APPOINTMENT_TIME);
        let ((date, _), (time, _)) = match (date, time) {
            (Some(date), Some(time)) => (date, time),
            (None, _) => return Err(ActionError::missing(slots::APPOINTMENT_DATE, DATE_AND_TIME_PROMPT)),
            (_, None) => return Err(ActionError::missing(slots::APPOINTMENT_TIME, DATE_AND_TIME_PROMPT)),
        };

        let booking_id = self.ids.next_id();
        let response = format!(
            "Appointment booked successfully!\nDate: {}\nTime: {}\nBooking ID: {}\n\nYou will receive a confirmation email shortly.",
            date, time, booking_id
        );

        tracing::info!(booking_id = %booking_id, date = %date, time = %time, "Dated appointment booked");
        Ok(ActionOutcome::reply(response)
            .with_mutation(SlotMutation::set(slots::APPOINTMENT_DATE, date))
            .with_mutation(SlotMutation::set(slots::APPOINTMENT_TIME, time))
            .with_mutation(SlotMutation::set(slots::BOOKING_ID, booking_id)))
    }
}
