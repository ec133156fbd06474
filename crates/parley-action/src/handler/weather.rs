//! Weather lookup action.
//!
//! Resolves a location (stored slot, then this turn's entity, then the
//! configured default) and reports conditions from the injected provider.

use std::sync::Arc;

use parley_core::types::{slots, SlotMutation};

use crate::error::ActionError;
use crate::handler::{intents, Action};
use crate::services::WeatherProvider;
use crate::types::{ActionContext, ActionOutcome};

pub const WEATHER_APOLOGY: &str =
    "Sorry, I could not retrieve weather information at the moment. Please try again later.";

pub struct WeatherAction {
    provider: Arc<dyn WeatherProvider>,
    default_location: String,
}

impl WeatherAction {
    pub fn new(provider: Arc<dyn WeatherProvider>, default_location: impl Into<String>) -> Self {
        Self {
            provider,
            default_location: default_location.into(),
        }
    }
}

impl Action for WeatherAction {
    fn name(&self) -> &str {
        intents::GET_WEATHER
    }

    fn run(&self, ctx: &ActionContext<'_>) -> Result<ActionOutcome, ActionError> {
        let named = ctx
            .slot_text(slots::LOCATION)
            .or_else(|| ctx.entity_for_slot(slots::LOCATION));
        let location = named.unwrap_or(self.default_location.as_str());

        let report = self.provider.current(location)?;
        tracing::debug!(location = %report.location, condition = %report.condition, "Weather resolved");

        let outcome = ActionOutcome::reply(format!(
            "The current weather in {} is {} with a temperature of {}°C and humidity at {}%.",
            report.location, report.condition, report.temperature_c, report.humidity_pct
        ));

        // The default is a placeholder, not something the user said.
        Ok(match named {
            Some(location) => outcome.with_mutation(SlotMutation::set(slots::LOCATION, location)),
            None => outcome,
        })
    }

    fn failure_message(&self) -> String {
        WEATHER_APOLOGY.to_string()
    }
}
