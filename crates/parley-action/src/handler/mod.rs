//! Action trait and the intent-to-action registry.
//!
//! Each built-in action lives in its own submodule. The registry is filled
//! through `ActionRegistryBuilder` and is immutable once built, so dispatch
//! for a given intent never changes mid-conversation.

pub mod booking;
pub mod cancel;
pub mod chitchat;
pub mod fallback;
pub mod faq;
pub mod help;
pub mod session_start;
pub mod time;
pub mod weather;

use std::collections::HashMap;
use std::sync::Arc;

use parley_core::config::ParleyConfig;

use crate::error::ActionError;
use crate::services::Services;
use crate::types::{ActionContext, ActionOutcome};

pub use booking::{BookAppointmentAction, BookDatedAppointmentAction};
pub use cancel::CancelAppointmentAction;
pub use chitchat::ChitchatAction;
pub use fallback::DefaultFallbackAction;
pub use faq::FaqAction;
pub use help::HelpAction;
pub use session_start::SessionStartAction;
pub use time::TimeAction;
pub use weather::WeatherAction;

/// Intent names the built-in actions answer to.
pub mod intents {
    pub const GET_WEATHER: &str = "get_weather";
    pub const GET_TIME: &str = "get_time";
    pub const BOOK_APPOINTMENT: &str = "book_appointment";
    pub const BOOK_DATED_APPOINTMENT: &str = "book_dated_appointment";
    pub const CANCEL_APPOINTMENT: &str = "cancel_appointment";
    pub const FAQ: &str = "faq";
    pub const CHITCHAT: &str = "chitchat";
    pub const HELP: &str = "help";
    pub const DEFAULT_FALLBACK: &str = "default_fallback";
    pub const SESSION_START: &str = "session_start";
}

/// Reply used when a collaborator fails and the action has no better apology.
pub const GENERIC_APOLOGY: &str =
    "Sorry, something went wrong while handling your request. Please try again.";

/// A named, stateless unit of conversational behaviour.
///
/// `run` must depend only on its context and the collaborators injected at
/// construction; persistent effects are expressed as returned mutations.
pub trait Action: Send + Sync {
    /// Intent name this action answers to.
    fn name(&self) -> &str;

    fn run(&self, ctx: &ActionContext<'_>) -> Result<ActionOutcome, ActionError>;

    /// Slots this action fills from the turn's entities. Entities for these
    /// slots are validated before `run`; all others pass through untouched.
    fn validated_slots(&self) -> &[&str] {
        &[]
    }

    /// Reply shown when `run` fails with a collaborator error.
    fn failure_message(&self) -> String {
        GENERIC_APOLOGY.to_string()
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Collects actions and aliases before freezing them into an `ActionRegistry`.
#[derive(Default)]
pub struct ActionRegistryBuilder {
    actions: HashMap<String, Arc<dyn Action>>,
    aliases: Vec<(String, String)>,
}

impl ActionRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action under its own name. A later registration with the
    /// same name replaces the earlier one.
    pub fn register<A: Action + 'static>(&mut self, action: A) -> &mut Self {
        self.register_arc(Arc::new(action))
    }

    pub fn register_arc(&mut self, action: Arc<dyn Action>) -> &mut Self {
        let name = action.name().to_string();
        if self.actions.insert(name.clone(), action).is_some() {
            tracing::warn!(action = %name, "Action registered twice, keeping the latest");
        }
        self
    }

    /// Route `intent` to the action registered as `target`.
    ///
    /// Resolved at `build` time; aliases to unknown actions are skipped.
    pub fn alias(&mut self, intent: impl Into<String>, target: impl Into<String>) -> &mut Self {
        self.aliases.push((intent.into(), target.into()));
        self
    }

    /// Freeze the registry. `fallback` answers every unknown intent and is
    /// also reachable under its own name.
    pub fn build<F: Action + 'static>(self, fallback: F) -> ActionRegistry {
        let fallback: Arc<dyn Action> = Arc::new(fallback);
        let mut actions = self.actions;
        actions.insert(fallback.name().to_string(), Arc::clone(&fallback));

        for (intent, target) in self.aliases {
            match actions.get(&target).cloned() {
                Some(action) => {
                    if actions.contains_key(&intent) {
                        tracing::warn!(intent = %intent, "Alias shadows a registered action, skipping");
                        continue;
                    }
                    actions.insert(intent, action);
                }
                None => {
                    tracing::warn!(intent = %intent, target = %target, "Alias targets unknown action, skipping");
                }
            }
        }

        ActionRegistry { actions, fallback }
    }
}

/// Immutable mapping from intent name to action, with a designated fallback.
pub struct ActionRegistry {
    actions: HashMap<String, Arc<dyn Action>>,
    fallback: Arc<dyn Action>,
}

impl ActionRegistry {
    pub fn builder() -> ActionRegistryBuilder {
        ActionRegistryBuilder::new()
    }

    /// Every built-in action wired to `services`, plus the configured aliases.
    pub fn with_defaults(services: &Services, config: &ParleyConfig) -> Self {
        let mut builder = Self::builder();
        builder
            .register(WeatherAction::new(
                Arc::clone(&services.weather),
                config.assistant.default_location.clone(),
            ))
            .register(TimeAction::new(Arc::clone(&services.clock)))
            .register(BookAppointmentAction::new(Arc::clone(&services.ids)))
            .register(BookDatedAppointmentAction::new(Arc::clone(&services.ids)))
            .register(CancelAppointmentAction)
            .register(FaqAction::from_config(&config.faq, Arc::clone(&services.chooser)))
            .register(ChitchatAction::new(
                &config.assistant.bot_name,
                Arc::clone(&services.chooser),
            ))
            .register(HelpAction)
            .register(SessionStartAction);
        for (intent, target) in &config.intents.aliases {
            builder.alias(intent.clone(), target.clone());
        }
        builder.build(DefaultFallbackAction::new(Arc::clone(&services.chooser)))
    }

    /// The action for `intent`, or the fallback when none is registered.
    pub fn resolve(&self, intent: &str) -> Arc<dyn Action> {
        match self.actions.get(intent) {
            Some(action) => Arc::clone(action),
            None => Arc::clone(&self.fallback),
        }
    }

    /// Exact lookup without falling back.
    pub fn get(&self, intent: &str) -> Option<Arc<dyn Action>> {
        self.actions.get(intent).cloned()
    }

    pub fn contains(&self, intent: &str) -> bool {
        self.actions.contains_key(intent)
    }

    pub fn fallback(&self) -> &Arc<dyn Action> {
        &self.fallback
    }

    /// Registered intent names, sorted.
    pub fn intents(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
