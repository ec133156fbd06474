//! Small-talk action backed by an ordered keyword table.

use std::sync::Arc;

use crate::error::ActionError;
use crate::handler::{intents, Action};
use crate::keywords::KeywordTable;
use crate::services::Chooser;
use crate::types::{ActionContext, ActionOutcome};

pub const JOKES: &[&str] = &[
    "Why don't scientists trust atoms? Because they make up everything!",
    "I told my computer I needed a break, and it said: no problem, I'll go to sleep.",
    "Why did the calendar feel popular? Because it had a lot of dates.",
    "What do you call a fake noodle? An impasta.",
];

pub const SMALL_TALK_DEFAULT: &str =
    "I'm always happy to chat! I can also check the weather, tell the time, or book an appointment.";

pub struct ChitchatAction {
    table: KeywordTable,
    chooser: Arc<dyn Chooser>,
}

impl ChitchatAction {
    /// Default small-talk table. "how are you" is checked before the
    /// greetings so "hey, how are you?" gets the more specific answer.
    pub fn new(bot_name: &str, chooser: Arc<dyn Chooser>) -> Self {
        let table = KeywordTable::new()
            .with_fixed(
                &["how are you", "how's it going"],
                "I'm doing well, thank you for asking!",
            )
            .with_fixed(
                &["your name", "who are you"],
                &format!("I'm {}, a virtual assistant here to help you.", bot_name),
            )
            .with_one_of(&["joke", "funny"], JOKES)
            .with_fixed(
                &["hello", "hey", "good morning", "good afternoon", "good evening", "greetings"],
                "Hi there! How can I help you today?",
            )
            .with_fixed(&["thank"], "You're welcome! Anything else I can do for you?")
            .with_fixed(&["bye", "see you"], "Goodbye! It was nice talking with you!");
        Self::with_table(table, chooser)
    }

    pub fn with_table(table: KeywordTable, chooser: Arc<dyn Chooser>) -> Self {
        Self { table, chooser }
    }
}

impl Action for ChitchatAction {
    fn name(&self) -> &str {
        intents::CHITCHAT
    }

    fn run(&self, ctx: &ActionContext<'_>) -> Result<ActionOutcome, ActionError> {
        let reply = ctx
            .utterance
            .and_then(|text| self.table.find(text))
            .and_then(|rule| rule.reply.resolve(self.chooser.as_ref()))
            .unwrap_or_else(|| SMALL_TALK_DEFAULT.to_string());
        Ok(ActionOutcome::reply(reply))
    }
}
