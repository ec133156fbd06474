//! FAQ action: first keyword match over the user's utterance.

use std::sync::Arc;

use parley_core::config::FaqConfig;

use crate::error::ActionError;
use crate::handler::{intents, Action};
use crate::keywords::KeywordTable;
use crate::services::Chooser;
use crate::types::{ActionContext, ActionOutcome};

pub struct FaqAction {
    table: KeywordTable,
    deflection: String,
    chooser: Arc<dyn Chooser>,
}

impl FaqAction {
    pub fn new(table: KeywordTable, deflection: impl Into<String>, chooser: Arc<dyn Chooser>) -> Self {
        Self {
            table,
            deflection: deflection.into(),
            chooser,
        }
    }

    pub fn from_config(config: &FaqConfig, chooser: Arc<dyn Chooser>) -> Self {
        Self::new(KeywordTable::from_faq(config), config.deflection.clone(), chooser)
    }
}

impl Action for FaqAction {
    fn name(&self) -> &str {
        intents::FAQ
    }

    fn run(&self, ctx: &ActionContext<'_>) -> Result<ActionOutcome, ActionError> {
        let question = ctx.utterance.or_else(|| ctx.entity("question")).unwrap_or("");
        let answer = self
            .table
            .find(question)
            .and_then(|rule| rule.reply.resolve(self.chooser.as_ref()));

        if answer.is_none() {
            tracing::debug!(question = %question, "No FAQ entry matched");
        }
        Ok(ActionOutcome::reply(answer.unwrap_or_else(|| self.deflection.clone())))
    }
}
