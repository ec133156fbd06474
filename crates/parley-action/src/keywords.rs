//! Ordered keyword tables for FAQ and small-talk replies.
//!
//! A table is a list of rules checked front to back; the first rule with a
//! keyword occurring in the lower-cased utterance wins. Rule order is
//! therefore the tie-break when several rules match.

use parley_core::config::FaqConfig;

use crate::services::{choose, Chooser};

/// How a matched rule answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Fixed(String),
    /// One of several alternatives, picked by the injected chooser.
    OneOf(Vec<String>),
}

impl Reply {
    /// `None` only for an empty `OneOf`.
    pub fn resolve(&self, chooser: &dyn Chooser) -> Option<String> {
        match self {
            Reply::Fixed(text) => Some(text.clone()),
            Reply::OneOf(options) => choose(chooser, options).cloned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRule {
    keywords: Vec<String>,
    pub reply: Reply,
}

impl KeywordRule {
    /// Keywords are lower-cased; blank keywords are dropped since they would
    /// match every utterance.
    pub fn new<S: AsRef<str>>(keywords: &[S], reply: Reply) -> Self {
        Self {
            keywords: keywords
                .iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            reply,
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordTable {
    rules: Vec<KeywordRule>,
}

impl KeywordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule after every existing one.
    pub fn push(&mut self, rule: KeywordRule) {
        self.rules.push(rule);
    }

    pub fn with_fixed<S: AsRef<str>>(mut self, keywords: &[S], reply: &str) -> Self {
        self.push(KeywordRule::new(keywords, Reply::Fixed(reply.to_string())));
        self
    }

    pub fn with_one_of<S: AsRef<str>>(mut self, keywords: &[S], replies: &[&str]) -> Self {
        let replies = replies.iter().map(|r| r.to_string()).collect();
        self.push(KeywordRule::new(keywords, Reply::OneOf(replies)));
        self
    }

    /// Build the FAQ table from config, preserving entry order.
    pub fn from_faq(config: &FaqConfig) -> Self {
        let mut table = Self::new();
        for entry in &config.entries {
            table.push(KeywordRule::new(
                entry.keywords.as_slice(),
                Reply::Fixed(entry.answer.clone()),
            ));
        }
        table
    }

    /// First rule with a keyword contained in `utterance`.
    pub fn find(&self, utterance: &str) -> Option<&KeywordRule> {
        let lowered = utterance.to_lowercase();
        self.rules.iter().find(|rule| rule.matches(&lowered))
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
