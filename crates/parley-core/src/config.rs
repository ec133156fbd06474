use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ParleyError, Result};

/// Top-level configuration for Parley.
///
/// Loaded from `~/.parley/config.toml` by default and passed explicitly into
/// the registry, dispatcher and session manager at construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParleyConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub intents: IntentConfig,
    #[serde(default)]
    pub faq: FaqConfig,
}

impl ParleyConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ParleyConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ParleyError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Persona and mock-backend settings used by the built-in actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Name the assistant introduces itself with.
    pub bot_name: String,
    /// Location reported when neither a slot nor an entity names one.
    pub default_location: String,
    /// Prefix for generated booking identifiers.
    pub booking_id_prefix: String,
    /// Seed for the random reply chooser and the mock weather generator.
    /// Unset means seeded from entropy.
    pub random_seed: Option<u64>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            bot_name: "Parley".to_string(),
            default_location: "your area".to_string(),
            booking_id_prefix: "BOOK-".to_string(),
            random_seed: None,
        }
    }
}

/// Conversation session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Idle minutes after which a session starts over with empty slots.
    pub timeout_minutes: u32,
    /// Maximum mutation-log entries retained per session.
    pub max_log_entries: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_minutes: 30,
            max_log_entries: 500,
        }
    }
}

/// Intent routing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentConfig {
    /// Extra intent names routed to an existing action, e.g.
    /// `"weather.get" = "get_weather"`.
    pub aliases: BTreeMap<String, String>,
}

/// One FAQ row: any keyword found in the utterance selects the answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub keywords: Vec<String>,
    pub answer: String,
}

impl FaqEntry {
    fn new(keywords: &[&str], answer: &str) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            answer: answer.to_string(),
        }
    }
}

/// FAQ table. Entry order is the tie-break: the first matching entry wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqConfig {
    /// Reply when no entry matches.
    pub deflection: String,
    pub entries: Vec<FaqEntry>,
}

impl Default for FaqConfig {
    fn default() -> Self {
        Self {
            deflection: "I'm not sure about that one. Please contact our support team at support@example.com for more help.".to_string(),
            entries: vec![
                FaqEntry::new(
                    &["hours", "open", "close"],
                    "We're open Monday-Friday 9AM-6PM, weekends 10AM-4PM.",
                ),
                FaqEntry::new(
                    &["price", "cost", "fee"],
                    "A standard consultation costs $50. Follow-up visits are $30.",
                ),
                FaqEntry::new(
                    &["location", "address", "where are you"],
                    "You can find us at 123 Main Street, Suite 400.",
                ),
                FaqEntry::new(
                    &["contact", "phone", "email"],
                    "You can reach us at (555) 123-4567 or support@example.com.",
                ),
                FaqEntry::new(
                    &["cancel"],
                    "Appointments can be cancelled free of charge up to 24 hours in advance.",
                ),
                FaqEntry::new(
                    &["book", "appointment"],
                    "Just tell me the date and time that suit you and I'll book an appointment.",
                ),
            ],
        }
    }
}
