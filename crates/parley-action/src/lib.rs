//! Action layer for Parley.
//!
//! Stateless actions keyed by intent name, the collaborators they are built
//! with, slot validators, and the keyword tables behind FAQ and small talk.

pub mod error;
pub mod handler;
pub mod keywords;
pub mod services;
pub mod types;
pub mod validation;

pub use error::ActionError;
pub use handler::{intents, Action, ActionRegistry, ActionRegistryBuilder, GENERIC_APOLOGY};
pub use keywords::{KeywordRule, KeywordTable, Reply};
pub use services::{
    BookingIdGenerator, Chooser, Clock, FixedChooser, FixedClock, IdGenerator,
    MockWeatherProvider, RandomChooser, SequentialIdGenerator, Services, StaticWeatherProvider,
    SystemClock, WeatherProvider, WeatherReport,
};
pub use types::{ActionContext, ActionOutcome, SlotSnapshot};
pub use validation::{DateValidator, TimeValidator, ValidationResult, Validator, ValidatorSet};
