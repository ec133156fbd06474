//! Injected collaborators.
//!
//! Everything an action would otherwise pull from the process (wall clock,
//! randomness, identifiers, a weather backend) comes in through these traits
//! so every action can be driven deterministically in tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{Duration, Local, NaiveDateTime};
use parley_core::config::ParleyConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ActionError;

// =============================================================================
// Clock
// =============================================================================

/// Source of the current local date and time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the local wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock that only moves when told to.
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        match self.now.lock() {
            Ok(mut guard) => *guard = now,
            Err(poisoned) => *poisoned.into_inner() = now,
        }
    }

    pub fn advance(&self, by: Duration) {
        let next = self.now() + by;
        self.set(next);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

// =============================================================================
// IdGenerator
// =============================================================================

/// Produces booking identifiers.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Prefix plus eight upper-case hex characters from a v4 UUID, e.g. `BOOK-1F3A9C02`.
pub struct BookingIdGenerator {
    prefix: String,
}

impl BookingIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl IdGenerator for BookingIdGenerator {
    fn next_id(&self) -> String {
        let hex = Uuid::new_v4().simple().to_string();
        format!("{}{}", self.prefix, hex[..8].to_uppercase())
    }
}

/// Prefix plus a zero-padded counter starting at 1, e.g. `BOOK-0001`.
pub struct SequentialIdGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}{:04}", self.prefix, n)
    }
}

// =============================================================================
// Chooser
// =============================================================================

/// Picks an index into a list of `len` alternatives.
///
/// Implementations must return a value below `len` whenever `len > 0`.
pub trait Chooser: Send + Sync {
    fn pick(&self, len: usize) -> usize;
}

/// Pick one element of `items` with `chooser`; `None` for an empty slice.
pub fn choose<'a, T>(chooser: &dyn Chooser, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(chooser.pick(items.len()).min(items.len() - 1))
}

/// Uniform choice from a `StdRng`, seedable for reproducible runs.
pub struct RandomChooser {
    rng: Mutex<StdRng>,
}

impl RandomChooser {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: Mutex::new(seeded_rng(seed)),
        }
    }
}

impl Chooser for RandomChooser {
    fn pick(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(0..len),
            Err(poisoned) => poisoned.into_inner().gen_range(0..len),
        }
    }
}

/// Always picks the same index, clamped to the last element.
pub struct FixedChooser(pub usize);

impl Chooser for FixedChooser {
    fn pick(&self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

// =============================================================================
// WeatherProvider
// =============================================================================

/// Current conditions for a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: String,
    pub condition: String,
    pub temperature_c: i32,
    pub humidity_pct: u8,
}

/// Weather backend.
pub trait WeatherProvider: Send + Sync {
    fn current(&self, location: &str) -> Result<WeatherReport, ActionError>;
}

const MOCK_CONDITIONS: &[&str] = &["sunny", "partly cloudy", "cloudy", "light rain", "windy"];

/// Synthesises plausible weather from a seeded generator.
pub struct MockWeatherProvider {
    rng: Mutex<StdRng>,
}

impl MockWeatherProvider {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: Mutex::new(seeded_rng(seed)),
        }
    }
}

impl WeatherProvider for MockWeatherProvider {
    fn current(&self, location: &str) -> Result<WeatherReport, ActionError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|e| ActionError::Collaborator(format!("weather generator lock poisoned: {}", e)))?;
        let condition = MOCK_CONDITIONS[rng.gen_range(0..MOCK_CONDITIONS.len())];
        Ok(WeatherReport {
            location: location.to_string(),
            condition: condition.to_string(),
            temperature_c: rng.gen_range(12..=30),
            humidity_pct: rng.gen_range(40..=80),
        })
    }
}

/// Returns the same conditions for every location.
pub struct StaticWeatherProvider {
    pub condition: String,
    pub temperature_c: i32,
    pub humidity_pct: u8,
}

impl WeatherProvider for StaticWeatherProvider {
    fn current(&self, location: &str) -> Result<WeatherReport, ActionError> {
        Ok(WeatherReport {
            location: location.to_string(),
            condition: self.condition.clone(),
            temperature_c: self.temperature_c,
            humidity_pct: self.humidity_pct,
        })
    }
}

// =============================================================================
// Services
// =============================================================================

/// The full set of collaborators handed to the built-in actions.
#[derive(Clone)]
pub struct Services {
    pub clock: Arc<dyn Clock>,
    pub ids: Arc<dyn IdGenerator>,
    pub chooser: Arc<dyn Chooser>,
    pub weather: Arc<dyn WeatherProvider>,
}

impl Services {
    /// Production collaborators: wall clock, UUID booking ids, and seeded
    /// (or entropy-seeded) randomness for replies and mock weather.
    pub fn system(config: &ParleyConfig) -> Self {
        let seed = config.assistant.random_seed;
        Self {
            clock: Arc::new(SystemClock),
            ids: Arc::new(BookingIdGenerator::new(config.assistant.booking_id_prefix.clone())),
            chooser: Arc::new(RandomChooser::new(seed)),
            weather: Arc::new(MockWeatherProvider::new(seed)),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
