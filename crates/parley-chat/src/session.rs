//! Conversation sessions.
//!
//! Each session owns its own `SlotStore`, so sessions never share mutable
//! state. Turns of one session serialise on that session's mutex while
//! different sessions can be driven from different threads.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use chrono::{Duration, NaiveDateTime};
use parley_action::{intents, ActionRegistry, Clock, Services, SlotSnapshot, ValidatorSet};
use parley_core::config::{ParleyConfig, SessionConfig};
use parley_core::types::{SlotMutation, TurnInput};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dispatcher::{Dispatcher, TurnReport};
use crate::error::ChatError;
use crate::slot_store::SlotStore;

/// One committed slot change, as exposed to an external state tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationRecord {
    /// Turn number within the session; 0 is the session start.
    pub turn: u64,
    pub action: String,
    pub mutation: SlotMutation,
    pub at: NaiveDateTime,
}

/// State of a single conversation.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub store: SlotStore,
    pub turns: u64,
    pub started_at: NaiveDateTime,
    pub last_active: NaiveDateTime,
    log: VecDeque<MutationRecord>,
    max_log_entries: usize,
}

impl Session {
    fn new(now: NaiveDateTime, max_log_entries: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            store: SlotStore::new(),
            turns: 0,
            started_at: now,
            last_active: now,
            log: VecDeque::new(),
            max_log_entries,
        }
    }

    /// Record the committed mutations of a turn, dropping the oldest entries
    /// once the log is full.
    fn record(&mut self, report: &TurnReport, at: NaiveDateTime) {
        for mutation in &report.committed {
            self.log.push_back(MutationRecord {
                turn: self.turns,
                action: report.action.clone(),
                mutation: mutation.clone(),
                at,
            });
        }
        while self.log.len() > self.max_log_entries {
            self.log.pop_front();
        }
    }

    pub fn mutation_log(&self) -> Vec<MutationRecord> {
        self.log.iter().cloned().collect()
    }
}

// =============================================================================
// SessionManager
// =============================================================================

/// Owns every live session and routes turns to them.
pub struct SessionManager {
    dispatcher: Dispatcher,
    clock: Arc<dyn Clock>,
    config: SessionConfig,
    sessions: Mutex<HashMap<Uuid, Arc<Mutex<Session>>>>,
}

impl SessionManager {
    pub fn new(dispatcher: Dispatcher, clock: Arc<dyn Clock>, config: SessionConfig) -> Self {
        Self {
            dispatcher,
            clock,
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Built-in actions and validators wired to `services`.
    pub fn from_config(config: &ParleyConfig, services: Services) -> Self {
        let registry = ActionRegistry::with_defaults(&services, config);
        let dispatcher = Dispatcher::new(
            Arc::new(registry),
            Arc::new(ValidatorSet::with_defaults()),
        )
        .with_clock(Arc::clone(&services.clock));
        Self::new(dispatcher, services.clock, config.session.clone())
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Open a new session and run the session-start action on it.
    pub fn create_session(&self) -> Result<Uuid, ChatError> {
        let now = self.clock.now();
        let mut session = Session::new(now, self.config.max_log_entries);
        self.start(&mut session, now);
        let id = session.id;

        self.lock_sessions()?
            .insert(id, Arc::new(Mutex::new(session)));
        tracing::info!(session_id = %id, "Session created");
        Ok(id)
    }

    /// Run one turn in session `id`.
    pub fn handle(&self, id: Uuid, turn: &TurnInput) -> Result<TurnReport, ChatError> {
        if turn.intent.trim().is_empty() {
            return Err(ChatError::EmptyIntent);
        }

        let session = self.session(id)?;
        let mut session = session
            .lock()
            .map_err(|e| ChatError::LockPoisoned(format!("session {}: {}", id, e)))?;

        let now = self.clock.now();
        if self.is_expired(&session, now) {
            tracing::info!(session_id = %id, "Session idle past timeout, starting over");
            self.start(&mut session, now);
        }

        session.turns += 1;
        session.last_active = now;
        let report = self.dispatcher.handle_turn(&mut session.store, turn);
        session.record(&report, now);

        tracing::debug!(
            session_id = %id,
            turn = session.turns,
            intent = %turn.intent,
            action = %report.action,
            "Turn handled"
        );
        Ok(report)
    }

    /// Current slot values of session `id`.
    pub fn slots(&self, id: Uuid) -> Result<SlotSnapshot, ChatError> {
        let session = self.session(id)?;
        let session = session
            .lock()
            .map_err(|e| ChatError::LockPoisoned(format!("session {}: {}", id, e)))?;
        Ok(session.store.snapshot())
    }

    pub fn mutation_log(&self, id: Uuid) -> Result<Vec<MutationRecord>, ChatError> {
        let session = self.session(id)?;
        let session = session
            .lock()
            .map_err(|e| ChatError::LockPoisoned(format!("session {}: {}", id, e)))?;
        Ok(session.mutation_log())
    }

    pub fn end_session(&self, id: Uuid) -> Result<(), ChatError> {
        match self.lock_sessions()?.remove(&id) {
            Some(_) => {
                tracing::info!(session_id = %id, "Session ended");
                Ok(())
            }
            None => Err(ChatError::SessionNotFound(id)),
        }
    }

    pub fn session_count(&self) -> Result<usize, ChatError> {
        Ok(self.lock_sessions()?.len())
    }

    fn start(&self, session: &mut Session, now: NaiveDateTime) {
        let report = self
            .dispatcher
            .handle_turn(&mut session.store, &TurnInput::new(intents::SESSION_START));
        session.turns = 0;
        session.started_at = now;
        session.last_active = now;
        session.record(&report, now);
    }

    /// A zero timeout disables expiry.
    fn is_expired(&self, session: &Session, now: NaiveDateTime) -> bool {
        if self.config.timeout_minutes == 0 {
            return false;
        }
        now - session.last_active > Duration::minutes(i64::from(self.config.timeout_minutes))
    }

    fn session(&self, id: Uuid) -> Result<Arc<Mutex<Session>>, ChatError> {
        self.lock_sessions()?
            .get(&id)
            .cloned()
            .ok_or(ChatError::SessionNotFound(id))
    }

    fn lock_sessions(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, Arc<Mutex<Session>>>>, ChatError> {
        self.sessions
            .lock()
            .map_err(|e| ChatError::LockPoisoned(format!("sessions: {}", e)))
    }
}

// =============================================================================
// Tests
// =============================================================================
