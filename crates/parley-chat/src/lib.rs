//! Conversation layer for Parley.
//!
//! Per-session slot storage, the turn dispatcher that commits action
//! mutations atomically, and the session manager hosts drive turns through.

pub mod dispatcher;
pub mod error;
pub mod session;
pub mod slot_store;

pub use dispatcher::{Dispatcher, TurnReport, TurnResolution};
pub use error::ChatError;
pub use session::{MutationRecord, Session, SessionManager};
pub use slot_store::SlotStore;
