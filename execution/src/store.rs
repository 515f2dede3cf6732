//! Single source of truth for meters and balances.
//!
//! Every dispatched [Action] is reduced against the current record and the
//! whole record is written back to [Storage] before the call returns.
//! Persistence is best effort: failures are logged and the in-memory record
//! stays authoritative for the rest of the session.

use casino_church_types::{ProgressState, Realm, STORAGE_KEY};
use tracing::{debug, warn};

use crate::{
    clock::Clock,
    state::Storage,
    state_transition::{reduce, Action},
};

pub struct ProgressStore<S: Storage, C: Clock> {
    state: ProgressState,
    storage: S,
    clock: C,
}

impl<S: Storage, C: Clock> ProgressStore<S, C> {
    /// Load the persisted record, falling back to defaults when it is
    /// missing, unreadable or malformed.
    pub fn open(storage: S, clock: C) -> Self {
        let now = clock.now_ms();
        let state = match storage.load(STORAGE_KEY) {
            Ok(Some(raw)) => match ProgressState::from_json(&raw) {
                Ok(state) => state.sanitized(),
                Err(e) => {
                    warn!("Malformed progress record, using defaults: {}", e);
                    ProgressState::new(now)
                }
            },
            Ok(None) => {
                debug!("No stored progress, using defaults");
                ProgressState::new(now)
            }
            Err(e) => {
                warn!("Storage error during load operation: {}", e);
                ProgressState::new(now)
            }
        };
        Self {
            state,
            storage,
            clock,
        }
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Apply `action`, persist, and return the new record.
    pub fn dispatch(&mut self, action: Action) -> &ProgressState {
        let now = self.clock.now_ms();
        self.state = reduce(&self.state, action, now);
        debug!(
            ?action,
            luck = self.state.luck_progress,
            faith = self.state.faith_progress,
            "progress updated"
        );
        self.persist();
        &self.state
    }

    fn persist(&mut self) {
        let raw = match self.state.to_json() {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to encode progress: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.store(STORAGE_KEY, &raw) {
            warn!("Storage error during store operation: {}", e);
        }
    }

    pub fn update_luck_progress(&mut self, delta: f64) -> &ProgressState {
        self.dispatch(Action::UpdateLuckProgress(delta))
    }

    pub fn update_faith_progress(&mut self, delta: f64) -> &ProgressState {
        self.dispatch(Action::UpdateFaithProgress(delta))
    }

    pub fn update_casino_balance(&mut self, delta: f64) -> &ProgressState {
        self.dispatch(Action::UpdateCasinoBalance(delta))
    }

    pub fn update_church_balance(&mut self, delta: f64) -> &ProgressState {
        self.dispatch(Action::UpdateChurchBalance(delta))
    }

    pub fn set_last_casino_time(&mut self) -> &ProgressState {
        self.dispatch(Action::SetLastCasinoTime)
    }

    pub fn set_last_church_time(&mut self) -> &ProgressState {
        self.dispatch(Action::SetLastChurchTime)
    }

    pub fn apply_cross_realm_decay(&mut self) -> &ProgressState {
        self.dispatch(Action::ApplyCrossRealmDecay)
    }

    pub fn enter_realm(&mut self, realm: Realm) -> &ProgressState {
        self.dispatch(Action::EnterRealm(realm))
    }

    pub fn reset_progress(&mut self) -> &ProgressState {
        self.dispatch(Action::ResetProgress)
    }
}
