//! Deterministic stand-ins for the engine's collaborators.

use casino_church_types::casino::Symbol;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};

use crate::{
    casino::Randomness,
    clock::Clock,
    notify::Notifier,
    state::{Storage, StorageError},
};

/// Settable clock shared between clones.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(now: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(now)),
        }
    }

    pub fn set(&self, now: u64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Storage that rejects every read and write.
#[derive(Clone, Copy, Debug, Default)]
pub struct FailingStorage;

impl Storage for FailingStorage {
    fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("load disabled".to_string()))
    }

    fn store(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("quota exceeded".to_string()))
    }
}

/// Replays a fixed list of unit draws, wrapping around at the end.
#[derive(Clone, Debug)]
pub struct ScriptedRng {
    values: Vec<f64>,
    next: usize,
}

impl ScriptedRng {
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "script needs at least one value");
        Self { values, next: 0 }
    }

    /// Draws that land each reel on the given symbols, in order.
    pub fn symbols(symbols: &[Symbol]) -> Self {
        let len = Symbol::ALL.len() as f64;
        Self::new(
            symbols
                .iter()
                .map(|symbol| (*symbol as u8 as f64 + 0.5) / len)
                .collect(),
        )
    }
}

impl Randomness for ScriptedRng {
    fn next_unit(&mut self) -> f64 {
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}

/// Notifier that remembers every cue it was given.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    cues: Arc<Mutex<Vec<&'static str>>>,
}

impl Recorder {
    pub fn cues(&self) -> Vec<&'static str> {
        self.cues.lock().map(|cues| cues.clone()).unwrap_or_default()
    }

    fn push(&self, cue: &'static str) {
        if let Ok(mut cues) = self.cues.lock() {
            cues.push(cue);
        }
    }
}

impl Notifier for Recorder {
    fn play_hit(&self) {
        self.push("hit");
    }

    fn play_success(&self) {
        self.push("success");
    }

    fn toggle_mute(&mut self) -> bool {
        self.push("mute");
        true
    }
}
