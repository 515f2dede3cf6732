//! Casino game execution module.
//!
//! This module contains the game logic for the casino realm:
//! - Slots
//! - Memecoin

pub mod memecoin;
pub mod slots;

use commonware_cryptography::sha256::Sha256;
use commonware_cryptography::Hasher;
use rand::{rngs::StdRng, Rng};

/// Source of uniform draws for game rules.
pub trait Randomness {
    /// Uniform value in [0.0, 1.0).
    fn next_unit(&mut self) -> f64;

    /// Uniform value in [low, high).
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + self.next_unit() * (high - low)
    }

    /// Uniform index in [0, len). `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        ((self.next_unit() * len as f64) as usize).min(len.saturating_sub(1))
    }
}

impl Randomness for StdRng {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Deterministic random number generator for replayable sessions.
///
/// Uses SHA256 hash chains seeded from a table seed and a session id, so the
/// same pair always replays the same draws.
#[derive(Clone)]
pub struct GameRng {
    state: [u8; 32],
    index: usize,
}

impl GameRng {
    /// Create a new RNG from a seed and session ID.
    pub fn new(seed: u64, session_id: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(&seed.to_be_bytes());
        hasher.update(&session_id.to_be_bytes());
        Self {
            state: hasher.finalize().0,
            index: 0,
        }
    }

    /// Get the next random byte.
    fn next_byte(&mut self) -> u8 {
        if self.index >= 32 {
            // Rehash to get more bytes
            let mut hasher = Sha256::new();
            hasher.update(&self.state);
            self.state = hasher.finalize().0;
            self.index = 0;
        }
        let result = self.state[self.index];
        self.index += 1;
        result
    }

    /// Get a random u64 value.
    pub fn next_u64(&mut self) -> u64 {
        (0..8).fold(0u64, |acc, _| (acc << 8) | self.next_byte() as u64)
    }
}

impl Randomness for GameRng {
    fn next_unit(&mut self) -> f64 {
        // 53 bits fill an f64 mantissa exactly
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}
