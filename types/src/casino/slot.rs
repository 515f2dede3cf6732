use serde::{Deserialize, Serialize};
use std::fmt;

use super::{SLOT_PAIR_MULTIPLIER, SLOT_REELS, SLOT_SYMBOL_COUNT, SLOT_TRIPLE_MULTIPLIER};

/// Slot reel symbols.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Symbol {
    Bell = 0,
    Mango = 1,
    Corn = 2,
    Apple = 3,
    Tomato = 4,
    Banana = 5,
}

impl Symbol {
    /// Every symbol, in reel order.
    pub const ALL: [Symbol; SLOT_SYMBOL_COUNT] = [
        Symbol::Bell,
        Symbol::Mango,
        Symbol::Corn,
        Symbol::Apple,
        Symbol::Tomato,
        Symbol::Banana,
    ];

    pub fn glyph(self) -> &'static str {
        match self {
            Symbol::Bell => "🔔",
            Symbol::Mango => "🥭",
            Symbol::Corn => "🌽",
            Symbol::Apple => "🍏",
            Symbol::Tomato => "🍅",
            Symbol::Banana => "🍌",
        }
    }
}

impl TryFrom<u8> for Symbol {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Symbol::ALL.get(value as usize).copied().ok_or(value)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

/// The three symbols under the payline.
pub type Reels = [Symbol; SLOT_REELS];

/// Payout tier of a set of reels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Match {
    Triple,
    Pair,
    None,
}

impl Match {
    pub fn of(reels: &Reels) -> Self {
        let [a, b, c] = *reels;
        if a == b && b == c {
            Match::Triple
        } else if a == b || b == c || a == c {
            Match::Pair
        } else {
            Match::None
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            Match::Triple => SLOT_TRIPLE_MULTIPLIER,
            Match::Pair => SLOT_PAIR_MULTIPLIER,
            Match::None => 0.0,
        }
    }
}

/// Payout for `bet` on `reels`: 3x for three of a kind, 2x for a pair, else 0.
pub fn payout(reels: &Reels, bet: f64) -> f64 {
    Match::of(reels).multiplier() * bet
}

/// Where a slot machine is in its spin cycle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum SlotPhase {
    Idle,
    Spinning { bet: f64, reels: Reels },
    Settling { round: SlotRound },
}

/// A settled spin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlotRound {
    pub bet: f64,
    pub reels: Reels,
    pub outcome: Match,
    pub payout: f64,
}

impl SlotRound {
    pub fn new(bet: f64, reels: Reels) -> Self {
        let outcome = Match::of(&reels);
        Self {
            bet,
            reels,
            outcome,
            payout: outcome.multiplier() * bet,
        }
    }

    pub fn is_win(&self) -> bool {
        self.payout > 0.0
    }
}
