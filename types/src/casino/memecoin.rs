use serde::{Deserialize, Serialize};
use std::fmt;

use super::{MEMECOIN_CRASH_LUCK, MEMECOIN_LOSS_LUCK, MEMECOIN_PROFIT_LUCK};

/// Why a memecoin session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndReason {
    /// Price hit the floor.
    Crash,
    /// No cash and no holdings left.
    Liquidation,
    /// The player sold.
    Sold,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndReason::Crash => write!(f, "crash"),
            EndReason::Liquidation => write!(f, "liquidation"),
            EndReason::Sold => write!(f, "sold"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderKind {
    Buy,
    Sell,
}

/// A filled trade.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub kind: OrderKind,
    pub amount: f64,
    pub price: f64,
    pub total: f64,
    /// Price tick on which the order filled.
    pub tick: u64,
}

/// Final numbers of an ended session, rounded to cents.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub reason: EndReason,
    pub final_percent: f64,
    pub total_value: f64,
    pub profit_loss: f64,
}

impl Outcome {
    /// LUCK change awarded for this ending.
    pub fn luck_delta(&self) -> f64 {
        luck_delta(self.reason, self.final_percent)
    }
}

/// LUCK change for a session ending with `reason` at `final_percent` P/L.
pub fn luck_delta(reason: EndReason, final_percent: f64) -> f64 {
    match reason {
        EndReason::Crash => MEMECOIN_CRASH_LUCK,
        _ if final_percent > 0.0 => MEMECOIN_PROFIT_LUCK,
        _ => MEMECOIN_LOSS_LUCK,
    }
}

/// Round to two decimal places.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Session lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MemecoinPhase {
    /// No buy yet; the price is not ticking.
    NotStarted,
    Running,
    Ended { outcome: Outcome },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luck_delta() {
        assert_eq!(luck_delta(EndReason::Crash, 50.0), -3.5);
        assert_eq!(luck_delta(EndReason::Sold, 0.01), 4.2);
        assert_eq!(luck_delta(EndReason::Sold, 0.0), -0.5);
        assert_eq!(luck_delta(EndReason::Sold, -20.0), -0.5);
        assert_eq!(luck_delta(EndReason::Liquidation, -100.0), -0.5);
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(12.345_6), 12.35);
        assert_eq!(round_cents(-0.004), -0.0);
    }
}
