/// Minimum idle time in a realm before the other realm's meter decays (ms).
pub const DECAY_GRACE_MS: i64 = 30_000;

/// Meter points lost per millisecond away from a realm (0.1 per minute).
pub const DECAY_RATE_PER_MS: f64 = 0.1 / 60_000.0;

/// Most meter points a single decay pass may remove.
pub const MAX_DECAY_PER_CALL: f64 = 1.0;

/// Period of the cross-realm decay timer while a realm is active (ms).
pub const DECAY_INTERVAL_MS: u64 = 30_000;

/// Number of symbols on each slot reel.
pub const SLOT_SYMBOL_COUNT: usize = 6;

/// Number of reels on the slot machine.
pub const SLOT_REELS: usize = 3;

/// Payout multiplier when all three reels match.
pub const SLOT_TRIPLE_MULTIPLIER: f64 = 3.0;

/// Payout multiplier when exactly two reels match.
pub const SLOT_PAIR_MULTIPLIER: f64 = 2.0;

/// LUCK change after a winning spin.
pub const SLOT_WIN_LUCK: f64 = 1.5;

/// LUCK change after a losing spin.
pub const SLOT_LOSS_LUCK: f64 = -0.8;

/// Memecoin opening price.
pub const MEMECOIN_START_PRICE: f64 = 1.0;

/// Memecoin price floor; reaching it crashes the session.
pub const MEMECOIN_PRICE_FLOOR: f64 = 0.01;

/// Probability of a pump on a price tick.
pub const MEMECOIN_PUMP_CHANCE: f64 = 0.15;

/// Cumulative probability of a pump or a dump on a price tick.
pub const MEMECOIN_DUMP_CHANCE: f64 = 0.30;

/// Pump multiplier range.
pub const MEMECOIN_PUMP_RANGE: (f64, f64) = (1.5, 4.0);

/// Dump multiplier range.
pub const MEMECOIN_DUMP_RANGE: (f64, f64) = (0.0, 0.5);

/// Ordinary drift multiplier range.
pub const MEMECOIN_DRIFT_RANGE: (f64, f64) = (0.8, 1.2);

/// Period of the memecoin price timer (ms).
pub const MEMECOIN_TICK_INTERVAL_MS: u64 = 800;

/// Prices kept in a session's history.
pub const MEMECOIN_HISTORY_LEN: usize = 50;

/// Orders kept in a session's order book.
pub const MEMECOIN_ORDER_HISTORY_LEN: usize = 10;

/// LUCK change when a session crashes.
pub const MEMECOIN_CRASH_LUCK: f64 = -3.5;

/// LUCK change when a session ends in profit.
pub const MEMECOIN_PROFIT_LUCK: f64 = 4.2;

/// LUCK change when a session ends at breakeven or a loss.
pub const MEMECOIN_LOSS_LUCK: f64 = -0.5;
