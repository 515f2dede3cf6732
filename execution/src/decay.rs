//! Cross-realm decay.
//!
//! Time spent in one realm erodes the meter of the other: FAITH while the
//! player is at the casino, LUCK while they are at church. The active realm
//! is inferred from whichever entry timestamp is more recent.

use casino_church_types::{
    casino::{DECAY_GRACE_MS, DECAY_RATE_PER_MS, MAX_DECAY_PER_CALL},
    progress::clamp_meter,
    ProgressState, Realm,
};

/// Signed milliseconds from `then` to `now`.
fn elapsed(now: u64, then: u64) -> i128 {
    now as i128 - then as i128
}

/// Realm the player is currently in.
///
/// Casino only when the casino entry is strictly more recent; equal
/// timestamps resolve to [Realm::Church].
pub fn active_realm(now: u64, last_casino_time: u64, last_church_time: u64) -> Realm {
    if elapsed(now, last_casino_time) < elapsed(now, last_church_time) {
        Realm::Casino
    } else {
        Realm::Church
    }
}

/// Meter points to remove after `elapsed_ms` in the active realm.
///
/// Zero inside the grace window, otherwise 0.1 points per minute capped at
/// [MAX_DECAY_PER_CALL].
pub fn decay_amount(elapsed_ms: i128) -> f64 {
    if elapsed_ms <= DECAY_GRACE_MS as i128 {
        return 0.0;
    }
    (elapsed_ms as f64 * DECAY_RATE_PER_MS).min(MAX_DECAY_PER_CALL)
}

/// Attenuate the meter of the realm the player is not in.
pub fn apply_cross_realm_decay(state: &ProgressState, now: u64) -> ProgressState {
    let realm = active_realm(now, state.last_casino_time, state.last_church_time);
    let amount = decay_amount(elapsed(now, state.last_time(realm)));
    let mut next = state.clone();
    match realm {
        Realm::Casino => next.faith_progress = clamp_meter(next.faith_progress - amount),
        Realm::Church => next.luck_progress = clamp_meter(next.luck_progress - amount),
    }
    next
}
