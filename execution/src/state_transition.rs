use casino_church_types::{
    progress::{clamp_meter, floor_balance},
    ProgressState, Realm,
};

use crate::decay::apply_cross_realm_decay;

/// A mutation of the progress record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    UpdateLuckProgress(f64),
    UpdateFaithProgress(f64),
    UpdateCasinoBalance(f64),
    UpdateChurchBalance(f64),
    SetLastCasinoTime,
    SetLastChurchTime,
    ApplyCrossRealmDecay,
    /// Decay, then stamp the entered realm.
    EnterRealm(Realm),
    ResetProgress,
}

/// Apply `action` at wall-clock time `now`.
///
/// Meters are clamped to [0, 100] and balances floored at 0. Non-finite
/// deltas leave the record untouched.
pub fn reduce(state: &ProgressState, action: Action, now: u64) -> ProgressState {
    let mut next = state.clone();
    match action {
        Action::UpdateLuckProgress(delta) if delta.is_finite() => {
            next.luck_progress = clamp_meter(next.luck_progress + delta);
        }
        Action::UpdateFaithProgress(delta) if delta.is_finite() => {
            next.faith_progress = clamp_meter(next.faith_progress + delta);
        }
        Action::UpdateCasinoBalance(delta) if delta.is_finite() => {
            next.casino_balance = floor_balance(next.casino_balance + delta);
        }
        Action::UpdateChurchBalance(delta) if delta.is_finite() => {
            next.church_balance = floor_balance(next.church_balance + delta);
        }
        Action::UpdateLuckProgress(_)
        | Action::UpdateFaithProgress(_)
        | Action::UpdateCasinoBalance(_)
        | Action::UpdateChurchBalance(_) => {}
        Action::SetLastCasinoTime => next.last_casino_time = now,
        Action::SetLastChurchTime => next.last_church_time = now,
        Action::ApplyCrossRealmDecay => next = apply_cross_realm_decay(&next, now),
        Action::EnterRealm(realm) => {
            next = apply_cross_realm_decay(&next, now);
            match realm {
                Realm::Casino => next.last_casino_time = now,
                Realm::Church => next.last_church_time = now,
            }
        }
        Action::ResetProgress => next = ProgressState::new(now),
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_meter_updates_clamp() {
        let state = ProgressState::new(0);
        let up = reduce(&state, Action::UpdateLuckProgress(75.0), 0);
        assert_eq!(up.luck_progress, 100.0);
        let down = reduce(&state, Action::UpdateFaithProgress(-80.0), 0);
        assert_eq!(down.faith_progress, 0.0);
    }

    #[test]
    fn test_balance_floor() {
        let state = ProgressState::new(0);
        let next = reduce(&state, Action::UpdateCasinoBalance(-5_000.0), 0);
        assert_eq!(next.casino_balance, 0.0);
        let next = reduce(&state, Action::UpdateChurchBalance(-99.5), 0);
        assert_eq!(next.church_balance, 0.5);
    }

    #[test]
    fn test_non_finite_delta_ignored() {
        let state = ProgressState::new(0);
        assert_eq!(reduce(&state, Action::UpdateLuckProgress(f64::NAN), 0), state);
        assert_eq!(
            reduce(&state, Action::UpdateCasinoBalance(f64::INFINITY), 0),
            state
        );
    }

    #[test]
    fn test_timestamps() {
        let state = ProgressState::new(0);
        let next = reduce(&state, Action::SetLastCasinoTime, 7);
        assert_eq!((next.last_casino_time, next.last_church_time), (7, 0));
        let next = reduce(&next, Action::SetLastChurchTime, 9);
        assert_eq!((next.last_casino_time, next.last_church_time), (7, 9));
    }

    #[test]
    fn test_enter_realm_decays_before_stamping() {
        // Five minutes at church, then walk into the casino
        let state = ProgressState {
            last_casino_time: 0,
            last_church_time: 60_000,
            ..ProgressState::new(0)
        };
        let now = 360_000;
        let next = reduce(&state, Action::EnterRealm(Realm::Casino), now);
        assert!((next.luck_progress - 49.5).abs() < 1e-9);
        assert_eq!(next.faith_progress, 50.0);
        assert_eq!(next.last_casino_time, now);
        assert_eq!(next.last_church_time, 60_000);
    }

    #[test]
    fn test_reset() {
        let state = ProgressState {
            luck_progress: 3.0,
            casino_balance: 0.0,
            ..ProgressState::new(0)
        };
        assert_eq!(
            reduce(&state, Action::ResetProgress, 11),
            ProgressState::new(11)
        );
    }

    proptest! {
        #[test]
        fn meters_stay_in_range(deltas in proptest::collection::vec(-250.0f64..250.0, 0..64)) {
            let mut state = ProgressState::new(0);
            for (i, delta) in deltas.into_iter().enumerate() {
                let action = if i % 2 == 0 {
                    Action::UpdateLuckProgress(delta)
                } else {
                    Action::UpdateFaithProgress(delta)
                };
                state = reduce(&state, action, 0);
                prop_assert!((0.0..=100.0).contains(&state.luck_progress));
                prop_assert!((0.0..=100.0).contains(&state.faith_progress));
            }
        }

        #[test]
        fn balance_never_negative(deltas in proptest::collection::vec(-5_000.0f64..2_000.0, 0..64)) {
            let mut state = ProgressState::new(0);
            for delta in deltas {
                state = reduce(&state, Action::UpdateCasinoBalance(delta), 0);
                prop_assert!(state.casino_balance >= 0.0);
            }
        }
    }
}
