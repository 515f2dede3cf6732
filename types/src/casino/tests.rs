use super::*;
use proptest::prelude::*;

fn symbol() -> impl Strategy<Value = Symbol> {
    (0u8..6).prop_map(|i| Symbol::try_from(i).unwrap())
}

proptest! {
    #[test]
    fn payout_is_zero_two_or_three_times_bet(
        reels in [symbol(), symbol(), symbol()],
        bet in 1u32..100_000,
    ) {
        let bet = bet as f64;
        let paid = payout(&reels, bet);
        prop_assert!(paid == 0.0 || paid == 2.0 * bet || paid == 3.0 * bet);
    }

    #[test]
    fn payout_ignores_reel_order(a in symbol(), b in symbol(), c in symbol()) {
        let forward = payout(&[a, b, c], 10.0);
        prop_assert_eq!(forward, payout(&[c, b, a], 10.0));
        prop_assert_eq!(forward, payout(&[b, c, a], 10.0));
    }
}

#[test]
fn test_slot_phase_json() {
    let phase = SlotPhase::Spinning {
        bet: 50.0,
        reels: [Symbol::Bell, Symbol::Bell, Symbol::Apple],
    };
    let value = serde_json::to_value(phase).unwrap();
    assert_eq!(value["phase"], "spinning");
    assert_eq!(value["bet"], 50.0);

    let idle = serde_json::to_value(SlotPhase::Idle).unwrap();
    assert_eq!(idle["phase"], "idle");
}

#[test]
fn test_memecoin_phase_json() {
    let ended = MemecoinPhase::Ended {
        outcome: Outcome {
            reason: EndReason::Sold,
            final_percent: 12.5,
            total_value: 1_125.0,
            profit_loss: 125.0,
        },
    };
    let value = serde_json::to_value(ended).unwrap();
    assert_eq!(value["status"], "ended");
    assert_eq!(value["outcome"]["reason"], "sold");
    assert_eq!(value["outcome"]["finalPercent"], 12.5);

    let waiting = serde_json::to_value(MemecoinPhase::NotStarted).unwrap();
    assert_eq!(waiting["status"], "notStarted");
}

#[test]
fn test_outcome_luck() {
    let crash = Outcome {
        reason: EndReason::Crash,
        final_percent: -100.0,
        total_value: 0.0,
        profit_loss: -1_000.0,
    };
    assert_eq!(crash.luck_delta(), MEMECOIN_CRASH_LUCK);
}
