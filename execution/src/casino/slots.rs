//! Three-reel slot machine.
//!
//! A spin moves through `Idle -> Spinning -> Settling -> Idle`. The bet is
//! taken from the casino balance when the reels start. Winnings land in an
//! unclaimed pot and only reach the balance on [SlotMachine::cashout].
//!
//! Payouts:
//! - three of a kind: 3x bet
//! - any two matching: 2x bet
//! - otherwise: nothing

use casino_church_types::casino::{
    Reels, SlotPhase, SlotRound, Symbol, SLOT_LOSS_LUCK, SLOT_WIN_LUCK,
};
use thiserror::Error;
use tracing::debug;

use super::Randomness;
use crate::{
    clock::Clock,
    notify::{Notifier, Silent},
    state::Storage,
    store::ProgressStore,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SlotError {
    #[error("bet must be a positive amount (got {0})")]
    InvalidBet(f64),
    #[error("bet {bet} exceeds balance {balance}")]
    InsufficientFunds { bet: f64, balance: f64 },
    #[error("reels are still spinning")]
    Busy,
    #[error("no spin to settle")]
    NotSpinning,
    #[error("no winnings to claim")]
    NothingToClaim,
}

/// Bet for one of the percentage buttons: `pct` percent of `balance`,
/// rounded down, never below 1.
pub fn bet_for_percent(balance: f64, pct: f64) -> f64 {
    (balance * pct / 100.0).floor().max(1.0)
}

/// Draw one reel.
pub fn draw_symbol<R: Randomness + ?Sized>(rng: &mut R) -> Symbol {
    Symbol::ALL[rng.index(Symbol::ALL.len())]
}

pub struct SlotMachine {
    phase: SlotPhase,
    unclaimed: f64,
    notifier: Box<dyn Notifier>,
}

impl Default for SlotMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotMachine {
    pub fn new() -> Self {
        Self::with_notifier(Box::new(Silent))
    }

    pub fn with_notifier(notifier: Box<dyn Notifier>) -> Self {
        Self {
            phase: SlotPhase::Idle,
            unclaimed: 0.0,
            notifier,
        }
    }

    pub fn phase(&self) -> SlotPhase {
        self.phase
    }

    /// Winnings not yet moved into the casino balance.
    pub fn unclaimed(&self) -> f64 {
        self.unclaimed
    }

    pub fn notifier_mut(&mut self) -> &mut dyn Notifier {
        self.notifier.as_mut()
    }

    /// Take `bet` from the casino balance and start the reels.
    ///
    /// Rejected bets leave the machine and the balance untouched. A machine
    /// still showing a settled round is finished implicitly.
    pub fn play<S, C, R>(
        &mut self,
        store: &mut ProgressStore<S, C>,
        rng: &mut R,
        bet: f64,
    ) -> Result<Reels, SlotError>
    where
        S: Storage,
        C: Clock,
        R: Randomness + ?Sized,
    {
        if matches!(self.phase, SlotPhase::Spinning { .. }) {
            return Err(SlotError::Busy);
        }
        if !bet.is_finite() || bet <= 0.0 {
            return Err(SlotError::InvalidBet(bet));
        }
        let balance = store.state().casino_balance;
        if bet > balance {
            return Err(SlotError::InsufficientFunds { bet, balance });
        }

        self.notifier.play_hit();
        store.update_casino_balance(-bet);
        let reels: Reels = std::array::from_fn(|_| draw_symbol(&mut *rng));
        debug!(bet, reels = ?reels, "slot spin started");
        self.phase = SlotPhase::Spinning { bet, reels };
        Ok(reels)
    }

    /// Score the spinning reels.
    ///
    /// Wins go to the unclaimed pot and raise LUCK; losses lower it.
    pub fn settle<S, C>(&mut self, store: &mut ProgressStore<S, C>) -> Result<SlotRound, SlotError>
    where
        S: Storage,
        C: Clock,
    {
        let SlotPhase::Spinning { bet, reels } = self.phase else {
            return Err(SlotError::NotSpinning);
        };
        let round = SlotRound::new(bet, reels);
        if round.is_win() {
            self.unclaimed += round.payout;
            store.update_luck_progress(SLOT_WIN_LUCK);
            self.notifier.play_success();
        } else {
            store.update_luck_progress(SLOT_LOSS_LUCK);
        }
        debug!(
            bet,
            payout = round.payout,
            unclaimed = self.unclaimed,
            "slot spin settled"
        );
        self.phase = SlotPhase::Settling { round };
        Ok(round)
    }

    /// Return to idle once the settled round has been shown.
    pub fn finish(&mut self) {
        if matches!(self.phase, SlotPhase::Settling { .. }) {
            self.phase = SlotPhase::Idle;
        }
    }

    /// Play, settle and finish in one step.
    pub fn spin<S, C, R>(
        &mut self,
        store: &mut ProgressStore<S, C>,
        rng: &mut R,
        bet: f64,
    ) -> Result<SlotRound, SlotError>
    where
        S: Storage,
        C: Clock,
        R: Randomness + ?Sized,
    {
        self.play(store, rng, bet)?;
        let round = self.settle(store)?;
        self.finish();
        Ok(round)
    }

    /// Move every unclaimed win into the casino balance.
    pub fn cashout<S, C>(&mut self, store: &mut ProgressStore<S, C>) -> Result<f64, SlotError>
    where
        S: Storage,
        C: Clock,
    {
        self.notifier.play_hit();
        if self.unclaimed <= 0.0 {
            return Err(SlotError::NothingToClaim);
        }
        let claimed = std::mem::take(&mut self.unclaimed);
        store.update_casino_balance(claimed);
        debug!(claimed, "slot winnings claimed");
        Ok(claimed)
    }
}
