//! Memecoin price simulator.
//!
//! The player trades one coin against the casino balance. Prices start
//! ticking after the first buy and move by pumps, dumps and ordinary drift.
//! A session ends when the price hits the floor (crash), when the player has
//! neither cash nor coins (liquidation), or on any sell.
//!
//! Ended sessions accept nothing until [MemecoinGame::reset].

use std::collections::VecDeque;

use casino_church_types::casino::{
    luck_delta, round_cents, EndReason, MemecoinPhase, Order, OrderKind, Outcome,
    MEMECOIN_DRIFT_RANGE, MEMECOIN_DUMP_CHANCE, MEMECOIN_DUMP_RANGE, MEMECOIN_HISTORY_LEN,
    MEMECOIN_ORDER_HISTORY_LEN, MEMECOIN_PRICE_FLOOR, MEMECOIN_PUMP_CHANCE, MEMECOIN_PUMP_RANGE,
    MEMECOIN_START_PRICE,
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
pub enum MemecoinError {
    #[error("amount must be positive (got {0})")]
    InvalidAmount(f64),
    #[error("cost {cost} exceeds cash {cash}")]
    InsufficientCash { cost: f64, cash: f64 },
    #[error("cannot sell {amount}, holding {holdings}")]
    InsufficientHoldings { amount: f64, holdings: f64 },
    #[error("session has ended")]
    Ended,
    #[error("price is not ticking yet")]
    NotRunning,
}

/// Advance the price one tick.
pub fn next_price<R: Randomness + ?Sized>(price: f64, rng: &mut R) -> f64 {
    let roll = rng.next_unit();
    let (low, high) = if roll < MEMECOIN_PUMP_CHANCE {
        MEMECOIN_PUMP_RANGE
    } else if roll < MEMECOIN_DUMP_CHANCE {
        MEMECOIN_DUMP_RANGE
    } else {
        MEMECOIN_DRIFT_RANGE
    };
    (price * rng.uniform(low, high)).max(MEMECOIN_PRICE_FLOOR)
}

pub struct MemecoinGame {
    price: f64,
    holdings: f64,
    cash: f64,
    initial_value: f64,
    ticks: u64,
    history: VecDeque<f64>,
    orders: VecDeque<Order>,
    phase: MemecoinPhase,
    notifier: Box<dyn Notifier>,
}

impl MemecoinGame {
    /// Open a session funded by the current casino balance.
    pub fn new<S: Storage, C: Clock>(store: &ProgressStore<S, C>) -> Self {
        Self::with_notifier(store, Box::new(Silent))
    }

    pub fn with_notifier<S: Storage, C: Clock>(
        store: &ProgressStore<S, C>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let cash = store.state().casino_balance;
        Self {
            price: MEMECOIN_START_PRICE,
            holdings: 0.0,
            cash,
            initial_value: cash,
            ticks: 0,
            history: VecDeque::from([MEMECOIN_START_PRICE]),
            orders: VecDeque::new(),
            phase: MemecoinPhase::NotStarted,
            notifier,
        }
    }

    /// Start over with a fresh session against the current balance.
    pub fn reset<S: Storage, C: Clock>(&mut self, store: &ProgressStore<S, C>) {
        let notifier = std::mem::replace(&mut self.notifier, Box::new(Silent));
        *self = Self::with_notifier(store, notifier);
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn holdings(&self) -> f64 {
        self.holdings
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn initial_value(&self) -> f64 {
        self.initial_value
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn phase(&self) -> MemecoinPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == MemecoinPhase::Running
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.phase, MemecoinPhase::Ended { .. })
    }

    /// Recent prices, oldest first.
    pub fn history(&self) -> impl Iterator<Item = f64> + '_ {
        self.history.iter().copied()
    }

    /// Recent orders, newest first.
    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    pub fn total_value(&self) -> f64 {
        self.cash + self.holdings * self.price
    }

    pub fn profit_loss(&self) -> f64 {
        self.total_value() - self.initial_value
    }

    pub fn profit_loss_percent(&self) -> f64 {
        if self.initial_value > 0.0 {
            self.profit_loss() / self.initial_value * 100.0
        } else {
            0.0
        }
    }

    fn ensure_open(&self) -> Result<(), MemecoinError> {
        if self.is_ended() {
            return Err(MemecoinError::Ended);
        }
        Ok(())
    }

    fn sync_cash<S: Storage, C: Clock>(&mut self, store: &ProgressStore<S, C>) {
        self.cash = store.state().casino_balance;
    }

    fn record(&mut self, kind: OrderKind, amount: f64) -> Order {
        let order = Order {
            kind,
            amount,
            price: self.price,
            total: amount * self.price,
            tick: self.ticks,
        };
        self.orders.push_front(order.clone());
        self.orders.truncate(MEMECOIN_ORDER_HISTORY_LEN);
        order
    }

    /// Buy `amount` coins at the current price. The first buy starts the price.
    pub fn buy<S: Storage, C: Clock>(
        &mut self,
        store: &mut ProgressStore<S, C>,
        amount: f64,
    ) -> Result<Order, MemecoinError> {
        self.ensure_open()?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(MemecoinError::InvalidAmount(amount));
        }
        self.sync_cash(store);
        let cost = amount * self.price;
        if cost > self.cash {
            return Err(MemecoinError::InsufficientCash {
                cost,
                cash: self.cash,
            });
        }

        store.update_casino_balance(-cost);
        self.sync_cash(store);
        self.holdings += amount;
        if self.phase == MemecoinPhase::NotStarted {
            self.phase = MemecoinPhase::Running;
        }
        self.notifier.play_hit();
        debug!(amount, price = self.price, cost, "memecoin buy");
        Ok(self.record(OrderKind::Buy, amount))
    }

    /// Sell `amount` coins at the current price. Any sell ends the session.
    pub fn sell<S: Storage, C: Clock>(
        &mut self,
        store: &mut ProgressStore<S, C>,
        amount: f64,
    ) -> Result<Outcome, MemecoinError> {
        self.ensure_open()?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(MemecoinError::InvalidAmount(amount));
        }
        if amount > self.holdings {
            return Err(MemecoinError::InsufficientHoldings {
                amount,
                holdings: self.holdings,
            });
        }

        let revenue = amount * self.price;
        store.update_casino_balance(revenue);
        self.sync_cash(store);
        self.holdings -= amount;
        self.record(OrderKind::Sell, amount);
        self.notifier.play_hit();
        debug!(amount, price = self.price, revenue, "memecoin sell");
        let final_percent = self.profit_loss_percent();
        Ok(self.end(store, EndReason::Sold, final_percent))
    }

    /// Advance the price one tick and check the ending conditions.
    ///
    /// Returns the outcome if this tick ended the session.
    pub fn tick<S, C, R>(
        &mut self,
        store: &mut ProgressStore<S, C>,
        rng: &mut R,
    ) -> Result<Option<Outcome>, MemecoinError>
    where
        S: Storage,
        C: Clock,
        R: Randomness + ?Sized,
    {
        self.ensure_open()?;
        if !self.is_running() {
            return Err(MemecoinError::NotRunning);
        }
        self.sync_cash(store);
        self.price = next_price(self.price, rng);
        self.ticks += 1;
        self.history.push_back(self.price);
        while self.history.len() > MEMECOIN_HISTORY_LEN {
            self.history.pop_front();
        }

        if self.price <= MEMECOIN_PRICE_FLOOR {
            return Ok(Some(self.end(store, EndReason::Crash, -100.0)));
        }
        if self.cash <= 0.0 && self.holdings <= 0.0 {
            let final_percent = self.profit_loss_percent();
            return Ok(Some(self.end(store, EndReason::Liquidation, final_percent)));
        }
        Ok(None)
    }

    fn end<S: Storage, C: Clock>(
        &mut self,
        store: &mut ProgressStore<S, C>,
        reason: EndReason,
        final_percent: f64,
    ) -> Outcome {
        let delta = luck_delta(reason, final_percent);
        store.update_luck_progress(delta);
        if delta > 0.0 {
            self.notifier.play_success();
        }
        let outcome = Outcome {
            reason,
            final_percent: round_cents(final_percent),
            total_value: round_cents(self.total_value()),
            profit_loss: round_cents(self.profit_loss()),
        };
        debug!(%reason, final_percent = outcome.final_percent, "memecoin session ended");
        self.phase = MemecoinPhase::Ended { outcome };
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        casino::GameRng,
        mocks::{ManualClock, ScriptedRng},
        state::Memory,
    };

    fn store() -> ProgressStore<Memory, ManualClock> {
        ProgressStore::open(Memory::default(), ManualClock::new(1_000))
    }

    #[test]
    fn test_price_regimes() {
        // Pump at the top of its range
        let mut rng = ScriptedRng::new(vec![0.0, 0.999_999]);
        let price = next_price(1.0, &mut rng);
        assert!(price > 3.99 && price < 4.0);

        // Dump at the bottom of its range floors at 0.01
        let mut rng = ScriptedRng::new(vec![0.2, 0.0]);
        assert_eq!(next_price(1.0, &mut rng), MEMECOIN_PRICE_FLOOR);

        // Drift midpoint keeps the price
        let mut rng = ScriptedRng::new(vec![0.5, 0.5]);
        assert!((next_price(2.0, &mut rng) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_price_never_below_floor() {
        let mut rng = GameRng::new(11, 0);
        let mut price = MEMECOIN_START_PRICE;
        for _ in 0..10_000 {
            price = next_price(price, &mut rng);
            assert!(price >= MEMECOIN_PRICE_FLOOR);
            if price <= MEMECOIN_PRICE_FLOOR {
                price = MEMECOIN_START_PRICE;
            }
        }
    }

    #[test]
    fn test_ticks_wait_for_first_buy() {
        let mut store = store();
        let mut game = MemecoinGame::new(&store);
        let mut rng = ScriptedRng::new(vec![0.5]);
        assert_eq!(
            game.tick(&mut store, &mut rng),
            Err(MemecoinError::NotRunning)
        );
        assert_eq!(game.phase(), MemecoinPhase::NotStarted);

        game.buy(&mut store, 100.0).unwrap();
        assert!(game.is_running());
        assert_eq!(game.tick(&mut store, &mut rng), Ok(None));
        assert_eq!(game.ticks(), 1);
    }

    #[test]
    fn test_buy_validation() {
        let mut store = store();
        let mut game = MemecoinGame::new(&store);
        assert_eq!(
            game.buy(&mut store, 0.0),
            Err(MemecoinError::InvalidAmount(0.0))
        );
        assert_eq!(
            game.buy(&mut store, 1_000.01),
            Err(MemecoinError::InsufficientCash {
                cost: 1_000.01,
                cash: 1_000.0
            })
        );
        assert_eq!(game.phase(), MemecoinPhase::NotStarted);
        assert_eq!(store.state().casino_balance, 1_000.0);

        let order = game.buy(&mut store, 400.0).unwrap();
        assert_eq!(order.kind, OrderKind::Buy);
        assert_eq!(order.total, 400.0);
        assert_eq!(store.state().casino_balance, 600.0);
        assert_eq!(game.cash(), 600.0);
        assert_eq!(game.holdings(), 400.0);
        assert_eq!(game.total_value(), 1_000.0);
    }

    #[test]
    fn test_sell_ends_with_profit() {
        let mut store = store();
        let mut game = MemecoinGame::new(&store);
        game.buy(&mut store, 500.0).unwrap();

        // Pump by exactly 2x
        let mut rng = ScriptedRng::new(vec![0.0, 0.2]);
        assert_eq!(game.tick(&mut store, &mut rng), Ok(None));
        assert!((game.price() - 2.0).abs() < 1e-12);

        let outcome = game.sell(&mut store, 500.0).unwrap();
        assert_eq!(outcome.reason, EndReason::Sold);
        assert_eq!(outcome.total_value, 1_500.0);
        assert_eq!(outcome.profit_loss, 500.0);
        assert_eq!(outcome.final_percent, 50.0);
        assert_eq!(store.state().casino_balance, 1_500.0);
        assert!((store.state().luck_progress - 54.2).abs() < 1e-9);
        assert!(game.is_ended());
    }

    #[test]
    fn test_sell_ends_with_loss() {
        let mut store = store();
        let mut game = MemecoinGame::new(&store);
        game.buy(&mut store, 500.0).unwrap();

        // Drift down to 0.8
        let mut rng = ScriptedRng::new(vec![0.9, 0.0]);
        game.tick(&mut store, &mut rng).unwrap();

        // Partial sell still ends the session
        let outcome = game.sell(&mut store, 100.0).unwrap();
        assert_eq!(outcome.reason, EndReason::Sold);
        assert!(outcome.profit_loss < 0.0);
        assert_eq!(store.state().luck_progress, 49.5);
        assert_eq!(game.holdings(), 400.0);
    }

    #[test]
    fn test_breakeven_sell_counts_as_loss() {
        let mut store = store();
        let mut game = MemecoinGame::new(&store);
        game.buy(&mut store, 10.0).unwrap();
        let outcome = game.sell(&mut store, 10.0).unwrap();
        assert_eq!(outcome.final_percent, 0.0);
        assert_eq!(store.state().luck_progress, 49.5);
    }

    #[test]
    fn test_sell_validation() {
        let mut store = store();
        let mut game = MemecoinGame::new(&store);
        game.buy(&mut store, 10.0).unwrap();
        assert_eq!(
            game.sell(&mut store, 10.5),
            Err(MemecoinError::InsufficientHoldings {
                amount: 10.5,
                holdings: 10.0
            })
        );
        assert_eq!(
            game.sell(&mut store, -1.0),
            Err(MemecoinError::InvalidAmount(-1.0))
        );
        assert!(game.is_running());
    }

    #[test]
    fn test_crash() {
        let mut store = store();
        let mut game = MemecoinGame::new(&store);
        game.buy(&mut store, 100.0).unwrap();

        let mut rng = ScriptedRng::new(vec![0.2, 0.0]);
        let outcome = game.tick(&mut store, &mut rng).unwrap().unwrap();
        assert_eq!(outcome.reason, EndReason::Crash);
        assert_eq!(outcome.final_percent, -100.0);
        assert_eq!(game.price(), MEMECOIN_PRICE_FLOOR);
        assert_eq!(store.state().luck_progress, 46.5);
    }

    #[test]
    fn test_liquidation() {
        let mut store = store();
        let mut game = MemecoinGame::new(&store);
        game.buy(&mut store, 500.0).unwrap();
        // Balance drained elsewhere while holding
        store.update_casino_balance(-500.0);
        game.holdings = 0.0;

        let mut rng = ScriptedRng::new(vec![0.5, 0.5]);
        let outcome = game.tick(&mut store, &mut rng).unwrap().unwrap();
        assert_eq!(outcome.reason, EndReason::Liquidation);
        assert_eq!(outcome.final_percent, -100.0);
        assert_eq!(store.state().luck_progress, 49.5);
    }

    #[test]
    fn test_ended_rejects_everything() {
        let mut store = store();
        let mut game = MemecoinGame::new(&store);
        game.buy(&mut store, 10.0).unwrap();
        game.sell(&mut store, 10.0).unwrap();

        let mut rng = ScriptedRng::new(vec![0.5]);
        assert_eq!(game.buy(&mut store, 1.0), Err(MemecoinError::Ended));
        assert_eq!(game.sell(&mut store, 1.0), Err(MemecoinError::Ended));
        assert_eq!(game.tick(&mut store, &mut rng), Err(MemecoinError::Ended));

        game.reset(&store);
        assert_eq!(game.phase(), MemecoinPhase::NotStarted);
        assert_eq!(game.initial_value(), store.state().casino_balance);
        assert_eq!(game.orders().count(), 0);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut store = store();
        let mut game = MemecoinGame::new(&store);
        game.buy(&mut store, 1.0).unwrap();
        let mut rng = ScriptedRng::new(vec![0.5, 0.5]);
        for _ in 0..120 {
            game.tick(&mut store, &mut rng).unwrap();
        }
        assert_eq!(game.history().count(), MEMECOIN_HISTORY_LEN);
    }

    #[test]
    fn test_order_history_is_bounded() {
        let mut store = store();
        let mut game = MemecoinGame::new(&store);
        for _ in 0..15 {
            game.buy(&mut store, 1.0).unwrap();
        }
        assert_eq!(game.orders().count(), MEMECOIN_ORDER_HISTORY_LEN);
    }
}
