//! A single player's seat: progress, slot machine and memecoin session.

use casino_church_execution::{
    casino::{
        memecoin::{MemecoinError, MemecoinGame},
        slots::{SlotError, SlotMachine},
        GameRng,
    },
    decay::active_realm,
    notify::Logged,
    Clock, ProgressStore, Storage, SystemClock,
};
use casino_church_types::{
    casino::{MemecoinPhase, Order, Outcome, SlotPhase, SlotRound},
    ProgressState, Realm,
};
use serde::Serialize;

pub type TableStorage = Box<dyn Storage + Send>;

pub struct Table {
    store: ProgressStore<TableStorage, SystemClock>,
    slots: SlotMachine,
    memecoin: MemecoinGame,
    rng: GameRng,
    seed: u64,
    session: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressView {
    #[serde(flatten)]
    pub progress: ProgressState,
    pub active_realm: Realm,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsView {
    #[serde(flatten)]
    pub phase: SlotPhase,
    pub unclaimed: f64,
    pub balance: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinView {
    pub round: SlotRound,
    pub unclaimed: f64,
    pub balance: f64,
    pub luck: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashoutView {
    pub claimed: f64,
    pub balance: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemecoinView {
    #[serde(flatten)]
    pub phase: MemecoinPhase,
    pub price: f64,
    pub holdings: f64,
    pub cash: f64,
    pub initial_value: f64,
    pub total_value: f64,
    pub profit_loss: f64,
    pub profit_loss_percent: f64,
    pub ticks: u64,
    pub history: Vec<f64>,
    pub orders: Vec<Order>,
}

#[derive(Debug, Serialize)]
pub struct BuyView {
    pub order: Order,
    pub memecoin: MemecoinView,
}

#[derive(Debug, Serialize)]
pub struct SellView {
    pub outcome: Outcome,
    pub memecoin: MemecoinView,
}

impl Table {
    pub fn new(storage: TableStorage, seed: u64) -> Self {
        let store = ProgressStore::open(storage, SystemClock);
        let memecoin = MemecoinGame::with_notifier(&store, Box::new(Logged::default()));
        Self {
            store,
            slots: SlotMachine::with_notifier(Box::new(Logged::default())),
            memecoin,
            rng: GameRng::new(seed, 0),
            seed,
            session: 0,
        }
    }

    pub fn progress(&self) -> ProgressView {
        let progress = self.store.state().clone();
        let active_realm = active_realm(
            self.store.clock().now_ms(),
            progress.last_casino_time,
            progress.last_church_time,
        );
        ProgressView {
            progress,
            active_realm,
        }
    }

    pub fn reset_progress(&mut self) -> ProgressView {
        self.store.reset_progress();
        self.progress()
    }

    pub fn enter_realm(&mut self, realm: Realm) -> ProgressView {
        self.store.enter_realm(realm);
        self.progress()
    }

    pub fn apply_decay(&mut self) {
        self.store.apply_cross_realm_decay();
    }

    pub fn slots(&self) -> SlotsView {
        SlotsView {
            phase: self.slots.phase(),
            unclaimed: self.slots.unclaimed(),
            balance: self.store.state().casino_balance,
        }
    }

    pub fn spin(&mut self, bet: f64) -> Result<SpinView, SlotError> {
        let round = self.slots.spin(&mut self.store, &mut self.rng, bet)?;
        let state = self.store.state();
        Ok(SpinView {
            round,
            unclaimed: self.slots.unclaimed(),
            balance: state.casino_balance,
            luck: state.luck_progress,
        })
    }

    pub fn cashout(&mut self) -> Result<CashoutView, SlotError> {
        let claimed = self.slots.cashout(&mut self.store)?;
        Ok(CashoutView {
            claimed,
            balance: self.store.state().casino_balance,
        })
    }

    pub fn memecoin(&self) -> MemecoinView {
        let game = &self.memecoin;
        MemecoinView {
            phase: game.phase(),
            price: game.price(),
            holdings: game.holdings(),
            cash: game.cash(),
            initial_value: game.initial_value(),
            total_value: game.total_value(),
            profit_loss: game.profit_loss(),
            profit_loss_percent: game.profit_loss_percent(),
            ticks: game.ticks(),
            history: game.history().collect(),
            orders: game.orders().cloned().collect(),
        }
    }

    pub fn is_memecoin_running(&self) -> bool {
        self.memecoin.is_running()
    }

    pub fn buy(&mut self, amount: f64) -> Result<BuyView, MemecoinError> {
        let order = self.memecoin.buy(&mut self.store, amount)?;
        Ok(BuyView {
            order,
            memecoin: self.memecoin(),
        })
    }

    pub fn sell(&mut self, amount: f64) -> Result<SellView, MemecoinError> {
        let outcome = self.memecoin.sell(&mut self.store, amount)?;
        Ok(SellView {
            outcome,
            memecoin: self.memecoin(),
        })
    }

    /// Advance the price. Returns the outcome once the session is over.
    pub fn tick_memecoin(&mut self) -> Result<Option<Outcome>, MemecoinError> {
        self.memecoin.tick(&mut self.store, &mut self.rng)
    }

    /// Fresh session against the current balance, on a fresh draw sequence.
    pub fn reset_memecoin(&mut self) -> MemecoinView {
        self.session += 1;
        self.rng = GameRng::new(self.seed, self.session);
        self.memecoin.reset(&self.store);
        self.memecoin()
    }
}
