//! Fixed-period game loops.
//!
//! A [Ticker] runs a transition on every tick of its period until the
//! transition returns [Flow::Stop] or the ticker is dropped. Dropping the
//! handle cancels the loop, so a view that owns a ticker cannot receive
//! updates after it has been torn down.

use std::time::Duration;
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

pub struct Ticker {
    period: Duration,
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Run `on_tick` every `period`, first after one full period.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> Flow + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if on_tick() == Flow::Stop {
                    break;
                }
            }
        });
        Self { period, handle }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// True once the transition asked to stop.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
