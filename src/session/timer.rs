//! Battle clock.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use super::events::{emit, EventSender, GameEvent};

/// Shared one-way flag. Once raised it stays raised.
#[derive(Debug, Clone, Default)]
pub struct Flag(Arc<AtomicBool>);

impl Flag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Counts whole seconds of battle into a shared counter and publishes a
/// [`GameEvent::TimerTick`] for each one.
///
/// The stop flag is checked on every wake-up, so no tick is counted after
/// [`BattleTimer::stop`] returns unless one was already being recorded.
#[derive(Debug)]
pub struct BattleTimer {
    stop: Flag,
    task: Option<JoinHandle<()>>,
}

impl BattleTimer {
    /// Start ticking every `period`, continuing from the value already in
    /// `elapsed`.
    pub fn start(elapsed: Arc<AtomicU64>, period: Duration, events: EventSender) -> Self {
        let stop = Flag::new();
        let flag = stop.clone();
        let period = period.max(Duration::from_millis(1));
        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if flag.is_raised() {
                    break;
                }
                let now = elapsed.fetch_add(1, Ordering::SeqCst) + 1;
                emit(&events, GameEvent::TimerTick(now));
            }
        });
        Self {
            stop,
            task: Some(task),
        }
    }

    /// Flag that stops this timer when raised. Other tasks may hold a clone.
    pub fn stop_flag(&self) -> Flag {
        self.stop.clone()
    }

    pub fn stop(&self) {
        self.stop.raise();
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_raised()
    }

    /// Stop the timer and wait for its task to exit.
    pub async fn shutdown(mut self) {
        self.stop.raise();
        if let Some(task) = self.task.take() {
            // No need to sit out the rest of the period once the flag is up.
            task.abort();
            let _ = task.await;
        }
    }
}

impl Drop for BattleTimer {
    fn drop(&mut self) {
        self.stop.raise();
    }
}
