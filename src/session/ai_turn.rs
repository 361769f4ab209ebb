//! The opponent's turn, run as its own task.
//!
//! The session hands the whole [`TurnToken`] to the task, which gives it back
//! over a oneshot once the opponent misses, wins or is cancelled. While the
//! task holds the token the session cannot touch either board.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, Notify};

use super::events::{emit, EventSender, GameEvent, Phase, Side};
use super::timer::Flag;
use super::TurnToken;
use crate::core::ShotResult;
use crate::persistence::AutosaveHandle;

/// Cancellation signal for an opponent turn. Wakes the task out of its
/// thinking delay.
#[derive(Debug, Clone, Default)]
pub(crate) struct Cancel {
    flag: Flag,
    wake: Arc<Notify>,
}

impl Cancel {
    pub fn cancel(&self) {
        self.flag.raise();
        self.wake.notify_one();
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.is_raised()
    }

    async fn pause(&self, delay: Duration) {
        if delay.is_zero() {
            tokio::task::yield_now().await;
            return;
        }
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = self.wake.notified() => {}
        }
    }
}

/// How an opponent turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AiOutcome {
    /// The opponent missed or had nothing left to fire at.
    Yielded,
    /// The human fleet is sunk.
    Won,
    Cancelled,
}

pub(crate) struct AiTurnReport {
    pub token: TurnToken,
    pub outcome: AiOutcome,
}

pub(crate) struct AiTurnContext {
    pub think_delay: Duration,
    pub nickname: String,
    pub elapsed: Arc<AtomicU64>,
    pub events: EventSender,
    pub autosave: AutosaveHandle,
    pub cancel: Cancel,
    /// Raised by the task once the outcome is settled. The closing events and
    /// the token follow right after.
    pub finished: Flag,
    /// Battle timer to stop the moment the opponent wins.
    pub timer_stop: Option<Flag>,
}

/// Start the opponent's turn. The receiver resolves with the token when the
/// turn is over, or errors if the task panicked.
pub(crate) fn spawn(token: TurnToken, ctx: AiTurnContext) -> oneshot::Receiver<AiTurnReport> {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let report = run(token, &ctx).await;
        ctx.finished.raise();
        match report.outcome {
            AiOutcome::Yielded => emit(&ctx.events, GameEvent::TurnChanged(Side::Human)),
            AiOutcome::Won => {
                emit(&ctx.events, GameEvent::PhaseChanged(Phase::GameOver));
                emit(&ctx.events, GameEvent::GameOver { player_won: false });
            }
            AiOutcome::Cancelled => {}
        }
        if tx.send(report).is_err() {
            log::debug!("Opponent turn ended after the session went away");
        }
    });
    rx
}

async fn run(mut token: TurnToken, ctx: &AiTurnContext) -> AiTurnReport {
    token.opponent.begin_turn();
    let outcome = loop {
        ctx.cancel.pause(ctx.think_delay).await;
        if ctx.cancel.is_cancelled() {
            break AiOutcome::Cancelled;
        }

        let TurnToken {
            boards,
            opponent,
            rng,
        } = &mut token;
        let Some((coord, result)) = opponent.step(rng, &mut boards.player) else {
            break AiOutcome::Yielded;
        };
        log::debug!("Opponent fired at {coord}: {result:?}");

        emit(
            &ctx.events,
            GameEvent::ShotResolved {
                coordinate: coord,
                result,
                board: Side::Human,
            },
        );
        if result == ShotResult::Sunk {
            if let Some(ship) = boards.player.ship_at(coord) {
                emit(
                    &ctx.events,
                    GameEvent::ShipSunk {
                        board: Side::Human,
                        ship: ship.clone(),
                    },
                );
            }
        }

        let won = boards.player.all_ships_sunk();
        if won {
            if let Some(stop) = &ctx.timer_stop {
                stop.raise();
            }
        }
        ctx.autosave.submit(boards.snapshot(
            &ctx.nickname,
            ctx.elapsed.load(Ordering::SeqCst),
        ));

        if won {
            log::info!("Opponent sank the last ship of {}", ctx.nickname);
            break AiOutcome::Won;
        }
        if result == ShotResult::Miss {
            break AiOutcome::Yielded;
        }
    };
    AiTurnReport { token, outcome }
}
