//! Game session: phases, turn arbitration, the battle clock and autosave.
//!
//! Both boards, the opponent and the RNG live in a single [`TurnToken`].
//! Whoever holds the token may fire. On a human miss the token moves into the
//! opponent's task and comes back when that turn is over; until then every
//! command that touches a board fails with [`GameError::NotYourTurn`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::sync::{mpsc, oneshot};

use crate::core::{Board, Coordinate, FleetTracker, Orientation, Ship, ShipKind, ShotResult};
use crate::persistence::{Autosaver, SavedSnapshot, SnapshotStore, DEFAULT_NICKNAME};
use crate::player::AiOpponent;

mod ai_turn;
pub mod error;
pub mod events;
pub mod timer;

use ai_turn::{AiOutcome, AiTurnContext, AiTurnReport, Cancel};
pub use error::GameError;
pub use events::{EventReceiver, EventSender, GameEvent, Phase, Side};
use events::emit;
pub use timer::{BattleTimer, Flag};

/// Tunables for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Pause before each opponent shot.
    pub ai_think_delay: Duration,
    /// Length of one battle-clock second.
    pub tick_interval: Duration,
    /// Seed for ship placement and targeting. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ai_think_delay: Duration::from_millis(1500),
            tick_interval: Duration::from_secs(1),
            seed: None,
        }
    }
}

/// The human's board and the opponent's board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Boards {
    pub player: Board,
    pub enemy: Board,
}

impl Boards {
    pub(crate) fn snapshot(&self, nickname: &str, elapsed_seconds: u64) -> SavedSnapshot {
        SavedSnapshot {
            player_board: self.player.clone(),
            enemy_board: self.enemy.clone(),
            nickname: nickname.to_string(),
            elapsed_seconds,
        }
    }
}

/// Everything a side needs to fire. There is exactly one per session.
pub(crate) struct TurnToken {
    pub boards: Boards,
    pub opponent: AiOpponent,
    pub rng: SmallRng,
}

struct PendingAiTurn {
    report: oneshot::Receiver<AiTurnReport>,
    cancel: Cancel,
    finished: Flag,
}

impl Drop for PendingAiTurn {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

enum Turn {
    Human(TurnToken),
    Ai(PendingAiTurn),
    /// The opponent task died holding the token.
    Aborted,
}

impl Turn {
    fn token(&self) -> Option<&TurnToken> {
        match self {
            Turn::Human(token) => Some(token),
            _ => None,
        }
    }

    fn token_mut(&mut self) -> Result<&mut TurnToken, GameError> {
        match self {
            Turn::Human(token) => Ok(token),
            Turn::Ai(_) => Err(GameError::NotYourTurn),
            Turn::Aborted => Err(GameError::SessionAborted),
        }
    }
}

fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_rng(&mut rand::rng()),
    }
}

/// Trim `raw` and reject empty or multi-line names.
pub fn validate_nickname(raw: &str) -> Result<String, GameError> {
    let name = raw.trim();
    if name.is_empty() || name.contains(['\n', '\r']) {
        return Err(GameError::InvalidNickname);
    }
    Ok(name.to_string())
}

/// A single human-versus-computer game.
///
/// Must be created and driven inside a tokio runtime: the battle clock, the
/// opponent's turns and autosaves all run as tasks.
pub struct GameSession {
    config: SessionConfig,
    nickname: String,
    phase: Phase,
    turn: Turn,
    placement: FleetTracker,
    elapsed: Arc<AtomicU64>,
    timer: Option<BattleTimer>,
    events: EventSender,
    autosave: Autosaver,
}

impl GameSession {
    /// New game in [`Phase::Placing`] against a random-firing opponent.
    pub fn new(
        nickname: &str,
        config: SessionConfig,
        store: Arc<dyn SnapshotStore>,
    ) -> Result<(Self, EventReceiver), GameError> {
        Self::with_opponent(nickname, config, store, AiOpponent::random())
    }

    /// New game against a custom opponent.
    pub fn with_opponent(
        nickname: &str,
        config: SessionConfig,
        store: Arc<dyn SnapshotStore>,
        opponent: AiOpponent,
    ) -> Result<(Self, EventReceiver), GameError> {
        let nickname = validate_nickname(nickname)?;
        let token = TurnToken {
            boards: Boards::default(),
            opponent,
            rng: make_rng(config.seed),
        };
        let (session, events) = Self::assemble(nickname, config, store, token, 0);
        log::info!("New game for {}", session.nickname);
        Ok((session, events))
    }

    /// Restore the last saved game from `store`, or `None` if nothing was saved.
    pub async fn load(
        config: SessionConfig,
        store: Arc<dyn SnapshotStore>,
    ) -> Result<Option<(Self, EventReceiver)>, GameError> {
        let Some(snapshot) = store.load().await? else {
            return Ok(None);
        };
        Ok(Some(Self::resume(snapshot, config, store)))
    }

    /// Continue from `snapshot` with the human to move. The clock resumes
    /// from the saved value. A snapshot where either fleet is already sunk
    /// comes back in [`Phase::GameOver`].
    pub fn resume(
        snapshot: SavedSnapshot,
        config: SessionConfig,
        store: Arc<dyn SnapshotStore>,
    ) -> (Self, EventReceiver) {
        let nickname = validate_nickname(&snapshot.nickname)
            .unwrap_or_else(|_| DEFAULT_NICKNAME.to_string());
        let token = TurnToken {
            boards: Boards {
                player: snapshot.player_board,
                enemy: snapshot.enemy_board,
            },
            opponent: AiOpponent::random(),
            rng: make_rng(config.seed),
        };
        let (mut session, events) =
            Self::assemble(nickname, config, store, token, snapshot.elapsed_seconds);

        if let Some(token) = session.turn.token() {
            session.placement = FleetTracker::for_board(&token.boards.player);
            let over =
                token.boards.player.all_ships_sunk() || token.boards.enemy.all_ships_sunk();
            session.phase = if over { Phase::GameOver } else { Phase::Battle };
        }
        if session.phase == Phase::Battle {
            session.start_timer();
        }
        log::info!(
            "Resumed game for {} at {}s ({:?})",
            session.nickname,
            session.elapsed_seconds(),
            session.phase
        );
        (session, events)
    }

    fn assemble(
        nickname: String,
        config: SessionConfig,
        store: Arc<dyn SnapshotStore>,
        token: TurnToken,
        elapsed_seconds: u64,
    ) -> (Self, EventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let autosave = Autosaver::spawn(store, tx.clone());
        let session = Self {
            config,
            nickname,
            phase: Phase::Placing,
            turn: Turn::Human(token),
            placement: FleetTracker::new(),
            elapsed: Arc::new(AtomicU64::new(elapsed_seconds)),
            timer: None,
            events: tx,
            autosave,
        };
        (session, rx)
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), GameError> {
        if self.phase != expected {
            return Err(GameError::WrongPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        log::info!("Phase changed to {phase:?}");
        emit(&self.events, GameEvent::PhaseChanged(phase));
    }

    fn start_timer(&mut self) {
        self.timer = Some(BattleTimer::start(
            Arc::clone(&self.elapsed),
            self.config.tick_interval,
            self.events.clone(),
        ));
    }

    fn stop_timer(&self) {
        if let Some(timer) = &self.timer {
            timer.stop();
        }
    }

    fn autosave_now(&self) {
        if let Some(token) = self.turn.token() {
            let snapshot = token.boards.snapshot(&self.nickname, self.elapsed_seconds());
            if !self.autosave.submit(snapshot) {
                log::warn!("Autosave worker is gone; skipping save");
            }
        }
    }

    /// Place one ship of the human fleet. Returns its fleet index.
    pub fn place_ship(
        &mut self,
        kind: ShipKind,
        start: Coordinate,
        orientation: Orientation,
    ) -> Result<usize, GameError> {
        self.expect_phase(Phase::Placing)?;
        if self.placement.remaining(kind) == 0 {
            return Err(crate::core::PlacementError::NoneRemaining(kind).into());
        }
        let token = self.turn.token_mut()?;
        let index = token
            .boards
            .player
            .place_ship(Ship::new(kind), start, orientation)?;
        self.placement.record(kind);
        log::debug!("Placed {kind} at {start} {orientation:?}");
        Ok(index)
    }

    /// Place every ship not yet placed at random. Returns how many were placed.
    pub fn place_remaining_randomly(&mut self) -> Result<usize, GameError> {
        self.expect_phase(Phase::Placing)?;
        let pending: Vec<ShipKind> = self.placement.pending().collect();
        let TurnToken { boards, rng, .. } = self.turn.token_mut()?;
        for &kind in &pending {
            boards.player.place_ship_randomly(kind, &mut *rng);
            self.placement.record(kind);
        }
        Ok(pending.len())
    }

    /// Ships of `kind` the human still has to place.
    pub fn remaining_to_place(&self, kind: ShipKind) -> usize {
        self.placement.remaining(kind)
    }

    pub fn placement(&self) -> &FleetTracker {
        &self.placement
    }

    /// Deploy the enemy fleet and start shooting, human first.
    pub fn start_battle(&mut self) -> Result<(), GameError> {
        self.expect_phase(Phase::Placing)?;
        if !self.placement.is_complete() {
            return Err(GameError::FleetIncomplete {
                remaining: self.placement.total_remaining(),
            });
        }
        let TurnToken { boards, rng, .. } = self.turn.token_mut()?;
        if boards.enemy.fleet().is_empty() {
            boards.enemy.place_ships_randomly(rng);
        }

        self.set_phase(Phase::Battle);
        emit(&self.events, GameEvent::TurnChanged(Side::Human));
        self.start_timer();
        self.autosave_now();
        Ok(())
    }

    /// Fire at the enemy board.
    ///
    /// Fails with [`GameError::NotYourTurn`] while the opponent is still
    /// shooting. If the opponent has just finished, its token is reclaimed
    /// first.
    pub async fn fire_at(&mut self, coord: Coordinate) -> Result<ShotResult, GameError> {
        self.expect_phase(Phase::Battle)?;
        self.reclaim(false).await?;
        self.expect_phase(Phase::Battle)?;

        let token = self.turn.token_mut()?;
        let result = token.boards.enemy.receive_shot(coord)?;
        log::debug!("{} fired at {coord}: {result:?}", self.nickname);

        emit(
            &self.events,
            GameEvent::ShotResolved {
                coordinate: coord,
                result,
                board: Side::Ai,
            },
        );
        if result == ShotResult::Sunk {
            if let Some(ship) = token.boards.enemy.ship_at(coord) {
                emit(
                    &self.events,
                    GameEvent::ShipSunk {
                        board: Side::Ai,
                        ship: ship.clone(),
                    },
                );
            }
        }
        let enemy_defeated = token.boards.enemy.all_ships_sunk();

        if enemy_defeated {
            self.stop_timer();
            self.autosave_now();
            self.set_phase(Phase::GameOver);
            emit(&self.events, GameEvent::GameOver { player_won: true });
            log::info!("{} sank the enemy fleet", self.nickname);
        } else {
            self.autosave_now();
            if result == ShotResult::Miss {
                self.hand_over_to_opponent();
            }
        }
        Ok(result)
    }

    fn hand_over_to_opponent(&mut self) {
        let Turn::Human(token) = std::mem::replace(&mut self.turn, Turn::Aborted) else {
            return;
        };
        emit(&self.events, GameEvent::TurnChanged(Side::Ai));

        let cancel = Cancel::default();
        let finished = Flag::new();
        let ctx = AiTurnContext {
            think_delay: self.config.ai_think_delay,
            nickname: self.nickname.clone(),
            elapsed: Arc::clone(&self.elapsed),
            events: self.events.clone(),
            autosave: self.autosave.handle(),
            cancel: cancel.clone(),
            finished: finished.clone(),
            timer_stop: self.timer.as_ref().map(BattleTimer::stop_flag),
        };
        let report = ai_turn::spawn(token, ctx);
        self.turn = Turn::Ai(PendingAiTurn {
            report,
            cancel,
            finished,
        });
    }

    /// Take the token back from the opponent task. Without `wait`, only a
    /// turn that has already finished is reclaimed.
    async fn reclaim(&mut self, wait: bool) -> Result<(), GameError> {
        let received = match &mut self.turn {
            Turn::Human(_) => return Ok(()),
            Turn::Aborted => return Err(GameError::SessionAborted),
            Turn::Ai(pending) => {
                if !wait && !pending.finished.is_raised() {
                    return Err(GameError::NotYourTurn);
                }
                (&mut pending.report).await
            }
        };

        match received {
            Ok(AiTurnReport { token, outcome }) => {
                self.turn = Turn::Human(token);
                if outcome == AiOutcome::Won {
                    self.stop_timer();
                    // The task already announced the game over.
                    self.phase = Phase::GameOver;
                }
                Ok(())
            }
            Err(_) => {
                log::error!("Opponent task ended without returning the turn");
                self.stop_timer();
                self.turn = Turn::Aborted;
                Err(GameError::SessionAborted)
            }
        }
    }

    /// Wait for the opponent to finish its turn. Returns the phase afterwards.
    pub async fn wait_for_turn(&mut self) -> Result<Phase, GameError> {
        self.reclaim(true).await?;
        Ok(self.phase)
    }

    /// Save now, behind any autosaves already queued.
    pub async fn save(&self) -> Result<(), GameError> {
        let token = self.turn.token().ok_or(GameError::NotYourTurn)?;
        let snapshot = token.boards.snapshot(&self.nickname, self.elapsed_seconds());
        self.autosave.save(snapshot).await?;
        Ok(())
    }

    async fn halt(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.shutdown().await;
        }
        if let Turn::Ai(pending) = &self.turn {
            pending.cancel.cancel();
        }
        if let Err(e) = self.reclaim(true).await {
            log::warn!("Could not reclaim the turn: {e}");
        }
    }

    /// Abandon the current game and start placing a fresh fleet under the
    /// same nickname.
    pub async fn restart(&mut self) -> Result<(), GameError> {
        self.halt().await;
        self.turn = match std::mem::replace(&mut self.turn, Turn::Aborted) {
            Turn::Human(mut token) => {
                token.boards = Boards::default();
                Turn::Human(token)
            }
            _ => Turn::Human(TurnToken {
                boards: Boards::default(),
                opponent: AiOpponent::random(),
                rng: make_rng(self.config.seed),
            }),
        };
        self.placement = FleetTracker::new();
        self.elapsed.store(0, Ordering::SeqCst);
        self.set_phase(Phase::Placing);
        Ok(())
    }

    /// Stop the clock and the opponent, then wait for queued saves to land.
    pub async fn close(mut self) -> Result<(), GameError> {
        self.halt().await;
        self.autosave.flush().await;
        let GameSession { autosave, .. } = self;
        autosave.shutdown().await;
        log::debug!("Session closed");
        Ok(())
    }

    /// Both boards, or `None` while the opponent holds them.
    pub fn boards(&self) -> Option<&Boards> {
        self.turn.token().map(|token| &token.boards)
    }

    pub fn player_board(&self) -> Option<&Board> {
        self.boards().map(|boards| &boards.player)
    }

    pub fn enemy_board(&self) -> Option<&Board> {
        self.boards().map(|boards| &boards.enemy)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Side holding the turn during battle.
    pub fn whose_turn(&self) -> Option<Side> {
        if self.phase != Phase::Battle {
            return None;
        }
        match &self.turn {
            Turn::Human(_) => Some(Side::Human),
            Turn::Ai(_) => Some(Side::Ai),
            Turn::Aborted => None,
        }
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed.load(Ordering::SeqCst)
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
