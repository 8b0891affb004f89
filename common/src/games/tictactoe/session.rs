use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use crate::games::{GameEventSink, GameFinished, RandomSource, SessionRng};
use crate::id_generator::{generate_player_name, generate_room_code};
use crate::log;
use crate::scheduler::{Clock, Scheduler};
use crate::{PlayerId, RoomId};

use super::board::Board;
use super::game_state::GameState;
use super::settings::OnlineSettings;
use super::types::{GameMode, GameResult, Mark, MoveRejection, TurnState};

/// The human always takes this mark in an online room.
pub const ONLINE_HUMAN_MARK: Mark = Mark::X;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnlineRoom {
    pub room_id: RoomId,
    pub player: PlayerId,
    pub opponent: PlayerId,
    pub human_mark: Mark,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchSession {
    Idle,
    Connecting {
        player: PlayerId,
    },
    Searching {
        player: PlayerId,
    },
    Found {
        room: OnlineRoom,
    },
    InGame {
        room: OnlineRoom,
        game: GameState,
        turn: TurnState,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchmakingStatus {
    Searching,
    Found {
        opponent: PlayerId,
        room_id: RoomId,
        assigned: Mark,
    },
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnlineSnapshot {
    pub room_id: RoomId,
    pub opponent: PlayerId,
    pub board: Board,
    pub turn: TurnState,
    pub move_count: usize,
    pub human_mark: Mark,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionNotification {
    Connection(ConnectionStatus),
    Matchmaking(MatchmakingStatus),
    GameState(OnlineSnapshot),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionTimerKind {
    ConnectDone,
    SearchDone,
    FoundDone,
    OpponentReply { move_count: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SessionTimer {
    session: u64,
    kind: SessionTimerKind,
}

/// Simulated online play: fake connection and matchmaking latencies, then a
/// room against an opponent that answers with random cells.
pub struct SessionSynchronizer<C: Clock> {
    settings: OnlineSettings,
    clock: C,
    rng: SessionRng,
    notifications: mpsc::UnboundedSender<SessionNotification>,
    events: Box<dyn GameEventSink>,
    scheduler: Scheduler<SessionTimer>,
    session: MatchSession,
    session_id: u64,
}

impl<C: Clock> SessionSynchronizer<C> {
    pub fn new(
        settings: OnlineSettings,
        clock: C,
        rng: SessionRng,
        notifications: mpsc::UnboundedSender<SessionNotification>,
        events: Box<dyn GameEventSink>,
    ) -> Self {
        Self {
            settings,
            clock,
            rng,
            notifications,
            events,
            scheduler: Scheduler::new(),
            session: MatchSession::Idle,
            session_id: 0,
        }
    }

    pub fn state(&self) -> &MatchSession {
        &self.session
    }

    pub fn snapshot(&self) -> Option<OnlineSnapshot> {
        match &self.session {
            MatchSession::InGame { room, game, turn } => Some(OnlineSnapshot {
                room_id: room.room_id.clone(),
                opponent: room.opponent.clone(),
                board: *game.board(),
                turn: *turn,
                move_count: game.move_count(),
                human_mark: room.human_mark,
            }),
            _ => None,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Drops any current session and starts connecting as `player`.
    pub fn start_matchmaking(&mut self, player: PlayerId) {
        self.scheduler.cancel_all();
        self.session_id += 1;
        log!("[online] {} connecting", player);

        self.session = MatchSession::Connecting { player };
        self.notify(SessionNotification::Connection(ConnectionStatus::Connecting));
        self.schedule(self.settings.connect_delay(), SessionTimerKind::ConnectDone);
    }

    pub fn cancel_matchmaking(&mut self) {
        let in_matchmaking = matches!(
            self.session,
            MatchSession::Connecting { .. }
                | MatchSession::Searching { .. }
                | MatchSession::Found { .. }
        );
        if in_matchmaking {
            self.notify(SessionNotification::Matchmaking(MatchmakingStatus::Cancelled));
        }
        self.leave();
    }

    /// Discards the session and every pending timer. Safe to call when idle.
    pub fn leave(&mut self) {
        self.scheduler.cancel_all();
        if self.session == MatchSession::Idle {
            return;
        }

        log!("[online] Leaving session {}", self.session_id);
        self.session = MatchSession::Idle;
        self.session_id += 1;
        self.notify(SessionNotification::Connection(ConnectionStatus::Disconnected));
    }

    pub fn make_move(&mut self, index: usize) -> Result<(), MoveRejection> {
        let MatchSession::InGame { room, game, turn } = &mut self.session else {
            return Err(MoveRejection::NotInGame);
        };
        match turn {
            TurnState::HumanTurn(_) => {}
            TurnState::GameOver(_) => return Err(MoveRejection::GameOver),
            TurnState::AiTurn(_) | TurnState::RemoteTurn(_) => {
                return Err(MoveRejection::NotYourTurn);
            }
        }

        let result = game.place(index)?;
        let move_count = game.move_count();
        if result.is_terminal() {
            *turn = TurnState::GameOver(result);
        } else {
            *turn = TurnState::RemoteTurn(room.human_mark.opponent());
        }

        if result.is_terminal() {
            self.finish(result, move_count);
        } else {
            self.schedule(
                self.settings.opponent_reply_delay(),
                SessionTimerKind::OpponentReply { move_count },
            );
        }
        self.notify_snapshot();
        Ok(())
    }

    /// Starts a fresh board in the current room.
    pub fn reset_game(&mut self) -> Result<(), MoveRejection> {
        let MatchSession::InGame { room, game, turn } = &mut self.session else {
            return Err(MoveRejection::NotInGame);
        };
        *game = GameState::new();
        *turn = TurnState::HumanTurn(room.human_mark);

        self.scheduler.cancel_all();
        self.notify_snapshot();
        Ok(())
    }

    /// Fires every due timer. Returns `true` when the session changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Some((_, timer)) = self.scheduler.pop_due(self.clock.now()) {
            changed |= self.handle_timer(timer);
        }
        changed
    }

    fn handle_timer(&mut self, timer: SessionTimer) -> bool {
        if timer.session != self.session_id {
            log!("[online] Ignoring {:?} from session {}", timer.kind, timer.session);
            return false;
        }

        match timer.kind {
            SessionTimerKind::ConnectDone => self.on_connected(),
            SessionTimerKind::SearchDone => self.on_opponent_found(),
            SessionTimerKind::FoundDone => self.on_room_ready(),
            SessionTimerKind::OpponentReply { move_count } => self.on_opponent_reply(move_count),
        }
    }

    fn on_connected(&mut self) -> bool {
        let MatchSession::Connecting { player } = &self.session else {
            log!("[online] Connect timer fired in {:?}", self.session);
            return false;
        };

        self.session = MatchSession::Searching {
            player: player.clone(),
        };
        self.notify(SessionNotification::Connection(ConnectionStatus::Connected));
        self.notify(SessionNotification::Matchmaking(MatchmakingStatus::Searching));

        let search_ms = self
            .rng
            .range_inclusive(self.settings.search_min_ms, self.settings.search_max_ms);
        self.schedule(Duration::from_millis(search_ms), SessionTimerKind::SearchDone);
        true
    }

    fn on_opponent_found(&mut self) -> bool {
        let MatchSession::Searching { player } = &self.session else {
            log!("[online] Search timer fired in {:?}", self.session);
            return false;
        };

        let room = OnlineRoom {
            room_id: RoomId::from(generate_room_code(&mut self.rng)),
            player: player.clone(),
            opponent: PlayerId::from(generate_player_name(&mut self.rng)),
            human_mark: ONLINE_HUMAN_MARK,
        };
        log!("[online] Matched with {} in {}", room.opponent, room.room_id);

        self.notify(SessionNotification::Matchmaking(MatchmakingStatus::Found {
            opponent: room.opponent.clone(),
            room_id: room.room_id.clone(),
            assigned: room.human_mark,
        }));
        self.session = MatchSession::Found { room };
        self.schedule(self.settings.found_delay(), SessionTimerKind::FoundDone);
        true
    }

    fn on_room_ready(&mut self) -> bool {
        let MatchSession::Found { room } = &self.session else {
            log!("[online] Room timer fired in {:?}", self.session);
            return false;
        };

        let turn = TurnState::HumanTurn(room.human_mark);
        self.session = MatchSession::InGame {
            room: room.clone(),
            game: GameState::new(),
            turn,
        };
        self.notify_snapshot();
        true
    }

    fn on_opponent_reply(&mut self, expected_move_count: usize) -> bool {
        let MatchSession::InGame { room, game, turn } = &mut self.session else {
            log!("[online] Opponent reply fired outside a game");
            return false;
        };
        if !matches!(turn, TurnState::RemoteTurn(_)) || game.move_count() != expected_move_count {
            log!("[online] Stale opponent reply for ply {}", expected_move_count);
            return false;
        }

        let Some(index) = self.rng.pick(&game.board().empty_cells()) else {
            log!("[online] Opponent has no cell to play");
            return false;
        };
        let result = match game.place(index) {
            Ok(result) => result,
            Err(e) => {
                log!("[online] Opponent move {} rejected: {}", index, e);
                return false;
            }
        };
        let move_count = game.move_count();
        if result.is_terminal() {
            *turn = TurnState::GameOver(result);
        } else {
            *turn = TurnState::HumanTurn(room.human_mark);
        }

        if result.is_terminal() {
            self.finish(result, move_count);
        }
        self.notify_snapshot();
        true
    }

    fn finish(&mut self, result: GameResult, ply_count: usize) {
        self.scheduler.cancel_all();
        self.events.game_finished(GameFinished {
            mode: GameMode::Online,
            result,
            difficulty: None,
            ply_count,
        });
    }

    fn schedule(&mut self, delay: Duration, kind: SessionTimerKind) {
        let timer = SessionTimer {
            session: self.session_id,
            kind,
        };
        self.scheduler.schedule(self.clock.now(), delay, timer);
    }

    fn notify_snapshot(&self) {
        if let Some(snapshot) = self.snapshot() {
            self.notify(SessionNotification::GameState(snapshot));
        }
    }

    fn notify(&self, notification: SessionNotification) {
        let _ = self.notifications.send(notification);
    }
}
