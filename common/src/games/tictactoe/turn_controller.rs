use std::time::{Duration, Instant};

use crate::games::{GameEventSink, GameFinished, RandomSource, SessionRng};
use crate::log;
use crate::scheduler::{Clock, Scheduler, TimerHandle};

use super::board::Board;
use super::bot_controller::select_move;
use super::calibrator::{DifficultyCalibrator, Winner};
use super::game_state::GameState;
use super::settings::{Difficulty, TicTacToeSettings};
use super::types::{GameMode, GameResult, Mark, MoveRejection, Opponent, TurnState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TurnTimer {
    /// Board and ply count are captured when the AI starts thinking.
    AiThinking { board: Board, move_count: usize },
    HumanTurnExpired { mark: Mark, move_count: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnSnapshot {
    pub board: Board,
    pub turn: TurnState,
    pub move_count: usize,
    pub remaining_seconds: Option<u64>,
}

/// Offline game loop: a human against the AI or two humans on one board.
/// Timers only fire from [`TurnController::poll`].
pub struct TurnController<C: Clock> {
    opponent: Opponent,
    human_mark: Mark,
    settings: TicTacToeSettings,
    calibrator: DifficultyCalibrator,
    clock: C,
    rng: SessionRng,
    events: Box<dyn GameEventSink>,
    game: GameState,
    turn: TurnState,
    scheduler: Scheduler<TurnTimer>,
    active_timer: Option<TimerHandle>,
    wants_to_win: Option<bool>,
}

impl<C: Clock> TurnController<C> {
    pub fn new(
        opponent: Opponent,
        human_mark: Mark,
        settings: TicTacToeSettings,
        calibrator: DifficultyCalibrator,
        clock: C,
        rng: SessionRng,
        events: Box<dyn GameEventSink>,
    ) -> Self {
        let mut controller = Self {
            opponent,
            human_mark,
            settings,
            calibrator,
            clock,
            rng,
            events,
            game: GameState::new(),
            turn: TurnState::HumanTurn(Mark::X),
            scheduler: Scheduler::new(),
            active_timer: None,
            wants_to_win: None,
        };
        controller.enter_turn();
        controller
    }

    pub fn mode(&self) -> GameMode {
        match self.opponent {
            Opponent::Ai(_) => GameMode::VsAi,
            Opponent::LocalHuman => GameMode::LocalTwoPlayer,
        }
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        match self.opponent {
            Opponent::Ai(difficulty) => Some(difficulty),
            Opponent::LocalHuman => None,
        }
    }

    pub fn human_mark(&self) -> Mark {
        self.human_mark
    }

    pub fn turn(&self) -> TurnState {
        self.turn
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn calibrator(&self) -> &DifficultyCalibrator {
        &self.calibrator
    }

    pub fn apply_human_move(&mut self, index: usize) -> Result<(), MoveRejection> {
        match self.turn {
            TurnState::HumanTurn(_) => {}
            TurnState::GameOver(_) => return Err(MoveRejection::GameOver),
            TurnState::AiTurn(_) | TurnState::RemoteTurn(_) => {
                return Err(MoveRejection::NotYourTurn);
            }
        }

        self.game.place(index)?;
        self.cancel_timer();
        self.enter_turn();
        Ok(())
    }

    /// Fires every due timer. Returns `true` when the game changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Some((handle, timer)) = self.scheduler.pop_due(self.clock.now()) {
            changed |= self.handle_timer(handle, timer);
        }
        changed
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Takes back the last human action. Against the AI this also removes the
    /// AI replies played after it, so the human is to move again.
    pub fn undo(&mut self) -> bool {
        if self.turn.is_game_over() || self.game.plies().is_empty() {
            return false;
        }

        match self.opponent {
            Opponent::LocalHuman => {
                self.game.undo_last();
            }
            Opponent::Ai(_) => {
                let human_mark = self.human_mark;
                if !self.game.plies().iter().any(|ply| ply.mark() == human_mark) {
                    return false;
                }
                while let Some(ply) = self.game.undo_last() {
                    if ply.mark() == human_mark {
                        break;
                    }
                }
            }
        }

        self.cancel_timer();
        self.enter_turn();
        true
    }

    pub fn reset(&mut self) {
        self.scheduler.cancel_all();
        self.active_timer = None;
        self.game = GameState::new();
        self.wants_to_win = None;
        self.enter_turn();
    }

    pub fn shutdown(&mut self) {
        self.scheduler.cancel_all();
        self.active_timer = None;
    }

    pub fn snapshot(&self) -> TurnSnapshot {
        let remaining_seconds = self
            .active_timer
            .and_then(|handle| self.scheduler.deadline(handle))
            .map(|deadline| {
                let remaining = deadline.saturating_duration_since(self.clock.now());
                remaining.as_millis().div_ceil(1000) as u64
            });

        TurnSnapshot {
            board: *self.game.board(),
            turn: self.turn,
            move_count: self.game.move_count(),
            remaining_seconds,
        }
    }

    fn enter_turn(&mut self) {
        let result = self.game.result();
        if result.is_terminal() {
            self.finish(result);
            return;
        }

        let mark = self.game.current_mark();
        let move_count = self.game.move_count();

        match self.opponent {
            Opponent::Ai(difficulty) if mark != self.human_mark => {
                let profile = self.settings.difficulties.get(difficulty);
                let think_ms = self.rng.range_inclusive(profile.think_min_ms, profile.think_max_ms);
                self.turn = TurnState::AiTurn(mark);
                self.start_timer(
                    Duration::from_millis(think_ms),
                    TurnTimer::AiThinking {
                        board: *self.game.board(),
                        move_count,
                    },
                );
            }
            _ => {
                self.turn = TurnState::HumanTurn(mark);
                self.start_timer(
                    self.settings.human_turn_duration(),
                    TurnTimer::HumanTurnExpired { mark, move_count },
                );
            }
        }
    }

    fn handle_timer(&mut self, handle: TimerHandle, timer: TurnTimer) -> bool {
        if self.active_timer != Some(handle) {
            log!("[tictactoe] Ignoring timer {:?} that is no longer active", timer);
            return false;
        }
        self.active_timer = None;

        match timer {
            TurnTimer::AiThinking { board, move_count } => {
                let (Opponent::Ai(difficulty), TurnState::AiTurn(_)) = (self.opponent, self.turn)
                else {
                    log!("[tictactoe] AI timer fired outside the AI turn");
                    return false;
                };
                if self.game.move_count() != move_count {
                    log!(
                        "[tictactoe] AI timer for ply {} fired at ply {}",
                        move_count,
                        self.game.move_count()
                    );
                    return false;
                }
                self.play_ai_move(difficulty, &board, move_count)
            }
            TurnTimer::HumanTurnExpired { mark, move_count } => {
                if self.turn != TurnState::HumanTurn(mark) || self.game.move_count() != move_count {
                    log!("[tictactoe] Turn timer for {} at ply {} is stale", mark, move_count);
                    return false;
                }
                log!("[tictactoe] {} ran out of time and forfeits the turn", mark);
                if let Err(e) = self.game.pass() {
                    log!("[tictactoe] Failed to forfeit turn: {}", e);
                    return false;
                }
                self.enter_turn();
                true
            }
        }
    }

    fn play_ai_move(&mut self, difficulty: Difficulty, board: &Board, move_count: usize) -> bool {
        let calibrator = &self.calibrator;
        let rng = &mut self.rng;
        let wants_to_win = *self
            .wants_to_win
            .get_or_insert_with(|| calibrator.should_try_to_win(difficulty, rng));

        let profile = self.settings.difficulties.get(difficulty);
        let Some(index) = select_move(board, profile, move_count, wants_to_win, &mut self.rng)
        else {
            log!("[tictactoe] AI found no move on a running game");
            return false;
        };

        if let Err(e) = self.game.place(index) {
            log!("[tictactoe] AI move {} rejected: {}", index, e);
            return false;
        }
        self.enter_turn();
        true
    }

    fn finish(&mut self, result: GameResult) {
        self.scheduler.cancel_all();
        self.active_timer = None;
        self.turn = TurnState::GameOver(result);

        let difficulty = self.difficulty();
        if let Some(difficulty) = difficulty {
            let winner = match result.winner() {
                Some(mark) if mark == self.human_mark => Winner::Human,
                Some(_) => Winner::Ai,
                None => Winner::Draw,
            };
            self.calibrator.record_game_result(difficulty, winner);
        }

        self.events.game_finished(GameFinished {
            mode: self.mode(),
            result,
            difficulty,
            ply_count: self.game.move_count(),
        });
    }

    fn start_timer(&mut self, delay: Duration, timer: TurnTimer) {
        self.cancel_timer();
        let handle = self.scheduler.schedule(self.clock.now(), delay, timer);
        self.active_timer = Some(handle);
    }

    fn cancel_timer(&mut self) {
        if let Some(handle) = self.active_timer.take() {
            self.scheduler.cancel(handle);
        }
    }
}
