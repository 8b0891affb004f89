use tokio::sync::mpsc;

use crate::games::tictactoe::{Difficulty, GameMode, GameResult};

/// Emitted once per finished game, whatever the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameFinished {
    pub mode: GameMode,
    pub result: GameResult,
    pub difficulty: Option<Difficulty>,
    pub ply_count: usize,
}

pub trait GameEventSink: Send {
    fn game_finished(&self, event: GameFinished);
}

/// Forwards events to an unbounded channel. A closed receiver drops them.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    sender: mpsc::UnboundedSender<GameFinished>,
}

impl ChannelEventSink {
    pub fn new(sender: mpsc::UnboundedSender<GameFinished>) -> Self {
        Self { sender }
    }
}

impl GameEventSink for ChannelEventSink {
    fn game_finished(&self, event: GameFinished) {
        let _ = self.sender.send(event);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullEventSink;

impl GameEventSink for NullEventSink {
    fn game_finished(&self, _event: GameFinished) {}
}
