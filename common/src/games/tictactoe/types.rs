use std::fmt;

use serde::{Deserialize, Serialize};

use super::settings::Difficulty;

pub const BOARD_CELLS: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// X moves on even ply counts, O on odd ones.
    pub fn for_move_count(move_count: usize) -> Mark {
        if move_count % 2 == 0 { Mark::X } else { Mark::O }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
        }
    }
}

impl std::str::FromStr for Mark {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "X" => Ok(Mark::X),
            "O" => Ok(Mark::O),
            other => Err(format!("Unknown mark: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Mark(Mark),
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Mark(mark) => Some(mark),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WinningLine {
    pub cells: [usize; 3],
}

impl WinningLine {
    pub const fn new(cells: [usize; 3]) -> Self {
        Self { cells }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    InProgress,
    Win { mark: Mark, line: WinningLine },
    Draw,
}

impl GameResult {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameResult::InProgress)
    }

    pub fn winner(&self) -> Option<Mark> {
        match self {
            GameResult::Win { mark, .. } => Some(*mark),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    HumanTurn(Mark),
    AiTurn(Mark),
    RemoteTurn(Mark),
    GameOver(GameResult),
}

impl TurnState {
    pub fn mark_to_move(&self) -> Option<Mark> {
        match self {
            TurnState::HumanTurn(mark) | TurnState::AiTurn(mark) | TurnState::RemoteTurn(mark) => {
                Some(*mark)
            }
            TurnState::GameOver(_) => None,
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self, TurnState::GameOver(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    VsAi,
    LocalTwoPlayer,
    Online,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::VsAi => write!(f, "vs-ai"),
            GameMode::LocalTwoPlayer => write!(f, "local"),
            GameMode::Online => write!(f, "online"),
        }
    }
}

/// Who sits across from the local human in an offline game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opponent {
    Ai(Difficulty),
    LocalHuman,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejection {
    OutOfBounds(usize),
    CellOccupied(usize),
    NotYourTurn,
    GameOver,
    NotInGame,
}

impl fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveRejection::OutOfBounds(index) => write!(f, "Cell {} is outside the board", index),
            MoveRejection::CellOccupied(index) => write!(f, "Cell {} is already marked", index),
            MoveRejection::NotYourTurn => write!(f, "Not your turn"),
            MoveRejection::GameOver => write!(f, "Game is already over"),
            MoveRejection::NotInGame => write!(f, "No game in progress"),
        }
    }
}

impl std::error::Error for MoveRejection {}
