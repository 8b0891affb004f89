mod board;
mod bot_controller;
mod calibrator;
mod game_state;
mod session;
mod settings;
mod turn_controller;
mod types;
mod win_detector;

pub use board::{Board, CENTER, CORNERS, EDGES};
pub use bot_controller::{calculate_minimax_move, find_fork_moves, find_winning_move, select_move};
pub use calibrator::{DifficultyCalibrator, DifficultyStats, Winner};
pub use game_state::{GameState, Ply};
pub use session::{
    ConnectionStatus, MatchSession, MatchmakingStatus, ONLINE_HUMAN_MARK, OnlineRoom,
    OnlineSnapshot, SessionNotification, SessionSynchronizer,
};
pub use settings::{
    Difficulty, DifficultyProfile, DifficultyProfiles, OnlineSettings, TicTacToeSettings,
};
pub use turn_controller::{TurnController, TurnSnapshot};
pub use types::{
    BOARD_CELLS, Cell, GameMode, GameResult, Mark, MoveRejection, Opponent, TurnState, WinningLine,
};
pub use win_detector::{LINES, evaluate};
