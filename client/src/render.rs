use common::games::tictactoe::{GameResult, Mark, TurnState};

pub fn describe_result(result: &GameResult, human_mark: Option<Mark>) -> String {
    match (result, human_mark) {
        (GameResult::Draw, _) => "Draw.".to_string(),
        (GameResult::Win { mark, line }, Some(human)) if *mark == human => {
            format!("You win with {:?}!", line.cells)
        }
        (GameResult::Win { mark, line }, Some(_)) => {
            format!("{} wins with {:?}. Better luck next time.", mark, line.cells)
        }
        (GameResult::Win { mark, line }, None) => format!("{} wins with {:?}!", mark, line.cells),
        (GameResult::InProgress, _) => "Game in progress.".to_string(),
    }
}

pub fn describe_turn(turn: &TurnState, remaining_seconds: Option<u64>) -> String {
    let timer = remaining_seconds
        .map(|s| format!(" ({}s left)", s))
        .unwrap_or_default();
    match turn {
        TurnState::HumanTurn(mark) => {
            format!("{} to move{}. Cell 0-8, u=undo, r=reset, q=quit", mark, timer)
        }
        TurnState::AiTurn(mark) => format!("AI ({}) is thinking...", mark),
        TurnState::RemoteTurn(mark) => format!("Opponent ({}) is moving...", mark),
        TurnState::GameOver(_) => "Game over. r=play again, q=quit".to_string(),
    }
}
