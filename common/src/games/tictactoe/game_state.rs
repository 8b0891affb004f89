use super::board::Board;
use super::types::{GameResult, Mark, MoveRejection};
use super::win_detector::evaluate;

/// One entry of the move history. A forfeited turn is a `Pass`: it advances
/// the ply count without touching the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ply {
    Place { index: usize, mark: Mark },
    Pass { mark: Mark },
}

impl Ply {
    pub fn mark(&self) -> Mark {
        match self {
            Ply::Place { mark, .. } | Ply::Pass { mark } => *mark,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    plies: Vec<Ply>,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn plies(&self) -> &[Ply] {
        &self.plies
    }

    pub fn move_count(&self) -> usize {
        self.plies.len()
    }

    pub fn current_mark(&self) -> Mark {
        Mark::for_move_count(self.plies.len())
    }

    pub fn result(&self) -> GameResult {
        evaluate(&self.board)
    }

    pub fn is_over(&self) -> bool {
        self.result().is_terminal()
    }

    /// Places the mark to move on `index` and returns the resulting outcome.
    pub fn place(&mut self, index: usize) -> Result<GameResult, MoveRejection> {
        if self.is_over() {
            return Err(MoveRejection::GameOver);
        }

        let mark = self.current_mark();
        self.board.place(index, mark)?;
        self.plies.push(Ply::Place { index, mark });
        Ok(self.result())
    }

    /// Forfeits the turn of the mark to move.
    pub fn pass(&mut self) -> Result<Mark, MoveRejection> {
        if self.is_over() {
            return Err(MoveRejection::GameOver);
        }

        let mark = self.current_mark();
        self.plies.push(Ply::Pass { mark });
        Ok(mark)
    }

    pub fn undo_last(&mut self) -> Option<Ply> {
        let ply = self.plies.pop()?;
        if let Ply::Place { index, .. } = ply {
            self.board.clear(index);
        }
        Some(ply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::types::Cell;

    #[test]
    fn test_marks_alternate_from_x() {
        let mut state = GameState::new();

        assert_eq!(state.current_mark(), Mark::X);
        state.place(4).unwrap();
        assert_eq!(state.current_mark(), Mark::O);
        state.place(0).unwrap();

        assert_eq!(state.board().get(4), Some(Cell::Mark(Mark::X)));
        assert_eq!(state.board().get(0), Some(Cell::Mark(Mark::O)));
        assert_eq!(state.move_count(), 2);
    }

    #[test]
    fn test_pass_keeps_board_and_flips_mark() {
        let mut state = GameState::new();

        assert_eq!(state.pass(), Ok(Mark::X));
        assert_eq!(state.current_mark(), Mark::O);
        assert_eq!(state.board().marks_placed(), 0);

        state.place(4).unwrap();
        assert_eq!(state.board().get(4), Some(Cell::Mark(Mark::O)));
    }

    #[test]
    fn test_rejections_leave_state_untouched() {
        let mut state = GameState::new();
        state.place(4).unwrap();

        assert_eq!(state.place(4), Err(MoveRejection::CellOccupied(4)));
        assert_eq!(state.place(9), Err(MoveRejection::OutOfBounds(9)));
        assert_eq!(state.move_count(), 1);
    }

    #[test]
    fn test_no_moves_after_win() {
        let mut state = GameState::new();
        for index in [0, 3, 1, 4] {
            state.place(index).unwrap();
        }

        let result = state.place(2).unwrap();
        assert_eq!(result.winner(), Some(Mark::X));
        assert_eq!(state.place(5), Err(MoveRejection::GameOver));
        assert_eq!(state.pass(), Err(MoveRejection::GameOver));
    }

    #[test]
    fn test_undo_restores_previous_position() {
        let mut state = GameState::new();
        state.place(4).unwrap();
        state.pass().unwrap();
        state.place(0).unwrap();

        assert_eq!(state.undo_last(), Some(Ply::Place { index: 0, mark: Mark::X }));
        assert_eq!(state.undo_last(), Some(Ply::Pass { mark: Mark::O }));
        assert_eq!(state.move_count(), 1);
        assert!(state.board().is_empty_at(0));
        assert_eq!(state.current_mark(), Mark::O);

        state.undo_last();
        assert_eq!(state.undo_last(), None);
        assert_eq!(state, GameState::new());
    }
}
