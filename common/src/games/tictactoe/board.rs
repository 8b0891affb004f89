use std::fmt;
use std::str::FromStr;

use super::types::{BOARD_CELLS, Cell, Mark, MoveRejection};

pub const CENTER: usize = 4;
pub const CORNERS: [usize; 4] = [0, 2, 6, 8];
pub const EDGES: [usize; 4] = [1, 3, 5, 7];

/// Row-major 3x3 grid, index `row * 3 + column`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [Cell; BOARD_CELLS],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Cell; BOARD_CELLS]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell; BOARD_CELLS] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub fn is_empty_at(&self, index: usize) -> bool {
        self.get(index) == Some(Cell::Empty)
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    pub fn empty_cells(&self) -> Vec<usize> {
        (0..BOARD_CELLS).filter(|&i| self.cells[i].is_empty()).collect()
    }

    pub fn marks_placed(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    /// Places `mark` on an empty cell. Turn order and game-over checks belong
    /// to the state machines; this only guards the cell itself.
    pub fn place(&mut self, index: usize, mark: Mark) -> Result<(), MoveRejection> {
        match self.cells.get(index) {
            None => Err(MoveRejection::OutOfBounds(index)),
            Some(Cell::Mark(_)) => Err(MoveRejection::CellOccupied(index)),
            Some(Cell::Empty) => {
                self.cells[index] = Cell::Mark(mark);
                Ok(())
            }
        }
    }

    /// Writes `mark` without the occupancy guard. Search code pairs it with
    /// [`Board::clear`] to undo its own moves.
    pub fn set(&mut self, index: usize, mark: Mark) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = Cell::Mark(mark);
        }
    }

    pub fn clear(&mut self, index: usize) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = Cell::Empty;
        }
    }

    pub fn with_mark(&self, index: usize, mark: Mark) -> Board {
        let mut next = *self;
        if next.cells[index].is_empty() {
            next.cells[index] = Cell::Mark(mark);
        }
        next
    }
}

impl FromStr for Board {
    type Err = String;

    /// Nine cells in row-major order: `X`, `O`, or one of `.`/`_`/`-` for an
    /// empty cell. Whitespace and `|` separators are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = [Cell::Empty; BOARD_CELLS];
        let mut count = 0;

        for ch in s.chars().filter(|c| !c.is_whitespace() && *c != '|') {
            if count == BOARD_CELLS {
                return Err(format!("Board has more than {} cells: {:?}", BOARD_CELLS, s));
            }
            cells[count] = match ch {
                'X' | 'x' => Cell::Mark(Mark::X),
                'O' | 'o' => Cell::Mark(Mark::O),
                '.' | '_' | '-' => Cell::Empty,
                other => return Err(format!("Unexpected board character {:?}", other)),
            };
            count += 1;
        }

        if count != BOARD_CELLS {
            return Err(format!("Board needs {} cells, got {}", BOARD_CELLS, count));
        }
        Ok(Self { cells })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            let line: Vec<String> = (0..3)
                .map(|col| {
                    let index = row * 3 + col;
                    match self.cells[index] {
                        Cell::Mark(mark) => mark.to_string(),
                        Cell::Empty => index.to_string(),
                    }
                })
                .collect();
            write!(f, " {} ", line.join(" | "))?;
            if row < 2 {
                writeln!(f)?;
                writeln!(f, "---+---+---")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_board_pattern() {
        let board: Board = "XO. | .X. | ..O".parse().unwrap();

        assert_eq!(board.get(0), Some(Cell::Mark(Mark::X)));
        assert_eq!(board.get(1), Some(Cell::Mark(Mark::O)));
        assert_eq!(board.get(8), Some(Cell::Mark(Mark::O)));
        assert_eq!(board.empty_cells(), vec![2, 3, 5, 6, 7]);
        assert_eq!(board.marks_placed(), 4);
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!("XO".parse::<Board>().is_err());
        assert!("XOXOXOXOXO".parse::<Board>().is_err());
        assert!("XOXOXOXO?".parse::<Board>().is_err());
    }

    #[test]
    fn test_place_guards_cells() {
        let mut board = Board::new();

        assert_eq!(board.place(4, Mark::X), Ok(()));
        assert_eq!(board.place(4, Mark::O), Err(MoveRejection::CellOccupied(4)));
        assert_eq!(board.place(9, Mark::O), Err(MoveRejection::OutOfBounds(9)));
        assert_eq!(board.marks_placed(), 1);
    }

    #[test]
    fn test_set_and_clear_undo_each_other() {
        let mut board: Board = "X........".parse().unwrap();

        board.set(4, Mark::O);
        assert_eq!(board.get(4), Some(Cell::Mark(Mark::O)));
        assert_eq!(board.marks_placed(), 2);

        board.clear(4);
        assert!(board.is_empty_at(4));

        board.set(9, Mark::O);
        board.clear(9);
        assert_eq!(board.marks_placed(), 1);
    }

    #[test]
    fn test_with_mark_leaves_original_untouched() {
        let board = Board::new();
        let next = board.with_mark(0, Mark::O);

        assert!(board.is_empty_at(0));
        assert_eq!(next.get(0), Some(Cell::Mark(Mark::O)));
    }

    #[test]
    fn test_display_shows_free_indices() {
        let board: Board = "X........".parse().unwrap();
        let rendered = board.to_string();

        assert!(rendered.starts_with(" X | 1 | 2 "));
        assert!(rendered.contains(" 6 | 7 | 8 "));
    }
}
