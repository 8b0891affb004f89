use super::board::Board;
use super::types::{Cell, GameResult, WinningLine};

/// All lines in scan order: rows top to bottom, columns left to right, then
/// the `0-4-8` and `2-4-6` diagonals. When a board holds several complete
/// lines the earliest one in this order is reported.
pub const LINES: [WinningLine; 8] = [
    WinningLine::new([0, 1, 2]),
    WinningLine::new([3, 4, 5]),
    WinningLine::new([6, 7, 8]),
    WinningLine::new([0, 3, 6]),
    WinningLine::new([1, 4, 7]),
    WinningLine::new([2, 5, 8]),
    WinningLine::new([0, 4, 8]),
    WinningLine::new([2, 4, 6]),
];

pub fn evaluate(board: &Board) -> GameResult {
    let cells = board.cells();

    for line in LINES {
        let [a, b, c] = line.cells;
        if let Cell::Mark(mark) = cells[a]
            && cells[b] == cells[a]
            && cells[c] == cells[a]
        {
            return GameResult::Win { mark, line };
        }
    }

    if board.is_full() {
        GameResult::Draw
    } else {
        GameResult::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::types::Mark;

    fn board(pattern: &str) -> Board {
        pattern.parse().unwrap()
    }

    fn swap_marks(board: &Board) -> Board {
        let mut cells = *board.cells();
        for cell in cells.iter_mut() {
            if let Cell::Mark(mark) = *cell {
                *cell = Cell::Mark(mark.opponent());
            }
        }
        Board::from_cells(cells)
    }

    #[test]
    fn test_top_row_win() {
        assert_eq!(
            evaluate(&board("XXX......")),
            GameResult::Win {
                mark: Mark::X,
                line: WinningLine::new([0, 1, 2])
            }
        );
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        assert_eq!(evaluate(&board("XOXOXOOXO")), GameResult::Draw);
    }

    #[test]
    fn test_empty_board_in_progress() {
        assert_eq!(evaluate(&Board::new()), GameResult::InProgress);
    }

    #[test]
    fn test_every_line_detected_for_both_marks() {
        for line in LINES {
            for mark in [Mark::X, Mark::O] {
                let mut b = Board::new();
                for index in line.cells {
                    b.place(index, mark).unwrap();
                }

                assert_eq!(evaluate(&b), GameResult::Win { mark, line });
            }
        }
    }

    #[test]
    fn test_win_on_full_board_beats_draw() {
        assert_eq!(
            evaluate(&board("XOO OXX OXX")),
            GameResult::Win {
                mark: Mark::X,
                line: WinningLine::new([0, 4, 8])
            }
        );
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        assert_eq!(evaluate(&board("XXO......")), GameResult::InProgress);
    }

    #[test]
    fn test_simultaneous_lines_report_first_in_scan_order() {
        // Row 0-1-2 and column 0-3-6 are both complete; the row comes first.
        let result = evaluate(&board("XXX X.. X.."));
        assert_eq!(
            result,
            GameResult::Win {
                mark: Mark::X,
                line: WinningLine::new([0, 1, 2])
            }
        );

        // A column scanned before a diagonal.
        let result = evaluate(&board("O.O .OO ..O"));
        assert_eq!(
            result,
            GameResult::Win {
                mark: Mark::O,
                line: WinningLine::new([2, 5, 8])
            }
        );

        // Two different marks: the earlier line decides, however unreachable.
        let result = evaluate(&board("... OOO XXX"));
        assert_eq!(result.winner(), Some(Mark::O));
    }

    #[test]
    fn test_evaluate_is_symmetric_under_mark_swap() {
        let patterns = [
            "XXX......",
            "XOXOXOOXO",
            "XO..X...X",
            "O.X.X.X.O",
            ".........",
            "XOX.O.XO.",
            "XXX OOO ...",
        ];

        for pattern in patterns {
            let original = board(pattern);
            let swapped = swap_marks(&original);

            let expected = match evaluate(&original) {
                GameResult::Win { mark, line } => GameResult::Win {
                    mark: mark.opponent(),
                    line,
                },
                other => other,
            };
            assert_eq!(evaluate(&swapped), expected, "pattern {}", pattern);
            assert_eq!(evaluate(&original), evaluate(&original));
        }
    }
}
