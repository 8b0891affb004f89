use crate::games::RandomSource;
use crate::log;

use super::board::{Board, CENTER, CORNERS, EDGES};
use super::settings::DifficultyProfile;
use super::types::{GameResult, Mark};
use super::win_detector::{LINES, evaluate};

/// Root move order for the deep search. Ties keep the earliest entry.
const SEARCH_ORDER: [usize; 9] = [4, 0, 2, 6, 8, 1, 3, 5, 7];

const WIN_SCORE: i32 = 10;

/// Picks the AI's next cell, or `None` when the board has no empty cell.
///
/// The mark to play is derived from `move_count` parity, so forfeited turns
/// (which add plies without marks) still put the right mark on the board.
/// Layers run in priority order and each random gate draws from `rng`:
/// blunder, casual play, win now, block now, deep search, heuristic.
pub fn select_move(
    board: &Board,
    profile: &DifficultyProfile,
    move_count: usize,
    wants_to_win: bool,
    rng: &mut impl RandomSource,
) -> Option<usize> {
    let available_moves = board.empty_cells();
    if available_moves.is_empty() {
        return None;
    }

    let bot_mark = Mark::for_move_count(move_count);
    let opponent_mark = bot_mark.opponent();

    if rng.chance(profile.blunder_chance) {
        return rng.pick(&available_moves);
    }

    if !wants_to_win {
        return calculate_casual_move(board, bot_mark, profile, &available_moves, rng);
    }

    if let Some(index) = find_winning_move(board, bot_mark, &available_moves) {
        return Some(index);
    }

    if let Some(index) = find_winning_move(board, opponent_mark, &available_moves)
        && rng.chance(profile.block_chance)
    {
        return Some(index);
    }

    if rng.chance(profile.deep_search_chance) {
        return calculate_minimax_move(board, bot_mark);
    }

    if let Some(index) = calculate_strategic_move(board, bot_mark, &available_moves, rng) {
        return Some(index);
    }

    log!("No strategic move found on {:?}, taking first empty cell", board.cells());
    available_moves.first().copied()
}

/// Weak play for games the AI is not trying to win. Its own winning cells
/// are skipped while any other cell is open.
fn calculate_casual_move(
    board: &Board,
    bot_mark: Mark,
    profile: &DifficultyProfile,
    available_moves: &[usize],
    rng: &mut impl RandomSource,
) -> Option<usize> {
    if let Some(index) = find_winning_move(board, bot_mark.opponent(), available_moves)
        && rng.chance(profile.casual_block_chance)
    {
        return Some(index);
    }

    let mut harmless: Vec<usize> = available_moves
        .iter()
        .copied()
        .filter(|&i| !completes_line(board, i, bot_mark))
        .collect();
    if harmless.is_empty() {
        harmless = available_moves.to_vec();
    }

    let edges: Vec<usize> = harmless.iter().copied().filter(|i| EDGES.contains(i)).collect();
    if !edges.is_empty() {
        return rng.pick(&edges);
    }
    rng.pick(&harmless)
}

fn calculate_strategic_move(
    board: &Board,
    bot_mark: Mark,
    available_moves: &[usize],
    rng: &mut impl RandomSource,
) -> Option<usize> {
    if board.is_empty_at(CENTER) {
        return Some(CENTER);
    }

    let forks = find_fork_moves(board, bot_mark, available_moves);
    if !forks.is_empty() {
        return rng.pick(&forks);
    }

    let opponent_forks = find_fork_moves(board, bot_mark.opponent(), available_moves);
    if !opponent_forks.is_empty() {
        return rng.pick(&opponent_forks);
    }

    for group in [CORNERS, EDGES] {
        let open: Vec<usize> = group.into_iter().filter(|&i| board.is_empty_at(i)).collect();
        if !open.is_empty() {
            return rng.pick(&open);
        }
    }

    None
}

/// First cell (in index order) that completes a line for `mark`.
pub fn find_winning_move(board: &Board, mark: Mark, moves: &[usize]) -> Option<usize> {
    moves
        .iter()
        .copied()
        .find(|&index| evaluate(&board.with_mark(index, mark)).winner() == Some(mark))
}

/// Cells that would leave `mark` with two or more immediate wins.
pub fn find_fork_moves(board: &Board, mark: Mark, moves: &[usize]) -> Vec<usize> {
    moves
        .iter()
        .copied()
        .filter(|&index| count_winning_moves(&board.with_mark(index, mark), mark) >= 2)
        .collect()
}

fn count_winning_moves(board: &Board, mark: Mark) -> usize {
    board
        .empty_cells()
        .into_iter()
        .filter(|&index| completes_line(board, index, mark))
        .count()
}

fn completes_line(board: &Board, index: usize, mark: Mark) -> bool {
    LINES
        .iter()
        .filter(|line| line.cells.contains(&index))
        .any(|line| {
            line.cells
                .iter()
                .all(|&cell| cell == index || board.get(cell).and_then(|c| c.mark()) == Some(mark))
        })
}

/// Exhaustive alpha-beta search for `bot_mark`. Returns the best cell, with
/// ties resolved by [`SEARCH_ORDER`].
pub fn calculate_minimax_move(board: &Board, bot_mark: Mark) -> Option<usize> {
    let mut board = *board;
    let mut best_move = None;
    let mut best_score = i32::MIN;
    let mut alpha = i32::MIN;
    let beta = i32::MAX;

    for index in SEARCH_ORDER {
        if !board.is_empty_at(index) {
            continue;
        }

        board.set(index, bot_mark);
        let score = minimax(&mut board, 1, false, bot_mark, alpha, beta);
        board.clear(index);

        if score > best_score {
            best_score = score;
            best_move = Some(index);
        }
        alpha = alpha.max(best_score);
    }

    best_move
}

fn minimax(
    board: &mut Board,
    depth: i32,
    is_maximizing: bool,
    bot_mark: Mark,
    mut alpha: i32,
    mut beta: i32,
) -> i32 {
    match evaluate(board) {
        GameResult::Win { mark, .. } if mark == bot_mark => return WIN_SCORE - depth,
        GameResult::Win { .. } => return depth - WIN_SCORE,
        GameResult::Draw => return 0,
        GameResult::InProgress => {}
    }

    if is_maximizing {
        let mut max_eval = i32::MIN;
        for index in SEARCH_ORDER {
            if !board.is_empty_at(index) {
                continue;
            }

            board.set(index, bot_mark);
            let eval = minimax(board, depth + 1, false, bot_mark, alpha, beta);
            board.clear(index);

            max_eval = max_eval.max(eval);
            alpha = alpha.max(eval);
            if beta <= alpha {
                break;
            }
        }
        max_eval
    } else {
        let opponent_mark = bot_mark.opponent();
        let mut min_eval = i32::MAX;
        for index in SEARCH_ORDER {
            if !board.is_empty_at(index) {
                continue;
            }

            board.set(index, opponent_mark);
            let eval = minimax(board, depth + 1, true, bot_mark, alpha, beta);
            board.clear(index);

            min_eval = min_eval.min(eval);
            beta = beta.min(eval);
            if beta <= alpha {
                break;
            }
        }
        min_eval
    }
}
