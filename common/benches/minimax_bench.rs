use std::hint::black_box;
use std::time::Duration;

use common::games::SessionRng;
use common::games::tictactoe::{
    Board, DifficultyProfile, Mark, calculate_minimax_move, evaluate, select_move,
};
use criterion::{Criterion, SamplingMode, criterion_group, criterion_main};

fn bench_minimax_full_game() {
    let mut board = Board::new();
    let mut mark = Mark::X;

    while let Some(index) = calculate_minimax_move(&board, mark) {
        if board.place(index, mark).is_err() {
            break;
        }
        if evaluate(&board).is_terminal() {
            break;
        }
        mark = mark.opponent();
    }
}

fn bench_minimax_single_move_empty_board() {
    let board = Board::new();
    black_box(calculate_minimax_move(&board, Mark::X));
}

fn bench_minimax_single_move_mid_game() {
    let board: Board = "X.. .O. ..X".parse().unwrap_or_default();
    black_box(calculate_minimax_move(&board, Mark::O));
}

fn bench_hard_policy_game(rng: &mut SessionRng) {
    let profile = DifficultyProfile::hard();
    let mut board = Board::new();

    for move_count in 0..9 {
        let Some(index) = select_move(&board, &profile, move_count, true, rng) else {
            break;
        };
        if board.place(index, Mark::for_move_count(move_count)).is_err() {
            break;
        }
        if evaluate(&board).is_terminal() {
            break;
        }
    }
}

fn minimax_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("minimax");

    group
        .sampling_mode(SamplingMode::Flat)
        .sample_size(20)
        .measurement_time(Duration::from_secs(30));

    group.bench_function("full_game", |b| {
        b.iter(bench_minimax_full_game)
    });

    group.bench_function("single_move_empty", |b| {
        b.iter(bench_minimax_single_move_empty_board)
    });

    group.bench_function("single_move_mid_game", |b| {
        b.iter(bench_minimax_single_move_mid_game)
    });

    let mut session_rng = SessionRng::from_random();
    group.bench_function("hard_policy_game", |b| {
        b.iter(|| bench_hard_policy_game(&mut session_rng))
    });

    group.finish();
}

criterion_group!(benches, minimax_bench);
criterion_main!(benches);
