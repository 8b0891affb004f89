use common::games::tictactoe::{
    Difficulty, DifficultyCalibrator, DifficultyStats, Mark, Opponent, TicTacToeSettings,
    TurnController, TurnState, find_winning_move,
};
use common::games::{NullEventSink, RandomSource, SessionRng};
use common::log;
use common::scheduler::ManualClock;
use common::storage::MemoryKeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationReport {
    pub difficulty: Difficulty,
    pub stats: DifficultyStats,
    pub target_win_rate: f64,
}

/// Plays `games` headless games on a manual clock and reports how often the
/// AI won. The AI opens as X. The simulated human takes an immediate win when
/// it has one and otherwise picks a random cell.
pub fn run_simulation(
    settings: &TicTacToeSettings,
    difficulty: Difficulty,
    games: u32,
    seed: u64,
) -> SimulationReport {
    let clock = ManualClock::new();
    let calibrator =
        DifficultyCalibrator::new(Box::new(MemoryKeyValueStore::new()), settings.difficulties);
    let mut controller = TurnController::new(
        Opponent::Ai(difficulty),
        Mark::O,
        *settings,
        calibrator,
        clock.clone(),
        SessionRng::new(seed),
        Box::new(NullEventSink),
    );
    let mut human = SessionRng::new(seed.wrapping_add(1));

    for game in 0..games {
        while !controller.turn().is_game_over() {
            if let TurnState::HumanTurn(mark) = controller.turn() {
                let board = controller.game().board();
                let empty = board.empty_cells();
                let choice = find_winning_move(board, mark, &empty).or_else(|| human.pick(&empty));
                if let Some(index) = choice
                    && controller.apply_human_move(index).is_ok()
                {
                    continue;
                }
            }
            match controller.next_deadline() {
                Some(deadline) => {
                    clock.advance_to(deadline);
                    controller.poll();
                }
                None => break,
            }
        }
        if (game + 1) % 100 == 0 {
            log!("Simulated {} games: {:?}", game + 1, controller.calibrator().stats(difficulty));
        }
        controller.reset();
    }

    SimulationReport {
        difficulty,
        stats: controller.calibrator().stats(difficulty),
        target_win_rate: settings.difficulties.get(difficulty).target_win_rate,
    }
}
