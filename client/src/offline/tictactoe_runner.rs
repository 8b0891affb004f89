use std::time::Instant;

use common::games::tictactoe::{
    DifficultyCalibrator, Mark, Opponent, TurnController, TurnSnapshot, TurnState,
};
use common::games::{ChannelEventSink, SessionRng};
use common::log;
use common::scheduler::SystemClock;
use common::storage::FileKeyValueStore;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::LinesStream;

use crate::config::Config;
use crate::input::InputCommand;
use crate::render::{describe_result, describe_turn};

pub async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

fn print_snapshot(snapshot: &TurnSnapshot, human_mark: Option<Mark>) {
    println!();
    println!("{}", snapshot.board);
    match &snapshot.turn {
        TurnState::GameOver(result) => {
            println!("{}", describe_result(result, human_mark));
            println!("{}", describe_turn(&snapshot.turn, None));
        }
        turn => println!("{}", describe_turn(turn, snapshot.remaining_seconds)),
    }
}

pub async fn run_tictactoe_game(
    config: &Config,
    opponent: Opponent,
    human_mark: Mark,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let rng = seed.map(SessionRng::new).unwrap_or_else(SessionRng::from_random);
    log!("Starting {:?} game as {} with seed {}", opponent, human_mark, rng.seed());

    let calibrator = DifficultyCalibrator::new(
        Box::new(FileKeyValueStore::new(&config.stats_location)),
        config.tictactoe.difficulties,
    );
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let mut controller = TurnController::new(
        opponent,
        human_mark,
        config.tictactoe,
        calibrator,
        SystemClock,
        rng,
        Box::new(ChannelEventSink::new(events_tx)),
    );

    let perspective = match opponent {
        Opponent::Ai(_) => Some(human_mark),
        Opponent::LocalHuman => None,
    };

    let mut lines = LinesStream::new(BufReader::new(tokio::io::stdin()).lines());
    print_snapshot(&controller.snapshot(), perspective);

    loop {
        let deadline = controller.next_deadline();
        tokio::select! {
            line = lines.next() => {
                let Some(line) = line else {
                    break;
                };
                let command = match line?.parse::<InputCommand>() {
                    Ok(command) => command,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };

                match command {
                    InputCommand::Place(index) => {
                        if let Err(e) = controller.apply_human_move(index) {
                            println!("{}", e);
                            continue;
                        }
                    }
                    InputCommand::Undo => {
                        if !controller.undo() {
                            println!("Nothing to undo");
                            continue;
                        }
                    }
                    InputCommand::Reset => controller.reset(),
                    InputCommand::Quit => break,
                }
                print_snapshot(&controller.snapshot(), perspective);
            }
            _ = sleep_until_deadline(deadline) => {
                let before = controller.turn();
                let marks_before = controller.game().board().marks_placed();
                if controller.poll() {
                    if let TurnState::HumanTurn(mark) = before
                        && controller.game().board().marks_placed() == marks_before
                    {
                        println!("{} ran out of time", mark);
                    }
                    print_snapshot(&controller.snapshot(), perspective);
                }
            }
            Some(event) = events_rx.recv() => {
                log!(
                    "Game finished: {} {:?} after {} plies (difficulty {:?})",
                    event.mode,
                    event.result,
                    event.ply_count,
                    event.difficulty
                );
                if let Some(difficulty) = event.difficulty {
                    let stats = controller.calibrator().stats(difficulty);
                    log!("{} stats: {:?}", difficulty, stats);
                }
            }
        }
    }

    controller.shutdown();
    Ok(())
}
