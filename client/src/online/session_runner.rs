use common::PlayerId;
use common::games::tictactoe::{
    ConnectionStatus, MatchmakingStatus, SessionNotification, SessionSynchronizer, TurnState,
};
use common::games::{ChannelEventSink, SessionRng};
use common::log;
use common::scheduler::SystemClock;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::LinesStream;

use crate::config::Config;
use crate::input::InputCommand;
use crate::offline::sleep_until_deadline;
use crate::render::{describe_result, describe_turn};

fn print_notification(notification: &SessionNotification) {
    match notification {
        SessionNotification::Connection(ConnectionStatus::Connecting) => println!("Connecting..."),
        SessionNotification::Connection(ConnectionStatus::Connected) => println!("Connected."),
        SessionNotification::Connection(ConnectionStatus::Disconnected) => {
            println!("Disconnected.")
        }
        SessionNotification::Matchmaking(MatchmakingStatus::Searching) => {
            println!("Searching for an opponent...")
        }
        SessionNotification::Matchmaking(MatchmakingStatus::Found {
            opponent,
            room_id,
            assigned,
        }) => println!("Matched with {} in {}. You play {}.", opponent, room_id, assigned),
        SessionNotification::Matchmaking(MatchmakingStatus::Cancelled) => {
            println!("Matchmaking cancelled.")
        }
        SessionNotification::GameState(snapshot) => {
            println!();
            println!("{}", snapshot.board);
            if let TurnState::GameOver(result) = &snapshot.turn {
                println!("{}", describe_result(result, Some(snapshot.human_mark)));
            }
            println!("{}", describe_turn(&snapshot.turn, None));
        }
    }
}

pub async fn run_online_session(
    config: &Config,
    player: PlayerId,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let rng = seed.map(SessionRng::new).unwrap_or_else(SessionRng::from_random);
    log!("Starting online session for {} with seed {}", player, rng.seed());

    let (notifications_tx, mut notifications_rx) = mpsc::unbounded_channel();
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let mut session = SessionSynchronizer::new(
        config.tictactoe.online,
        SystemClock,
        rng,
        notifications_tx,
        Box::new(ChannelEventSink::new(events_tx)),
    );
    session.start_matchmaking(player);

    let mut lines = LinesStream::new(BufReader::new(tokio::io::stdin()).lines());

    loop {
        let deadline = session.next_deadline();
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
                        if let Err(e) = session.make_move(index) {
                            println!("{}", e);
                        }
                    }
                    InputCommand::Reset => {
                        if let Err(e) = session.reset_game() {
                            println!("{}", e);
                        }
                    }
                    InputCommand::Undo => println!("Undo is not available online"),
                    InputCommand::Quit => break,
                }
            }
            _ = sleep_until_deadline(deadline) => {
                session.poll();
            }
            Some(notification) = notifications_rx.recv() => {
                print_notification(&notification);
            }
            Some(event) = events_rx.recv() => {
                log!("Online game finished: {:?} after {} plies", event.result, event.ply_count);
            }
        }
    }

    session.cancel_matchmaking();
    while let Ok(notification) = notifications_rx.try_recv() {
        print_notification(&notification);
    }
    Ok(())
}
