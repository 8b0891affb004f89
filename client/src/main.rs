mod config;
mod input;
mod offline;
mod online;
mod render;

use clap::{Parser, Subcommand, ValueEnum};
use common::games::SessionRng;
use common::games::tictactoe::{Difficulty, Mark, Opponent};
use common::id_generator::generate_player_name;
use common::{PlayerId, log, logger};

#[derive(Parser)]
#[command(name = "tictactoe_arena")]
struct Args {
    #[arg(long)]
    use_log_prefix: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum OpponentArg {
    Ai,
    Local,
}

#[derive(Subcommand)]
enum Command {
    /// Play on this machine against the AI or a second human.
    Play {
        #[arg(long, value_enum, default_value = "ai")]
        opponent: OpponentArg,
        #[arg(long, default_value = "medium")]
        difficulty: Difficulty,
        #[arg(long, default_value = "X")]
        human_mark: Mark,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Play a simulated online match.
    Online {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run headless games against a simulated player and report the AI win rate.
    Simulate {
        #[arg(long, default_value = "medium")]
        difficulty: Difficulty,
        #[arg(long, default_value_t = 1000)]
        games: u32,
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Arena".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let config = config::load_config();

    match args.command {
        Command::Simulate {
            difficulty,
            games,
            seed,
        } => {
            let report = offline::run_simulation(&config.tictactoe, difficulty, games, seed);
            let realized = report.stats.win_rate().unwrap_or(0.0);
            println!(
                "{}: {} games, AI won {} ({:.3}), human won {}, draws {}; target {:.2}",
                report.difficulty,
                report.stats.games_played,
                report.stats.ai_wins,
                realized,
                report.stats.human_wins,
                report.stats.draws,
                report.target_win_rate
            );
            Ok(())
        }
        Command::Play {
            opponent,
            difficulty,
            human_mark,
            seed,
        } => {
            let opponent = match opponent {
                OpponentArg::Ai => Opponent::Ai(difficulty),
                OpponentArg::Local => Opponent::LocalHuman,
            };
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(offline::run_tictactoe_game(&config, opponent, human_mark, seed))
        }
        Command::Online { name, seed } => {
            let player = name
                .or_else(|| config.player_name.clone())
                .unwrap_or_else(|| generate_player_name(&mut SessionRng::from_random()));
            log!("Playing online as {}", player);

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(online::run_online_session(&config, PlayerId::from(player), seed))
        }
    }
}
