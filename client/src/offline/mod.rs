mod simulate;
mod tictactoe_runner;

pub use simulate::run_simulation;
pub use tictactoe_runner::{run_tictactoe_game, sleep_until_deadline};
